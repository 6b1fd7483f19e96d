//! Placement commands: one value per remote call.

use std::fmt;

use serde_json::{Map, Value, json};

use crate::core::request::{ApiRequest, Method};
use crate::core::types::{Attribute, CellToken, ObjectKind, Position};

/// Whether a command creates or removes the object at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Delete,
}

impl Action {
    fn method(self) -> Method {
        match self {
            Self::Create => Method::Post,
            Self::Delete => Method::Delete,
        }
    }
}

/// A single object placement derived from one goal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementCommand {
    pub kind: ObjectKind,
    pub position: Position,
    pub attribute: Option<Attribute>,
}

impl PlacementCommand {
    /// Map a parsed cell to its command. `Empty` yields `None`.
    pub fn from_cell(position: Position, token: &CellToken) -> Option<Self> {
        let (kind, attribute) = match *token {
            CellToken::Empty => return None,
            CellToken::Polyanet => (ObjectKind::Polyanet, None),
            CellToken::Soloon(color) => (ObjectKind::Soloon, Some(Attribute::Color(color))),
            CellToken::Cometh(direction) => {
                (ObjectKind::Cometh, Some(Attribute::Direction(direction)))
            }
        };
        Some(Self {
            kind,
            position,
            attribute,
        })
    }

    /// Build the API call for this command.
    ///
    /// Create bodies carry the attribute (`color` / `direction`); delete bodies
    /// only identify the cell.
    pub fn request(&self, candidate_id: &str, action: Action) -> ApiRequest {
        let mut body = Map::new();
        body.insert("candidateId".to_string(), json!(candidate_id));
        body.insert("row".to_string(), json!(self.position.row));
        body.insert("column".to_string(), json!(self.position.column));
        if action == Action::Create {
            match self.attribute {
                Some(Attribute::Color(color)) => {
                    body.insert("color".to_string(), json!(color));
                }
                Some(Attribute::Direction(direction)) => {
                    body.insert("direction".to_string(), json!(direction));
                }
                None => {}
            }
        }
        ApiRequest::with_body(action.method(), [self.kind.resource()], Value::Object(body))
    }
}

impl fmt::Display for PlacementCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attribute {
            Some(attribute) => write!(f, "{} {attribute} at {}", self.kind, self.position),
            None => write!(f, "{} at {}", self.kind, self.position),
        }
    }
}
