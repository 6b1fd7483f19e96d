//! Shared deterministic types for the placement core.
//!
//! These types define stable contracts between the grid walk, command
//! construction and the HTTP layer. They carry no I/O and serialize to the
//! exact lowercase strings the remote API expects.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::MegaverseError;

/// Wire token for an empty goal cell.
pub const SPACE_TOKEN: &str = "SPACE";
/// Wire token for a Polyanet goal cell.
pub const POLYANET_TOKEN: &str = "POLYANET";

const SOLOON_SUFFIX: &str = "_SOLOON";
const COMETH_SUFFIX: &str = "_COMETH";

/// 0-indexed grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Soloon color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Red,
    Purple,
    White,
}

impl Color {
    fn from_token_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "BLUE" => Some(Self::Blue),
            "RED" => Some(Self::Red),
            "PURPLE" => Some(Self::Purple),
            "WHITE" => Some(Self::White),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::White => "white",
        }
    }
}

/// Cometh direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn from_token_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "UP" => Some(Self::Up),
            "DOWN" => Some(Self::Down),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// What a single goal-map cell requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellToken {
    Empty,
    Polyanet,
    Soloon(Color),
    Cometh(Direction),
}

impl FromStr for CellToken {
    type Err = MegaverseError;

    /// Parse a goal-map token (`SPACE`, `POLYANET`, `BLUE_SOLOON`, `UP_COMETH`, ...).
    ///
    /// Matching is exact; anything else is reported as an unknown token so that
    /// format drift in the goal map surfaces instead of being skipped.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parsed = match token {
            SPACE_TOKEN => Some(Self::Empty),
            POLYANET_TOKEN => Some(Self::Polyanet),
            _ => {
                if let Some(prefix) = token.strip_suffix(SOLOON_SUFFIX) {
                    Color::from_token_prefix(prefix).map(Self::Soloon)
                } else if let Some(prefix) = token.strip_suffix(COMETH_SUFFIX) {
                    Direction::from_token_prefix(prefix).map(Self::Cometh)
                } else {
                    None
                }
            }
        };
        parsed.ok_or_else(|| MegaverseError::UnknownCellToken {
            token: token.to_string(),
        })
    }
}

/// Placeable object kind; selects the API resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Polyanet,
    Soloon,
    Cometh,
}

impl ObjectKind {
    /// Path segment of the collection resource under the API base URL.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Polyanet => "polyanets",
            Self::Soloon => "soloons",
            Self::Cometh => "comeths",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Polyanet => "polyanet",
            Self::Soloon => "soloon",
            Self::Cometh => "cometh",
        };
        f.write_str(name)
    }
}

/// Optional payload carried by a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Color(Color),
    Direction(Direction),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(color) => f.write_str(color.as_str()),
            Self::Direction(direction) => f.write_str(direction.as_str()),
        }
    }
}
