//! Goal grid: the target layout, rows outer and columns inner.

use thiserror::Error;

use crate::core::types::{POLYANET_TOKEN, Position, SPACE_TOKEN};

/// Shape violations rejected when a grid is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridShapeError {
    #[error("goal grid has no cells")]
    Empty,
    #[error("goal grid row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rectangular, non-empty grid of raw goal-map tokens.
///
/// Tokens stay as strings until the reconciliation walk so an unknown token is
/// reported against its own cell instead of rejecting the whole map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalGrid {
    rows: Vec<Vec<String>>,
    columns: usize,
}

impl GoalGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Result<Self, GridShapeError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            return Err(GridShapeError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != columns)
        {
            return Err(GridShapeError::Ragged {
                row,
                expected: columns,
                found,
            });
        }
        Ok(Self { rows, columns })
    }

    /// Square grid of `size` with Polyanets on both diagonals, leaving
    /// `margin` cells free at each end.
    ///
    /// The diagonals share the centre cell of odd sizes; the grid holds it once.
    pub fn x_pattern(size: usize, margin: usize) -> Result<Self, GridShapeError> {
        let rows = (0..size)
            .map(|row| {
                (0..size)
                    .map(|column| {
                        let on_diagonal = row == column || row + column + 1 == size;
                        let inside = row >= margin && row + margin < size;
                        if on_diagonal && inside {
                            POLYANET_TOKEN.to_string()
                        } else {
                            SPACE_TOKEN.to_string()
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Cells in row-major order: rows top to bottom, columns left to right.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, tokens)| {
            tokens
                .iter()
                .enumerate()
                .map(move |(column, token)| (Position::new(row, column), token.as_str()))
        })
    }
}
