use thiserror::Error;

use super::models::{BuildingId, Cell, Position};
use super::neighbor_policy::orthogonal_neighbors;

pub const ROAD_TOKEN: &str = "R";

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,

    #[error("row {row} has no cells")]
    EmptyRow { row: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },

    #[error("unrecognized token {token:?} at row {row}, column {col}")]
    UnrecognizedToken { row: usize, col: usize, token: String },
}

/// Immutable rectangular grid of road and building cells.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let height = rows.len();
        if height == 0 {
            return Err(GridError::Empty);
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(GridError::EmptyRow { row: 0 });
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != width {
                return Err(GridError::Ragged { row, expected: width, found: r.len() });
            }
            cells.extend(r);
        }
        Ok(Self { width, height, cells })
    }

    /// Builds a grid from raw tokens: `R` is road, a run of ASCII digits is a
    /// building id.
    pub fn from_tokens<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, GridError> {
        let mut parsed = Vec::with_capacity(rows.len());
        for (row, r) in rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(r.len());
            for (col, tok) in r.iter().enumerate() {
                cells.push(parse_token(tok.as_ref()).ok_or_else(|| GridError::UnrecognizedToken {
                    row,
                    col,
                    token: tok.as_ref().to_string(),
                })?);
            }
            parsed.push(cells);
        }
        Self::new(parsed)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    pub fn contains(&self, p: Position) -> bool {
        match (i64::try_from(p.x), i64::try_from(p.y)) {
            (Ok(x), Ok(y)) => self.in_bounds(x, y),
            _ => false,
        }
    }

    pub fn cell(&self, p: Position) -> Option<&Cell> {
        if self.contains(p) {
            self.cells.get(p.y * self.width + p.x)
        } else {
            None
        }
    }

    pub fn is_road(&self, p: Position) -> bool {
        matches!(self.cell(p), Some(Cell::Road))
    }

    pub fn is_building(&self, p: Position) -> bool {
        matches!(self.cell(p), Some(Cell::Building(_)))
    }

    pub fn building_id(&self, p: Position) -> Option<&BuildingId> {
        match self.cell(p) {
            Some(Cell::Building(id)) => Some(id),
            _ => None,
        }
    }

    /// Corridor-width heuristic: the longer of the road runs starting at `p`
    /// going right and going down (both inclusive). Zero off-road.
    pub fn road_width(&self, p: Position) -> usize {
        if !self.is_road(p) {
            return 0;
        }
        let w = (p.x..self.width)
            .take_while(|&x| self.is_road(Position::new(x, p.y)))
            .count();
        let h = (p.y..self.height)
            .take_while(|&y| self.is_road(Position::new(p.x, y)))
            .count();
        w.max(h)
    }

    /// Road neighbors of `p` in scan order.
    pub fn road_neighbors(&self, p: Position) -> impl Iterator<Item = Position> + '_ {
        orthogonal_neighbors(p).filter(move |&n| self.is_road(n))
    }

    pub fn road_degree(&self, p: Position) -> usize {
        self.road_neighbors(p).count()
    }

    /// All positions, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }
}

pub fn parse_token(tok: &str) -> Option<Cell> {
    if tok == ROAD_TOKEN {
        Some(Cell::Road)
    } else if !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit()) {
        Some(Cell::Building(BuildingId(tok.to_string())))
    } else {
        None
    }
}
