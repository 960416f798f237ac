use super::models::Position;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Offset(pub i32, pub i32);

pub const UP: Offset = Offset(0, -1);
pub const RIGHT: Offset = Offset(1, 0);
pub const DOWN: Offset = Offset(0, 1);
pub const LEFT: Offset = Offset(-1, 0);

/// Scan order for every neighbor walk: entrance lookup, degree counting,
/// width comparison and BFS expansion all rely on it.
pub const ORTHOGONAL: [Offset; 4] = [UP, RIGHT, DOWN, LEFT];

impl Offset {
    /// Applies the offset, returning `None` when it would leave the
    /// non-negative quadrant. Upper bounds are the grid's concern.
    pub fn apply(self, p: Position) -> Option<Position> {
        let x = p.x.checked_add_signed(self.0 as isize)?;
        let y = p.y.checked_add_signed(self.1 as isize)?;
        Some(Position::new(x, y))
    }
}

pub fn orthogonal_neighbors(p: Position) -> impl Iterator<Item = Position> {
    ORTHOGONAL.into_iter().filter_map(move |o| o.apply(p))
}
