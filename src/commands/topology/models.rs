use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Grid coordinate. Ordered row-major (`y` first, then `x`) so every scan and
/// every BFS source iteration walks the grid the same way.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub String);

impl BuildingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildingId {
    fn from(s: &str) -> Self {
        BuildingId(s.to_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Cell {
    Road,
    Building(BuildingId),
}

/// Label shared by every anchor of the same logical vertex. All entrances of a
/// building collapse onto `Building(id)`; skeleton nodes are keyed by anchor.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum NodeId {
    Building(BuildingId),
    Road(Position),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Building(id) => write!(f, "building_{}", id),
            NodeId::Road(p) => write!(f, "node_{}_{}", p.x, p.y),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Building { id: BuildingId, is_warehouse: bool },
    End,
    Intersection,
    WidthChange { width: usize },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Building { .. } => "building",
            NodeKind::End => "end",
            NodeKind::Intersection => "intersection",
            NodeKind::WidthChange { .. } => "width_change",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Node {
    pub anchor: Position,
    pub id: NodeId,
    pub kind: NodeKind,
}

/// Directed as discovered: `width` is measured at the target's anchor and
/// `distance` is the BFS hop count from the source's anchor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub source_anchor: Position,
    pub target_anchor: Position,
    pub width: usize,
    pub distance: usize,
}
