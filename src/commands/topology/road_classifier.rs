use log::debug;

use super::graph::NodeSet;
use super::grid::Grid;
use super::models::{NodeId, NodeKind, Position};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SkeletonStats {
    pub road_cells: usize,
    pub ends: usize,
    pub intersections: usize,
    pub width_changes: usize,
}

/// Classifies a single road cell from its road degree. Degree two cells are
/// nodes only when a road neighbor reports a different width; the first
/// mismatch in scan order decides.
pub fn classify_cell(grid: &Grid, p: Position) -> Option<NodeKind> {
    if !grid.is_road(p) {
        return None;
    }
    match grid.road_degree(p) {
        1 => Some(NodeKind::End),
        3 | 4 => Some(NodeKind::Intersection),
        2 => {
            let width = grid.road_width(p);
            grid.road_neighbors(p)
                .find(|&n| grid.road_width(n) != width)
                .map(|_| NodeKind::WidthChange { width })
        }
        _ => None,
    }
}

pub fn classify_roads(grid: &Grid) -> (NodeSet, SkeletonStats) {
    let mut nodes = NodeSet::new();
    let mut stats = SkeletonStats::default();

    for p in grid.positions().filter(|&p| grid.is_road(p)) {
        stats.road_cells += 1;
        let Some(kind) = classify_cell(grid, p) else { continue };
        match kind {
            NodeKind::End => stats.ends += 1,
            NodeKind::Intersection => stats.intersections += 1,
            NodeKind::WidthChange { .. } => stats.width_changes += 1,
            NodeKind::Building { .. } => {}
        }
        nodes.insert(p, NodeId::Road(p), kind);
    }

    debug!(
        "skeleton: {} road cells -> {} ends, {} intersections, {} width changes",
        stats.road_cells, stats.ends, stats.intersections, stats.width_changes
    );
    (nodes, stats)
}
