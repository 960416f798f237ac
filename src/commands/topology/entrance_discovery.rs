use log::{debug, trace};
use std::collections::BTreeSet;

use super::graph::NodeSet;
use super::grid::Grid;
use super::models::{BuildingId, NodeId, NodeKind};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EntrancesStats {
    pub building_cells: usize,
    pub entrances_created: usize,
    pub cells_without_road: usize,
}

/// Registers one entrance per building cell that touches a road: the first
/// road neighbor in scan order becomes the anchor. Cells are visited
/// row-major, so a later cell wins a contested anchor.
pub fn discover_entrances(grid: &Grid, warehouses: &BTreeSet<BuildingId>) -> (NodeSet, EntrancesStats) {
    let mut nodes = NodeSet::new();
    let mut stats = EntrancesStats::default();

    for p in grid.positions() {
        let Some(id) = grid.building_id(p) else { continue };
        stats.building_cells += 1;

        let Some(anchor) = grid.road_neighbors(p).next() else {
            trace!("entrances: building {} cell {} has no adjacent road", id, p);
            stats.cells_without_road += 1;
            continue;
        };

        let kind = NodeKind::Building { id: id.clone(), is_warehouse: warehouses.contains(id) };
        if let Some(prev) = nodes.insert(anchor, NodeId::Building(id.clone()), kind) {
            if prev != NodeId::Building(id.clone()) {
                debug!("entrances: anchor {} moved from {} to building_{}", anchor, prev, id);
            }
        }
        stats.entrances_created += 1;
    }

    debug!(
        "entrances: {} building cells -> {} entrances ({} anchors), {} without road",
        stats.building_cells,
        stats.entrances_created,
        nodes.len(),
        stats.cells_without_road
    );
    (nodes, stats)
}
