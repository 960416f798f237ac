use log::info;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::entrance_discovery::{discover_entrances, EntrancesStats};
use super::graph::NodeSet;
use super::grid::Grid;
use super::models::BuildingId;
use super::road_classifier::{classify_roads, SkeletonStats};

/// Which pass keeps a cell that is both a building anchor and a skeleton node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Precedence {
    /// Skeleton first, entrances applied on top.
    BuildingOverRoad,
    /// Entrances first, skeleton applied on top.
    RoadOverBuilding,
}

pub const DEFAULT_PRECEDENCE: Precedence = Precedence::BuildingOverRoad;

impl Default for Precedence {
    fn default() -> Self {
        DEFAULT_PRECEDENCE
    }
}

impl Precedence {
    pub fn as_str(self) -> &'static str {
        match self {
            Precedence::BuildingOverRoad => "building",
            Precedence::RoadOverBuilding => "road",
        }
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "building" | "building-over-road" => Ok(Precedence::BuildingOverRoad),
            "road" | "road-over-building" => Ok(Precedence::RoadOverBuilding),
            other => Err(format!("unknown precedence {:?} (expected building|road)", other)),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClassifyStats {
    pub entrances: EntrancesStats,
    pub skeleton: SkeletonStats,
    pub nodes: usize,
}

/// Runs both classification passes and merges them per `precedence`.
pub fn classify(
    grid: &Grid,
    warehouses: &BTreeSet<BuildingId>,
    precedence: Precedence,
) -> (NodeSet, ClassifyStats) {
    let (entrances, entrance_stats) = discover_entrances(grid, warehouses);
    let (skeleton, skeleton_stats) = classify_roads(grid);

    let (mut nodes, top) = match precedence {
        Precedence::BuildingOverRoad => (skeleton, entrances),
        Precedence::RoadOverBuilding => (entrances, skeleton),
    };
    nodes.overlay(top);

    let stats = ClassifyStats { entrances: entrance_stats, skeleton: skeleton_stats, nodes: nodes.len() };
    info!(
        "classify: {}x{} grid -> {} anchors, {} distinct ids (precedence={})",
        grid.width(),
        grid.height(),
        nodes.len(),
        nodes.ids().count(),
        precedence
    );
    (nodes, stats)
}
