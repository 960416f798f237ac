use anyhow::{anyhow, Context, Result};
use log::info;
use std::collections::BTreeSet;

use super::classifier::{self, ClassifyStats};
use super::config::Config;
use super::connector::{self, ConnectStats};
use super::db;
use super::graph::{Graph, NodeSet};
use super::grid::Grid;
use super::models::{BuildingId, Edge, NodeKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Classify,
    Connect,
    Persist,
}

impl Stage {
    pub fn key(self) -> &'static str {
        match self {
            Stage::Classify => "graph_stage_classify",
            Stage::Connect => "graph_stage_connect",
            Stage::Persist => "graph_stage_persist",
        }
    }
    pub fn all() -> &'static [Stage] { &[Stage::Classify, Stage::Connect, Stage::Persist] }
}

#[derive(Clone, Debug, Default)]
pub struct ExecStats {
    pub ran_classify: bool,
    pub ran_connect: bool,
    pub ran_persist: bool,
    pub classify: ClassifyStats,
    pub connect: ConnectStats,
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub graph: Graph,
    pub stats: ExecStats,
}

/// Classifies `grid`, connects the nodes and, unless `dry_run` or no db path
/// is configured, stores the result in SQLite.
pub fn run_pipeline(grid: &Grid, warehouses: &BTreeSet<BuildingId>, cfg: &Config) -> Result<PipelineOutput> {
    let mut stats = ExecStats::default();
    let mut nodes = NodeSet::new();
    let mut edges: Vec<Edge> = Vec::new();

    for &stage in Stage::all() {
        match stage {
            Stage::Classify => {
                let (n, s) = classifier::classify(grid, warehouses, cfg.precedence());
                validate_nodes(grid, &n)?;
                nodes = n;
                stats.classify = s;
                stats.ran_classify = true;
            }
            Stage::Connect => {
                let (e, s) = connector::connect(grid, &nodes, cfg.parallel());
                validate_edges(&nodes, &e)?;
                edges = e;
                stats.connect = s;
                stats.ran_connect = true;
            }
            Stage::Persist => {
                if cfg.dry_run {
                    info!("exec: dry_run enabled - skipping {}", stage.key());
                    continue;
                }
                let Some(path) = cfg.db.as_ref() else { continue };
                let graph = Graph::new(nodes.clone(), edges.clone());
                let mut conn = db::open_rw(path)
                    .with_context(|| format!("Failed to open DB at {}", path.display()))?;
                let s = db::persist_graph(&mut conn, grid, &graph, cfg.precedence())?;
                info!(
                    "exec: stored {} nodes / {} edges in {}",
                    s.nodes_written,
                    s.edges_written,
                    path.display()
                );
                stats.ran_persist = true;
            }
        }
    }

    stats.nodes = nodes.len();
    stats.edges = edges.len();
    Ok(PipelineOutput { graph: Graph::new(nodes, edges), stats })
}

// ---- Validations ----

fn validate_nodes(grid: &Grid, nodes: &NodeSet) -> Result<()> {
    for node in nodes.iter() {
        if !grid.is_road(node.anchor) {
            return Err(anyhow!("validate_nodes: {} anchored off-road at {}", node.id, node.anchor));
        }
        let degree = grid.road_degree(node.anchor);
        match node.kind {
            NodeKind::End if degree != 1 => {
                return Err(anyhow!("validate_nodes: end {} has degree {}", node.anchor, degree));
            }
            NodeKind::Intersection if degree < 3 => {
                return Err(anyhow!("validate_nodes: intersection {} has degree {}", node.anchor, degree));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_edges(nodes: &NodeSet, edges: &[Edge]) -> Result<()> {
    for e in edges {
        if !nodes.contains_id(&e.source) || !nodes.contains_id(&e.target) {
            return Err(anyhow!("validate_edges: dangling edge {} -> {}", e.source, e.target));
        }
        if nodes.id_at(e.target_anchor) != Some(&e.target) {
            return Err(anyhow!("validate_edges: target {} not anchored at {}", e.target, e.target_anchor));
        }
        if e.distance == 0 {
            return Err(anyhow!("validate_edges: zero-length edge {} -> {}", e.source, e.target));
        }
    }
    Ok(())
}
