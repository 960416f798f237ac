use anyhow::Result;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

use super::classifier::Precedence;
use super::graph::Graph;
use super::grid::Grid;
use super::models::NodeKind;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PersistStats {
    pub nodes_written: usize,
    pub edges_written: usize,
}

pub fn open_rw<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
    Ok(conn)
}

pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    crate::db::create_tables(conn)
}

pub fn with_tx<T, F: FnOnce(&Transaction) -> Result<T>>(conn: &mut Connection, f: F) -> Result<T> {
    // IMMEDIATE to take the write lock before the first DELETE
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

/// Replaces any previously stored graph with `graph`.
pub fn persist_graph(conn: &mut Connection, grid: &Grid, graph: &Graph, precedence: Precedence) -> Result<PersistStats> {
    ensure_schema(conn)?;
    with_tx(conn, |tx| {
        tx.execute("DELETE FROM graph_edges", [])?;
        tx.execute("DELETE FROM graph_nodes", [])?;

        let mut meta = tx.prepare(
            "INSERT INTO meta (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        )?;
        meta.execute(params!["grid_width", grid.width().to_string()])?;
        meta.execute(params!["grid_height", grid.height().to_string()])?;
        meta.execute(params!["precedence", precedence.as_str()])?;

        let mut ins_node = tx.prepare(
            "INSERT INTO graph_nodes (anchor_x, anchor_y, node_id, kind, building_id, is_warehouse, width)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
        )?;
        let mut stats = PersistStats::default();
        for node in graph.nodes() {
            let (building_id, is_warehouse, width) = match &node.kind {
                NodeKind::Building { id, is_warehouse } => (Some(id.as_str().to_string()), *is_warehouse, None),
                NodeKind::WidthChange { width } => (None, false, Some(*width as i64)),
                NodeKind::End | NodeKind::Intersection => (None, false, None),
            };
            ins_node.execute(params![
                node.anchor.x as i64,
                node.anchor.y as i64,
                node.id.to_string(),
                node.kind.label(),
                building_id,
                is_warehouse,
                width
            ])?;
            stats.nodes_written += 1;
        }

        let mut ins_edge = tx.prepare(
            "INSERT INTO graph_edges (edge_id, source, target, source_x, source_y, target_x, target_y, width, distance)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        )?;
        for (idx, e) in graph.edges().iter().enumerate() {
            ins_edge.execute(params![
                idx as i64,
                e.source.to_string(),
                e.target.to_string(),
                e.source_anchor.x as i64,
                e.source_anchor.y as i64,
                e.target_anchor.x as i64,
                e.target_anchor.y as i64,
                e.width as i64,
                e.distance as i64
            ])?;
            stats.edges_written += 1;
        }
        Ok(stats)
    })
}
