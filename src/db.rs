use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeSet;

pub fn create_tables(conn: &mut Connection) -> Result<()> {
    let node_columns: BTreeSet<&'static str> = [
        "anchor_x", "anchor_y", "node_id", "kind", "building_id", "is_warehouse", "width",
    ]
    .into_iter()
    .collect();
    let edge_columns: BTreeSet<&'static str> = [
        "edge_id", "source", "target", "source_x", "source_y", "target_x", "target_y", "width", "distance",
    ]
    .into_iter()
    .collect();

    // Older layouts are rebuilt; persisted graphs are always regenerated from a grid.
    if table_exists(conn, "graph_nodes")? && !table_has_columns(conn, "graph_nodes", &node_columns)? {
        conn.execute("DROP TABLE graph_nodes", [])?;
    }
    if table_exists(conn, "graph_edges")? && !table_has_columns(conn, "graph_edges", &edge_columns)? {
        conn.execute("DROP TABLE graph_edges", [])?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
          key   TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS graph_nodes (
          anchor_x     INTEGER NOT NULL,
          anchor_y     INTEGER NOT NULL,
          node_id      TEXT NOT NULL,
          kind         TEXT NOT NULL CHECK (kind IN ('building','end','intersection','width_change')),
          building_id  TEXT,
          is_warehouse INTEGER NOT NULL DEFAULT 0,
          width        INTEGER,
          PRIMARY KEY (anchor_x, anchor_y)
        );
        CREATE INDEX IF NOT EXISTS idx_graph_nodes_node_id ON graph_nodes(node_id);

        CREATE TABLE IF NOT EXISTS graph_edges (
          edge_id  INTEGER PRIMARY KEY,
          source   TEXT NOT NULL,
          target   TEXT NOT NULL,
          source_x INTEGER NOT NULL,
          source_y INTEGER NOT NULL,
          target_x INTEGER NOT NULL,
          target_y INTEGER NOT NULL,
          width    INTEGER NOT NULL,
          distance INTEGER NOT NULL CHECK (distance >= 1)
        );
        CREATE INDEX IF NOT EXISTS idx_graph_edges_source ON graph_edges(source);
        CREATE INDEX IF NOT EXISTS idx_graph_edges_target ON graph_edges(target);
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn table_has_columns(conn: &Connection, table: &str, required: &BTreeSet<&str>) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    let mut present = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        present.insert(name);
    }
    Ok(required.iter().all(|c| present.contains(*c)))
}
