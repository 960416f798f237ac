use anyhow::Result;
use rusqlite::Connection;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tempfile::NamedTempFile;

use grid_topology::commands::load_grid::{demo_grid, parse_text};
use grid_topology::commands::topology::classifier::Precedence;
use grid_topology::commands::topology::config::Config;
use grid_topology::commands::topology::executor;
use grid_topology::commands::topology::graph::Graph;
use grid_topology::commands::topology::grid::Grid;
use grid_topology::commands::topology::models::{BuildingId, NodeId, NodeKind, Position};

fn run(grid: &Grid, warehouses: &BTreeSet<BuildingId>, cfg: &Config) -> Result<Graph> {
    Ok(executor::run_pipeline(grid, warehouses, cfg)?.graph)
}

fn building(id: &str) -> NodeId {
    NodeId::Building(BuildingId::from(id))
}

/// Hop count from `from` to `to` over road cells without stepping through
/// any other anchor.
fn direct_distance(grid: &Grid, graph: &Graph, from: Position, to: Position) -> Option<usize> {
    let mut seen = HashSet::from([from]);
    let mut q = VecDeque::from([(from, 0usize)]);
    while let Some((p, d)) = q.pop_front() {
        if p == to {
            return Some(d);
        }
        if p != from && graph.nodes.is_anchor(p) {
            continue;
        }
        for n in grid.road_neighbors(p) {
            if seen.insert(n) {
                q.push_back((n, d + 1));
            }
        }
    }
    None
}

#[test]
fn demo_grid_yields_buildings_intersections_and_edges() -> Result<()> {
    let demo = demo_grid()?;
    let graph = run(&demo.grid, &demo.warehouses, &Config::default())?;

    for (id, warehouse) in [("1", true), ("2", false), ("3", true)] {
        assert_eq!(
            graph.nodes.kind(&building(id)),
            Some(&NodeKind::Building { id: BuildingId::from(id), is_warehouse: warehouse }),
            "building {}",
            id
        );
        let out: Vec<_> = graph.edges_from(&building(id)).collect();
        assert!(!out.is_empty(), "building {} has no edges", id);
        assert!(out.iter().all(|e| e.distance >= 1));
    }

    assert_eq!(
        graph.nodes.node_at(Position::new(1, 1)).map(|n| n.kind),
        Some(NodeKind::Intersection)
    );
    assert!(graph.nodes().any(|n| n.kind == NodeKind::Intersection));

    // (1,4) and (3,4) both open onto (2,4); the later cell wins
    assert_eq!(graph.nodes.id_at(Position::new(2, 4)), Some(&building("3")));
    Ok(())
}

#[test]
fn every_edge_references_existing_nodes() -> Result<()> {
    let grids = [
        demo_grid()?,
        parse_text("R R R R R")?,
        parse_text("1 R 2\nR R R\n3 R 4\nR R R")?,
        parse_text("R 1 R\n1 1 1\nR 1 R")?,
    ];
    for loaded in grids {
        for precedence in [Precedence::BuildingOverRoad, Precedence::RoadOverBuilding] {
            let cfg = Config { precedence: Some(precedence), ..Default::default() };
            let graph = run(&loaded.grid, &loaded.warehouses, &cfg)?;
            for e in graph.edges() {
                assert!(graph.nodes.contains_id(&e.source));
                assert!(graph.nodes.contains_id(&e.target));
                assert_eq!(graph.nodes.id_at(e.source_anchor), Some(&e.source));
                assert_eq!(graph.nodes.id_at(e.target_anchor), Some(&e.target));
            }
            for n in graph.nodes() {
                let degree = loaded.grid.road_degree(n.anchor);
                match n.kind {
                    NodeKind::End => assert_eq!(degree, 1),
                    NodeKind::Intersection => assert!(degree == 3 || degree == 4),
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

#[test]
fn edge_distance_is_shortest_direct_path() -> Result<()> {
    let demo = demo_grid()?;
    let graph = run(&demo.grid, &demo.warehouses, &Config::default())?;
    for e in graph.edges() {
        assert_eq!(
            Some(e.distance),
            direct_distance(&demo.grid, &graph, e.source_anchor, e.target_anchor),
            "{} {} -> {} {}",
            e.source,
            e.source_anchor,
            e.target,
            e.target_anchor
        );
        assert_eq!(e.width, demo.grid.road_width(e.target_anchor));
    }
    Ok(())
}

#[test]
fn reruns_are_identical_and_threading_does_not_matter() -> Result<()> {
    let demo = demo_grid()?;
    let seq = Config { threads: Some(1), ..Default::default() };
    let a = run(&demo.grid, &demo.warehouses, &seq)?;
    let b = run(&demo.grid, &demo.warehouses, &seq)?;
    let c = run(&demo.grid, &demo.warehouses, &Config::default())?;
    assert_eq!(a, b);
    assert_eq!(a, c);
    Ok(())
}

#[test]
fn road_precedence_hides_demo_buildings() -> Result<()> {
    let demo = demo_grid()?;
    let cfg = Config { precedence: Some(Precedence::RoadOverBuilding), ..Default::default() };
    let graph = run(&demo.grid, &demo.warehouses, &cfg)?;
    // every entrance of the demo buildings is also a skeleton node
    assert!(graph.nodes().all(|n| !matches!(n.kind, NodeKind::Building { .. })));
    assert_eq!(graph.nodes.len(), 13);
    Ok(())
}

#[test]
fn straight_corridor_links_ends_through_width_steps() -> Result<()> {
    let loaded = parse_text("R R R R R")?;
    let graph = run(&loaded.grid, &loaded.warehouses, &Config::default())?;

    let kinds: Vec<NodeKind> = graph.nodes().map(|n| n.kind).collect();
    assert_eq!(kinds.iter().filter(|k| **k == NodeKind::End).count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == NodeKind::Intersection).count(), 0);

    // the directional width shrinks along the run, so each cell in between is a node
    let forward: Vec<usize> = (0..4)
        .map(|x| {
            graph
                .edges()
                .iter()
                .find(|e| e.source_anchor == Position::new(x, 0) && e.target_anchor == Position::new(x + 1, 0))
                .map(|e| e.distance)
                .unwrap_or(0)
        })
        .collect();
    assert_eq!(forward.iter().sum::<usize>(), 4);
    // one edge each way per adjacent pair
    assert_eq!(graph.edges().len(), 8);
    Ok(())
}

#[test]
fn widening_corridor_yields_width_change() -> Result<()> {
    let loaded = parse_text("1 1 R R R\nR R R R R")?;
    let graph = run(&loaded.grid, &loaded.warehouses, &Config::default())?;
    assert!(graph.nodes().any(|n| matches!(n.kind, NodeKind::WidthChange { .. })));
    assert_eq!(
        graph.nodes.node_at(Position::new(1, 1)).map(|n| n.kind),
        Some(NodeKind::WidthChange { width: 4 })
    );
    Ok(())
}

#[test]
fn pipeline_persists_graph() -> Result<()> {
    let dbf = NamedTempFile::new().unwrap();
    let demo = demo_grid()?;
    let cfg = Config { db: Some(dbf.path().to_path_buf()), ..Default::default() };
    let out = executor::run_pipeline(&demo.grid, &demo.warehouses, &cfg)?;
    assert!(out.stats.ran_classify && out.stats.ran_connect && out.stats.ran_persist);

    let conn = Connection::open(dbf.path())?;
    let nodes: i64 = conn.query_row("SELECT COUNT(*) FROM graph_nodes", [], |r| r.get(0))?;
    let edges: i64 = conn.query_row("SELECT COUNT(*) FROM graph_edges", [], |r| r.get(0))?;
    assert_eq!(nodes as usize, out.stats.nodes);
    assert_eq!(edges as usize, out.stats.edges);
    let warehouses: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT building_id) FROM graph_nodes WHERE is_warehouse=1",
        [],
        |r| r.get(0),
    )?;
    assert_eq!(warehouses, 2);
    Ok(())
}
