use log::{debug, info};
use rayon::prelude::*;
use std::collections::{HashSet, VecDeque};

use super::graph::NodeSet;
use super::grid::Grid;
use super::models::{Edge, NodeId, Position};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectStats {
    pub sources: usize,
    pub edges_created: usize,
    pub cells_visited: usize,
}

/// Breadth-first search over road cells from one anchor. Reaching another
/// anchor emits an edge and stops expansion there, so only nodes with no
/// other node in between are connected.
pub fn edges_from(grid: &Grid, nodes: &NodeSet, source_anchor: Position, source: &NodeId) -> (Vec<Edge>, usize) {
    let mut edges = Vec::new();
    let mut visited: HashSet<Position> = HashSet::new();
    let mut q: VecDeque<(Position, usize)> = VecDeque::new();

    visited.insert(source_anchor);
    q.push_back((source_anchor, 0));

    while let Some((p, distance)) = q.pop_front() {
        if p != source_anchor {
            if let Some(target) = nodes.id_at(p) {
                edges.push(Edge {
                    source: source.clone(),
                    target: target.clone(),
                    source_anchor,
                    target_anchor: p,
                    width: grid.road_width(p),
                    distance,
                });
                continue;
            }
        }
        for n in grid.road_neighbors(p) {
            if visited.insert(n) {
                q.push_back((n, distance + 1));
            }
        }
    }

    (edges, visited.len())
}

/// Runs `edges_from` for every anchor in row-major order. Sources are
/// independent, so with `parallel` they are spread over the rayon pool; the
/// edge order is the same either way.
pub fn connect(grid: &Grid, nodes: &NodeSet, parallel: bool) -> (Vec<Edge>, ConnectStats) {
    let sources: Vec<(Position, &NodeId)> = nodes.anchors().collect();

    let per_source: Vec<(Vec<Edge>, usize)> = if parallel {
        sources
            .par_iter()
            .map(|&(anchor, id)| edges_from(grid, nodes, anchor, id))
            .collect()
    } else {
        sources
            .iter()
            .map(|&(anchor, id)| edges_from(grid, nodes, anchor, id))
            .collect()
    };

    let mut stats = ConnectStats { sources: sources.len(), ..Default::default() };
    let mut edges = Vec::new();
    for ((anchor, id), (found, visited)) in sources.iter().zip(per_source) {
        debug!("connect: {} at {} -> {} edges ({} cells)", id, anchor, found.len(), visited);
        stats.cells_visited += visited;
        edges.extend(found);
    }
    stats.edges_created = edges.len();

    info!(
        "connect: {} sources -> {} edges (parallel={})",
        stats.sources, stats.edges_created, parallel
    );
    (edges, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::topology::models::NodeKind;

    fn grid(rows: &[&str]) -> Grid {
        let toks: Vec<Vec<&str>> = rows.iter().map(|r| r.split_whitespace().collect()).collect();
        Grid::from_tokens(&toks).unwrap()
    }

    fn road_nodes(points: &[(usize, usize)]) -> NodeSet {
        let mut set = NodeSet::new();
        for &(x, y) in points {
            let p = Position::new(x, y);
            set.insert(p, NodeId::Road(p), NodeKind::End);
        }
        set
    }

    #[test]
    fn corridor_ends_connect_both_ways() {
        let g = grid(&["R R R R R"]);
        let nodes = road_nodes(&[(0, 0), (4, 0)]);
        let (edges, stats) = connect(&g, &nodes, false);
        assert_eq!(stats.edges_created, 2);
        assert!(edges.iter().all(|e| e.distance == 4));
        assert_eq!(edges[0].target_anchor, Position::new(4, 0));
        assert_eq!(edges[1].target_anchor, Position::new(0, 0));
        // width is read at the target, so the two directions differ
        assert_eq!(edges[0].width, 1);
        assert_eq!(edges[1].width, 5);
    }

    #[test]
    fn search_stops_at_intermediate_node() {
        let g = grid(&["R R R R R"]);
        let nodes = road_nodes(&[(0, 0), (2, 0), (4, 0)]);
        let (edges, _) = connect(&g, &nodes, false);
        let from_left: Vec<&Edge> = edges.iter().filter(|e| e.source_anchor == Position::new(0, 0)).collect();
        assert_eq!(from_left.len(), 1);
        assert_eq!(from_left[0].target_anchor, Position::new(2, 0));
        assert_eq!(from_left[0].distance, 2);
        let from_mid = edges.iter().filter(|e| e.source_anchor == Position::new(2, 0)).count();
        assert_eq!(from_mid, 2);
    }

    #[test]
    fn distance_is_shortest_road_path() {
        let g = grid(&[
            "R R R",
            "R 1 R",
            "R R R",
            "R 1 1",
        ]);
        let nodes = road_nodes(&[(0, 3), (2, 2)]);
        let (edges, _) = connect(&g, &nodes, false);
        let e = edges.iter().find(|e| e.source_anchor == Position::new(0, 3)).unwrap();
        assert_eq!(e.target_anchor, Position::new(2, 2));
        assert_eq!(e.distance, 3);
    }

    #[test]
    fn disconnected_components_yield_no_edges() {
        let g = grid(&["R 1 R"]);
        let nodes = road_nodes(&[(0, 0), (2, 0)]);
        let (edges, _) = connect(&g, &nodes, false);
        assert!(edges.is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let g = grid(&[
            "R R 1 1 R",
            "R R 1 1 R",
            "R R R R R",
            "2 2 R 3 3",
            "2 2 R 3 3",
        ]);
        let nodes = road_nodes(&[(0, 0), (4, 0), (2, 2), (2, 4), (0, 2)]);
        let (a, _) = connect(&g, &nodes, false);
        let (b, _) = connect(&g, &nodes, true);
        assert_eq!(a, b);
    }
}
