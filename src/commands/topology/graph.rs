use serde::Serialize;
use std::collections::BTreeMap;

use super::models::{Edge, Node, NodeId, NodeKind, Position};

/// Vertices produced by classification. One logical id may sit on several
/// anchors (entrances of one building), so anchors and attributes are kept
/// in separate maps.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeSet {
    anchors: BTreeMap<Position, NodeId>,
    kinds: BTreeMap<NodeId, NodeKind>,
    anchor_counts: BTreeMap<NodeId, usize>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` at `anchor`, replacing whatever was anchored there.
    /// Returns the replaced id. Attributes of an id with no anchor left are
    /// dropped.
    pub fn insert(&mut self, anchor: Position, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.kinds.insert(id.clone(), kind);
        let replaced = self.anchors.insert(anchor, id.clone());
        if replaced.as_ref() == Some(&id) {
            return replaced;
        }
        *self.anchor_counts.entry(id).or_insert(0) += 1;
        if let Some(old) = &replaced {
            if let Some(count) = self.anchor_counts.get_mut(old) {
                *count -= 1;
                if *count == 0 {
                    self.anchor_counts.remove(old);
                    self.kinds.remove(old);
                }
            }
        }
        replaced
    }

    /// Applies every anchor of `other` on top of `self`.
    pub fn overlay(&mut self, other: NodeSet) {
        for (anchor, id) in other.anchors {
            if let Some(kind) = other.kinds.get(&id) {
                self.insert(anchor, id, kind.clone());
            }
        }
    }

    pub fn id_at(&self, p: Position) -> Option<&NodeId> {
        self.anchors.get(&p)
    }

    pub fn is_anchor(&self, p: Position) -> bool {
        self.anchors.contains_key(&p)
    }

    pub fn kind(&self, id: &NodeId) -> Option<&NodeKind> {
        self.kinds.get(id)
    }

    pub fn node_at(&self, p: Position) -> Option<Node> {
        let id = self.anchors.get(&p)?;
        let kind = self.kinds.get(id)?;
        Some(Node { anchor: p, id: id.clone(), kind: kind.clone() })
    }

    /// One entry per anchor, row-major.
    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.anchors.iter().filter_map(|(&anchor, id)| {
            self.kinds
                .get(id)
                .map(|kind| Node { anchor, id: id.clone(), kind: kind.clone() })
        })
    }

    pub fn anchors(&self) -> impl Iterator<Item = (Position, &NodeId)> + '_ {
        self.anchors.iter().map(|(&p, id)| (p, id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.kinds.keys()
    }

    pub fn contains_id(&self, id: &NodeId) -> bool {
        self.kinds.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Graph {
    pub nodes: NodeSet,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: NodeSet, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_from(&self, id: &NodeId) -> impl Iterator<Item = &Edge> + '_ {
        let id = id.clone();
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn export(&self) -> GraphExport {
        GraphExport { nodes: self.nodes().collect(), edges: self.edges.clone() }
    }
}

/// Flat, serializable view handed to renderers.
#[derive(Clone, Debug, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}
