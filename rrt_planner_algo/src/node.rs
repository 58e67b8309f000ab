//! Append-only arena of planning nodes
//!
//! Parent indices are the authoritative record of tree shape. Each node
//! also carries a single forward `child` index which records only the
//! most recently attached child; a node that gains a second child has
//! the reference silently overwritten. The forward link is therefore
//! only trusted for nodes lying on the current best path, where path
//! extraction re-points it along the chain.

use crate::geometry::{distance, Point};
use std::ops::{Index, IndexMut};

/// Index of a node in the arena
pub type NodeId = usize;

/// One vertex discovered during tree growth
#[derive(Debug, Clone)]
pub struct PlanningNode {
    /// Position in the workspace
    pub position: Point,
    /// Cumulative path length from the start node along tree edges
    pub cost: f32,
    /// Index of the parent node (None for the start node)
    pub parent: Option<NodeId>,
    /// Index of the most recently attached child (see module docs)
    pub child: Option<NodeId>,
}

impl PlanningNode {
    fn detached(position: Point) -> Self {
        Self {
            position,
            cost: 0.0,
            parent: None,
            child: None,
        }
    }
}

/// Append-only store of planning nodes, insertion order = discovery order
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<PlanningNode>,
}

impl NodeArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root node (cost 0, no parent)
    pub fn insert_root(&mut self, position: Point) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(PlanningNode::detached(position));
        id
    }

    /// Append a node attached below `parent`
    ///
    /// Sets the cost to `parent.cost + distance(position, parent.position)`
    /// and overwrites the parent's forward child link.
    pub fn insert_child(&mut self, position: Point, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        let cost = self.nodes[parent].cost + distance(&position, &self.nodes[parent].position);
        self.nodes.push(PlanningNode {
            position,
            cost,
            parent: Some(parent),
            child: None,
        });
        self.nodes[parent].child = Some(id);
        id
    }

    /// Append a parentless, childless node with cost 0
    ///
    /// Used for rewiring samples before they are spliced into the path.
    pub fn insert_detached(&mut self, position: Point) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(PlanningNode::detached(position));
        id
    }

    /// Index of the node closest to `target`, by linear scan
    ///
    /// Ties resolve to the first node in insertion order. O(n) by design;
    /// no spatial index is used.
    pub fn nearest(&self, target: &Point) -> NodeId {
        let mut min_distance = f32::INFINITY;
        let mut nearest = 0;
        for (id, node) in self.nodes.iter().enumerate() {
            let d = distance(&node.position, target);
            if d < min_distance {
                min_distance = d;
                nearest = id;
            }
        }
        nearest
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PlanningNode> {
        self.nodes.iter()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = PlanningNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_child_cost() {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(Point::new(0.0, 0.0));
        let a = arena.insert_child(Point::new(3.0, 4.0), root);
        let b = arena.insert_child(Point::new(3.0, 10.0), a);

        assert_eq!(arena[root].cost, 0.0);
        assert_eq!(arena[a].cost, 5.0);
        assert_eq!(arena[b].cost, 11.0);
        assert_eq!(arena[a].parent, Some(root));
        assert_eq!(arena[root].child, Some(a));
    }

    #[test]
    fn test_child_overwritten_on_second_attach() {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(Point::new(0.0, 0.0));
        let first = arena.insert_child(Point::new(1.0, 0.0), root);
        let second = arena.insert_child(Point::new(0.0, 1.0), root);

        // Forward link records only the latest child; parents stay intact.
        assert_eq!(arena[root].child, Some(second));
        assert_eq!(arena[first].parent, Some(root));
        assert_eq!(arena[second].parent, Some(root));
    }

    #[test]
    fn test_nearest_prefers_first_on_tie() {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(Point::new(-1.0, 0.0));
        arena.insert_child(Point::new(1.0, 0.0), root);

        // Both nodes are at distance 1 from the origin.
        assert_eq!(arena.nearest(&Point::new(0.0, 0.0)), root);
    }

    #[test]
    fn test_nearest_linear_scan() {
        let mut arena = NodeArena::new();
        let root = arena.insert_root(Point::new(0.0, 0.0));
        arena.insert_child(Point::new(10.0, 0.0), root);
        let c = arena.insert_child(Point::new(20.0, 0.0), root);

        assert_eq!(arena.nearest(&Point::new(19.0, 1.0)), c);
    }
}
