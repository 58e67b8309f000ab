//! Best-path bookkeeping
//!
//! The path is built by walking parent links from the goal, so its
//! order is goal→…→start. That convention is load-bearing: rewiring
//! excludes index 0 and the last index regardless of which semantic
//! endpoint they hold, and callers must not "fix" the order.

use crate::node::{NodeArena, NodeId};

/// Ordered sequence of node ids for the best known route, goal first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedPath {
    ids: Vec<NodeId>,
}

impl PlannedPath {
    /// Walk parent links from `goal` down to the parentless start node
    ///
    /// Each visited parent's forward `child` link is re-pointed at the
    /// node the walk arrived from, so forward traversal is authoritative
    /// exactly on path nodes (growth may have overwritten those links
    /// when side branches attached).
    pub fn extract(arena: &mut NodeArena, goal: NodeId) -> Self {
        let mut ids = vec![goal];
        let mut current = goal;
        while let Some(parent) = arena[current].parent {
            arena[parent].child = Some(current);
            ids.push(parent);
            current = parent;
        }
        Self { ids }
    }

    /// All entries, goal→…→start
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Entries excluding the two boundary positions (goal and start)
    pub fn interior(&self) -> &[NodeId] {
        if self.ids.len() <= 2 {
            &[]
        } else {
            &self.ids[1..self.ids.len() - 1]
        }
    }

    /// Replace `old` with `new` in place, preserving its position
    ///
    /// No-op if `old` is not on the path.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if let Some(entry) = self.ids.iter_mut().find(|id| **id == old) {
            *entry = new;
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the path has no entries (no goal connection yet)
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn chain() -> (NodeArena, NodeId, NodeId, NodeId) {
        let mut arena = NodeArena::new();
        let start = arena.insert_root(Point::new(0.0, 0.0));
        let mid = arena.insert_child(Point::new(10.0, 0.0), start);
        let goal = arena.insert_child(Point::new(20.0, 0.0), mid);
        (arena, start, mid, goal)
    }

    #[test]
    fn test_extract_is_goal_first() {
        let (mut arena, start, mid, goal) = chain();
        let path = PlannedPath::extract(&mut arena, goal);
        assert_eq!(path.ids(), &[goal, mid, start]);
    }

    #[test]
    fn test_extract_repoints_child_links() {
        let (mut arena, start, mid, goal) = chain();
        // A side branch overwrote the start node's forward link.
        let side = arena.insert_child(Point::new(0.0, 5.0), start);
        assert_eq!(arena[start].child, Some(side));

        PlannedPath::extract(&mut arena, goal);
        assert_eq!(arena[start].child, Some(mid));
        assert_eq!(arena[mid].child, Some(goal));
        assert_eq!(arena[goal].child, None);
    }

    #[test]
    fn test_interior_excludes_boundaries() {
        let (mut arena, _, mid, goal) = chain();
        let path = PlannedPath::extract(&mut arena, goal);
        assert_eq!(path.interior(), &[mid]);

        // A two-entry path has no interior.
        let mut arena = NodeArena::new();
        let start = arena.insert_root(Point::new(0.0, 0.0));
        let goal = arena.insert_child(Point::new(5.0, 0.0), start);
        let path = PlannedPath::extract(&mut arena, goal);
        assert!(path.interior().is_empty());
    }

    #[test]
    fn test_replace_preserves_position() {
        let (mut arena, start, mid, goal) = chain();
        let mut path = PlannedPath::extract(&mut arena, goal);
        let swapped = arena.insert_detached(Point::new(10.0, 1.0));
        path.replace(mid, swapped);
        assert_eq!(path.ids(), &[goal, swapped, start]);
    }
}
