//! Local path improvement (RRT*-style rewiring)
//!
//! One attempt jitters a random interior path node, gathers the k
//! nearest interior nodes to the jittered sample, and splices the
//! sample in place of whichever neighbor yields the largest downstream
//! cost reduction. Detached neighbors stay in the arena; the store is
//! an append-only history, not a pruned structure.

use crate::geometry::{distance, Point};
use crate::node::NodeId;
use crate::session::{RewireResult, Session};
use log::{debug, trace};

/// A sample hypothetically spliced in place of one path neighbor
pub(crate) struct SpliceCandidate {
    pub(crate) neighbor: NodeId,
    pub(crate) parent: NodeId,
    pub(crate) child: NodeId,
    pub(crate) cost_via_sample: f32,
    pub(crate) new_child_cost: f32,
    pub(crate) cost_difference: f32,
}

impl Session {
    /// Attempt one local path improvement
    ///
    /// Consumes one unit of the rewire budget. Returns
    /// [`RewireResult::NoImprovement`] without mutating anything when no
    /// path exists yet, the budget is exhausted, the path has no
    /// interior, or no evaluated neighbor beats its current cost.
    pub fn rewire_once(&mut self) -> RewireResult {
        if self.goal_id.is_none() || self.rewires_remaining == 0 {
            return RewireResult::NoImprovement;
        }
        self.rewires_remaining -= 1;

        let interior_len = self.path.interior().len();
        if interior_len == 0 {
            return RewireResult::NoImprovement;
        }
        let pick = self.sampler.pick_index(interior_len);
        let anchor = self.path.interior()[pick];
        let anchor_position = self.arena[anchor].position;
        let sample = self
            .sampler
            .jitter(&anchor_position, self.config.step_size);

        let neighbors = self.nearest_path_neighbors(&sample);
        match self.best_splice(&sample, &neighbors) {
            Some(candidate) => self.splice(sample, candidate),
            None => {
                trace!("[rewire] no improving neighbor near anchor {anchor}");
                RewireResult::NoImprovement
            }
        }
    }

    /// Bounded k-nearest-neighbor selection over interior path nodes
    ///
    /// Keeps two fixed-length slots of size k (distance, node) and
    /// replaces the current maximum whenever a closer node appears.
    /// The maximum is found by a linear scan that keeps the first
    /// maximum it sees, so ties resolve approximately, not stably.
    /// Unfilled slots stay `None` when fewer than k interior nodes
    /// exist.
    pub(crate) fn nearest_path_neighbors(&self, sample: &Point) -> Vec<Option<NodeId>> {
        let k = self.config.neighbor_count;
        let mut distances = vec![f32::INFINITY; k];
        let mut neighbors: Vec<Option<NodeId>> = vec![None; k];
        for &id in self.path.interior() {
            let d = distance(sample, &self.arena[id].position);
            let mut max_slot = 0;
            for slot in 1..k {
                if distances[slot] > distances[max_slot] {
                    max_slot = slot;
                }
            }
            if d < distances[max_slot] {
                distances[max_slot] = d;
                neighbors[max_slot] = Some(id);
            }
        }
        neighbors
    }

    /// Evaluate splicing `sample` in place of each neighbor, keeping the
    /// candidate with the largest cost reduction
    ///
    /// Neighbors missing a parent or child link are skipped; only a
    /// boundary node looks like that, and interior selection already
    /// excludes those.
    pub(crate) fn best_splice(
        &self,
        sample: &Point,
        neighbors: &[Option<NodeId>],
    ) -> Option<SpliceCandidate> {
        let mut best: Option<SpliceCandidate> = None;
        for &neighbor in neighbors.iter().flatten() {
            let node = &self.arena[neighbor];
            let (Some(parent), Some(child)) = (node.parent, node.child) else {
                continue;
            };
            let cost_via_sample =
                self.arena[parent].cost + distance(sample, &self.arena[parent].position);
            let new_child_cost =
                cost_via_sample + distance(sample, &self.arena[child].position);
            let original_child_cost = self.arena[child].cost;
            if new_child_cost < original_child_cost {
                let cost_difference = original_child_cost - new_child_cost;
                if best
                    .as_ref()
                    .map_or(true, |b| cost_difference > b.cost_difference)
                {
                    best = Some(SpliceCandidate {
                        neighbor,
                        parent,
                        child,
                        cost_via_sample,
                        new_child_cost,
                        cost_difference,
                    });
                }
            }
        }
        best
    }

    /// Splice the winning sample into the chain and propagate costs
    fn splice(&mut self, sample: Point, candidate: SpliceCandidate) -> RewireResult {
        let SpliceCandidate {
            neighbor,
            parent,
            child,
            cost_via_sample,
            new_child_cost,
            cost_difference,
        } = candidate;

        let inserted = self.arena.insert_detached(sample);
        self.arena[inserted].parent = Some(parent);
        self.arena[inserted].child = Some(child);
        self.arena[inserted].cost = cost_via_sample;
        self.arena[child].parent = Some(inserted);
        self.arena[parent].child = Some(inserted);

        // Walk forward along the chain toward the goal, re-deriving
        // every cumulative cost downstream of the splice point.
        let mut running = new_child_cost;
        self.arena[child].cost = running;
        let mut previous = child;
        while let Some(next) = self.arena[previous].child {
            running += distance(
                &self.arena[previous].position,
                &self.arena[next].position,
            );
            self.arena[next].cost = running;
            previous = next;
        }

        self.path.replace(neighbor, inserted);

        let parent_position = self.arena[parent].position;
        let child_position = self.arena[child].position;
        if let Some(sink) = self.sink.as_mut() {
            sink.segment(parent_position, sample);
            sink.segment(sample, child_position);
            sink.marker(sample);
        }
        debug!(
            "[rewire] node {neighbor} replaced by {inserted}, cost -{:.2}",
            cost_difference
        );
        RewireResult::Improved {
            replaced: neighbor,
            inserted,
            cost_delta: cost_difference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PlannedPath;
    use crate::session::{GrowResult, SessionConfig};

    fn seeded(start: Point, goal: Point, seed: u64, budget: usize) -> Session {
        Session::new(
            start,
            goal,
            SessionConfig {
                step_size: 20.0,
                rewire_budget: budget,
                seed: Some(seed),
                ..SessionConfig::default()
            },
        )
        .unwrap()
    }

    /// Session with a hand-built start→mid→goal chain already connected.
    fn three_node_session(mid: Point, goal: Point) -> (Session, NodeId, NodeId, NodeId) {
        let mut session = seeded(Point::new(0.0, 0.0), goal, 1, 100);
        let start = session.start_id;
        let mid = session.arena.insert_child(mid, start);
        let goal_id = session.arena.insert_child(goal, mid);
        session.goal_id = Some(goal_id);
        session.path = PlannedPath::extract(&mut session.arena, goal_id);
        session.rewires_remaining = session.config.rewire_budget;
        (session, start, mid, goal_id)
    }

    fn grow_to_goal(session: &mut Session) {
        for _ in 0..100_000 {
            if let GrowResult::GoalReached(_) = session.grow() {
                return;
            }
        }
        panic!("goal not reached");
    }

    #[test]
    fn test_splice_example() {
        // start→mid→goal with cost(mid) = 50 and cost(goal) = 90. The
        // sample sits 10 from the start and 45 from the goal, so routing
        // through it yields a child cost of 55 against the recorded 90.
        let goal = Point::new(55.0, 0.0);
        // 50 from the start, 40 from the goal.
        let mx = (900.0 + 55.0_f32 * 55.0) / 110.0;
        let (mut session, start, mid, goal_id) =
            three_node_session(Point::new(mx, (2500.0 - mx * mx).sqrt()), goal);
        assert!((session.arena[mid].cost - 50.0).abs() < 1e-3);
        assert!((session.arena[goal_id].cost - 90.0).abs() < 1e-3);

        let sample = Point::new(10.0, 0.0);
        let candidate = session
            .best_splice(&sample, &[Some(mid)])
            .expect("improvement");
        assert_eq!(candidate.cost_via_sample, 10.0);
        assert!((candidate.new_child_cost - 55.0).abs() < 1e-3);

        let result = session.splice(sample, candidate);
        let RewireResult::Improved {
            replaced,
            inserted,
            cost_delta,
        } = result
        else {
            panic!("expected an improvement");
        };
        assert_eq!(replaced, mid);
        assert!((cost_delta - 35.0).abs() < 1e-3);

        // The sample took over the chain and the path entry.
        assert_eq!(session.arena[inserted].cost, 10.0);
        assert!((session.arena[goal_id].cost - 55.0).abs() < 1e-3);
        assert_eq!(session.arena[start].child, Some(inserted));
        assert_eq!(session.arena[goal_id].parent, Some(inserted));
        assert_eq!(session.path.ids(), &[goal_id, inserted, start]);

        // The detached node stays in the append-only store.
        assert_eq!(session.arena.len(), 4);
    }

    #[test]
    fn test_boundary_neighbors_are_skipped() {
        let (session, start, _, goal_id) =
            three_node_session(Point::new(30.0, 40.0), Point::new(30.0, 100.0));
        // The goal has no child and the start has no parent; both must
        // be skipped rather than dereferenced.
        let sample = Point::new(6.0, 8.0);
        assert!(session.best_splice(&sample, &[Some(goal_id)]).is_none());
        assert!(session.best_splice(&sample, &[Some(start)]).is_none());
        assert!(session.best_splice(&sample, &[None]).is_none());
    }

    #[test]
    fn test_knn_selection_invariant() {
        let mut session = seeded(Point::new(10.0, 10.0), Point::new(480.0, 480.0), 9, 100);
        grow_to_goal(&mut session);
        assert!(session.path.interior().len() > session.config.neighbor_count);

        let sample = Point::new(250.0, 250.0);
        let selected = session.nearest_path_neighbors(&sample);
        let chosen: Vec<NodeId> = selected.iter().flatten().copied().collect();
        assert_eq!(chosen.len(), session.config.neighbor_count);

        let worst_chosen = chosen
            .iter()
            .map(|&id| distance(&sample, &session.arena[id].position))
            .fold(0.0_f32, f32::max);
        for &id in session.path.interior() {
            if chosen.contains(&id) {
                continue;
            }
            let d = distance(&sample, &session.arena[id].position);
            assert!(d >= worst_chosen, "excluded node closer than a chosen one");
        }
    }

    #[test]
    fn test_knn_with_fewer_interior_nodes_than_k() {
        let (session, _, mid, _) =
            three_node_session(Point::new(30.0, 40.0), Point::new(30.0, 100.0));
        let selected = session.nearest_path_neighbors(&Point::new(0.0, 0.0));
        assert_eq!(selected.len(), 5);
        assert_eq!(selected.iter().flatten().count(), 1);
        assert!(selected.contains(&Some(mid)));
    }

    #[test]
    fn test_rewire_monotonicity_and_cost_consistency() {
        let mut session = seeded(Point::new(10.0, 10.0), Point::new(100.0, 100.0), 42, 500);
        grow_to_goal(&mut session);

        while session.rewires_remaining() > 0 {
            let before = session.current_path().unwrap().total_cost;
            match session.rewire_once() {
                RewireResult::Improved { cost_delta, .. } => {
                    let after = session.current_path().unwrap().total_cost;
                    assert!(cost_delta > 0.0);
                    assert!((before - after - cost_delta).abs() < 1e-2);
                }
                RewireResult::NoImprovement => {
                    assert_eq!(session.current_path().unwrap().total_cost, before);
                }
            }
        }

        // Re-derive every cumulative cost by walking start→goal.
        let ids: Vec<NodeId> = session.path.ids().iter().rev().copied().collect();
        let mut running = 0.0;
        for pair in ids.windows(2) {
            let (prev, cur) = (&session.arena[pair[0]], &session.arena[pair[1]]);
            running += distance(&prev.position, &cur.position);
            assert!((cur.cost - running).abs() < 1e-2);
        }
    }

    #[test]
    fn test_no_improvement_leaves_state_unchanged() {
        let mut session = seeded(Point::new(10.0, 10.0), Point::new(100.0, 100.0), 7, 2000);
        grow_to_goal(&mut session);

        for _ in 0..2000 {
            let nodes_before = session.arena.len();
            let path_before = session.path.clone();
            let costs_before: Vec<f32> = session
                .path
                .ids()
                .iter()
                .map(|&id| session.arena[id].cost)
                .collect();
            if let RewireResult::NoImprovement = session.rewire_once() {
                assert_eq!(session.arena.len(), nodes_before);
                assert_eq!(session.path, path_before);
                let costs_after: Vec<f32> = session
                    .path
                    .ids()
                    .iter()
                    .map(|&id| session.arena[id].cost)
                    .collect();
                assert_eq!(costs_after, costs_before);
                return;
            }
        }
        panic!("every attempt improved, cannot exercise the no-op case");
    }

    #[test]
    fn test_budget_exhaustion() {
        let mut session = seeded(Point::new(10.0, 10.0), Point::new(100.0, 100.0), 42, 3);
        grow_to_goal(&mut session);
        assert_eq!(session.rewires_remaining(), 3);
        for _ in 0..3 {
            session.rewire_once();
        }
        assert_eq!(session.rewires_remaining(), 0);
        let nodes = session.arena.len();
        assert_eq!(session.rewire_once(), RewireResult::NoImprovement);
        assert_eq!(session.arena.len(), nodes);
    }

    #[test]
    fn test_rewire_without_path_is_noop() {
        let mut session = seeded(Point::new(10.0, 10.0), Point::new(400.0, 400.0), 1, 100);
        assert_eq!(session.rewire_once(), RewireResult::NoImprovement);
        assert_eq!(session.rewires_remaining(), 0);
    }

    #[test]
    fn test_path_without_interior_has_nothing_to_rewire() {
        // Hand-built direct start→goal chain: no interior entries.
        let goal = Point::new(15.0, 0.0);
        let mut session = seeded(Point::new(0.0, 0.0), goal, 3, 10);
        let goal_id = session.arena.insert_child(goal, session.start_id);
        session.goal_id = Some(goal_id);
        session.path = PlannedPath::extract(&mut session.arena, goal_id);
        session.rewires_remaining = session.config.rewire_budget;

        let nodes = session.arena.len();
        assert_eq!(session.rewire_once(), RewireResult::NoImprovement);
        assert_eq!(session.arena.len(), nodes);
        // The attempt still consumed a unit of budget.
        assert_eq!(session.rewires_remaining(), 9);
    }
}
