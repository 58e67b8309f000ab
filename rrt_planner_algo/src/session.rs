//! Planning session: incremental tree growth and path bookkeeping
//!
//! A session owns the node arena and the best path exclusively. The
//! driver (a frame callback or a plain loop) calls [`Session::grow`]
//! until the goal is reached, then [`Session::rewire_once`] while the
//! improvement budget lasts. Every step commits or discards its
//! mutation entirely before returning.

use crate::error::{PlannerError, Result};
use crate::geometry::{distance, Point};
use crate::node::{NodeArena, NodeId};
use crate::path::PlannedPath;
use crate::render::RenderSink;
use crate::sampler::Sampler;
use log::{debug, trace};

/// Tunable parameters for a planning session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Workspace extent along x, sampled as `[0, width)`
    pub workspace_width: f32,
    /// Workspace extent along y, sampled as `[0, height)`
    pub workspace_height: f32,
    /// Steering step size; also the jitter radius during rewiring and
    /// the goal-connection threshold
    pub step_size: f32,
    /// Number of nearest path nodes considered per rewire attempt
    pub neighbor_count: usize,
    /// Total number of rewire attempts allowed for the session
    pub rewire_budget: usize,
    /// Random seed (None for entropy)
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            workspace_width: 500.0,
            workspace_height: 500.0,
            step_size: 20.0,
            neighbor_count: 5,
            rewire_budget: 1000,
            seed: None,
        }
    }
}

/// Snapshot of the best known path
#[derive(Debug, Clone, PartialEq)]
pub struct PathSnapshot {
    /// Path points in goal→…→start order
    pub points: Vec<Point>,
    /// Total path length from start to goal
    pub total_cost: f32,
}

/// Outcome of one grow step
#[derive(Debug, Clone, PartialEq)]
pub enum GrowResult {
    /// One node was added to the tree
    Grown(NodeId),
    /// The goal is connected and the best path is available
    GoalReached(PathSnapshot),
    /// The sample coincided with its nearest node; nothing was inserted
    Discarded,
}

/// Outcome of one rewire attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewireResult {
    /// A path node was replaced by a cheaper nearby sample
    Improved {
        /// The node detached from the path
        replaced: NodeId,
        /// The node spliced in its place
        inserted: NodeId,
        /// Reduction of the total path cost
        cost_delta: f32,
    },
    /// Nothing changed
    NoImprovement,
}

/// One incremental planning run between a fixed start and goal
pub struct Session {
    pub(crate) arena: NodeArena,
    pub(crate) sampler: Sampler,
    pub(crate) config: SessionConfig,
    pub(crate) start_id: NodeId,
    pub(crate) goal_position: Point,
    pub(crate) goal_id: Option<NodeId>,
    pub(crate) path: PlannedPath,
    pub(crate) rewires_remaining: usize,
    pub(crate) sink: Option<Box<dyn RenderSink>>,
}

// Not derivable past the boxed sink; summarizes the planning state.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("nodes", &self.arena.len())
            .field("goal_reached", &self.goal_id.is_some())
            .field("path_entries", &self.path.len())
            .field("rewires_remaining", &self.rewires_remaining)
            .finish_non_exhaustive()
    }
}

/// Create a session with default workspace bounds
///
/// Rejects non-positive step sizes and neighbor counts; nothing else
/// can fail at creation time.
pub fn create_session(
    start: Point,
    goal: Point,
    step_size: f32,
    neighbor_count: usize,
    rewire_budget: usize,
) -> Result<Session> {
    Session::new(
        start,
        goal,
        SessionConfig {
            step_size,
            neighbor_count,
            rewire_budget,
            ..SessionConfig::default()
        },
    )
}

impl Session {
    /// Create a session planning from `start` to `goal`
    pub fn new(start: Point, goal: Point, config: SessionConfig) -> Result<Self> {
        if !(config.step_size > 0.0) {
            return Err(PlannerError::InvalidStepSize(config.step_size));
        }
        if config.neighbor_count == 0 {
            return Err(PlannerError::InvalidNeighborCount);
        }
        if !(config.workspace_width > 0.0 && config.workspace_height > 0.0) {
            return Err(PlannerError::InvalidWorkspace {
                width: config.workspace_width,
                height: config.workspace_height,
            });
        }

        let mut arena = NodeArena::new();
        let start_id = arena.insert_root(start);
        let sampler = Sampler::new(config.workspace_width, config.workspace_height, config.seed);
        debug!(
            "[session] planning ({:.1},{:.1}) -> ({:.1},{:.1}), step {}",
            start.x, start.y, goal.x, goal.y, config.step_size
        );
        Ok(Self {
            arena,
            sampler,
            config,
            start_id,
            goal_position: goal,
            goal_id: None,
            path: PlannedPath::default(),
            rewires_remaining: 0,
            sink: None,
        })
    }

    /// Attach a drawing surface
    ///
    /// The start and goal markers are emitted immediately; subsequent
    /// structural mutations push their own segments and markers.
    pub fn set_sink(&mut self, mut sink: Box<dyn RenderSink>) {
        sink.marker(self.arena[self.start_id].position);
        sink.marker(self.goal_position);
        self.sink = Some(sink);
    }

    /// Grow the tree by one node
    ///
    /// Draws a workspace sample, steers from its nearest tree node and
    /// inserts the steered point. Returns [`GrowResult::GoalReached`]
    /// once the new node lands within one step of the goal; after that
    /// the call is a no-op reporting the same outcome. A sample that
    /// coincides with its nearest node is discarded without insertion.
    pub fn grow(&mut self) -> GrowResult {
        if self.goal_id.is_some() {
            return GrowResult::GoalReached(self.snapshot());
        }

        let sample = self.sampler.sample_workspace();
        let nearest = self.arena.nearest(&sample);
        let nearest_position = self.arena[nearest].position;

        let d = distance(&sample, &nearest_position);
        if d == 0.0 {
            trace!("[session] sample coincides with node {nearest}, discarded");
            return GrowResult::Discarded;
        }

        // The steered point always lands exactly one step from the
        // nearest node, overshooting the sample when it lies closer
        // than one step.
        let scale = self.config.step_size / d;
        let new_position = nearest_position + (sample - nearest_position) * scale;
        let new_id = self.arena.insert_child(new_position, nearest);
        trace!(
            "[session] node {new_id} at ({:.1},{:.1}) under {nearest}",
            new_position.x,
            new_position.y
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.segment(nearest_position, new_position);
            sink.marker(new_position);
        }

        if distance(&new_position, &self.goal_position) <= self.config.step_size {
            let goal_id = self.arena.insert_child(self.goal_position, new_id);
            self.goal_id = Some(goal_id);
            self.path = PlannedPath::extract(&mut self.arena, goal_id);
            self.rewires_remaining = self.config.rewire_budget;
            if let Some(sink) = self.sink.as_mut() {
                sink.segment(new_position, self.goal_position);
            }
            debug!(
                "[session] goal connected: {} nodes, {} path entries, cost {:.2}",
                self.arena.len(),
                self.path.len(),
                self.arena[goal_id].cost
            );
            GrowResult::GoalReached(self.snapshot())
        } else {
            GrowResult::Grown(new_id)
        }
    }

    /// The best known path, if the goal has been connected
    ///
    /// Points are ordered goal→…→start; the total cost is the
    /// cumulative cost recorded on the goal node.
    pub fn current_path(&self) -> Option<PathSnapshot> {
        self.goal_id?;
        Some(self.snapshot())
    }

    pub(crate) fn snapshot(&self) -> PathSnapshot {
        let points = self
            .path
            .ids()
            .iter()
            .map(|&id| self.arena[id].position)
            .collect();
        let total_cost = match self.path.ids().first() {
            Some(&goal) => self.arena[goal].cost,
            None => 0.0,
        };
        PathSnapshot { points, total_cost }
    }

    /// Whether the goal has been connected
    pub fn goal_reached(&self) -> bool {
        self.goal_id.is_some()
    }

    /// Rewire attempts left in the improvement budget
    pub fn rewires_remaining(&self) -> usize {
        self.rewires_remaining
    }

    /// Reset the improvement budget
    ///
    /// Drivers that size the budget from the extracted path (for
    /// instance, a fixed number of attempts per path entry) call this
    /// once the goal connects.
    pub fn set_rewire_budget(&mut self, budget: usize) {
        self.rewires_remaining = budget;
    }

    /// The node store (for tree visualization)
    pub fn nodes(&self) -> &NodeArena {
        &self.arena
    }

    /// The session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The fixed goal position
    pub fn goal_position(&self) -> Point {
        self.goal_position
    }

    /// The fixed start position
    pub fn start_position(&self) -> Point {
        self.arena[self.start_id].position
    }
}
