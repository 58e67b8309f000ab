//! Incremental RRT / RRT* path planning in a bounded 2D workspace
//!
//! The core is step-driven: an external driver repeatedly calls
//! [`Session::grow`] to add one tree node per invocation until the goal
//! connects, then [`Session::rewire_once`] to spend a local-improvement
//! budget shortening the extracted path. Rendering and pacing live in
//! collaborating crates; this one only pushes draw calls into an
//! optional [`render::RenderSink`].

pub mod error;
pub mod geometry;
pub mod node;
pub mod path;
pub mod render;
pub mod rewire;
pub mod sampler;
pub mod session;

pub mod prelude {
    pub use crate::error::{PlannerError, Result};
    pub use crate::geometry::{distance, Point};
    pub use crate::node::{NodeArena, NodeId, PlanningNode};
    pub use crate::path::PlannedPath;
    pub use crate::render::{NullSink, RenderSink};
    pub use crate::sampler::Sampler;
    pub use crate::session::{
        create_session, GrowResult, PathSnapshot, RewireResult, Session, SessionConfig,
    };
}

pub use prelude::*;
