//! Drawing-surface seam
//!
//! The core pushes draw calls into a [`RenderSink`] as the tree and
//! path evolve; it never reads anything back. Collaborators (an egui
//! plot, a recording buffer, a log) implement the trait.

use crate::geometry::Point;

/// Receiver for informational draw calls emitted by a planning session
pub trait RenderSink {
    /// A line segment between two points (a new or rewired tree edge)
    fn segment(&mut self, from: Point, to: Point);

    /// A single point of interest (start, goal, or a newly placed node)
    fn marker(&mut self, at: Point);
}

/// Sink that discards every draw call
pub struct NullSink;

impl RenderSink for NullSink {
    fn segment(&mut self, _from: Point, _to: Point) {}

    fn marker(&mut self, _at: Point) {}
}
