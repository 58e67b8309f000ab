//! 2D geometry primitives

/// A point in the planning workspace
pub type Point = nalgebra::Point2<f32>;

/// Euclidean distance between two points
pub fn distance(a: &Point, b: &Point) -> f32 {
    nalgebra::distance(a, b)
}
