pub mod curve;
pub mod outline;
pub mod point;
pub mod segment;

pub use outline::{Orientation, Outline};
pub use point::{Point, Vector};
pub use segment::Segment;
