pub mod context;
pub mod decimal;
pub mod intersect_2d;
pub(crate) mod polynomial;
pub mod precision;
pub mod real;
pub mod vec2;

pub use context::{evaluate, Context};
pub use decimal::Decimal;
pub use intersect_2d::{intersect, Intersection};
pub use precision::{Mode, Precision};
pub use real::{Expr, Real};
pub use vec2::Vec2;

/// 2D point type used for flattened output.
pub type Point2 = nalgebra::Point2<f64>;
