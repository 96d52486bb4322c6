use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use num_traits::ToPrimitive;

use crate::math::{Decimal, Point2};

/// A point with decimal coordinates.
///
/// Equality is exact numeric equality of the decimal values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: Decimal,
    pub y: Decimal,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: Decimal, y: Decimal) -> Self {
        Self { x, y }
    }

    /// Approximate `f64` point.
    #[must_use]
    pub fn to_point2(&self) -> Point2 {
        Point2::new(
            self.x.to_f64().unwrap_or(f64::NAN),
            self.y.to_f64().unwrap_or(f64::NAN),
        )
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(Decimal::from(x), Decimal::from(y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// A direction with decimal components.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector {
    pub x: Decimal,
    pub y: Decimal,
}

impl Vector {
    /// Creates a new vector.
    #[must_use]
    pub fn new(x: Decimal, y: Decimal) -> Self {
        Self { x, y }
    }
}
