use std::ops::{Add, Mul, Neg, Sub};

use super::context::Context;
use super::real::Real;

/// 2D vector over [`Real`] scalars.
#[derive(Debug, Clone)]
pub struct Vec2 {
    pub x: Real,
    pub y: Real,
}

impl Vec2 {
    /// Creates a new vector.
    #[must_use]
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> Real {
        &self.x * &other.x + &self.y * &other.y
    }

    /// 2D cross product (z-component of the 3D cross product).
    #[must_use]
    pub fn cross(&self, other: &Self) -> Real {
        &self.x * &other.y - &self.y * &other.x
    }

    /// Squared length.
    #[must_use]
    pub fn norm_squared(&self) -> Real {
        self.dot(self)
    }

    /// Length.
    #[must_use]
    pub fn norm(&self) -> Real {
        self.norm_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    #[must_use]
    pub fn normalized(&self, ctx: &Context) -> Option<Self> {
        let len = self.norm();
        if ctx.is_zero(&len) {
            return None;
        }
        Some(Self::new(&self.x / &len, &self.y / &len))
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    #[must_use]
    pub fn left_normal(&self) -> Self {
        Self::new(-&self.y, self.x.clone())
    }

    /// Clockwise perpendicular `(y, -x)`.
    #[must_use]
    pub fn right_normal(&self) -> Self {
        Self::new(self.y.clone(), -&self.x)
    }

    /// Rotates by the angle whose cosine and sine are given.
    #[must_use]
    pub fn rotated(&self, cos: &Real, sin: &Real) -> Self {
        Self::new(
            cos * &self.x - sin * &self.y,
            sin * &self.x + cos * &self.y,
        )
    }

    /// Scales by a scalar.
    #[must_use]
    pub fn scaled(&self, s: &Real) -> Self {
        Self::new(&self.x * s, &self.y * s)
    }

    /// Linear interpolation `self + (other - self) * t`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: &Real) -> Self {
        self + &(other - self).scaled(t)
    }

    /// Whether the two vectors coincide within epsilon.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, ctx: &Context) -> bool {
        ctx.is_zero(&(&self.x - &other.x)) && ctx.is_zero(&(&self.y - &other.y))
    }

    /// Converts both components into `ctx`'s representation.
    #[must_use]
    pub fn adopt(&self, ctx: &Context) -> Self {
        Self::new(ctx.adopt(&self.x), ctx.adopt(&self.y))
    }

    /// Approximate `f64` coordinates.
    #[must_use]
    pub fn to_f64(&self, ctx: &Context) -> (f64, f64) {
        (ctx.to_f64(&self.x), ctx.to_f64(&self.y))
    }
}

impl Add<&Vec2> for &Vec2 {
    type Output = Vec2;
    fn add(self, rhs: &Vec2) -> Vec2 {
        Vec2::new(&self.x + &rhs.x, &self.y + &rhs.y)
    }
}

impl Sub<&Vec2> for &Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: &Vec2) -> Vec2 {
        Vec2::new(&self.x - &rhs.x, &self.y - &rhs.y)
    }
}

impl Mul<&Real> for &Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: &Real) -> Vec2 {
        self.scaled(rhs)
    }
}

impl Neg for &Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-&self.x, -&self.y)
    }
}
