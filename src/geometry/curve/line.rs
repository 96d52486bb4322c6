use crate::math::{Context, Real, Vec2};

/// A straight segment `P(t) = p + (q - p) * t`, `t` in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct LineCurve {
    p: Vec2,
    q: Vec2,
}

impl LineCurve {
    /// Creates a line segment; `None` if it has zero length.
    #[must_use]
    pub fn new(p: Vec2, q: Vec2, ctx: &Context) -> Option<Self> {
        if p.approx_eq(&q, ctx) {
            return None;
        }
        Some(Self { p, q })
    }

    /// Start point.
    #[must_use]
    pub fn start(&self) -> &Vec2 {
        &self.p
    }

    /// End point.
    #[must_use]
    pub fn end(&self) -> &Vec2 {
        &self.q
    }

    /// `q - p`.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        &self.q - &self.p
    }

    /// Point at parameter `t`; values outside `[0, 1]` extend the line.
    #[must_use]
    pub fn point_at(&self, t: &Real) -> Vec2 {
        self.p.lerp(&self.q, t)
    }

    /// Parameter of the orthogonal projection of `point` onto the line.
    #[must_use]
    pub fn param_of(&self, point: &Vec2) -> Real {
        let delta = self.delta();
        (point - &self.p).dot(&delta) / delta.norm_squared()
    }

    /// Unit direction.
    #[must_use]
    pub fn direction(&self, ctx: &Context) -> Option<Vec2> {
        self.delta().normalized(ctx)
    }

    /// Translates the segment by `distance` along its unit normal.
    ///
    /// The normal is the left normal when `left` is set, the right normal otherwise.
    #[must_use]
    pub fn offset(&self, distance: &Real, left: bool, ctx: &Context) -> Option<Self> {
        let dir = self.direction(ctx)?;
        let normal = if left {
            dir.left_normal()
        } else {
            dir.right_normal()
        };
        let shift = normal.scaled(distance);
        Self::new(&self.p + &shift, &self.q + &shift, ctx)
    }

    /// Same segment traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            p: self.q.clone(),
            q: self.p.clone(),
        }
    }

    /// Converts the endpoints into `ctx`'s representation.
    #[must_use]
    pub fn adopt(&self, ctx: &Context) -> Self {
        Self {
            p: self.p.adopt(ctx),
            q: self.q.adopt(ctx),
        }
    }
}
