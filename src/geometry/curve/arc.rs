use std::cmp::Ordering;

use crate::math::decimal::{self, dec, Decimal};
use crate::math::{Context, Real, Vec2};

/// An elliptical arc in center parameterization.
///
/// `E(θ) = center + R(φ) (rx cos θ, ry sin θ)` for θ running from `theta0`
/// to `theta0 + dtheta`. All angles are in degrees; a positive `dtheta`
/// runs counter-clockwise in a y-up frame.
#[derive(Debug, Clone)]
pub struct ArcCurve {
    center: Vec2,
    rx: Real,
    ry: Real,
    phi: Real,
    cos_phi: Real,
    sin_phi: Real,
    theta0: Real,
    dtheta: Real,
    start: Vec2,
    end: Vec2,
}

/// Endpoint parameterization of an elliptical arc.
#[derive(Debug, Clone)]
pub struct ArcEndpoints {
    pub from: Vec2,
    pub to: Vec2,
    pub rx: Real,
    pub ry: Real,
    pub x_axis_rotation: Real,
    pub large_arc: bool,
    pub sweep: bool,
}

impl ArcCurve {
    /// Converts an endpoint-parameterized arc to center form.
    ///
    /// Radii too small to span the endpoints are scaled up uniformly.
    /// Returns `None` when the endpoints coincide or a radius is zero;
    /// such arcs are either omitted or drawn as straight lines.
    #[must_use]
    pub fn from_endpoints(arc: &ArcEndpoints, ctx: &Context) -> Option<Self> {
        if arc.from.approx_eq(&arc.to, ctx) || ctx.is_zero(&arc.rx) || ctx.is_zero(&arc.ry) {
            return None;
        }
        let abs = |r: &Real| {
            if ctx.sign(r) == Ordering::Less {
                -r
            } else {
                r.clone()
            }
        };
        let (mut rx, mut ry) = (abs(&arc.rx), abs(&arc.ry));
        let (sin_phi, cos_phi) = arc.x_axis_rotation.sin_cos_deg();
        let half = ctx.real(&decimal::half());

        let h = (&arc.from - &arc.to).scaled(&half);
        let x1p = &cos_phi * &h.x + &sin_phi * &h.y;
        let y1p = &cos_phi * &h.y - &sin_phi * &h.x;

        let (x1p2, y1p2) = (x1p.square(), y1p.square());
        let lambda = &x1p2 / rx.square() + &y1p2 / ry.square();
        let one = ctx.int(1);

        let coef = if ctx.cmp(&lambda, &one) == Ordering::Greater {
            let scale = lambda.sqrt();
            rx = &rx * &scale;
            ry = &ry * &scale;
            ctx.int(0)
        } else {
            let (rx2, ry2) = (rx.square(), ry.square());
            let num = &rx2 * &ry2 - &rx2 * &y1p2 - &ry2 * &x1p2;
            let den = &rx2 * &y1p2 + &ry2 * &x1p2;
            if ctx.sign(&num) == Ordering::Greater {
                let root = (num / den).sqrt();
                if arc.large_arc == arc.sweep {
                    -root
                } else {
                    root
                }
            } else {
                ctx.int(0)
            }
        };

        let cxp = &coef * &rx * &y1p / &ry;
        let cyp = -(&coef * &ry * &x1p / &rx);
        let mid = (&arc.from + &arc.to).scaled(&half);
        let center = &Vec2::new(cxp.clone(), cyp.clone()).rotated(&cos_phi, &sin_phi) + &mid;

        let theta1 = Real::atan2_deg(&((&y1p - &cyp) / &ry), &((&x1p - &cxp) / &rx));
        let theta2 = Real::atan2_deg(&((-&y1p - &cyp) / &ry), &((-&x1p - &cxp) / &rx));
        let mut dtheta = &theta2 - &theta1;
        match (arc.sweep, ctx.sign(&dtheta)) {
            (false, Ordering::Greater) => dtheta = dtheta - ctx.int(360),
            (true, Ordering::Less) => dtheta = dtheta + ctx.int(360),
            _ => {}
        }

        Some(Self {
            center,
            rx,
            ry,
            phi: arc.x_axis_rotation.clone(),
            cos_phi,
            sin_phi,
            theta0: theta1,
            dtheta,
            start: arc.from.clone(),
            end: arc.to.clone(),
        })
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> &Vec2 {
        &self.center
    }

    /// Semi-axis along the rotated x axis.
    #[must_use]
    pub fn rx(&self) -> &Real {
        &self.rx
    }

    /// Semi-axis along the rotated y axis.
    #[must_use]
    pub fn ry(&self) -> &Real {
        &self.ry
    }

    /// Rotation of the x axis in degrees.
    #[must_use]
    pub fn phi(&self) -> &Real {
        &self.phi
    }

    /// Start angle in degrees.
    #[must_use]
    pub fn theta0(&self) -> &Real {
        &self.theta0
    }

    /// Signed angular sweep in degrees.
    #[must_use]
    pub fn dtheta(&self) -> &Real {
        &self.dtheta
    }

    /// End angle in degrees.
    #[must_use]
    pub fn theta1(&self) -> Real {
        &self.theta0 + &self.dtheta
    }

    /// Start point.
    #[must_use]
    pub fn start(&self) -> &Vec2 {
        &self.start
    }

    /// End point.
    #[must_use]
    pub fn end(&self) -> &Vec2 {
        &self.end
    }

    /// Whether the sweep runs counter-clockwise.
    #[must_use]
    pub fn is_ccw(&self, ctx: &Context) -> bool {
        ctx.sign(&self.dtheta) == Ordering::Greater
    }

    /// Whether the sweep exceeds 180 degrees.
    #[must_use]
    pub fn is_large(&self, ctx: &Context) -> bool {
        let sweep = ctx.value(&self.dtheta).abs();
        sweep > dec(180) + ctx.epsilon()
    }

    /// Whether both semi-axes agree within epsilon.
    #[must_use]
    pub fn is_circular(&self, ctx: &Context) -> bool {
        ctx.is_zero(&(&self.rx - &self.ry))
    }

    /// Point at angle `theta` (degrees) on the full ellipse.
    #[must_use]
    pub fn point_at_angle(&self, theta: &Real) -> Vec2 {
        let (s, c) = theta.sin_cos_deg();
        let local = Vec2::new(&self.rx * &c, &self.ry * &s);
        &local.rotated(&self.cos_phi, &self.sin_phi) + &self.center
    }

    /// Angle parameter at `t` in `[0, 1]`.
    #[must_use]
    pub fn angle_at(&self, t: &Real) -> Real {
        &self.theta0 + &(&self.dtheta * t)
    }

    /// Point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: &Real) -> Vec2 {
        self.point_at_angle(&self.angle_at(t))
    }

    /// Tangent at `t` along the traversal direction (not normalized).
    #[must_use]
    pub fn tangent_at(&self, t: &Real, ctx: &Context) -> Vec2 {
        let (s, c) = self.angle_at(t).sin_cos_deg();
        let local = Vec2::new(-(&self.rx * &s), &self.ry * &c);
        let d = local.rotated(&self.cos_phi, &self.sin_phi);
        if self.is_ccw(ctx) {
            d
        } else {
            -&d
        }
    }

    /// Maps a point into the frame where this ellipse is the unit circle.
    #[must_use]
    pub fn to_unit(&self, p: &Vec2) -> Vec2 {
        let w = p - &self.center;
        let x = &self.cos_phi * &w.x + &self.sin_phi * &w.y;
        let y = &self.cos_phi * &w.y - &self.sin_phi * &w.x;
        Vec2::new(x / &self.rx, y / &self.ry)
    }

    /// Maps a point from the unit-circle frame back to the plane.
    #[must_use]
    pub fn from_unit(&self, u: &Vec2) -> Vec2 {
        let local = Vec2::new(&u.x * &self.rx, &u.y * &self.ry);
        &local.rotated(&self.cos_phi, &self.sin_phi) + &self.center
    }

    /// Ellipse angle (degrees) of a point on or near the ellipse.
    #[must_use]
    pub fn angle_of(&self, p: &Vec2) -> Real {
        let u = self.to_unit(p);
        Real::atan2_deg(&u.y, &u.x)
    }

    /// Offset of `theta` from the start angle along the traversal direction,
    /// with whole turns chosen to land in or nearest to the sweep.
    ///
    /// Returns the offset in degrees and the whole-turn shift applied.
    fn angular_offset(&self, theta: &Real, ctx: &Context) -> (Decimal, Decimal) {
        let eps = ctx.epsilon();
        let forward = ctx.sign(&self.dtheta) != Ordering::Less;
        let raw = ctx.value(&(theta - &self.theta0));
        let v = if forward { raw } else { -raw };
        let sweep = ctx.value(&self.dtheta).abs();
        let full = dec(360);
        let mut shift = Decimal::new(decimal::turns(&v) * -360, 0);
        let mut w = &v + &shift;
        if w > &full - eps {
            w = &w - &full;
            shift = &shift - &full;
        }
        if w > &sweep + eps && &full - &w < &w - &sweep {
            w = &w - &full;
            shift = &shift - &full;
        }
        (w, shift)
    }

    /// Whether the angle `theta` lies on the arc's sweep.
    #[must_use]
    pub fn contains_angle(&self, theta: &Real, ctx: &Context) -> bool {
        let eps = ctx.epsilon();
        let sweep = ctx.value(&self.dtheta).abs();
        if sweep >= dec(360) - eps {
            return true;
        }
        let (w, _) = self.angular_offset(theta, ctx);
        w >= -eps.clone() && w <= &sweep + eps
    }

    /// Parameter in `[0, 1]` (or just outside) of the angle `theta`.
    #[must_use]
    pub fn param_of_angle(&self, theta: &Real, ctx: &Context) -> Real {
        let (_, shift) = self.angular_offset(theta, ctx);
        let forward = ctx.sign(&self.dtheta) != Ordering::Less;
        let shift = if forward { shift } else { -shift };
        (theta - &self.theta0 + ctx.real(&shift)) / &self.dtheta
    }

    /// Whether the arc bulges away from the interior of an outline with the
    /// given orientation.
    #[must_use]
    pub fn locally_convex(&self, outline_ccw: bool, ctx: &Context) -> bool {
        self.is_ccw(ctx) == outline_ccw
    }

    /// Offset by changing both radii by the same amount.
    ///
    /// A positive `distance` moves toward the interior of an outline with
    /// the given orientation. Returns `None` if a radius would become
    /// non-positive.
    #[must_use]
    pub fn offset(&self, distance: &Real, outline_ccw: bool, ctx: &Context) -> Option<Self> {
        let delta = if self.locally_convex(outline_ccw, ctx) {
            -distance
        } else {
            distance.clone()
        };
        let rx = &self.rx + &delta;
        let ry = &self.ry + &delta;
        if ctx.sign(&rx) != Ordering::Greater || ctx.sign(&ry) != Ordering::Greater {
            return None;
        }
        let mut arc = Self {
            rx,
            ry,
            ..self.clone()
        };
        arc.start = arc.point_at_angle(&arc.theta0);
        arc.end = arc.point_at_angle(&arc.theta1());
        Some(arc)
    }

    /// Same arc with the given endpoints, which must lie on the ellipse at
    /// the angles `theta_start` and `theta_start + dtheta`.
    #[must_use]
    pub fn trimmed(&self, start: (Vec2, Real), end: (Vec2, Real)) -> Self {
        Self {
            theta0: start.1.clone(),
            dtheta: &end.1 - &start.1,
            start: start.0,
            end: end.0,
            ..self.clone()
        }
    }

    /// Same arc traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            theta0: self.theta1(),
            dtheta: -&self.dtheta,
            start: self.end.clone(),
            end: self.start.clone(),
            ..self.clone()
        }
    }

    /// Converts all values into `ctx`'s representation.
    #[must_use]
    pub fn adopt(&self, ctx: &Context) -> Self {
        Self {
            center: self.center.adopt(ctx),
            rx: ctx.adopt(&self.rx),
            ry: ctx.adopt(&self.ry),
            phi: ctx.adopt(&self.phi),
            cos_phi: ctx.adopt(&self.cos_phi),
            sin_phi: ctx.adopt(&self.sin_phi),
            theta0: ctx.adopt(&self.theta0),
            dtheta: ctx.adopt(&self.dtheta),
            start: self.start.adopt(ctx),
            end: self.end.adopt(ctx),
        }
    }
}
