mod arc;
mod line;

pub use arc::{ArcCurve, ArcEndpoints};
pub use line::LineCurve;

use crate::error::{GeometryError, Result};
use crate::geometry::point::Point;
use crate::geometry::segment::Segment;
use crate::math::{Context, Real, Vec2};

/// A segment in the form used for evaluation, offsetting and intersection.
#[derive(Debug, Clone)]
pub enum Curve {
    Line(LineCurve),
    Arc(ArcCurve),
}

impl Curve {
    /// Builds the evaluation form of a segment.
    ///
    /// Returns `Ok(None)` for a segment without extent. Arcs with a zero
    /// radius become straight lines.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::UnsupportedSegment` for curve segments.
    pub fn from_segment(segment: &Segment, index: usize, ctx: &Context) -> Result<Option<Self>> {
        let vec = |p: &Point| Vec2::new(ctx.real(&p.x), ctx.real(&p.y));
        match segment {
            Segment::Line { from, to } => Ok(LineCurve::new(vec(from), vec(to), ctx).map(Self::Line)),
            Segment::Arc {
                from,
                to,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
            } => {
                let endpoints = ArcEndpoints {
                    from: vec(from),
                    to: vec(to),
                    rx: ctx.real(rx),
                    ry: ctx.real(ry),
                    x_axis_rotation: ctx.real(x_axis_rotation),
                    large_arc: *large_arc,
                    sweep: *sweep,
                };
                if let Some(arc) = ArcCurve::from_endpoints(&endpoints, ctx) {
                    return Ok(Some(Self::Arc(arc)));
                }
                Ok(LineCurve::new(endpoints.from, endpoints.to, ctx).map(Self::Line))
            }
            Segment::Quadratic { .. } | Segment::Cubic { .. } => {
                Err(GeometryError::UnsupportedSegment {
                    index,
                    kind: segment.kind_name(),
                }
                .into())
            }
        }
    }

    /// Start point.
    #[must_use]
    pub fn start(&self) -> &Vec2 {
        match self {
            Self::Line(l) => l.start(),
            Self::Arc(a) => a.start(),
        }
    }

    /// End point.
    #[must_use]
    pub fn end(&self) -> &Vec2 {
        match self {
            Self::Line(l) => l.end(),
            Self::Arc(a) => a.end(),
        }
    }

    /// Whether this is an arc.
    #[must_use]
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::Arc(_))
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: &Real) -> Vec2 {
        match self {
            Self::Line(l) => l.point_at(t),
            Self::Arc(a) => a.point_at(t),
        }
    }

    /// Tangent along the traversal direction at `t` (not normalized).
    #[must_use]
    pub fn tangent_at(&self, t: &Real, ctx: &Context) -> Vec2 {
        match self {
            Self::Line(l) => l.delta(),
            Self::Arc(a) => a.tangent_at(t, ctx),
        }
    }

    /// Unit tangent at `t`.
    #[must_use]
    pub fn unit_tangent_at(&self, t: &Real, ctx: &Context) -> Option<Vec2> {
        self.tangent_at(t, ctx).normalized(ctx)
    }

    /// Unit normal at `t` pointing into an outline of the given orientation.
    #[must_use]
    pub fn inward_normal_at(&self, t: &Real, outline_ccw: bool, ctx: &Context) -> Option<Vec2> {
        let tangent = self.unit_tangent_at(t, ctx)?;
        Some(if outline_ccw {
            tangent.left_normal()
        } else {
            tangent.right_normal()
        })
    }

    /// Offset candidate at `distance` toward the interior; `None` if it degenerates.
    #[must_use]
    pub fn offset(&self, distance: &Real, outline_ccw: bool, ctx: &Context) -> Option<Self> {
        match self {
            Self::Line(l) => l.offset(distance, outline_ccw, ctx).map(Self::Line),
            Self::Arc(a) => a.offset(distance, outline_ccw, ctx).map(Self::Arc),
        }
    }

    /// Part of this curve between two of its points at parameters `start.1`
    /// and `end.1`; `None` when that part has no extent.
    ///
    /// Parameters outside `[0, 1]` extend lines and are allowed.
    #[must_use]
    pub fn between(&self, start: (&Vec2, &Real), end: (&Vec2, &Real), ctx: &Context) -> Option<Self> {
        match self {
            Self::Line(_) => LineCurve::new(start.0.clone(), end.0.clone(), ctx).map(Self::Line),
            Self::Arc(a) => {
                let piece = a.trimmed(
                    (start.0.clone(), a.angle_at(start.1)),
                    (end.0.clone(), a.angle_at(end.1)),
                );
                (!ctx.is_zero(piece.dtheta())).then_some(Self::Arc(piece))
            }
        }
    }

    /// Same curve traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.reversed()),
            Self::Arc(a) => Self::Arc(a.reversed()),
        }
    }

    /// Converts all values into `ctx`'s representation.
    #[must_use]
    pub fn adopt(&self, ctx: &Context) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.adopt(ctx)),
            Self::Arc(a) => Self::Arc(a.adopt(ctx)),
        }
    }

    /// Contribution `½∮(x dy - y dx)` of this curve to an enclosed area.
    #[must_use]
    pub fn area_term(&self, ctx: &Context) -> Real {
        let half = ctx.real(&crate::math::decimal::half());
        match self {
            Self::Line(l) => l.start().cross(l.end()) * half,
            Self::Arc(a) => {
                let radians = a.dtheta() * &ctx.pi() / ctx.int(180);
                let sector = a.rx() * a.ry() * radians;
                let chord = a.center().cross(&(a.end() - a.start()));
                (sector + chord) * half
            }
        }
    }

    /// Segment through the given rounded endpoints with this curve's shape.
    #[must_use]
    pub fn to_segment(&self, from: Point, to: Point, ctx: &Context) -> Segment {
        match self {
            Self::Line(_) => Segment::Line { from, to },
            Self::Arc(a) => Segment::Arc {
                from,
                to,
                rx: ctx.round(a.rx()),
                ry: ctx.round(a.ry()),
                x_axis_rotation: ctx.round(a.phi()),
                large_arc: a.is_large(ctx),
                sweep: a.is_ccw(ctx),
            },
        }
    }
}

/// Rounds a point for output.
#[must_use]
pub fn round_point(p: &Vec2, ctx: &Context) -> Point {
    Point::new(ctx.round(&p.x), ctx.round(&p.y))
}
