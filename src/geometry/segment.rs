#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::{Context, Decimal, Mode, Precision};

use super::curve::{round_point, Curve};
use super::outline::Orientation;
use super::point::{Point, Vector};

/// One building block of an outline.
///
/// Arcs use the endpoint parameterization with the rotation in degrees.
/// Quadratic and cubic curves can be represented but are rejected by every
/// offsetting operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Segment {
    Line {
        from: Point,
        to: Point,
    },
    Arc {
        from: Point,
        to: Point,
        rx: Decimal,
        ry: Decimal,
        x_axis_rotation: Decimal,
        large_arc: bool,
        sweep: bool,
    },
    Quadratic {
        from: Point,
        control: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        control1: Point,
        control2: Point,
        to: Point,
    },
}

impl Segment {
    /// Straight segment.
    #[must_use]
    pub fn line(from: impl Into<Point>, to: impl Into<Point>) -> Self {
        Self::Line {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Elliptical arc.
    #[must_use]
    pub fn arc(
        from: impl Into<Point>,
        to: impl Into<Point>,
        rx: Decimal,
        ry: Decimal,
        x_axis_rotation: Decimal,
        large_arc: bool,
        sweep: bool,
    ) -> Self {
        Self::Arc {
            from: from.into(),
            to: to.into(),
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
        }
    }

    /// Circular arc.
    #[must_use]
    pub fn circular_arc(
        from: impl Into<Point>,
        to: impl Into<Point>,
        radius: Decimal,
        large_arc: bool,
        sweep: bool,
    ) -> Self {
        Self::arc(from, to, radius.clone(), radius, Decimal::from(0), large_arc, sweep)
    }

    /// Start point.
    #[must_use]
    pub fn from(&self) -> &Point {
        match self {
            Self::Line { from, .. }
            | Self::Arc { from, .. }
            | Self::Quadratic { from, .. }
            | Self::Cubic { from, .. } => from,
        }
    }

    /// End point.
    #[must_use]
    pub fn to(&self) -> &Point {
        match self {
            Self::Line { to, .. }
            | Self::Arc { to, .. }
            | Self::Quadratic { to, .. }
            | Self::Cubic { to, .. } => to,
        }
    }

    /// Name of the segment kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Arc { .. } => "arc",
            Self::Quadratic { .. } => "quadratic",
            Self::Cubic { .. } => "cubic",
        }
    }

    /// Whether the offsetting engine accepts this segment kind.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Line { .. } | Self::Arc { .. })
    }

    /// Same segment traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self.clone() {
            Self::Line { from, to } => Self::Line { from: to, to: from },
            Self::Arc {
                from,
                to,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
            } => Self::Arc {
                from: to,
                to: from,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep: !sweep,
            },
            Self::Quadratic { from, control, to } => Self::Quadratic {
                from: to,
                control,
                to: from,
            },
            Self::Cubic {
                from,
                control1,
                control2,
                to,
            } => Self::Cubic {
                from: to,
                control1: control2,
                control2: control1,
                to: from,
            },
        }
    }

    fn curve(&self, ctx: &Context) -> Result<Curve> {
        Curve::from_segment(self, 0, ctx)?.ok_or_else(|| {
            GeometryError::Degenerate(format!("{} segment has no extent", self.kind_name())).into()
        })
    }

    /// Point at `t` in `[0, 1]`: linear interpolation for lines, the
    /// center-parameterized angle sweep for arcs.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid precision or an unsupported segment kind.
    pub fn point_at(&self, t: &Decimal, precision: Precision) -> Result<Point> {
        precision.validate()?;
        let ctx = Context::new(precision, false);
        match Curve::from_segment(self, 0, &ctx)? {
            Some(curve) => Ok(round_point(&curve.point_at(&ctx.real(t)), &ctx)),
            None => Ok(self.from().clone()),
        }
    }

    /// Unit tangent along the traversal direction at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid precision, an unsupported segment kind
    /// or a segment without extent.
    pub fn tangent_at(&self, t: &Decimal, precision: Precision) -> Result<Vector> {
        precision.validate()?;
        let ctx = Context::new(precision, false);
        let tangent = self
            .curve(&ctx)?
            .unit_tangent_at(&ctx.real(t), &ctx)
            .ok_or_else(|| GeometryError::Degenerate("zero tangent".to_owned()))?;
        Ok(Vector::new(ctx.round(&tangent.x), ctx.round(&tangent.y)))
    }

    /// Unit normal at `t` pointing into an outline of the given orientation.
    ///
    /// A positive offset distance moves the segment along this normal.
    ///
    /// # Errors
    ///
    /// Same as [`Segment::tangent_at`].
    pub fn normal_at(
        &self,
        t: &Decimal,
        orientation: Orientation,
        precision: Precision,
    ) -> Result<Vector> {
        precision.validate()?;
        let ctx = Context::new(precision, false);
        let normal = self
            .curve(&ctx)?
            .inward_normal_at(&ctx.real(t), orientation.is_ccw(), &ctx)
            .ok_or_else(|| GeometryError::Degenerate("zero tangent".to_owned()))?;
        Ok(Vector::new(ctx.round(&normal.x), ctx.round(&normal.y)))
    }

    /// Offset candidate of this segment at `distance` toward the interior
    /// of an outline with the given orientation.
    ///
    /// Lines are translated along their normal. Arcs keep center, rotation
    /// and angular positions while both radii change by `distance`; this is
    /// exact for circular arcs only. Returns `Ok(None)` when the candidate
    /// degenerates (zero-length line, non-positive radius).
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid precision or an unsupported segment kind.
    pub fn offset_candidate(
        &self,
        distance: &Decimal,
        orientation: Orientation,
        precision: Precision,
        mode: Mode,
    ) -> Result<Option<Segment>> {
        precision.validate()?;
        let ctx = Context::new(precision, mode.symbolic_segments());
        let Some(curve) = Curve::from_segment(self, 0, &ctx)? else {
            return Ok(None);
        };
        let Some(offset) = curve.offset(&ctx.real(distance), orientation.is_ccw(), &ctx) else {
            return Ok(None);
        };
        let from = round_point(offset.start(), &ctx);
        let to = round_point(offset.end(), &ctx);
        Ok(Some(offset.to_segment(from, to, &ctx)))
    }
}
