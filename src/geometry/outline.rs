use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use bigdecimal::RoundingMode;
use num_traits::{FromPrimitive, Signed, ToPrimitive};

use crate::error::{GeometryError, Result};
use crate::math::{decimal, Context, Decimal, Point2, Precision, Real};

use super::curve::{ArcCurve, Curve};
use super::point::Point;
use super::segment::Segment;

/// Traversal direction of a closed outline in a y-up frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
}

impl Orientation {
    /// Whether this is counter-clockwise.
    #[must_use]
    pub fn is_ccw(self) -> bool {
        self == Self::CounterClockwise
    }
}

/// A closed loop of segments.
///
/// Each segment's `to` must equal the next segment's `from`, and the last
/// segment's `to` must equal the first segment's `from`. Construction does
/// not check this; [`Outline::validate`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outline {
    segments: Vec<Segment>,
}

impl Outline {
    /// Creates an outline from segments without validation.
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Closed polygon through `points`.
    #[must_use]
    pub fn polygon(points: &[Point]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| Segment::Line {
                from: points[i].clone(),
                to: points[(i + 1) % n].clone(),
            })
            .collect();
        Self { segments }
    }

    /// The segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the outline has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Start points of all segments.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point> {
        self.segments.iter().map(|s| s.from().clone()).collect()
    }

    /// Whether consecutive segments share endpoints, cyclically.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closure_gap().is_none() && !self.is_empty()
    }

    fn closure_gap(&self) -> Option<usize> {
        let n = self.segments.len();
        (0..n).find(|&i| self.segments[i].to() != self.segments[(i + 1) % n].from())
    }

    /// Checks that the outline can be offset.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::EmptyOutline`, `GeometryError::UnsupportedSegment`
    /// for the first curve segment, or `GeometryError::NotClosed` for the
    /// first broken joint.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(GeometryError::EmptyOutline.into());
        }
        if let Some((index, segment)) = self
            .segments
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_supported())
        {
            return Err(GeometryError::UnsupportedSegment {
                index,
                kind: segment.kind_name(),
            }
            .into());
        }
        if let Some(index) = self.closure_gap() {
            return Err(GeometryError::NotClosed { index }.into());
        }
        Ok(())
    }

    /// Evaluation forms of all segments; segments without extent are `None`.
    pub(crate) fn curves(&self, ctx: &Context) -> Result<Vec<Option<Curve>>> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| Curve::from_segment(s, i, ctx))
            .collect()
    }

    /// Signed area of the curves' enclosed region (positive when counter-clockwise).
    pub(crate) fn signed_area_of(curves: &[Curve], ctx: &Context) -> Real {
        curves
            .iter()
            .fold(ctx.int(0), |acc, c| acc + c.area_term(ctx))
    }

    /// Signed enclosed area, positive for counter-clockwise traversal.
    ///
    /// Arcs contribute their exact elliptical sector.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid precision or an invalid outline.
    pub fn signed_area(&self, precision: Precision) -> Result<Decimal> {
        precision.validate()?;
        self.validate()?;
        let ctx = Context::new(precision, false);
        let curves: Vec<Curve> = self.curves(&ctx)?.into_iter().flatten().collect();
        Ok(ctx.round(&Self::signed_area_of(&curves, &ctx)))
    }

    /// Traversal direction derived from the signed area.
    ///
    /// # Errors
    ///
    /// Same as [`Outline::signed_area`].
    pub fn orientation(&self, precision: Precision) -> Result<Orientation> {
        let area = self.signed_area(precision)?;
        Ok(if area.cmp(&Decimal::from(0)) == Ordering::Greater {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        })
    }

    /// Same outline traversed backwards.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            segments: self.segments.iter().rev().map(Segment::reversed).collect(),
        }
    }

    /// Converts this outline to a closed `f64` polyline by subdividing arcs.
    ///
    /// `tolerance` is the maximum deviation between an arc and its chords.
    /// The first point is not repeated at the end. Unsupported segments
    /// contribute their endpoints only.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point2> {
        let precision = Precision {
            baseline: 17,
            additional: 3,
        };
        let ctx = Context::new(precision, false);
        let tolerance = Decimal::from_f64(tolerance)
            .filter(|t| t.is_positive())
            .map(|t| ctx.real(&t));
        let mut points = Vec::with_capacity(self.segments.len() * 2);
        for (i, segment) in self.segments.iter().enumerate() {
            points.push(segment.from().to_point2());
            let Ok(Some(Curve::Arc(arc))) = Curve::from_segment(segment, i, &ctx) else {
                continue;
            };
            let n_sub = chord_count(&arc, tolerance.as_ref(), &ctx);
            for j in 1..n_sub {
                let t = decimal::div(&Decimal::from(j), &Decimal::from(n_sub), 20);
                let (x, y) = arc.point_at(&ctx.real(&t)).to_f64(&ctx);
                points.push(Point2::new(x, y));
            }
        }
        points
    }
}

/// Number of equal-angle chords that each stay within `tolerance` of
/// `arc`, measured on the larger radius.
fn chord_count(arc: &ArcCurve, tolerance: Option<&Real>, ctx: &Context) -> u32 {
    let Some(tolerance) = tolerance else {
        return 1;
    };
    let radius = if ctx.lt(arc.rx(), arc.ry()) { arc.ry() } else { arc.rx() };
    if ctx.is_zero(radius) || ctx.is_zero(arc.dtheta()) {
        return 1;
    }
    // A chord over `2α` rises `r (1 - cos α)` above the arc.
    let one = ctx.int(1);
    let cos_half = &one - tolerance / radius;
    let half_step = if ctx.sign(&cos_half) == Ordering::Greater {
        Real::atan2_deg(&(&one - cos_half.square()).sqrt(), &cos_half)
    } else {
        ctx.int(90)
    };
    let steps = decimal::div(
        &ctx.value(arc.dtheta()).abs(),
        &ctx.value(&(half_step * ctx.int(2))),
        ctx.precision().full(),
    );
    steps
        .with_scale_round(0, RoundingMode::Ceiling)
        .to_u32()
        .map_or(1, |n| n.max(1))
}
