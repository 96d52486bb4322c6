use std::cmp::Ordering;

use crate::error::{OperationError, Result};
use crate::geometry::curve::{round_point, Curve, LineCurve};
use crate::geometry::{Outline, Segment};
use crate::math::Context;

use super::candidate::Candidates;
use super::join::Joint;

/// Trims every candidate to its joints and inserts the connectors.
///
/// `joints[k]` connects candidate `k - 1` to candidate `k`, cyclically.
/// Pieces without extent are left out.
pub(crate) fn pieces(cands: &Candidates, joints: &[Joint], ctx: &Context) -> Vec<Curve> {
    let n = cands.items.len();
    let mut out = Vec::with_capacity(n * 2);
    for (k, cand) in cands.items.iter().enumerate() {
        let (enter, leave) = (&joints[k], &joints[(k + 1) % n]);
        let offset = cand.offset.adopt(ctx);
        out.extend(offset.between(
            (enter.last(), &enter.next_t),
            (leave.first(), &leave.prev_t),
            ctx,
        ));
        out.extend(
            leave
                .chain
                .windows(2)
                .filter_map(|w| LineCurve::new(w[0].clone(), w[1].clone(), ctx).map(Curve::Line)),
        );
    }
    out
}

/// Rounds a closed cycle of curves into segments.
///
/// Each segment runs from the rounded start of its curve to the rounded
/// start of the next one, so the result is closed by construction.
/// Curves that round to a single point are skipped.
pub(crate) fn close(curves: &[Curve], ctx: &Context) -> Vec<Segment> {
    let points: Vec<_> = curves.iter().map(|c| round_point(c.start(), ctx)).collect();
    let n = curves.len();
    (0..n)
        .filter(|&k| points[k] != points[(k + 1) % n])
        .map(|k| curves[k].to_segment(points[k].clone(), points[(k + 1) % n].clone(), ctx))
        .collect()
}

/// Builds the offset outline from pruned pieces.
///
/// # Errors
///
/// Returns `OperationError::DegenerateOutline` if fewer than two segments
/// remain or the pieces no longer run in the outline's direction.
pub(crate) fn outline(pieces: &[Curve], outline_ccw: bool, ctx: &Context) -> Result<Outline> {
    let wanted = if outline_ccw {
        Ordering::Greater
    } else {
        Ordering::Less
    };
    if ctx.sign(&Outline::signed_area_of(pieces, ctx)) != wanted {
        return Err(OperationError::DegenerateOutline(
            "offset turns the outline inside out".to_owned(),
        )
        .into());
    }
    let segments = close(pieces, ctx);
    if segments.len() < 2 {
        return Err(OperationError::DegenerateOutline(format!(
            "offset leaves {} segment(s)",
            segments.len()
        ))
        .into());
    }
    Ok(Outline::new(segments))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::Point;
    use crate::math::{Precision, Vec2};

    fn ctx() -> Context {
        Context::new(Precision::default(), false)
    }

    fn polyline(ctx: &Context, points: &[(i64, i64)]) -> Vec<Curve> {
        let v = |(x, y): (i64, i64)| Vec2::new(ctx.int(x), ctx.int(y));
        (0..points.len())
            .map(|i| {
                let q = points[(i + 1) % points.len()];
                Curve::Line(LineCurve::new(v(points[i]), v(q), ctx).unwrap())
            })
            .collect()
    }

    #[test]
    fn closes_the_cycle() {
        let ctx = ctx();
        let square = polyline(&ctx, &[(1, 1), (9, 1), (9, 9), (1, 9)]);
        let outline = outline(&square, true, &ctx).unwrap();
        assert!(outline.is_closed());
        assert_eq!(
            outline,
            Outline::polygon(&[
                Point::from((1, 1)),
                Point::from((9, 1)),
                Point::from((9, 9)),
                Point::from((1, 9)),
            ])
        );
    }

    #[test]
    fn wrong_direction_is_degenerate() {
        let ctx = ctx();
        let square = polyline(&ctx, &[(1, 1), (9, 1), (9, 9), (1, 9)]);
        let err = outline(&square, false, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateOutline);
    }
}
