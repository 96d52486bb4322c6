use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::curve::{ArcCurve, Curve, LineCurve};
use crate::math::intersect_2d::{collinear, ellipse_ellipse, line_ellipse, line_line, same_ellipse};
use crate::math::{Context, Real, Vec2};

use super::candidate::{Candidate, Candidates};

/// How two consecutive offset candidates were connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinKind {
    /// The candidates already share the endpoint.
    Meet,
    /// Two lines meet at the intersection of their supports.
    Miter,
    /// A tangent ray at an arc end reaches the other candidate.
    Extension,
    /// The candidates cross within their ranges.
    Crossing,
    /// Both ends are extended and connected by a straight connector.
    Around,
}

/// Connection between an incoming and an outgoing candidate.
///
/// `chain` runs from the point where the incoming candidate now ends to
/// the point where the outgoing one now starts; consecutive chain points
/// are connected by straight lines.
#[derive(Debug, Clone)]
pub(crate) struct Joint {
    pub kind: JoinKind,
    /// Parameter at which the incoming candidate ends.
    pub prev_t: Real,
    /// Parameter at which the outgoing candidate starts.
    pub next_t: Real,
    pub chain: Vec<Vec2>,
}

impl Joint {
    fn at(kind: JoinKind, prev_t: Real, next_t: Real, point: Vec2) -> Self {
        Self {
            kind,
            prev_t,
            next_t,
            chain: vec![point],
        }
    }

    /// Point where the incoming candidate ends.
    pub fn first(&self) -> &Vec2 {
        &self.chain[0]
    }

    /// Point where the outgoing candidate starts.
    pub fn last(&self) -> &Vec2 {
        &self.chain[self.chain.len() - 1]
    }
}

/// Joins the offsets of two consecutive candidates.
///
/// `reach` is the absolute offset distance; it sets how far ends are
/// extended for an around join. All decisions use `ctx`.
///
/// # Errors
///
/// Returns `OperationError::AmbiguousIntersection` when two line
/// candidates overlap on a common support.
pub(crate) fn join(prev: &Candidate, next: &Candidate, reach: &Real, ctx: &Context) -> Result<Joint> {
    let a = prev.offset.adopt(ctx);
    let b = next.offset.adopt(ctx);
    let joint = if a.end().approx_eq(b.start(), ctx) {
        Joint::at(JoinKind::Meet, ctx.int(1), ctx.int(0), a.end().clone())
    } else {
        let vertex = prev.original.end().adopt(ctx);
        let found = match (&a, &b) {
            (Curve::Line(la), Curve::Line(lb)) => line_to_line(la, lb, ctx)?,
            (Curve::Line(la), Curve::Arc(ab)) => line_to_arc(la, ab, &vertex, ctx)?,
            (Curve::Arc(aa), Curve::Line(lb)) => arc_to_line(aa, lb, &vertex, ctx)?,
            (Curve::Arc(aa), Curve::Arc(ab)) => arc_to_arc(aa, ab, &vertex, ctx)?,
        };
        match found {
            Some(joint) => joint,
            None => around(&a, &b, reach, ctx)?,
        }
    };
    trace!(
        "Joined segment {} to segment {}: {:?}",
        prev.index,
        next.index,
        joint.kind
    );
    Ok(joint)
}

/// Joins every candidate to its successor; `joints[k]` leads into
/// candidate `k`.
///
/// A candidate whose joints cross over each other has no room left at this
/// distance. It is dropped and its neighbors are joined directly, until
/// every remaining candidate keeps a forward piece.
///
/// # Errors
///
/// Returns `OperationError::DegenerateOutline` if fewer than two candidates
/// remain, and propagates errors of [`join`].
pub(crate) fn join_all(cands: &mut Candidates, reach: &Real, ctx: &Context) -> Result<Vec<Joint>> {
    loop {
        let items = &cands.items;
        let n = items.len();
        if n < 2 {
            return Err(OperationError::DegenerateOutline(
                "every segment collapses at this distance".to_owned(),
            )
            .into());
        }
        let joints = (0..n)
            .map(|k| join(&items[(k + n - 1) % n], &items[k], reach, ctx))
            .collect::<Result<Vec<_>>>()?;
        let inverted: Vec<usize> = (0..n)
            .filter(|&k| ctx.lt(&joints[(k + 1) % n].prev_t, &joints[k].next_t))
            .collect();
        if inverted.is_empty() {
            return Ok(joints);
        }
        for &k in inverted.iter().rev() {
            debug!("Dropping segment {} whose offset turns around", cands.items[k].index);
            cands.items.remove(k);
        }
    }
}

/// Picks the candidate point nearest to `vertex`.
fn nearest<T>(items: Vec<(Vec2, T)>, vertex: &Vec2, ctx: &Context) -> Option<(Vec2, T)> {
    items.into_iter().min_by(|(p, _), (q, _)| {
        ctx.cmp(&(p - vertex).norm_squared(), &(q - vertex).norm_squared())
    })
}

fn direction(tangent: &Vec2, ctx: &Context) -> Result<Vec2> {
    tangent.normalized(ctx).ok_or_else(|| {
        OperationError::DegenerateOutline("offset segment without direction".to_owned()).into()
    })
}

fn line_to_line(a: &LineCurve, b: &LineCurve, ctx: &Context) -> Result<Option<Joint>> {
    if collinear(a, b, ctx) {
        // Only reachable once a candidate between them was dropped.
        let t = a.param_of(b.start());
        if ctx.le(&ctx.int(1), &t) {
            return Ok(Some(Joint {
                kind: JoinKind::Around,
                prev_t: ctx.int(1),
                next_t: ctx.int(0),
                chain: vec![a.end().clone(), b.start().clone()],
            }));
        }
        return Err(OperationError::AmbiguousIntersection(
            "consecutive offset lines overlap".to_owned(),
        )
        .into());
    }
    Ok(line_line(a, b, ctx)?
        .filter(|c| ctx.le(&ctx.int(0), &c.on_a) && ctx.le(&c.on_b, &ctx.int(1)))
        .map(|c| Joint::at(JoinKind::Miter, c.on_a, c.on_b, c.point)))
}

fn line_to_arc(a: &LineCurve, b: &ArcCurve, vertex: &Vec2, ctx: &Context) -> Result<Option<Joint>> {
    let zero = ctx.int(0);
    let start = b.start();
    let backward = -&direction(&b.tangent_at(&zero, ctx), ctx)?;
    if let Some(ray) = LineCurve::new(start.clone(), start + &backward, ctx) {
        if collinear(a, &ray, ctx) {
            let t = a.param_of(start);
            if ctx.le(&zero, &t) {
                return Ok(Some(Joint::at(JoinKind::Extension, t, zero, start.clone())));
            }
        } else if let Some(c) = line_line(a, &ray, ctx)? {
            if ctx.le(&zero, &c.on_a) && ctx.lt(&zero, &c.on_b) {
                return Ok(Some(Joint {
                    kind: JoinKind::Extension,
                    prev_t: c.on_a,
                    next_t: zero,
                    chain: vec![c.point, start.clone()],
                }));
            }
        }
    }

    let crossings = line_ellipse(a, b, ctx)
        .into_iter()
        .filter(|c| ctx.le(&zero, &c.on_a) && b.contains_angle(&c.on_b, ctx))
        .map(|c| (c.point, (c.on_a, b.param_of_angle(&c.on_b, ctx))))
        .collect();
    Ok(nearest(crossings, vertex, ctx)
        .map(|(point, (t, u))| Joint::at(JoinKind::Crossing, t, u, point)))
}

fn arc_to_line(a: &ArcCurve, b: &LineCurve, vertex: &Vec2, ctx: &Context) -> Result<Option<Joint>> {
    let zero = ctx.int(0);
    let one = ctx.int(1);
    let end = a.end();
    let forward = direction(&a.tangent_at(&one, ctx), ctx)?;
    if let Some(ray) = LineCurve::new(end.clone(), end + &forward, ctx) {
        if collinear(b, &ray, ctx) {
            let t = b.param_of(end);
            if ctx.le(&t, &one) {
                return Ok(Some(Joint::at(JoinKind::Extension, one, t, end.clone())));
            }
        } else if let Some(c) = line_line(b, &ray, ctx)? {
            if ctx.le(&c.on_a, &one) && ctx.lt(&zero, &c.on_b) {
                return Ok(Some(Joint {
                    kind: JoinKind::Extension,
                    prev_t: one,
                    next_t: c.on_a,
                    chain: vec![end.clone(), c.point],
                }));
            }
        }
    }

    let crossings = line_ellipse(b, a, ctx)
        .into_iter()
        .filter(|c| ctx.le(&c.on_a, &one) && a.contains_angle(&c.on_b, ctx))
        .map(|c| (c.point, (a.param_of_angle(&c.on_b, ctx), c.on_a)))
        .collect();
    Ok(nearest(crossings, vertex, ctx)
        .map(|(point, (t, u))| Joint::at(JoinKind::Crossing, t, u, point)))
}

fn arc_to_arc(a: &ArcCurve, b: &ArcCurve, vertex: &Vec2, ctx: &Context) -> Result<Option<Joint>> {
    let zero = ctx.int(0);
    let one = ctx.int(1);
    if !same_ellipse(a, b, ctx) {
        let crossings = ellipse_ellipse(a, b, ctx)
            .into_iter()
            .filter(|c| a.contains_angle(&c.on_a, ctx) && b.contains_angle(&c.on_b, ctx))
            .map(|c| {
                let params = (a.param_of_angle(&c.on_a, ctx), b.param_of_angle(&c.on_b, ctx));
                (c.point, params)
            })
            .collect();
        if let Some((point, (t, u))) = nearest(crossings, vertex, ctx) {
            return Ok(Some(Joint::at(JoinKind::Crossing, t, u, point)));
        }
    }

    let (end, start) = (a.end(), b.start());
    let forward = direction(&a.tangent_at(&one, ctx), ctx)?;
    let backward = -&direction(&b.tangent_at(&zero, ctx), ctx)?;
    let rays = (
        LineCurve::new(end.clone(), end + &forward, ctx),
        LineCurve::new(start.clone(), start + &backward, ctx),
    );
    if let (Some(ray_a), Some(ray_b)) = rays {
        if !collinear(&ray_a, &ray_b, ctx) {
            if let Some(c) = line_line(&ray_a, &ray_b, ctx)? {
                if ctx.lt(&zero, &c.on_a) && ctx.lt(&zero, &c.on_b) {
                    return Ok(Some(Joint {
                        kind: JoinKind::Extension,
                        prev_t: one,
                        next_t: zero,
                        chain: vec![end.clone(), c.point, start.clone()],
                    }));
                }
            }
        }
    }
    Ok(None)
}

/// Extends both ends by `reach` along their tangents and bridges the gap.
///
/// Lines are lengthened to the extended point; arcs keep their endpoint
/// and the extension becomes part of the bridge.
fn around(a: &Curve, b: &Curve, reach: &Real, ctx: &Context) -> Result<Joint> {
    let zero = ctx.int(0);
    let one = ctx.int(1);
    let ante = a.end() + &direction(&a.tangent_at(&one, ctx), ctx)?.scaled(reach);
    let post = b.start() - &direction(&b.tangent_at(&zero, ctx), ctx)?.scaled(reach);

    let mut chain = Vec::with_capacity(4);
    let prev_t = match a {
        Curve::Line(l) => &one + &(reach / l.delta().norm()),
        Curve::Arc(_) => {
            chain.push(a.end().clone());
            one
        }
    };
    chain.push(ante);
    chain.push(post);
    let next_t = match b {
        Curve::Line(l) => -(reach / l.delta().norm()),
        Curve::Arc(_) => {
            chain.push(b.start().clone());
            zero
        }
    };
    Ok(Joint {
        kind: JoinKind::Around,
        prev_t,
        next_t,
        chain,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::ArcEndpoints;
    use crate::math::decimal::Decimal;
    use crate::math::Precision;
    use std::str::FromStr;

    fn ctx() -> Context {
        Context::new(Precision::default(), false)
    }

    fn num(ctx: &Context, s: &str) -> Real {
        ctx.real(&Decimal::from_str(s).unwrap())
    }

    fn v(ctx: &Context, x: &str, y: &str) -> Vec2 {
        Vec2::new(num(ctx, x), num(ctx, y))
    }

    fn line(ctx: &Context, p: (&str, &str), q: (&str, &str)) -> Curve {
        Curve::Line(LineCurve::new(v(ctx, p.0, p.1), v(ctx, q.0, q.1), ctx).unwrap())
    }

    fn arc(ctx: &Context, p: (&str, &str), q: (&str, &str), r: &str, sweep: bool) -> Curve {
        Curve::Arc(
            ArcCurve::from_endpoints(
                &ArcEndpoints {
                    from: v(ctx, p.0, p.1),
                    to: v(ctx, q.0, q.1),
                    rx: num(ctx, r),
                    ry: num(ctx, r),
                    x_axis_rotation: ctx.int(0),
                    large_arc: false,
                    sweep,
                },
                ctx,
            )
            .unwrap(),
        )
    }

    fn candidate(index: usize, original: Curve, offset: Curve) -> Candidate {
        Candidate {
            index,
            original,
            offset,
        }
    }

    fn assert_point(ctx: &Context, p: &Vec2, x: &str, y: &str) {
        assert_eq!(ctx.round(&p.x), Decimal::from_str(x).unwrap(), "x of {p:?}");
        assert_eq!(ctx.round(&p.y), Decimal::from_str(y).unwrap(), "y of {p:?}");
    }

    #[test]
    fn square_corner_is_a_miter() {
        let ctx = ctx();
        let prev = candidate(0, line(&ctx, ("0", "0"), ("10", "0")), line(&ctx, ("0", "1"), ("10", "1")));
        let next = candidate(1, line(&ctx, ("10", "0"), ("10", "10")), line(&ctx, ("9", "0"), ("9", "10")));
        let joint = join(&prev, &next, &ctx.int(1), &ctx).unwrap();
        assert_eq!(joint.kind, JoinKind::Miter);
        assert_point(&ctx, joint.first(), "9", "1");
        assert_eq!(ctx.round(&joint.prev_t), Decimal::from_str("0.9").unwrap());
        assert_eq!(ctx.round(&joint.next_t), Decimal::from_str("0.1").unwrap());
    }

    #[test]
    fn reversal_goes_around() {
        // Spike (2,1) -> (1,1) -> (2,1) offset by 0.1 to either side.
        let ctx = ctx();
        let prev = candidate(
            0,
            line(&ctx, ("2", "1"), ("1", "1")),
            line(&ctx, ("2", "0.9"), ("1", "0.9")),
        );
        let next = candidate(
            1,
            line(&ctx, ("1", "1"), ("2", "1")),
            line(&ctx, ("1", "1.1"), ("2", "1.1")),
        );
        let joint = join(&prev, &next, &num(&ctx, "0.1"), &ctx).unwrap();
        assert_eq!(joint.kind, JoinKind::Around);
        assert_eq!(joint.chain.len(), 2);
        assert_point(&ctx, joint.first(), "0.9", "0.9");
        assert_point(&ctx, joint.last(), "0.9", "1.1");
        assert_eq!(ctx.round(&joint.prev_t), Decimal::from_str("1.1").unwrap());
        assert_eq!(ctx.round(&joint.next_t), Decimal::from_str("-0.1").unwrap());
    }

    #[test]
    fn line_reaches_arc_through_its_tangent() {
        // Vertical edge x=1 into a quarter circle around (1, 2), offset by 0.1.
        let ctx = ctx();
        let prev = candidate(
            0,
            line(&ctx, ("1", "0"), ("1", "1")),
            line(&ctx, ("0.9", "0"), ("0.9", "1")),
        );
        let next = candidate(
            1,
            arc(&ctx, ("1", "1"), ("2", "2"), "1", true),
            arc(&ctx, ("1", "1.1"), ("1.9", "2"), "0.9", true),
        );
        let joint = join(&prev, &next, &num(&ctx, "0.1"), &ctx).unwrap();
        assert_eq!(joint.kind, JoinKind::Extension);
        assert_point(&ctx, joint.first(), "0.9", "1.1");
        assert_point(&ctx, joint.last(), "1", "1.1");
    }

    #[test]
    fn arc_reaches_line_through_its_tangent() {
        let ctx = ctx();
        let prev = candidate(
            0,
            arc(&ctx, ("1", "1"), ("2", "2"), "1", true),
            arc(&ctx, ("1", "1.1"), ("1.9", "2"), "0.9", true),
        );
        let next = candidate(
            1,
            line(&ctx, ("2", "2"), ("3", "2")),
            line(&ctx, ("2", "2.1"), ("3", "2.1")),
        );
        let joint = join(&prev, &next, &num(&ctx, "0.1"), &ctx).unwrap();
        assert_eq!(joint.kind, JoinKind::Extension);
        assert_point(&ctx, joint.first(), "1.9", "2");
        assert_point(&ctx, joint.last(), "1.9", "2.1");
        assert_eq!(ctx.round(&joint.next_t), Decimal::from_str("-0.1").unwrap());
    }

    #[test]
    fn line_crosses_concave_arc() {
        // Bottom edge into a clockwise quarter circle around (2, 0), offset by 0.1.
        let ctx = ctx();
        let prev = candidate(
            0,
            line(&ctx, ("0", "0"), ("1", "0")),
            line(&ctx, ("0", "0.1"), ("1", "0.1")),
        );
        let next = candidate(
            1,
            arc(&ctx, ("1", "0"), ("2", "1"), "1", false),
            arc(&ctx, ("0.9", "0"), ("2", "1.1"), "1.1", false),
        );
        let joint = join(&prev, &next, &num(&ctx, "0.1"), &ctx).unwrap();
        assert_eq!(joint.kind, JoinKind::Crossing);
        assert_point(&ctx, joint.first(), "0.9045548849896677730860604344", "0.1");
    }

    #[test]
    fn parallel_arc_tangents_go_around() {
        // Two stacked half circles, offset by 0.1 toward their centers.
        let ctx = ctx();
        let prev = candidate(
            0,
            arc(&ctx, ("0", "0"), ("0", "2"), "1", true),
            arc(&ctx, ("0", "0.1"), ("0", "1.9"), "0.9", true),
        );
        let next = candidate(
            1,
            arc(&ctx, ("0", "2"), ("0", "4"), "1", true),
            arc(&ctx, ("0", "2.1"), ("0", "3.9"), "0.9", true),
        );
        let joint = join(&prev, &next, &num(&ctx, "0.1"), &ctx).unwrap();
        assert_eq!(joint.kind, JoinKind::Around);
        let rounded: Vec<(Decimal, Decimal)> = joint
            .chain
            .iter()
            .map(|p| (ctx.round(&p.x), ctx.round(&p.y)))
            .collect();
        let expected: Vec<(Decimal, Decimal)> = [("0", "1.9"), ("-0.1", "1.9"), ("-0.1", "2.1"), ("0", "2.1")]
            .iter()
            .map(|(x, y)| (Decimal::from_str(x).unwrap(), Decimal::from_str(y).unwrap()))
            .collect();
        assert_eq!(rounded, expected);
    }

    #[test]
    fn shared_endpoint_is_a_meet() {
        let ctx = ctx();
        let prev = candidate(0, line(&ctx, ("0", "0"), ("1", "0")), line(&ctx, ("0", "1"), ("1", "1")));
        let next = candidate(1, line(&ctx, ("1", "0"), ("2", "0")), line(&ctx, ("1", "1"), ("2", "1")));
        let joint = join(&prev, &next, &ctx.int(1), &ctx).unwrap();
        assert_eq!(joint.kind, JoinKind::Meet);
        assert_eq!(joint.chain.len(), 1);
    }
}
