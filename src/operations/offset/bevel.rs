#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::curve::{round_point, Curve, LineCurve};
use crate::geometry::{Outline, Point, Vector};
use crate::math::{Context, Decimal, Vec2};

use super::assemble;
use super::candidate::Candidates;
use super::join::Joint;

/// Surface shape of a bevel region.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BevelKind {
    /// Planar facet. The normal is the unit vector pointing out of the
    /// outline across the facet's offset-side edge.
    Flat { outward_normal: Vector },
    /// Facet swept along an arc of the original outline.
    Curved {
        center: Point,
        rx: Decimal,
        ry: Decimal,
        rotation: Decimal,
        /// Whether the arc bulges away from the outline's interior.
        locally_convex: bool,
    },
}

/// One closed patch of the band between an outline and its offset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BevelRegion {
    pub outline: Outline,
    pub kind: BevelKind,
}

fn outward(direction: &Vec2, outline_ccw: bool, ctx: &Context) -> Option<Vector> {
    let unit = direction.normalized(ctx)?;
    let normal = if outline_ccw {
        unit.right_normal()
    } else {
        unit.left_normal()
    };
    Some(Vector::new(ctx.round(&normal.x), ctx.round(&normal.y)))
}

/// Closed polygon through the rounded points with repeats removed;
/// `None` if fewer than three distinct points remain.
fn polygon(points: &[&Vec2], ctx: &Context) -> Option<Outline> {
    let mut rounded: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        let p = round_point(p, ctx);
        if rounded.last() != Some(&p) {
            rounded.push(p);
        }
    }
    while rounded.len() > 1 && rounded.first() == rounded.last() {
        rounded.pop();
    }
    (rounded.len() >= 3).then(|| Outline::polygon(&rounded))
}

/// Triangles fanning from the original vertex over a joint's connector.
fn vertex_regions(vertex: &Vec2, joint: &Joint, outline_ccw: bool, ctx: &Context) -> Vec<BevelRegion> {
    joint
        .chain
        .windows(2)
        .filter_map(|w| {
            let outline = polygon(&[vertex, &w[1], &w[0]], ctx)?;
            let outward_normal = outward(&(&w[1] - &w[0]), outline_ccw, ctx)?;
            Some(BevelRegion {
                outline,
                kind: BevelKind::Flat { outward_normal },
            })
        })
        .collect()
}

/// The quad between an original segment and its trimmed offset.
fn segment_region(
    original: &Curve,
    offset: &Curve,
    enter: &Joint,
    leave: &Joint,
    outline_ccw: bool,
    ctx: &Context,
) -> Option<BevelRegion> {
    let (off_start, off_end) = (enter.last(), leave.first());
    match original {
        Curve::Line(line) => {
            let outline = polygon(&[line.start(), line.end(), off_end, off_start], ctx)?;
            let outward_normal = outward(&line.delta(), outline_ccw, ctx)?;
            Some(BevelRegion {
                outline,
                kind: BevelKind::Flat { outward_normal },
            })
        }
        Curve::Arc(arc) => {
            let back = offset
                .between((off_start, &enter.next_t), (off_end, &leave.prev_t), ctx)
                .map(|piece| piece.reversed())
                .or_else(|| LineCurve::new(off_end.clone(), off_start.clone(), ctx).map(Curve::Line));
            let curves: Vec<Curve> = std::iter::once(original.clone())
                .chain(LineCurve::new(arc.end().clone(), off_end.clone(), ctx).map(Curve::Line))
                .chain(back)
                .chain(LineCurve::new(off_start.clone(), arc.start().clone(), ctx).map(Curve::Line))
                .collect();
            let segments = assemble::close(&curves, ctx);
            (segments.len() >= 2).then(|| BevelRegion {
                outline: Outline::new(segments),
                kind: BevelKind::Curved {
                    center: round_point(arc.center(), ctx),
                    rx: ctx.round(arc.rx()),
                    ry: ctx.round(arc.ry()),
                    rotation: ctx.round(arc.phi()),
                    locally_convex: arc.locally_convex(outline_ccw, ctx),
                },
            })
        }
    }
}

/// Splits the band between the outline and its joined offset into
/// closed regions.
///
/// Regions follow the outline's traversal: for every candidate, first the
/// triangles of the joint leading into it, then the quad along it.
/// Segments whose offset vanished contribute no quad.
pub(crate) fn regions(cands: &Candidates, joints: &[Joint], ctx: &Context) -> Vec<BevelRegion> {
    let n = cands.items.len();
    let mut out = Vec::with_capacity(n * 2);
    for (k, cand) in cands.items.iter().enumerate() {
        let prev = &cands.items[(k + n - 1) % n];
        let vertex = prev.original.end().adopt(ctx);
        out.extend(vertex_regions(&vertex, &joints[k], cands.outline_ccw, ctx));
        out.extend(segment_region(
            &cand.original.adopt(ctx),
            &cand.offset.adopt(ctx),
            &joints[k],
            &joints[(k + 1) % n],
            cands.outline_ccw,
            ctx,
        ));
    }
    out
}
