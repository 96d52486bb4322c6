use std::cmp::Ordering;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::curve::{Curve, LineCurve};
use crate::geometry::Outline;
use crate::math::intersect_2d::{collinear, curve_hits, Hit};
use crate::math::{Context, Real, Vec2};

/// A crossing between two non-adjacent pieces.
struct Fold {
    first: usize,
    second: usize,
    hit: Hit,
}

/// Where two collinear lines start to share their support: an endpoint of
/// one that lies strictly inside the other.
fn overlap(a: &LineCurve, b: &LineCurve, ctx: &Context) -> Option<Hit> {
    let zero = ctx.int(0);
    let one = ctx.int(1);
    let interior = |t: &Real| ctx.lt(&zero, t) && ctx.lt(t, &one);
    let hit = |point: &Vec2, t_a: Real, t_b: Real| Hit {
        point: point.clone(),
        t_a,
        t_b,
        tangent: false,
    };
    [(b.start(), ctx.int(0)), (b.end(), ctx.int(1))]
        .into_iter()
        .map(|(p, t_b)| (p, a.param_of(p), t_b))
        .find(|(_, t_a, _)| interior(t_a))
        .map(|(p, t_a, t_b)| hit(p, t_a, t_b))
        .or_else(|| {
            [(a.start(), ctx.int(0)), (a.end(), ctx.int(1))]
                .into_iter()
                .map(|(p, t_a)| (p, t_a, b.param_of(p)))
                .find(|(_, _, t_b)| interior(t_b))
                .map(|(p, t_a, t_b)| hit(p, t_a, t_b))
        })
}

/// Finds the first crossing between non-adjacent pieces that lies strictly
/// inside both of them. Collinear lines that overlap are split where the
/// overlap begins.
fn find_fold(pieces: &[Curve], ctx: &Context) -> Result<Option<Fold>> {
    let n = pieces.len();
    let zero = ctx.int(0);
    let one = ctx.int(1);
    let interior = |t: &Real| ctx.lt(&zero, t) && ctx.lt(t, &one);
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let hit = match (&pieces[i], &pieces[j]) {
                (Curve::Line(a), Curve::Line(b)) if collinear(a, b, ctx) => overlap(a, b, ctx),
                (a, b) => curve_hits(a, b, ctx)?
                    .into_iter()
                    .find(|h| interior(&h.t_a) && interior(&h.t_b)),
            };
            if let Some(hit) = hit {
                return Ok(Some(Fold {
                    first: i,
                    second: j,
                    hit,
                }));
            }
        }
    }
    Ok(None)
}

/// Merges neighboring lines that double back along a common support.
///
/// Such spikes enclose no area, so the fold search cannot see them.
fn remove_spikes(pieces: &mut Vec<Curve>, ctx: &Context) {
    let mut k = 0;
    while pieces.len() > 2 && k < pieces.len() {
        let next = (k + 1) % pieces.len();
        let merged = match (&pieces[k], &pieces[next]) {
            (Curve::Line(a), Curve::Line(b))
                if collinear(a, b, ctx)
                    && ctx.sign(&a.delta().dot(&b.delta())) == Ordering::Less =>
            {
                Some(LineCurve::new(a.start().clone(), b.end().clone(), ctx).map(Curve::Line))
            }
            _ => None,
        };
        let Some(merged) = merged else {
            k += 1;
            continue;
        };
        debug!("Removing spike between pieces {} and {}", k, next);
        let (keep, gone) = if next == 0 { (0, k) } else { (k, next) };
        pieces.remove(gone);
        match merged {
            Some(line) => pieces[keep] = line,
            None => {
                pieces.remove(keep);
            }
        }
        k = k.saturating_sub(1);
    }
}

/// Splits `piece` at a point on it; either half may vanish.
fn split(piece: &Curve, point: &Vec2, t: &Real, ctx: &Context) -> (Option<Curve>, Option<Curve>) {
    let zero = ctx.int(0);
    let one = ctx.int(1);
    (
        piece.between((piece.start(), &zero), (point, t), ctx),
        piece.between((point, t), (piece.end(), &one), ctx),
    )
}

/// Removes the loops an offset folds into.
///
/// Lines that double back onto themselves are merged first. Each crossing
/// between non-adjacent pieces then splits the cycle into two loops. The
/// loop whose orientation matches the outline's survives; when both match,
/// the one enclosing more area does. Every step removes one crossing, so
/// the pass ends after at most as many steps as there are pieces.
///
/// # Errors
///
/// Returns `OperationError::DegenerateOutline` if no loop keeps the
/// outline's orientation, and propagates `AmbiguousIntersection` from
/// overlapping pieces.
pub(crate) fn prune(mut pieces: Vec<Curve>, outline_ccw: bool, ctx: &Context) -> Result<Vec<Curve>> {
    let wanted = if outline_ccw {
        Ordering::Greater
    } else {
        Ordering::Less
    };
    for _ in 0..=pieces.len() {
        remove_spikes(&mut pieces, ctx);
        let Some(Fold { first, second, hit }) = find_fold(&pieces, ctx)? else {
            return Ok(pieces);
        };
        let (head_i, tail_i) = split(&pieces[first], &hit.point, &hit.t_a, ctx);
        let (head_j, tail_j) = split(&pieces[second], &hit.point, &hit.t_b, ctx);

        let outer: Vec<Curve> = pieces[..first]
            .iter()
            .cloned()
            .chain(head_i)
            .chain(tail_j)
            .chain(pieces[second + 1..].iter().cloned())
            .collect();
        let inner: Vec<Curve> = tail_i
            .into_iter()
            .chain(pieces[first + 1..second].iter().cloned())
            .chain(head_j)
            .collect();

        let outer_area = Outline::signed_area_of(&outer, ctx);
        let inner_area = Outline::signed_area_of(&inner, ctx);
        let keep_outer = match (ctx.sign(&outer_area) == wanted, ctx.sign(&inner_area) == wanted) {
            (true, true) => {
                let abs = |a: &Real| if outline_ccw { a.clone() } else { -a };
                ctx.le(&abs(&inner_area), &abs(&outer_area))
            }
            (true, false) => true,
            (false, true) => false,
            (false, false) => {
                return Err(OperationError::DegenerateOutline(
                    "offset folds over itself completely".to_owned(),
                )
                .into())
            }
        };
        debug!(
            "Pruning loop at crossing of pieces {} and {}, keeping the {} loop",
            first,
            second,
            if keep_outer { "outer" } else { "inner" }
        );
        pieces = if keep_outer { outer } else { inner };
    }
    Err(OperationError::DegenerateOutline("self-intersection pruning did not settle".to_owned()).into())
}
