use std::cmp::Ordering;

use crate::error::{OperationError, Result};
use crate::geometry::curve::{round_point, ArcCurve, Curve, LineCurve};
use crate::geometry::{Point, Segment};

use super::decimal::{self, Decimal};
use super::{polynomial, Context, Mode, Precision, Real, Vec2};

/// Result of intersecting two bounded segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intersection {
    None,
    /// The segments touch without crossing.
    Tangent(Point),
    One(Point),
    /// Two crossings, nearest to the shared vertex first.
    Two(Point, Point),
}

/// A crossing of two unbounded supports.
///
/// `on_a` and `on_b` are line parameters for lines and ellipse angles in
/// degrees for arcs.
#[derive(Debug, Clone)]
pub(crate) struct Crossing {
    pub point: Vec2,
    pub on_a: Real,
    pub on_b: Real,
    pub tangent: bool,
}

impl Crossing {
    fn swapped(self) -> Self {
        Self {
            on_a: self.on_b,
            on_b: self.on_a,
            ..self
        }
    }
}

/// A crossing of two bounded curves with parameters in `[0, 1]`.
#[derive(Debug, Clone)]
pub(crate) struct Hit {
    pub point: Vec2,
    pub t_a: Real,
    pub t_b: Real,
    pub tangent: bool,
}

/// Intersects two segments within their parameter ranges.
///
/// When two crossings exist they are ordered by distance to the vertex the
/// segments share, or along `a` when they share none.
///
/// # Errors
///
/// Returns `OperationError::AmbiguousIntersection` for overlapping
/// collinear lines or overlapping arcs of the same ellipse, and a geometry
/// error for curve segments or an invalid precision.
pub fn intersect(a: &Segment, b: &Segment, precision: Precision, mode: Mode) -> Result<Intersection> {
    precision.validate()?;
    let ctx = Context::new(precision, mode.symbolic_intersections());
    let (Some(ca), Some(cb)) = (
        Curve::from_segment(a, 0, &ctx)?,
        Curve::from_segment(b, 1, &ctx)?,
    ) else {
        return Ok(Intersection::None);
    };
    let mut hits = curve_hits(&ca, &cb, &ctx)?;
    let shared = if a.to() == b.from() {
        Some(a.to())
    } else if a.from() == b.to() {
        Some(a.from())
    } else {
        None
    };
    match shared {
        Some(vertex) => {
            let v = Vec2::new(ctx.real(&vertex.x), ctx.real(&vertex.y));
            hits.sort_by(|h, k| {
                ctx.cmp(
                    &(&h.point - &v).norm_squared(),
                    &(&k.point - &v).norm_squared(),
                )
            });
        }
        None => hits.sort_by(|h, k| ctx.cmp(&h.t_a, &k.t_a)),
    }
    Ok(match hits.as_slice() {
        [] => Intersection::None,
        [h] if h.tangent => Intersection::Tangent(round_point(&h.point, &ctx)),
        [h] => Intersection::One(round_point(&h.point, &ctx)),
        [h, k, ..] => Intersection::Two(round_point(&h.point, &ctx), round_point(&k.point, &ctx)),
    })
}

/// Crossings of two curves that lie within both parameter ranges.
pub(crate) fn curve_hits(a: &Curve, b: &Curve, ctx: &Context) -> Result<Vec<Hit>> {
    let hits = match (a, b) {
        (Curve::Line(la), Curve::Line(lb)) => {
            if collinear(la, lb, ctx) {
                return collinear_hits(la, lb, ctx);
            }
            line_line(la, lb, ctx)?
                .and_then(|c| bounded_on_line(c, ctx))
                .and_then(|c| bounded_on_line(c.swapped(), ctx))
                .map(Crossing::swapped)
                .into_iter()
                .collect::<Vec<_>>()
        }
        (Curve::Line(l), Curve::Arc(arc)) => line_ellipse(l, arc, ctx)
            .into_iter()
            .filter_map(|c| bounded_on_line(c, ctx))
            .filter_map(|c| bounded_on_arc(c.swapped(), arc, ctx).map(Crossing::swapped))
            .collect(),
        (Curve::Arc(arc), Curve::Line(l)) => line_ellipse(l, arc, ctx)
            .into_iter()
            .filter_map(|c| bounded_on_line(c, ctx))
            .filter_map(|c| bounded_on_arc(c.swapped(), arc, ctx))
            .collect(),
        (Curve::Arc(aa), Curve::Arc(ab)) => {
            if same_ellipse(aa, ab, ctx) {
                return coincident_arc_hits(aa, ab, ctx);
            }
            ellipse_ellipse(aa, ab, ctx)
                .into_iter()
                .filter_map(|c| bounded_on_arc(c, aa, ctx))
                .filter_map(|c| bounded_on_arc(c.swapped(), ab, ctx).map(Crossing::swapped))
                .collect()
        }
    };
    Ok(hits
        .into_iter()
        .map(|c| Hit {
            point: c.point,
            t_a: c.on_a,
            t_b: c.on_b,
            tangent: c.tangent,
        })
        .collect())
}

/// Keeps a crossing whose `on_a` line parameter lies in `[0, 1]`.
fn bounded_on_line(c: Crossing, ctx: &Context) -> Option<Crossing> {
    (ctx.le(&ctx.int(0), &c.on_a) && ctx.le(&c.on_a, &ctx.int(1))).then_some(c)
}

/// Keeps a crossing whose `on_a` angle lies on the arc and converts it to
/// the arc parameter.
fn bounded_on_arc(c: Crossing, arc: &ArcCurve, ctx: &Context) -> Option<Crossing> {
    if !arc.contains_angle(&c.on_a, ctx) {
        return None;
    }
    let on_a = arc.param_of_angle(&c.on_a, ctx);
    Some(Crossing { on_a, ..c })
}

/// Whether two lines lie on the same infinite line.
pub(crate) fn collinear(a: &LineCurve, b: &LineCurve, ctx: &Context) -> bool {
    let da = a.delta();
    ctx.is_zero(&da.cross(&b.delta())) && ctx.is_zero(&da.cross(&(b.start() - a.start())))
}

/// Overlap test for collinear segments: a single shared point is a hit,
/// a shared stretch is ambiguous.
fn collinear_hits(a: &LineCurve, b: &LineCurve, ctx: &Context) -> Result<Vec<Hit>> {
    let s = a.param_of(b.start());
    let e = a.param_of(b.end());
    let (lo, hi) = if ctx.le(&s, &e) { (s, e) } else { (e, s) };
    let zero = ctx.int(0);
    let one = ctx.int(1);
    let from = if ctx.lt(&lo, &zero) { zero } else { lo };
    let to = if ctx.lt(&one, &hi) { one } else { hi };
    match ctx.cmp(&from, &to) {
        Ordering::Greater => Ok(Vec::new()),
        Ordering::Equal => {
            let point = a.point_at(&from);
            let t_b = b.param_of(&point);
            Ok(vec![Hit {
                point,
                t_a: from,
                t_b,
                tangent: false,
            }])
        }
        Ordering::Less => Err(OperationError::AmbiguousIntersection(
            "collinear segments overlap".to_owned(),
        )
        .into()),
    }
}

/// Intersection of two infinite lines, `None` when parallel.
///
/// # Errors
///
/// Returns `OperationError::AmbiguousIntersection` when the lines coincide.
pub(crate) fn line_line(a: &LineCurve, b: &LineCurve, ctx: &Context) -> Result<Option<Crossing>> {
    let da = a.delta();
    let db = b.delta();
    let denom = da.cross(&db);
    let w = b.start() - a.start();
    if ctx.is_zero(&denom) {
        if ctx.is_zero(&da.cross(&w)) {
            return Err(OperationError::AmbiguousIntersection(
                "coincident lines".to_owned(),
            )
            .into());
        }
        return Ok(None);
    }
    let t = w.cross(&db) / &denom;
    let u = w.cross(&da) / &denom;
    Ok(Some(Crossing {
        point: a.point_at(&t),
        on_a: t,
        on_b: u,
        tangent: false,
    }))
}

/// Intersections of an infinite line with the full ellipse of `arc`.
///
/// Works in the frame where the ellipse is the unit circle, where the
/// substitution gives a quadratic in the line parameter. `on_a` is the line
/// parameter, `on_b` the ellipse angle.
pub(crate) fn line_ellipse(line: &LineCurve, arc: &ArcCurve, ctx: &Context) -> Vec<Crossing> {
    let p = arc.to_unit(line.start());
    let d = &arc.to_unit(line.end()) - &p;
    let a = d.norm_squared();
    let b = p.dot(&d) * ctx.int(2);
    let c = p.norm_squared() - ctx.int(1);
    let disc = b.square() - &a * &c * ctx.int(4);
    let two_a = &a * ctx.int(2);
    let root = |t: Real, tangent: bool| {
        let u = &p + &d.scaled(&t);
        Crossing {
            point: line.point_at(&t),
            on_b: Real::atan2_deg(&u.y, &u.x),
            on_a: t,
            tangent,
        }
    };
    match ctx.sign(&disc) {
        Ordering::Less => Vec::new(),
        Ordering::Equal => vec![root(-&b / &two_a, true)],
        Ordering::Greater => {
            let s = disc.sqrt();
            vec![
                root((-&b - &s) / &two_a, false),
                root((-&b + &s) / &two_a, false),
            ]
        }
    }
}

/// Whether two arcs lie on the same ellipse.
pub(crate) fn same_ellipse(a: &ArcCurve, b: &ArcCurve, ctx: &Context) -> bool {
    if !a.center().approx_eq(b.center(), ctx) {
        return false;
    }
    if a.is_circular(ctx) && b.is_circular(ctx) {
        return ctx.is_zero(&(a.rx() - b.rx()));
    }
    let lies_on = |arc: &ArcCurve, other: &ArcCurve| {
        [0, 90, 45]
            .iter()
            .all(|&deg| {
                let u = other.to_unit(&arc.point_at_angle(&ctx.int(deg)));
                ctx.is_zero(&(u.norm_squared() - ctx.int(1)))
            })
    };
    lies_on(a, b) && lies_on(b, a)
}

/// Hits of two arcs on the same ellipse: shared endpoints, or an error when
/// their sweeps overlap.
fn coincident_arc_hits(a: &ArcCurve, b: &ArcCurve, ctx: &Context) -> Result<Vec<Hit>> {
    let half = ctx.real(&decimal::half());
    let strictly_inside = |arc: &ArcCurve, p: &Vec2| {
        let theta = arc.angle_of(p);
        if !arc.contains_angle(&theta, ctx) {
            return false;
        }
        let t = arc.param_of_angle(&theta, ctx);
        ctx.lt(&ctx.int(0), &t) && ctx.lt(&t, &ctx.int(1))
    };
    let overlap = strictly_inside(a, &b.point_at(&half))
        || strictly_inside(b, &a.point_at(&half))
        || strictly_inside(a, b.start())
        || strictly_inside(a, b.end());
    if overlap {
        return Err(OperationError::AmbiguousIntersection(
            "arcs on the same ellipse overlap".to_owned(),
        )
        .into());
    }
    let mut hits = Vec::new();
    for (pa, ta) in [(a.start(), ctx.int(0)), (a.end(), ctx.int(1))] {
        for (pb, tb) in [(b.start(), ctx.int(0)), (b.end(), ctx.int(1))] {
            if pa.approx_eq(pb, ctx) {
                hits.push(Hit {
                    point: pa.clone(),
                    t_a: ta.clone(),
                    t_b: tb,
                    tangent: true,
                });
            }
        }
    }
    Ok(hits)
}

/// Intersections of the full ellipses of two arcs; angles in degrees.
///
/// Circles are solved through their radical line. Other pairs are solved
/// algebraically: `b` becomes a conic in the frame where `a` is the unit
/// circle, and the tangent half-angle substitution turns that into a
/// quartic. A repeated root is a touching point.
pub(crate) fn ellipse_ellipse(a: &ArcCurve, b: &ArcCurve, ctx: &Context) -> Vec<Crossing> {
    if a.is_circular(ctx) && b.is_circular(ctx) {
        return circle_circle(a, b, ctx);
    }
    conic_roots(a, b, ctx)
}

fn circle_circle(a: &ArcCurve, b: &ArcCurve, ctx: &Context) -> Vec<Crossing> {
    let delta = b.center() - a.center();
    let dist_sq = delta.norm_squared();
    if ctx.is_zero(&dist_sq) {
        return Vec::new();
    }
    let dist = dist_sq.sqrt();
    let (r1, r2) = (a.rx(), b.rx());
    let along = (r1.square() - r2.square() + &dist_sq) / (&dist * ctx.int(2));
    let h_sq = r1.square() - along.square();
    let unit = Vec2::new(&delta.x / &dist, &delta.y / &dist);
    let foot = a.center() + &unit.scaled(&along);
    let crossing = |point: Vec2, tangent: bool| Crossing {
        on_a: a.angle_of(&point),
        on_b: b.angle_of(&point),
        point,
        tangent,
    };
    match ctx.sign(&h_sq) {
        Ordering::Less => Vec::new(),
        Ordering::Equal => vec![crossing(foot, true)],
        Ordering::Greater => {
            let offset = unit.left_normal().scaled(&h_sq.sqrt());
            vec![
                crossing(&foot + &offset, false),
                crossing(&foot - &offset, false),
            ]
        }
    }
}

/// `a x² + b xy + c y² + d x + e y + f = 0`.
#[derive(Debug, Clone)]
struct Conic {
    a: Real,
    b: Real,
    c: Real,
    d: Real,
    e: Real,
    f: Real,
}

impl Conic {
    /// The ellipse of `other` expressed in the unit-circle frame of `arc`.
    fn relative(arc: &ArcCurve, other: &ArcCurve, ctx: &Context) -> Self {
        let map = |x: i64, y: i64| other.to_unit(&arc.from_unit(&Vec2::new(ctx.int(x), ctx.int(y))));
        let origin = map(0, 0);
        let ex = &map(1, 0) - &origin;
        let ey = &map(0, 1) - &origin;
        let two = ctx.int(2);
        Self {
            a: ex.norm_squared(),
            b: ex.dot(&ey) * &two,
            c: ey.norm_squared(),
            d: ex.dot(&origin) * &two,
            e: ey.dot(&origin) * &two,
            f: origin.norm_squared() - ctx.int(1),
        }
    }

    /// The same curve in coordinates where `(x, y)` stands for the point
    /// `(-y, x)`.
    fn quarter_turn(&self) -> Self {
        Self {
            a: self.c.clone(),
            b: -&self.b,
            c: self.a.clone(),
            d: self.e.clone(),
            e: -&self.d,
            f: self.f.clone(),
        }
    }

    /// Quartic in `t` whose roots are the crossings with the unit circle at
    /// `((1 - t²) / (1 + t²), 2t / (1 + t²))`, leading coefficient first.
    ///
    /// The leading coefficient is the conic's value at `(-1, 0)`, the one
    /// point the substitution cannot reach.
    fn circle_quartic(&self, ctx: &Context) -> [Real; 5] {
        let two = ctx.int(2);
        [
            &self.a - &self.d + &self.f,
            (&self.e - &self.b) * &two,
            (&self.f - &self.a) * &two + &self.c * ctx.int(4),
            (&self.b + &self.e) * &two,
            &self.a + &self.d + &self.f,
        ]
    }
}

/// Crossings of two ellipses that are not both circles.
fn conic_roots(a: &ArcCurve, b: &ArcCurve, ctx: &Context) -> Vec<Crossing> {
    // Pick the quarter turn that keeps the unreachable point furthest
    // from the curve.
    let best = (0..4)
        .scan(Conic::relative(a, b, ctx), |conic, turns| {
            let quartic = conic.circle_quartic(ctx);
            *conic = conic.quarter_turn();
            Some((turns, quartic))
        })
        .map(|(turns, quartic)| {
            let lead = ctx.value(&quartic[0]).abs();
            (turns, quartic, lead)
        })
        .max_by(|x, y| x.2.cmp(&y.2));
    let Some((turns, quartic, lead)) = best else {
        return Vec::new();
    };

    let crossing = |q: Vec2, tangent: bool| {
        let point = a.from_unit(&q);
        Crossing {
            on_a: Real::atan2_deg(&q.y, &q.x),
            on_b: b.angle_of(&point),
            point,
            tangent,
        }
    };

    if &lead <= ctx.epsilon() {
        // `b` passes through all four axis points of the unit circle.
        return [(1, 0), (0, 1), (-1, 0), (0, -1)]
            .into_iter()
            .map(|(x, y)| crossing(Vec2::new(ctx.int(x), ctx.int(y)), false))
            .collect();
    }

    polynomial::real_roots(&quartic, ctx)
        .into_iter()
        .map(|root| {
            let t = root.value;
            let t2 = t.square();
            let w = ctx.int(1) + &t2;
            let mut q = Vec2::new((ctx.int(1) - t2) / &w, t * ctx.int(2) / w);
            for _ in 0..turns {
                q = q.left_normal();
            }
            crossing(q, root.multiplicity > 1)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::decimal::dec;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn p(x: i64, y: i64) -> Point {
        Point::from((x, y))
    }

    fn run(a: &Segment, b: &Segment) -> Result<Intersection> {
        intersect(a, b, Precision::default(), Mode::AutoNumeric)
    }

    // ── Line-line tests ──

    #[test]
    fn line_line_crossing() {
        let a = Segment::line((0, 0), (2, 2));
        let b = Segment::line((0, 2), (2, 0));
        assert_eq!(run(&a, &b).unwrap(), Intersection::One(p(1, 1)));
    }

    #[test]
    fn line_line_out_of_range() {
        let a = Segment::line((0, 0), (1, 0));
        let b = Segment::line((2, -1), (2, 1));
        assert_eq!(run(&a, &b).unwrap(), Intersection::None);
    }

    #[test]
    fn parallel_lines_do_not_meet() {
        let a = Segment::line((0, 0), (1, 0));
        let b = Segment::line((0, 1), (1, 1));
        assert_eq!(run(&a, &b).unwrap(), Intersection::None);
    }

    #[test]
    fn overlapping_collinear_lines_are_ambiguous() {
        let a = Segment::line((0, 0), (2, 0));
        let b = Segment::line((1, 0), (3, 0));
        assert_eq!(run(&a, &b).unwrap_err().kind(), ErrorKind::AmbiguousIntersection);
        let touching = Segment::line((2, 0), (3, 0));
        assert_eq!(run(&a, &touching).unwrap(), Intersection::One(p(2, 0)));
    }

    #[test]
    fn unbounded_line_line_reports_coincidence() {
        let ctx = Context::new(Precision::default(), false);
        let v = |x: i64, y: i64| Vec2::new(ctx.int(x), ctx.int(y));
        let a = LineCurve::new(v(0, 0), v(1, 1), &ctx).unwrap();
        let b = LineCurve::new(v(5, 5), v(7, 7), &ctx).unwrap();
        assert!(line_line(&a, &b, &ctx).is_err());
        let c = LineCurve::new(v(3, 0), v(3, 1), &ctx).unwrap();
        let hit = line_line(&a, &c, &ctx).unwrap().unwrap();
        assert_eq!(ctx.round(&hit.on_a), dec(3));
        assert_eq!(ctx.round(&hit.on_b), dec(3));
    }

    // ── Line-arc tests ──

    #[test]
    fn line_through_semicircle() {
        // Upper unit semicircle, counter-clockwise from (1, 0).
        let arc = Segment::circular_arc((1, 0), (-1, 0), dec(1), false, true);
        let line = Segment::line((0, -2), (0, 2));
        assert_eq!(run(&line, &arc).unwrap(), Intersection::One(p(0, 1)));
        let chord = Segment::line((-2, 0), (2, 0));
        match run(&chord, &arc).unwrap() {
            Intersection::Two(first, second) => {
                assert_eq!(first, p(-1, 0));
                assert_eq!(second, p(1, 0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn line_tangent_to_arc() {
        let arc = Segment::circular_arc((1, 0), (-1, 0), dec(1), false, true);
        let line = Segment::line((-1, 1), (1, 1));
        assert_eq!(run(&line, &arc).unwrap(), Intersection::Tangent(p(0, 1)));
        let miss = Segment::line((-1, 2), (1, 2));
        assert_eq!(run(&miss, &arc).unwrap(), Intersection::None);
    }

    #[test]
    fn line_arc_irrational_crossing() {
        let arc = Segment::circular_arc((1, 0), (-1, 0), dec(1), false, true);
        let line = Segment::line(Point::new(dec(-2), d("0.5")), Point::new(dec(2), d("0.5")));
        let Intersection::Two(a, b) = run(&line, &arc).unwrap() else {
            panic!("expected two crossings");
        };
        assert_eq!(a.x, d("-0.8660254037844386467637231708"));
        assert_eq!(b.x, d("0.8660254037844386467637231708"));
        assert_eq!(a.y, d("0.5"));
    }

    #[test]
    fn line_crosses_rotated_ellipse() {
        // Ellipse rx=2, ry=1 rotated by 90 degrees around the origin.
        let arc = Segment::arc((0, -2), (0, 2), dec(2), dec(1), dec(90), false, true);
        let line = Segment::line((-2, 0), (2, 0));
        assert_eq!(run(&line, &arc).unwrap(), Intersection::One(p(1, 0)));
    }

    // ── Arc-arc tests ──

    #[test]
    fn two_circles_cross_twice() {
        let a = Segment::circular_arc((0, -1), (0, 1), dec(1), false, true);
        let b = Segment::circular_arc((1, 1), (1, -1), dec(1), false, true);
        let Intersection::Two(first, second) = run(&a, &b).unwrap() else {
            panic!("expected two crossings");
        };
        let mut ys = [first.y.clone(), second.y.clone()];
        ys.sort();
        assert_eq!(ys[0], d("-0.8660254037844386467637231708"));
        assert_eq!(first.x, d("0.5"));
    }

    #[test]
    fn circles_touching_are_tangent() {
        let a = Segment::circular_arc((1, -1), (1, 1), dec(1), true, true);
        let b = Segment::circular_arc((3, 1), (3, -1), dec(1), true, true);
        assert_eq!(run(&a, &b).unwrap(), Intersection::Tangent(p(2, 0)));
    }

    #[test]
    fn arcs_on_one_circle() {
        let a = Segment::circular_arc((1, 0), (-1, 0), dec(1), false, true);
        let b = Segment::circular_arc((-1, 0), (1, 0), dec(1), false, true);
        let Intersection::Two(first, second) = run(&a, &b).unwrap() else {
            panic!("expected the shared endpoints");
        };
        assert_eq!(first, p(-1, 0));
        assert_eq!(second, p(1, 0));
        let overlapping = Segment::circular_arc((0, 1), (0, -1), dec(1), false, true);
        assert_eq!(
            run(&a, &overlapping).unwrap_err().kind(),
            ErrorKind::AmbiguousIntersection
        );
    }

    #[test]
    fn ellipse_and_circle_cross_once() {
        // Upper halves of x²/4 + y² = 1 and the unit circle around (2, 0).
        let ellipse = Segment::arc((2, 0), (-2, 0), dec(2), dec(1), dec(0), false, true);
        let circle = Segment::circular_arc((3, 0), (1, 0), dec(1), false, true);
        for mode in [Mode::AutoNumeric, Mode::Exact] {
            let Intersection::One(point) =
                intersect(&ellipse, &circle, Precision::default(), mode).unwrap()
            else {
                panic!("expected one crossing in {mode:?}");
            };
            // x²/4 + y² = 1 and (x-2)² + y² = 1  =>  3x² - 16x + 16 = 0  =>  x = 4/3.
            let tolerance = d("1e-25");
            assert!((&point.x - d("1.333333333333333333333333333")).abs() < tolerance);
            assert!((&point.y - d("0.7453559924999298988030578896")).abs() < tolerance);
        }
    }

    #[test]
    fn touching_ellipses_are_tangent() {
        // Right half of x²/4 + y² = 1 and left half of the same ellipse
        // moved to (4, 0).
        let a = Segment::arc((0, -1), (0, 1), dec(2), dec(1), dec(0), false, true);
        let b = Segment::arc((4, 1), (4, -1), dec(2), dec(1), dec(0), false, true);
        for mode in [Mode::AutoNumeric, Mode::AutoIntersectionsNumeric, Mode::Exact] {
            let result = intersect(&a, &b, Precision::default(), mode).unwrap();
            assert_eq!(result, Intersection::Tangent(p(2, 0)), "{mode:?}");
        }
        let apart = Segment::arc((5, 1), (5, -1), dec(2), dec(1), dec(0), false, true);
        assert_eq!(run(&a, &apart).unwrap(), Intersection::None);
    }

    #[test]
    fn nearly_touching_ellipse_and_circle_cross_twice() {
        // Upper half of x²/4 + y² = 1 against the lower half of a unit
        // circle centred just below (0, 2), where the two would touch.
        let ellipse = Segment::arc((2, 0), (-2, 0), dec(2), dec(1), dec(0), false, true);
        let cases = [
            (
                "1.999999",
                "0.001264910849032434348652074849",
                "0.9999998000000480000153600042",
            ),
            (
                "1.999999999",
                "0.00003999999999319999999884600000",
                "0.9999999998000000000480000000",
            ),
        ];
        let tolerance = d("1e-25");
        for (height, x, y) in cases {
            let circle = Segment::circular_arc(
                Point::new(dec(-1), d(height)),
                Point::new(dec(1), d(height)),
                dec(1),
                false,
                true,
            );
            for mode in [Mode::AutoNumeric, Mode::Exact] {
                let Intersection::Two(first, second) =
                    intersect(&ellipse, &circle, Precision::default(), mode).unwrap()
                else {
                    panic!("expected two crossings at {height} in {mode:?}");
                };
                assert!((&first.x - d(x)).abs() < tolerance, "{first} at {height}");
                assert!((&second.x + d(x)).abs() < tolerance, "{second} at {height}");
                assert!((&first.y - d(y)).abs() < tolerance, "{first} at {height}");
                assert!((&second.y - d(y)).abs() < tolerance, "{second} at {height}");
            }
        }
    }

    #[test]
    fn modes_agree_on_crossings() {
        let arc = Segment::circular_arc((1, 0), (-1, 0), dec(1), false, true);
        let line = Segment::line(Point::new(dec(-2), d("0.5")), Point::new(dec(2), d("0.5")));
        let numeric = intersect(&line, &arc, Precision::default(), Mode::AutoNumeric).unwrap();
        let exact = intersect(&line, &arc, Precision::default(), Mode::Exact).unwrap();
        assert_eq!(numeric, exact);
    }
}
