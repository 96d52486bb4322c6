//! Real roots of polynomials up to degree four in closed form.
//!
//! Coefficients and roots are [`Real`]s, so a symbolic context yields
//! symbolic roots. Every discriminant is classified through the context:
//! values within epsilon count as zero, which is how repeated roots are
//! recognised.

use std::cmp::Ordering;

use super::{Context, Real};

/// A real root and how many times it repeats.
#[derive(Debug, Clone)]
pub(crate) struct Root {
    pub value: Real,
    pub multiplicity: usize,
}

/// Square root of a value that is non-negative up to epsilon.
fn clamped_sqrt(x: &Real, ctx: &Context) -> Real {
    if ctx.sign(x) == Ordering::Greater {
        x.sqrt()
    } else {
        ctx.int(0)
    }
}

/// Roots of a monic cubic: the largest real root, then the remaining
/// pair as `(re, im)`.
struct Cubic {
    first: Real,
    rest: [(Real, Real); 2],
}

/// Solves `z³ + a2 z² + a1 z + a0 = 0`.
fn cubic(a2: &Real, a1: &Real, a0: &Real, ctx: &Context) -> Cubic {
    let shift = a2 / ctx.int(3);
    let q = a1 / ctx.int(3) - a2.square() / ctx.int(9);
    let r = (a1 * a2 - a0 * ctx.int(3)) / ctx.int(6) - a2 * a2.square() / ctx.int(27);
    let disc = r.square() + &q * q.square();

    if ctx.sign(&disc) == Ordering::Greater {
        let r_negative = ctx.sign(&r) == Ordering::Less;
        let r_abs = if r_negative { -&r } else { r };
        let aa = (r_abs + disc.sqrt()).cbrt();
        let t1 = if r_negative {
            &q / &aa - &aa
        } else {
            &aa - &q / &aa
        };
        let re = -(&t1 / ctx.int(2)) - &shift;
        let im = ctx.int(3).sqrt() / ctx.int(2) * (&aa + &q / &aa);
        return Cubic {
            first: t1 - &shift,
            rest: [(re.clone(), im.clone()), (re, -im)],
        };
    }

    // Three real roots.
    let theta = if ctx.is_zero(&q) {
        ctx.int(0)
    } else {
        let minus_q = -&q;
        let arg = &r / (&minus_q * minus_q.sqrt());
        if ctx.le(&ctx.int(1), &arg) {
            ctx.int(0)
        } else if ctx.le(&arg, &ctx.int(-1)) {
            ctx.int(180)
        } else {
            Real::atan2_deg(&clamped_sqrt(&(ctx.int(1) - arg.square()), ctx), &arg)
        }
    };
    let scale = clamped_sqrt(&-&q, ctx) * ctx.int(2);
    let third = &theta / ctx.int(3);
    let root = |turn: i64| &scale * (&third + ctx.int(turn)).sin_cos_deg().1 - &shift;
    Cubic {
        first: root(0),
        rest: [(root(-120), ctx.int(0)), (root(120), ctx.int(0))],
    }
}

/// Pushes `base ± √radicand` when the radicand is non-negative; a zero
/// radicand gives one double root.
fn push_pair(roots: &mut Vec<Root>, base: Real, radicand: &Real, ctx: &Context) {
    match ctx.sign(radicand) {
        Ordering::Less => {}
        Ordering::Equal => roots.push(Root {
            value: base,
            multiplicity: 2,
        }),
        Ordering::Greater => {
            let s = radicand.sqrt();
            roots.push(Root {
                value: &base - &s,
                multiplicity: 1,
            });
            roots.push(Root {
                value: base + s,
                multiplicity: 1,
            });
        }
    }
}

/// Solves the monic quartic `z⁴ + a3 z³ + a2 z² + a1 z + a0 = 0` through
/// its resolvent cubic.
fn quartic(a3: &Real, a2: &Real, a1: &Real, a0: &Real, ctx: &Context) -> Vec<Root> {
    let c = a3 / ctx.int(4);
    let c2 = c.square();
    let b2 = a2 - &c2 * ctx.int(6);
    let b1 = a1 - a2 * &c * ctx.int(2) + &c * &c2 * ctx.int(8);
    let b0 = a0 - a1 * &c + a2 * &c2 - c2.square() * ctx.int(3);

    let resolvent = cubic(
        &(&b2 / ctx.int(2)),
        &((b2.square() - &b0 * ctx.int(4)) / ctx.int(16)),
        &(-(b1.square() / ctx.int(64))),
        ctx,
    );
    let [(x2, y2), (x3, _)] = &resolvent.rest;
    let s1 = clamped_sqrt(&resolvent.first, ctx);
    let x23 = x2 + x3;
    let inner = clamped_sqrt(&(x2 * x3 + y2.square()), ctx) * ctx.int(2);
    let inner = if ctx.sign(&b1) == Ordering::Less {
        -inner
    } else {
        inner
    };

    let mut roots = Vec::new();
    push_pair(&mut roots, &s1 - &c, &(&x23 - &inner), ctx);
    push_pair(&mut roots, -&s1 - &c, &(x23 + inner), ctx);
    roots
}

/// `p(z)` and `p'(z)` by Horner's rule; `coeffs` run from the leading term.
fn horner(coeffs: &[Real], z: &Real, ctx: &Context) -> (Real, Real) {
    let mut f = ctx.int(0);
    let mut df = ctx.int(0);
    for a in coeffs {
        df = &df * z + &f;
        f = &f * z + a;
    }
    (f, df)
}

/// Real roots of `coeffs[0] z⁴ + … + coeffs[4]`, merged by multiplicity
/// and sorted ascending.
///
/// Leading coefficients within epsilon lower the degree. An identically
/// zero polynomial has no isolated roots and yields none. Numeric contexts
/// polish simple roots with Newton steps.
pub(crate) fn real_roots(coeffs: &[Real; 5], ctx: &Context) -> Vec<Root> {
    let Some(lead) = coeffs.iter().position(|a| !ctx.is_zero(a)) else {
        return Vec::new();
    };
    let poly = &coeffs[lead..];
    let monic: Vec<Real> = poly[1..].iter().map(|a| a / &poly[0]).collect();

    let found = match monic.as_slice() {
        [] => Vec::new(),
        [a0] => vec![Root {
            value: -a0,
            multiplicity: 1,
        }],
        [a1, a0] => {
            let mut roots = Vec::new();
            let half = a1 / ctx.int(2);
            push_pair(&mut roots, -&half, &(half.square() - a0), ctx);
            roots
        }
        [a2, a1, a0] => {
            let Cubic { first, rest } = cubic(a2, a1, a0, ctx);
            std::iter::once(first)
                .chain(
                    rest.into_iter()
                        .filter(|(_, im)| ctx.is_zero(im))
                        .map(|(re, _)| re),
                )
                .map(|value| Root {
                    value,
                    multiplicity: 1,
                })
                .collect()
        }
        [a3, a2, a1, a0, ..] => quartic(a3, a2, a1, a0, ctx),
    };

    let mut merged: Vec<Root> = Vec::new();
    for root in found {
        match merged
            .iter_mut()
            .find(|m| ctx.cmp(&m.value, &root.value) == Ordering::Equal)
        {
            Some(m) => m.multiplicity += root.multiplicity,
            None => merged.push(root),
        }
    }

    if !ctx.is_symbolic() {
        for root in merged.iter_mut().filter(|r| r.multiplicity == 1) {
            for _ in 0..2 {
                let (f, df) = horner(poly, &root.value, ctx);
                if ctx.is_zero(&df) {
                    break;
                }
                root.value = &root.value - &(f / df);
            }
        }
    }
    merged.sort_by(|a, b| ctx.cmp(&a.value, &b.value));
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::decimal::{dec, Decimal};
    use crate::math::Precision;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn solve(coeffs: [i64; 5], symbolic: bool) -> Vec<(Decimal, usize)> {
        let ctx = Context::new(Precision::default(), symbolic);
        let coeffs = coeffs.map(|a| ctx.int(a));
        real_roots(&coeffs, &ctx)
            .iter()
            .map(|r| (ctx.round(&r.value), r.multiplicity))
            .collect()
    }

    fn both_modes(coeffs: [i64; 5], expected: &[(Decimal, usize)]) {
        assert_eq!(solve(coeffs, false), expected, "numeric");
        assert_eq!(solve(coeffs, true), expected, "symbolic");
    }

    // ── Quartics ──

    #[test]
    fn biquadratic_with_four_roots() {
        // z⁴ - 5z² + 4 = (z² - 1)(z² - 4)
        both_modes(
            [1, 0, -5, 0, 4],
            &[(dec(-2), 1), (dec(-1), 1), (dec(1), 1), (dec(2), 1)],
        );
    }

    #[test]
    fn quartic_with_odd_terms() {
        // (z - 1)(z - 2)(z - 3)(z + 6)
        both_modes(
            [1, 0, -25, 60, -36],
            &[(dec(-6), 1), (dec(1), 1), (dec(2), 1), (dec(3), 1)],
        );
    }

    #[test]
    fn touching_root_is_double() {
        // z⁴ + z² has a double root at zero and two imaginary ones.
        both_modes([1, 0, 1, 0, 0], &[(dec(0), 2)]);
        // (z² - 1)²
        both_modes([1, 0, -2, 0, 1], &[(dec(-1), 2), (dec(1), 2)]);
    }

    #[test]
    fn irrational_roots() {
        // 15t⁴ + 2t² - 1 = (5t² - 1)(3t² + 1)
        let root = d("0.4472135954999579392818347337");
        both_modes([15, 0, 2, 0, -1], &[(-root.clone(), 1), (root, 1)]);
    }

    #[test]
    fn no_real_roots() {
        both_modes([1, 0, 2, 0, 3], &[]);
    }

    // ── Lower degrees ──

    #[test]
    fn vanishing_lead_lowers_the_degree() {
        // z³ - 6z² + 11z - 6
        both_modes([0, 1, -6, 11, -6], &[(dec(1), 1), (dec(2), 1), (dec(3), 1)]);
        // z³ - 1 has one real root.
        both_modes([0, 1, 0, 0, -1], &[(dec(1), 1)]);
    }

    #[test]
    fn quadratics_and_lines() {
        both_modes([0, 0, 1, -2, 1], &[(dec(1), 2)]);
        both_modes([0, 0, 1, 0, 1], &[]);
        both_modes([0, 0, 0, 2, -1], &[(d("0.5"), 1)]);
        both_modes([0, 0, 0, 0, 0], &[]);
    }
}
