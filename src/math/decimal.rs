//! Arbitrary-precision decimal arithmetic on top of [`bigdecimal`].
//!
//! Every function takes the number of significant digits the result must
//! carry and rounds half-to-even. Transcendental functions run in fixed-point
//! [`BigInt`] arithmetic with guard digits and round once at the end.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Decimal scalar used for every coordinate, radius and angle.
pub type Decimal = BigDecimal;

/// Guard digits used by the fixed-point series.
const GUARD: u64 = 10;

/// Returns `10^e`.
#[must_use]
pub fn pow10(e: u64) -> BigInt {
    BigInt::from(10u8).pow(u32::try_from(e).unwrap_or(u32::MAX))
}

/// Number of decimal digits of `|n|` (one for zero).
fn num_digits(n: &BigInt) -> u64 {
    n.magnitude().to_str_radix(10).len() as u64
}

/// Builds a decimal from an integer.
#[must_use]
pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// One half.
#[must_use]
pub fn half() -> Decimal {
    Decimal::new(BigInt::from(5), 1)
}

/// Returns `10^-digits`.
#[must_use]
pub fn ten_to_minus(digits: u32) -> Decimal {
    Decimal::new(BigInt::one(), i64::from(digits))
}

/// Rounds `x` to `digits` significant digits, ties to even.
#[must_use]
pub fn round_sig(x: &Decimal, digits: u64) -> Decimal {
    let (mantissa, scale) = x.as_bigint_and_exponent();
    if mantissa.is_zero() {
        return Decimal::zero();
    }
    let nd = num_digits(&mantissa);
    if nd <= digits {
        return x.clone();
    }
    let drop = nd - digits;
    let divisor = pow10(drop);
    let negative = mantissa.sign() == Sign::Minus;
    let (mut q, r) = mantissa.abs().div_rem(&divisor);
    let twice = r * 2u8;
    if twice > divisor || (twice == divisor && q.is_odd()) {
        q += 1u8;
    }
    if negative {
        q = -q;
    }
    Decimal::new(q, scale - i64::try_from(drop).unwrap_or(i64::MAX))
}

/// Appends a sticky digit so that truncated results round correctly.
fn with_sticky(q: BigInt, inexact: bool) -> (BigInt, i64) {
    if inexact {
        let sticky = if q.is_negative() { -1 } else { 1 };
        (q * 10u8 + sticky, 1)
    } else {
        (q, 0)
    }
}

/// Divides `a` by `b` to `digits` significant digits.
///
/// Division by zero yields zero; callers test divisors against their
/// tolerance before dividing.
#[must_use]
pub fn div(a: &Decimal, b: &Decimal, digits: u64) -> Decimal {
    if b.is_zero() || a.is_zero() {
        return Decimal::zero();
    }
    let (ma, sa) = a.as_bigint_and_exponent();
    let (mb, sb) = b.as_bigint_and_exponent();
    let want = digits + 2 + num_digits(&mb);
    let shift = want.saturating_sub(num_digits(&ma));
    let numerator = ma * pow10(shift);
    let (q, r) = numerator.div_rem(&mb);
    let (q, extra) = with_sticky(q, !r.is_zero());
    let shift = i64::try_from(shift).unwrap_or(i64::MAX);
    round_sig(&Decimal::new(q, sa - sb + shift + extra), digits)
}

/// Square root of `x` to `digits` significant digits; non-positive input yields zero.
#[must_use]
pub fn sqrt(x: &Decimal, digits: u64) -> Decimal {
    if !x.is_positive() {
        return Decimal::zero();
    }
    let (m, s) = x.as_bigint_and_exponent();
    let mut e = (2 * (digits + 2)).saturating_sub(num_digits(&m));
    let mut total = s + i64::try_from(e).unwrap_or(0);
    if total.rem_euclid(2) != 0 {
        e += 1;
        total += 1;
    }
    let n = m * pow10(e);
    let root = n.sqrt();
    let inexact = &root * &root != n;
    let (root, extra) = with_sticky(root, inexact);
    round_sig(&Decimal::new(root, total / 2 + extra), digits)
}

/// Real cube root of `x` to `digits` significant digits.
#[must_use]
pub fn cbrt(x: &Decimal, digits: u64) -> Decimal {
    if x.is_zero() {
        return Decimal::zero();
    }
    let (m, s) = x.as_bigint_and_exponent();
    let negative = m.is_negative();
    let m = m.abs();
    let mut e = (3 * (digits + 2)).saturating_sub(num_digits(&m));
    let mut total = s + i64::try_from(e).unwrap_or(0);
    let rem = total.rem_euclid(3);
    if rem != 0 {
        let pad = 3 - rem;
        e += u64::try_from(pad).unwrap_or(0);
        total += pad;
    }
    let n = m * pow10(e);
    let root = n.cbrt();
    let inexact = &root * &root * &root != n;
    let (root, extra) = with_sticky(root, inexact);
    let root = if negative { -root } else { root };
    round_sig(&Decimal::new(root, total / 3 + extra), digits)
}

/// Returns the square root of `x` when it is an exact decimal.
#[must_use]
pub fn exact_sqrt(x: &Decimal) -> Option<Decimal> {
    if x.is_negative() {
        return None;
    }
    if x.is_zero() {
        return Some(Decimal::zero());
    }
    let (mut m, mut s) = x.normalized().as_bigint_and_exponent();
    if s.rem_euclid(2) != 0 {
        m *= 10u8;
        s += 1;
    }
    let root = m.sqrt();
    (&root * &root == m).then(|| Decimal::new(root, s / 2))
}

/// Converts `x` to a fixed-point integer scaled by `10^p` (truncating).
fn to_fixed(x: &Decimal, p: u64) -> BigInt {
    let (m, s) = x.as_bigint_and_exponent();
    let p = i64::try_from(p).unwrap_or(i64::MAX);
    if p >= s {
        m * pow10(u64::try_from(p - s).unwrap_or(0))
    } else {
        m / pow10(u64::try_from(s - p).unwrap_or(0))
    }
}

fn from_fixed(n: BigInt, p: u64) -> Decimal {
    Decimal::new(n, i64::try_from(p).unwrap_or(i64::MAX))
}

/// `sum_k (-1)^k / ((2k+1) x^(2k+1))` scaled by `10^p`.
fn atan_inv_fixed(x: u32, p: u64) -> BigInt {
    let one = pow10(p);
    let x2 = BigInt::from(x) * BigInt::from(x);
    let mut term = one / BigInt::from(x);
    let mut sum = term.clone();
    let mut k = 1u32;
    loop {
        term /= &x2;
        let t = &term / BigInt::from(2 * k + 1);
        if t.is_zero() {
            break;
        }
        if k % 2 == 1 {
            sum -= t;
        } else {
            sum += t;
        }
        k += 1;
    }
    sum
}

/// π scaled by `10^p`.
fn pi_fixed(p: u64) -> BigInt {
    let q = p + GUARD;
    let v = atan_inv_fixed(5, q) * 16u8 - atan_inv_fixed(239, q) * 4u8;
    v / pow10(GUARD)
}

/// π to `digits` significant digits.
#[must_use]
pub fn pi(digits: u64) -> Decimal {
    let p = digits + GUARD;
    round_sig(&from_fixed(pi_fixed(p), p), digits)
}

/// Number of whole turns `floor(x / 360)` in an angle given in degrees.
#[must_use]
pub fn turns(x: &Decimal) -> BigInt {
    let (m, s) = x.as_bigint_and_exponent();
    if s <= 0 {
        (m * pow10(u64::try_from(-s).unwrap_or(0))).div_floor(&BigInt::from(360))
    } else {
        m.div_floor(&(BigInt::from(360) * pow10(u64::try_from(s).unwrap_or(0))))
    }
}

/// Reduces degrees into `[0, 360)`.
#[must_use]
pub fn reduce_degrees(x: &Decimal) -> Decimal {
    x - Decimal::new(turns(x) * 360, 0)
}

/// Sine and cosine of `0 <= rad < 1` given in fixed point, both scaled by `10^p`.
fn sin_cos_fixed(rad: &BigInt, p: u64) -> (BigInt, BigInt) {
    let one = pow10(p);
    let x2 = rad * rad / &one;

    let mut sin = rad.clone();
    let mut term = rad.clone();
    let mut k = 1u32;
    loop {
        term = -(term * &x2 / &one) / BigInt::from((2 * k) * (2 * k + 1));
        if term.is_zero() {
            break;
        }
        sin += &term;
        k += 1;
    }

    let mut cos = one.clone();
    let mut term = one.clone();
    let mut k = 1u32;
    loop {
        term = -(term * &x2 / &one) / BigInt::from((2 * k - 1) * (2 * k));
        if term.is_zero() {
            break;
        }
        cos += &term;
        k += 1;
    }
    (sin, cos)
}

/// Exact sine and cosine when `x` is a multiple of 90 degrees.
#[must_use]
pub fn exact_sin_cos_deg(x: &Decimal) -> Option<(Decimal, Decimal)> {
    let (m, s) = reduce_degrees(x).normalized().as_bigint_and_exponent();
    if s > 0 {
        return None;
    }
    let whole = m * pow10(u64::try_from(-s).unwrap_or(0));
    let (quarter, rest) = whole.div_rem(&BigInt::from(90));
    if !rest.is_zero() {
        return None;
    }
    match quarter.to_u32()? {
        0 => Some((dec(0), dec(1))),
        1 => Some((dec(1), dec(0))),
        2 => Some((dec(0), dec(-1))),
        3 => Some((dec(-1), dec(0))),
        _ => None,
    }
}

/// Sine and cosine of an angle in degrees, to `digits` significant digits.
///
/// Multiples of 90 degrees are exact.
#[must_use]
pub fn sin_cos_deg(x: &Decimal, digits: u64) -> (Decimal, Decimal) {
    let r = reduce_degrees(x);
    if let Some(exact) = exact_sin_cos_deg(&r) {
        return exact;
    }
    let p = digits + GUARD;
    let quadrant = to_fixed(&r, 0).div_floor(&BigInt::from(90));
    let a = &r - Decimal::new(&quadrant * 90, 0);
    let (a, swapped) = if a > dec(45) {
        (dec(90) - a, true)
    } else {
        (a, false)
    };
    let rad = to_fixed(&a, p) * pi_fixed(p) / (pow10(p) * 180u8);
    let (s, c) = sin_cos_fixed(&rad, p);
    let (s0, c0) = if swapped { (c, s) } else { (s, c) };
    let (s, c) = match quadrant.to_u32() {
        Some(0) => (s0, c0),
        Some(1) => (c0, -s0),
        Some(2) => (-s0, -c0),
        _ => (-c0, s0),
    };
    (
        round_sig(&from_fixed(s, p), digits),
        round_sig(&from_fixed(c, p), digits),
    )
}

/// `atan(z)` for `0 <= z <= 1` in fixed point, returned in radians scaled by `10^p`.
fn atan_fixed(z: &BigInt, p: u64) -> BigInt {
    let one = pow10(p);
    // Two half-angle reductions: z / (1 + sqrt(1 + z^2)).
    let mut z = z.clone();
    for _ in 0..2 {
        let z2 = &z * &z / &one;
        let root = ((&one + z2) * &one).sqrt();
        z = &z * &one / (&one + root);
    }
    let z2 = &z * &z / &one;
    let mut sum = z.clone();
    let mut power = z;
    let mut k = 1u32;
    loop {
        power = -(power * &z2 / &one);
        let t = &power / BigInt::from(2 * k + 1);
        if t.is_zero() {
            break;
        }
        sum += t;
        k += 1;
    }
    sum * 4u8
}

/// Angle of the vector `(x, y)` in degrees, in `(-180, 180]`.
///
/// Results on the axes and diagonals are exact.
#[must_use]
pub fn atan2_deg(y: &Decimal, x: &Decimal, digits: u64) -> Decimal {
    if y.is_zero() {
        return if x.is_negative() { dec(180) } else { dec(0) };
    }
    if x.is_zero() {
        return if y.is_positive() { dec(90) } else { dec(-90) };
    }
    let (ax, ay) = (x.abs(), y.abs());
    let base = if ax == ay {
        dec(45)
    } else {
        let p = digits + GUARD;
        let (num, den, inverted) = if ay > ax {
            (&ax, &ay, true)
        } else {
            (&ay, &ax, false)
        };
        let ratio = div(num, den, p);
        let rad = atan_fixed(&to_fixed(&ratio, p), p);
        let deg = rad * pow10(p) * 180u8 / pi_fixed(p);
        let deg = from_fixed(deg, p);
        if inverted {
            dec(90) - deg
        } else {
            deg
        }
    };
    let angle = match (x.is_positive(), y.is_positive()) {
        (true, true) => base,
        (false, true) => dec(180) - base,
        (false, false) => base - dec(180),
        (true, false) => -base,
    };
    round_sig(&angle, digits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn close(a: &Decimal, b: &Decimal, digits: u32) -> bool {
        (a - b).abs() <= ten_to_minus(digits)
    }

    #[test]
    fn round_half_even() {
        assert_eq!(round_sig(&d("1.25"), 2), d("1.2"));
        assert_eq!(round_sig(&d("1.35"), 2), d("1.4"));
        assert_eq!(round_sig(&d("-1.251"), 2), d("-1.3"));
        assert_eq!(round_sig(&d("123456"), 3), d("123000"));
        assert_eq!(round_sig(&d("0.000123456"), 2), d("0.00012"));
        assert_eq!(round_sig(&d("9.99"), 2), d("10"));
    }

    #[test]
    fn division_rounds_correctly() {
        assert_eq!(div(&d("1"), &d("3"), 5), d("0.33333"));
        assert_eq!(div(&d("2"), &d("3"), 5), d("0.66667"));
        assert_eq!(div(&d("10"), &d("4"), 5), d("2.5"));
        assert_eq!(div(&d("-7"), &d("0.5"), 5), d("-14"));
        assert!(div(&d("1"), &d("0"), 5).is_zero());
    }

    #[test]
    fn square_roots() {
        assert_eq!(
            sqrt(&d("2"), 28),
            d("1.414213562373095048801688724")
        );
        assert_eq!(sqrt(&d("0.81"), 10), d("0.9"));
        assert!(sqrt(&d("-1"), 10).is_zero());
        assert_eq!(exact_sqrt(&d("0.0144")), Some(d("0.12")));
        assert_eq!(exact_sqrt(&d("1e2")), Some(d("10")));
        assert_eq!(exact_sqrt(&d("2")), None);
    }

    #[test]
    fn cube_roots() {
        assert_eq!(cbrt(&d("27"), 20), d("3"));
        assert_eq!(cbrt(&d("-0.008"), 20), d("-0.2"));
        assert_eq!(cbrt(&d("2"), 28), d("1.259921049894873164767210607"));
        assert_eq!(cbrt(&d("1e-7"), 10), d("0.004641588834"));
        assert!(cbrt(&d("0"), 10).is_zero());
    }

    #[test]
    fn pi_digits() {
        assert_eq!(pi(30), d("3.14159265358979323846264338328"));
    }

    #[test]
    fn trig_quadrants_are_exact() {
        assert_eq!(sin_cos_deg(&d("90"), 20), (d("1"), d("0")));
        assert_eq!(sin_cos_deg(&d("-90"), 20), (d("-1"), d("0")));
        assert_eq!(sin_cos_deg(&d("540"), 20), (d("0"), d("-1")));
        assert_eq!(sin_cos_deg(&d("0"), 20), (d("0"), d("1")));
    }

    #[test]
    fn trig_general_angles() {
        let (s, c) = sin_cos_deg(&d("30"), 30);
        assert!(close(&s, &d("0.5"), 29));
        assert!(close(&c, &d("0.866025403784438646763723170753"), 29));
        let (s, c) = sin_cos_deg(&d("-135"), 30);
        assert!(close(&s, &d("-0.707106781186547524400844362105"), 29));
        assert!(close(&c, &d("-0.707106781186547524400844362105"), 29));
        let (s, _) = sin_cos_deg(&d("1"), 25);
        assert!(close(&s, &d("0.01745240643728351281941897851632"), 24));
    }

    #[test]
    fn atan2_exact_and_general() {
        assert_eq!(atan2_deg(&d("0"), &d("-3"), 20), d("180"));
        assert_eq!(atan2_deg(&d("-2"), &d("0"), 20), d("-90"));
        assert_eq!(atan2_deg(&d("-2"), &d("-2"), 20), d("-135"));
        let a = atan2_deg(&d("1"), &d("2"), 30);
        assert!(close(&a, &d("26.5650511770779893515721937205"), 28));
        let a = atan2_deg(&d("2"), &d("-1"), 30);
        assert!(close(&a, &d("116.565051177077989351572193721"), 27));
    }

    #[test]
    fn trig_inverse_consistency() {
        let (s, c) = sin_cos_deg(&d("123.456"), 40);
        let back = atan2_deg(&s, &c, 40);
        assert!(close(&back, &d("123.456"), 35));
    }
}
