//! Values that are either rounded decimals or deferred algebraic expressions.
//!
//! Arithmetic between two numeric values rounds immediately to the larger of
//! their digit counts. As soon as a symbolic value takes part, the result is
//! an expression node and rounding is deferred to evaluation.

use std::collections::HashMap;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use num_traits::{One, Zero};

use super::decimal::{self, Decimal};

/// Node of a deferred expression tree.
///
/// Angles are in degrees.
#[derive(Debug)]
pub enum Expr {
    Const(Decimal),
    Neg(Arc<Expr>),
    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Sqrt(Arc<Expr>),
    Cbrt(Arc<Expr>),
    SinDeg(Arc<Expr>),
    CosDeg(Arc<Expr>),
    Atan2Deg(Arc<Expr>, Arc<Expr>),
    Pi,
}

/// A scalar flowing through segment construction and intersection solving.
#[derive(Debug, Clone)]
pub enum Real {
    /// Decimal already rounded to `digits` significant digits.
    Num { value: Decimal, digits: u64 },
    /// Deferred expression.
    Sym(Arc<Expr>),
}

impl Real {
    /// A numeric value rounded to `digits`.
    #[must_use]
    pub fn num(value: &Decimal, digits: u64) -> Self {
        Self::Num {
            value: decimal::round_sig(value, digits),
            digits,
        }
    }

    /// An exact symbolic constant.
    #[must_use]
    pub fn exact(value: Decimal) -> Self {
        Self::Sym(Arc::new(Expr::Const(value)))
    }

    /// π, either deferred or rounded to `digits`.
    #[must_use]
    pub fn pi(symbolic: bool, digits: u64) -> Self {
        if symbolic {
            Self::sym(Expr::Pi)
        } else {
            Self::Num {
                value: decimal::pi(digits),
                digits,
            }
        }
    }

    /// Returns the exact constant if this is a folded symbolic value.
    #[must_use]
    pub fn as_const(&self) -> Option<&Decimal> {
        match self {
            Self::Sym(e) => match e.as_ref() {
                Expr::Const(c) => Some(c),
                _ => None,
            },
            Self::Num { .. } => None,
        }
    }

    /// Whether this value is a deferred expression.
    #[must_use]
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Sym(_))
    }

    fn lift(&self) -> Arc<Expr> {
        match self {
            Self::Num { value, .. } => Arc::new(Expr::Const(value.clone())),
            Self::Sym(e) => Arc::clone(e),
        }
    }

    fn sym(expr: Expr) -> Self {
        Self::Sym(Arc::new(expr))
    }

    /// `self * self`.
    #[must_use]
    pub fn square(&self) -> Self {
        self * self
    }

    /// Square root; symbolic perfect squares fold to constants.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        match self {
            Self::Num { value, digits } => Self::Num {
                value: decimal::sqrt(value, *digits),
                digits: *digits,
            },
            Self::Sym(e) => match e.as_ref() {
                Expr::Const(c) => decimal::exact_sqrt(c)
                    .map_or_else(|| Self::sym(Expr::Sqrt(Arc::clone(e))), Self::exact),
                _ => Self::sym(Expr::Sqrt(Arc::clone(e))),
            },
        }
    }

    /// Real cube root.
    #[must_use]
    pub fn cbrt(&self) -> Self {
        match self {
            Self::Num { value, digits } => Self::Num {
                value: decimal::cbrt(value, *digits),
                digits: *digits,
            },
            Self::Sym(e) => match e.as_ref() {
                Expr::Const(c) if c.is_zero() => Self::exact(Decimal::zero()),
                _ => Self::sym(Expr::Cbrt(Arc::clone(e))),
            },
        }
    }

    /// Sine and cosine of an angle in degrees.
    #[must_use]
    pub fn sin_cos_deg(&self) -> (Self, Self) {
        match self {
            Self::Num { value, digits } => {
                let (s, c) = decimal::sin_cos_deg(value, *digits);
                (
                    Self::Num {
                        value: s,
                        digits: *digits,
                    },
                    Self::Num {
                        value: c,
                        digits: *digits,
                    },
                )
            }
            Self::Sym(e) => {
                if let Some((s, c)) = self.as_const().and_then(decimal::exact_sin_cos_deg) {
                    return (Self::exact(s), Self::exact(c));
                }
                (
                    Self::sym(Expr::SinDeg(Arc::clone(e))),
                    Self::sym(Expr::CosDeg(Arc::clone(e))),
                )
            }
        }
    }

    /// Angle of `(x, y)` in degrees, in `(-180, 180]`.
    #[must_use]
    pub fn atan2_deg(y: &Self, x: &Self) -> Self {
        match (y, x) {
            (Self::Num { value: vy, digits: dy }, Self::Num { value: vx, digits: dx }) => {
                let digits = (*dy).max(*dx);
                Self::Num {
                    value: decimal::atan2_deg(vy, vx, digits),
                    digits,
                }
            }
            _ => {
                if let (Some(cy), Some(cx)) = (y.as_const(), x.as_const()) {
                    if cy.is_zero() || cx.is_zero() || cy.abs() == cx.abs() {
                        // Axis and diagonal results are exact at any digit count.
                        return Self::exact(decimal::atan2_deg(cy, cx, 16));
                    }
                }
                Self::sym(Expr::Atan2Deg(y.lift(), x.lift()))
            }
        }
    }
}

fn add_real(a: &Real, b: &Real) -> Real {
    match (a, b) {
        (Real::Num { value: va, digits: da }, Real::Num { value: vb, digits: db }) => {
            let digits = (*da).max(*db);
            Real::num(&(va + vb), digits)
        }
        _ => match (a.as_const(), b.as_const()) {
            (Some(ca), Some(cb)) => Real::exact(ca + cb),
            (Some(ca), None) if ca.is_zero() => Real::Sym(b.lift()),
            (None, Some(cb)) if cb.is_zero() => Real::Sym(a.lift()),
            _ => Real::sym(Expr::Add(a.lift(), b.lift())),
        },
    }
}

fn sub_real(a: &Real, b: &Real) -> Real {
    match (a, b) {
        (Real::Num { value: va, digits: da }, Real::Num { value: vb, digits: db }) => {
            let digits = (*da).max(*db);
            Real::num(&(va - vb), digits)
        }
        _ => match (a.as_const(), b.as_const()) {
            (Some(ca), Some(cb)) => Real::exact(ca - cb),
            (None, Some(cb)) if cb.is_zero() => Real::Sym(a.lift()),
            (Some(ca), None) if ca.is_zero() => neg_real(b),
            _ => Real::sym(Expr::Sub(a.lift(), b.lift())),
        },
    }
}

fn mul_real(a: &Real, b: &Real) -> Real {
    match (a, b) {
        (Real::Num { value: va, digits: da }, Real::Num { value: vb, digits: db }) => {
            let digits = (*da).max(*db);
            Real::num(&(va * vb), digits)
        }
        _ => match (a.as_const(), b.as_const()) {
            (Some(ca), Some(cb)) => Real::exact(ca * cb),
            (Some(c), None) | (None, Some(c)) if c.is_zero() => Real::exact(Decimal::zero()),
            (Some(ca), None) if ca.is_one() => Real::Sym(b.lift()),
            (None, Some(cb)) if cb.is_one() => Real::Sym(a.lift()),
            _ => Real::sym(Expr::Mul(a.lift(), b.lift())),
        },
    }
}

/// Quotient of two constants when it is a terminating decimal.
fn exact_quotient(a: &Decimal, b: &Decimal) -> Option<Decimal> {
    if b.is_zero() {
        return None;
    }
    let digits = a.digits() + b.digits() + 24;
    let q = decimal::div(a, b, digits);
    (&q * b == *a).then_some(q)
}

fn div_real(a: &Real, b: &Real) -> Real {
    match (a, b) {
        (Real::Num { value: va, digits: da }, Real::Num { value: vb, digits: db }) => {
            let digits = (*da).max(*db);
            Real::Num {
                value: decimal::div(va, vb, digits),
                digits,
            }
        }
        _ => match (a.as_const(), b.as_const()) {
            (Some(ca), Some(cb)) => exact_quotient(ca, cb)
                .map_or_else(|| Real::sym(Expr::Div(a.lift(), b.lift())), Real::exact),
            (Some(ca), None) if ca.is_zero() => Real::exact(Decimal::zero()),
            (None, Some(cb)) if cb.is_one() => Real::Sym(a.lift()),
            _ => Real::sym(Expr::Div(a.lift(), b.lift())),
        },
    }
}

fn neg_real(a: &Real) -> Real {
    match a {
        Real::Num { value, digits } => Real::Num {
            value: -value,
            digits: *digits,
        },
        Real::Sym(e) => match e.as_ref() {
            Expr::Const(c) => Real::exact(-c),
            Expr::Neg(inner) => Real::Sym(Arc::clone(inner)),
            _ => Real::sym(Expr::Neg(Arc::clone(e))),
        },
    }
}

macro_rules! impl_real_op {
    ($trait:ident, $method:ident, $func:ident) => {
        impl $trait<&Real> for &Real {
            type Output = Real;
            fn $method(self, rhs: &Real) -> Real {
                $func(self, rhs)
            }
        }

        impl $trait<Real> for Real {
            type Output = Real;
            fn $method(self, rhs: Real) -> Real {
                $func(&self, &rhs)
            }
        }

        impl $trait<&Real> for Real {
            type Output = Real;
            fn $method(self, rhs: &Real) -> Real {
                $func(&self, rhs)
            }
        }

        impl $trait<Real> for &Real {
            type Output = Real;
            fn $method(self, rhs: Real) -> Real {
                $func(self, &rhs)
            }
        }
    };
}

impl_real_op!(Add, add, add_real);
impl_real_op!(Sub, sub, sub_real);
impl_real_op!(Mul, mul, mul_real);
impl_real_op!(Div, div, div_real);

impl Neg for Real {
    type Output = Real;
    fn neg(self) -> Real {
        neg_real(&self)
    }
}

impl Neg for &Real {
    type Output = Real;
    fn neg(self) -> Real {
        neg_real(self)
    }
}

/// Memoizing evaluator for expression trees.
///
/// Entries keep their node alive so that pointer keys stay unique for the
/// lifetime of the evaluator.
#[derive(Debug, Default)]
pub(crate) struct Evaluator {
    memo: HashMap<(usize, u64), (Arc<Expr>, Decimal)>,
}

impl Evaluator {
    /// Evaluates `value` with every intermediate step rounded to `digits`.
    pub(crate) fn value(&mut self, value: &Real, digits: u64) -> Decimal {
        match value {
            Real::Num { value, .. } => value.clone(),
            Real::Sym(e) => self.eval(e, digits),
        }
    }

    fn eval(&mut self, expr: &Arc<Expr>, digits: u64) -> Decimal {
        if let Expr::Const(c) = expr.as_ref() {
            return c.clone();
        }
        let key = (Arc::as_ptr(expr) as usize, digits);
        if let Some((_, v)) = self.memo.get(&key) {
            return v.clone();
        }
        let v = match expr.as_ref() {
            Expr::Const(c) => c.clone(),
            Expr::Neg(a) => -self.eval(a, digits),
            Expr::Add(a, b) => {
                let s = self.eval(a, digits) + self.eval(b, digits);
                decimal::round_sig(&s, digits)
            }
            Expr::Sub(a, b) => {
                let s = self.eval(a, digits) - self.eval(b, digits);
                decimal::round_sig(&s, digits)
            }
            Expr::Mul(a, b) => {
                let p = self.eval(a, digits) * self.eval(b, digits);
                decimal::round_sig(&p, digits)
            }
            Expr::Div(a, b) => {
                let (va, vb) = (self.eval(a, digits), self.eval(b, digits));
                decimal::div(&va, &vb, digits)
            }
            Expr::Sqrt(a) => decimal::sqrt(&self.eval(a, digits), digits),
            Expr::Cbrt(a) => decimal::cbrt(&self.eval(a, digits), digits),
            Expr::SinDeg(a) => decimal::sin_cos_deg(&self.eval(a, digits), digits).0,
            Expr::CosDeg(a) => decimal::sin_cos_deg(&self.eval(a, digits), digits).1,
            Expr::Atan2Deg(y, x) => {
                let (vy, vx) = (self.eval(y, digits), self.eval(x, digits));
                decimal::atan2_deg(&vy, &vx, digits)
            }
            Expr::Pi => decimal::pi(digits),
        };
        self.memo.insert(key, (Arc::clone(expr), v.clone()));
        v
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn numeric_ops_round_each_step() {
        let a = Real::num(&d("1"), 5);
        let b = Real::num(&d("3"), 5);
        let q = &a / &b;
        match &q {
            Real::Num { value, digits } => {
                assert_eq!(*value, d("0.33333"));
                assert_eq!(*digits, 5);
            }
            Real::Sym(_) => panic!("expected numeric"),
        }
        let back = q * b;
        assert_eq!(Evaluator::default().value(&back, 5), d("0.99999"));
    }

    #[test]
    fn symbolic_constants_fold() {
        let a = Real::exact(d("1.5"));
        let b = Real::exact(d("2"));
        assert_eq!((&a * &b).as_const(), Some(&d("3.0")));
        assert!((&a - &a).as_const().is_some_and(|c| c.is_zero()));
        assert_eq!(Real::exact(d("0.25")).sqrt().as_const(), Some(&d("0.5")));
        let (s, c) = Real::exact(d("-270")).sin_cos_deg();
        assert_eq!(s.as_const(), Some(&d("1")));
        assert_eq!(c.as_const(), Some(&d("0")));
        let angle = Real::atan2_deg(&Real::exact(d("-1")), &Real::exact(d("-1")));
        assert_eq!(angle.as_const(), Some(&d("-135")));
        assert_eq!((&b / &Real::exact(d("8"))).as_const(), Some(&d("0.25")));
    }

    #[test]
    fn symbolic_defers_until_evaluation() {
        let third = Real::exact(d("1")) / Real::exact(d("3"));
        assert!(third.as_const().is_none());
        let one = &third * &Real::exact(d("3"));
        let mut ev = Evaluator::default();
        assert_eq!(ev.value(&one, 10), d("0.9999999999"));
        let root = Real::exact(d("2")).sqrt();
        let two = root.square();
        assert_eq!(decimal::round_sig(&ev.value(&two, 40), 30), d("2"));
    }

    #[test]
    fn mixing_lifts_numbers_into_expressions() {
        let n = Real::num(&d("2"), 10);
        let s = Real::exact(d("3")).sqrt();
        let m = &n * &s;
        assert!(m.is_symbolic());
        let v = Evaluator::default().value(&m, 20);
        assert!((v - d("3.4641016151377545870")).abs() < d("1e-18"));
    }

    #[test]
    fn negation_collapses() {
        let s = Real::exact(d("2")).sqrt();
        let back = -(-&s);
        match (&s, &back) {
            (Real::Sym(a), Real::Sym(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected symbolic"),
        }
    }
}
