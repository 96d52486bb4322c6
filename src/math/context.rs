use std::cell::RefCell;
use std::cmp::Ordering;

use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::Result;

use super::decimal::{self, Decimal};
use super::precision::{Mode, Precision};
use super::real::{Evaluator, Real};

/// Maximum number of guard-digit escalations when rounding symbolic values.
const MAX_ESCALATIONS: u32 = 4;

/// Per-call evaluation context.
///
/// Creates values in the representation chosen by the mode, answers
/// tolerance questions at the active precision, and rounds values for output.
/// The memo lives and dies with the context.
#[derive(Debug)]
pub struct Context {
    precision: Precision,
    symbolic: bool,
    epsilon: Decimal,
    evaluator: RefCell<Evaluator>,
}

impl Context {
    /// Creates a context producing symbolic or numeric values.
    #[must_use]
    pub fn new(precision: Precision, symbolic: bool) -> Self {
        Self {
            precision,
            symbolic,
            epsilon: precision.epsilon(),
            evaluator: RefCell::new(Evaluator::default()),
        }
    }

    /// Contexts for segment construction and for intersection solving.
    #[must_use]
    pub fn pair(precision: Precision, mode: Mode) -> (Self, Self) {
        (
            Self::new(precision, mode.symbolic_segments()),
            Self::new(precision, mode.symbolic_intersections()),
        )
    }

    /// The active precision policy.
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Whether new values are deferred expressions.
    #[must_use]
    pub fn is_symbolic(&self) -> bool {
        self.symbolic
    }

    /// Tolerance used for every comparison.
    #[must_use]
    pub fn epsilon(&self) -> &Decimal {
        &self.epsilon
    }

    /// Brings a decimal into this context.
    #[must_use]
    pub fn real(&self, value: &Decimal) -> Real {
        if self.symbolic {
            Real::exact(value.clone())
        } else {
            Real::num(value, self.precision.full())
        }
    }

    /// Brings an integer into this context.
    #[must_use]
    pub fn int(&self, value: i64) -> Real {
        self.real(&decimal::dec(value))
    }

    /// π in this context.
    #[must_use]
    pub fn pi(&self) -> Real {
        Real::pi(self.symbolic, self.precision.full())
    }

    /// Numeric value at `baseline + additional` digits, used for decisions.
    #[must_use]
    pub fn value(&self, value: &Real) -> Decimal {
        match value {
            Real::Num { value, .. } => value.clone(),
            Real::Sym(_) => self
                .evaluator
                .borrow_mut()
                .value(value, self.precision.full()),
        }
    }

    /// Converts a value into this context's representation.
    ///
    /// Symbolic values entering a numeric context are evaluated once at
    /// full precision.
    #[must_use]
    pub fn adopt(&self, value: &Real) -> Real {
        match value {
            Real::Sym(_) if !self.symbolic => Real::num(&self.value(value), self.precision.full()),
            Real::Num { value, .. } if self.symbolic => Real::exact(value.clone()),
            _ => value.clone(),
        }
    }

    /// Approximate `f64` value for flattened output.
    #[must_use]
    pub fn to_f64(&self, value: &Real) -> f64 {
        self.value(value).to_f64().unwrap_or(f64::NAN)
    }

    /// Rounds a value to `baseline` digits for output.
    ///
    /// Symbolic values are re-evaluated with growing guard digits until two
    /// successive results agree. Magnitudes below epsilon become exactly zero.
    #[must_use]
    pub fn round(&self, value: &Real) -> Decimal {
        match value {
            Real::Num { value, .. } => self.finish(value),
            Real::Sym(_) => {
                if let Some(c) = value.as_const() {
                    return self.finish(c);
                }
                let baseline = u64::from(self.precision.baseline);
                let mut guard = u64::from(self.precision.additional).max(4);
                let mut evaluator = self.evaluator.borrow_mut();
                let mut previous = self.finish(&evaluator.value(value, baseline + guard));
                for _ in 0..MAX_ESCALATIONS {
                    guard *= 2;
                    let current = self.finish(&evaluator.value(value, baseline + guard));
                    if current == previous {
                        break;
                    }
                    previous = current;
                }
                previous
            }
        }
    }

    fn finish(&self, value: &Decimal) -> Decimal {
        if value.abs() < self.epsilon {
            return Decimal::zero();
        }
        decimal::round_sig(value, u64::from(self.precision.baseline)).normalized()
    }

    /// Sign of `value` with magnitudes up to epsilon treated as zero.
    #[must_use]
    pub fn sign(&self, value: &Real) -> Ordering {
        let v = self.value(value);
        if v.abs() <= self.epsilon {
            Ordering::Equal
        } else if v.is_positive() {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }

    /// Whether `value` is zero within epsilon.
    #[must_use]
    pub fn is_zero(&self, value: &Real) -> bool {
        self.sign(value) == Ordering::Equal
    }

    /// Tolerant comparison of two values.
    #[must_use]
    pub fn cmp(&self, a: &Real, b: &Real) -> Ordering {
        self.sign(&(a - b))
    }

    /// `a <= b` within epsilon.
    #[must_use]
    pub fn le(&self, a: &Real, b: &Real) -> bool {
        self.cmp(a, b) != Ordering::Greater
    }

    /// `a < b` by more than epsilon.
    #[must_use]
    pub fn lt(&self, a: &Real, b: &Real) -> bool {
        self.cmp(a, b) == Ordering::Less
    }
}

/// Evaluates `value` to `baseline` significant digits under `mode`.
///
/// In [`Mode::Exact`] deferred expressions are evaluated with escalating
/// guard digits until the rounded result is stable. The numeric modes
/// evaluate every node at `baseline + additional` digits and round once.
///
/// # Errors
///
/// Returns `ConfigurationError::ZeroBaseline` if the precision is invalid.
pub fn evaluate(value: &Real, precision: Precision, mode: Mode) -> Result<Decimal> {
    precision.validate()?;
    let ctx = Context::new(precision, mode.symbolic_intersections());
    Ok(ctx.round(&ctx.adopt(value)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn output_rounding_snaps_tiny_values() {
        let ctx = Context::new(Precision::new(5, 3).unwrap(), false);
        assert_eq!(ctx.round(&ctx.real(&d("1.234567"))), d("1.2346"));
        assert!(ctx.round(&ctx.real(&d("0.000001"))).is_zero());
        assert_eq!(ctx.round(&ctx.real(&d("2.5000"))).to_string(), "2.5");
    }

    #[test]
    fn tolerant_comparisons() {
        let ctx = Context::new(Precision::new(10, 5).unwrap(), false);
        let a = ctx.real(&d("1"));
        let b = ctx.real(&d("1.00000000000001"));
        assert_eq!(ctx.cmp(&a, &b), Ordering::Equal);
        assert!(ctx.le(&b, &a));
        assert!(!ctx.lt(&a, &b));
        assert!(ctx.lt(&a, &ctx.real(&d("1.001"))));
    }

    #[test]
    fn symbolic_and_numeric_contexts_agree() {
        let p = Precision::default();
        for symbolic in [false, true] {
            let ctx = Context::new(p, symbolic);
            let two = ctx.int(2);
            let x = two.sqrt() * ctx.int(3) / ctx.int(7);
            let (s, c) = ctx.int(30).sin_cos_deg();
            let y = s.square() + c.square();
            assert_eq!(
                ctx.round(&x),
                d("0.6060915267313264494864380247"),
                "symbolic = {symbolic}"
            );
            assert_eq!(ctx.round(&y), d("1"), "symbolic = {symbolic}");
        }
    }

    #[test]
    fn evaluate_validates_precision() {
        let v = Real::exact(d("2")).sqrt();
        let bad = Precision {
            baseline: 0,
            additional: 8,
        };
        assert_eq!(
            evaluate(&v, bad, Mode::Exact).unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn evaluate_modes_match() {
        let p = Precision::new(20, 8).unwrap();
        let x = Real::exact(d("10")).sqrt() - Real::exact(d("3"));
        let exact = evaluate(&x, p, Mode::Exact).unwrap();
        let auto = evaluate(&x, p, Mode::AutoNumeric).unwrap();
        assert_eq!(exact, d("0.16227766016837933200"));
        assert_eq!(exact, auto);
    }
}
