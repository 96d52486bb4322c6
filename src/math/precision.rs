#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

use super::decimal::{ten_to_minus, Decimal};

/// Precision policy for one offset or bevel call.
///
/// `baseline` is the number of significant digits the caller considers
/// meaningful; `additional` guard digits are carried through intermediate
/// evaluation and dropped when results are rounded for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Precision {
    /// Significant digits of every output value.
    pub baseline: u32,
    /// Guard digits used during evaluation.
    pub additional: u32,
}

impl Precision {
    /// Significant digits of a default decimal context.
    pub const DEFAULT_BASELINE: u32 = 28;

    /// Guard digits of the automatic modes.
    pub const DEFAULT_ADDITIONAL: u32 = 8;

    /// Creates a validated precision policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ZeroBaseline` if `baseline` is zero.
    pub fn new(baseline: u32, additional: u32) -> Result<Self> {
        let precision = Self {
            baseline,
            additional,
        };
        precision.validate()?;
        Ok(precision)
    }

    /// Checks that the policy can be used for evaluation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ZeroBaseline` if `baseline` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.baseline == 0 {
            return Err(ConfigurationError::ZeroBaseline.into());
        }
        Ok(())
    }

    /// Digits carried through intermediate evaluation.
    #[must_use]
    pub fn full(&self) -> u64 {
        u64::from(self.baseline) + u64::from(self.additional)
    }

    /// Tolerance for every "equal", "zero" and "within range" decision.
    #[must_use]
    pub fn epsilon(&self) -> Decimal {
        ten_to_minus(self.baseline)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            baseline: Self::DEFAULT_BASELINE,
            additional: Self::DEFAULT_ADDITIONAL,
        }
    }
}

/// How much of the pipeline stays in closed algebraic form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// Offset segments and intersections are built symbolically and rounded once.
    Exact,
    /// Every step is decimal arithmetic at `baseline + additional` digits.
    #[default]
    AutoNumeric,
    /// Offset segments are symbolic, intersections are numeric.
    AutoIntersectionsNumeric,
}

impl Mode {
    /// Whether offset segment construction keeps expressions symbolic.
    #[must_use]
    pub fn symbolic_segments(self) -> bool {
        matches!(self, Self::Exact | Self::AutoIntersectionsNumeric)
    }

    /// Whether intersection solving keeps expressions symbolic.
    #[must_use]
    pub fn symbolic_intersections(self) -> bool {
        matches!(self, Self::Exact)
    }
}
