mod assemble;
mod bevel;
mod candidate;
mod join;
mod self_intersect;
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_paths;

pub use bevel::{BevelKind, BevelRegion};

use num_traits::Zero;
use tracing::debug;

use crate::error::Result;
use crate::geometry::Outline;
use crate::math::{Context, Decimal, Mode, Precision};

use candidate::Candidates;
use join::Joint;

/// Validated input, surviving candidates and their joints.
struct Joined {
    ctx: Context,
    cands: Candidates,
    joints: Vec<Joint>,
}

fn joined(outline: &Outline, distance: &Decimal, precision: Precision, mode: Mode) -> Result<Joined> {
    let (seg_ctx, ctx) = Context::pair(precision, mode);
    let mut cands = candidate::build(outline, &seg_ctx.real(distance), &seg_ctx)?;
    let joints = join::join_all(&mut cands, &ctx.real(&distance.abs()), &ctx)?;
    Ok(Joined { ctx, cands, joints })
}

fn check(outline: &Outline, precision: Precision) -> Result<()> {
    precision.validate()?;
    outline.validate()
}

/// Offsets a closed outline of lines and elliptical arcs.
///
/// A positive distance moves every segment toward the interior, whatever
/// the outline's orientation; a negative distance moves it outward. Corners
/// are joined by extending or trimming neighbors, loops the offset folds
/// into are removed, and the result keeps the input's orientation.
#[derive(Debug)]
pub struct OutlineOffset2D {
    outline: Outline,
    distance: Decimal,
    precision: Precision,
    mode: Mode,
}

impl OutlineOffset2D {
    /// Creates a new offset operation with the default precision and mode.
    #[must_use]
    pub fn new(outline: Outline, distance: Decimal) -> Self {
        Self {
            outline,
            distance,
            precision: Precision::default(),
            mode: Mode::default(),
        }
    }

    /// Sets the precision policy.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the evaluation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an invalid precision, a geometry
    /// error for an empty, open or curve-bearing outline,
    /// `OperationError::AmbiguousIntersection` for overlapping offset
    /// segments and `OperationError::DegenerateOutline` when the offset
    /// collapses the outline.
    pub fn execute(&self) -> Result<Outline> {
        check(&self.outline, self.precision)?;
        if self.distance.is_zero() {
            return Ok(self.outline.clone());
        }
        debug!(
            "Offsetting {} segments by {} ({:?})",
            self.outline.len(),
            self.distance,
            self.mode
        );
        let Joined { ctx, cands, joints } =
            joined(&self.outline, &self.distance, self.precision, self.mode)?;
        let pieces = assemble::pieces(&cands, &joints, &ctx);
        let pruned = self_intersect::prune(pieces, cands.outline_ccw, &ctx)?;
        assemble::outline(&pruned, cands.outline_ccw, &ctx)
    }
}

/// Splits the band between a closed outline and its offset into small
/// closed regions.
///
/// Every joint that needs a connector contributes a fan of triangles from
/// the original vertex, and every segment with a surviving offset
/// contributes the quad between it and its trimmed offset. Regions come in
/// traversal order, starting at the first vertex. Their signed areas sum to
/// the area between the outline and the joined offset.
#[derive(Debug)]
pub struct OutlineBevel2D {
    outline: Outline,
    distance: Decimal,
    precision: Precision,
    mode: Mode,
}

impl OutlineBevel2D {
    /// Creates a new bevel operation with the default precision and mode.
    #[must_use]
    pub fn new(outline: Outline, distance: Decimal) -> Self {
        Self {
            outline,
            distance,
            precision: Precision::default(),
            mode: Mode::default(),
        }
    }

    /// Sets the precision policy.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the evaluation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Executes the bevel, returning the regions with their surface kind.
    ///
    /// A zero distance has no band and yields no regions.
    ///
    /// # Errors
    ///
    /// Same as [`OutlineOffset2D::execute`].
    pub fn execute_regions(&self) -> Result<Vec<BevelRegion>> {
        check(&self.outline, self.precision)?;
        if self.distance.is_zero() {
            return Ok(Vec::new());
        }
        debug!(
            "Beveling {} segments by {} ({:?})",
            self.outline.len(),
            self.distance,
            self.mode
        );
        let Joined { ctx, cands, joints } =
            joined(&self.outline, &self.distance, self.precision, self.mode)?;
        Ok(bevel::regions(&cands, &joints, &ctx))
    }

    /// Executes the bevel, returning the region outlines.
    ///
    /// # Errors
    ///
    /// Same as [`OutlineOffset2D::execute`].
    pub fn execute(&self) -> Result<Vec<Outline>> {
        Ok(self
            .execute_regions()?
            .into_iter()
            .map(|r| r.outline)
            .collect())
    }
}

/// Offsets `outline` by `distance`; see [`OutlineOffset2D`].
///
/// # Errors
///
/// Same as [`OutlineOffset2D::execute`].
pub fn offset(outline: &Outline, distance: &Decimal, precision: Precision, mode: Mode) -> Result<Outline> {
    OutlineOffset2D::new(outline.clone(), distance.clone())
        .with_precision(precision)
        .with_mode(mode)
        .execute()
}

/// Bevel regions of `outline` at `distance`; see [`OutlineBevel2D`].
///
/// # Errors
///
/// Same as [`OutlineOffset2D::execute`].
pub fn bevel(outline: &Outline, distance: &Decimal, precision: Precision, mode: Mode) -> Result<Vec<Outline>> {
    OutlineBevel2D::new(outline.clone(), distance.clone())
        .with_precision(precision)
        .with_mode(mode)
        .execute()
}
