use std::cmp::Ordering;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::curve::Curve;
use crate::geometry::Outline;
use crate::math::{Context, Real};

/// An original segment and its offset.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    /// Position of the original segment in the outline.
    pub index: usize,
    pub original: Curve,
    pub offset: Curve,
}

/// Surviving offset candidates in traversal order.
#[derive(Debug)]
pub(crate) struct Candidates {
    pub outline_ccw: bool,
    pub items: Vec<Candidate>,
}

/// Offsets every segment of `outline` by `distance` toward its interior.
///
/// Segments without extent are skipped. Candidates that degenerate are
/// dropped so that their neighbors get joined directly.
///
/// # Errors
///
/// Returns `OperationError::DegenerateOutline` if the outline encloses no
/// area or fewer than two candidates survive.
pub(crate) fn build(outline: &Outline, distance: &Real, ctx: &Context) -> Result<Candidates> {
    let curves: Vec<(usize, Curve)> = outline
        .curves(ctx)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, c)| c.map(|c| (i, c)))
        .collect();
    let originals: Vec<Curve> = curves.iter().map(|(_, c)| c.clone()).collect();
    let outline_ccw = match ctx.sign(&Outline::signed_area_of(&originals, ctx)) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => {
            return Err(
                OperationError::DegenerateOutline("outline encloses no area".to_owned()).into(),
            )
        }
    };

    let mut items = Vec::with_capacity(curves.len());
    for (index, original) in curves {
        match original.offset(distance, outline_ccw, ctx) {
            Some(offset) => items.push(Candidate {
                index,
                original,
                offset,
            }),
            None => debug!("Dropping degenerate offset of segment {}", index),
        }
    }
    if items.len() < 2 {
        return Err(OperationError::DegenerateOutline(format!(
            "{} of {} segments survive the offset",
            items.len(),
            outline.len()
        ))
        .into());
    }
    Ok(Candidates { outline_ccw, items })
}
