//! Weight-sum checks for normal variables.
//!
//! Runs at load and reload only. Resolution never consults it and
//! normalizes by whatever the weights actually add up to.
//!
//! Known inconsistency: the check sums every `weight::` line in the list,
//! including lines the resolver never binds (a weight with no
//! `number::` line directly before it, or a second weight in a row).
//! Both behaviours are kept as they are, since existing configuration
//! files depend on them.

use crate::error::{DefinitionError, LineError};
use crate::line::{parse_line, LineKind, NumberRange};
use crate::var_name::VarName;

/// Allowed distance between the weight total and 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-4;

/// Sum of every well-formed `weight::` line in `lines`, paired or not.
///
/// Malformed weight lines are skipped and returned as errors.
///
/// # Examples
///
/// ```rust
/// use loreroll::weight::declared_weight_total;
///
/// let (total, errors) = declared_weight_total(&[
///     "number::1_2_0",
///     "weight::0.25",
///     "weight::0.25",
///     "weight::bad",
/// ]);
/// assert_eq!(total, 0.5);
/// assert_eq!(errors.len(), 1);
/// ```
pub fn declared_weight_total<S: AsRef<str>>(lines: &[S]) -> (f64, Vec<LineError>) {
    let mut total = 0.0;
    let mut errors = Vec::new();
    for line in lines {
        match parse_line(line.as_ref()) {
            Ok(LineKind::Weight(weight)) => total += weight,
            Err(err @ LineError::InvalidWeight { .. }) => errors.push(err),
            _ => {}
        }
    }
    (total, errors)
}

/// Sum of the weights the resolver will actually sample with.
pub fn range_weight_total(ranges: &[NumberRange]) -> f64 {
    ranges.iter().map(|range| range.weight).sum()
}

/// Flag a weight total that drifts from 1.0 by more than [`WEIGHT_TOLERANCE`].
///
/// # Examples
///
/// ```rust
/// use loreroll::weight::check_weight_sum;
/// use loreroll::VarName;
///
/// let name = VarName::from_str("atk");
/// assert!(check_weight_sum(&name, 0.3 + 0.7).is_ok());
/// assert!(check_weight_sum(&name, 0.9).is_err());
/// ```
pub fn check_weight_sum(name: &VarName, total: f64) -> Result<(), DefinitionError> {
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(DefinitionError::WeightSumDrift {
            name: name.clone(),
            total,
        });
    }
    Ok(())
}
