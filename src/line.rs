//! Line grammar for normal-mode `values` lists.
//!
//! A normal variable is configured as an ordered list of lines:
//!
//! ```text
//! number::<min>_<max>_<decimals>
//! weight::<w>
//! ```
//!
//! A `weight::` line binds to the `number::` line directly before it.
//! The binding is purely positional, so the order of the list matters.
//! Parsing happens in two passes: every line is classified on its own
//! first, then the classified lines are paired.

use crate::error::LineError;
use serde::{Deserialize, Serialize};

/// Tag that starts a numeric range line.
pub const NUMBER_TAG: &str = "number::";

/// Tag that starts a weight line.
pub const WEIGHT_TAG: &str = "weight::";

/// Weight of a `number::` line with no `weight::` line after it.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Largest accepted `decimals` field.
pub const MAX_DECIMALS: usize = 64;

/// Bounds and precision of a `number::` line, before pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
    pub decimals: usize,
}

impl RangeSpec {
    /// Attach a weight, producing a samplable range.
    pub fn with_weight(self, weight: f64) -> NumberRange {
        NumberRange {
            min: self.min,
            max: self.max,
            decimals: self.decimals,
            weight,
        }
    }

    /// `min` lies above `max`.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

/// A weighted numeric range ready for sampling.
///
/// # Examples
///
/// ```rust
/// use loreroll::line::{parse_ranges, NumberRange};
///
/// let parsed = parse_ranges(&["number::10_20_0", "weight::0.25"]);
/// assert_eq!(
///     parsed.ranges,
///     vec![NumberRange { min: 10.0, max: 20.0, decimals: 0, weight: 0.25 }]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
    pub decimals: usize,
    pub weight: f64,
}

/// What a single line is, judged in isolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    Number(RangeSpec),
    Weight(f64),
    /// Neither tag. Ignored everywhere.
    Unrecognized,
}

/// Classify and parse a single configuration line.
///
/// Returns `Err` only for lines carrying a known tag whose payload is
/// malformed.
///
/// # Examples
///
/// ```rust
/// use loreroll::line::{parse_line, LineKind, RangeSpec};
///
/// assert_eq!(
///     parse_line("number::1.5_3_2").unwrap(),
///     LineKind::Number(RangeSpec { min: 1.5, max: 3.0, decimals: 2 })
/// );
/// assert_eq!(parse_line("weight::0.3").unwrap(), LineKind::Weight(0.3));
/// assert_eq!(parse_line("# comment").unwrap(), LineKind::Unrecognized);
/// assert!(parse_line("number::10_20").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<LineKind, LineError> {
    if let Some(rest) = line.strip_prefix(NUMBER_TAG) {
        parse_number(line, rest).map(LineKind::Number)
    } else if let Some(rest) = line.strip_prefix(WEIGHT_TAG) {
        parse_weight(line, rest).map(LineKind::Weight)
    } else {
        Ok(LineKind::Unrecognized)
    }
}

fn parse_number(line: &str, rest: &str) -> Result<RangeSpec, LineError> {
    let fields: Vec<&str> = rest.split('_').collect();
    if fields.len() != 3 {
        return Err(LineError::WrongFieldCount {
            line: line.to_string(),
            found: fields.len(),
        });
    }

    let bound = |field: &str| {
        parse_decimal(field).ok_or_else(|| LineError::InvalidBound {
            line: line.to_string(),
            field: field.to_string(),
        })
    };
    let min = bound(fields[0])?;
    let max = bound(fields[1])?;
    let decimals = fields[2]
        .parse::<usize>()
        .ok()
        .filter(|&decimals| decimals <= MAX_DECIMALS)
        .ok_or_else(|| LineError::InvalidDecimals {
            line: line.to_string(),
            field: fields[2].to_string(),
        })?;

    Ok(RangeSpec { min, max, decimals })
}

fn parse_weight(line: &str, rest: &str) -> Result<f64, LineError> {
    parse_decimal(rest).ok_or_else(|| LineError::InvalidWeight {
        line: line.to_string(),
    })
}

fn parse_decimal(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

/// Result of pairing a whole `values` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRanges {
    /// Usable ranges, in configured order.
    pub ranges: Vec<NumberRange>,
    /// Lines that were dropped, in configured order.
    pub errors: Vec<LineError>,
}

/// Parse a `values` list into weighted ranges.
///
/// Pairing rules:
/// - a `weight::` line directly after a valid `number::` line becomes its
///   weight and is consumed;
/// - a valid `number::` line with anything else after it gets
///   [`DEFAULT_WEIGHT`];
/// - a valid `number::` line followed by a malformed `weight::` line is
///   dropped together with that weight;
/// - `weight::` lines that are not consumed are ignored, as are
///   unrecognized lines.
///
/// A malformed `number::` line is dropped and does not consume the line
/// after it.
///
/// # Examples
///
/// ```rust
/// use loreroll::line::parse_ranges;
///
/// let parsed = parse_ranges(&[
///     "number::1_5_0",
///     "weight::0.7",
///     "number::5_10_1",
///     "number::10_20",
/// ]);
/// assert_eq!(parsed.ranges.len(), 2);
/// assert_eq!(parsed.ranges[0].weight, 0.7);
/// assert_eq!(parsed.ranges[1].weight, 1.0);
/// assert_eq!(parsed.errors.len(), 1);
/// ```
pub fn parse_ranges<S: AsRef<str>>(lines: &[S]) -> ParsedRanges {
    let classified: Vec<Result<LineKind, LineError>> =
        lines.iter().map(|line| parse_line(line.as_ref())).collect();

    let mut parsed = ParsedRanges::default();
    let mut idx = 0;
    while idx < classified.len() {
        match &classified[idx] {
            Ok(LineKind::Number(spec)) => match classified.get(idx + 1) {
                Some(Ok(LineKind::Weight(weight))) => {
                    parsed.ranges.push(spec.with_weight(*weight));
                    idx += 1;
                }
                Some(Err(err @ LineError::InvalidWeight { .. })) => {
                    parsed.errors.push(err.clone());
                }
                _ => parsed.ranges.push(spec.with_weight(DEFAULT_WEIGHT)),
            },
            // Stray weight errors are only reported when bound to a number line.
            Err(LineError::InvalidWeight { .. }) => {}
            Err(err) => parsed.errors.push(err.clone()),
            Ok(LineKind::Weight(_)) | Ok(LineKind::Unrecognized) => {}
        }
        idx += 1;
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_line() {
        assert_eq!(
            parse_line("number::-5_5.5_3").unwrap(),
            LineKind::Number(RangeSpec {
                min: -5.0,
                max: 5.5,
                decimals: 3
            })
        );
    }

    #[test]
    fn test_parse_number_wrong_field_count() {
        assert_eq!(
            parse_line("number::10_20"),
            Err(LineError::WrongFieldCount {
                line: "number::10_20".to_string(),
                found: 2
            })
        );
        assert!(matches!(
            parse_line("number::1_2_3_4"),
            Err(LineError::WrongFieldCount { found: 4, .. })
        ));
        assert!(matches!(
            parse_line("number::1_2_"),
            Err(LineError::InvalidDecimals { .. })
        ));
    }

    #[test]
    fn test_parse_number_bad_fields() {
        assert!(matches!(
            parse_line("number::a_2_0"),
            Err(LineError::InvalidBound { ref field, .. }) if field == "a"
        ));
        assert!(matches!(
            parse_line("number::1_b_0"),
            Err(LineError::InvalidBound { ref field, .. }) if field == "b"
        ));
        assert!(matches!(
            parse_line("number::1_2_-1"),
            Err(LineError::InvalidDecimals { .. })
        ));
        assert!(matches!(
            parse_line("number::1_2_1.5"),
            Err(LineError::InvalidDecimals { .. })
        ));
    }

    #[test]
    fn test_decimals_capped() {
        assert!(matches!(
            parse_line("number::1_2_64"),
            Ok(LineKind::Number(RangeSpec { decimals: 64, .. }))
        ));
        assert!(matches!(
            parse_line("number::1_2_65"),
            Err(LineError::InvalidDecimals { ref field, .. }) if field == "65"
        ));
        assert!(matches!(
            parse_line("number::1_2_99999999999"),
            Err(LineError::InvalidDecimals { .. })
        ));
    }

    #[test]
    fn test_bounds_tolerate_padding() {
        assert_eq!(
            parse_line("number:: 1_ 2_0").unwrap(),
            LineKind::Number(RangeSpec {
                min: 1.0,
                max: 2.0,
                decimals: 0
            })
        );
        assert_eq!(parse_line("weight:: 0.5 ").unwrap(), LineKind::Weight(0.5));
    }

    #[test]
    fn test_parse_weight_line() {
        assert_eq!(parse_line("weight::1").unwrap(), LineKind::Weight(1.0));
        assert_eq!(
            parse_line("weight::heavy"),
            Err(LineError::InvalidWeight {
                line: "weight::heavy".to_string()
            })
        );
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert_eq!(parse_line("Number::1_2_0").unwrap(), LineKind::Unrecognized);
        assert_eq!(parse_line("WEIGHT::1").unwrap(), LineKind::Unrecognized);
    }

    #[test]
    fn test_pairing_default_weight() {
        let parsed = parse_ranges(&["number::1_2_0", "number::3_4_0"]);
        assert_eq!(parsed.ranges.len(), 2);
        assert!(parsed.ranges.iter().all(|r| r.weight == DEFAULT_WEIGHT));
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_pairing_consumes_weight() {
        let parsed = parse_ranges(&[
            "number::1_2_0",
            "weight::0.2",
            "weight::0.5",
            "number::3_4_0",
            "weight::0.8",
        ]);
        let weights: Vec<f64> = parsed.ranges.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![0.2, 0.8]);
    }

    #[test]
    fn test_weight_before_number_is_ignored() {
        let parsed = parse_ranges(&["weight::0.4", "number::1_2_0"]);
        assert_eq!(parsed.ranges.len(), 1);
        assert_eq!(parsed.ranges[0].weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_unrecognized_line_breaks_pairing() {
        let parsed = parse_ranges(&["number::1_2_0", "# note", "weight::0.4"]);
        assert_eq!(parsed.ranges[0].weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_malformed_weight_drops_its_range() {
        let parsed = parse_ranges(&["number::1_2_0", "weight::x", "number::3_4_0"]);
        assert_eq!(parsed.ranges.len(), 1);
        assert_eq!(parsed.ranges[0].min, 3.0);
        assert_eq!(
            parsed.errors,
            vec![LineError::InvalidWeight {
                line: "weight::x".to_string()
            }]
        );
    }

    #[test]
    fn test_malformed_number_does_not_consume_weight() {
        let parsed = parse_ranges(&["number::1_2", "weight::0.5", "number::3_4_0"]);
        assert_eq!(parsed.ranges.len(), 1);
        assert_eq!(parsed.ranges[0].weight, DEFAULT_WEIGHT);
        assert_eq!(parsed.errors.len(), 1);
    }

    #[test]
    fn test_all_malformed_yields_nothing() {
        let parsed = parse_ranges(&["number::10_20", "number::x_y_z"]);
        assert!(parsed.ranges.is_empty());
        assert_eq!(parsed.errors.len(), 2);
    }

    #[test]
    fn test_owned_strings() {
        let lines = vec!["number::0_1_2".to_string()];
        assert_eq!(parse_ranges(&lines).ranges.len(), 1);
    }
}
