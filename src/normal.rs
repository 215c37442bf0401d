//! Normal-mode resolution: weighted random sampling over numeric ranges.
//!
//! Selection walks the ranges in configured order with a running weight
//! total and picks the first range whose cumulative weight reaches the
//! scaled draw. Boundaries belong to the lower range: with weights
//! `[0.25, 0.75]` a scaled draw of exactly `0.25` picks range 0.
//!
//! If no range qualifies, the first range is used. Correct arithmetic
//! over positive weights never gets there; negative or NaN weights do.

use crate::line::NumberRange;
use crate::random::RandomSource;
use crate::weight::range_weight_total;

/// Outcome of sampling one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Index of the selected range in configured order.
    pub index: usize,
    /// Raw sampled value.
    pub value: f64,
    /// `value` formatted with the range's decimal count.
    pub text: String,
    /// The first-range fallback was taken.
    pub fallback: bool,
}

/// Pick a range for a uniform `draw` in `[0, 1)`.
///
/// Returns the index and whether the fallback fired, or `None` for an
/// empty slice.
///
/// # Examples
///
/// ```rust
/// use loreroll::line::parse_ranges;
/// use loreroll::normal::select_range;
///
/// let ranges = parse_ranges(&[
///     "number::0_1_0", "weight::0.25",
///     "number::1_2_0", "weight::0.75",
/// ]).ranges;
///
/// assert_eq!(select_range(&ranges, 0.0), Some((0, false)));
/// assert_eq!(select_range(&ranges, 0.25), Some((0, false)));
/// assert_eq!(select_range(&ranges, 0.26), Some((1, false)));
/// ```
pub fn select_range(ranges: &[NumberRange], draw: f64) -> Option<(usize, bool)> {
    if ranges.is_empty() {
        return None;
    }
    let target = draw * range_weight_total(ranges);
    let mut cumulative = 0.0;
    for (idx, range) in ranges.iter().enumerate() {
        cumulative += range.weight;
        if target <= cumulative {
            return Some((idx, false));
        }
    }
    Some((0, true))
}

/// Sample a value from `ranges`, drawing twice from `random`: once to
/// pick the range, once for the value inside it.
///
/// # Examples
///
/// ```rust
/// use loreroll::line::parse_ranges;
/// use loreroll::normal::sample;
/// use loreroll::random::ScriptedRandom;
///
/// let ranges = parse_ranges(&["number::10_20_1"]).ranges;
/// let picked = sample(&ranges, &ScriptedRandom::new([0.0, 0.5])).unwrap();
/// assert_eq!(picked.text, "15.0");
/// ```
pub fn sample(ranges: &[NumberRange], random: &dyn RandomSource) -> Option<Sample> {
    let (index, fallback) = select_range(ranges, random.next_unit())?;
    let range = &ranges[index];
    let value = range.min + random.next_unit() * (range.max - range.min);
    Some(Sample {
        index,
        value,
        text: format_fixed(value, range.decimals),
        fallback,
    })
}

/// Format with exactly `decimals` fractional digits, rounding half up.
///
/// Rounding works on the shortest decimal form of `value`, so a tie as
/// written (`2.5`, `0.125`) always rounds away from zero.
///
/// # Examples
///
/// ```rust
/// use loreroll::normal::format_fixed;
///
/// assert_eq!(format_fixed(12.345, 0), "12");
/// assert_eq!(format_fixed(12.0, 2), "12.00");
/// assert_eq!(format_fixed(-0.26, 1), "-0.3");
/// assert_eq!(format_fixed(2.5, 0), "3");
/// ```
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let shortest = value.abs().to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));
    let frac_digits = frac_part.bytes().chain(std::iter::repeat(b'0')).take(decimals);
    let mut digits: Vec<u8> = int_part.bytes().chain(frac_digits).collect();
    if frac_part.as_bytes().get(decimals).is_some_and(|&next| next >= b'5') {
        round_up(&mut digits);
    }

    let int_len = digits.len() - decimals;
    let mut text = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        text.push('-');
    }
    text.extend(digits[..int_len].iter().map(|&d| d as char));
    if decimals > 0 {
        text.push('.');
        text.extend(digits[int_len..].iter().map(|&d| d as char));
    }
    text
}

/// Add one unit in the last place of an ASCII digit string.
fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
