//! Line-by-line report of a normal variable, for operators.
//!
//! Unlike resolution, inspection looks at the raw variable tree (so it
//! also works on entries validation rejected) and reports every tagged
//! line on its own without pairing weights to numbers.

use crate::config::ConfigTree;
use crate::definition::Mode;
use crate::error::{InspectError, LineError};
use crate::line::{parse_line, LineKind, RangeSpec};
use crate::var_name::VarName;

/// Parse outcome of one tagged line.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectedLine {
    Number { line: String, range: RangeSpec },
    Weight { line: String, weight: f64 },
    Malformed(LineError),
}

impl InspectedLine {
    pub fn is_malformed(&self) -> bool {
        matches!(self, InspectedLine::Malformed(_))
    }
}

/// Inspect the normal variable `name` in `tree`.
///
/// Untagged lines are left out of the report.
///
/// # Examples
///
/// ```rust
/// use loreroll::config::{ConfigTree, VariableSection};
/// use loreroll::inspect::inspect;
///
/// let tree = ConfigTree::new().with_variable(
///     "atk",
///     VariableSection::normal(["number::1_2_0", "weight::oops", "note"]),
/// );
/// let report = inspect(&tree, "atk").unwrap();
/// assert_eq!(report.len(), 2);
/// assert!(report[1].is_malformed());
/// ```
pub fn inspect(tree: &ConfigTree, name: &str) -> Result<Vec<InspectedLine>, InspectError> {
    let section = tree
        .get(name)
        .ok_or_else(|| InspectError::NotFound(VarName::from_str(name)))?;

    let mode = section.mode.as_deref().unwrap_or(Mode::Normal.as_str());
    if Mode::parse(mode) != Some(Mode::Normal) {
        return Err(InspectError::NotNormal(VarName::from_str(name)));
    }
    if section.values.is_empty() {
        return Err(InspectError::EmptyValues(VarName::from_str(name)));
    }

    let report = section
        .values
        .iter()
        .filter_map(|line| match parse_line(line) {
            Ok(LineKind::Number(range)) => Some(InspectedLine::Number {
                line: line.clone(),
                range,
            }),
            Ok(LineKind::Weight(weight)) => Some(InspectedLine::Weight {
                line: line.clone(),
                weight,
            }),
            Ok(LineKind::Unrecognized) => None,
            Err(err) => Some(InspectedLine::Malformed(err)),
        })
        .collect();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariableSection;

    #[test]
    fn test_not_found() {
        assert_eq!(
            inspect(&ConfigTree::new(), "atk"),
            Err(InspectError::NotFound(VarName::from_str("atk")))
        );
    }

    #[test]
    fn test_not_normal() {
        let tree = ConfigTree::new()
            .with_variable("crit", VariableSection::elite("Crit: "))
            .with_variable(
                "odd",
                VariableSection::normal(["number::1_2_0"]).with_mode(Some("wild")),
            );
        assert!(matches!(inspect(&tree, "crit"), Err(InspectError::NotNormal(_))));
        assert!(matches!(inspect(&tree, "odd"), Err(InspectError::NotNormal(_))));
    }

    #[test]
    fn test_empty_values() {
        let tree = ConfigTree::new().with_variable("hp", VariableSection::default());
        assert!(matches!(inspect(&tree, "hp"), Err(InspectError::EmptyValues(_))));
    }

    #[test]
    fn test_lines_reported_independently() {
        let tree = ConfigTree::new().with_variable(
            "atk",
            VariableSection::normal(["weight::0.5", "number::1_2_0", "number::10_20"]),
        );
        let report = inspect(&tree, "atk").unwrap();
        assert_eq!(
            report[0],
            InspectedLine::Weight {
                line: "weight::0.5".to_string(),
                weight: 0.5
            }
        );
        assert_eq!(
            report[1],
            InspectedLine::Number {
                line: "number::1_2_0".to_string(),
                range: RangeSpec {
                    min: 1.0,
                    max: 2.0,
                    decimals: 0
                }
            }
        );
        assert!(report[2].is_malformed());
    }

    #[test]
    fn test_works_on_rejected_names() {
        let tree =
            ConfigTree::new().with_variable("12", VariableSection::normal(["number::1_2_0"]));
        assert_eq!(inspect(&tree, "12").unwrap().len(), 1);
    }
}
