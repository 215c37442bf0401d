//! Variable definitions and their validation.
//!
//! Validation walks the variable tree in document order and decides,
//! entry by entry, whether it becomes a [`VariableDefinition`]. Rejected
//! entries are skipped with a diagnostic; nothing stops other entries
//! from registering.

use crate::config::{ConfigTree, VariableSection};
use crate::diagnostic::Diagnostic;
use crate::error::{DefinitionError, LineError};
use crate::line::{parse_line, LineKind};
use crate::var_name::VarName;
use crate::weight::{check_weight_sum, declared_weight_total};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How a variable produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Weighted random sampling over `values`.
    Normal,
    /// Number extraction from the held item's lore, after `prefix`.
    Elite,
}

impl Mode {
    /// Parse a mode string, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use loreroll::Mode;
    ///
    /// assert_eq!(Mode::parse("ELITE"), Some(Mode::Elite));
    /// assert_eq!(Mode::parse("Normal"), Some(Mode::Normal));
    /// assert_eq!(Mode::parse("random"), None);
    /// ```
    pub fn parse(mode: &str) -> Option<Self> {
        if mode.eq_ignore_ascii_case("normal") {
            Some(Mode::Normal)
        } else if mode.eq_ignore_ascii_case("elite") {
            Some(Mode::Elite)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Elite => "elite",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable that passed validation.
///
/// The raw section is kept as-is: normal-mode `values` are parsed again
/// on every resolution, and the section is shown to operators when a
/// resolution misses.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: VarName,
    pub mode: Mode,
    /// `mode` was written out rather than defaulted to normal.
    pub mode_declared: bool,
    pub section: VariableSection,
}

impl VariableDefinition {
    /// Raw `values` lines.
    pub fn values(&self) -> &[String] {
        &self.section.values
    }

    /// Raw, still decorated prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.section.prefix.as_deref()
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    /// Accepted variables in document order.
    pub definitions: Vec<VariableDefinition>,
    /// Every diagnostic raised, in the order raised.
    pub diagnostics: Vec<Diagnostic>,
}

/// Validate a variable tree, returning only the diagnostics.
///
/// Running it twice on the same tree yields the same list.
///
/// # Examples
///
/// ```rust
/// use loreroll::config::{ConfigTree, VariableSection};
/// use loreroll::validate;
///
/// let tree = ConfigTree::new()
///     .with_variable("atk", VariableSection::normal(["number::1_5_0", "weight::1.0"]))
///     .with_variable("bad-name", VariableSection::elite("X"));
///
/// let diagnostics = validate(&tree);
/// assert_eq!(diagnostics.len(), 1);
/// assert!(diagnostics[0].message.contains("bad-name"));
/// ```
pub fn validate(tree: &ConfigTree) -> Vec<Diagnostic> {
    validate_tree(tree).diagnostics
}

/// Validate a variable tree and collect the accepted definitions.
pub fn validate_tree(tree: &ConfigTree) -> Validation {
    let mut validation = Validation::default();

    if !tree.enabled() {
        validation
            .diagnostics
            .push(Diagnostic::info("variable system is disabled, skipping validation"));
        return validation;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (key, section) in tree.entries() {
        let name = match VarName::parse(key) {
            Ok(name) => name,
            Err(err) => {
                validation.diagnostics.push(err.into());
                continue;
            }
        };
        if !seen.insert(key) {
            let err = DefinitionError::DuplicateName(key.to_string());
            validation
                .diagnostics
                .push(Diagnostic::from(err).with_variable(name));
            continue;
        }

        let mode_declared = section.mode.is_some();
        let raw_mode = section.mode.as_deref().unwrap_or(Mode::Normal.as_str());
        let Some(mode) = Mode::parse(raw_mode) else {
            let err = DefinitionError::InvalidMode {
                name: name.clone(),
                mode: raw_mode.to_string(),
            };
            let mut diagnostic = Diagnostic::from(err).with_variable(name);
            diagnostic.message = format!(
                "{}, current config: {}",
                diagnostic.message,
                section.to_json()
            );
            validation.diagnostics.push(diagnostic);
            continue;
        };

        if mode == Mode::Normal {
            validation
                .diagnostics
                .extend(validate_values(&name, &section.values));
        }

        validation.definitions.push(VariableDefinition {
            name,
            mode,
            mode_declared,
            section: section.clone(),
        });
    }

    validation
}

/// Line format and weight-sum checks for one normal variable.
fn validate_values(name: &VarName, values: &[String]) -> Vec<Diagnostic> {
    let tag = |diagnostic: Diagnostic| diagnostic.with_variable(name.clone());
    let mut diagnostics = Vec::new();

    for line in values {
        match parse_line(line) {
            Ok(LineKind::Number(spec)) if spec.is_inverted() => {
                let err = DefinitionError::InvertedRange {
                    name: name.clone(),
                    line: line.clone(),
                };
                diagnostics.push(tag(err.into()));
            }
            // Reported together with the weight total below.
            Err(LineError::InvalidWeight { .. }) => {}
            Err(err) => diagnostics.push(tag(err.into())),
            Ok(_) => {}
        }
    }

    let (total, weight_errors) = declared_weight_total(values);
    diagnostics.extend(weight_errors.into_iter().map(|err| tag(err.into())));
    if let Err(err) = check_weight_sum(name, total) {
        diagnostics.push(tag(err.into()));
    }
    diagnostics
}
