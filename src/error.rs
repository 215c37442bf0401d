//! Error types for variable validation and resolution.
//!
//! Nothing here is fatal. Every error is caught where it originates and
//! turned into a [`Diagnostic`](crate::Diagnostic); callers of
//! [`VariableEngine::resolve`](crate::VariableEngine::resolve) only ever
//! see the `"0"` sentinel.

use crate::diagnostic::Severity;
use crate::var_name::VarName;
use thiserror::Error;

/// A malformed `number::` or `weight::` line.
///
/// The offending line is dropped; the rest of the variable still parses.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LineError {
    /// A `number::` line did not split into exactly three `_` fields.
    #[error("number line must have 3 fields (min_max_decimals), found {found}: {line}")]
    WrongFieldCount { line: String, found: usize },

    /// `min` or `max` is not a decimal number.
    #[error("invalid number bound `{field}` in line: {line}")]
    InvalidBound { line: String, field: String },

    /// `decimals` is not a non-negative integer up to `MAX_DECIMALS`.
    #[error("invalid decimal count `{field}` in line: {line}")]
    InvalidDecimals { line: String, field: String },

    /// A `weight::` value is not a decimal number.
    #[error("invalid weight in line: {line}")]
    InvalidWeight { line: String },
}

/// A configuration entry that cannot become a usable variable, or one
/// that is usable but suspicious.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("variable name must not be blank: {0:?}")]
    BlankName(String),

    #[error("variable name may only contain letters, digits and underscores: {0}")]
    IllegalCharacters(String),

    #[error("variable name must not be purely numeric: {0}")]
    NumericName(String),

    #[error("duplicate variable name: {0}")]
    DuplicateName(String),

    #[error("variable {name} has an invalid mode (only normal/elite are allowed): {mode}")]
    InvalidMode { name: VarName, mode: String },

    /// Weights do not add up to 1.0. Resolution still works; the
    /// actual sum is used as the normalization denominator.
    #[error("variable {name} weights do not sum to 1.0, current total: {total}")]
    WeightSumDrift { name: VarName, total: f64 },

    /// `min` is greater than `max`. The range is still sampled.
    #[error("variable {name} has a range with min greater than max: {line}")]
    InvertedRange { name: VarName, line: String },
}

impl DefinitionError {
    /// Whether the entry is excluded from the resolvable set.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            DefinitionError::WeightSumDrift { .. } | DefinitionError::InvertedRange { .. }
        )
    }

    /// Severity the error is reported with.
    pub fn severity(&self) -> Severity {
        if self.is_rejection() {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

/// Why a single `resolve` call fell back to the sentinel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolutionMiss {
    #[error(
        "no player was passed by the caller; the calling plugin may not forward the player object"
    )]
    NoPlayer,

    #[error("the variable system is disabled")]
    Disabled,

    #[error("variable is not configured")]
    UnknownVariable,

    #[error("variable has no mode field")]
    MissingMode,

    #[error("normal variable has no values")]
    EmptyValues,

    #[error("normal variable has no valid number line")]
    NoValidRanges,

    #[error("elite variable has no usable prefix")]
    MissingPrefix,

    #[error("player is not holding an item")]
    NoHeldItem,

    #[error("held item has no lore")]
    NoLore,

    #[error("held item lore is empty")]
    EmptyLore,

    #[error("no lore line starts with prefix {prefix:?}")]
    PrefixNotFound { prefix: String },

    #[error("lore line {line} has no number after the prefix: {text}")]
    NoNumberAfterPrefix { line: usize, text: String },
}

/// Failure to load a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("configuration root must be a mapping")]
    RootNotMapping,
}

/// Failure of the operator-facing inspect operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InspectError {
    #[error("variable not found: {0}")]
    NotFound(VarName),

    #[error("variable {0} is not a normal variable")]
    NotNormal(VarName),

    #[error("variable {0} has no values configured")]
    EmptyValues(VarName),
}
