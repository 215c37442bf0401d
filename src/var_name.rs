//! Variable name module.
//!
//! Provides the `VarName` type, an interned string identifier for
//! configured variables, and the naming rules a configuration key must
//! satisfy before it can become a variable.

use crate::error::DefinitionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::sync::Arc;

/// Interned string identifier for variables.
///
/// Uses `Arc<str>` so that definitions, diagnostics and resolutions can
/// share one allocation per name. Comparison is case-sensitive.
///
/// # Examples
///
/// ```rust
/// use loreroll::VarName;
///
/// let atk = VarName::from_str("atk_bonus");
/// let atk2: VarName = "atk_bonus".into();
///
/// assert_eq!(atk, atk2);
/// assert_ne!(atk, VarName::from_str("ATK_BONUS"));
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarName(Arc<str>);

impl Serialize for VarName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VarName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(VarName::from(s))
    }
}

impl VarName {
    /// Create a new `VarName` from a string slice.
    ///
    /// No validation happens here; see [`VarName::parse`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Validate a configuration key and turn it into a `VarName`.
    ///
    /// A name must be non-blank, consist only of `[A-Za-z0-9_]`, and must
    /// not be purely numeric. Duplicate detection is the caller's job since
    /// it depends on the surrounding validation pass.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use loreroll::VarName;
    ///
    /// assert!(VarName::parse("crit_rate").is_ok());
    /// assert!(VarName::parse("  ").is_err());
    /// assert!(VarName::parse("crit-rate").is_err());
    /// assert!(VarName::parse("1234").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self, DefinitionError> {
        if key.trim().is_empty() {
            return Err(DefinitionError::BlankName(key.to_string()));
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(DefinitionError::IllegalCharacters(key.to_string()));
        }
        if key.chars().all(|c| c.is_ascii_digit()) {
            return Err(DefinitionError::NumericName(key.to_string()));
        }
        Ok(Self::from_str(key))
    }

    /// Get the string representation of this `VarName`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VarName {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for VarName {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl AsRef<str> for VarName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Hashes like the underlying `str`, so maps keyed by `VarName` accept `&str` lookups.
impl Borrow<str> for VarName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VarName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
