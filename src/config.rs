//! Configuration consumed by the engine.
//!
//! Two documents feed the engine:
//! - the variable tree (`variable.yml`): top-level keys are variable
//!   names, plus a reserved boolean `enable` switch;
//! - the engine settings (`config.yml`): debug switch and placeholder
//!   naming.
//!
//! The variable tree keeps its entries in document order and can hold
//! the same key twice when built in code, so that duplicate detection
//! during validation has something to detect.

use crate::error::ConfigError;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Reserved top-level key that switches the whole variable system.
pub const ENABLE_KEY: &str = "enable";

/// One variable's raw configuration, exactly as written.
///
/// Nothing here is validated; see [`crate::definition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl VariableSection {
    /// A normal-mode section with the given `values` lines.
    pub fn normal<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: Some("normal".to_string()),
            values: values.into_iter().map(Into::into).collect(),
            prefix: None,
        }
    }

    /// An elite-mode section matching lore lines starting with `prefix`.
    pub fn elite(prefix: impl Into<String>) -> Self {
        Self {
            mode: Some("elite".to_string()),
            values: Vec::new(),
            prefix: Some(prefix.into()),
        }
    }

    /// Replace the mode string.
    pub fn with_mode(mut self, mode: Option<&str>) -> Self {
        self.mode = mode.map(str::to_string);
        self
    }

    /// Compact JSON rendering, used to show operators the offending entry.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// The parsed variable tree.
///
/// # Examples
///
/// ```rust
/// use loreroll::config::{ConfigTree, VariableSection};
///
/// let tree = ConfigTree::new()
///     .with_variable("atk", VariableSection::normal(["number::10_20_0"]))
///     .with_variable("crit", VariableSection::elite("Crit: "));
///
/// assert!(tree.enabled());
/// assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["atk", "crit"]);
/// assert!(tree.get("crit").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    enable: Option<bool>,
    entries: Vec<(String, VariableSection)>,
}

impl ConfigTree {
    /// Create an empty tree with the system enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `enable` switch.
    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = Some(enable);
        self
    }

    /// Append a variable entry. The same key may be appended twice.
    pub fn with_variable(mut self, key: impl Into<String>, section: VariableSection) -> Self {
        self.push(key, section);
        self
    }

    /// Append a variable entry in place.
    pub fn push(&mut self, key: impl Into<String>, section: VariableSection) {
        self.entries.push((key.into(), section));
    }

    /// Whether the variable system is switched on. Absent means on.
    pub fn enabled(&self) -> bool {
        self.enable.unwrap_or(true)
    }

    /// All entries in document order, excluding the `enable` switch.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &VariableSection)> {
        self.entries
            .iter()
            .filter(|(key, _)| key != ENABLE_KEY)
            .map(|(key, section)| (key.as_str(), section))
    }

    /// Variable keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|(key, _)| key)
    }

    /// First entry with exactly this key.
    pub fn get(&self, key: &str) -> Option<&VariableSection> {
        self.entries()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, section)| section)
    }

    /// Number of entries, excluding the `enable` switch.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a `variable.yml` document.
    ///
    /// Loading is lenient in the same ways the plugin's YAML layer was:
    /// - numeric or boolean keys are stringified, so `123:` reaches the
    ///   name checks instead of vanishing;
    /// - a key whose value is not a mapping becomes an empty section;
    /// - scalar items in `values` are stringified, other items skipped;
    /// - a non-boolean `enable` is treated as absent.
    ///
    /// An empty document is an empty, enabled tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use loreroll::config::ConfigTree;
    ///
    /// let tree = ConfigTree::from_yaml_str(
    ///     r#"
    /// enable: true
    /// atk:
    ///   mode: normal
    ///   values:
    ///     - "number::10_20_0"
    ///     - "weight::1.0"
    /// crit:
    ///   mode: elite
    ///   prefix: "§cCrit: "
    /// "#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.get("atk").unwrap().values.len(), 2);
    /// assert_eq!(tree.get("crit").unwrap().prefix.as_deref(), Some("§cCrit: "));
    /// ```
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let entries = match serde_yaml::from_str::<TopLevel>(source)? {
            TopLevel::Empty => return Ok(Self::new()),
            TopLevel::Entries(entries) => entries,
            TopLevel::Other => return Err(ConfigError::RootNotMapping),
        };

        let mut tree = Self::new();
        for (key, value) in &entries {
            let Some(key) = scalar_to_string(key) else {
                tracing::debug!(?key, "skipping non-scalar variable key");
                continue;
            };
            if key == ENABLE_KEY {
                tree.enable = value.as_bool();
                continue;
            }
            let section = match value {
                Value::Mapping(fields) => section_from_mapping(fields),
                _ => VariableSection::default(),
            };
            tree.push(key, section);
        }
        Ok(tree)
    }
}

/// Document root, read entry by entry.
///
/// A `Mapping` would reject a repeated key and lose the whole document;
/// here repeated keys stay as separate entries for validation to reject.
enum TopLevel {
    Empty,
    Entries(Vec<(Value, Value)>),
    Other,
}

impl<'de> Deserialize<'de> for TopLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TopLevelVisitor)
    }
}

struct TopLevelVisitor;

impl<'de> Visitor<'de> for TopLevelVisitor {
    type Value = TopLevel;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of variable names to sections")
    }

    fn visit_map<A>(self, mut map: A) -> Result<TopLevel, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some(entry) = map.next_entry::<Value, Value>()? {
            entries.push(entry);
        }
        Ok(TopLevel::Entries(entries))
    }

    fn visit_unit<E: de::Error>(self) -> Result<TopLevel, E> {
        Ok(TopLevel::Empty)
    }

    fn visit_none<E: de::Error>(self) -> Result<TopLevel, E> {
        Ok(TopLevel::Empty)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<TopLevel, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(TopLevel::Other)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<TopLevel, E> {
        Ok(TopLevel::Other)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<TopLevel, E> {
        Ok(TopLevel::Other)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<TopLevel, E> {
        Ok(TopLevel::Other)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<TopLevel, E> {
        Ok(TopLevel::Other)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<TopLevel, E> {
        Ok(TopLevel::Other)
    }
}

fn section_from_mapping(fields: &Mapping) -> VariableSection {
    let values = match fields.get("values") {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    };
    VariableSection {
        mode: fields.get("mode").and_then(scalar_to_string),
        values,
        prefix: fields.get("prefix").and_then(scalar_to_string),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Engine-wide settings.
///
/// Every field has a default, so a partial (or empty) document is fine.
///
/// # Examples
///
/// ```rust
/// use loreroll::config::EngineSettings;
///
/// let settings = EngineSettings::from_yaml_str("debug: true").unwrap();
/// assert!(settings.debug);
/// assert_eq!(settings.variable_prefix, "ph_var_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Forward diagnostics to the sink. Validation results are returned
    /// regardless.
    pub debug: bool,
    /// Identifier the placeholder expansion registers under.
    pub placeholder_identifier: String,
    /// Prefix that marks a placeholder request as a variable lookup.
    pub variable_prefix: String,
    /// Text shown instead of a bare sentinel to placeholder consumers.
    pub misconfigured_marker: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debug: false,
            placeholder_identifier: "ph".to_string(),
            variable_prefix: "ph_var_".to_string(),
            misconfigured_marker: "0(variable misconfigured, check variable.yml)".to_string(),
        }
    }
}

impl EngineSettings {
    /// Load settings from YAML. Missing fields take their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    /// Turn the debug switch on or off.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
