//! Variable engine module.
//!
//! Provides the `VariableEngine` type, the entry point for validation and
//! resolution. It owns the current variable snapshot and the injected
//! collaborators (random source, text stripper, diagnostic sink).
//!
//! Reloads build a new immutable [`Snapshot`] and swap it in under a
//! write lock. A resolution clones the current `Arc<Snapshot>` and works
//! on it without holding any lock, so it never sees a half-applied
//! reload.

use crate::config::{ConfigTree, EngineSettings};
use crate::context::ResolutionContext;
use crate::definition::{validate_tree, Mode, VariableDefinition};
use crate::diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
use crate::elite;
use crate::error::{InspectError, ResolutionMiss};
use crate::inspect::{self, InspectedLine};
use crate::line::parse_ranges;
use crate::normal;
use crate::random::{RandomSource, ThreadRandom};
use crate::text::{LegacyCodes, TextStripper};
use crate::var_name::VarName;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Result returned for every failed resolution.
pub const SENTINEL: &str = "0";

/// A successful resolution with the details of how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub variable: VarName,
    pub mode: Mode,
    /// The resolved number as text.
    pub value: String,
    /// Normal mode: index of the selected range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_index: Option<usize>,
    /// Elite mode: 1-based lore line the number came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore_line: Option<usize>,
    /// Normal mode: the first-range fallback was taken.
    #[serde(default)]
    pub fallback: bool,
}

/// Immutable view of one loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    tree: ConfigTree,
    definitions: Vec<VariableDefinition>,
    index: HashMap<VarName, usize>,
}

impl Snapshot {
    fn new(tree: ConfigTree, definitions: Vec<VariableDefinition>) -> Self {
        let index = definitions
            .iter()
            .enumerate()
            .map(|(idx, definition)| (definition.name.clone(), idx))
            .collect();
        Self {
            tree,
            definitions,
            index,
        }
    }

    pub fn enabled(&self) -> bool {
        self.tree.enabled()
    }

    /// The tree this snapshot was built from, including rejected entries.
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Accepted variables in document order.
    pub fn definitions(&self) -> &[VariableDefinition] {
        &self.definitions
    }

    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.index.get(name).map(|&idx| &self.definitions[idx])
    }
}

/// Validates variable trees and resolves variables against them.
///
/// The engine is `Send + Sync`; share it behind an `Arc` and call
/// [`resolve`](Self::resolve) from any thread while another thread
/// [`reload`](Self::reload)s.
///
/// # Examples
///
/// ```rust
/// use loreroll::config::{ConfigTree, VariableSection};
/// use loreroll::random::SeededRandom;
/// use loreroll::{HeldItem, ResolutionContext, VariableEngine};
/// use std::sync::Arc;
///
/// let engine = VariableEngine::new().with_random(Arc::new(SeededRandom::from_seed(7)));
/// engine.reload(
///     ConfigTree::new()
///         .with_variable("atk", VariableSection::normal(["number::10_20_0", "weight::1.0"]))
///         .with_variable("crit", VariableSection::elite("Crit: ")),
/// );
///
/// let ctx = ResolutionContext::for_player("Steve")
///     .holding(HeldItem::with_lore(["Crit: 12.5%"]));
///
/// let atk: i64 = engine.resolve("atk", &ctx).parse().unwrap();
/// assert!((10..=20).contains(&atk));
/// assert_eq!(engine.resolve("crit", &ctx), "12.5");
/// assert_eq!(engine.resolve("missing", &ctx), "0");
/// ```
pub struct VariableEngine {
    snapshot: RwLock<Arc<Snapshot>>,
    settings: EngineSettings,
    random: Arc<dyn RandomSource>,
    stripper: Arc<dyn TextStripper>,
    sink: Arc<dyn DiagnosticSink>,
}

impl VariableEngine {
    /// Create an engine with no variables loaded.
    ///
    /// Defaults: [`ThreadRandom`], [`LegacyCodes::Section`] stripping,
    /// [`TracingSink`] and default [`EngineSettings`] (debug off).
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            settings: EngineSettings::default(),
            random: Arc::new(ThreadRandom),
            stripper: Arc::new(LegacyCodes::Section),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_stripper(mut self, stripper: Arc<dyn TextStripper>) -> Self {
        self.stripper = stripper;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Validate `tree` and publish it as the new variable set.
    ///
    /// Returns every validation diagnostic. They are also forwarded to
    /// the sink when debug is on.
    pub fn reload(&self, tree: ConfigTree) -> Vec<Diagnostic> {
        let validation = validate_tree(&tree);
        for diagnostic in &validation.diagnostics {
            self.emit(diagnostic);
        }

        let snapshot = Arc::new(Snapshot::new(tree, validation.definitions));
        let count = snapshot.definitions().len();
        *self.snapshot.write() = snapshot;
        self.emit_with(|| Diagnostic::info(format!("loaded {count} variable(s)")));

        validation.diagnostics
    }

    /// Resolve `name` to a number string, or `"0"` on any failure.
    pub fn resolve(&self, name: &str, ctx: &ResolutionContext) -> String {
        match self.resolve_detailed(name, ctx) {
            Ok(resolution) => resolution.value,
            Err(_) => SENTINEL.to_string(),
        }
    }

    /// Resolve `name`, reporting why it failed instead of collapsing to
    /// the sentinel.
    ///
    /// Failures are also emitted as error diagnostics, carrying the
    /// player and, when the variable exists, its current configuration.
    pub fn resolve_detailed(
        &self,
        name: &str,
        ctx: &ResolutionContext,
    ) -> Result<Resolution, ResolutionMiss> {
        let snapshot = self.snapshot();
        let variable = VarName::from_str(name);
        self.emit_with(|| {
            Diagnostic::info("resolving variable")
                .with_variable(variable.clone())
                .with_player(ctx.player())
        });

        match self.dispatch(&snapshot, &variable, ctx) {
            Ok(resolution) => {
                self.emit_with(|| {
                    Diagnostic::info(format!(
                        "resolved in {} mode to {}",
                        resolution.mode, resolution.value
                    ))
                    .with_variable(variable)
                    .with_player(ctx.player())
                });
                Ok(resolution)
            }
            Err(miss) => {
                self.emit_with(|| {
                    let mut diagnostic = Diagnostic::from(miss.clone())
                        .with_variable(variable)
                        .with_player(ctx.player());
                    if let Some(section) = snapshot.tree().get(name) {
                        diagnostic.message = format!(
                            "{}, current config: {}",
                            diagnostic.message,
                            section.to_json()
                        );
                    }
                    diagnostic
                });
                Err(miss)
            }
        }
    }

    fn dispatch(
        &self,
        snapshot: &Snapshot,
        variable: &VarName,
        ctx: &ResolutionContext,
    ) -> Result<Resolution, ResolutionMiss> {
        ctx.player().ok_or(ResolutionMiss::NoPlayer)?;
        if !snapshot.enabled() {
            return Err(ResolutionMiss::Disabled);
        }
        let definition = snapshot
            .get(variable.as_str())
            .ok_or(ResolutionMiss::UnknownVariable)?;
        if !definition.mode_declared {
            return Err(ResolutionMiss::MissingMode);
        }

        match definition.mode {
            Mode::Elite => self.resolve_elite(definition, ctx),
            Mode::Normal => self.resolve_normal(definition),
        }
    }

    fn resolve_normal(
        &self,
        definition: &VariableDefinition,
    ) -> Result<Resolution, ResolutionMiss> {
        if definition.values().is_empty() {
            return Err(ResolutionMiss::EmptyValues);
        }

        // Lines are parsed on every call, so a dropped line is reported
        // every time it is skipped.
        let parsed = parse_ranges(definition.values());
        for err in parsed.errors {
            self.emit_with(|| Diagnostic::from(err).with_variable(definition.name.clone()));
        }

        let picked = normal::sample(&parsed.ranges, self.random.as_ref())
            .ok_or(ResolutionMiss::NoValidRanges)?;
        if picked.fallback {
            self.emit_with(|| {
                Diagnostic::warning("no range matched the draw, using the first range")
                    .with_variable(definition.name.clone())
            });
        }

        Ok(Resolution {
            variable: definition.name.clone(),
            mode: Mode::Normal,
            value: picked.text,
            range_index: Some(picked.index),
            lore_line: None,
            fallback: picked.fallback,
        })
    }

    fn resolve_elite(
        &self,
        definition: &VariableDefinition,
        ctx: &ResolutionContext,
    ) -> Result<Resolution, ResolutionMiss> {
        let found = elite::resolve(definition.prefix(), ctx.held_item(), self.stripper.as_ref())?;
        Ok(Resolution {
            variable: definition.name.clone(),
            mode: Mode::Elite,
            value: found.number,
            range_index: None,
            lore_line: Some(found.line),
            fallback: false,
        })
    }

    /// Names of all resolvable variables, in document order.
    ///
    /// Empty while the system is disabled.
    pub fn variable_names(&self) -> Vec<VarName> {
        self.snapshot()
            .definitions()
            .iter()
            .map(|definition| definition.name.clone())
            .collect()
    }

    /// Variable names starting with `input`, ignoring ASCII case.
    pub fn completions(&self, input: &str) -> Vec<VarName> {
        let input = input.to_ascii_lowercase();
        self.variable_names()
            .into_iter()
            .filter(|name| name.as_str().to_ascii_lowercase().starts_with(&input))
            .collect()
    }

    /// Line-by-line report of a normal variable in the loaded tree.
    pub fn inspect(&self, name: &str) -> Result<Vec<InspectedLine>, InspectError> {
        inspect::inspect(self.snapshot().tree(), name)
    }

    pub(crate) fn emit(&self, diagnostic: &Diagnostic) {
        if self.settings.debug {
            self.sink.emit(diagnostic);
        }
    }

    /// Like [`emit`](Self::emit), but only builds the diagnostic when
    /// debug is on.
    pub(crate) fn emit_with(&self, build: impl FnOnce() -> Diagnostic) {
        if self.settings.debug {
            self.sink.emit(&build());
        }
    }
}

impl Default for VariableEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VariableEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableEngine")
            .field("snapshot", &self.snapshot())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
