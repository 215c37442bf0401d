//! # loreroll - Numeric Variables for Game-Server Placeholders
//!
//! A configuration-driven engine that turns a variable name into a
//! number string. Each variable uses one of two modes:
//! - **normal**: weighted random sampling over configured numeric ranges
//! - **elite**: extraction of the number that follows a prefix in the
//!   lore of the item the player is holding
//!
//! Resolution never fails loudly. Every failure path returns the sentinel
//! `"0"` and emits a [`Diagnostic`] describing what went wrong.
//!
//! ## Configuration
//!
//! Variables come from a YAML tree (`variable.yml`):
//!
//! ```yaml
//! enable: true
//! atk_bonus:
//!   mode: normal
//!   values:
//!     - number::10_20_0
//!     - weight::0.8
//!     - number::20_50_1
//!     - weight::0.2
//! crit:
//!   mode: elite
//!   prefix: "§7Crit: "
//! ```
//!
//! A `weight::` line binds to the `number::` line directly before it; a
//! `number::` line without one weighs `1.0`.
//!
//! ## Example
//!
//! ```rust
//! use loreroll::*;
//! use loreroll::random::ScriptedRandom;
//! use std::sync::Arc;
//!
//! let tree = ConfigTree::from_yaml_str(r#"
//! atk_bonus:
//!   mode: normal
//!   values: ["number::10_20_0", "weight::0.8", "number::20_50_1", "weight::0.2"]
//! crit:
//!   mode: elite
//!   prefix: "§7Crit: "
//! "#).unwrap();
//!
//! let engine = VariableEngine::new().with_random(Arc::new(ScriptedRandom::new([0.1, 0.5])));
//! assert!(engine.reload(tree).is_empty());
//!
//! let ctx = ResolutionContext::for_player("Steve")
//!     .holding(HeldItem::with_lore(["§6Blade of Dawn", "§7Crit: §c+15%"]));
//!
//! assert_eq!(engine.resolve("atk_bonus", &ctx), "15");
//! assert_eq!(engine.resolve("crit", &ctx), "15");
//! assert_eq!(engine.resolve("unknown", &ctx), "0");
//! ```
//!
//! ## Modules
//!
//! - [`var_name`] - Variable identifier and naming rules
//! - [`line`] - `number::` / `weight::` line grammar and pairing
//! - [`weight`] - Weight-sum checks
//! - [`config`] - Variable tree and engine settings
//! - [`definition`] - Variable validation
//! - [`normal`] - Weighted random sampling
//! - [`elite`] - Lore number extraction
//! - [`resolver`] - The `VariableEngine` facade
//! - [`inspect`] - Per-line reports for operators
//! - [`placeholder`] - Placeholder request routing
//! - [`context`] - Per-call player and held item
//! - [`random`] - Random sources
//! - [`text`] - Decoration stripping
//! - [`diagnostic`] - Diagnostics and sinks
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod definition;
pub mod diagnostic;
pub mod elite;
pub mod error;
pub mod inspect;
pub mod line;
pub mod normal;
pub mod placeholder;
pub mod random;
pub mod resolver;
pub mod text;
pub mod var_name;
pub mod weight;

// Re-export main types for convenience
pub use config::{ConfigTree, EngineSettings, VariableSection};
pub use context::{HeldItem, ResolutionContext};
pub use definition::{validate, Mode, VariableDefinition};
pub use diagnostic::{Diagnostic, DiagnosticSink, Severity};
pub use error::{ConfigError, DefinitionError, InspectError, LineError, ResolutionMiss};
pub use placeholder::PlaceholderBridge;
pub use resolver::{Resolution, VariableEngine, SENTINEL};
pub use var_name::VarName;
