//! Placeholder request bridge.
//!
//! Hosts that expand `%identifier_params%` style placeholders hand the
//! `params` part to [`PlaceholderBridge::request`]. Requests that start
//! with the variable prefix (`ph_var_` by default) are resolved; anything
//! else is left for other expansions.

use crate::context::ResolutionContext;
use crate::diagnostic::Diagnostic;
use crate::resolver::{VariableEngine, SENTINEL};
use crate::var_name::VarName;
use std::sync::Arc;

/// Routes placeholder requests to a shared [`VariableEngine`].
///
/// # Examples
///
/// ```rust
/// use loreroll::config::{ConfigTree, VariableSection};
/// use loreroll::placeholder::PlaceholderBridge;
/// use loreroll::{HeldItem, ResolutionContext, VariableEngine};
/// use std::sync::Arc;
///
/// let engine = Arc::new(VariableEngine::new());
/// engine.reload(ConfigTree::new().with_variable("atk", VariableSection::elite("ATK: ")));
/// let bridge = PlaceholderBridge::new(engine);
///
/// let ctx = ResolutionContext::for_player("Alex").holding(HeldItem::with_lore(["ATK: 42"]));
/// assert_eq!(bridge.request("ph_var_atk", &ctx).as_deref(), Some("42"));
/// assert_eq!(bridge.request("health", &ctx), None);
/// assert_eq!(bridge.full_placeholder("atk"), "%ph_ph_var_atk%");
/// ```
#[derive(Debug, Clone)]
pub struct PlaceholderBridge {
    engine: Arc<VariableEngine>,
}

impl PlaceholderBridge {
    pub fn new(engine: Arc<VariableEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<VariableEngine> {
        &self.engine
    }

    /// Identifier the expansion registers under.
    pub fn identifier(&self) -> &str {
        &self.engine.settings().placeholder_identifier
    }

    /// Full placeholder text a consumer writes to reach variable `name`.
    pub fn full_placeholder(&self, name: &str) -> String {
        let settings = self.engine.settings();
        format!(
            "%{}_{}{}%",
            settings.placeholder_identifier, settings.variable_prefix, name
        )
    }

    /// Expand one placeholder request.
    ///
    /// Returns `None` when `params` is not a variable request. A failed
    /// resolution, or a request without a player, yields the configured
    /// misconfiguration marker instead of a bare `"0"`.
    pub fn request(&self, params: &str, ctx: &ResolutionContext) -> Option<String> {
        let settings = self.engine.settings();
        let Some(name) = params.strip_prefix(settings.variable_prefix.as_str()) else {
            self.engine.emit_with(|| {
                Diagnostic::info(format!("placeholder {params} is not a variable request"))
                    .with_player(ctx.player())
            });
            return None;
        };

        let value = self.engine.resolve(name, ctx);
        if ctx.player().is_none() {
            self.engine.emit_with(|| {
                Diagnostic::error(
                    "placeholder requested without a player; \
                     the calling plugin may not forward the player object",
                )
                .with_variable(VarName::from_str(name))
            });
            return Some(settings.misconfigured_marker.clone());
        }
        if value == SENTINEL {
            return Some(settings.misconfigured_marker.clone());
        }
        Some(value)
    }
}
