//! Per-call context for variable resolution.
//!
//! The host fills a `ResolutionContext` with whatever it knows about the
//! acting player. The engine never reaches back into the host: the held
//! item's lore is materialized here before `resolve` is called.

use serde::{Deserialize, Serialize};

/// The item in the acting player's main hand.
///
/// `lore` is `None` when the item carries no lore at all and
/// `Some(vec![])` when it carries an empty lore list; both are misses in
/// elite mode but are reported differently.
///
/// # Examples
///
/// ```rust
/// use loreroll::context::HeldItem;
///
/// let sword = HeldItem::with_lore(["§7ATK: §c50", "§6Rarity: Legendary"]);
/// assert_eq!(sword.lore().map(|l| l.len()), Some(2));
///
/// let stick = HeldItem::plain();
/// assert!(stick.lore().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldItem {
    lore: Option<Vec<String>>,
}

impl HeldItem {
    /// An item with no lore.
    pub fn plain() -> Self {
        Self { lore: None }
    }

    /// An item with the given lore lines, decorated or not.
    pub fn with_lore<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lore: Some(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Lore lines in display order.
    pub fn lore(&self) -> Option<&[String]> {
        self.lore.as_deref()
    }
}

/// Context information for one `resolve` call.
///
/// # Examples
///
/// ```rust
/// use loreroll::{HeldItem, ResolutionContext};
///
/// let ctx = ResolutionContext::for_player("Steve")
///     .holding(HeldItem::with_lore(["ATK: 50"]));
///
/// assert_eq!(ctx.player(), Some("Steve"));
/// assert!(ctx.held_item().is_some());
///
/// let anonymous = ResolutionContext::new();
/// assert!(anonymous.player().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionContext {
    player: Option<String>,
    held_item: Option<HeldItem>,
}

impl ResolutionContext {
    /// A context with no player. Resolving with it always yields the sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context for the named player holding nothing.
    pub fn for_player(name: impl Into<String>) -> Self {
        Self {
            player: Some(name.into()),
            held_item: None,
        }
    }

    /// Set the item in the player's main hand.
    pub fn holding(mut self, item: HeldItem) -> Self {
        self.held_item = Some(item);
        self
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn held_item(&self) -> Option<&HeldItem> {
        self.held_item.as_ref()
    }
}
