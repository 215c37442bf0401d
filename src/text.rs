//! Decoration stripping for display text.
//!
//! Item lore and configured prefixes may carry legacy formatting codes
//! (`§c`, `§l`, `§x§f§f§0§0§0§0`...). Elite matching compares plain text,
//! so both sides go through a [`TextStripper`] first. The engine does not
//! know any markup grammar itself; hosts with richer markup plug in
//! their own stripper.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static SECTION_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)§[0-9a-fk-orx]").expect("section code pattern is valid"));

static AMPERSAND_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&[0-9a-fk-orx]").expect("ampersand code pattern is valid"));

/// Turns decorated text into comparable plain text.
///
/// Must be a pure function of its input. Any
/// `Fn(&str) -> String + Send + Sync` closure is a stripper.
pub trait TextStripper: Send + Sync {
    fn strip<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

impl<F> TextStripper for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(text))
    }
}

/// Strips legacy two-character formatting codes.
///
/// # Examples
///
/// ```rust
/// use loreroll::text::{LegacyCodes, TextStripper};
///
/// assert_eq!(LegacyCodes::Section.strip("§c§lATK: §f50"), "ATK: 50");
/// assert_eq!(LegacyCodes::Ampersand.strip("&aDEF: 3"), "DEF: 3");
/// assert_eq!(LegacyCodes::Section.strip("&aDEF: 3"), "&aDEF: 3");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegacyCodes {
    /// `§` codes, as stored in item lore.
    #[default]
    Section,
    /// `&` codes, as commonly typed in configuration files.
    Ampersand,
}

impl TextStripper for LegacyCodes {
    fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let pattern = match self {
            LegacyCodes::Section => &*SECTION_CODE,
            LegacyCodes::Ampersand => &*AMPERSAND_CODE,
        };
        pattern.replace_all(text, "")
    }
}

/// Leaves text untouched, for hosts that hand over plain lore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDecoration;

impl TextStripper for NoDecoration {
    fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}
