//! Elite-mode resolution: read a number out of the held item's lore.
//!
//! The configured prefix and every lore line are stripped of decoration,
//! then the first lore line that starts with the prefix is chosen. The
//! first signed decimal token after the prefix is returned verbatim.
//! Later lines are never considered, even if the chosen line holds no
//! number.

use crate::context::HeldItem;
use crate::error::ResolutionMiss;
use crate::text::TextStripper;
use once_cell::sync::Lazy;
use regex::Regex;

// ASCII digits only; `\d` would also accept other Unicode digits.
static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("number token pattern is valid"));

/// A successful lore lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoreMatch {
    /// 1-based index of the matching lore line.
    pub line: usize,
    /// The numeric token, exactly as written.
    pub number: String,
}

/// First signed decimal token in `text`, if any.
///
/// # Examples
///
/// ```rust
/// use loreroll::elite::find_number;
///
/// assert_eq!(find_number(" +12.5%"), Some("12.5"));
/// assert_eq!(find_number("-3 to 7"), Some("-3"));
/// assert_eq!(find_number("1."), Some("1"));
/// assert_eq!(find_number("none"), None);
/// ```
pub fn find_number(text: &str) -> Option<&str> {
    NUMBER_TOKEN.find(text).map(|m| m.as_str())
}

/// Scan `lore` for the first line starting with `prefix` and pull the
/// number that follows it.
///
/// # Examples
///
/// ```rust
/// use loreroll::elite::extract;
/// use loreroll::text::LegacyCodes;
///
/// let lore = vec!["§7ATK: §c50".to_string(), "Rarity: Legendary".to_string()];
/// let hit = extract("§7ATK: ", &lore, &LegacyCodes::Section).unwrap();
/// assert_eq!(hit.number, "50");
/// assert_eq!(hit.line, 1);
///
/// assert!(extract("DEF: ", &lore, &LegacyCodes::Section).is_err());
/// ```
pub fn extract(
    prefix: &str,
    lore: &[String],
    stripper: &dyn TextStripper,
) -> Result<LoreMatch, ResolutionMiss> {
    let plain_prefix = stripper.strip(prefix);

    for (idx, line) in lore.iter().enumerate() {
        let plain_line = stripper.strip(line);
        let Some(rest) = plain_line.strip_prefix(&*plain_prefix) else {
            continue;
        };
        return match find_number(rest) {
            Some(number) => Ok(LoreMatch {
                line: idx + 1,
                number: number.to_string(),
            }),
            None => Err(ResolutionMiss::NoNumberAfterPrefix {
                line: idx + 1,
                text: line.clone(),
            }),
        };
    }

    Err(ResolutionMiss::PrefixNotFound {
        prefix: plain_prefix.into_owned(),
    })
}

/// Resolve an elite variable against the held item.
///
/// Checks, in order: a non-empty prefix, a held item, lore present,
/// lore non-empty. Then defers to [`extract`].
pub fn resolve(
    prefix: Option<&str>,
    item: Option<&HeldItem>,
    stripper: &dyn TextStripper,
) -> Result<LoreMatch, ResolutionMiss> {
    let prefix = prefix
        .filter(|prefix| !prefix.is_empty())
        .ok_or(ResolutionMiss::MissingPrefix)?;
    let item = item.ok_or(ResolutionMiss::NoHeldItem)?;
    let lore = item.lore().ok_or(ResolutionMiss::NoLore)?;
    if lore.is_empty() {
        return Err(ResolutionMiss::EmptyLore);
    }
    extract(prefix, lore, stripper)
}
