//! Canonical emoji keys.
//!
//! Buttons are keyed by emoji, but the same custom emoji can be written in
//! several ways: as its mention form (`<:name:id>`, `<a:name:id>` for animated
//! ones) or as its bare numeric id. [`EmojiKey`] normalises all of these to one
//! canonical value so that trigger lookups are independent of how a button
//! was declared. Unicode emoji are kept as-is.
//!
//! ```rust,ignore
//! use chime_core::EmojiKey;
//!
//! assert_eq!(EmojiKey::parse("<:blob:12345>"), EmojiKey::from(12345u64));
//! assert_eq!(EmojiKey::parse("\u{25B6}"), EmojiKey::Unicode("\u{25B6}".into()));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::EmojiId;

/// The normalised identity of an emoji, used as a button key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmojiKey {
    /// A custom emoji, identified by id only (name and animation are ignored).
    Custom(EmojiId),
    /// A unicode emoji, kept verbatim.
    Unicode(String),
}

impl EmojiKey {
    /// Parses a textual emoji into its canonical key.
    ///
    /// - `<:name:id>`, `<a:name:id>` and `<name:id>`-style mentions resolve to
    ///   [`EmojiKey::Custom`].
    /// - A string made only of ASCII digits is treated as a custom emoji id.
    /// - Anything else is a unicode emoji and passes through unchanged.
    pub fn parse(text: &str) -> Self {
        match parse_mention(text).or_else(|| parse_id(text)) {
            Some(id) => Self::Custom(EmojiId(id)),
            None => Self::Unicode(text.to_string()),
        }
    }

    /// Returns the custom emoji id, if this is a custom emoji.
    pub fn custom_id(&self) -> Option<EmojiId> {
        match self {
            Self::Custom(id) => Some(*id),
            Self::Unicode(_) => None,
        }
    }

    /// Returns `true` for custom emoji.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl From<EmojiId> for EmojiKey {
    fn from(id: EmojiId) -> Self {
        Self::Custom(id)
    }
}

impl From<u64> for EmojiKey {
    fn from(id: u64) -> Self {
        Self::Custom(EmojiId(id))
    }
}

impl From<&str> for EmojiKey {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for EmojiKey {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<&String> for EmojiKey {
    fn from(text: &String) -> Self {
        Self::parse(text)
    }
}

impl From<&EmojiKey> for EmojiKey {
    fn from(key: &EmojiKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for EmojiKey {
    /// Custom emoji render in a mention form that [`EmojiKey::parse`] accepts
    /// back; the name is unknown at this level so a placeholder is used.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(id) => write!(f, "<:_:{id}>"),
            Self::Unicode(text) => f.write_str(text),
        }
    }
}

/// Extracts the id from `<:name:id>`, `<a:name:id>` or `<name:id>`.
fn parse_mention(text: &str) -> Option<u64> {
    let inner = text.strip_prefix('<')?.strip_suffix('>')?;
    let inner = inner
        .strip_prefix("a:")
        .or_else(|| inner.strip_prefix(':'))
        .unwrap_or(inner);
    let (name, id) = inner.split_once(':')?;

    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }
    parse_id(id)
}

fn parse_id(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// The emoji attached to a reaction event, as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEmoji {
    /// Custom emoji id; `None` for unicode emoji.
    pub id: Option<EmojiId>,
    /// Emoji name; the literal character(s) for unicode emoji.
    pub name: Option<String>,
    /// Whether a custom emoji is animated.
    #[serde(default)]
    pub animated: bool,
}

impl ReactionEmoji {
    /// A unicode emoji reaction.
    pub fn unicode(text: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(text.into()),
            animated: false,
        }
    }

    /// A custom emoji reaction.
    pub fn custom(id: impl Into<EmojiId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            animated: false,
        }
    }

    /// Canonical key: the id when present, otherwise the name.
    pub fn key(&self) -> EmojiKey {
        match (self.id, &self.name) {
            (Some(id), _) => EmojiKey::Custom(id),
            (None, Some(name)) => EmojiKey::Unicode(name.clone()),
            (None, None) => EmojiKey::Unicode(String::new()),
        }
    }
}

impl fmt::Display for ReactionEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("_");
        match self.id {
            Some(id) if self.animated => write!(f, "<a:{name}:{id}>"),
            Some(id) => write!(f, "<:{name}:{id}>"),
            None => f.write_str(name),
        }
    }
}
