//! A single selectable option.

use std::fmt;

/// One option of a selection.
///
/// # Example
///
/// ```rust,ignore
/// let red = Choice::new("red").button("\u{1F534}").pattern("r(?:ed)?");
/// assert_eq!(red.to_string(), "\u{1F534} = red");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    /// What the selection returns when this choice is picked.
    pub value: T,
    /// Reaction emoji picking this choice.
    pub button: Option<String>,
    /// Text pattern picking this choice, matched at the start of the input.
    pub pattern: Option<String>,
    /// How the choice is shown to users.
    pub label: String,
}

impl<T: fmt::Display> Choice<T> {
    /// A choice labelled with the string form of `value`.
    pub fn new(value: T) -> Self {
        let label = value.to_string();
        Self::labelled(value, label)
    }
}

impl<T> Choice<T> {
    /// A choice with an explicit label.
    pub fn labelled(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            button: None,
            pattern: None,
            label: label.into(),
        }
    }

    pub fn button(mut self, emoji: impl Into<String>) -> Self {
        self.button = Some(emoji.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.button {
            Some(button) => write!(f, "{button} = {}", self.label),
            None => f.write_str(&self.label),
        }
    }
}

impl<T: fmt::Display> From<T> for Choice<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
