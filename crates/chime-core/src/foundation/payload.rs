//! Outbound message payloads.
//!
//! A [`Payload`] bundles everything that can go into one message: text
//! content, a single attachment, several attachments and a rich embed. Plain
//! strings and bare embeds convert into payloads directly, so every API that
//! sends or edits a message accepts `impl Into<Payload>`.
//!
//! ```rust,ignore
//! use chime_core::{Embed, Payload};
//!
//! let text: Payload = "hello".into();
//! let rich: Payload = Embed::new().description("page 1").into();
//! let both = Payload::new().content("see below").embed(Embed::new().title("Stats"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A file uploaded alongside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to users.
    pub filename: String,
    /// Raw file contents.
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from a name and its bytes.
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// One name/value field of an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field title.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    #[serde(default)]
    pub inline: bool,
}

/// A rich embed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Creates an empty embed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

/// Everything that goes into one outbound message.
///
/// Used both for the initial send and for later edits. Absent parts are
/// skipped when serialised, so a JSON-speaking transport can forward
/// [`Payload::to_args`] as its request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
}

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn file(mut self, file: Attachment) -> Self {
        self.file = Some(file);
        self
    }

    pub fn files(mut self, files: impl IntoIterator<Item = Attachment>) -> Self {
        self.files = files.into_iter().collect();
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Returns `true` when nothing would be sent.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.file.is_none() && self.files.is_empty() && self.embed.is_none()
    }

    /// Returns the send/edit argument set as JSON.
    ///
    /// Attachment bytes are not part of the JSON; transports upload them
    /// separately from `file` / `files`.
    pub fn to_args(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<&str> for Payload {
    fn from(content: &str) -> Self {
        Self::new().content(content)
    }
}

impl From<String> for Payload {
    fn from(content: String) -> Self {
        Self::new().content(content)
    }
}

impl From<&String> for Payload {
    fn from(content: &String) -> Self {
        Self::new().content(content.as_str())
    }
}

impl From<Embed> for Payload {
    fn from(embed: Embed) -> Self {
        Self::new().embed(embed)
    }
}
