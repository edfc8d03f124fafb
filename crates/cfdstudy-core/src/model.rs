//! In-memory catalog model: a catalog owns contexts, a context owns messages.
//!
//! Raw text (context names, source keys, translations) is stored verbatim so
//! a catalog can be written back without loss. Lookups compare context names
//! and source keys by their trimmed form, on both the stored and the queried
//! side; within a context the last message with a given key wins.

use std::collections::HashMap;

use serde::Serialize;

/// Translation state carried by the `type` attribute of `<translation>`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    /// No `type` attribute.
    #[default]
    Finished,
    Unfinished,
    Obsolete,
    Vanished,
}

impl TranslationStatus {
    /// Map a `type` attribute value. `None` means the value is unknown.
    pub fn from_type_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete") => Some(Self::Obsolete),
            Some("vanished") => Some(Self::Vanished),
            Some(_) => None,
        }
    }

    /// The `type` attribute to write, if any.
    pub fn type_attr(&self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// One `(source key, translation)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "TranslationStatus::is_finished")]
    pub status: TranslationStatus,
    /// Disambiguation comment. Not part of the lookup key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Message {
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Some(translation.into()),
            status: TranslationStatus::Finished,
            comment: None,
        }
    }

    /// A message with no `<translation>` element.
    pub fn untranslated(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: None,
            status: TranslationStatus::Finished,
            comment: None,
        }
    }

    pub fn with_status(mut self, status: TranslationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The lookup key: the source text without surrounding whitespace.
    pub fn key(&self) -> &str {
        self.source.trim()
    }
}

/// A named group of messages, usually one dialog handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Context {
    name: String,
    messages: Vec<Message>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The name exactly as it appeared in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name used for lookups.
    pub fn key(&self) -> &str {
        self.name.trim()
    }

    /// All messages in document order, duplicates included.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append a message. A later message with the same key shadows earlier ones.
    pub fn push(&mut self, message: Message) {
        self.index
            .insert(message.key().to_string(), self.messages.len());
        self.messages.push(message);
    }

    /// Append every message of `other`, keeping this context's name.
    pub fn absorb(&mut self, other: Context) {
        for message in other.messages {
            self.push(message);
        }
    }

    /// The message that wins for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Message> {
        self.index.get(key.trim()).map(|&i| &self.messages[i])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Attributes of the `<TS>` root element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}

/// All contexts for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub header: Header,
    contexts: Vec<Context>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: Header) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.index.get(name.trim()).map(|&i| &self.contexts[i])
    }

    pub fn contains_context(&self, name: &str) -> bool {
        self.index.contains_key(name.trim())
    }

    /// Add a context. If one with the same name exists, the new messages are
    /// appended to it and `true` is returned.
    pub fn insert_context(&mut self, context: Context) -> bool {
        if let Some(&i) = self.index.get(context.key()) {
            self.contexts[i].absorb(context);
            return true;
        }
        self.index
            .insert(context.key().to_string(), self.contexts.len());
        self.contexts.push(context);
        false
    }

    /// The winning message for `(context, key)`, if any.
    pub fn lookup(&self, context: &str, key: &str) -> Option<&Message> {
        self.context(context)?.get(key)
    }

    /// Number of messages across all contexts, duplicates included.
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
