//! Catalog loader: builds a [`Catalog`] from a TS document.

mod reader;

#[cfg(test)]
mod tests;

use std::path::Path;

use cfdstudy_core::config::{CatalogConfig, DuplicateContextPolicy};
use cfdstudy_core::error::{CatalogError, FormatError};
use cfdstudy_core::model::{Catalog, Context, Header, Message, TranslationStatus};
use tracing::{debug, info, warn};

use reader::{Reader, Token};

/// Loader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub duplicate_contexts: DuplicateContextPolicy,
}

impl From<&CatalogConfig> for LoadOptions {
    fn from(cfg: &CatalogConfig) -> Self {
        Self {
            duplicate_contexts: cfg.duplicate_contexts,
        }
    }
}

/// Parse a TS document with default options.
///
/// An empty document yields an empty catalog. Plural messages
/// (`<message numerus="yes">` with `<numerusform>` children) are skipped,
/// so their keys fall back like any other miss.
pub fn load(source: &str) -> Result<Catalog, CatalogError> {
    load_with(source, &LoadOptions::default())
}

/// Parse a TS document.
pub fn load_with(source: &str, options: &LoadOptions) -> Result<Catalog, CatalogError> {
    Ok(Parser::new(source, options).document()?)
}

/// Read and parse a TS file with default options.
pub fn load_file(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    load_file_with(path, &LoadOptions::default())
}

/// Read and parse a TS file.
pub fn load_file_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let catalog = load_with(&content, options).map_err(|e| {
        warn!("failed to load catalog {}: {e}", path.display());
        e
    })?;
    info!(
        "loaded catalog {}: {} contexts, {} messages",
        path.display(),
        catalog.contexts().len(),
        catalog.message_count()
    );
    Ok(catalog)
}

struct Parser<'a> {
    reader: Reader<'a>,
    options: &'a LoadOptions,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, options: &'a LoadOptions) -> Self {
        Self {
            reader: Reader::new(source),
            options,
        }
    }

    fn next(&mut self) -> Result<Option<(usize, Token<'a>)>, FormatError> {
        self.reader.next_token()
    }

    fn document(mut self) -> Result<Catalog, FormatError> {
        let mut catalog: Option<Catalog> = None;
        while let Some((at, token)) = self.next()? {
            match token {
                Token::Text(text) if is_blank(&text) => {}
                Token::Start { name, attrs, empty } if catalog.is_none() => {
                    if name != "TS" {
                        return Err(self
                            .reader
                            .error(at, format!("expected <TS> root element, found <{name}>")));
                    }
                    let mut root = Catalog::with_header(header(&attrs));
                    if !empty {
                        self.root(&mut root, at)?;
                    }
                    catalog = Some(root);
                }
                Token::End { name } if catalog.is_none() => {
                    return Err(self.reader.error(at, format!("unexpected closing tag </{name}>")));
                }
                Token::Text(_) if catalog.is_none() => {
                    return Err(self.reader.error(at, "unexpected text before the root element"));
                }
                _ => return Err(self.reader.error(at, "unexpected content after </TS>")),
            }
        }
        Ok(catalog.unwrap_or_default())
    }

    fn root(&mut self, catalog: &mut Catalog, open_at: usize) -> Result<(), FormatError> {
        loop {
            let Some((at, token)) = self.next()? else {
                return Err(self.reader.error(open_at, "unterminated element <TS>"));
            };
            match token {
                Token::Text(text) => self.expect_blank(&text, at, "TS")?,
                Token::Start {
                    name: "context",
                    empty,
                    ..
                } => {
                    let context = self.context(at, empty)?;
                    self.add_context(catalog, context, at)?;
                }
                Token::Start { name, empty, .. } => self.skip(name, at, empty, "TS")?,
                Token::End { name: "TS" } => return Ok(()),
                Token::End { name } => return Err(self.mismatch(at, "TS", name)),
            }
        }
    }

    fn context(&mut self, open_at: usize, empty: bool) -> Result<Context, FormatError> {
        if empty {
            return Err(self.reader.error(open_at, "<context> is missing <name>"));
        }
        let mut name = None;
        let mut messages = Vec::new();
        loop {
            let Some((at, token)) = self.next()? else {
                return Err(self.reader.error(open_at, "unterminated element <context>"));
            };
            match token {
                Token::Text(text) => self.expect_blank(&text, at, "context")?,
                Token::Start {
                    name: "name",
                    empty,
                    ..
                } => {
                    if name.is_some() {
                        return Err(self.reader.error(at, "duplicate <name> in <context>"));
                    }
                    name = Some(self.text("name", at, empty)?);
                }
                Token::Start {
                    name: "message",
                    attrs,
                    empty,
                } if attr(&attrs, "numerus") == Some("yes") => {
                    debug!("skipping plural message in <context>");
                    self.skip("message", at, empty, "context")?;
                }
                Token::Start {
                    name: "message",
                    empty,
                    ..
                } => messages.push(self.message(at, empty)?),
                Token::Start { name, empty, .. } => self.skip(name, at, empty, "context")?,
                Token::End { name: "context" } => break,
                Token::End { name } => return Err(self.mismatch(at, "context", name)),
            }
        }

        let Some(name) = name else {
            return Err(self.reader.error(open_at, "<context> is missing <name>"));
        };
        let mut context = Context::new(name);
        for message in messages {
            context.push(message);
        }
        Ok(context)
    }

    fn message(&mut self, open_at: usize, empty: bool) -> Result<Message, FormatError> {
        let mut source = None;
        let mut translation = None;
        let mut status = TranslationStatus::Finished;
        let mut comment = None;
        if empty {
            return Err(self.reader.error(open_at, "<message> is missing <source>"));
        }
        loop {
            let Some((at, token)) = self.next()? else {
                return Err(self.reader.error(open_at, "unterminated element <message>"));
            };
            match token {
                Token::Text(text) => self.expect_blank(&text, at, "message")?,
                Token::Start {
                    name: "source",
                    empty,
                    ..
                } => {
                    if source.is_some() {
                        return Err(self.reader.error(at, "duplicate <source> in <message>"));
                    }
                    source = Some(self.text("source", at, empty)?);
                }
                Token::Start {
                    name: "translation",
                    attrs,
                    empty,
                } => {
                    if translation.is_some() {
                        return Err(self.reader.error(at, "duplicate <translation> in <message>"));
                    }
                    let kind = attr(&attrs, "type");
                    status = TranslationStatus::from_type_attr(kind).ok_or_else(|| {
                        self.reader
                            .error(at, format!("unknown translation type {:?}", kind.unwrap_or_default()))
                    })?;
                    translation = Some(self.text("translation", at, empty)?);
                }
                Token::Start {
                    name: "comment",
                    empty,
                    ..
                } => {
                    if comment.is_some() {
                        return Err(self.reader.error(at, "duplicate <comment> in <message>"));
                    }
                    comment = Some(self.text("comment", at, empty)?);
                }
                Token::Start { name, empty, .. } => self.skip(name, at, empty, "message")?,
                Token::End { name: "message" } => break,
                Token::End { name } => return Err(self.mismatch(at, "message", name)),
            }
        }

        let Some(source) = source else {
            return Err(self.reader.error(open_at, "<message> is missing <source>"));
        };
        Ok(Message {
            source,
            translation,
            status,
            comment,
        })
    }

    /// Character content of a leaf element, verbatim.
    fn text(&mut self, element: &str, open_at: usize, empty: bool) -> Result<String, FormatError> {
        let mut out = String::new();
        if empty {
            return Ok(out);
        }
        loop {
            let Some((at, token)) = self.next()? else {
                return Err(self
                    .reader
                    .error(open_at, format!("unterminated element <{element}>")));
            };
            match token {
                Token::Text(text) => out.push_str(&text),
                Token::Start { name, .. } => {
                    return Err(self
                        .reader
                        .error(at, format!("unexpected <{name}> inside <{element}>")));
                }
                Token::End { name } if name == element => return Ok(out),
                Token::End { name } => return Err(self.mismatch(at, element, name)),
            }
        }
    }

    /// Skip an element this loader does not model, checking that it is balanced.
    fn skip(&mut self, element: &'a str, open_at: usize, empty: bool, parent: &str) -> Result<(), FormatError> {
        debug!("skipping <{element}> in <{parent}>");
        if empty {
            return Ok(());
        }
        let mut open = vec![element];
        while let Some(&expected) = open.last() {
            let Some((at, token)) = self.next()? else {
                return Err(self
                    .reader
                    .error(open_at, format!("unterminated element <{element}>")));
            };
            match token {
                Token::Text(_) => {}
                Token::Start {
                    name, empty: false, ..
                } => open.push(name),
                Token::Start { .. } => {}
                Token::End { name } if name == expected => {
                    open.pop();
                }
                Token::End { name } => return Err(self.mismatch(at, expected, name)),
            }
        }
        Ok(())
    }

    fn add_context(&self, catalog: &mut Catalog, context: Context, at: usize) -> Result<(), FormatError> {
        if !catalog.contains_context(context.key()) {
            catalog.insert_context(context);
            return Ok(());
        }
        match self.options.duplicate_contexts {
            DuplicateContextPolicy::Reject => Err(self
                .reader
                .error(at, format!("duplicate context {:?}", context.key()))),
            DuplicateContextPolicy::Merge => {
                warn!("merging duplicate context {:?}", context.key());
                catalog.insert_context(context);
                Ok(())
            }
        }
    }

    fn expect_blank(&self, text: &str, at: usize, element: &str) -> Result<(), FormatError> {
        if is_blank(text) {
            Ok(())
        } else {
            Err(self
                .reader
                .error(at, format!("unexpected text inside <{element}>")))
        }
    }

    fn mismatch(&self, at: usize, expected: &str, found: &str) -> FormatError {
        self.reader
            .error(at, format!("expected </{expected}>, found </{found}>"))
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn attr<'v>(attrs: &'v [(&str, String)], name: &str) -> Option<&'v str> {
    attrs
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}

fn header(attrs: &[(&str, String)]) -> Header {
    Header {
        version: attr(attrs, "version").map(str::to_string),
        language: attr(attrs, "language").map(str::to_string),
        source_language: attr(attrs, "sourcelanguage").map(str::to_string),
    }
}
