//! Markup tokenizer for catalog documents.
//!
//! Covers the subset of XML that TS files use: elements with quoted
//! attributes, character data, predefined and numeric entities, CDATA,
//! comments, processing instructions, and a DOCTYPE (skipped). Line ends
//! follow XML: `\r\n` and a lone `\r` both read as `\n`; only `&#13;`
//! yields a carriage return.

use cfdstudy_core::error::{FormatError, Position};

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Token<'a> {
    Start {
        name: &'a str,
        attrs: Vec<(&'a str, String)>,
        empty: bool,
    },
    End {
        name: &'a str,
    },
    Text(String),
}

pub(super) struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        let pos = if src.starts_with('\u{feff}') { 3 } else { 0 };
        Self { src, pos }
    }

    pub(super) fn error(&self, offset: usize, message: impl Into<String>) -> FormatError {
        FormatError::at(message, Position::of_offset(self.src, offset))
    }

    /// Next token and the byte offset where it starts, `None` at end of input.
    pub(super) fn next_token(&mut self) -> Result<Option<(usize, Token<'a>)>, FormatError> {
        loop {
            let src = self.src;
            let start = self.pos;
            let rest = &src[start..];
            if rest.is_empty() {
                return Ok(None);
            }

            if rest.starts_with("<!--") {
                self.pos = self.find_from(start + 4, "-->", start, "unterminated comment")? + 3;
            } else if let Some(body) = rest.strip_prefix("<![CDATA[") {
                let Some(end) = body.find("]]>") else {
                    return Err(self.error(start, "unterminated CDATA section"));
                };
                self.pos = start + 9 + end + 3;
                return Ok(Some((start, Token::Text(normalize_newlines(&body[..end])))));
            } else if rest.starts_with("<?") {
                self.pos = self.find_from(start + 2, "?>", start, "unterminated processing instruction")? + 2;
            } else if rest.starts_with("<!") {
                self.skip_declaration(start)?;
            } else if rest.starts_with("</") {
                self.pos = start + 2;
                let name = self.take_name()?;
                self.skip_whitespace();
                if !self.src[self.pos..].starts_with('>') {
                    return Err(self.error(self.pos, format!("expected '>' to close </{name}>")));
                }
                self.pos += 1;
                return Ok(Some((start, Token::End { name })));
            } else if rest.starts_with('<') {
                self.pos = start + 1;
                return self.start_tag(start).map(Some);
            } else {
                let end = rest.find('<').map_or(src.len(), |i| start + i);
                self.pos = end;
                let text = unescape(&src[start..end])
                    .map_err(|(i, msg)| self.error(start + i, msg))?;
                return Ok(Some((start, Token::Text(text))));
            }
        }
    }

    fn start_tag(&mut self, start: usize) -> Result<(usize, Token<'a>), FormatError> {
        let src = self.src;
        let name = self.take_name()?;
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            let rest = &src[self.pos..];
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((start, Token::Start { name, attrs, empty: true }));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((start, Token::Start { name, attrs, empty: false }));
            }
            if rest.is_empty() {
                return Err(self.error(start, format!("unterminated tag <{name}")));
            }

            let attr = self.take_name()?;
            self.skip_whitespace();
            if !self.src[self.pos..].starts_with('=') {
                return Err(self.error(self.pos, format!("expected '=' after attribute {attr}")));
            }
            self.pos += 1;
            self.skip_whitespace();
            let quote = match self.src[self.pos..].chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => {
                    return Err(self.error(self.pos, format!("expected quoted value for attribute {attr}")))
                }
            };
            let value_start = self.pos + 1;
            let Some(len) = self.src[value_start..].find(quote) else {
                return Err(self.error(self.pos, format!("unterminated value for attribute {attr}")));
            };
            let value = unescape(&self.src[value_start..value_start + len])
                .map_err(|(i, msg)| self.error(value_start + i, msg))?;
            self.pos = value_start + len + 1;
            attrs.push((attr, value));
        }
    }

    /// Skip `<!DOCTYPE ...>`, including a bracketed internal subset.
    fn skip_declaration(&mut self, start: usize) -> Result<(), FormatError> {
        let mut depth = 0usize;
        for (i, c) in self.src[start + 2..].char_indices() {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => {
                    self.pos = start + 2 + i + 1;
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(self.error(start, "unterminated declaration"))
    }

    fn take_name(&mut self) -> Result<&'a str, FormatError> {
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '=' | '<'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error(self.pos, "expected a name"));
        }
        let name = &rest[..len];
        self.pos += len;
        Ok(name)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn find_from(
        &self,
        from: usize,
        needle: &str,
        start: usize,
        message: &str,
    ) -> Result<usize, FormatError> {
        self.src[from..]
            .find(needle)
            .map(|i| from + i)
            .ok_or_else(|| self.error(start, message))
    }
}

/// Decode entities and normalize CRLF. Errors carry the byte offset into `raw`.
fn unescape(raw: &str) -> Result<String, (usize, String)> {
    if !raw.contains('&') && !raw.contains('\r') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let rest = &raw[i..];
        if rest.starts_with('&') {
            let Some(end) = rest.find(';') else {
                return Err((i, "unterminated entity reference".to_string()));
            };
            let entity = &rest[1..end];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            };
            let Some(c) = decoded else {
                return Err((i, format!("unknown entity &{entity};")));
            };
            out.push(c);
            i += end + 1;
        } else if rest.starts_with('\r') {
            out.push('\n');
            i += if rest.starts_with("\r\n") { 2 } else { 1 };
        } else {
            let c = rest.chars().next().unwrap_or_default();
            out.push(c);
            i += c.len_utf8();
        }
    }
    Ok(out)
}

fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        let mut reader = Reader::new(src);
        let mut out = Vec::new();
        while let Some((_, token)) = reader.next_token().unwrap() {
            out.push(token);
        }
        out
    }

    #[test]
    fn test_skips_prolog_and_comments() {
        let toks = tokens("<?xml version=\"1.0\"?><!DOCTYPE TS><!-- note --><TS/>");
        assert_eq!(
            toks,
            vec![Token::Start {
                name: "TS",
                attrs: vec![],
                empty: true
            }]
        );
    }

    #[test]
    fn test_attributes_and_entities() {
        let toks = tokens("<translation type='unfinished'>A &amp; B &lt;&#233;&#x41;&gt;</translation>");
        assert_eq!(
            toks,
            vec![
                Token::Start {
                    name: "translation",
                    attrs: vec![("type", "unfinished".to_string())],
                    empty: false
                },
                Token::Text("A & B <éA>".to_string()),
                Token::End {
                    name: "translation"
                },
            ]
        );
    }

    #[test]
    fn test_cdata_is_verbatim() {
        let toks = tokens("<source><![CDATA[a <b> &amp;]]></source>");
        assert_eq!(toks[1], Token::Text("a <b> &amp;".to_string()));
    }

    #[test]
    fn test_crlf_normalized() {
        let toks = tokens("<s>line1\r\nline2</s>");
        assert_eq!(toks[1], Token::Text("line1\nline2".to_string()));
    }

    #[test]
    fn test_lone_cr_normalized() {
        let toks = tokens("<s>a\rb<![CDATA[c\rd\r\ne]]>&#13;</s>");
        assert_eq!(toks[1], Token::Text("a\nb".to_string()));
        assert_eq!(toks[2], Token::Text("c\nd\ne".to_string()));
        assert_eq!(toks[3], Token::Text("\r".to_string()));
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let toks = tokens("<!DOCTYPE TS [ <!ENTITY x \"y\"> ]><TS></TS>");
        assert_eq!(toks.len(), 2);
    }

    #[test]
    fn test_unknown_entity_reports_position() {
        let mut reader = Reader::new("<a>\n  x &nbsp; y</a>");
        reader.next_token().unwrap();
        let err = reader.next_token().unwrap_err();
        assert_eq!(err.position, Some(Position { line: 2, column: 5 }));
        assert!(err.message.contains("&nbsp;"));
    }

    #[test]
    fn test_unterminated_tag() {
        let mut reader = Reader::new("<context name='x'");
        let err = reader.next_token().unwrap_err();
        assert!(err.message.contains("unterminated tag <context"));
    }

    #[test]
    fn test_unterminated_comment() {
        let mut reader = Reader::new("<!-- never closed");
        assert!(reader.next_token().is_err());
    }
}
