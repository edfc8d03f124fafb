//! TS serializer.
//!
//! Output follows the layout of the shipped catalogs: `<!DOCTYPE TS><TS>`,
//! four-space indentation, one element per line. Text is written verbatim
//! apart from escaping, so loading the output gives back an equal catalog.

use std::io;

use cfdstudy_core::model::{Catalog, Message};

const INDENT: &str = "    ";

/// Serialize `catalog` as a TS document.
pub fn to_ts_string(catalog: &Catalog) -> String {
    let mut out = String::from("<!DOCTYPE TS><TS");
    let header = &catalog.header;
    for (name, value) in [
        ("version", &header.version),
        ("language", &header.language),
        ("sourcelanguage", &header.source_language),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
    }
    out.push_str(">\n");

    for context in catalog.contexts() {
        line(&mut out, 1, "<context>");
        leaf(&mut out, 2, "name", None, context.name());
        for message in context.messages() {
            write_message(&mut out, message);
        }
        line(&mut out, 1, "</context>");
    }
    out.push_str("</TS>\n");
    out
}

/// Serialize `catalog` into `out`.
pub fn write_ts<W: io::Write>(catalog: &Catalog, mut out: W) -> io::Result<()> {
    out.write_all(to_ts_string(catalog).as_bytes())
}

fn write_message(out: &mut String, message: &Message) {
    line(out, 2, "<message>");
    leaf(out, 3, "source", None, &message.source);
    if let Some(comment) = &message.comment {
        leaf(out, 3, "comment", None, comment);
    }
    if let Some(translation) = &message.translation {
        leaf(out, 3, "translation", message.status.type_attr(), translation);
    }
    line(out, 2, "</message>");
}

fn line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(text);
    out.push('\n');
}

fn leaf(out: &mut String, depth: usize, element: &str, kind: Option<&str>, text: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push('<');
    out.push_str(element);
    if let Some(kind) = kind {
        out.push_str(&format!(" type=\"{}\"", escape_attr(kind)));
    }
    out.push('>');
    out.push_str(&escape_text(text));
    out.push_str("</");
    out.push_str(element);
    out.push_str(">\n");
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
