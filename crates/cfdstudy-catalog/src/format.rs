//! Positional placeholder substitution (`%1`..`%9`).

use std::collections::BTreeSet;

use cfdstudy_core::config::MissingArgumentPolicy;
use cfdstudy_core::error::CatalogError;

/// Replace `%N` with `args[N - 1]`.
///
/// A placeholder without a matching argument stays in the output as written.
/// A `%` not followed by a digit `1`..`9` is copied unchanged. Substituted
/// arguments are not scanned again.
pub fn format<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    match substitute(template, args, false) {
        Ok(out) => out,
        Err(_) => template.to_string(),
    }
}

/// Like [`format`], but fails on the first placeholder without an argument.
pub fn try_format<S: AsRef<str>>(template: &str, args: &[S]) -> Result<String, CatalogError> {
    substitute(template, args, true).map_err(|index| CatalogError::MissingArgument {
        index,
        template: template.to_string(),
    })
}

/// Format according to a configured [`MissingArgumentPolicy`].
pub fn format_with<S: AsRef<str>>(
    template: &str,
    args: &[S],
    policy: MissingArgumentPolicy,
) -> Result<String, CatalogError> {
    match policy {
        MissingArgumentPolicy::Keep => Ok(format(template, args)),
        MissingArgumentPolicy::Error => try_format(template, args),
    }
}

/// Placeholder indices used by `template`.
pub fn placeholders(template: &str) -> BTreeSet<u8> {
    let mut found = BTreeSet::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        if let Some(&(d @ '1'..='9')) = chars.peek() {
            chars.next();
            found.insert(digit(d));
        }
    }
    found
}

fn substitute<S: AsRef<str>>(template: &str, args: &[S], strict: bool) -> Result<String, u8> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(&(d @ '1'..='9')) = chars.peek() {
                chars.next();
                let index = digit(d);
                match args.get(usize::from(index) - 1) {
                    Some(arg) => out.push_str(arg.as_ref()),
                    None if strict => return Err(index),
                    None => {
                        out.push('%');
                        out.push(d);
                    }
                }
                continue;
            }
        }
        out.push(c);
    }
    Ok(out)
}

fn digit(d: char) -> u8 {
    d as u8 - b'0'
}
