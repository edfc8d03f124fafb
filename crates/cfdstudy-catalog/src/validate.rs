//! Authoring-time checks over catalogs.
//!
//! Findings are advisory. Nothing at runtime depends on them; a CI job
//! decides which severities fail a build.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use cfdstudy_core::model::{Catalog, Context, Message, TranslationStatus};
use serde::Serialize;

use crate::format::placeholders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// The key occurs more than once in its context; the last one wins.
    DuplicateKey { occurrences: usize },
    /// Placeholder indices skip numbers, e.g. `%1` and `%3` without `%2`.
    PlaceholderGap { missing: Vec<u8> },
    EmptyTranslation,
    MissingTranslation,
    Unfinished,
    /// Present in the reference catalog, absent from the translated one.
    MissingInLocale,
    PlaceholderMismatch { expected: Vec<u8>, found: Vec<u8> },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Unfinished => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { occurrences } => {
                write!(f, "duplicate key ({occurrences} occurrences, last one wins)")
            }
            Self::PlaceholderGap { missing } => {
                write!(f, "placeholder gap, missing {}", percent_list(missing))
            }
            Self::EmptyTranslation => f.write_str("empty translation"),
            Self::MissingTranslation => f.write_str("no translation"),
            Self::Unfinished => f.write_str("translation marked unfinished"),
            Self::MissingInLocale => f.write_str("missing from translated catalog"),
            Self::PlaceholderMismatch { expected, found } => write!(
                f,
                "placeholders differ: expected {}, found {}",
                percent_list(expected),
                percent_list(found)
            ),
        }
    }
}

/// One issue at one `(context, key)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub context: String,
    pub key: String,
    #[serde(flatten)]
    pub issue: Issue,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        self.issue.severity()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{}: {}",
            self.severity(),
            self.context,
            self.key,
            self.issue
        )
    }
}

/// Findings in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity() == severity)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    fn push(&mut self, context: &Context, key: &str, issue: Issue) {
        self.findings.push(Finding {
            context: context.key().to_string(),
            key: key.to_string(),
            issue,
        });
    }
}

/// Check a single catalog for duplicates, placeholder gaps, and empty or
/// unfinished translations.
pub fn validate(catalog: &Catalog) -> Report {
    let mut report = Report::default();
    for context in catalog.contexts() {
        for (key, occurrences) in key_counts(context) {
            if occurrences > 1 {
                report.push(context, key, Issue::DuplicateKey { occurrences });
            }
            let Some(message) = context.get(key) else {
                continue;
            };
            check_message(&mut report, context, key, message);
        }
    }
    report
}

fn check_message(report: &mut Report, context: &Context, key: &str, message: &Message) {
    let Some(translation) = message.translation.as_deref() else {
        report.push(context, key, Issue::MissingTranslation);
        return;
    };
    if translation.trim().is_empty() {
        report.push(context, key, Issue::EmptyTranslation);
    }
    if message.status == TranslationStatus::Unfinished {
        report.push(context, key, Issue::Unfinished);
    }
    let missing = gaps(&placeholders(translation));
    if !missing.is_empty() {
        report.push(context, key, Issue::PlaceholderGap { missing });
    }
}

/// Compare a translated catalog against the reference (source-language) one.
pub fn cross_check(reference: &Catalog, translated: &Catalog) -> Report {
    let mut report = Report::default();
    for context in reference.contexts() {
        for (key, _) in key_counts(context) {
            let Some(expected) = context.get(key) else {
                continue;
            };
            let found = translated
                .lookup(context.key(), key)
                .and_then(|m| m.translation.as_deref());
            let Some(found) = found else {
                report.push(context, key, Issue::MissingInLocale);
                continue;
            };
            let Some(expected) = expected.translation.as_deref() else {
                continue;
            };
            let (expected, found) = (placeholders(expected), placeholders(found));
            if expected != found {
                report.push(
                    context,
                    key,
                    Issue::PlaceholderMismatch {
                        expected: expected.into_iter().collect(),
                        found: found.into_iter().collect(),
                    },
                );
            }
        }
    }
    report
}

/// Distinct keys in first-seen order with their occurrence counts.
fn key_counts(context: &Context) -> Vec<(&str, usize)> {
    let mut order = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for message in context.messages() {
        let count = counts.entry(message.key()).or_insert(0);
        if *count == 0 {
            order.push(message.key());
        }
        *count += 1;
    }
    order
        .into_iter()
        .map(|key| (key, counts.get(key).copied().unwrap_or(0)))
        .collect()
}

fn gaps(used: &BTreeSet<u8>) -> Vec<u8> {
    let Some(&max) = used.last() else {
        return Vec::new();
    };
    (1..max).filter(|i| !used.contains(i)).collect()
}

fn percent_list(indices: &[u8]) -> String {
    if indices.is_empty() {
        return "none".to_string();
    }
    indices
        .iter()
        .map(|i| format!("%{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}
