//! `check` and `diff`: validator reports.

use cfdstudy_catalog::validate::{cross_check, validate, Report, Severity};
use cfdstudy_catalog::Catalog;

/// Printable result plus the warning count used for `--strict`.
pub struct Outcome {
    pub text: String,
    pub warnings: usize,
}

/// Validate each `(label, catalog)` pair.
pub fn check(catalogs: &[(String, Catalog)], json: bool) -> anyhow::Result<Outcome> {
    let reports: Vec<(&str, Report)> = catalogs
        .iter()
        .map(|(label, catalog)| (label.as_str(), validate(catalog)))
        .collect();
    let warnings = reports
        .iter()
        .map(|(_, report)| report.count(Severity::Warning))
        .sum();

    let text = if json {
        let map: serde_json::Map<String, serde_json::Value> = reports
            .iter()
            .map(|(label, report)| Ok((label.to_string(), serde_json::to_value(report)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        format!("{}\n", serde_json::to_string_pretty(&map)?)
    } else {
        let mut text = String::new();
        for (label, report) in &reports {
            text.push_str(&render(label, report));
        }
        text
    };

    Ok(Outcome { text, warnings })
}

/// Cross-check a translated catalog against a reference.
pub fn diff(reference: &Catalog, translated: &Catalog, json: bool) -> anyhow::Result<Outcome> {
    let report = cross_check(reference, translated);
    let warnings = report.count(Severity::Warning);
    let text = if json {
        format!("{}\n", serde_json::to_string_pretty(&report)?)
    } else {
        render("diff", &report)
    };
    Ok(Outcome { text, warnings })
}

fn render(label: &str, report: &Report) -> String {
    let mut text = String::new();
    for finding in report.iter() {
        text.push_str(&format!("{label}: {finding}\n"));
    }
    text.push_str(&format!(
        "{label}: {} warning(s), {} note(s)\n",
        report.count(Severity::Warning),
        report.count(Severity::Info)
    ));
    text
}
