//! Free-text fallback for fields the infobox did not provide.
//!
//! Each field owns an ordered list of patterns. The first pattern that
//! matches anywhere in the body text wins; its first capture group, trimmed,
//! becomes the value. Misses leave the field empty.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::Slot;
use crate::record::{LanguageRecord, ListField, ScalarField};

static BODY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#bodyContent").unwrap());

const USER: &str = r"(User:\S+|[\w\s]+)";

pub struct TextRule {
    pub slot: Slot,
    pub patterns: Vec<Regex>,
}

fn rule(slot: Slot, patterns: &[String]) -> TextRule {
    TextRule {
        slot,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
            .collect(),
    }
}

/// Rules in evaluation order. Known false positives (e.g. "based on" with a
/// non-language referent) are accepted.
pub static TEXT_RULES: LazyLock<Vec<TextRule>> = LazyLock::new(|| {
    vec![
        rule(
            Slot::Scalar(ScalarField::Alias),
            &[
                r"the title of this article is also called ([^.]+)".to_string(),
                r"the correct title is actually ([^.]+)".to_string(),
            ],
        ),
        rule(
            Slot::Scalar(ScalarField::DesignedBy),
            &[
                format!("developed by {USER}"),
                format!("made by {USER}"),
                format!("invented by {USER}"),
                format!("implemented by {USER}"),
                format!("devised by {USER}"),
                format!("designed by {USER}"),
                format!("created by {USER}"),
                format!("discovered by {USER}"),
                r"by (User:\S+)".to_string(),
            ],
        ),
        rule(
            Slot::List(ListField::InfluencedBy),
            &[
                r"inspired by (\S+)".to_string(),
                r"clone of (\S+)".to_string(),
                r"based on (\S+)".to_string(),
            ],
        ),
        rule(
            Slot::Scalar(ScalarField::YearCreated),
            &[r"created in (\d{4})".to_string(), r"in (\d{4})".to_string()],
        ),
    ]
});

/// Text of the page body container, if the page has one.
pub fn body_text(doc: &Html) -> Option<String> {
    doc.select(&BODY_SEL)
        .next()
        .map(|body| body.text().collect::<String>())
}

/// First capture of the first matching pattern, trimmed.
pub fn first_match(rule: &TextRule, text: &str) -> Option<String> {
    for pattern in &rule.patterns {
        if let Some(caps) = pattern.captures(text) {
            let value = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            return (!value.is_empty()).then(|| value.to_string());
        }
    }
    None
}

/// Fill every still-empty field that has registered patterns.
pub fn fill_missing(record: &mut LanguageRecord, doc: &Html) {
    let Some(text) = body_text(doc) else {
        return;
    };
    fill_missing_from_text(record, &text);
}

pub fn fill_missing_from_text(record: &mut LanguageRecord, text: &str) {
    for rule in TEXT_RULES.iter() {
        if rule.slot.is_filled(record) {
            continue;
        }
        let Some(value) = first_match(rule, text) else {
            continue;
        };
        debug!(record = record.label(), slot = ?rule.slot, %value, "filled from body text");
        rule.slot.fill(record, value);
    }
}
