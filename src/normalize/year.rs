use std::sync::LazyLock;

use regex::Regex;

static FOUR_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{4}").unwrap());

/// Reduce a free-text year to four digits, or `None`.
///
/// `"unknown"` anywhere gives `None`; a range keeps its first segment. Text
/// that is not purely digits yields its first run of four digits, even when
/// more digits follow.
pub fn canonical_year(raw: &str) -> Option<String> {
    if raw.to_lowercase().contains("unknown") {
        return None;
    }
    let head = raw.split('-').next().unwrap_or_default().trim();
    if is_four_digits(head) {
        return Some(head.to_string());
    }
    if head.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    FOUR_DIGITS_RE.find(head).map(|m| m.as_str().to_string())
}

fn is_four_digits(value: &str) -> bool {
    value.len() == 4 && value.chars().all(|c| c.is_ascii_digit())
}

/// A category label that is just a year, e.g. `"1998"`.
pub fn category_year(label: &str) -> Option<u32> {
    let label = label.trim();
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    label.parse::<u32>().ok().filter(|y| (1000..=9999).contains(y))
}
