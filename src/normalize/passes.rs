//! The seven normalization passes, in application order.
//!
//! Every pass edits one record in place, never fails, and is a fixed point on
//! its own output. `normalize::PASSES` fixes the order they run in.

use std::collections::BTreeSet;

use tracing::debug;

use super::year;
use crate::record::{LanguageRecord, ListField, ScalarField, ValueSet};
use crate::utils::{canonical_label, label_key, last_path_segment};
use crate::vocab::{KeywordFamily, NormalizeRules, TypedField, CATEGORY_PREFIX};

/// Typed fields a category label may duplicate.
const TYPED_LISTS: [ListField; 5] = [
    ListField::Paradigms,
    ListField::Dimensions,
    ListField::MemorySystem,
    ListField::ComputationalClass,
    ListField::TypeSystem,
];

pub fn typed_list(field: TypedField) -> ListField {
    match field {
        TypedField::Paradigms => ListField::Paradigms,
        TypedField::Dimensions => ListField::Dimensions,
        TypedField::MemorySystem => ListField::MemorySystem,
        TypedField::ComputationalClass => ListField::ComputationalClass,
    }
}

pub fn pass_recover_name(record: &mut LanguageRecord, rules: &NormalizeRules) {
    let missing = record
        .name
        .as_deref()
        .map_or(true, |n| rules.is_name_sentinel(n));
    if !missing {
        return;
    }
    let recovered = record.url.as_deref().and_then(last_path_segment);
    debug!(url = ?record.url, name = ?recovered, "recovered name from url");
    record.name = recovered;
}

pub fn pass_scrub_null_indicators(record: &mut LanguageRecord, rules: &NormalizeRules) {
    for field in ScalarField::ALL {
        let slot = record.scalar_mut(field);
        if slot.as_deref().is_some_and(|v| rules.is_null_indicator(v)) {
            *slot = None;
        }
    }
    for field in ListField::ALL {
        let Some(values) = record.list(field) else {
            continue;
        };
        let kept: ValueSet = values
            .iter()
            .filter(|v| !rules.is_null_indicator(v))
            .cloned()
            .collect();
        record.set_list(field, kept);
    }
}

pub fn pass_canonicalize_year(record: &mut LanguageRecord, _rules: &NormalizeRules) {
    if let Some(raw) = record.year_created.take() {
        record.year_created = year::canonical_year(&raw);
    }
}

pub fn pass_promote_category_year(record: &mut LanguageRecord, _rules: &NormalizeRules) {
    let Some(categories) = record.categories.take() else {
        return;
    };
    let (years, rest): (Vec<String>, Vec<String>) = categories
        .into_iter()
        .partition(|c| year::category_year(c).is_some());

    if record.year_created.is_none() {
        record.year_created = years
            .iter()
            .find_map(|c| year::category_year(c))
            .map(|y| y.to_string());
    }
    record.set_list(ListField::Categories, rest.into_iter().collect());
}

/// First family whose keyword occurs in the canonical label.
fn claiming_family<'a>(rules: &'a NormalizeRules, canonical: &str) -> Option<&'a KeywordFamily> {
    rules
        .keyword_families
        .iter()
        .find(|family| family.keywords.iter().any(|k| canonical.contains(k)))
}

fn strip_family_suffix(family: &KeywordFamily, canonical: String) -> String {
    if family.keep_whole.contains(&canonical.as_str()) {
        return canonical;
    }
    for suffix in family.strip_suffixes {
        if let Some(stem) = canonical.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    canonical
}

/// Insert `value` unless the set already holds it up to case and punctuation.
fn insert_by_key(values: &mut ValueSet, value: String) {
    let key = label_key(&value);
    if !values.iter().any(|v| label_key(v) == key) {
        values.insert(value);
    }
}

pub fn pass_reclassify_categories(record: &mut LanguageRecord, rules: &NormalizeRules) {
    let Some(categories) = record.categories.take() else {
        return;
    };
    let mut remaining = ValueSet::new();
    for category in categories {
        let canonical = canonical_label(&category);
        let Some(family) = claiming_family(rules, &canonical) else {
            remaining.insert(category);
            continue;
        };
        let value = strip_family_suffix(family, canonical);
        if value.is_empty() || rules.is_null_indicator(&value) {
            continue;
        }
        let field = typed_list(family.field);
        let mut values = record.list(field).cloned().unwrap_or_default();
        insert_by_key(&mut values, value);
        record.set_list(field, values);
    }
    record.set_list(ListField::Categories, remaining);
}

pub fn pass_dedup_categories(record: &mut LanguageRecord, rules: &NormalizeRules) {
    let Some(categories) = record.categories.take() else {
        return;
    };
    let mut keys = BTreeSet::new();
    for field in TYPED_LISTS {
        let Some(values) = record.list(field) else {
            continue;
        };
        for value in values {
            keys.insert(label_key(value));
            if let Some(canonical) = canonical_term(value, field, rules) {
                keys.insert(label_key(&canonical));
            }
        }
    }
    let kept = categories
        .into_iter()
        .filter(|c| !keys.contains(&label_key(c)))
        .collect();
    record.set_list(ListField::Categories, kept);
}

fn replacements(
    field: ListField,
    rules: &NormalizeRules,
) -> &'static [(&'static str, &'static str)] {
    match field {
        ListField::Paradigms => rules.replacements_for(TypedField::Paradigms),
        ListField::ComputationalClass => rules.replacements_for(TypedField::ComputationalClass),
        _ => &[],
    }
}

fn strip_wrapping(value: &str) -> &str {
    let mut v = value.trim();
    let n = CATEGORY_PREFIX.len();
    if v.get(..n).is_some_and(|p| p.eq_ignore_ascii_case(CATEGORY_PREFIX)) {
        v = v[n..].trim();
    }
    v.trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Paradigm labels lose the family suffix whether they came from the infobox
/// or a category.
fn paradigm_stem(rules: &NormalizeRules, canonical: &str) -> Option<String> {
    let family = rules
        .keyword_families
        .iter()
        .find(|f| f.field == TypedField::Paradigms)?;
    let stem = strip_family_suffix(family, canonical.to_string());
    (stem != canonical).then_some(stem)
}

/// Canonical spelling of one typed value, or `None` if nothing meaningful
/// remains once wiki prefixes and quotes are removed.
///
/// A replacement fires only when its pattern is a strict substring of the
/// hyphenated label and the label is not already the target.
pub fn canonical_term(value: &str, field: ListField, rules: &NormalizeRules) -> Option<String> {
    let stripped = strip_wrapping(value);
    if stripped.is_empty() || rules.is_null_indicator(stripped) {
        return None;
    }
    let mut current = canonical_label(stripped);
    let mut replaced = false;
    if field == ListField::Paradigms {
        if let Some(stem) = paradigm_stem(rules, &current) {
            current = stem;
            replaced = true;
        }
    }
    for (pattern, target) in replacements(field, rules) {
        if current != *pattern && current != *target && current.contains(pattern) {
            current = target.to_string();
            replaced = true;
        }
    }
    if !replaced {
        return Some(stripped.to_string());
    }
    (!rules.is_null_indicator(&current)).then_some(current)
}

pub fn pass_canonicalize_vocabulary(record: &mut LanguageRecord, rules: &NormalizeRules) {
    for field in [ListField::Paradigms, ListField::ComputationalClass] {
        let Some(values) = record.list(field) else {
            continue;
        };
        let mut canonical = ValueSet::new();
        for value in values {
            if let Some(term) = canonical_term(value, field, rules) {
                insert_by_key(&mut canonical, term);
            }
        }
        record.set_list(field, canonical);
    }
}
