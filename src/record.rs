//! The per-language record exchanged between extraction, normalization and
//! ontology building, plus its JSON batch persistence.
//!
//! Raw and normalized records share this shape; the normalizer only tightens
//! the invariants on the values.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PipelineError, Result};
use crate::utils::write_atomic;

pub type ValueSet = BTreeSet<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageRecord {
    #[serde(
        default,
        alias = "LanguageName",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        alias = "URL",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        default,
        alias = "ShortDescription",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_description: Option<String>,

    #[serde(
        default,
        alias = "YearCreated",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_created: Option<String>,
    #[serde(
        default,
        alias = "DesignedBy",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub designed_by: Option<String>,
    #[serde(
        default,
        alias = "Alias",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub alias: Option<String>,
    #[serde(
        default,
        alias = "ReferenceImplementation",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_implementation: Option<String>,

    #[serde(
        default,
        alias = "Paradigms",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub paradigms: Option<ValueSet>,
    #[serde(
        default,
        alias = "Dimensions",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub dimensions: Option<ValueSet>,
    #[serde(
        default,
        alias = "MemorySystem",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub memory_system: Option<ValueSet>,
    #[serde(
        default,
        alias = "ComputationalClass",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub computational_class: Option<ValueSet>,
    #[serde(
        default,
        alias = "TypeSystem",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub type_system: Option<ValueSet>,
    #[serde(
        default,
        alias = "Dialects",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub dialects: Option<ValueSet>,
    #[serde(
        default,
        alias = "InfluencedBy",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub influenced_by: Option<ValueSet>,
    #[serde(
        default,
        alias = "Influenced",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub influenced: Option<ValueSet>,
    #[serde(
        default,
        alias = "FileExtensions",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub file_extensions: Option<ValueSet>,
    #[serde(
        default,
        alias = "Categories",
        deserialize_with = "one_or_many",
        skip_serializing_if = "is_absent"
    )]
    pub categories: Option<ValueSet>,
}

/// Single-valued optional fields (everything but `name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Url,
    ShortDescription,
    YearCreated,
    DesignedBy,
    Alias,
    ReferenceImplementation,
}

impl ScalarField {
    pub const ALL: [ScalarField; 6] = [
        ScalarField::Url,
        ScalarField::ShortDescription,
        ScalarField::YearCreated,
        ScalarField::DesignedBy,
        ScalarField::Alias,
        ScalarField::ReferenceImplementation,
    ];
}

/// Multi-valued fields, each an optional non-empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Paradigms,
    Dimensions,
    MemorySystem,
    ComputationalClass,
    TypeSystem,
    Dialects,
    InfluencedBy,
    Influenced,
    FileExtensions,
    Categories,
}

impl ListField {
    pub const ALL: [ListField; 10] = [
        ListField::Paradigms,
        ListField::Dimensions,
        ListField::MemorySystem,
        ListField::ComputationalClass,
        ListField::TypeSystem,
        ListField::Dialects,
        ListField::InfluencedBy,
        ListField::Influenced,
        ListField::FileExtensions,
        ListField::Categories,
    ];
}

impl LanguageRecord {
    pub fn scalar(&self, field: ScalarField) -> Option<&String> {
        match field {
            ScalarField::Url => self.url.as_ref(),
            ScalarField::ShortDescription => self.short_description.as_ref(),
            ScalarField::YearCreated => self.year_created.as_ref(),
            ScalarField::DesignedBy => self.designed_by.as_ref(),
            ScalarField::Alias => self.alias.as_ref(),
            ScalarField::ReferenceImplementation => self.reference_implementation.as_ref(),
        }
    }

    pub fn scalar_mut(&mut self, field: ScalarField) -> &mut Option<String> {
        match field {
            ScalarField::Url => &mut self.url,
            ScalarField::ShortDescription => &mut self.short_description,
            ScalarField::YearCreated => &mut self.year_created,
            ScalarField::DesignedBy => &mut self.designed_by,
            ScalarField::Alias => &mut self.alias,
            ScalarField::ReferenceImplementation => &mut self.reference_implementation,
        }
    }

    pub fn list(&self, field: ListField) -> Option<&ValueSet> {
        match field {
            ListField::Paradigms => self.paradigms.as_ref(),
            ListField::Dimensions => self.dimensions.as_ref(),
            ListField::MemorySystem => self.memory_system.as_ref(),
            ListField::ComputationalClass => self.computational_class.as_ref(),
            ListField::TypeSystem => self.type_system.as_ref(),
            ListField::Dialects => self.dialects.as_ref(),
            ListField::InfluencedBy => self.influenced_by.as_ref(),
            ListField::Influenced => self.influenced.as_ref(),
            ListField::FileExtensions => self.file_extensions.as_ref(),
            ListField::Categories => self.categories.as_ref(),
        }
    }

    pub fn list_mut(&mut self, field: ListField) -> &mut Option<ValueSet> {
        match field {
            ListField::Paradigms => &mut self.paradigms,
            ListField::Dimensions => &mut self.dimensions,
            ListField::MemorySystem => &mut self.memory_system,
            ListField::ComputationalClass => &mut self.computational_class,
            ListField::TypeSystem => &mut self.type_system,
            ListField::Dialects => &mut self.dialects,
            ListField::InfluencedBy => &mut self.influenced_by,
            ListField::Influenced => &mut self.influenced,
            ListField::FileExtensions => &mut self.file_extensions,
            ListField::Categories => &mut self.categories,
        }
    }

    /// Replace a list field, storing `None` when `values` is empty.
    pub fn set_list(&mut self, field: ListField, values: ValueSet) {
        *self.list_mut(field) = if values.is_empty() { None } else { Some(values) };
    }

    /// Move empty sets and blank strings back to the absent state.
    pub fn compact(&mut self) {
        for field in ListField::ALL {
            let slot = self.list_mut(field);
            if slot.as_ref().is_some_and(|s| s.is_empty()) {
                *slot = None;
            }
        }
        for field in ScalarField::ALL {
            let slot = self.scalar_mut(field);
            if slot.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *slot = None;
            }
        }
    }

    /// Overwrite fields with every non-empty value from `other`.
    pub fn overlay(&mut self, mut other: LanguageRecord) {
        for field in ScalarField::ALL {
            let value = other.scalar_mut(field).take();
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                *self.scalar_mut(field) = Some(value);
            }
        }
        for field in ListField::ALL {
            let values = other.list_mut(field).take();
            if let Some(values) = values.filter(|v| !v.is_empty()) {
                *self.list_mut(field) = Some(values);
            }
        }
    }

    /// Display label for logs.
    pub fn label(&self) -> &str {
        self.name.as_deref().or(self.url.as_deref()).unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
impl LanguageRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        LanguageRecord {
            name: Some(name.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

fn is_absent(values: &Option<ValueSet>) -> bool {
    values.as_ref().map_or(true, |v| v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Lenient {
    fn into_string(self) -> String {
        match self {
            Lenient::Text(s) => s,
            Lenient::Number(n) => n.to_string(),
            Lenient::Bool(b) => b.to_string(),
        }
    }
}

/// Scalar values may be stored as strings or numbers (years often are).
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Lenient> = Option::deserialize(deserializer)?;
    Ok(value.map(Lenient::into_string))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Lenient),
    Many(Vec<Option<Lenient>>),
}

/// Multi-valued fields may be stored as one string or an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<ValueSet>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany> = Option::deserialize(deserializer)?;
    let set: ValueSet = match value {
        None => return Ok(None),
        Some(OneOrMany::One(v)) => std::iter::once(v.into_string()).collect(),
        Some(OneOrMany::Many(vs)) => vs.into_iter().flatten().map(Lenient::into_string).collect(),
    };
    Ok(if set.is_empty() { None } else { Some(set) })
}

/// Fold `incoming` into `base` by language name. Matching records take every
/// non-empty incoming field; unmatched or unnamed records are appended.
pub fn merge_batches(
    mut base: Vec<LanguageRecord>,
    incoming: Vec<LanguageRecord>,
) -> Vec<LanguageRecord> {
    let mut by_name: HashMap<String, usize> = base
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.name.clone().map(|n| (n, i)))
        .collect();
    for record in incoming {
        let existing = record.name.as_ref().and_then(|n| by_name.get(n)).copied();
        match existing {
            Some(i) => base[i].overlay(record),
            None => {
                if let Some(name) = &record.name {
                    by_name.insert(name.clone(), base.len());
                }
                base.push(record);
            }
        }
    }
    base
}

/// Load a JSON array of records. Any parse failure is fatal for the stage.
pub fn load_records(path: &Path) -> Result<Vec<LanguageRecord>> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist a batch as pretty JSON, replacing `path` atomically.
pub fn save_records(path: &Path, records: &[LanguageRecord]) -> Result<()> {
    let json = serde_json::to_vec_pretty(records).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> Option<ValueSet> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let mut record = LanguageRecord::new("Brainfuck", "https://esolangs.org/wiki/Brainfuck");
        record.year_created = Some("1993".into());
        record.designed_by = Some("Urban Müller".into());
        record.paradigms = set(&["imperative"]);
        record.categories = set(&["Languages", "Turing complete", "1993"]);
        record.file_extensions = set(&[".b", ".bf"]);

        let json = serde_json::to_string(&vec![record.clone()]).unwrap();
        let back: Vec<LanguageRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![record]);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let record = LanguageRecord::new("Foo", "https://esolangs.org/wiki/Foo");
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("url"));
    }

    #[test]
    fn accepts_pascal_case_keys_and_mixed_encodings() {
        let json = r#"{
            "LanguageName": "Befunge",
            "URL": "https://esolangs.org/wiki/Befunge",
            "YearCreated": 1993,
            "InfluencedBy": "FALSE",
            "Paradigms": ["imperative", null, "imperative"],
            "Dialects": [],
            "Alias": null
        }"#;
        let record: LanguageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name.as_deref(), Some("Befunge"));
        assert_eq!(record.year_created.as_deref(), Some("1993"));
        assert_eq!(record.influenced_by, set(&["FALSE"]));
        assert_eq!(record.paradigms, set(&["imperative"]));
        assert_eq!(record.dialects, None);
        assert_eq!(record.alias, None);
    }

    #[test]
    fn compact_drops_empty_values() {
        let mut record = LanguageRecord::new("Foo", "u");
        record.categories = Some(ValueSet::new());
        record.alias = Some("  ".into());
        record.compact();
        assert_eq!(record.categories, None);
        assert_eq!(record.alias, None);
    }

    #[test]
    fn batch_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("esolangs-data.json");
        let records = vec![
            LanguageRecord::new("A", "https://esolangs.org/wiki/A"),
            LanguageRecord::new("B", "https://esolangs.org/wiki/B"),
        ];
        save_records(&path, &records).unwrap();
        assert_eq!(load_records(&path).unwrap(), records);
    }

    #[test]
    fn merge_overwrites_only_non_empty_fields() {
        let mut befunge = LanguageRecord::new("Befunge", "https://esolangs.org/wiki/Befunge");
        befunge.designed_by = Some("Chris Pressey".into());
        befunge.paradigms = set(&["imperative"]);
        let base = vec![befunge, LanguageRecord::new("Foo", "https://esolangs.org/wiki/Foo")];

        let incoming = vec![
            LanguageRecord {
                name: Some("Befunge".into()),
                year_created: Some("1993".into()),
                designed_by: Some(" ".into()),
                paradigms: set(&["two-dimensional", "imperative"]),
                dialects: Some(ValueSet::new()),
                ..Default::default()
            },
            LanguageRecord::new("Bar", "https://dbpedia.org/resource/Bar"),
            LanguageRecord::new("Bar", "https://esolangs.org/wiki/Bar"),
            LanguageRecord {
                short_description: Some("no name".into()),
                ..Default::default()
            },
        ];

        let merged = merge_batches(base, incoming);
        assert_eq!(merged.len(), 4);
        let befunge = &merged[0];
        assert_eq!(befunge.url.as_deref(), Some("https://esolangs.org/wiki/Befunge"));
        assert_eq!(befunge.designed_by.as_deref(), Some("Chris Pressey"));
        assert_eq!(befunge.year_created.as_deref(), Some("1993"));
        assert_eq!(befunge.paradigms, set(&["imperative", "two-dimensional"]));
        assert_eq!(befunge.dialects, None);
        assert_eq!(merged[1].label(), "Foo");
        // a repeated new name folds into the record appended for it
        assert_eq!(merged[2].url.as_deref(), Some("https://esolangs.org/wiki/Bar"));
        assert_eq!(merged[3].name, None);
    }

    #[test]
    fn malformed_batch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"name\": ").unwrap();
        assert!(matches!(load_records(&path), Err(PipelineError::Json { .. })));
    }
}
