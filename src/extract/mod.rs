pub mod categories;
pub mod description;
pub mod index;
pub mod table;
pub mod text;

use scraper::Html;
use tracing::debug;

use crate::record::{LanguageRecord, ListField, ScalarField, ValueSet};

/// A record field an extractor can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Scalar(ScalarField),
    List(ListField),
}

impl Slot {
    pub fn is_filled(self, record: &LanguageRecord) -> bool {
        match self {
            Slot::Scalar(f) => record.scalar(f).is_some(),
            Slot::List(f) => record.list(f).is_some_and(|s| !s.is_empty()),
        }
    }

    /// Scalars keep the first value; lists gain one element.
    pub fn fill(self, record: &mut LanguageRecord, value: String) {
        match self {
            Slot::Scalar(f) => {
                let slot = record.scalar_mut(f);
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
            Slot::List(f) => {
                let mut values = record.list(f).cloned().unwrap_or_default();
                values.insert(value);
                record.set_list(f, values);
            }
        }
    }
}

/// One fetched page handed to the assembler.
#[derive(Debug, Clone)]
pub struct PageInput {
    pub name: Option<String>,
    pub url: String,
    pub html: String,
}

/// Merge table, text, description and category extraction into one record.
pub fn assemble(page: &PageInput) -> LanguageRecord {
    let doc = Html::parse_document(&page.html);

    let mut record = LanguageRecord {
        name: page.name.clone(),
        url: Some(page.url.clone()),
        ..Default::default()
    };

    let infobox = table::extract(&doc);
    if infobox.is_empty() {
        debug!(page = %page.url, "no infobox, relying on body text");
    }
    infobox.apply_to(&mut record);
    record.short_description = description::extract(&doc);

    let categories: ValueSet = categories::extract(&doc).into_iter().collect();
    record.set_list(ListField::Categories, categories);

    text::fill_missing(&mut record, &doc);
    record.compact();
    record
}
