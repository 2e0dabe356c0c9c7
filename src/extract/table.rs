//! Infobox table extraction.
//!
//! The infobox is the right-floating table on a language page. Each row has a
//! `<th>` display header and a `<td>` value; headers are mapped to canonical
//! fields by case-insensitive substring match, first key in declared order.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::Slot;
use crate::record::{LanguageRecord, ListField, ScalarField};
use crate::utils::normalize_ws;

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table[style]").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static CODE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("code").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static EXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\w+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InfoboxField {
    Paradigms,
    DesignedBy,
    YearCreated,
    MemorySystem,
    Dimensions,
    ComputationalClass,
    ReferenceImplementation,
    InfluencedBy,
    Influenced,
    FileExtensions,
    Dialects,
    TypeSystem,
}

/// Display header text → canonical field, in match priority order.
///
/// "Influenced by" must precede "Influenced" so the longer header wins.
pub const HEADER_RENAMES: &[(&str, InfoboxField)] = &[
    ("Paradigm(s)", InfoboxField::Paradigms),
    ("Designed by", InfoboxField::DesignedBy),
    ("Appeared in", InfoboxField::YearCreated),
    ("Memory system", InfoboxField::MemorySystem),
    ("Dimensions", InfoboxField::Dimensions),
    ("Computational class", InfoboxField::ComputationalClass),
    ("Reference implementation", InfoboxField::ReferenceImplementation),
    ("Influenced by", InfoboxField::InfluencedBy),
    ("Influenced", InfoboxField::Influenced),
    ("File extension(s)", InfoboxField::FileExtensions),
    ("Dialects", InfoboxField::Dialects),
    ("Type system", InfoboxField::TypeSystem),
];

impl InfoboxField {
    pub const ALL: [InfoboxField; 12] = [
        InfoboxField::Paradigms,
        InfoboxField::DesignedBy,
        InfoboxField::YearCreated,
        InfoboxField::MemorySystem,
        InfoboxField::Dimensions,
        InfoboxField::ComputationalClass,
        InfoboxField::ReferenceImplementation,
        InfoboxField::InfluencedBy,
        InfoboxField::Influenced,
        InfoboxField::FileExtensions,
        InfoboxField::Dialects,
        InfoboxField::TypeSystem,
    ];

    /// Cells of these fields are split into lists.
    pub fn is_array(self) -> bool {
        !matches!(
            self,
            InfoboxField::DesignedBy
                | InfoboxField::YearCreated
                | InfoboxField::ReferenceImplementation
                | InfoboxField::FileExtensions
        )
    }

    pub fn slot(self) -> Slot {
        match self {
            InfoboxField::Paradigms => Slot::List(ListField::Paradigms),
            InfoboxField::DesignedBy => Slot::Scalar(ScalarField::DesignedBy),
            InfoboxField::YearCreated => Slot::Scalar(ScalarField::YearCreated),
            InfoboxField::MemorySystem => Slot::List(ListField::MemorySystem),
            InfoboxField::Dimensions => Slot::List(ListField::Dimensions),
            InfoboxField::ComputationalClass => Slot::List(ListField::ComputationalClass),
            InfoboxField::ReferenceImplementation => {
                Slot::Scalar(ScalarField::ReferenceImplementation)
            }
            InfoboxField::InfluencedBy => Slot::List(ListField::InfluencedBy),
            InfoboxField::Influenced => Slot::List(ListField::Influenced),
            InfoboxField::FileExtensions => Slot::List(ListField::FileExtensions),
            InfoboxField::Dialects => Slot::List(ListField::Dialects),
            InfoboxField::TypeSystem => Slot::List(ListField::TypeSystem),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Every canonical field, each either extracted or `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Infobox {
    fields: BTreeMap<InfoboxField, Option<FieldValue>>,
}

impl Default for Infobox {
    fn default() -> Self {
        Infobox {
            fields: InfoboxField::ALL.into_iter().map(|f| (f, None)).collect(),
        }
    }
}

impl Infobox {
    pub fn get(&self, field: InfoboxField) -> Option<&FieldValue> {
        self.fields.get(&field).and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Option::is_none)
    }

    /// Copy every extracted field onto the record.
    pub fn apply_to(&self, record: &mut LanguageRecord) {
        for field in InfoboxField::ALL {
            let Some(value) = self.get(field) else { continue };
            match (field.slot(), value) {
                (Slot::Scalar(s), FieldValue::Text(t)) => *record.scalar_mut(s) = Some(t.clone()),
                (Slot::Scalar(s), FieldValue::List(items)) => {
                    *record.scalar_mut(s) = items.first().cloned()
                }
                (Slot::List(l), FieldValue::List(items)) => {
                    record.set_list(l, items.iter().cloned().collect())
                }
                (Slot::List(l), FieldValue::Text(t)) => {
                    record.set_list(l, std::iter::once(t.clone()).collect())
                }
            }
        }
    }
}

/// Find the right-floating infobox and read its rows.
///
/// A page without an infobox is normal and yields an all-`None` result.
pub fn extract(doc: &Html) -> Infobox {
    let mut infobox = Infobox::default();
    let Some(table) = doc.select(&TABLE_SEL).find(|t| is_floating_right(*t)) else {
        return infobox;
    };
    debug!("found infobox table");

    for row in table.select(&ROW_SEL) {
        let Some(header) = row.select(&TH_SEL).next() else {
            continue;
        };
        let Some(field) = match_header(&element_text(header)) else {
            continue;
        };
        let Some(cell) = row.select(&TD_SEL).next() else {
            continue;
        };
        let slot = infobox.fields.entry(field).or_insert(None);
        if slot.is_some() {
            continue;
        }
        *slot = read_cell(field, cell);
    }
    infobox
}

/// First rename key contained in the header text, case-insensitively.
pub fn match_header(header: &str) -> Option<InfoboxField> {
    let header = header.trim().to_lowercase();
    HEADER_RENAMES
        .iter()
        .find(|(key, _)| header.contains(&key.to_lowercase()))
        .map(|(_, field)| *field)
}

fn is_floating_right(table: ElementRef) -> bool {
    table.value().attr("style").is_some_and(|style| {
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
        compact.to_lowercase().contains("float:right")
    })
}

fn read_cell(field: InfoboxField, cell: ElementRef) -> Option<FieldValue> {
    if field == InfoboxField::FileExtensions {
        let extensions = file_extensions(cell);
        return (!extensions.is_empty()).then_some(FieldValue::List(extensions));
    }
    if field.is_array() {
        let items = split_cell(cell);
        return (!items.is_empty()).then_some(FieldValue::List(items));
    }
    let text = element_text(cell);
    (!text.is_empty()).then_some(FieldValue::Text(text))
}

/// Split on `<br>` when present (stripping markup per segment), else on commas.
fn split_cell(cell: ElementRef) -> Vec<String> {
    let inner = cell.inner_html();
    let pieces: Vec<String> = if BR_RE.is_match(&inner) {
        BR_RE.split(&inner).map(strip_markup).collect()
    } else {
        element_text(cell).split(',').map(normalize_ws).collect()
    };
    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Tokens like `.bf` found inside `<code>` spans, deduplicated.
fn file_extensions(cell: ElementRef) -> Vec<String> {
    let found: BTreeSet<String> = cell
        .select(&CODE_SEL)
        .flat_map(|code| {
            let text = code.text().collect::<String>();
            EXT_RE
                .find_iter(&text)
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect();
    found.into_iter().collect()
}

fn strip_markup(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    normalize_ws(&parsed.root_element().text().collect::<String>())
}

pub(crate) fn element_text(el: ElementRef) -> String {
    normalize_ws(&el.text().collect::<String>())
}
