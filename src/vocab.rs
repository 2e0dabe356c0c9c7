//! Static vocabulary tables consumed by the normalizer.
//!
//! Everything here is immutable configuration. `NormalizeRules::default()`
//! bundles these tables so the passes receive them explicitly.

/// Display names that mean "no name" after tabular loading of absent values.
pub const NAME_SENTINELS: &[&str] = &["nan"];

/// Values (compared trimmed and lowercased) that carry no information.
pub const NULL_INDICATORS: &[&str] = &["", "unknown", "none", "n/a", "na", "nan", "null", "?", "-"];

/// Typed multi-valued fields a category label can be moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypedField {
    Paradigms,
    Dimensions,
    MemorySystem,
    ComputationalClass,
}

/// Substrings identifying membership of a category label in a typed field.
#[derive(Debug, Clone, Copy)]
pub struct KeywordFamily {
    pub field: TypedField,
    /// Matched against the canonical (lowercase, hyphen-joined) label.
    pub keywords: &'static [&'static str],
    /// Stripped from the end of the canonical label, first match only.
    pub strip_suffixes: &'static [&'static str],
    /// Canonical labels that are kept whole even if they end in a suffix.
    pub keep_whole: &'static [&'static str],
}

/// Evaluated in order; the first family with a matching keyword claims the label.
pub const KEYWORD_FAMILIES: &[KeywordFamily] = &[
    KeywordFamily {
        field: TypedField::Dimensions,
        keywords: &["dimensional", "dimensions"],
        strip_suffixes: &["-languages", "-language"],
        keep_whole: &[],
    },
    KeywordFamily {
        field: TypedField::MemorySystem,
        keywords: &["based"],
        strip_suffixes: &["-languages", "-language"],
        keep_whole: &[],
    },
    KeywordFamily {
        field: TypedField::ComputationalClass,
        keywords: &["turing", "automata", "automaton", "computational-class"],
        strip_suffixes: &["-computational-class", "-languages"],
        keep_whole: &[],
    },
    KeywordFamily {
        field: TypedField::Paradigms,
        keywords: &["paradigm"],
        strip_suffixes: &["-paradigms", "-paradigm"],
        keep_whole: &["multi-paradigm"],
    },
];

/// `(pattern, canonical)` pairs applied to paradigm labels.
pub const PARADIGM_REPLACEMENTS: &[(&str, &str)] = &[
    ("particle-automat", "particle-automaton"),
    ("object-oriented", "object-oriented"),
    ("multip", "multi-paradigm"),
];

/// `(pattern, canonical)` pairs applied to computational class labels.
pub const COMPUTATIONAL_CLASS_REPLACEMENTS: &[(&str, &str)] = &[
    ("turing-complete", "turing-complete"),
    ("linear-bounded-automat", "linear-bounded-automaton"),
    ("finite-state-automat", "finite-state-automaton"),
    ("turing-tarpit", "turing-tarpit"),
    ("pushdown-automat", "push-down-automaton"),
    ("push-down-automat", "push-down-automaton"),
];

/// Prefix the wiki puts in front of category names in some table cells.
pub const CATEGORY_PREFIX: &str = "category:";

/// All normalization tables, passed by reference into every pass.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeRules {
    pub name_sentinels: &'static [&'static str],
    pub null_indicators: &'static [&'static str],
    pub keyword_families: &'static [KeywordFamily],
    pub paradigm_replacements: &'static [(&'static str, &'static str)],
    pub computational_class_replacements: &'static [(&'static str, &'static str)],
}

impl Default for NormalizeRules {
    fn default() -> Self {
        NormalizeRules {
            name_sentinels: NAME_SENTINELS,
            null_indicators: NULL_INDICATORS,
            keyword_families: KEYWORD_FAMILIES,
            paradigm_replacements: PARADIGM_REPLACEMENTS,
            computational_class_replacements: COMPUTATIONAL_CLASS_REPLACEMENTS,
        }
    }
}

impl NormalizeRules {
    pub fn is_null_indicator(&self, value: &str) -> bool {
        let lower = value.trim().to_lowercase();
        self.null_indicators.iter().any(|n| *n == lower)
    }

    pub fn is_name_sentinel(&self, value: &str) -> bool {
        let lower = value.trim().to_lowercase();
        lower.is_empty() || self.name_sentinels.iter().any(|n| *n == lower)
    }

    pub fn replacements_for(&self, field: TypedField) -> &'static [(&'static str, &'static str)] {
        match field {
            TypedField::Paradigms => self.paradigm_replacements,
            TypedField::ComputationalClass => self.computational_class_replacements,
            TypedField::Dimensions | TypedField::MemorySystem => &[],
        }
    }
}
