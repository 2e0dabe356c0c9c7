//! RDF graph model and the builder that folds normalized records into it.

pub mod builder;
pub mod schema;
pub mod serialize;
pub mod terms;
pub mod uri;

use std::collections::BTreeSet;

pub use builder::build_graph;
pub use uri::Namespace;

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Iri(String),
    Literal { value: String, datatype: String },
    LangLiteral { value: String, lang: String },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn typed(value: impl Into<String>, datatype: &str) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: datatype.to_string(),
        }
    }

    pub fn english(value: impl Into<String>) -> Self {
        Term::LangLiteral {
            value: value.into(),
            lang: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

/// Set of triples; iteration order is the lexical order of
/// `(subject, predicate, object)`, so output is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: Term,
    ) -> bool {
        self.triples.insert(Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        })
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects in output order.
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = self.triples.iter().map(|t| t.subject.as_str()).collect();
        subjects.dedup();
        subjects
    }

    pub fn about<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| t.subject == subject)
    }
}

#[cfg(test)]
impl Graph {
    pub fn contains(&self, subject: &str, predicate: &str, object: &Term) -> bool {
        self.triples.iter().any(|t| {
            t.subject == subject && t.predicate == predicate && &t.object == object
        })
    }

    pub fn difference(&self, other: &Graph) -> Graph {
        Graph {
            triples: self.triples.difference(&other.triples).cloned().collect(),
        }
    }
}
