//! Class hierarchy and property metadata, asserted once per graph.

use super::terms::*;
use super::{Graph, Namespace, Term};

/// `(class, label, subclass of Category)`
pub const CLASSES: [(&str, &str, bool); 8] = [
    (ESOTERIC_LANGUAGE, "Esoteric programming language", false),
    (CATEGORY, "Category", false),
    (PARADIGM, "Paradigm", true),
    (COMPUTATIONAL_CLASS, "Computational class", true),
    (MEMORY_SYSTEM, "Memory system", true),
    (DIMENSION, "Dimension", true),
    (TYPE_SYSTEM, "Type system", true),
    (DIALECT, "Dialect", true),
];

#[derive(Debug, Clone, Copy)]
pub enum Range {
    Class(&'static str),
    Datatype(&'static str),
}

pub struct PropertyDef {
    pub name: &'static str,
    pub label: &'static str,
    pub comment: &'static str,
    pub range: Range,
}

const fn prop(
    name: &'static str,
    label: &'static str,
    comment: &'static str,
    range: Range,
) -> PropertyDef {
    PropertyDef {
        name,
        label,
        comment,
        range,
    }
}

pub const PROPERTIES: [PropertyDef; 16] = [
    prop(
        HAS_CATEGORY,
        "has category",
        "A wiki category the language is filed under.",
        Range::Class(CATEGORY),
    ),
    prop(
        HAS_PARADIGM,
        "has paradigm",
        "A programming paradigm the language follows.",
        Range::Class(PARADIGM),
    ),
    prop(
        HAS_COMPUTATIONAL_CLASS,
        "has computational class",
        "The computational class of the language.",
        Range::Class(COMPUTATIONAL_CLASS),
    ),
    prop(
        HAS_MEMORY_SYSTEM,
        "has memory system",
        "How the language stores data.",
        Range::Class(MEMORY_SYSTEM),
    ),
    prop(
        HAS_DIMENSION,
        "has dimension",
        "Dimensionality of the program source.",
        Range::Class(DIMENSION),
    ),
    prop(
        HAS_TYPE_SYSTEM,
        "has type system",
        "The type system of the language.",
        Range::Class(TYPE_SYSTEM),
    ),
    prop(HAS_DIALECT, "has dialect", "A dialect of the language.", Range::Class(DIALECT)),
    prop(
        INFLUENCED_BY,
        "influenced by",
        "A language this language draws on.",
        Range::Class(ESOTERIC_LANGUAGE),
    ),
    prop(
        INFLUENCED,
        "influenced",
        "A language that draws on this language.",
        Range::Class(ESOTERIC_LANGUAGE),
    ),
    prop(
        YEAR_CREATED,
        "year created",
        "The year the language first appeared.",
        Range::Datatype(XSD_GYEAR),
    ),
    prop(URL, "url", "The wiki page describing the language.", Range::Datatype(XSD_ANY_URI)),
    prop(
        DESIGNED_BY,
        "designed by",
        "The person who designed the language.",
        Range::Datatype(XSD_STRING),
    ),
    prop(ALIAS, "alias", "Another name for the language.", Range::Datatype(XSD_STRING)),
    prop(
        SHORT_DESCRIPTION,
        "short description",
        "The opening paragraphs of the language's wiki page.",
        Range::Datatype(XSD_STRING),
    ),
    prop(
        REFERENCE_IMPLEMENTATION,
        "reference implementation",
        "The canonical implementation of the language.",
        Range::Datatype(XSD_STRING),
    ),
    prop(
        FILE_EXTENSION,
        "file extension",
        "A file extension used for source files of the language.",
        Range::Datatype(XSD_STRING),
    ),
];

/// All schema-level triples for the namespace.
pub fn axioms(ns: &Namespace) -> Graph {
    let mut graph = Graph::new();
    let category = ns.term(CATEGORY);

    for (class, label, is_category) in CLASSES {
        let iri = ns.term(class);
        graph.add(&iri, RDF_TYPE, Term::iri(OWL_CLASS));
        graph.add(&iri, RDFS_LABEL, Term::english(label));
        if is_category {
            graph.add(&iri, RDFS_SUBCLASS_OF, Term::iri(&category));
        }
    }

    let domain = ns.term(ESOTERIC_LANGUAGE);
    for p in &PROPERTIES {
        let iri = ns.term(p.name);
        graph.add(&iri, RDF_TYPE, Term::iri(RDF_PROPERTY));
        graph.add(&iri, RDFS_LABEL, Term::english(p.label));
        graph.add(&iri, RDFS_COMMENT, Term::english(p.comment));
        graph.add(&iri, RDFS_DOMAIN, Term::iri(&domain));
        let range = match p.range {
            Range::Class(class) => ns.term(class),
            Range::Datatype(dt) => dt.to_string(),
        };
        graph.add(&iri, RDFS_RANGE, Term::iri(range));
    }

    graph.add(ns.term(INFLUENCED), OWL_INVERSE_OF, Term::iri(ns.term(INFLUENCED_BY)));
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> Namespace {
        Namespace::new("http://localhost:5173/esolangs/")
    }

    #[test]
    fn materialized_classes_sit_under_category() {
        let ns = ns();
        let graph = axioms(&ns);
        let category = Term::iri(ns.term(CATEGORY));
        let materialized = [
            PARADIGM,
            COMPUTATIONAL_CLASS,
            MEMORY_SYSTEM,
            DIMENSION,
            TYPE_SYSTEM,
            DIALECT,
        ];
        for class in materialized {
            assert!(graph.contains(&ns.term(class), RDFS_SUBCLASS_OF, &category), "{class}");
        }
        assert!(!graph.contains(&ns.term(CATEGORY), RDFS_SUBCLASS_OF, &category));
        assert!(!graph.contains(&ns.term(ESOTERIC_LANGUAGE), RDFS_SUBCLASS_OF, &category));
    }

    #[test]
    fn every_property_is_described() {
        let ns = ns();
        let graph = axioms(&ns);
        for p in &PROPERTIES {
            let iri = ns.term(p.name);
            let predicates: Vec<_> = graph.about(&iri).map(|t| t.predicate.as_str()).collect();
            for expected in [RDF_TYPE, RDFS_LABEL, RDFS_COMMENT, RDFS_DOMAIN, RDFS_RANGE] {
                assert!(predicates.contains(&expected), "{} lacks {}", p.name, expected);
            }
        }
        assert!(graph.contains(
            &ns.term(FILE_EXTENSION),
            RDFS_RANGE,
            &Term::iri(XSD_STRING)
        ));
    }

    #[test]
    fn single_inverse_axiom() {
        let ns = ns();
        let graph = axioms(&ns);
        let inverses: Vec<_> = graph.iter().filter(|t| t.predicate == OWL_INVERSE_OF).collect();
        assert_eq!(inverses.len(), 1);
        assert_eq!(inverses[0].subject, ns.term(INFLUENCED));
        assert_eq!(inverses[0].object, Term::iri(ns.term(INFLUENCED_BY)));
    }
}
