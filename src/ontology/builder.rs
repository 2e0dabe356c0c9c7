use tracing::{debug, warn};

use super::schema;
use super::terms::*;
use super::{Graph, Namespace, Term};
use crate::record::{LanguageRecord, ListField, ScalarField};

/// A multi-valued field asserted as an object property.
pub struct RelationSpec {
    pub field: ListField,
    pub property: &'static str,
    /// Path under the base namespace the object URIs are minted in.
    pub path_prefix: &'static str,
    /// Assert `rdf:type` of the class derived from the property name.
    pub materialize: bool,
}

const fn rel(
    field: ListField,
    property: &'static str,
    path_prefix: &'static str,
    materialize: bool,
) -> RelationSpec {
    RelationSpec {
        field,
        property,
        path_prefix,
        materialize,
    }
}

pub const RELATIONS: [RelationSpec; 9] = [
    rel(ListField::Categories, HAS_CATEGORY, "category/", true),
    rel(ListField::Paradigms, HAS_PARADIGM, "paradigm/", true),
    rel(ListField::ComputationalClass, HAS_COMPUTATIONAL_CLASS, "computational-class/", true),
    rel(ListField::MemorySystem, HAS_MEMORY_SYSTEM, "memory-system/", true),
    rel(ListField::Dimensions, HAS_DIMENSION, "dimension/", true),
    rel(ListField::TypeSystem, HAS_TYPE_SYSTEM, "type-system/", true),
    rel(ListField::Dialects, HAS_DIALECT, "dialect/", true),
    // objects are languages themselves
    rel(ListField::InfluencedBy, INFLUENCED_BY, "", false),
    rel(ListField::Influenced, INFLUENCED, "", false),
];

pub const LITERALS: [(ScalarField, &str, &str); 6] = [
    (ScalarField::YearCreated, YEAR_CREATED, XSD_GYEAR),
    (ScalarField::Url, URL, XSD_ANY_URI),
    (ScalarField::DesignedBy, DESIGNED_BY, XSD_STRING),
    (ScalarField::Alias, ALIAS, XSD_STRING),
    (ScalarField::ShortDescription, SHORT_DESCRIPTION, XSD_STRING),
    (ScalarField::ReferenceImplementation, REFERENCE_IMPLEMENTATION, XSD_STRING),
];

/// Fold a normalized batch into a fresh graph, axioms included.
pub fn build_graph(records: &[LanguageRecord], ns: &Namespace) -> Graph {
    let mut graph = schema::axioms(ns);
    let mut skipped = 0usize;
    for record in records {
        if !add_record(&mut graph, record, ns) {
            skipped += 1;
        }
    }
    debug!(records = records.len(), skipped, triples = graph.len(), "graph built");
    graph
}

/// Assert one language. Returns `false` when the record has no usable name.
pub fn add_record(graph: &mut Graph, record: &LanguageRecord, ns: &Namespace) -> bool {
    let Some(subject) = record.name.as_deref().and_then(|n| ns.entity("", n)) else {
        warn!(url = ?record.url, name = ?record.name, "skipping record without a usable name");
        return false;
    };

    graph.add(&subject, RDF_TYPE, Term::iri(ns.term(ESOTERIC_LANGUAGE)));

    for (field, property, datatype) in LITERALS {
        if let Some(value) = record.scalar(field) {
            graph.add(&subject, ns.term(property), Term::typed(value.as_str(), datatype));
        }
    }

    for relation in &RELATIONS {
        let Some(values) = record.list(relation.field) else {
            continue;
        };
        let predicate = ns.term(relation.property);
        let class = relation
            .materialize
            .then(|| derived_class(relation.property))
            .flatten()
            .map(|c| ns.term(c));
        for value in values {
            let Some(object) = ns.entity(relation.path_prefix, value) else {
                continue;
            };
            graph.add(&subject, &predicate, Term::iri(&object));
            if let Some(class) = &class {
                graph.add(&object, RDF_TYPE, Term::iri(class));
            }
        }
    }

    if let Some(extensions) = &record.file_extensions {
        let predicate = ns.term(FILE_EXTENSION);
        for ext in extensions {
            graph.add(&subject, &predicate, Term::typed(ext.as_str(), XSD_STRING));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ValueSet;

    const BASE: &str = "http://localhost:5173/esolangs/";

    fn set(values: &[&str]) -> Option<ValueSet> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    fn foo() -> LanguageRecord {
        LanguageRecord {
            name: Some("Foo".into()),
            year_created: Some("2001".into()),
            paradigms: set(&["functional"]),
            influenced_by: set(&["Bar"]),
            ..Default::default()
        }
    }

    #[test]
    fn single_record_emits_exactly_its_triples() {
        let ns = Namespace::new(BASE);
        let graph = build_graph(&[foo()], &ns);
        let instances = graph.difference(&schema::axioms(&ns));

        let foo = format!("{BASE}Foo");
        let functional = format!("{BASE}paradigm/functional");
        let mut expected = Graph::new();
        expected.add(&foo, RDF_TYPE, Term::iri(format!("{BASE}EsotericLanguage")));
        expected.add(&foo, format!("{BASE}yearCreated"), Term::typed("2001", XSD_GYEAR));
        expected.add(&foo, format!("{BASE}hasParadigm"), Term::iri(&functional));
        expected.add(&functional, RDF_TYPE, Term::iri(format!("{BASE}Paradigm")));
        expected.add(&foo, format!("{BASE}influencedBy"), Term::iri(format!("{BASE}Bar")));
        assert_eq!(instances, expected);

        // the inverse lives only in the schema
        let influenced = format!("{BASE}influenced");
        assert!(graph.iter().all(|t| t.predicate != influenced));
    }

    #[test]
    fn building_twice_gives_the_same_graph() {
        let ns = Namespace::new(BASE);
        let batch = vec![
            foo(),
            LanguageRecord {
                name: Some("Brainfuck".into()),
                url: Some("https://esolangs.org/wiki/Brainfuck".into()),
                categories: set(&["Languages", "Implemented"]),
                file_extensions: set(&[".b", ".bf"]),
                ..Default::default()
            },
        ];
        assert_eq!(build_graph(&batch, &ns), build_graph(&batch, &ns));
    }

    #[test]
    fn axioms_asserted_once_regardless_of_batch_size() {
        let ns = Namespace::new(BASE);
        let empty = build_graph(&[], &ns);
        let many = build_graph(&vec![foo(); 5], &ns);
        let inverse = |g: &Graph| g.iter().filter(|t| t.predicate == OWL_INVERSE_OF).count();
        assert_eq!(empty, schema::axioms(&ns));
        assert_eq!(inverse(&empty), 1);
        assert_eq!(inverse(&many), 1);
    }

    #[test]
    fn literals_and_extensions() {
        let ns = Namespace::new(BASE);
        let record = LanguageRecord {
            name: Some("Brainfuck".into()),
            url: Some("https://esolangs.org/wiki/Brainfuck".into()),
            designed_by: Some("Urban Müller".into()),
            reference_implementation: Some("Unknown".into()),
            file_extensions: set(&[".b", ".bf"]),
            ..Default::default()
        };
        let graph = build_graph(&[record], &ns);
        let bf = format!("{BASE}Brainfuck");
        assert!(graph.contains(
            &bf,
            &ns.term(URL),
            &Term::typed("https://esolangs.org/wiki/Brainfuck", XSD_ANY_URI)
        ));
        assert!(graph.contains(
            &bf,
            &ns.term(DESIGNED_BY),
            &Term::typed("Urban Müller", XSD_STRING)
        ));
        assert!(graph.contains(
            &bf,
            &ns.term(REFERENCE_IMPLEMENTATION),
            &Term::typed("Unknown", XSD_STRING)
        ));
        let extensions: Vec<_> = graph
            .about(&bf)
            .filter(|t| t.predicate == ns.term(FILE_EXTENSION))
            .map(|t| &t.object)
            .collect();
        assert_eq!(
            extensions,
            vec![&Term::typed(".b", XSD_STRING), &Term::typed(".bf", XSD_STRING)]
        );
        // absent scalars emit nothing
        assert!(graph.about(&bf).all(|t| t.predicate != ns.term(YEAR_CREATED)));
    }

    #[test]
    fn categories_are_nested_and_typed() {
        let ns = Namespace::new(BASE);
        let record = LanguageRecord {
            name: Some("Bradley's Language".into()),
            categories: set(&["Implemented"]),
            dialects: set(&["Smallfuck"]),
            ..Default::default()
        };
        let graph = build_graph(&[record], &ns);
        let subject = format!("{BASE}Bradley%27s%20Language");
        let category = format!("{BASE}category/Implemented");
        assert!(graph.contains(&subject, &ns.term(HAS_CATEGORY), &Term::iri(&category)));
        assert!(graph.contains(&category, RDF_TYPE, &Term::iri(ns.term(CATEGORY))));
        assert!(graph.contains(
            &format!("{BASE}dialect/Smallfuck"),
            RDF_TYPE,
            &Term::iri(ns.term(DIALECT))
        ));
    }

    #[test]
    fn unnamed_records_are_skipped() {
        let ns = Namespace::new(BASE);
        let batch = vec![
            LanguageRecord {
                url: Some("https://esolangs.org/wiki/".into()),
                ..Default::default()
            },
            LanguageRecord {
                name: Some("  ".into()),
                ..Default::default()
            },
            foo(),
        ];
        let graph = build_graph(&batch, &ns);
        let languages = graph
            .iter()
            .filter(|t| {
                t.predicate == RDF_TYPE && t.object == Term::iri(ns.term(ESOTERIC_LANGUAGE))
            })
            .count();
        assert_eq!(languages, 1);
    }
}
