//! N-Triples, Turtle and RDF/XML writers for a [`Graph`].
//!
//! All three emit triples in the graph's lexical order, so serializing the
//! same graph twice yields byte-identical files.

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::terms::{BASE_PREFIX, PREFIXES, RDF_TYPE};
use super::{Graph, Namespace, Term};
use crate::error::{PipelineError, Result};
use crate::utils::write_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GraphFormat {
    #[value(name = "nt")]
    NTriples,
    #[value(name = "ttl")]
    Turtle,
    #[value(name = "rdf")]
    RdfXml,
}

impl GraphFormat {
    pub fn extension(self) -> &'static str {
        match self {
            GraphFormat::NTriples => "nt",
            GraphFormat::Turtle => "ttl",
            GraphFormat::RdfXml => "rdf",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "nt" => Some(GraphFormat::NTriples),
            "ttl" => Some(GraphFormat::Turtle),
            "rdf" | "xml" | "owl" => Some(GraphFormat::RdfXml),
            _ => None,
        }
    }
}

pub fn to_ntriples(graph: &Graph) -> String {
    let mut out = String::with_capacity(graph.len() * 96);
    for t in graph.iter() {
        out.push('<');
        out.push_str(&t.subject);
        out.push_str("> <");
        out.push_str(&t.predicate);
        out.push_str("> ");
        out.push_str(&nt_object(&t.object));
        out.push_str(" .\n");
    }
    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn nt_object(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{}>", iri),
        Term::Literal { value, datatype } => format!("\"{}\"^^<{}>", escape(value), datatype),
        Term::LangLiteral { value, lang } => format!("\"{}\"@{}", escape(value), lang),
    }
}

fn prefixes(ns: &Namespace) -> Vec<(&str, &str)> {
    let mut all: Vec<(&str, &str)> = PREFIXES.to_vec();
    all.push((BASE_PREFIX, ns.base()));
    all
}

fn is_simple_local(local: &str) -> bool {
    let mut chars = local.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// `prefix:local` for IRIs in a bound namespace whose local part needs no
/// escaping.
fn qname(iri: &str, ns: &Namespace) -> Option<String> {
    prefixes(ns).into_iter().find_map(|(prefix, namespace)| {
        iri.strip_prefix(namespace)
            .filter(|local| is_simple_local(local))
            .map(|local| format!("{}:{}", prefix, local))
    })
}

fn ttl_iri(iri: &str, ns: &Namespace) -> String {
    qname(iri, ns).unwrap_or_else(|| format!("<{}>", iri))
}

fn ttl_object(term: &Term, ns: &Namespace) -> String {
    match term {
        Term::Iri(iri) => ttl_iri(iri, ns),
        Term::Literal { value, datatype } => {
            format!("\"{}\"^^{}", escape(value), ttl_iri(datatype, ns))
        }
        Term::LangLiteral { value, lang } => format!("\"{}\"@{}", escape(value), lang),
    }
}

pub fn to_turtle(graph: &Graph, ns: &Namespace) -> String {
    let mut out = String::with_capacity(graph.len() * 64);
    for (prefix, namespace) in prefixes(ns) {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, namespace));
    }

    for subject in graph.subjects() {
        out.push('\n');
        out.push_str(&ttl_iri(subject, ns));
        let lines: Vec<String> = graph
            .about(subject)
            .map(|t| {
                let predicate = if t.predicate == RDF_TYPE {
                    "a".to_string()
                } else {
                    ttl_iri(&t.predicate, ns)
                };
                format!("    {} {}", predicate, ttl_object(&t.object, ns))
            })
            .collect();
        out.push('\n');
        out.push_str(&lines.join(" ;\n"));
        out.push_str(" .\n");
    }
    out
}

fn xml_err(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Serialize(e.to_string())
}

pub fn to_rdfxml(graph: &Graph, ns: &Namespace) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_err)?;

    let bindings = prefixes(ns);
    let xmlns: Vec<(String, &str)> = bindings
        .iter()
        .map(|(prefix, namespace)| (format!("xmlns:{}", prefix), *namespace))
        .collect();
    let root = BytesStart::new("rdf:RDF")
        .with_attributes(xmlns.iter().map(|(k, v)| (k.as_str(), *v)));
    writer.write_event(Event::Start(root)).map_err(xml_err)?;

    for subject in graph.subjects() {
        let description =
            BytesStart::new("rdf:Description").with_attributes([("rdf:about", subject)]);
        writer.write_event(Event::Start(description)).map_err(xml_err)?;

        for t in graph.about(subject) {
            let Some(element) = qname(&t.predicate, ns) else {
                return Err(PipelineError::Serialize(format!(
                    "predicate {} has no XML qualified name",
                    t.predicate
                )));
            };
            match &t.object {
                Term::Iri(iri) => {
                    let empty = BytesStart::new(element.as_str())
                        .with_attributes([("rdf:resource", iri.as_str())]);
                    writer.write_event(Event::Empty(empty)).map_err(xml_err)?;
                }
                Term::Literal { value, datatype } => {
                    let start = BytesStart::new(element.as_str())
                        .with_attributes([("rdf:datatype", datatype.as_str())]);
                    write_text_element(&mut writer, start, &element, value)?;
                }
                Term::LangLiteral { value, lang } => {
                    let start = BytesStart::new(element.as_str())
                        .with_attributes([("xml:lang", lang.as_str())]);
                    write_text_element(&mut writer, start, &element, value)?;
                }
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new("rdf:Description")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("rdf:RDF")))
        .map_err(xml_err)?;
    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_err)?;
    xml.push('\n');
    Ok(xml)
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    element: &str,
    value: &str,
) -> Result<()> {
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(element)))
        .map_err(xml_err)?;
    Ok(())
}

pub fn render(graph: &Graph, ns: &Namespace, format: GraphFormat) -> Result<String> {
    Ok(match format {
        GraphFormat::NTriples => to_ntriples(graph),
        GraphFormat::Turtle => to_turtle(graph, ns),
        GraphFormat::RdfXml => to_rdfxml(graph, ns)?,
    })
}

/// Serialize and atomically replace `path`.
pub fn write_graph(path: &Path, graph: &Graph, ns: &Namespace, format: GraphFormat) -> Result<()> {
    let body = render(graph, ns, format)?;
    write_atomic(path, body.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::terms::{XSD_GYEAR, XSD_STRING};

    const BASE: &str = "http://localhost:5173/esolangs/";

    fn sample() -> Graph {
        let mut g = Graph::new();
        let foo = format!("{BASE}Foo");
        g.add(&foo, RDF_TYPE, Term::iri(format!("{BASE}EsotericLanguage")));
        g.add(&foo, format!("{BASE}yearCreated"), Term::typed("2001", XSD_GYEAR));
        g.add(&foo, format!("{BASE}alias"), Term::typed("say \"hi\"\n<&>", XSD_STRING));
        g.add(&foo, format!("{BASE}hasCategory"), Term::iri(format!("{BASE}category/Stack-based")));
        g.add(
            format!("{BASE}Paradigm"),
            crate::ontology::terms::RDFS_LABEL,
            Term::english("Paradigm"),
        );
        g
    }

    #[test]
    fn ntriples_lines() {
        let nt = to_ntriples(&sample());
        assert_eq!(nt.lines().count(), 5);
        assert!(nt.lines().all(|l| l.ends_with(" .")));
        assert!(nt.contains(&format!(
            "<{BASE}Foo> <{BASE}yearCreated> \"2001\"^^<http://www.w3.org/2001/XMLSchema#gYear> ."
        )));
        assert!(nt.contains("\"say \\\"hi\\\"\\n<&>\"^^"));
        assert!(nt.contains("\"Paradigm\"@en"));
    }

    #[test]
    fn turtle_uses_prefixes_where_possible() {
        let ttl = to_turtle(&sample(), &Namespace::new(BASE));
        assert!(ttl.starts_with("@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n"));
        assert!(ttl.contains(&format!("@prefix esolang: <{BASE}> .")));
        assert!(ttl.contains("\nesolang:Foo\n    "));
        assert!(ttl.contains("    a esolang:EsotericLanguage"));
        assert!(ttl.contains("esolang:yearCreated \"2001\"^^xsd:gYear"));
        // '/' is not allowed in a prefixed local name
        assert!(ttl.contains(&format!("<{BASE}category/Stack-based>")));
    }

    #[test]
    fn rdfxml_escapes_and_types() {
        let xml = to_rdfxml(&sample(), &Namespace::new(BASE)).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains(&format!("<rdf:Description rdf:about=\"{BASE}Foo\">")));
        assert!(xml.contains(&format!("<rdf:type rdf:resource=\"{BASE}EsotericLanguage\"/>")));
        assert!(xml.contains("&lt;&amp;&gt;"));
        assert!(xml.contains("xml:lang=\"en\""));
        assert!(xml.trim_end().ends_with("</rdf:RDF>"));
    }

    #[test]
    fn rdfxml_rejects_unqualifiable_predicates() {
        let mut g = Graph::new();
        g.add("http://x/a", "http://elsewhere/p", Term::iri("http://x/b"));
        assert!(matches!(
            to_rdfxml(&g, &Namespace::new(BASE)),
            Err(PipelineError::Serialize(_))
        ));
    }

    #[test]
    fn serialization_is_stable() {
        let ns = Namespace::new(BASE);
        for format in [GraphFormat::NTriples, GraphFormat::Turtle, GraphFormat::RdfXml] {
            assert_eq!(
                render(&sample(), &ns, format).unwrap(),
                render(&sample(), &ns, format).unwrap()
            );
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(GraphFormat::from_path(Path::new("a/b.ttl")), Some(GraphFormat::Turtle));
        assert_eq!(GraphFormat::from_path(Path::new("b.RDF")), Some(GraphFormat::RdfXml));
        assert_eq!(GraphFormat::from_path(Path::new("b.nt")), Some(GraphFormat::NTriples));
        assert_eq!(GraphFormat::from_path(Path::new("b.json")), None);
    }

    #[test]
    fn written_file_matches_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.nt");
        let ns = Namespace::new(BASE);
        write_graph(&path, &sample(), &ns, GraphFormat::NTriples).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), to_ntriples(&sample()));
    }
}
