//! IRIs of the W3C vocabularies and local names of the esolang vocabulary.

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_GYEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

/// Prefixes used by the Turtle and RDF/XML writers; the base namespace is
/// bound to `esolang` separately.
pub const PREFIXES: [(&str, &str); 4] = [
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("owl", OWL_NS),
    ("xsd", XSD_NS),
];

pub const BASE_PREFIX: &str = "esolang";

// classes
pub const ESOTERIC_LANGUAGE: &str = "EsotericLanguage";
pub const CATEGORY: &str = "Category";
pub const PARADIGM: &str = "Paradigm";
pub const COMPUTATIONAL_CLASS: &str = "ComputationalClass";
pub const MEMORY_SYSTEM: &str = "MemorySystem";
pub const DIMENSION: &str = "Dimension";
pub const TYPE_SYSTEM: &str = "TypeSystem";
pub const DIALECT: &str = "Dialect";

// object properties
pub const HAS_CATEGORY: &str = "hasCategory";
pub const HAS_PARADIGM: &str = "hasParadigm";
pub const HAS_COMPUTATIONAL_CLASS: &str = "hasComputationalClass";
pub const HAS_MEMORY_SYSTEM: &str = "hasMemorySystem";
pub const HAS_DIMENSION: &str = "hasDimension";
pub const HAS_TYPE_SYSTEM: &str = "hasTypeSystem";
pub const HAS_DIALECT: &str = "hasDialect";
pub const INFLUENCED_BY: &str = "influencedBy";
pub const INFLUENCED: &str = "influenced";

// literal properties
pub const YEAR_CREATED: &str = "yearCreated";
pub const URL: &str = "url";
pub const DESIGNED_BY: &str = "designedBy";
pub const ALIAS: &str = "alias";
pub const SHORT_DESCRIPTION: &str = "shortDescription";
pub const REFERENCE_IMPLEMENTATION: &str = "referenceImplementation";
pub const FILE_EXTENSION: &str = "fileExtension";

/// Class a `has*` relation materializes its objects as.
pub fn derived_class(property: &str) -> Option<&str> {
    property.strip_prefix("has").filter(|c| !c.is_empty())
}
