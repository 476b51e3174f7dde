//! The fixed annotation vocabulary the bridge engine reads and writes.
//!
//! Downstream repository mappers walk exactly these predicates, so the IRIs
//! are a contract. The base IRI can be swapped per deployment; the local
//! names cannot.

use serde::{Deserialize, Serialize};

use crate::term::Node;

pub const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const DEFAULT_VOCABULARY_BASE: &str = "http://rdfbridge.org/ns/hierarchy#";

pub const HIERARCHY_OBJECT: &str = "HierarchyObject";
pub const OBJECT_NAME: &str = "objectName";
pub const OBJECT_PATH: &str = "objectPath";
pub const OBJECT_PARENT_REF: &str = "parentRef";
pub const HAS_PROPERTY: &str = "hasProperty";
pub const PROPERTY_NAME: &str = "propertyName";
pub const PROPERTY_SOURCE_PREDICATE: &str = "propertySourcePredicate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub base: String,
    /// `rdf:type`, the predicate of the marker fact.
    pub rdf_type: Node,
    /// Class carried by every hierarchy object (`(s, rdf:type, hierarchy_object)`).
    pub hierarchy_object: Node,
    pub object_name: Node,
    pub object_path: Node,
    pub parent_ref: Node,
    pub has_property: Node,
    pub property_name: Node,
    pub property_source_predicate: Node,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::with_base(DEFAULT_VOCABULARY_BASE)
    }
}

impl Vocabulary {
    pub fn with_base(base: &str) -> Self {
        let term = |local: &str| Node::iri(format!("{base}{local}"));
        Self {
            base: base.to_string(),
            rdf_type: Node::iri(RDF_TYPE_IRI),
            hierarchy_object: term(HIERARCHY_OBJECT),
            object_name: term(OBJECT_NAME),
            object_path: term(OBJECT_PATH),
            parent_ref: term(OBJECT_PARENT_REF),
            has_property: term(HAS_PROPERTY),
            property_name: term(PROPERTY_NAME),
            property_source_predicate: term(PROPERTY_SOURCE_PREDICATE),
        }
    }

    /// Every predicate or class the engine writes. Useful for telling raw
    /// facts apart from annotations.
    pub fn annotation_terms(&self) -> [&Node; 7] {
        [
            &self.hierarchy_object,
            &self.object_name,
            &self.object_path,
            &self.parent_ref,
            &self.has_property,
            &self.property_name,
            &self.property_source_predicate,
        ]
    }
}
