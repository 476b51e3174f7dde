//! Prefix table for CURIEs such as `skos:narrower`.
//!
//! Bridge configurations are written by people, so predicates are usually
//! given in prefixed form. Expansion is lenient: a string whose prefix is not
//! registered (including full IRIs like `http://...`) passes through unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("dc-elements", "http://purl.org/dc/elements/1.1/"),
    ("dc", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("dbp-ont", "http://dbpedia.org/ontology/"),
    ("dbp-prop", "http://dbpedia.org/property/"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    prefixes: BTreeMap<String, String>,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            prefixes: WELL_KNOWN_PREFIXES
                .iter()
                .map(|(p, ns)| (p.to_string(), ns.to_string()))
                .collect(),
        }
    }
}

impl Namespaces {
    /// Register (or replace) a prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// `skos:narrower` -> `http://www.w3.org/2004/02/skos/core#narrower`.
    pub fn expand(&self, curie: &str) -> String {
        let curie = curie.trim();
        if let Some((prefix, local)) = curie.split_once(':') {
            if !prefix.is_empty() {
                if let Some(ns) = self.prefixes.get(prefix) {
                    return format!("{ns}{local}");
                }
            }
        }
        curie.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_prefixes_and_passes_through_the_rest() {
        let ns = Namespaces::default();
        assert_eq!(
            ns.expand("skos:narrower"),
            "http://www.w3.org/2004/02/skos/core#narrower"
        );
        assert_eq!(
            ns.expand(" rdfs:label "),
            "http://www.w3.org/2000/01/rdf-schema#label"
        );
        assert_eq!(ns.expand("http://example.org/x"), "http://example.org/x");
        assert_eq!(ns.expand("nope:x"), "nope:x");
        assert_eq!(ns.expand("definition"), "definition");
    }

    #[test]
    fn custom_prefixes_extend_and_override_the_table() {
        let mut ns = Namespaces::default();
        ns.insert("ex", "http://example.org/");
        ns.insert("skos", "urn:skos:");
        assert_eq!(ns.expand("ex:Cat"), "http://example.org/Cat");
        assert_eq!(ns.expand("skos:narrower"), "urn:skos:narrower");
        assert_eq!(ns.expand("rdf:type"), "http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
    }
}
