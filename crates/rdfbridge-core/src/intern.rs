//! Property-schema node identifiers.
//!
//! A schema node is shared by every subject a bridge assigns the same
//! property name to. Its identifier is a pure function of
//! `(property name, rule id)`, so separate runs and separate graphs agree on it
//! without any shared table.

use rdfbridge_graph::digest::{fnv1a64_digest_fields, DIGEST_V1_PREFIX};
use rdfbridge_graph::Node;

pub fn sanitize_id_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        "_".to_string()
    } else {
        out
    }
}

/// `<namespace><sanitized name>-<fnv1a64 hex>`
pub fn intern_property_id(name: &str, rule_id: &str, namespace: &str) -> Node {
    let digest = fnv1a64_digest_fields(&[("rule", rule_id), ("name", name)]);
    let hex = digest.strip_prefix(DIGEST_V1_PREFIX).unwrap_or(&digest);
    Node::iri(format!("{namespace}{}-{hex}", sanitize_id_component(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:rdfbridge:property:";

    #[test]
    fn identity_depends_only_on_name_and_rule() {
        let a = intern_property_id("definition", "concepts", NS);
        let b = intern_property_id("definition", "concepts", NS);
        assert_eq!(a, b);
        assert_ne!(a, intern_property_id("definition", "places", NS));
        assert_ne!(a, intern_property_id("comment", "concepts", NS));
    }

    #[test]
    fn sanitized_names_do_not_collide() {
        // Both sanitize to "a_b" but the digest covers the raw name.
        let a = intern_property_id("a b", "r", NS);
        let b = intern_property_id("a/b", "r", NS);
        assert_ne!(a, b);
        let iri = a.as_iri().unwrap_or_default();
        assert!(iri.starts_with("urn:rdfbridge:property:a_b-"));
        assert_eq!(iri.len(), NS.len() + "a_b-".len() + 16);
    }
}
