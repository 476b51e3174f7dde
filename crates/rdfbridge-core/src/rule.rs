//! Bridge rules: which raw resources become hierarchy objects, and how they
//! are named, nested and described.

use serde::{Deserialize, Serialize};

use rdfbridge_graph::{FactGraph, Node, Term};

use crate::error::ConfigError;

/// Where a name comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameSource {
    /// A constant name.
    Fixed(String),
    /// The literal value of `(resource, predicate, _)`.
    FromValue(Node),
    /// The local name of the resource IRI.
    LocalName,
}

/// Resolve a name for `resource`. Never fails: `""` means unresolved.
pub fn resolve_name_source(source: &NameSource, resource: &Node, graph: &FactGraph) -> String {
    match source {
        NameSource::Fixed(name) => name.clone(),
        NameSource::FromValue(predicate) => graph.literal_value(resource, predicate),
        NameSource::LocalName => resource.local_name().to_string(),
    }
}

/// `(predicate, value)` picking candidate roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub predicate: Node,
    pub value: Term,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRule {
    pub predicate: Node,
    pub name_source: NameSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRule {
    pub predicate: Node,
    pub name_source: NameSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRule {
    /// Stable identifier; property-schema ids are derived from it.
    pub id: String,
    pub selector: Selector,
    pub name_source: NameSource,
    /// Keyed by predicate; order is the iteration order.
    pub child_rules: Vec<ChildRule>,
    /// Keyed by predicate; order is the iteration order.
    pub property_rules: Vec<PropertyRule>,
    pub base_path: String,
    /// Child predicate asserted by the reverse bridge when several child rules exist.
    pub default_child_predicate: Option<Node>,
}

impl BridgeRule {
    pub fn builder(
        id: impl Into<String>,
        selector_predicate: Node,
        selector_value: impl Into<Term>,
    ) -> BridgeRuleBuilder {
        BridgeRuleBuilder {
            rule: BridgeRule {
                id: id.into(),
                selector: Selector {
                    predicate: selector_predicate,
                    value: selector_value.into(),
                },
                name_source: NameSource::LocalName,
                child_rules: Vec::new(),
                property_rules: Vec::new(),
                base_path: "/".to_string(),
                default_child_predicate: None,
            },
        }
    }

    /// Predicate the reverse bridge uses to re-assert parent/child links.
    pub fn reverse_child_predicate(&self) -> Option<&Node> {
        match self.child_rules.as_slice() {
            [only] => Some(&only.predicate),
            _ => self.default_child_predicate.as_ref(),
        }
    }

    /// Reject duplicate child/property predicates and an empty id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                rule: self.id.clone(),
                field: "id",
            });
        }
        check_unique(
            &self.id,
            self.child_rules.iter().map(|c| &c.predicate),
            "children",
        )?;
        check_unique(
            &self.id,
            self.property_rules.iter().map(|p| &p.predicate),
            "properties",
        )
    }
}

fn check_unique<'a>(
    rule: &str,
    predicates: impl Iterator<Item = &'a Node>,
    section: &'static str,
) -> Result<(), ConfigError> {
    let mut seen = ahash::AHashSet::new();
    for predicate in predicates {
        if !seen.insert(predicate) {
            return Err(ConfigError::DuplicatePredicate {
                rule: rule.to_string(),
                predicate: predicate.clone(),
                section,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct BridgeRuleBuilder {
    rule: BridgeRule,
}

impl BridgeRuleBuilder {
    pub fn name(mut self, source: NameSource) -> Self {
        self.rule.name_source = source;
        self
    }

    pub fn child(mut self, predicate: Node, name_source: NameSource) -> Self {
        self.rule.child_rules.push(ChildRule {
            predicate,
            name_source,
        });
        self
    }

    pub fn property(mut self, predicate: Node, name_source: NameSource) -> Self {
        self.rule.property_rules.push(PropertyRule {
            predicate,
            name_source,
        });
        self
    }

    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.rule.base_path = path.into();
        self
    }

    pub fn default_child_predicate(mut self, predicate: Node) -> Self {
        self.rule.default_child_predicate = Some(predicate);
        self
    }

    pub fn build(self) -> Result<BridgeRule, ConfigError> {
        self.rule.validate()?;
        Ok(self.rule)
    }
}
