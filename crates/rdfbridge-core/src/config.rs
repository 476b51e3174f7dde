//! JSON configuration for the engine and its bridge rules.
//!
//! ```json
//! {
//!   "engine": { "vocabulary_base": "http://rdfbridge.org/ns/hierarchy#" },
//!   "prefixes": { "ex": "http://example.org/" },
//!   "bridges": [
//!     {
//!       "id": "concepts",
//!       "selector": { "predicate": "rdf:type", "value": "skos:Concept" },
//!       "name": { "from_value": "rdfs:label" },
//!       "children": [ { "predicate": "skos:narrower", "name": { "from_value": "rdfs:label" } } ],
//!       "properties": [ { "predicate": "skos:definition", "name": { "fixed": "definition" } } ],
//!       "base_path": "/taxonomy"
//!     }
//!   ]
//! }
//! ```
//!
//! Predicates and selector values may be CURIEs or full IRIs.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use rdfbridge_graph::vocab::DEFAULT_VOCABULARY_BASE;
use rdfbridge_graph::{Namespaces, Node, Vocabulary};

use crate::error::ConfigError;
use crate::rule::{BridgeRule, ChildRule, NameSource, PropertyRule, Selector};

pub const DEFAULT_PROPERTY_NAMESPACE: &str = "urn:rdfbridge:property:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base IRI of the annotation vocabulary.
    pub vocabulary_base: String,
    /// IRI prefix of generated property-schema nodes.
    pub property_namespace: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vocabulary_base: DEFAULT_VOCABULARY_BASE.to_string(),
            property_namespace: DEFAULT_PROPERTY_NAMESPACE.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::with_base(&self.vocabulary_base)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSourceConfig {
    Fixed(String),
    FromValue(String),
    #[default]
    LocalName,
}

impl NameSourceConfig {
    fn resolve(&self, namespaces: &Namespaces) -> NameSource {
        match self {
            NameSourceConfig::Fixed(name) => NameSource::Fixed(name.clone()),
            NameSourceConfig::FromValue(curie) => {
                NameSource::FromValue(Node::iri(namespaces.expand(curie)))
            }
            NameSourceConfig::LocalName => NameSource::LocalName,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub predicate: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationConfig {
    pub predicate: String,
    #[serde(default)]
    pub name: NameSourceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRuleConfig {
    pub id: String,
    pub selector: SelectorConfig,
    #[serde(default)]
    pub name: NameSourceConfig,
    #[serde(default)]
    pub children: Vec<RelationConfig>,
    #[serde(default)]
    pub properties: Vec<RelationConfig>,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default)]
    pub default_child_predicate: Option<String>,
}

fn default_base_path() -> String {
    "/".to_string()
}

impl BridgeRuleConfig {
    pub fn to_rule(&self, namespaces: &Namespaces) -> Result<BridgeRule, ConfigError> {
        let required = |value: &str, field: &'static str| -> Result<Node, ConfigError> {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    rule: self.id.clone(),
                    field,
                });
            }
            Ok(Node::iri(namespaces.expand(value)))
        };

        let selector = Selector {
            predicate: required(&self.selector.predicate, "selector.predicate")?,
            value: required(&self.selector.value, "selector.value")?.into(),
        };

        let child_rules = self
            .children
            .iter()
            .map(|c| -> Result<ChildRule, ConfigError> {
                Ok(ChildRule {
                    predicate: required(&c.predicate, "children.predicate")?,
                    name_source: c.name.resolve(namespaces),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let property_rules = self
            .properties
            .iter()
            .map(|p| -> Result<PropertyRule, ConfigError> {
                Ok(PropertyRule {
                    predicate: required(&p.predicate, "properties.predicate")?,
                    name_source: p.name.resolve(namespaces),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let default_child_predicate = self
            .default_child_predicate
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| Node::iri(namespaces.expand(p)));

        let rule = BridgeRule {
            id: self.id.clone(),
            selector,
            name_source: self.name.resolve(namespaces),
            child_rules,
            property_rules,
            base_path: self.base_path.clone(),
            default_child_predicate,
        };
        rule.validate()?;
        Ok(rule)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSetConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Extra CURIE prefixes on top of the well-known table.
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub bridges: Vec<BridgeRuleConfig>,
}

impl BridgeSetConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn namespaces(&self) -> Namespaces {
        let mut namespaces = Namespaces::default();
        for (prefix, ns) in &self.prefixes {
            namespaces.insert(prefix.clone(), ns.clone());
        }
        namespaces
    }

    /// Rules in configuration order, which is also the order they run in.
    pub fn rules(&self) -> Result<Vec<BridgeRule>, ConfigError> {
        let namespaces = self.namespaces();
        let mut ids = AHashSet::new();
        let mut out = Vec::with_capacity(self.bridges.len());
        for bridge in &self.bridges {
            if !ids.insert(bridge.id.as_str()) {
                return Err(ConfigError::DuplicateRuleId(bridge.id.clone()));
            }
            out.push(bridge.to_rule(&namespaces)?);
        }
        Ok(out)
    }
}
