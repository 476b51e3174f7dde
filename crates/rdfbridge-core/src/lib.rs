//! RDF bridge engine.
//!
//! Bridge rules pick raw resources out of a [`FactGraph`] and annotate them as
//! hierarchy objects: each gets a name, optionally a parent, links to shared
//! property-schema nodes and, once every rule has run, a `/`-delimited path.
//!
//! ## Module Organization
//!
//! - `rule`, `config`: bridge rules and their JSON form
//! - `matcher`, `annotate`, `disambiguate`, `intern`: the annotation pass
//! - `paths`: root finding and the Path post-pass
//! - `reverse`: raw facts back from an annotated hierarchy
//! - `engine`: runs an ordered rule list over one graph
//! - `report`, `error`: run reports and failures
//!
//! ```no_run
//! use rdfbridge_core::{BridgeEngine, BridgeRule, NameSource};
//! use rdfbridge_graph::{FactGraph, Literal, Node};
//!
//! let ex = |s: &str| Node::iri(format!("http://example.org/{s}"));
//! let mut graph = FactGraph::new();
//! graph.add(ex("r1"), ex("hasType"), ex("Concept"));
//! graph.add(ex("r1"), ex("label"), Literal::plain("Animals"));
//!
//! let rule = BridgeRule::builder("concepts", ex("hasType"), ex("Concept"))
//!     .name(NameSource::FromValue(ex("label")))
//!     .base_path("/taxonomy")
//!     .build()?;
//! let annotated = BridgeEngine::default().run(graph, &[rule])?;
//! assert_eq!(annotated.report.paths_assigned(), 1);
//! # Ok::<(), rdfbridge_core::BridgeError>(())
//! ```
//!
//! [`FactGraph`]: rdfbridge_graph::FactGraph

pub mod annotate;
pub mod config;
pub mod disambiguate;
pub mod engine;
pub mod error;
pub mod intern;
pub mod matcher;
pub mod paths;
pub mod report;
pub mod reverse;
pub mod rule;

pub use config::{BridgeSetConfig, EngineConfig};
pub use engine::{Annotated, BridgeEngine};
pub use error::{BridgeError, ConfigError};
pub use report::{PathOutcome, RevertOutcome, RuleOutcome, RunReport, Unresolved, UnresolvedKind};
pub use rule::{BridgeRule, NameSource};
