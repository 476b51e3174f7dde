//! Fact graph for the RDF bridge.
//!
//! This crate holds the data the bridge engine rewrites:
//!
//! - `term`: resources, literals and facts
//! - `store`: the indexed, insertion-ordered `FactGraph`
//! - `vocab`: the annotation predicates written by the engine
//! - `namespace`: CURIE expansion for configured predicates
//! - `digest`: stable content digests for generated identifiers
//!
//! Parsing and serializing RDF documents happens upstream; facts arrive here
//! already extracted.

pub mod digest;
pub mod namespace;
pub mod store;
pub mod term;
pub mod vocab;

pub use namespace::Namespaces;
pub use store::FactGraph;
pub use term::{Fact, Literal, Node, Term};
pub use vocab::Vocabulary;
