use rdfbridge_graph::{FactGraph, Node};

use crate::rule::Selector;

/// Subjects of every `(s, selector.predicate, selector.value)` fact, in graph order.
///
/// The result is a snapshot; annotating the graph afterwards does not change it.
pub fn select(graph: &FactGraph, selector: &Selector) -> Vec<Node> {
    graph
        .filter(None, Some(&selector.predicate), Some(&selector.value))
        .map(|fact| fact.subject.clone())
        .collect()
}
