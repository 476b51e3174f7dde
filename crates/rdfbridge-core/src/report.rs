//! What a bridge run did, and what it had to skip.

use serde::Serialize;

use rdfbridge_graph::Node;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UnresolvedKind {
    /// A selected candidate root without a name.
    Root,
    /// A declared child without a name.
    Child { parent: Node, predicate: Node },
    /// A property rule whose name could not be resolved on the subject.
    Property { predicate: Node },
}

/// An entity skipped because its name resolved to `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub rule: String,
    pub resource: Node,
    pub kind: UnresolvedKind,
}

impl Unresolved {
    pub(crate) fn warn(&self) {
        match &self.kind {
            UnresolvedKind::Root => tracing::warn!(
                rule = %self.rule,
                resource = %self.resource,
                "failed to obtain a name for candidate object"
            ),
            UnresolvedKind::Child { parent, predicate } => tracing::warn!(
                rule = %self.rule,
                resource = %self.resource,
                parent = %parent,
                predicate = %predicate,
                "failed to obtain a name for child"
            ),
            UnresolvedKind::Property { predicate } => tracing::warn!(
                rule = %self.rule,
                resource = %self.resource,
                predicate = %predicate,
                "failed to obtain a name for property"
            ),
        }
    }
}

/// Annotation result of one bridge rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule: String,
    /// Subjects tagged as hierarchy objects by the selector, first-seen order.
    pub processed: Vec<Node>,
    pub unresolved: Vec<Unresolved>,
}

impl RuleOutcome {
    pub fn new(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn report(&mut self, resource: Node, kind: UnresolvedKind) {
        let entry = Unresolved {
            rule: self.rule.clone(),
            resource,
            kind,
        };
        entry.warn();
        self.unresolved.push(entry);
    }
}

/// Path post-pass result for one bridge rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathOutcome {
    pub rule: String,
    pub roots: Vec<Node>,
    pub assigned: usize,
    /// Objects reached again (second parent, second bridge, earlier run) that kept their path.
    pub skipped: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<RuleOutcome>,
    pub paths: Vec<PathOutcome>,
}

impl RunReport {
    pub fn unresolved(&self) -> impl Iterator<Item = &Unresolved> + '_ {
        self.outcomes.iter().flat_map(|o| o.unresolved.iter())
    }

    pub fn paths_assigned(&self) -> usize {
        self.paths.iter().map(|p| p.assigned).sum()
    }
}

/// Reverse-bridge result for one bridge rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevertOutcome {
    pub rule: String,
    pub roots: Vec<Node>,
    /// Hierarchy objects given raw facts again, roots included.
    pub objects: usize,
    /// Facts that were not already in the graph.
    pub added: usize,
}
