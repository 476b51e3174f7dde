//! Annotation of raw facts with hierarchy-object facts for one bridge rule.
//!
//! For every selected subject the annotator adds:
//!
//! - the marker fact and, unless one exists, a name fact
//! - marker, parent and (overwritten) name facts for each declared child
//! - a `has-property` link to an interned property-schema node per property rule
//!
//! A child's name always replaces a name the resource already carries: its
//! role as a declared child wins over a provisional root name, whichever
//! bridge ran first. Only the Path post-pass (see `paths`) writes paths.

use ahash::AHashSet;

use rdfbridge_graph::{FactGraph, Literal, Node, Term, Vocabulary};

use crate::disambiguate::SiblingNames;
use crate::intern::intern_property_id;
use crate::matcher::select;
use crate::report::{RuleOutcome, UnresolvedKind};
use crate::rule::{resolve_name_source, BridgeRule};

pub struct Annotator<'a> {
    vocab: &'a Vocabulary,
    property_namespace: &'a str,
}

impl<'a> Annotator<'a> {
    pub fn new(vocab: &'a Vocabulary, property_namespace: &'a str) -> Self {
        Self {
            vocab,
            property_namespace,
        }
    }

    pub fn annotate(&self, graph: &mut FactGraph, rule: &BridgeRule) -> RuleOutcome {
        let mut outcome = RuleOutcome::new(&rule.id);
        let mut seen: AHashSet<Node> = AHashSet::new();

        for subject in select(graph, &rule.selector) {
            let name = resolve_name_source(&rule.name_source, &subject, graph);
            if name.is_empty() {
                outcome.report(subject, UnresolvedKind::Root);
                continue;
            }

            self.mark(graph, &subject);
            if !graph.has_match(Some(&subject), Some(&self.vocab.object_name), None) {
                graph.add(
                    subject.clone(),
                    self.vocab.object_name.clone(),
                    Literal::string(name),
                );
            }

            self.process_children(graph, rule, &subject, &mut outcome);
            self.process_properties(graph, rule, &subject, &mut outcome);

            if seen.insert(subject.clone()) {
                outcome.processed.push(subject);
            }
        }

        tracing::debug!(
            rule = %rule.id,
            processed = outcome.processed.len(),
            unresolved = outcome.unresolved.len(),
            "annotated bridge"
        );
        outcome
    }

    fn mark(&self, graph: &mut FactGraph, resource: &Node) {
        graph.add(
            resource.clone(),
            self.vocab.rdf_type.clone(),
            self.vocab.hierarchy_object.clone(),
        );
    }

    fn process_children(
        &self,
        graph: &mut FactGraph,
        rule: &BridgeRule,
        parent: &Node,
        outcome: &mut RuleOutcome,
    ) {
        for child_rule in &rule.child_rules {
            let mut siblings = SiblingNames::new();

            let objects: Vec<Term> = graph
                .filter(Some(parent), Some(&child_rule.predicate), None)
                .map(|fact| fact.object.clone())
                .collect();

            for object in objects {
                let child = match object {
                    Term::Node(child) => child,
                    Term::Literal(value) => {
                        tracing::warn!(
                            rule = %rule.id,
                            parent = %parent,
                            predicate = %child_rule.predicate,
                            value = %value,
                            "child relation points at a literal; skipping"
                        );
                        continue;
                    }
                };

                let child_name = resolve_name_source(&child_rule.name_source, &child, graph);
                if child_name.is_empty() {
                    outcome.report(
                        child,
                        UnresolvedKind::Child {
                            parent: parent.clone(),
                            predicate: child_rule.predicate.clone(),
                        },
                    );
                    continue;
                }

                graph.remove_matching(Some(&child), Some(&self.vocab.object_name), None);
                self.mark(graph, &child);
                graph.add(
                    child.clone(),
                    self.vocab.parent_ref.clone(),
                    parent.clone(),
                );
                let unique = siblings.claim(&child_name);
                graph.add(child, self.vocab.object_name.clone(), Literal::string(unique));
            }
        }
    }

    fn process_properties(
        &self,
        graph: &mut FactGraph,
        rule: &BridgeRule,
        subject: &Node,
        outcome: &mut RuleOutcome,
    ) {
        let mut written: AHashSet<Node> = AHashSet::new();

        for property in &rule.property_rules {
            let property_name = resolve_name_source(&property.name_source, subject, graph);
            if property_name.is_empty() {
                outcome.report(
                    subject.clone(),
                    UnresolvedKind::Property {
                        predicate: property.predicate.clone(),
                    },
                );
                continue;
            }

            let schema = intern_property_id(&property_name, &rule.id, self.property_namespace);
            if written.insert(schema.clone()) {
                graph.add(
                    schema.clone(),
                    self.vocab.property_name.clone(),
                    Literal::string(property_name),
                );
                graph.add(
                    schema.clone(),
                    self.vocab.property_source_predicate.clone(),
                    property.predicate.clone(),
                );
            }
            graph.add(subject.clone(), self.vocab.has_property.clone(), schema);
        }
    }
}
