//! Reverse bridge: re-derive raw facts from an annotated hierarchy.
//!
//! For every root under the rule's base path, and every object below it, the
//! selector fact is asserted again and, for `FromValue` name sources, the
//! object's Name is copied back onto the source predicate. Parent links become
//! `(parent, child_predicate, child)` facts when the rule names a single child
//! predicate or a default one.

use ahash::AHashSet;

use rdfbridge_graph::{Fact, FactGraph, Node, Vocabulary};

use crate::error::BridgeError;
use crate::paths::{children_of, roots_under_path};
use crate::report::RevertOutcome;
use crate::rule::{BridgeRule, NameSource};

struct Frame {
    node: Node,
    children: Vec<Node>,
    next: usize,
}

fn object_facts(graph: &FactGraph, vocab: &Vocabulary, rule: &BridgeRule, node: &Node) -> Vec<Fact> {
    let mut facts = vec![Fact::new(
        node.clone(),
        rule.selector.predicate.clone(),
        rule.selector.value.clone(),
    )];
    if let NameSource::FromValue(predicate) = &rule.name_source {
        match graph.first_object(node, &vocab.object_name) {
            Some(name) => facts.push(Fact::new(node.clone(), predicate.clone(), name.clone())),
            None => tracing::warn!(rule = %rule.id, resource = %node, "no name to revert"),
        }
    }
    facts
}

fn plan_revert(
    graph: &FactGraph,
    vocab: &Vocabulary,
    rule: &BridgeRule,
    roots: &[Node],
) -> Result<(Vec<Fact>, usize), BridgeError> {
    let child_predicate = rule.reverse_child_predicate();
    if child_predicate.is_none() && rule.child_rules.len() > 1 {
        tracing::warn!(
            rule = %rule.id,
            "several child rules and no default child predicate; children are not reverted"
        );
    }

    let mut facts = Vec::new();
    let mut visited: AHashSet<Node> = AHashSet::new();

    for root in roots {
        if !visited.insert(root.clone()) {
            continue;
        }
        facts.extend(object_facts(graph, vocab, rule, root));
        let Some(child_predicate) = child_predicate else {
            continue;
        };

        let mut on_chain: AHashSet<Node> = AHashSet::new();
        on_chain.insert(root.clone());
        let mut stack = vec![Frame {
            node: root.clone(),
            children: children_of(graph, vocab, root),
            next: 0,
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let Some(child) = frame.children.get(frame.next).cloned() else {
                on_chain.remove(&frame.node);
                stack.pop();
                continue;
            };
            frame.next += 1;
            let parent = frame.node.clone();

            if on_chain.contains(&child) {
                let mut chain: Vec<Node> = stack.iter().map(|f| f.node.clone()).collect();
                chain.push(child);
                return Err(BridgeError::CyclicHierarchy {
                    rule: rule.id.clone(),
                    chain,
                });
            }

            facts.push(Fact::new(parent, child_predicate.clone(), child.clone()));
            if !visited.insert(child.clone()) {
                continue;
            }
            facts.extend(object_facts(graph, vocab, rule, &child));
            on_chain.insert(child.clone());
            stack.push(Frame {
                children: children_of(graph, vocab, &child),
                node: child,
                next: 0,
            });
        }
    }

    Ok((facts, visited.len()))
}

/// Apply the reverse bridge of `rule`. Nothing is written when a cycle is found.
pub fn revert(
    graph: &mut FactGraph,
    vocab: &Vocabulary,
    rule: &BridgeRule,
) -> Result<RevertOutcome, BridgeError> {
    let roots = roots_under_path(graph, vocab, &rule.base_path);
    let (facts, objects) = plan_revert(graph, vocab, rule, &roots)?;

    let added = facts.into_iter().filter(|fact| graph.insert(fact.clone())).count();

    tracing::debug!(rule = %rule.id, roots = roots.len(), objects, added, "reverted bridge");
    Ok(RevertOutcome {
        rule: rule.id.clone(),
        roots,
        objects,
        added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfbridge_graph::{Literal, Term};

    fn ex(local: &str) -> Node {
        Node::iri(format!("http://example.org/{local}"))
    }

    fn object(g: &mut FactGraph, vocab: &Vocabulary, node: &str, name: &str, path: &str, parent: Option<&str>) {
        g.add(ex(node), vocab.rdf_type.clone(), vocab.hierarchy_object.clone());
        g.add(ex(node), vocab.object_name.clone(), Literal::string(name));
        g.add(ex(node), vocab.object_path.clone(), Literal::string(path));
        if let Some(parent) = parent {
            g.add(ex(node), vocab.parent_ref.clone(), ex(parent));
        }
    }

    fn concept_rule() -> BridgeRule {
        BridgeRule::builder("concepts", ex("hasType"), ex("Concept"))
            .name(NameSource::FromValue(ex("label")))
            .child(ex("narrower"), NameSource::FromValue(ex("label")))
            .base_path("/taxonomy")
            .build()
            .unwrap()
    }

    #[test]
    fn reasserts_selector_name_and_child_facts() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "animals", "Animals", "/taxonomy/Animals", None);
        object(&mut g, &vocab, "cats", "Cats", "/taxonomy/Animals/Cats", Some("animals"));
        object(&mut g, &vocab, "elsewhere", "Other", "/places/Other", None);

        let outcome = revert(&mut g, &vocab, &concept_rule()).unwrap();

        assert_eq!(outcome.roots, vec![ex("animals")]);
        assert_eq!(outcome.objects, 2);
        assert_eq!(outcome.added, 5);
        let concept = Term::Node(ex("Concept"));
        for node in [ex("animals"), ex("cats")] {
            assert!(g.contains(&Fact::new(node, ex("hasType"), concept.clone())));
        }
        assert_eq!(g.literal_value(&ex("cats"), &ex("label")), "Cats");
        assert!(g.contains(&Fact::new(ex("animals"), ex("narrower"), ex("cats"))));
        assert!(!g.has_match(Some(&ex("elsewhere")), Some(&ex("hasType")), None));
    }

    #[test]
    fn several_child_rules_need_a_default_predicate() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "p", "P", "/P", None);
        object(&mut g, &vocab, "c", "C", "/P/C", Some("p"));

        let rule = BridgeRule::builder("mixed", ex("hasType"), ex("Concept"))
            .child(ex("narrower"), NameSource::LocalName)
            .child(ex("related"), NameSource::LocalName)
            .build()
            .unwrap();
        let outcome = revert(&mut g.clone(), &vocab, &rule).unwrap();
        assert_eq!(outcome.objects, 1);

        let rule = BridgeRule {
            default_child_predicate: Some(ex("hasPart")),
            ..rule
        };
        revert(&mut g, &vocab, &rule).unwrap();
        assert!(g.contains(&Fact::new(ex("p"), ex("hasPart"), ex("c"))));
        assert!(!g.has_match(None, Some(&ex("label")), None));
    }

    #[test]
    fn cycles_are_rejected_before_writing() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "r", "R", "/taxonomy/R", None);
        object(&mut g, &vocab, "a", "A", "/taxonomy/R/A", Some("r"));
        object(&mut g, &vocab, "b", "B", "/taxonomy/R/A/B", Some("a"));
        g.add(ex("a"), vocab.parent_ref.clone(), ex("b"));
        let before = g.len();

        let err = revert(&mut g, &vocab, &concept_rule()).unwrap_err();
        assert!(matches!(err, BridgeError::CyclicHierarchy { .. }));
        assert_eq!(g.len(), before);
    }
}
