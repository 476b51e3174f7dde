//! Root finding and the Path post-pass.
//!
//! Paths are planned in full before any Path fact is written, so a cycle
//! found midway leaves the graph exactly as it was.

use ahash::{AHashMap, AHashSet};

use rdfbridge_graph::{FactGraph, Literal, Node, Term, Vocabulary};

use crate::error::BridgeError;
use crate::report::PathOutcome;

/// `base` and `segment` joined by exactly one `/`.
pub fn join_path(base: &str, segment: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{segment}")
    } else {
        format!("{base}/{segment}")
    }
}

pub fn is_hierarchy_object(graph: &FactGraph, vocab: &Vocabulary, node: &Node) -> bool {
    graph.has_match(
        Some(node),
        Some(&vocab.rdf_type),
        Some(&Term::Node(vocab.hierarchy_object.clone())),
    )
}

/// Resources whose Parent fact points at `parent`, in graph order.
pub(crate) fn children_of(graph: &FactGraph, vocab: &Vocabulary, parent: &Node) -> Vec<Node> {
    let object = Term::Node(parent.clone());
    let mut seen = AHashSet::new();
    graph
        .filter(None, Some(&vocab.parent_ref), Some(&object))
        .map(|fact| fact.subject.clone())
        .filter(|child| seen.insert(child.clone()))
        .collect()
}

fn name_of(graph: &FactGraph, vocab: &Vocabulary, node: &Node) -> String {
    graph.literal_value(node, &vocab.object_name)
}

fn has_path(graph: &FactGraph, vocab: &Vocabulary, node: &Node) -> bool {
    graph.has_match(Some(node), Some(&vocab.object_path), None)
}

/// Hierarchy objects among `candidates` without a Parent fact, deduplicated,
/// in order of first appearance.
pub fn roots(graph: &FactGraph, vocab: &Vocabulary, candidates: &[Node]) -> Vec<Node> {
    let mut seen = AHashSet::new();
    candidates
        .iter()
        .filter(|node| seen.insert(*node))
        .filter(|node| is_hierarchy_object(graph, vocab, node))
        .filter(|node| !graph.has_match(Some(*node), Some(&vocab.parent_ref), None))
        .cloned()
        .collect()
}

/// Roots whose Path is `join_path(base_path, Name)`, in graph order.
pub fn roots_under_path(graph: &FactGraph, vocab: &Vocabulary, base_path: &str) -> Vec<Node> {
    let marker = Term::Node(vocab.hierarchy_object.clone());
    let candidates: Vec<Node> = graph
        .filter(None, Some(&vocab.rdf_type), Some(&marker))
        .map(|fact| fact.subject.clone())
        .collect();

    roots(graph, vocab, &candidates)
        .into_iter()
        .filter(|root| {
            let expected = join_path(base_path, &name_of(graph, vocab, root));
            graph.literal_value(root, &vocab.object_path) == expected
        })
        .collect()
}

struct Frame {
    node: Node,
    path: String,
    children: Vec<Node>,
    next: usize,
}

#[derive(Default)]
struct PathPlan {
    order: Vec<(Node, String)>,
    planned: AHashSet<Node>,
    skipped: Vec<Node>,
}

impl PathPlan {
    fn schedule(&mut self, node: Node, path: String) {
        self.planned.insert(node.clone());
        self.order.push((node, path));
    }

    /// `true` when `node` already has a Path, here or in the graph.
    fn is_settled(&self, graph: &FactGraph, vocab: &Vocabulary, node: &Node) -> bool {
        self.planned.contains(node) || has_path(graph, vocab, node)
    }
}

fn plan_paths(
    graph: &FactGraph,
    vocab: &Vocabulary,
    rule_id: &str,
    base_path: &str,
    roots: &[Node],
) -> Result<PathPlan, BridgeError> {
    let mut plan = PathPlan::default();

    for root in roots {
        if plan.is_settled(graph, vocab, root) {
            tracing::warn!(rule = %rule_id, resource = %root, "root already has a path; keeping it");
            plan.skipped.push(root.clone());
            continue;
        }

        let root_path = join_path(base_path, &name_of(graph, vocab, root));
        plan.schedule(root.clone(), root_path.clone());

        let mut on_chain: AHashSet<Node> = AHashSet::new();
        on_chain.insert(root.clone());
        let mut stack = vec![Frame {
            node: root.clone(),
            path: root_path,
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
            let parent_path = frame.path.clone();

            if on_chain.contains(&child) {
                let mut chain: Vec<Node> = stack.iter().map(|f| f.node.clone()).collect();
                chain.push(child);
                return Err(BridgeError::CyclicHierarchy {
                    rule: rule_id.to_string(),
                    chain,
                });
            }

            if plan.is_settled(graph, vocab, &child) {
                tracing::warn!(
                    rule = %rule_id,
                    resource = %child,
                    "object reached twice; keeping its first path"
                );
                plan.skipped.push(child);
                continue;
            }

            let child_path = join_path(&parent_path, &name_of(graph, vocab, &child));
            plan.schedule(child.clone(), child_path.clone());
            on_chain.insert(child.clone());
            stack.push(Frame {
                children: children_of(graph, vocab, &child),
                node: child,
                path: child_path,
                next: 0,
            });
        }
    }

    Ok(plan)
}

/// A Parent chain from `start` that loops back on itself, if any.
fn detached_cycle(graph: &FactGraph, vocab: &Vocabulary, start: &Node) -> Option<Vec<Node>> {
    let mut chain = vec![start.clone()];
    let mut index: AHashMap<Node, usize> = AHashMap::new();
    index.insert(start.clone(), 0);

    let mut current = start.clone();
    while let Some(parent) = graph.node_value(&current, &vocab.parent_ref) {
        if let Some(&at) = index.get(parent) {
            let mut cycle = chain.split_off(at);
            cycle.push(parent.clone());
            return Some(cycle);
        }
        index.insert(parent.clone(), chain.len());
        chain.push(parent.clone());
        current = parent.clone();
    }
    None
}

/// Stamp Paths below the roots among `candidates`.
///
/// Fails with [`BridgeError::CyclicHierarchy`] without writing anything when a
/// Parent chain reachable from `candidates` loops.
pub fn assign_paths(
    graph: &mut FactGraph,
    vocab: &Vocabulary,
    rule_id: &str,
    base_path: &str,
    candidates: &[Node],
) -> Result<PathOutcome, BridgeError> {
    let roots = roots(graph, vocab, candidates);
    let plan = plan_paths(graph, vocab, rule_id, base_path, &roots)?;

    for candidate in candidates {
        if plan.is_settled(graph, vocab, candidate) {
            continue;
        }
        if let Some(chain) = detached_cycle(graph, vocab, candidate) {
            return Err(BridgeError::CyclicHierarchy {
                rule: rule_id.to_string(),
                chain,
            });
        }
    }

    let assigned = plan.order.len();
    for (node, path) in plan.order {
        graph.add(node, vocab.object_path.clone(), Literal::string(path));
    }

    tracing::debug!(
        rule = %rule_id,
        roots = roots.len(),
        assigned,
        skipped = plan.skipped.len(),
        "assigned paths"
    );

    Ok(PathOutcome {
        rule: rule_id.to_string(),
        roots,
        assigned,
        skipped: plan.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(local: &str) -> Node {
        Node::iri(format!("http://example.org/{local}"))
    }

    fn object(g: &mut FactGraph, vocab: &Vocabulary, node: &str, name: &str, parent: Option<&str>) {
        g.add(ex(node), vocab.rdf_type.clone(), vocab.hierarchy_object.clone());
        g.add(ex(node), vocab.object_name.clone(), Literal::string(name));
        if let Some(parent) = parent {
            g.add(ex(node), vocab.parent_ref.clone(), ex(parent));
        }
    }

    fn path(g: &FactGraph, vocab: &Vocabulary, node: &str) -> String {
        g.literal_value(&ex(node), &vocab.object_path)
    }

    #[test]
    fn join_path_inserts_a_single_separator() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/taxonomy", "a"), "/taxonomy/a");
        assert_eq!(join_path("/taxonomy/", "a"), "/taxonomy/a");
    }

    #[test]
    fn roots_are_unparented_hierarchy_objects_in_first_seen_order() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "b", "B", None);
        object(&mut g, &vocab, "a", "A", None);
        object(&mut g, &vocab, "c", "C", Some("a"));
        g.add(ex("plain"), ex("label"), Literal::plain("not annotated"));

        let candidates = [ex("a"), ex("plain"), ex("c"), ex("b"), ex("a")];
        assert_eq!(roots(&g, &vocab, &candidates), vec![ex("a"), ex("b")]);
    }

    #[test]
    fn paths_follow_names_down_the_tree() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "animals", "Animals", None);
        object(&mut g, &vocab, "cats", "Cats", Some("animals"));
        object(&mut g, &vocab, "lions", "Lions", Some("cats"));
        object(&mut g, &vocab, "dogs", "Dogs", Some("animals"));

        let outcome =
            assign_paths(&mut g, &vocab, "concepts", "/taxonomy", &[ex("animals")]).unwrap();

        assert_eq!(outcome.assigned, 4);
        assert_eq!(path(&g, &vocab, "animals"), "/taxonomy/Animals");
        assert_eq!(path(&g, &vocab, "cats"), "/taxonomy/Animals/Cats");
        assert_eq!(path(&g, &vocab, "lions"), "/taxonomy/Animals/Cats/Lions");
        assert_eq!(path(&g, &vocab, "dogs"), "/taxonomy/Animals/Dogs");
    }

    #[test]
    fn a_second_parent_does_not_produce_a_second_path() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "r", "R", None);
        object(&mut g, &vocab, "a", "A", Some("r"));
        object(&mut g, &vocab, "b", "B", Some("r"));
        object(&mut g, &vocab, "shared", "S", Some("a"));
        g.add(ex("shared"), vocab.parent_ref.clone(), ex("b"));

        let outcome = assign_paths(&mut g, &vocab, "concepts", "/", &[ex("r")]).unwrap();

        assert_eq!(outcome.skipped, vec![ex("shared")]);
        let paths = g.filter(Some(&ex("shared")), Some(&vocab.object_path), None).count();
        assert_eq!(paths, 1);
        assert_eq!(path(&g, &vocab, "shared"), "/R/A/S");
    }

    #[test]
    fn reachable_cycle_fails_without_writing_paths() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "r", "R", None);
        object(&mut g, &vocab, "a", "A", Some("r"));
        object(&mut g, &vocab, "b", "B", Some("a"));
        g.add(ex("a"), vocab.parent_ref.clone(), ex("b"));
        let before = g.len();

        let err = assign_paths(&mut g, &vocab, "concepts", "/", &[ex("r")]).unwrap_err();
        match err {
            BridgeError::CyclicHierarchy { rule, chain } => {
                assert_eq!(rule, "concepts");
                assert_eq!(chain, vec![ex("r"), ex("a"), ex("b"), ex("a")]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(g.len(), before);
    }

    #[test]
    fn detached_cycle_is_reported() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "a", "A", Some("b"));
        object(&mut g, &vocab, "b", "B", Some("a"));

        let err = assign_paths(&mut g, &vocab, "concepts", "/", &[ex("a")]).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::CyclicHierarchy { ref chain, .. } if chain == &vec![ex("a"), ex("b"), ex("a")]
        ));
    }

    #[test]
    fn rerunning_keeps_existing_paths() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "r", "R", None);
        object(&mut g, &vocab, "c", "C", Some("r"));

        assign_paths(&mut g, &vocab, "concepts", "/base", &[ex("r")]).unwrap();
        let before = g.len();
        let again = assign_paths(&mut g, &vocab, "concepts", "/other", &[ex("r")]).unwrap();

        assert_eq!(again.assigned, 0);
        assert_eq!(again.skipped, vec![ex("r")]);
        assert_eq!(g.len(), before);
        assert_eq!(path(&g, &vocab, "c"), "/base/R/C");
    }

    #[test]
    fn roots_under_path_matches_the_base() {
        let vocab = Vocabulary::default();
        let mut g = FactGraph::new();
        object(&mut g, &vocab, "r1", "One", None);
        object(&mut g, &vocab, "r2", "Two", None);
        object(&mut g, &vocab, "c", "C", Some("r1"));
        assign_paths(&mut g, &vocab, "a", "/taxonomy", &[ex("r1"), ex("c")]).unwrap();
        assign_paths(&mut g, &vocab, "b", "/places", &[ex("r2")]).unwrap();

        assert_eq!(roots_under_path(&g, &vocab, "/taxonomy"), vec![ex("r1")]);
        assert_eq!(roots_under_path(&g, &vocab, "/places/"), vec![ex("r2")]);
        assert!(roots_under_path(&g, &vocab, "/nowhere").is_empty());
    }
}
