//! `FactGraph`: a set of facts with per-position indexes.
//!
//! Every fact lives in a numbered slot. Slots are handed out in insertion
//! order and never reused, so a slot bitmap iterates facts in the order they
//! were added. Pattern queries intersect the bitmaps of the bound positions:
//!
//! - `subject   -> {slots}`
//! - `predicate -> {slots}`
//! - `object    -> {slots}`
//!
//! With no position bound, the query walks the bitmap of live slots.

use ahash::AHashMap;
use roaring::RoaringBitmap;
use std::hash::Hash;

use crate::term::{Fact, Node, Term};

#[derive(Debug, Default, Clone)]
pub struct FactGraph {
    slots: Vec<Option<Fact>>,
    lookup: AHashMap<Fact, u32>,
    live: RoaringBitmap,
    by_subject: AHashMap<Node, RoaringBitmap>,
    by_predicate: AHashMap<Node, RoaringBitmap>,
    by_object: AHashMap<Term, RoaringBitmap>,
}

impl FactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn contains(&self, fact: &Fact) -> bool {
        self.lookup.contains_key(fact)
    }

    /// Add a fact. Returns `false` when the fact was already present.
    pub fn insert(&mut self, fact: Fact) -> bool {
        if self.lookup.contains_key(&fact) {
            return false;
        }

        let slot = self.slots.len() as u32;
        self.by_subject
            .entry(fact.subject.clone())
            .or_insert_with(RoaringBitmap::new)
            .insert(slot);
        self.by_predicate
            .entry(fact.predicate.clone())
            .or_insert_with(RoaringBitmap::new)
            .insert(slot);
        self.by_object
            .entry(fact.object.clone())
            .or_insert_with(RoaringBitmap::new)
            .insert(slot);
        self.live.insert(slot);
        self.lookup.insert(fact.clone(), slot);
        self.slots.push(Some(fact));
        true
    }

    pub fn add(&mut self, subject: Node, predicate: Node, object: impl Into<Term>) -> bool {
        self.insert(Fact::new(subject, predicate, object))
    }

    /// Remove a fact. Returns `false` when it was not present.
    pub fn remove(&mut self, fact: &Fact) -> bool {
        let Some(slot) = self.lookup.remove(fact) else {
            return false;
        };
        if let Some(entry) = self.slots.get_mut(slot as usize) {
            *entry = None;
        }
        self.live.remove(slot);
        unindex(&mut self.by_subject, &fact.subject, slot);
        unindex(&mut self.by_predicate, &fact.predicate, slot);
        unindex(&mut self.by_object, &fact.object, slot);
        true
    }

    /// Remove every fact matching the pattern and return how many went.
    pub fn remove_matching(
        &mut self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Term>,
    ) -> usize {
        let doomed: Vec<Fact> = self.filter(subject, predicate, object).cloned().collect();
        for fact in &doomed {
            self.remove(fact);
        }
        doomed.len()
    }

    /// All facts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Pattern query; `None` is a wildcard. Matches come back in insertion order.
    pub fn filter(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Term>,
    ) -> impl Iterator<Item = &Fact> + '_ {
        let slots = self.matching_slots(subject, predicate, object);
        slots
            .into_iter()
            .filter_map(move |slot| self.slots.get(slot as usize).and_then(Option::as_ref))
    }

    pub fn has_match(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Term>,
    ) -> bool {
        self.filter(subject, predicate, object).next().is_some()
    }

    /// Object of the first `(subject, predicate, _)` fact.
    pub fn first_object(&self, subject: &Node, predicate: &Node) -> Option<&Term> {
        self.filter(Some(subject), Some(predicate), None)
            .next()
            .map(|fact| &fact.object)
    }

    /// Lexical form of the first `(subject, predicate, _)` object.
    ///
    /// Absent values and non-literal values both come back as `""`.
    pub fn literal_value(&self, subject: &Node, predicate: &Node) -> String {
        match self.first_object(subject, predicate) {
            Some(Term::Literal(lit)) => lit.lexical.clone(),
            Some(Term::Node(node)) => {
                tracing::warn!(
                    subject = %subject,
                    predicate = %predicate,
                    value = %node,
                    "expected a literal value, found a resource"
                );
                String::new()
            }
            None => {
                tracing::trace!(subject = %subject, predicate = %predicate, "no value");
                String::new()
            }
        }
    }

    /// Resource object of the first `(subject, predicate, _)` fact, if it is one.
    pub fn node_value(&self, subject: &Node, predicate: &Node) -> Option<&Node> {
        self.first_object(subject, predicate).and_then(Term::as_node)
    }

    fn matching_slots(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Term>,
    ) -> RoaringBitmap {
        let bound = [
            subject.map(|s| self.by_subject.get(s)),
            predicate.map(|p| self.by_predicate.get(p)),
            object.map(|o| self.by_object.get(o)),
        ];

        let mut acc: Option<RoaringBitmap> = None;
        for bitmap in bound.into_iter().flatten() {
            let Some(bitmap) = bitmap else {
                return RoaringBitmap::new();
            };
            acc = Some(match acc {
                None => bitmap.clone(),
                Some(prev) => prev & bitmap,
            });
        }
        acc.unwrap_or_else(|| self.live.clone())
    }
}

fn unindex<K: Hash + Eq>(index: &mut AHashMap<K, RoaringBitmap>, key: &K, slot: u32) {
    if let Some(bitmap) = index.get_mut(key) {
        bitmap.remove(slot);
        if bitmap.is_empty() {
            index.remove(key);
        }
    }
}

impl Extend<Fact> for FactGraph {
    fn extend<I: IntoIterator<Item = Fact>>(&mut self, iter: I) {
        for fact in iter {
            self.insert(fact);
        }
    }
}

impl FromIterator<Fact> for FactGraph {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut graph = FactGraph::new();
        graph.extend(iter);
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn ex(local: &str) -> Node {
        Node::iri(format!("http://example.org/{local}"))
    }

    #[test]
    fn insert_is_set_like() {
        let mut g = FactGraph::new();
        assert!(g.add(ex("a"), ex("p"), ex("b")));
        assert!(!g.add(ex("a"), ex("p"), ex("b")));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn filter_intersects_bound_positions_in_insertion_order() {
        let mut g = FactGraph::new();
        g.add(ex("a"), ex("p"), ex("z"));
        g.add(ex("b"), ex("p"), ex("y"));
        g.add(ex("a"), ex("q"), ex("y"));
        g.add(ex("a"), ex("p"), ex("y"));

        let objects: Vec<Term> = g
            .filter(Some(&ex("a")), Some(&ex("p")), None)
            .map(|f| f.object.clone())
            .collect();
        assert_eq!(objects, vec![Term::Node(ex("z")), Term::Node(ex("y"))]);

        let subjects: Vec<Node> = g
            .filter(None, None, Some(&Term::Node(ex("y"))))
            .map(|f| f.subject.clone())
            .collect();
        assert_eq!(subjects, vec![ex("b"), ex("a"), ex("a")]);

        assert_eq!(g.filter(None, None, None).count(), 4);
        assert_eq!(g.filter(Some(&ex("missing")), None, None).count(), 0);
    }

    #[test]
    fn removed_facts_disappear_from_every_index() {
        let mut g = FactGraph::new();
        g.add(ex("a"), ex("name"), Literal::string("Foo"));
        g.add(ex("a"), ex("p"), ex("b"));

        let removed = g.remove_matching(Some(&ex("a")), Some(&ex("name")), None);
        assert_eq!(removed, 1);
        assert_eq!(g.len(), 1);
        assert!(!g.has_match(None, None, Some(&Term::Literal(Literal::string("Foo")))));
        assert!(!g.has_match(None, Some(&ex("name")), None));

        // Re-adding goes to a fresh slot at the end.
        g.add(ex("a"), ex("name"), Literal::string("Bar"));
        let last = g.iter().last().map(|f| f.object.clone());
        assert_eq!(last, Some(Term::Literal(Literal::string("Bar"))));
    }

    #[test]
    fn literal_value_degrades_to_empty_string() {
        let mut g = FactGraph::new();
        g.add(ex("a"), ex("label"), Literal::plain("Animals"));
        g.add(ex("a"), ex("ref"), ex("b"));

        assert_eq!(g.literal_value(&ex("a"), &ex("label")), "Animals");
        assert_eq!(g.literal_value(&ex("a"), &ex("ref")), "");
        assert_eq!(g.literal_value(&ex("a"), &ex("missing")), "");
        assert_eq!(g.node_value(&ex("a"), &ex("ref")), Some(&ex("b")));
    }
}
