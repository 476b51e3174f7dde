//! Sibling name disambiguation.
//!
//! One table is used per `(parent, child predicate)` scope. Children reached
//! through different predicates of the same parent are never compared.
//!
//! Numbering starts at 2: the first repeat of `Cats` becomes `Cats2`. Every
//! suffixed name is registered as a key of its own, carrying the counter it
//! was produced with.

use ahash::AHashMap;

#[derive(Debug, Default, Clone)]
pub struct SiblingNames {
    counts: AHashMap<String, u32>,
}

impl SiblingNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the name to use for a child whose raw name is `candidate`.
    pub fn claim(&mut self, candidate: &str) -> String {
        let Some(count) = self.counts.get(candidate).copied() else {
            self.counts.insert(candidate.to_string(), 1);
            return candidate.to_string();
        };

        let next = count + 1;
        self.counts.insert(candidate.to_string(), next);
        let renamed = format!("{candidate}{next}");
        self.counts.insert(renamed.clone(), next);
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_collision_gets_suffix_two() {
        let mut names = SiblingNames::new();
        assert_eq!(names.claim("Cats"), "Cats");
        assert_eq!(names.claim("Cats"), "Cats2");
    }

    #[test]
    fn repeated_collisions_keep_counting_from_the_bare_name() {
        let mut names = SiblingNames::new();
        let got: Vec<String> = (0..4).map(|_| names.claim("Cats")).collect();
        assert_eq!(got, vec!["Cats", "Cats2", "Cats3", "Cats4"]);
    }

    #[test]
    fn suffixed_names_are_keys_with_their_own_counter() {
        let mut names = SiblingNames::new();
        names.claim("Cats");
        assert_eq!(names.claim("Cats"), "Cats2");
        // "Cats2" was registered with counter 2.
        assert_eq!(names.claim("Cats2"), "Cats23");
        assert_eq!(names.claim("Dogs"), "Dogs");
    }
}
