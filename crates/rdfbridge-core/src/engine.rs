//! Runs an ordered list of bridge rules over one fact graph.
//!
//! All annotation passes run first, in rule order, against the same graph.
//! The Path post-pass then runs once per rule over the subjects that rule
//! processed, so a rule's paths see every rule's names and parent links.

use ahash::AHashSet;

use rdfbridge_graph::{FactGraph, Vocabulary};

use crate::annotate::Annotator;
use crate::config::{BridgeSetConfig, EngineConfig};
use crate::error::BridgeError;
use crate::paths::assign_paths;
use crate::report::{RevertOutcome, RunReport};
use crate::reverse::revert;
use crate::rule::BridgeRule;

/// The annotated graph and what the run did.
#[derive(Debug, Clone)]
pub struct Annotated {
    pub graph: FactGraph,
    pub report: RunReport,
}

#[derive(Debug, Clone)]
pub struct BridgeEngine {
    config: EngineConfig,
    vocab: Vocabulary,
}

impl Default for BridgeEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl BridgeEngine {
    pub fn new(config: EngineConfig) -> Self {
        let vocab = config.vocabulary();
        Self { config, vocab }
    }

    /// Engine and rules described by one configuration document.
    pub fn from_config(config: &BridgeSetConfig) -> Result<(Self, Vec<BridgeRule>), BridgeError> {
        let rules = config.rules()?;
        Ok((Self::new(config.engine.clone()), rules))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Thread `graph` through every rule and hand it back annotated.
    pub fn run(&self, mut graph: FactGraph, rules: &[BridgeRule]) -> Result<Annotated, BridgeError> {
        let report = self.fold(&mut graph, rules)?;
        Ok(Annotated { graph, report })
    }

    /// Annotate `graph` in place. On error the graph is left as it was.
    pub fn apply(
        &self,
        graph: &mut FactGraph,
        rules: &[BridgeRule],
    ) -> Result<RunReport, BridgeError> {
        let mut working = graph.clone();
        let report = self.fold(&mut working, rules)?;
        *graph = working;
        Ok(report)
    }

    /// Rule ids and predicates are checked before the graph is touched.
    fn fold(&self, graph: &mut FactGraph, rules: &[BridgeRule]) -> Result<RunReport, BridgeError> {
        check_rules(rules)?;

        let annotator = Annotator::new(&self.vocab, &self.config.property_namespace);
        let mut report = RunReport::default();
        for rule in rules {
            report.outcomes.push(annotator.annotate(graph, rule));
        }

        for (rule, outcome) in rules.iter().zip(&report.outcomes) {
            let paths = assign_paths(
                graph,
                &self.vocab,
                &rule.id,
                &rule.base_path,
                &outcome.processed,
            )?;
            report.paths.push(paths);
        }

        tracing::debug!(
            rules = rules.len(),
            facts = graph.len(),
            unresolved = report.unresolved().count(),
            paths = report.paths_assigned(),
            "bridge run complete"
        );
        Ok(report)
    }

    /// Re-derive raw facts from the annotated hierarchy, rule by rule.
    pub fn revert(
        &self,
        graph: &mut FactGraph,
        rules: &[BridgeRule],
    ) -> Result<Vec<RevertOutcome>, BridgeError> {
        check_rules(rules)?;
        rules
            .iter()
            .map(|rule| revert(graph, &self.vocab, rule))
            .collect()
    }
}

fn check_rules(rules: &[BridgeRule]) -> Result<(), BridgeError> {
    let mut ids = AHashSet::new();
    for rule in rules {
        if !ids.insert(rule.id.as_str()) {
            return Err(BridgeError::DuplicateRuleId(rule.id.clone()));
        }
        rule.validate()?;
    }
    Ok(())
}
