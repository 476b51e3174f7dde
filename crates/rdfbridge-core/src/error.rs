use rdfbridge_graph::Node;
use std::path::PathBuf;

/// Failures of a bridge run.
///
/// Unresolvable names are not errors; they are recorded in the run report.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("cyclic hierarchy in bridge `{rule}`: {}", format_chain(.chain))]
    CyclicHierarchy { rule: String, chain: Vec<Node> },

    #[error("duplicate bridge rule id `{0}`")]
    DuplicateRuleId(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Problems found while building bridge rules from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse bridge configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read bridge configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bridge `{rule}`: missing value for `{field}`")]
    MissingField { rule: String, field: &'static str },

    #[error("duplicate bridge rule id `{0}`")]
    DuplicateRuleId(String),

    #[error("bridge `{rule}`: predicate {predicate} is listed twice in {section}")]
    DuplicatePredicate {
        rule: String,
        predicate: Node,
        section: &'static str,
    },
}

fn format_chain(chain: &[Node]) -> String {
    chain
        .iter()
        .map(|node| node.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
