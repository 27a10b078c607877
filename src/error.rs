use thiserror::Error;

/// Failures that are real defects or I/O problems.
///
/// "No form found", "no eligible controls" and "not converged yet" are normal
/// states and never show up here.
#[derive(Debug, Error)]
pub enum DetectError {
    /// Snapshot file could not be read
    #[error("failed to read snapshot '{path}': {source}")]
    SnapshotRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON did not match the expected shape
    #[error("snapshot JSON parse error ({context}): {source}")]
    SnapshotParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot YAML did not match the expected shape
    #[error("snapshot YAML parse error ({context}): {source}")]
    SnapshotYaml {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Structurally impossible tree content (empty tag, bad parent)
    #[error("invalid document structure: {0}")]
    InvalidDocument(String),

    /// An extracted record broke the field schema
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// Pass trace file could not be opened
    #[error("failed to open trace file '{path}': {source}")]
    TraceOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Downstream sink refused the message
    #[error("field sink failed: {0}")]
    Sink(String),

    /// HTTP delivery to a downstream consumer failed
    #[error("HTTP delivery failed: {0}")]
    Http(#[from] reqwest::Error),
}
