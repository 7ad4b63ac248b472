use thiserror::Error;

/// Failures that stop a canvas from being built.
///
/// Steady-state interaction never fails: missing preconditions (an
/// unresolved endpoint, no join points, no pointer sample) degrade to
/// no-ops instead.
#[derive(Debug, Error, PartialEq)]
pub enum CanvasError {
    #[error("invalid canvas configuration: {0}")]
    Configuration(String),
    #[error("failed to parse canvas configuration: {0}")]
    ConfigParse(String),
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::ConfigParse(err.to_string())
    }
}
