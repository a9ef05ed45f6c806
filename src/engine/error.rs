//! Engine error types

use crate::resolver::ResolveError;
use thiserror::Error;

/// Failures of the engine's collaborators
///
/// Client input never produces an error: invalid selections re-prompt and
/// unknown windows resolve to `None`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Session store error: {0}")]
    Store(String),
    #[error("Resolver for window '{window}' failed: {source}")]
    Resolver {
        window: String,
        #[source]
        source: ResolveError,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
