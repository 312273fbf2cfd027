use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize)]
pub enum PolicyError {
    #[error("invalid principal construction: {0}")]
    ConstructionError(String),

    #[error("failed to merge conditions: {0}")]
    MergeConflict(String),

    #[error("invalid principal composition: {0}")]
    ValidationError(String),

    #[error("failed to resolve deferred value: {0}")]
    ResolutionError(String),
}
