use crate::shape::{ShapeCounts, TargetShape};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid target shape: {reason} (requested {target:?})")]
    InvalidTargetShape { target: TargetShape, reason: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Synthesis failed while creating {entity}: {reason}")]
    Synthesis {
        entity: &'static str,
        reason: String,
    },

    #[error("Plan execution mismatch in {mode} mode: expected {expected:?}, found {actual:?} ({detail})")]
    PlanExecutionMismatch {
        mode: &'static str,
        expected: ShapeCounts,
        actual: ShapeCounts,
        detail: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;
