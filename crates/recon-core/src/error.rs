use thiserror::Error;

/// Top-level error type for recon's shared model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid port specification '{spec}': {reason}")]
    InvalidPortSpec { spec: String, reason: String },

    #[error("Illegal target state transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, ReconError>;
