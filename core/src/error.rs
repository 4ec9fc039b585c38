use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Position '{position_id}' not found")]
    PositionNotFound { position_id: String },

    #[error("KPI weights not configured for position '{position_id}'")]
    MissingKpiWeights { position_id: String },

    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    #[error("Invalid input field '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CalcError {
    /// True for errors caused by the catalog rather than the caller's input.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CalcError::PositionNotFound { .. }
                | CalcError::MissingKpiWeights { .. }
                | CalcError::InvalidCatalog { .. }
        )
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
