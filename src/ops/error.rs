use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("inconsistent NCS grouping: {details}")]
    InconsistentGrouping { details: String },

    #[error("duplicate identity transform registered for NCS group {ncs_group_id}")]
    DuplicateTransform { ncs_group_id: usize },

    #[error("a structure is required but none was supplied: {details}")]
    MissingStructure { details: String },

    #[error("invalid selection '{expression}': {details}")]
    Selection { expression: String, details: String },

    #[error(
        "superposition requires equal coordinate counts ({reference} reference vs {moving} moving)"
    )]
    CoordinateMismatch { reference: usize, moving: usize },

    #[error(transparent)]
    Format(#[from] crate::io::Error),
}

impl Error {
    pub fn inconsistent_grouping(details: impl Into<String>) -> Self {
        Self::InconsistentGrouping {
            details: details.into(),
        }
    }

    pub fn missing_structure(details: impl Into<String>) -> Self {
        Self::MissingStructure {
            details: details.into(),
        }
    }

    pub fn selection(expression: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Selection {
            expression: expression.into(),
            details: details.into(),
        }
    }
}
