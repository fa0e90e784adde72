//! Error types for reference data.

use hn_core::{HnError, PipeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Pipe {pipe} not found in catalog")]
    UnknownPipe { pipe: PipeId },

    #[error("Duplicate pipe {pipe} in catalog")]
    DuplicatePipe { pipe: PipeId },

    #[error("Pipe {pipe} has invalid {what}")]
    InvalidPipe { pipe: PipeId, what: &'static str },

    #[error("Invalid fluid property: {what}")]
    InvalidFluid { what: &'static str },

    #[error("Invalid curve: {what}")]
    InvalidCurve { what: &'static str },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for HnError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownPipe { pipe } => HnError::NotFound {
                what: pipe.to_string(),
            },
            other => HnError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_pipe() {
        let err = CatalogError::UnknownPipe {
            pipe: PipeId::new(17),
        };
        assert!(err.to_string().contains("pipe#17"));
    }

    #[test]
    fn error_conversion() {
        let err: HnError = CatalogError::InvalidCurve { what: "empty" }.into();
        assert!(matches!(err, HnError::InvalidArg { .. }));
    }
}
