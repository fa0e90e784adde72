//! Error types for network algorithms.

use hn_catalog::CatalogError;
use hn_core::{HnError, NodeId};
use thiserror::Error;

/// Recoverable failures of topology and sizing passes.
///
/// Invariant violations (unknown ids handed to the mutation API) are not
/// represented here; they panic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Network has no source node")]
    NoSource,

    #[error("Substation {node} has non-positive heating demand {demand} W")]
    NonPositiveDemand { node: NodeId, demand: f64 },

    #[error("Substation {substation} is not reachable from any source")]
    Unreachable { substation: NodeId },

    #[error("No pipes available for sizing")]
    EmptyCatalog,

    #[error("{what} did not settle within {limit} passes")]
    IterationLimit { what: &'static str, limit: usize },

    #[error("No free {what} id left")]
    IdsExhausted { what: &'static str },

    #[error("Invalid parameter: {0}")]
    Parameter(#[from] HnError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl From<NetworkError> for HnError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::Parameter(inner) => inner,
            NetworkError::Catalog(inner) => inner.into(),
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
    fn error_display_names_entity() {
        let err = NetworkError::NonPositiveDemand {
            node: NodeId::new(4),
            demand: 0.0,
        };
        assert!(err.to_string().contains("node#4"));
    }

    #[test]
    fn error_conversion_keeps_parameter_errors() {
        let inner = HnError::NonPositive {
            what: "max pressure loss",
            value: -1.0,
        };
        let err: HnError = NetworkError::Parameter(inner.clone()).into();
        assert_eq!(err, inner);
        let err: HnError = NetworkError::NoSource.into();
        assert!(matches!(err, HnError::InvalidArg { .. }));
    }
}
