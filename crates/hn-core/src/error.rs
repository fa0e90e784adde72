use thiserror::Error;

pub type HnResult<T> = Result<T, HnError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HnError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value for {what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Not found: {what}")]
    NotFound { what: String },
}
