use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid {kind}: {value:?}")]
    InvalidId { kind: &'static str, value: String },
    #[error("page size {0} is not one of 5, 10, 20, 50")]
    InvalidPageSize(usize),
    #[error("unknown {kind} status: {value}")]
    UnknownStatus { kind: &'static str, value: String },
    #[error("invalid sort specification: {0}")]
    InvalidSort(String),
    #[error("required field is missing: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, ModelError>;
