use roster_model::{ItemId, ModelError};
use roster_source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("screen is {state}; try again when it is ready")]
    Busy { state: &'static str },

    #[error("cannot move from {from} to {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("no row with id {0}")]
    UnknownItem(ItemId),

    /// Local validation blocked the submission.
    #[error(transparent)]
    Invalid(#[from] ModelError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ScreenError {
    /// Whether the caller should send the user back to login.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Source(err) if err.is_auth())
    }
}

pub type Result<T> = std::result::Result<T, ScreenError>;
