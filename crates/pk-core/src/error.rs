use crate::types::enums::PickupStatus;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("pickup request not found")]
    NotFound,
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: PickupStatus,
        to: PickupStatus,
    },
    #[error("starting a pickup requires the pickup code")]
    CodeRequired,
    #[error("pickup code does not match")]
    CodeMismatch,
    #[error("pickup code already set")]
    CodeAlreadySet,
    #[error("invalid state: {message}")]
    InvalidState { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed: {message}")]
    Read { message: String },
    #[error("storage write failed: {message}")]
    Write { message: String },
    #[error("stored value could not be decoded: {message}")]
    Decode { message: String },
    #[error("value could not be encoded: {message}")]
    Encode { message: String },
}

#[derive(Debug, Error)]
pub enum PickupError {
    #[error(transparent)]
    Request(#[from] RequestError),
    /// The in-memory change was applied but did not reach durable storage.
    #[error("changes not saved: {0}")]
    Persistence(#[from] StorageError),
}

impl PickupError {
    /// Persistence failures can be retried with `Pickups::flush`; everything
    /// else is a rejected request that left state unchanged.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            Self::Request(err) => Some(err),
            Self::Persistence(_) => None,
        }
    }
}
