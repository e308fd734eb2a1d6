use crate::config::ConfigError;
use pk_core::types::UserRole;
use pk_core::{PickupError, StorageError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pickup(#[from] PickupError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot create data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("not signed in; run `pk signin` first")]
    NotSignedIn,
    #[error("this command is for {expected} accounts")]
    WrongRole { expected: UserRole },
    #[error("pickup request belongs to someone else")]
    NotYours,
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Pickup(err) if err.is_recoverable() => 3,
            Self::Storage(_) | Self::Database(_) | Self::Config(_) | Self::DataDir { .. } => 3,
            _ => 1,
        }
    }
}
