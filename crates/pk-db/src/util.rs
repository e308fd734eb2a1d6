use chrono::{DateTime, Utc};
use pk_core::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("json encode failed: {message}")]
    JsonEncode { message: String },
    #[error("json decode failed: {message}")]
    JsonDecode { message: String },
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl DbError {
    pub fn into_read(self) -> StorageError {
        match self {
            Self::JsonDecode { message } => StorageError::Decode { message },
            Self::InvalidTimestamp { value } => StorageError::Decode {
                message: format!("invalid timestamp: {value}"),
            },
            other => StorageError::Read {
                message: other.to_string(),
            },
        }
    }

    pub fn into_write(self) -> StorageError {
        match self {
            Self::JsonEncode { message } => StorageError::Encode { message },
            other => StorageError::Write {
                message: other.to_string(),
            },
        }
    }
}

pub fn to_rfc3339(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub fn from_rfc3339(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::InvalidTimestamp {
            value: value.to_string(),
        })
}

pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|err| DbError::JsonEncode {
        message: err.to_string(),
    })
}

pub fn decode_json<T: DeserializeOwned>(value: &str) -> Result<T, DbError> {
    serde_json::from_str(value).map_err(|err| DbError::JsonDecode {
        message: err.to_string(),
    })
}
