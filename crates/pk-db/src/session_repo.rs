use crate::kv::{KvTable, USER_KEY};
use crate::util::{decode_json, encode_json};
use pk_core::StorageError;
use pk_core::sessions::SessionStore;
use pk_core::types::User;
use rusqlite::Connection;
use tracing::warn;

pub struct SessionRepo<'a> {
    kv: KvTable<'a>,
}

impl<'a> SessionRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            kv: KvTable::new(conn),
        }
    }
}

impl SessionStore for SessionRepo<'_> {
    /// An unreadable session reads as signed out.
    fn load(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.kv.get(USER_KEY).map_err(|err| err.into_read())? else {
            return Ok(None);
        };
        match decode_json::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(error = %err, "stored session unreadable, treating as signed out");
                Ok(None)
            }
        }
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        let raw = encode_json(user).map_err(|err| err.into_write())?;
        self.kv.set(USER_KEY, &raw).map_err(|err| err.into_write())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.kv
            .remove(USER_KEY)
            .map(|_| ())
            .map_err(|err| err.into_write())
    }
}
