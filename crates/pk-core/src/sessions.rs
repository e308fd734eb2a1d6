use crate::error::StorageError;
use crate::types::User;

pub trait SessionStore {
    fn load(&self) -> Result<Option<User>, StorageError>;
    fn save(&self, user: &User) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}
