use crate::error::StorageError;
use crate::types::PickupRequest;

/// Durable mirror of the whole request collection.
pub trait RequestStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<PickupRequest>>, StorageError>;
    /// Replaces the stored collection with `requests`.
    fn save(&self, requests: &[PickupRequest]) -> Result<(), StorageError>;
}
