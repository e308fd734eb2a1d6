pub mod error;
pub mod pickups;
pub mod requests;
pub mod sessions;
pub mod store;
pub mod validation;

pub mod types;

pub use crate::error::{PickupError, RequestError, StorageError};
pub use crate::pickups::{LoadOutcome, Pickups};
pub use crate::store::Store;
