pub mod kv;
pub mod request_repo;
pub mod schema;
pub mod session_repo;
pub mod store;
pub mod util;

pub use crate::store::DbStore;
