pub mod enums;
pub mod ids;
pub mod io;
pub mod pickup;
pub mod user;

pub use enums::{PickupStatus, UnknownStatus, UserRole};
pub use ids::{IdError, ItemId, PickupId, UserId};
pub use io::CreatePickupInput;
pub use pickup::{
    InvalidPickupCode, PartnerRef, PickupCode, PickupRequest, ScrapItem, TIME_SLOTS, total_amount,
};
pub use user::User;
