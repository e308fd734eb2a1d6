use crate::types::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a customer fills in when scheduling; the repository assigns the
/// id, status and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupInput {
    pub customer_id: UserId,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub google_map_link: Option<String>,
    pub pickup_date: DateTime<Utc>,
    pub time_slot: String,
}
