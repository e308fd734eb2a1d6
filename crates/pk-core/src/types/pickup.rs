use crate::types::enums::PickupStatus;
use crate::types::ids::{ItemId, PickupId, UserId};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bookable one-hour windows. There is no slot over the lunch hour.
pub const TIME_SLOTS: [&str; 8] = [
    "09:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 13:00",
    "14:00 - 15:00",
    "15:00 - 16:00",
    "16:00 - 17:00",
    "17:00 - 18:00",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    pub id: PickupId,
    pub customer_id: UserId,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_map_link: Option<String>,
    pub pickup_date: DateTime<Utc>,
    pub time_slot: String,
    pub status: PickupStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_code: Option<PickupCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ScrapItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PickupRequest {
    pub fn is_assigned_to(&self, partner_id: &UserId) -> bool {
        self.partner_id.as_ref() == Some(partner_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapItem {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl ScrapItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.into(),
            quantity,
            price,
        }
    }

    /// `None` when quantity times price overflows `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.price)
    }
}

/// Sum of every line total, or `None` on overflow.
pub fn total_amount(items: &[ScrapItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        total.checked_add(item.line_total()?)
    })
}

/// The partner claiming a request, as read from the signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerRef {
    pub id: UserId,
    pub name: String,
}

/// Six-digit secret the customer reads out to let the partner start a pickup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PickupCode(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPickupCode {
    pub value: String,
}

impl fmt::Display for InvalidPickupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pickup code must be six digits, got {:?}", self.value)
    }
}

impl std::error::Error for InvalidPickupCode {}

impl PickupCode {
    pub const LEN: usize = 6;

    pub fn new(value: String) -> Result<Self, InvalidPickupCode> {
        if value.len() == Self::LEN && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(InvalidPickupCode { value })
        }
    }

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value: u32 = rng.gen_range(100_000..=999_999);
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against caller input; surrounding whitespace is not trimmed.
    pub fn matches(&self, input: &str) -> bool {
        self.0 == input
    }
}

impl fmt::Display for PickupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PickupCode {
    type Err = InvalidPickupCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl<'de> Deserialize<'de> for PickupCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
