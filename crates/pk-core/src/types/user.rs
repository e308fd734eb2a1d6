use crate::types::enums::UserRole;
use crate::types::ids::UserId;
use crate::types::pickup::PartnerRef;
use serde::{Deserialize, Serialize};

/// Signed-in identity supplied by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub phone: String,
    pub name: String,
    #[serde(rename = "type")]
    pub role: UserRole,
}

impl User {
    pub fn is_partner(&self) -> bool {
        self.role == UserRole::Partner
    }

    pub fn as_partner(&self) -> Option<PartnerRef> {
        self.is_partner().then(|| PartnerRef {
            id: self.id.clone(),
            name: self.name.clone(),
        })
    }
}
