use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickupStatus {
    Pending,
    Accepted,
    InProcess,
    PendingApproval,
    Completed,
}

impl PickupStatus {
    /// Tracker order, first to last.
    pub const ALL: [PickupStatus; 5] = [
        Self::Pending,
        Self::Accepted,
        Self::InProcess,
        Self::PendingApproval,
        Self::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::InProcess => "in-process",
            Self::PendingApproval => "pending-approval",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::InProcess => "In Process",
            Self::PendingApproval => "Pending Approval",
            Self::Completed => "Completed",
        }
    }

    pub fn step(self) -> usize {
        match self {
            Self::Pending => 0,
            Self::Accepted => 1,
            Self::InProcess => 2,
            Self::PendingApproval => 3,
            Self::Completed => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }
}

impl fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pickup status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for PickupStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Partner,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Partner => "partner",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
