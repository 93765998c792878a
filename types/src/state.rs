//! State enums for items and claims.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Which side reported the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    /// Reported missing by its owner; claimed by whoever found it.
    Lost,
    /// Reported found by a finder; claimed by whoever can prove ownership.
    Found,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "LOST",
            Self::Found => "FOUND",
        }
    }

    /// The role held by whoever reported an item of this type.
    pub fn reporter_role(&self) -> PartyRole {
        match self {
            Self::Lost => PartyRole::Owner,
            Self::Found => PartyRole::Finder,
        }
    }
}

/// Lifecycle of an item. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// Accepting claims.
    Open,
    /// Ownership resolved through an approved claim or the QR fast-path.
    Claimed,
    /// Closed by external closure logic.
    Resolved,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Claimed => "CLAIMED",
            Self::Resolved => "RESOLVED",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Claimed => 1,
            Self::Resolved => 2,
        }
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(&self, next: ItemStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Lifecycle of a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Submitted; awaiting answers (LOST flow) or a decision (FOUND flow).
    Pending,
    /// Answers supplied; awaiting a decision.
    PendingApproval,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Terminal statuses never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// The part a user plays with respect to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyRole {
    Finder,
    Owner,
}

impl PartyRole {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Finder => Self::Owner,
            Self::Owner => Self::Finder,
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ident, $kind:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == Self::$variant.as_str() {
                        return Ok(Self::$variant);
                    }
                )+
                Err(TypesError::UnknownVariant {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

display_and_parse!(ItemType, "item type", [Lost, Found]);
display_and_parse!(ItemStatus, "item status", [Open, Claimed, Resolved]);
display_and_parse!(ClaimStatus, "claim status", [Pending, PendingApproval, Approved, Rejected]);
