//! Fundamental types for reclaim.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identifiers, timestamps, state enums, and the two persisted aggregates
//! ([`Item`] and [`Claim`]). Items and claims are independently addressable;
//! a claim refers to its item by id only.

pub mod claim;
pub mod error;
pub mod id;
pub mod item;
pub mod state;
pub mod time;

pub use claim::{Claim, ClaimFlow, ClaimQuestion};
pub use error::TypesError;
pub use id::{ClaimId, ItemId, QuestionId, UserId};
pub use item::{Contact, Item, ItemDetails, Platform, ReturnMethod, Urgency, Verification};
pub use state::{ClaimStatus, ItemStatus, ItemType, PartyRole};
pub use time::{Clock, SystemClock, Timestamp};
