//! Claim resolution for reclaim.
//!
//! Reported items move from OPEN to CLAIMED either through a claim protocol
//! (challenge questions, answers, a decision) or through the QR fast-path.
//! The protocol differs with the item type:
//!
//! - **LOST item**: the claimant found it. They submit questions, the owner
//!   answers, and the claimant decides whether the answers prove ownership.
//! - **FOUND item**: the claimant lost it. They answer the finder's
//!   verification prompts up front and the finder decides.
//!
//! [`ClaimEngine`] runs each operation as a single store transaction.
//! [`matrix::authorize`] says who may do what, [`projection`] decides what
//! each viewer may see.

pub mod engine;
pub mod error;
pub mod matrix;
pub mod notification;
pub mod payload;
pub mod projection;
pub mod protocol;
mod qr;
mod queries;
pub mod queue;

pub use engine::ClaimEngine;
pub use error::{ClaimError, ErrorKind};
pub use matrix::{authorize, ActorRole, ClaimAction, Permission};
pub use notification::{Notification, NotificationCategory, NotificationSink, TracingSink};
pub use payload::{
    AnswerEntry, AnswerInput, ClaimAnswers, ClaimSubmission, Decision, DecisionPayload,
    FoundItemReport, ItemPatch, LostItemReport, QuestionInput,
};
pub use projection::{ClaimView, ItemView, QuestionView, VerificationPrompt};
pub use protocol::{protocol, ClaimProtocol, FoundClaimProtocol, LostClaimProtocol};
pub use queue::MatchQueue;
