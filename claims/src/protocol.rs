//! The two claim protocols.
//!
//! A claim against a LOST item and a claim against a FOUND item walk the same
//! statuses but differ in who supplies the answers and who decides. Each is
//! its own [`ClaimProtocol`]; the one a claim follows is fixed by
//! [`ClaimFlow`] when the claim is created.
//!
//! ```text
//!  LOST:   PENDING --answer(owner)--> PENDING_APPROVAL --decide(claimant)--> APPROVED | REJECTED
//!  FOUND:  PENDING / PENDING_APPROVAL --decide(finder)--> APPROVED | REJECTED
//! ```

use reclaim_types::{Claim, ClaimFlow, ClaimQuestion, ClaimStatus, Item, QuestionId, Timestamp};

use crate::payload::{AnswerEntry, ClaimSubmission, Decision};
use crate::ClaimError;

pub trait ClaimProtocol: Send + Sync {
    fn flow(&self) -> ClaimFlow;

    /// Build the claim's question list from a submission, checking it against
    /// the target item.
    fn questions(&self, item: &Item, submission: &ClaimSubmission)
        -> Result<Vec<ClaimQuestion>, ClaimError>;

    /// Record answers on a claim. Authorization has already been checked.
    fn record_answers(&self, claim: &mut Claim, answers: &[AnswerEntry]) -> Result<(), ClaimError>;

    /// Every new claim starts here.
    fn initial_status(&self) -> ClaimStatus {
        ClaimStatus::Pending
    }

    /// Move a claim into its terminal status. Shared by both protocols.
    fn conclude(&self, claim: &mut Claim, decision: Decision, at: Timestamp) {
        claim.status = decision.status();
        claim.decided_at = Some(at);
    }
}

/// Claim on a LOST item: the claimant found it and asks the owner questions.
#[derive(Clone, Copy, Debug, Default)]
pub struct LostClaimProtocol;

/// Claim on a FOUND item: the claimant says it is theirs and answers the
/// finder's verification prompts up front.
#[derive(Clone, Copy, Debug, Default)]
pub struct FoundClaimProtocol;

impl ClaimProtocol for LostClaimProtocol {
    fn flow(&self) -> ClaimFlow {
        ClaimFlow::Lost
    }

    fn questions(
        &self,
        _item: &Item,
        submission: &ClaimSubmission,
    ) -> Result<Vec<ClaimQuestion>, ClaimError> {
        if submission.questions.is_empty() {
            return Err(ClaimError::QuestionsRequired);
        }
        Ok(submission
            .questions
            .iter()
            .map(|q| ClaimQuestion {
                id: QuestionId::generate(),
                question: q.question.clone(),
                answer: None,
            })
            .collect())
    }

    fn record_answers(&self, claim: &mut Claim, answers: &[AnswerEntry]) -> Result<(), ClaimError> {
        if claim.status != ClaimStatus::Pending {
            return Err(ClaimError::ClaimNotPending);
        }
        claim.merge_answers(answers.iter().map(|a| (&a.question_id, a.answer.as_str())));
        claim.status = ClaimStatus::PendingApproval;
        Ok(())
    }
}

impl ClaimProtocol for FoundClaimProtocol {
    fn flow(&self) -> ClaimFlow {
        ClaimFlow::Found
    }

    fn questions(
        &self,
        item: &Item,
        submission: &ClaimSubmission,
    ) -> Result<Vec<ClaimQuestion>, ClaimError> {
        if submission.answers.is_empty() {
            return Err(ClaimError::AnswersRequired);
        }
        submission
            .answers
            .iter()
            .map(|a| {
                if !item.has_verification_question(&a.question) {
                    return Err(ClaimError::UnknownVerificationQuestion(a.question.clone()));
                }
                Ok(ClaimQuestion {
                    id: QuestionId::generate(),
                    question: a.question.clone(),
                    answer: Some(a.answer.clone()),
                })
            })
            .collect()
    }

    fn record_answers(&self, _claim: &mut Claim, _answers: &[AnswerEntry]) -> Result<(), ClaimError> {
        Err(ClaimError::AnswerPhaseNotApplicable)
    }
}

static LOST: LostClaimProtocol = LostClaimProtocol;
static FOUND: FoundClaimProtocol = FoundClaimProtocol;

/// The protocol a claim of `flow` follows.
pub fn protocol(flow: ClaimFlow) -> &'static dyn ClaimProtocol {
    match flow {
        ClaimFlow::Lost => &LOST,
        ClaimFlow::Found => &FOUND,
    }
}
