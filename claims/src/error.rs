use reclaim_store::StoreError;
use reclaim_types::ItemId;
use thiserror::Error;

/// Broad class of a [`ClaimError`]. Every variant except `Infrastructure` is a
/// local, recoverable condition that leaves the store untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authorization,
    Conflict,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum ClaimError {
    // ── Validation ──────────────────────────────────────────────────────
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("a claim needs at least one question or answer")]
    EmptySubmission,

    #[error("a claim on a lost item needs at least one challenge question")]
    QuestionsRequired,

    #[error("a claim on a found item needs at least one answer")]
    AnswersRequired,

    #[error("'{0}' is not one of this item's verification questions")]
    UnknownVerificationQuestion(String),

    #[error("at least one answer is required")]
    EmptyAnswerSet,

    #[error("decision must be APPROVED or REJECTED, got '{0}'")]
    InvalidDecision(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("a found item needs at least one verification question")]
    VerificationsRequired,

    // ── Not found ───────────────────────────────────────────────────────
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("{0} not found")]
    ClaimNotFound(String),

    // ── Authorization ───────────────────────────────────────────────────
    #[error("you cannot claim an item you reported")]
    OwnItem,

    #[error("only the item's owner can answer this claim")]
    NotItemOwner,

    #[error("you are not allowed to decide this claim")]
    NotDecider,

    #[error("only the item's reporter can do this")]
    NotItemReporter,

    // ── Conflict / invalid state ────────────────────────────────────────
    #[error("item is no longer open")]
    ItemNotOpen,

    #[error("you already have a claim on this item")]
    DuplicateClaim,

    #[error("claim has already been answered or decided")]
    ClaimNotPending,

    #[error("claim is not in a decidable state")]
    ClaimNotDecidable,

    #[error("answers were supplied with the claim; there is nothing to answer")]
    AnswerPhaseNotApplicable,

    #[error("QR verification only applies to found items")]
    QrNotSupported,

    #[error("item has no QR code attached")]
    QrNotAttached,

    // ── Infrastructure ──────────────────────────────────────────────────
    #[error("store error: {0}")]
    Store(StoreError),
}

impl ClaimError {
    pub fn kind(&self) -> ErrorKind {
        use ClaimError::*;
        match self {
            BlankField(_) | EmptySubmission | QuestionsRequired | AnswersRequired
            | UnknownVerificationQuestion(_) | EmptyAnswerSet | InvalidDecision(_)
            | InvalidDate(_) | VerificationsRequired => ErrorKind::Validation,
            ItemNotFound(_) | ClaimNotFound(_) => ErrorKind::NotFound,
            OwnItem | NotItemOwner | NotDecider | NotItemReporter => ErrorKind::Authorization,
            ItemNotOpen | DuplicateClaim | ClaimNotPending | ClaimNotDecidable
            | AnswerPhaseNotApplicable | QrNotSupported | QrNotAttached => ErrorKind::Conflict,
            Store(_) => ErrorKind::Infrastructure,
        }
    }

    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        use ClaimError::*;
        match self {
            BlankField(_) => "blank_field",
            EmptySubmission => "empty_submission",
            QuestionsRequired => "questions_required",
            AnswersRequired => "answers_required",
            UnknownVerificationQuestion(_) => "unknown_verification_question",
            EmptyAnswerSet => "empty_answer_set",
            InvalidDecision(_) => "invalid_decision",
            InvalidDate(_) => "invalid_date",
            VerificationsRequired => "verifications_required",
            ItemNotFound(_) => "item_not_found",
            ClaimNotFound(_) => "claim_not_found",
            OwnItem => "cannot_claim_own_item",
            NotItemOwner => "not_item_owner",
            NotDecider => "not_authorized_decider",
            NotItemReporter => "not_item_reporter",
            ItemNotOpen => "item_not_open",
            DuplicateClaim => "duplicate_claim",
            ClaimNotPending => "claim_not_pending",
            ClaimNotDecidable => "claim_not_decidable",
            AnswerPhaseNotApplicable => "answer_phase_not_applicable",
            QrNotSupported => "qr_not_supported",
            QrNotAttached => "qr_not_attached",
            Store(_) => "store_failure",
        }
    }
}

impl From<StoreError> for ClaimError {
    fn from(e: StoreError) -> Self {
        match e {
            // The storage uniqueness index caught a concurrent duplicate.
            StoreError::Duplicate(_) => ClaimError::DuplicateClaim,
            other => ClaimError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_duplicate_surfaces_as_conflict() {
        let err = ClaimError::from(StoreError::Duplicate("claim".into()));
        assert!(matches!(err, ClaimError::DuplicateClaim));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn backend_failures_stay_infrastructure() {
        let err = ClaimError::from(StoreError::Backend("disk gone".into()));
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert_eq!(err.reason(), "store_failure");
    }
}
