//! End-to-end claim lifecycle against the in-memory store.

use std::sync::Arc;

use reclaim_claims::{
    AnswerEntry, AnswerInput, ClaimAnswers, ClaimEngine, ClaimError, ClaimSubmission,
    DecisionPayload, ErrorKind, FoundItemReport, ItemPatch, LostItemReport, NotificationCategory,
    QuestionInput,
};
use reclaim_nullables::{NullClock, NullMatchQueue, NullNotifier, NullStore};
use reclaim_store::ItemFilter;
use reclaim_types::{
    ClaimStatus, Contact, Item, ItemStatus, ItemType, Platform, PartyRole, UserId, Verification,
};
use uuid::Uuid;

struct Harness {
    engine: ClaimEngine<NullStore>,
    store: Arc<NullStore>,
    notifier: Arc<NullNotifier>,
    queue: Arc<NullMatchQueue>,
    clock: Arc<NullClock>,
}

fn harness() -> Harness {
    let store = Arc::new(NullStore::new());
    let notifier = Arc::new(NullNotifier::new());
    let queue = Arc::new(NullMatchQueue::new());
    let clock = Arc::new(NullClock::default());
    let engine = ClaimEngine::new(store.clone(), notifier.clone(), queue.clone(), clock.clone());
    Harness {
        engine,
        store,
        notifier,
        queue,
        clock,
    }
}

fn user(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

fn found_report(qr: Option<&str>) -> FoundItemReport {
    FoundItemReport {
        title: "Blue umbrella".into(),
        description: "Left in lecture hall B".into(),
        category_id: Uuid::nil(),
        location_id: None,
        image_url: String::new(),
        verifications: vec![Verification {
            question: "color?".into(),
            answer: "blue".into(),
        }],
        date_found: "2024-05-01".into(),
        return_method: None,
        cod: false,
        show_phone: false,
        contacts: Vec::new(),
        attached_qr: qr.map(str::to_string),
    }
}

fn lost_report() -> LostItemReport {
    LostItemReport {
        title: "Phone".into(),
        description: String::new(),
        category_id: Uuid::nil(),
        location_last_seen: "Library".into(),
        date_lost: "2024-05-02".into(),
        image_url: String::new(),
        urgency: None,
        offer_reward: true,
        cod: false,
        show_phone: false,
        contacts: Vec::new(),
    }
}

fn answers(question: &str, answer: &str) -> ClaimSubmission {
    ClaimSubmission {
        answers: vec![AnswerInput {
            question: question.into(),
            answer: answer.into(),
        }],
        ..Default::default()
    }
}

fn questions(question: &str) -> ClaimSubmission {
    ClaimSubmission {
        questions: vec![QuestionInput {
            question: question.into(),
        }],
        ..Default::default()
    }
}

fn decision(status: &str) -> DecisionPayload {
    DecisionPayload {
        status: status.into(),
    }
}

fn found_item(h: &Harness, finder: &str) -> Item {
    h.engine.report_found(&user(finder), found_report(None)).unwrap()
}

fn lost_item(h: &Harness, owner: &str) -> Item {
    h.engine.report_lost(&user(owner), lost_report()).unwrap()
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn found_item_claim_approved_by_finder() {
    let h = harness();
    let i1 = found_item(&h, "U2");

    let c1 = h
        .engine
        .submit_claim(&i1.id, &user("U1"), answers("color?", "blue"))
        .unwrap();
    assert_eq!(c1.status, ClaimStatus::Pending);
    assert_eq!(c1.claimant_role(), PartyRole::Owner);

    let decided = h
        .engine
        .decide_claim(&c1.id, &user("U2"), &decision("APPROVED"))
        .unwrap();
    assert_eq!(decided.status, ClaimStatus::Approved);

    let item = h.store.item(&i1.id).unwrap();
    assert_eq!(item.status, ItemStatus::Claimed);
    assert_eq!(item.owner_id, Some(user("U1")));

    let to_claimant = h.notifier.delivered_to(&user("U1"));
    assert_eq!(to_claimant.len(), 1);
    assert_eq!(to_claimant[0].category, NotificationCategory::ClaimApproved);
    assert_eq!(to_claimant[0].related_entity_id, c1.id.to_string());
}

#[test]
fn lost_item_claim_waits_for_owner_answers() {
    let h = harness();
    let i2 = lost_item(&h, "U3");

    let c2 = h
        .engine
        .submit_claim(&i2.id, &user("U4"), questions("What brand?"))
        .unwrap();
    assert_eq!(c2.status, ClaimStatus::Pending);
    assert_eq!(c2.claimant_role(), PartyRole::Finder);

    let early = h
        .engine
        .decide_claim(&c2.id, &user("U4"), &decision("APPROVED"))
        .unwrap_err();
    assert!(matches!(early, ClaimError::ClaimNotDecidable));
    assert_eq!(early.kind(), ErrorKind::Conflict);

    let answered = h
        .engine
        .answer_claim(
            &c2.id,
            &user("U3"),
            ClaimAnswers {
                answers: vec![AnswerEntry {
                    question_id: c2.questions[0].id,
                    answer: "Samsung".into(),
                }],
            },
        )
        .unwrap();
    assert_eq!(answered.status, ClaimStatus::PendingApproval);
    assert_eq!(answered.questions[0].answer.as_deref(), Some("Samsung"));

    h.engine
        .decide_claim(&c2.id, &user("U4"), &decision("APPROVED"))
        .unwrap();
    let item = h.store.item(&i2.id).unwrap();
    assert_eq!(item.status, ItemStatus::Claimed);
    assert_eq!(item.finder_id, Some(user("U4")));
    assert_eq!(
        h.notifier.categories(),
        vec![
            NotificationCategory::ClaimNew,
            NotificationCategory::ClaimAnswered,
            NotificationCategory::ClaimApproved,
        ]
    );
}

#[test]
fn qr_fast_path_claims_once() {
    let h = harness();
    let i3 = h
        .engine
        .report_found(&user("finder"), found_report(Some("U5")))
        .unwrap();

    assert!(h.engine.verify_qr(&i3.id, &user("U5")).unwrap());
    let item = h.store.item(&i3.id).unwrap();
    assert_eq!(item.status, ItemStatus::Claimed);
    assert_eq!(item.owner_id, Some(user("U5")));
    assert_eq!(h.notifier.categories(), vec![NotificationCategory::QrVerified]);
    assert_eq!(h.notifier.delivered()[0].recipient_id, user("finder"));

    let again = h.engine.verify_qr(&i3.id, &user("U5")).unwrap_err();
    assert!(matches!(again, ClaimError::ItemNotOpen));
    assert_eq!(again.kind(), ErrorKind::Conflict);
}

// ── Submission ──────────────────────────────────────────────────────────

#[test]
fn claims_on_taken_items_conflict_for_everyone() {
    let h = harness();
    let item = h
        .engine
        .report_found(&user("finder"), found_report(Some("owner")))
        .unwrap();
    h.engine.verify_qr(&item.id, &user("owner")).unwrap();

    for claimant in ["owner", "finder", "someone", "U1"] {
        let err = h
            .engine
            .submit_claim(&item.id, &user(claimant), answers("color?", "blue"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict, "claimant {claimant}");
    }
    assert_eq!(h.store.claim_count(), 0);
}

#[test]
fn second_claim_by_same_claimant_conflicts() {
    let h = harness();
    let item = found_item(&h, "finder");
    h.engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();

    let err = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "red"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::DuplicateClaim));
    assert_eq!(err.reason(), "duplicate_claim");
    assert_eq!(h.store.claim_count(), 1);
}

#[test]
fn reporter_cannot_claim_own_item() {
    let h = harness();
    let found = found_item(&h, "finder");
    let lost = lost_item(&h, "owner");

    let err = h
        .engine
        .submit_claim(&found.id, &user("finder"), answers("color?", "blue"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = h
        .engine
        .submit_claim(&lost.id, &user("owner"), questions("Which case?"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::OwnItem));
}

#[test]
fn submission_shape_must_fit_item_type() {
    let h = harness();
    let found = found_item(&h, "finder");
    let lost = lost_item(&h, "owner");

    let err = h
        .engine
        .submit_claim(&lost.id, &user("c"), answers("color?", "blue"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::QuestionsRequired));

    let err = h
        .engine
        .submit_claim(&found.id, &user("c"), questions("brand?"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::AnswersRequired));

    let err = h
        .engine
        .submit_claim(&found.id, &user("c"), answers("colour?", "blue"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::UnknownVerificationQuestion(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(h.store.claim_count(), 0);
    assert_eq!(h.notifier.categories(), Vec::new());
}

#[test]
fn unknown_item_is_not_found() {
    let h = harness();
    let err = h
        .engine
        .submit_claim(&reclaim_types::ItemId::generate(), &user("c"), questions("q"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.reason(), "item_not_found");
}

#[test]
fn malformed_payloads_are_rejected_before_the_store() {
    let h = harness();
    let item = found_item(&h, "finder");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();
    h.store.set_unavailable(true);

    let err = h
        .engine
        .submit_claim(&item.id, &user("x"), ClaimSubmission::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = h
        .engine
        .decide_claim(&claim.id, &user("finder"), &decision("MAYBE"))
        .unwrap_err();
    assert_eq!(err.reason(), "invalid_decision");

    let err = h
        .engine
        .answer_claim(&claim.id, &user("finder"), ClaimAnswers::default())
        .unwrap_err();
    assert_eq!(err.reason(), "empty_answer_set");
}

#[test]
fn store_failures_are_infrastructure_errors() {
    let h = harness();
    let item = found_item(&h, "finder");
    h.store.set_unavailable(true);

    let err = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert!(h.notifier.delivered_to(&user("finder")).is_empty());
}

// ── Answers ─────────────────────────────────────────────────────────────

#[test]
fn only_the_owner_answers_lost_claims() {
    let h = harness();
    let item = lost_item(&h, "owner");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("finder"), questions("What brand?"))
        .unwrap();
    let payload = || ClaimAnswers {
        answers: vec![AnswerEntry {
            question_id: claim.questions[0].id,
            answer: "Samsung".into(),
        }],
    };

    for intruder in ["finder", "stranger"] {
        let err = h
            .engine
            .answer_claim(&claim.id, &user(intruder), payload())
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotItemOwner), "{intruder}");
    }

    h.engine.answer_claim(&claim.id, &user("owner"), payload()).unwrap();
    let err = h
        .engine
        .answer_claim(&claim.id, &user("owner"), payload())
        .unwrap_err();
    assert!(matches!(err, ClaimError::ClaimNotPending));
}

#[test]
fn unmatched_answer_ids_are_ignored() {
    let h = harness();
    let item = lost_item(&h, "owner");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("finder"), questions("What brand?"))
        .unwrap();

    let answered = h
        .engine
        .answer_claim(
            &claim.id,
            &user("owner"),
            ClaimAnswers {
                answers: vec![AnswerEntry {
                    question_id: reclaim_types::QuestionId::generate(),
                    answer: "Nokia".into(),
                }],
            },
        )
        .unwrap();
    assert_eq!(answered.status, ClaimStatus::PendingApproval);
    assert_eq!(answered.questions[0].answer, None);
}

#[test]
fn found_claims_have_no_answer_phase() {
    let h = harness();
    let item = found_item(&h, "finder");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();

    let err = h
        .engine
        .answer_claim(
            &claim.id,
            &user("finder"),
            ClaimAnswers {
                answers: vec![AnswerEntry {
                    question_id: claim.questions[0].id,
                    answer: "blue".into(),
                }],
            },
        )
        .unwrap_err();
    assert_eq!(err.reason(), "answer_phase_not_applicable");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

// ── Decisions ───────────────────────────────────────────────────────────

#[test]
fn lost_claims_are_decided_by_the_claimant_only() {
    let h = harness();
    let item = lost_item(&h, "owner");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("finder"), questions("What brand?"))
        .unwrap();
    h.engine
        .answer_claim(
            &claim.id,
            &user("owner"),
            ClaimAnswers {
                answers: vec![AnswerEntry {
                    question_id: claim.questions[0].id,
                    answer: "Samsung".into(),
                }],
            },
        )
        .unwrap();

    for outsider in ["owner", "stranger"] {
        let err = h
            .engine
            .decide_claim(&claim.id, &user(outsider), &decision("APPROVED"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization, "{outsider}");
    }
    assert_eq!(h.store.item(&item.id).unwrap().status, ItemStatus::Open);
}

#[test]
fn found_claims_are_decided_by_the_finder_only() {
    let h = harness();
    let item = found_item(&h, "finder");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();

    for outsider in ["owner", "stranger"] {
        let err = h
            .engine
            .decide_claim(&claim.id, &user(outsider), &decision("REJECTED"))
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotDecider), "{outsider}");
    }
    assert_eq!(h.store.claim(&claim.id).unwrap().status, ClaimStatus::Pending);
}

#[test]
fn approval_happens_exactly_once() {
    let h = harness();
    let item = found_item(&h, "finder");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();

    h.engine
        .decide_claim(&claim.id, &user("finder"), &decision("APPROVED"))
        .unwrap();
    h.clock.advance(60);
    let err = h
        .engine
        .decide_claim(&claim.id, &user("finder"), &decision("APPROVED"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::ClaimNotDecidable));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let stored = h.store.claim(&claim.id).unwrap();
    assert_eq!(stored.decided_at, Some(reclaim_types::Timestamp::new(1_700_000_000)));
}

#[test]
fn rejection_keeps_item_open_for_others() {
    let h = harness();
    let item = found_item(&h, "finder");
    let first = h
        .engine
        .submit_claim(&item.id, &user("impostor"), answers("color?", "red"))
        .unwrap();

    let rejected = h
        .engine
        .decide_claim(&first.id, &user("finder"), &decision("REJECTED"))
        .unwrap();
    assert_eq!(rejected.status, ClaimStatus::Rejected);
    assert_eq!(h.store.item(&item.id).unwrap().status, ItemStatus::Open);

    let second = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();
    assert_eq!(second.status, ClaimStatus::Pending);

    // The rejected claim still counts against its claimant.
    let err = h
        .engine
        .submit_claim(&item.id, &user("impostor"), answers("color?", "blue"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::DuplicateClaim));
}

#[test]
fn approval_rejects_competing_claims() {
    let h = harness();
    let item = found_item(&h, "finder");
    let winner = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();
    let loser = h
        .engine
        .submit_claim(&item.id, &user("impostor"), answers("color?", "green"))
        .unwrap();
    h.notifier.clear();

    h.engine
        .decide_claim(&winner.id, &user("finder"), &decision("APPROVED"))
        .unwrap();

    assert_eq!(h.store.claim(&loser.id).unwrap().status, ClaimStatus::Rejected);
    let to_loser = h.notifier.delivered_to(&user("impostor"));
    assert_eq!(to_loser.len(), 1);
    assert_eq!(to_loser[0].category, NotificationCategory::ClaimRejected);

    let err = h
        .engine
        .decide_claim(&loser.id, &user("finder"), &decision("APPROVED"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::ClaimNotDecidable));
}

#[test]
fn qr_claimed_items_cannot_approve_pending_claims() {
    let h = harness();
    let item = h
        .engine
        .report_found(&user("finder"), found_report(Some("owner")))
        .unwrap();
    let claim = h
        .engine
        .submit_claim(&item.id, &user("impostor"), answers("color?", "blue"))
        .unwrap();
    h.engine.verify_qr(&item.id, &user("owner")).unwrap();

    let err = h
        .engine
        .decide_claim(&claim.id, &user("finder"), &decision("APPROVED"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::ItemNotOpen));

    h.engine
        .decide_claim(&claim.id, &user("finder"), &decision("REJECTED"))
        .unwrap();
    assert_eq!(h.store.item(&item.id).unwrap().owner_id, Some(user("owner")));
}

// ── QR ──────────────────────────────────────────────────────────────────

#[test]
fn qr_mismatch_changes_nothing() {
    let h = harness();
    let item = h
        .engine
        .report_found(&user("finder"), found_report(Some("U5")))
        .unwrap();

    for wrong in ["u5", "U5 ", " U5", "U6"] {
        assert!(!h.engine.verify_qr(&item.id, &user(wrong)).unwrap(), "{wrong:?}");
    }
    assert_eq!(h.store.item(&item.id).unwrap(), item);
    assert!(h.notifier.delivered().is_empty());
}

#[test]
fn qr_preconditions() {
    let h = harness();
    let lost = lost_item(&h, "owner");
    let bare = found_item(&h, "finder");

    let err = h.engine.verify_qr(&lost.id, &user("owner")).unwrap_err();
    assert!(matches!(err, ClaimError::QrNotSupported));
    let err = h.engine.verify_qr(&bare.id, &user("finder")).unwrap_err();
    assert!(matches!(err, ClaimError::QrNotAttached));
    let err = h
        .engine
        .verify_qr(&reclaim_types::ItemId::generate(), &user("x"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ── Reporting and maintenance ───────────────────────────────────────────

#[test]
fn found_reports_are_queued_for_matching() {
    let h = harness();
    let found = found_item(&h, "finder");
    lost_item(&h, "owner");
    assert_eq!(h.queue.enqueued(), vec![found.id]);
}

#[test]
fn invalid_reports_are_not_stored_or_queued() {
    let h = harness();
    let mut report = found_report(None);
    report.title = "   ".into();
    let err = h.engine.report_found(&user("finder"), report).unwrap_err();
    assert!(matches!(err, ClaimError::BlankField("title")));
    assert!(h.queue.enqueued().is_empty());
}

#[test]
fn only_the_reporter_updates_or_deletes() {
    let h = harness();
    let item = lost_item(&h, "owner");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("finder"), questions("What brand?"))
        .unwrap();

    let patch = ItemPatch {
        title: Some("Black phone".into()),
        ..Default::default()
    };
    let err = h
        .engine
        .update_item(&item.id, &user("finder"), patch.clone())
        .unwrap_err();
    assert!(matches!(err, ClaimError::NotItemReporter));
    let updated = h.engine.update_item(&item.id, &user("owner"), patch).unwrap();
    assert_eq!(updated.details.title, "Black phone");
    assert_eq!(updated.status, ItemStatus::Open);

    let err = h.engine.delete_item(&item.id, &user("finder")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(h.engine.delete_item(&item.id, &user("owner")).unwrap(), 1);
    assert!(h.store.item(&item.id).is_none());
    assert!(h.store.claim(&claim.id).is_none());
}

// ── Read paths ──────────────────────────────────────────────────────────

#[test]
fn claimant_sees_answers_only_after_the_answer_step() {
    let h = harness();
    let item = lost_item(&h, "owner");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("finder"), questions("What brand?"))
        .unwrap();
    h.engine
        .answer_claim(
            &claim.id,
            &user("owner"),
            ClaimAnswers {
                answers: vec![AnswerEntry {
                    question_id: claim.questions[0].id,
                    answer: "Samsung".into(),
                }],
            },
        )
        .unwrap();

    let mine = h.engine.my_claim(&item.id, &user("finder")).unwrap();
    assert_eq!(mine.questions[0].answer.as_deref(), Some("Samsung"));
    assert_eq!(mine.claimant_role, PartyRole::Finder);

    let err = h.engine.my_claim(&item.id, &user("stranger")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn found_claim_answers_hidden_from_claimant_while_pending() {
    let h = harness();
    let item = found_item(&h, "finder");
    h.engine
        .submit_claim(
            &item.id,
            &user("owner"),
            ClaimSubmission {
                contacts: vec![Contact {
                    platform: Platform::Whatsapp,
                    value: "+62 811".into(),
                }],
                show_phone: true,
                ..answers("color?", "blue")
            },
        )
        .unwrap();

    let mine = h.engine.my_claim(&item.id, &user("owner")).unwrap();
    assert_eq!(mine.questions[0].answer, None);
    assert!(mine.contacts.is_empty());

    let listed = h.engine.claims_for_item(&item.id, &user("finder")).unwrap();
    assert_eq!(listed[0].questions[0].answer.as_deref(), Some("blue"));
    assert!(listed[0].contacts.is_empty());

    h.engine
        .decide_claim(&listed[0].id, &user("finder"), &decision("APPROVED"))
        .unwrap();
    let listed = h.engine.claims_for_item(&item.id, &user("finder")).unwrap();
    assert_eq!(listed[0].contacts.len(), 1);
}

#[test]
fn claim_listing_is_reporter_only() {
    let h = harness();
    let item = found_item(&h, "finder");
    let err = h
        .engine
        .claims_for_item(&item.id, &user("someone"))
        .unwrap_err();
    assert!(matches!(err, ClaimError::NotItemReporter));
}

#[test]
fn item_views_are_redacted_on_every_path() {
    let h = harness();
    let item = h
        .engine
        .report_found(&user("finder"), found_report(Some("secret-token")))
        .unwrap();
    h.engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();

    let single = h.engine.item(&item.id, &user("owner")).unwrap();
    let listed = h
        .engine
        .list_items(&ItemFilter::default(), &user("owner"), 0, 10)
        .unwrap();
    for view in [&single, &listed[0]] {
        assert_eq!(view.attached_qr, None);
        assert!(view.has_qr);
        assert_eq!(view.verifications[0].answer, None);
        assert_eq!(view.viewer_claim_status, Some(ClaimStatus::Pending));
    }

    let mine = h.engine.my_items(&user("finder")).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].attached_qr.as_deref(), Some("secret-token"));
    assert_eq!(mine[0].verifications[0].answer.as_deref(), Some("blue"));
}

#[test]
fn listing_filters_and_pages_newest_first() {
    let h = harness();
    let first = found_item(&h, "a");
    h.clock.advance(1);
    let second = lost_item(&h, "b");
    h.clock.advance(1);
    let third = found_item(&h, "c");

    let viewer = user("viewer");
    let all = h
        .engine
        .list_items(&ItemFilter::default(), &viewer, 0, 100)
        .unwrap();
    let ids: Vec<_> = all.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let found_only = ItemFilter {
        kind: Some(ItemType::Found),
        status: Some(ItemStatus::Open),
    };
    let page = h.engine.list_items(&found_only, &viewer, 1, 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, first.id);
}

#[test]
fn approved_claimant_finds_item_among_their_items() {
    let h = harness();
    let item = lost_item(&h, "owner");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("finder"), questions("Case colour?"))
        .unwrap();
    h.engine
        .answer_claim(
            &claim.id,
            &user("owner"),
            ClaimAnswers {
                answers: vec![AnswerEntry {
                    question_id: claim.questions[0].id,
                    answer: "Red".into(),
                }],
            },
        )
        .unwrap();
    h.engine
        .decide_claim(&claim.id, &user("finder"), &decision("APPROVED"))
        .unwrap();

    let mine = h.engine.my_items(&user("finder")).unwrap();
    assert_eq!(mine.len(), 1);
    let approved = mine[0].approved_claim.as_ref().unwrap();
    assert_eq!(approved.id, claim.id);
    assert_eq!(approved.status, ClaimStatus::Approved);
}

#[test]
fn single_claim_is_visible_to_its_parties_only() {
    let h = harness();
    let item = found_item(&h, "finder");
    let claim = h
        .engine
        .submit_claim(&item.id, &user("owner"), answers("color?", "blue"))
        .unwrap();

    let for_finder = h.engine.claim(&claim.id, &user("finder")).unwrap();
    assert_eq!(for_finder.questions[0].answer.as_deref(), Some("blue"));
    let for_claimant = h.engine.claim(&claim.id, &user("owner")).unwrap();
    assert_eq!(for_claimant.questions[0].answer, None);

    let err = h.engine.claim(&claim.id, &user("stranger")).unwrap_err();
    assert!(matches!(err, ClaimError::ClaimNotFound(_)));
}
