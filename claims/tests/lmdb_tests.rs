//! Claim lifecycle against the LMDB backend, including concurrent submission.

use std::sync::{Arc, Barrier};
use std::thread;

use reclaim_claims::{
    AnswerEntry, AnswerInput, ClaimAnswers, ClaimEngine, ClaimError, ClaimSubmission,
    DecisionPayload, ErrorKind, FoundItemReport, LostItemReport, QuestionInput,
};
use reclaim_nullables::{NullClock, NullMatchQueue, NullNotifier};
use reclaim_store_lmdb::LmdbStore;
use reclaim_types::{ClaimStatus, ItemStatus, UserId, Verification};
use uuid::Uuid;

const MAP_SIZE: usize = 10 * 1024 * 1024;
const SUBMITTERS: usize = 16;

fn engine(dir: &tempfile::TempDir) -> ClaimEngine<LmdbStore> {
    let store = Arc::new(LmdbStore::open(dir.path(), MAP_SIZE).expect("failed to open store"));
    ClaimEngine::new(
        store,
        Arc::new(NullNotifier::new()),
        Arc::new(NullMatchQueue::new()),
        Arc::new(NullClock::default()),
    )
}

fn user(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

fn found_report() -> FoundItemReport {
    FoundItemReport {
        title: "Blue umbrella".into(),
        description: String::new(),
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
        attached_qr: None,
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
        offer_reward: false,
        cod: false,
        show_phone: false,
        contacts: Vec::new(),
    }
}

fn decision(status: &str) -> DecisionPayload {
    DecisionPayload {
        status: status.into(),
    }
}

#[test]
fn concurrent_submissions_by_one_claimant_store_a_single_claim() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir);
    let item = engine.report_found(&user("finder"), found_report()).unwrap();
    let barrier = Barrier::new(SUBMITTERS);
    let (engine_ref, barrier_ref, item_id) = (&engine, &barrier, item.id);

    let results: Vec<Result<_, ClaimError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..SUBMITTERS)
            .map(|_| {
                s.spawn(move || {
                    let submission = ClaimSubmission {
                        answers: vec![AnswerInput {
                            question: "color?".into(),
                            answer: "blue".into(),
                        }],
                        ..Default::default()
                    };
                    barrier_ref.wait();
                    engine_ref.submit_claim(&item_id, &user("claimant"), submission)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(err, ClaimError::DuplicateClaim), "unexpected error: {err:?}");
    }

    let claims = engine.claims_for_item(&item.id, &user("finder")).unwrap();
    assert_eq!(claims.len(), 1);
}

#[test]
fn lost_item_flow_persists_through_lmdb() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(&dir);
    let item = engine.report_lost(&user("U3"), lost_report()).unwrap();

    let claim = engine
        .submit_claim(
            &item.id,
            &user("U4"),
            ClaimSubmission {
                questions: vec![QuestionInput {
                    question: "What brand?".into(),
                }],
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(claim.status, ClaimStatus::Pending);

    let early = engine
        .decide_claim(&claim.id, &user("U4"), &decision("APPROVED"))
        .unwrap_err();
    assert_eq!(early.kind(), ErrorKind::Conflict);

    engine
        .answer_claim(
            &claim.id,
            &user("U3"),
            ClaimAnswers {
                answers: vec![AnswerEntry {
                    question_id: claim.questions[0].id,
                    answer: "Samsung".into(),
                }],
            },
        )
        .unwrap();
    let decided = engine
        .decide_claim(&claim.id, &user("U4"), &decision("APPROVED"))
        .unwrap();
    assert_eq!(decided.status, ClaimStatus::Approved);

    let mine = engine.my_items(&user("U4")).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, ItemStatus::Claimed);
}
