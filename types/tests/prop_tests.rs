use proptest::prelude::*;

use reclaim_types::{Claim, ClaimId, ClaimStatus, ClaimFlow, ItemId, ItemStatus, Timestamp, UserId};

fn any_item_status() -> impl Strategy<Value = ItemStatus> {
    prop_oneof![
        Just(ItemStatus::Open),
        Just(ItemStatus::Claimed),
        Just(ItemStatus::Resolved),
    ]
}

fn rank(s: ItemStatus) -> u8 {
    match s {
        ItemStatus::Open => 0,
        ItemStatus::Claimed => 1,
        ItemStatus::Resolved => 2,
    }
}

proptest! {
    /// Whatever sequence of transitions is attempted, the status never moves backwards.
    #[test]
    fn item_status_is_monotonic(steps in prop::collection::vec(any_item_status(), 0..16)) {
        let mut current = ItemStatus::Open;
        for next in steps {
            if current.can_advance_to(next) {
                prop_assert!(rank(next) > rank(current));
                current = next;
            } else {
                prop_assert!(rank(next) <= rank(current));
            }
        }
    }

    /// Any non-empty, control-free identity of bounded length is accepted verbatim.
    #[test]
    fn user_ids_are_kept_verbatim(raw in "[ -~]{1,64}") {
        let id = UserId::new(raw.clone()).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    /// Claims survive the storage encoding unchanged.
    #[test]
    fn claim_bincode_roundtrip(note in ".{0,40}", show_phone in any::<bool>(), secs in 0u64..4_000_000_000) {
        let claim = Claim {
            id: ClaimId::generate(),
            item_id: ItemId::generate(),
            claimant_id: UserId::new("claimant").unwrap(),
            flow: ClaimFlow::Found,
            status: ClaimStatus::PendingApproval,
            questions: Vec::new(),
            contacts: Vec::new(),
            note,
            show_phone,
            created_at: Timestamp::new(secs),
            decided_at: None,
        };
        let encoded = bincode::serialize(&claim).unwrap();
        let decoded: Claim = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, claim);
    }
}
