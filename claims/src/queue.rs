//! Port to the external matching collaborator.

use reclaim_types::Item;

/// Accepts freshly reported FOUND items for candidate matching.
///
/// `enqueue` must return promptly and must not fail: the report has already
/// been committed and matching has no bearing on it.
pub trait MatchQueue: Send + Sync {
    fn enqueue(&self, item: &Item);
}
