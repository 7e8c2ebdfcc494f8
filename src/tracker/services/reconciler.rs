//! Roster reconciliation service.

use super::TrackerServiceResult;
use crate::tracker::{
    domain::{ReconcileSummary, RosterEntry},
    ports::ServerRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Merges the current roster into the persisted server set.
#[derive(Clone)]
pub struct RosterReconciler<R, C>
where
    R: ServerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> RosterReconciler<R, C>
where
    R: ServerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a reconciler.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates, refreshes and unlists servers so the persisted set mirrors
    /// `roster`. Rows are never deleted.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerServiceError::Repository`] when the merge
    /// fails; no change is applied in that case.
    pub async fn reconcile(
        &self,
        roster: &[RosterEntry],
    ) -> TrackerServiceResult<ReconcileSummary> {
        let summary = self.repository.reconcile(roster, self.clock.utc()).await?;
        info!(
            roster = roster.len(),
            created = summary.created,
            updated = summary.updated,
            unlisted = summary.unlisted,
            "reconciled roster"
        );
        Ok(summary)
    }
}
