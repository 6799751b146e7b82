//! Suppression purge: authenticate, list, delete a prefix of the list, re-list.
//!
//! Deletions are issued one at a time in server order and a failed deletion
//! never stops the batch. Every attempt ends up in the returned [`PurgeReport`].
//!
//! A run is split in two phases so callers can report the listed count before
//! anything is deleted: [`PurgeService::prepare`] logs in and lists,
//! [`PurgeService::execute`] deletes and re-lists.

use std::sync::Arc;

use suppressor_core::{AppError, AppResult, Credentials, SessionToken};
use suppressor_domain::{DeletionLimit, Suppression};
use tracing::{debug, info, warn};

use crate::SuppressionGateway;

#[cfg(test)]
mod tests;

/// Validated input for one purge run.
#[derive(Debug, Clone)]
pub struct PurgeRequest {
    credentials: Credentials,
    limit: DeletionLimit,
}

impl PurgeRequest {
    /// Creates a request from a raw limit argument.
    ///
    /// The limit is parsed here so a malformed value is rejected before any
    /// network call is made.
    pub fn new(credentials: Credentials, raw_limit: &str) -> AppResult<Self> {
        let limit = raw_limit.parse::<DeletionLimit>()?;
        Ok(Self::with_limit(credentials, limit))
    }

    /// Creates a request from an already parsed limit.
    #[must_use]
    pub fn with_limit(credentials: Credentials, limit: DeletionLimit) -> Self {
        Self { credentials, limit }
    }

    /// Returns the credentials used to log in.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the deletion limit.
    #[must_use]
    pub fn limit(&self) -> DeletionLimit {
        self.limit
    }
}

/// Result of a single deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStatus {
    /// The API accepted the deletion.
    Deleted,
    /// The request failed; the batch continued.
    Failed {
        /// Error reported by the gateway.
        reason: String,
    },
}

/// One processed suppression and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    /// Policy the suppression belonged to.
    pub policy_id: String,
    /// Suppression identifier.
    pub suppression_id: String,
    /// Deletion result.
    pub status: DeletionStatus,
}

/// Summary of a completed purge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    /// Limit the run was executed with.
    pub limit: DeletionLimit,
    /// Number of suppressions listed before deleting.
    pub count_before: usize,
    /// Number of suppressions listed after deleting.
    pub count_after: usize,
    /// Outcomes in the order deletions were issued.
    pub outcomes: Vec<DeletionOutcome>,
}

impl PurgeReport {
    /// Number of suppressions the API confirmed as deleted.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == DeletionStatus::Deleted)
            .count()
    }

    /// Number of failed deletion attempts.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.deleted_count()
    }

    /// Iterates over failed attempts only.
    pub fn failures(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, DeletionStatus::Failed { .. }))
    }
}

/// Suppressions listed after login, ready to be purged.
#[derive(Debug)]
pub struct PurgePlan {
    token: SessionToken,
    limit: DeletionLimit,
    suppressions: Vec<Suppression>,
}

impl PurgePlan {
    /// Number of suppressions listed before any deletion.
    #[must_use]
    pub fn count_before(&self) -> usize {
        self.suppressions.len()
    }

    /// Leading suppressions the limit selects for deletion.
    #[must_use]
    pub fn selected(&self) -> &[Suppression] {
        self.limit.select(&self.suppressions)
    }
}

/// Application service orchestrating a purge run.
#[derive(Clone)]
pub struct PurgeService {
    gateway: Arc<dyn SuppressionGateway>,
}

impl PurgeService {
    /// Creates a new purge service.
    #[must_use]
    pub fn new(gateway: Arc<dyn SuppressionGateway>) -> Self {
        Self { gateway }
    }

    /// Executes one purge run: [`Self::prepare`] followed by [`Self::execute`].
    pub async fn run(&self, request: &PurgeRequest) -> AppResult<PurgeReport> {
        let plan = self.prepare(request).await?;
        self.execute(plan).await
    }

    /// Logs in and lists the suppressions. Both failures are fatal.
    pub async fn prepare(&self, request: &PurgeRequest) -> AppResult<PurgePlan> {
        let credentials = request.credentials();
        let token = self
            .gateway
            .login(credentials.access_key(), credentials.secret_key())
            .await?;
        info!("authenticated");

        let suppressions = self.gateway.list_suppressions(&token).await?;
        info!(count = suppressions.len(), limit = %request.limit(), "listed suppressions");

        Ok(PurgePlan {
            token,
            limit: request.limit(),
            suppressions,
        })
    }

    /// Deletes the selected suppressions in order, then lists again.
    ///
    /// Deletion failures are recorded in the report. A failed re-listing is
    /// fatal and its error carries the before count and the deletion tally.
    pub async fn execute(&self, plan: PurgePlan) -> AppResult<PurgeReport> {
        let selected = plan.selected();
        let mut outcomes = Vec::with_capacity(selected.len());
        for suppression in selected {
            outcomes.push(self.delete_one(&plan.token, suppression).await);
        }

        let report = PurgeReport {
            limit: plan.limit,
            count_before: plan.count_before(),
            count_after: 0,
            outcomes,
        };

        let remaining = self
            .gateway
            .list_suppressions(&plan.token)
            .await
            .map_err(|error| {
                AppError::Upstream(format!(
                    "failed to list suppressions after deleting {} of {} ({} failed, {} before deletion): {error}",
                    report.deleted_count(),
                    report.outcomes.len(),
                    report.failed_count(),
                    report.count_before
                ))
            })?;

        Ok(PurgeReport {
            count_after: remaining.len(),
            ..report
        })
    }

    async fn delete_one(
        &self,
        token: &SessionToken,
        suppression: &Suppression,
    ) -> DeletionOutcome {
        debug!(
            policy_id = %suppression.policy_id(),
            suppression_id = %suppression.id(),
            "deleting suppression"
        );

        let status = match self
            .gateway
            .delete_suppression(token, suppression.policy_id(), suppression.id())
            .await
        {
            Ok(()) => DeletionStatus::Deleted,
            Err(error) => {
                warn!(
                    policy_id = %suppression.policy_id(),
                    suppression_id = %suppression.id(),
                    error = %error,
                    "suppression deletion failed, continuing"
                );
                DeletionStatus::Failed {
                    reason: error.to_string(),
                }
            }
        };

        DeletionOutcome {
            policy_id: suppression.policy_id().to_owned(),
            suppression_id: suppression.id().to_owned(),
            status,
        }
    }
}
