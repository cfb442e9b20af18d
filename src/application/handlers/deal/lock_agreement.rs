//! LockAgreementHandler - Command handler for locking negotiated terms.
//!
//! The status is checked before the terms document is parsed, so a deal
//! outside `Negotiation` always reports `InvalidTransition` regardless of
//! what was submitted.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::domain::deal::{AgreementTerms, Deal, DealActivity, DealError, DealStatus};
use crate::domain::foundation::{CommandMetadata, DealId, StateMachine};
use crate::ports::DealRepository;

use super::load_owned;

/// Command to lock a deal's agreement.
#[derive(Debug, Clone)]
pub struct LockAgreementCommand {
    pub deal_id: DealId,
    /// Raw terms document as submitted.
    pub terms: JsonValue,
}

/// Result of a committed lock.
#[derive(Debug, Clone)]
pub struct LockAgreementResult {
    pub deal: Deal,
    pub activity: DealActivity,
}

/// Handler for agreement locking.
pub struct LockAgreementHandler {
    repository: Arc<dyn DealRepository>,
}

impl LockAgreementHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: LockAgreementCommand,
        metadata: CommandMetadata,
    ) -> Result<LockAgreementResult, DealError> {
        let actor = &metadata.user_id;
        let mut deal = load_owned(self.repository.as_ref(), cmd.deal_id, actor).await?;

        if !deal.status().can_transition_to(&DealStatus::AgreementLocked) {
            return Err(DealError::invalid_transition(
                deal.status(),
                DealStatus::AgreementLocked,
            ));
        }
        let terms = AgreementTerms::from_json(cmd.terms)?;

        let transition = deal.lock_agreement(&terms, actor)?;

        self.repository
            .commit_transition(&deal, &transition)
            .await
            .map_err(|e| {
                tracing::warn!(deal_id = %cmd.deal_id, error = %e, "Agreement lock not committed");
                DealError::for_deal(cmd.deal_id)(e)
            })?;

        tracing::info!(
            deal_id = %cmd.deal_id,
            agreed_amount = ?deal.agreed_amount(),
            correlation_id = %metadata.correlation_id(),
            "Agreement locked"
        );

        Ok(LockAgreementResult {
            deal,
            activity: transition.activity,
        })
    }
}
