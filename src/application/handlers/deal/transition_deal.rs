//! TransitionDealHandler - Command handler for moving a deal along the pipeline.

use std::sync::Arc;

use crate::domain::deal::{Deal, DealActivity, DealError, DealStatus};
use crate::domain::foundation::{CommandMetadata, DealId, InvoiceId};
use crate::ports::DealRepository;

use super::load_owned;

/// Command to move a deal to another status.
#[derive(Debug, Clone)]
pub struct TransitionDealCommand {
    pub deal_id: DealId,
    pub to: DealStatus,
    pub notes: Option<String>,
    /// Only accepted when moving to `Invoiced`.
    pub invoice_id: Option<InvoiceId>,
}

/// Result of a committed transition.
#[derive(Debug, Clone)]
pub struct TransitionDealResult {
    pub deal: Deal,
    pub activity: DealActivity,
}

/// Handler for status transitions.
pub struct TransitionDealHandler {
    repository: Arc<dyn DealRepository>,
}

impl TransitionDealHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: TransitionDealCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionDealResult, DealError> {
        let actor = &metadata.user_id;
        let mut deal = load_owned(self.repository.as_ref(), cmd.deal_id, actor).await?;

        let transition = match cmd.invoice_id {
            Some(invoice_id) if cmd.to == DealStatus::Invoiced => {
                deal.transition_with_invoice(invoice_id, cmd.notes, actor)?
            }
            Some(_) => {
                return Err(DealError::validation(
                    "invoice_id",
                    "only allowed when moving to INVOICED",
                ))
            }
            None => deal.transition(cmd.to, cmd.notes, actor)?,
        };

        self.repository
            .commit_transition(&deal, &transition)
            .await
            .map_err(|e| {
                tracing::warn!(deal_id = %cmd.deal_id, error = %e, "Transition not committed");
                DealError::for_deal(cmd.deal_id)(e)
            })?;

        tracing::info!(
            deal_id = %cmd.deal_id,
            from = %transition.from,
            to = %transition.to,
            correlation_id = %metadata.correlation_id(),
            "Deal transitioned"
        );

        Ok(TransitionDealResult {
            deal,
            activity: transition.activity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::deal::ActivityType;

    fn command(deal_id: DealId, to: DealStatus) -> TransitionDealCommand {
        TransitionDealCommand {
            deal_id,
            to,
            notes: None,
            invoice_id: None,
        }
    }

    #[tokio::test]
    async fn moves_prospect_to_outreach_sent() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Prospect).await;
        let handler = TransitionDealHandler::new(repo.clone());

        let result = handler
            .handle(command(*deal.id(), DealStatus::OutreachSent), metadata())
            .await
            .unwrap();

        assert_eq!(result.deal.status(), DealStatus::OutreachSent);
        assert!(result.deal.lifecycle().outreach_sent_at.is_some());
        assert_eq!(result.activity.activity_type, ActivityType::StatusChange);

        let stored = repo.find_by_id(deal.id()).await.unwrap().unwrap();
        assert_eq!(stored, result.deal);
        assert_eq!(repo.list_activities(deal.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn agreement_locked_is_not_reachable_without_terms() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Negotiation).await;
        let handler = TransitionDealHandler::new(repo.clone());

        let result = handler
            .handle(command(*deal.id(), DealStatus::AgreementLocked), metadata())
            .await;

        assert!(matches!(
            result.unwrap_err(),
            DealError::ValidationFailed { ref field, .. } if field == "to"
        ));
        let stored = repo.find_by_id(deal.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DealStatus::Negotiation);
        assert!(stored.terms_snapshot().is_none());
        assert_eq!(stored.version(), deal.version());
    }

    #[tokio::test]
    async fn rejects_skipping_ahead_without_writing() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Prospect).await;
        let handler = TransitionDealHandler::new(repo.clone());

        let result = handler
            .handle(command(*deal.id(), DealStatus::Invoiced), metadata())
            .await;

        assert_eq!(
            result.unwrap_err(),
            DealError::invalid_transition(DealStatus::Prospect, DealStatus::Invoiced)
        );
        let stored = repo.find_by_id(deal.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DealStatus::Prospect);
        assert_eq!(repo.list_activities(deal.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn decline_records_reason() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Negotiation).await;
        let handler = TransitionDealHandler::new(repo.clone());

        let mut cmd = command(*deal.id(), DealStatus::Declined);
        cmd.notes = Some("Budget too low".to_string());
        let result = handler.handle(cmd, metadata()).await.unwrap();

        assert_eq!(result.deal.lost_reason(), Some("Budget too low"));
        assert!(result.deal.lifecycle().closed_at.is_some());
        assert!(result.deal.terms_snapshot().is_none());
    }

    #[tokio::test]
    async fn invoicing_attaches_invoice_reference() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::AgreementLocked).await;
        let handler = TransitionDealHandler::new(repo.clone());
        let invoice_id = InvoiceId::new();

        let mut cmd = command(*deal.id(), DealStatus::Invoiced);
        cmd.invoice_id = Some(invoice_id);
        let result = handler.handle(cmd, metadata()).await.unwrap();

        assert_eq!(result.deal.invoice_id(), Some(&invoice_id));
        assert!(result.deal.lifecycle().invoiced_at.is_some());
    }

    #[tokio::test]
    async fn invoice_reference_outside_invoicing_is_rejected() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Prospect).await;
        let handler = TransitionDealHandler::new(repo.clone());

        let mut cmd = command(*deal.id(), DealStatus::OutreachSent);
        cmd.invoice_id = Some(InvoiceId::new());
        let result = handler.handle(cmd, metadata()).await;

        assert!(matches!(
            result,
            Err(DealError::ValidationFailed { ref field, .. }) if field == "invoice_id"
        ));
    }

    #[tokio::test]
    async fn second_identical_request_fails() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::AgreementLocked).await;
        let handler = TransitionDealHandler::new(repo.clone());

        handler
            .handle(command(*deal.id(), DealStatus::Invoiced), metadata())
            .await
            .unwrap();
        let again = handler
            .handle(command(*deal.id(), DealStatus::Invoiced), metadata())
            .await;

        assert!(matches!(again, Err(DealError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn paid_deal_cannot_be_declined() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Paid).await;
        let handler = TransitionDealHandler::new(repo.clone());

        let result = handler
            .handle(command(*deal.id(), DealStatus::Declined), metadata())
            .await;

        assert_eq!(
            result.unwrap_err(),
            DealError::invalid_transition(DealStatus::Paid, DealStatus::Declined)
        );
    }

    #[tokio::test]
    async fn fails_when_deal_not_found() {
        let handler = TransitionDealHandler::new(repository());
        let id = DealId::new();

        let result = handler
            .handle(command(id, DealStatus::OutreachSent), metadata())
            .await;

        assert_eq!(result.unwrap_err(), DealError::NotFound(id));
    }

    #[tokio::test]
    async fn fails_when_not_owner() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Prospect).await;
        let handler = TransitionDealHandler::new(repo.clone());

        let result = handler
            .handle(
                command(*deal.id(), DealStatus::OutreachSent),
                CommandMetadata::new(stranger()),
            )
            .await;

        assert_eq!(result.unwrap_err(), DealError::Forbidden);
        let stored = repo.find_by_id(deal.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DealStatus::Prospect);
    }
}
