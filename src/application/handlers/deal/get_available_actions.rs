//! GetAvailableActionsHandler - Query handler for a deal's next statuses.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::deal::{DealError, DealStatus};
use crate::domain::foundation::{DealId, UserId};
use crate::ports::DealRepository;

use super::load_owned;

/// Query for the statuses a deal may move to next.
#[derive(Debug, Clone)]
pub struct GetAvailableActionsQuery {
    pub deal_id: DealId,
    pub user_id: UserId,
}

/// Current status and the allowed next statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableActions {
    pub status: DealStatus,
    pub available_actions: Vec<DealStatus>,
}

/// Handler deriving next available actions from the transition table.
pub struct GetAvailableActionsHandler {
    repository: Arc<dyn DealRepository>,
}

impl GetAvailableActionsHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetAvailableActionsQuery,
    ) -> Result<AvailableActions, DealError> {
        let deal = load_owned(self.repository.as_ref(), query.deal_id, &query.user_id).await?;
        Ok(AvailableActions {
            status: deal.status(),
            available_actions: deal.available_actions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    async fn actions_for(status: DealStatus) -> AvailableActions {
        let repo = repository();
        let deal = seed_deal(&repo, status).await;
        GetAvailableActionsHandler::new(repo)
            .handle(GetAvailableActionsQuery {
                deal_id: *deal.id(),
                user_id: creator(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn prospect_offers_outreach_or_decline() {
        let actions = actions_for(DealStatus::Prospect).await;
        assert_eq!(actions.status, DealStatus::Prospect);
        assert_eq!(
            actions.available_actions,
            vec![DealStatus::OutreachSent, DealStatus::Declined]
        );
    }

    #[tokio::test]
    async fn negotiation_offers_lock_or_decline() {
        let actions = actions_for(DealStatus::Negotiation).await;
        assert_eq!(
            actions.available_actions,
            vec![DealStatus::AgreementLocked, DealStatus::Declined]
        );
    }

    #[tokio::test]
    async fn terminal_statuses_offer_nothing() {
        assert!(actions_for(DealStatus::Paid).await.available_actions.is_empty());
        assert!(actions_for(DealStatus::Declined).await.available_actions.is_empty());
    }
}
