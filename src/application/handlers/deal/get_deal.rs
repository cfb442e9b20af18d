//! GetDealHandler - Query handler for a single deal.

use std::sync::Arc;

use crate::domain::deal::{Deal, DealError};
use crate::domain::foundation::{DealId, UserId};
use crate::ports::DealRepository;

use super::load_owned;

/// Query to get a deal by ID.
#[derive(Debug, Clone)]
pub struct GetDealQuery {
    pub deal_id: DealId,
    pub user_id: UserId,
}

/// Handler for retrieving a deal.
pub struct GetDealHandler {
    repository: Arc<dyn DealRepository>,
}

impl GetDealHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetDealQuery) -> Result<Deal, DealError> {
        load_owned(self.repository.as_ref(), query.deal_id, &query.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::deal::DealStatus;

    #[tokio::test]
    async fn returns_owned_deal() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Negotiation).await;
        let handler = GetDealHandler::new(repo);

        let found = handler
            .handle(GetDealQuery {
                deal_id: *deal.id(),
                user_id: creator(),
            })
            .await
            .unwrap();

        assert_eq!(found, deal);
    }

    #[tokio::test]
    async fn hides_other_creators_deals() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Prospect).await;
        let handler = GetDealHandler::new(repo);

        let result = handler
            .handle(GetDealQuery {
                deal_id: *deal.id(),
                user_id: stranger(),
            })
            .await;

        assert_eq!(result.unwrap_err(), DealError::Forbidden);
    }

    #[tokio::test]
    async fn missing_deal_is_not_found() {
        let handler = GetDealHandler::new(repository());
        let id = DealId::new();

        let result = handler
            .handle(GetDealQuery {
                deal_id: id,
                user_id: creator(),
            })
            .await;

        assert_eq!(result.unwrap_err(), DealError::NotFound(id));
    }
}
