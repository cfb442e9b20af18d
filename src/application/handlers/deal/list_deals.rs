//! ListDealsHandler - Query handler for a creator's deals.

use std::sync::Arc;

use crate::domain::deal::{Deal, DealError, DealStatus};
use crate::domain::foundation::UserId;
use crate::ports::DealRepository;

/// Query for the caller's deals, optionally filtered by status.
#[derive(Debug, Clone)]
pub struct ListDealsQuery {
    pub user_id: UserId,
    pub status: Option<DealStatus>,
}

/// Handler for listing deals, most recently updated first.
pub struct ListDealsHandler {
    repository: Arc<dyn DealRepository>,
}

impl ListDealsHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListDealsQuery) -> Result<Vec<Deal>, DealError> {
        Ok(self
            .repository
            .list_by_creator(&query.user_id, query.status)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn lists_only_callers_deals() {
        let repo = repository();
        seed_deal(&repo, DealStatus::Prospect).await;
        seed_deal(&repo, DealStatus::Negotiation).await;
        let handler = ListDealsHandler::new(repo);

        let mine = handler
            .handle(ListDealsQuery {
                user_id: creator(),
                status: None,
            })
            .await
            .unwrap();
        let theirs = handler
            .handle(ListDealsQuery {
                user_id: stranger(),
                status: None,
            })
            .await
            .unwrap();

        assert_eq!(mine.len(), 2);
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn filters_by_status() {
        let repo = repository();
        seed_deal(&repo, DealStatus::Prospect).await;
        let negotiating = seed_deal(&repo, DealStatus::Negotiation).await;
        let handler = ListDealsHandler::new(repo);

        let result = handler
            .handle(ListDealsQuery {
                user_id: creator(),
                status: Some(DealStatus::Negotiation),
            })
            .await
            .unwrap();

        assert_eq!(result, vec![negotiating]);
    }
}
