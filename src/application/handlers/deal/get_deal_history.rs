//! GetDealHistoryHandler - Query handler for a deal's journals.

use std::sync::Arc;

use crate::domain::deal::{ConversationLog, DealActivity, DealError};
use crate::domain::foundation::{DealId, UserId};
use crate::ports::DealRepository;

use super::load_owned;

/// Query for a deal's activity trail and conversation log.
#[derive(Debug, Clone)]
pub struct GetDealHistoryQuery {
    pub deal_id: DealId,
    pub user_id: UserId,
}

/// Both journals of a deal, oldest entry first.
#[derive(Debug, Clone, PartialEq)]
pub struct DealHistory {
    pub activities: Vec<DealActivity>,
    pub conversations: Vec<ConversationLog>,
}

/// Handler for reading deal history.
pub struct GetDealHistoryHandler {
    repository: Arc<dyn DealRepository>,
}

impl GetDealHistoryHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetDealHistoryQuery) -> Result<DealHistory, DealError> {
        load_owned(self.repository.as_ref(), query.deal_id, &query.user_id).await?;

        let activities = self.repository.list_activities(&query.deal_id).await?;
        let conversations = self.repository.list_conversations(&query.deal_id).await?;

        Ok(DealHistory {
            activities,
            conversations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::deal::{ActivityType, DealStatus};

    #[tokio::test]
    async fn returns_activities_in_commit_order() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Paid).await;
        let handler = GetDealHistoryHandler::new(repo);

        let history = handler
            .handle(GetDealHistoryQuery {
                deal_id: *deal.id(),
                user_id: creator(),
            })
            .await
            .unwrap();

        let types: Vec<_> = history.activities.iter().map(|a| a.activity_type).collect();
        assert_eq!(types.len(), 6);
        assert_eq!(types[0], ActivityType::DealCreated);
        assert!(types[1..].iter().all(|t| *t == ActivityType::StatusChange));
        assert!(history.conversations.is_empty());
    }

    #[tokio::test]
    async fn stranger_cannot_read_history() {
        let repo = repository();
        let deal = seed_deal(&repo, DealStatus::Prospect).await;
        let handler = GetDealHistoryHandler::new(repo);

        let result = handler
            .handle(GetDealHistoryQuery {
                deal_id: *deal.id(),
                user_id: stranger(),
            })
            .await;

        assert_eq!(result.unwrap_err(), DealError::Forbidden);
    }
}
