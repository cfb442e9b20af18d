//! CreateDealHandler - Command handler for opening a new deal.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::deal::{Deal, DealActivity, DealError};
use crate::domain::foundation::{BrandId, CommandMetadata};
use crate::ports::DealRepository;

/// Command to open a deal in `Prospect`.
#[derive(Debug, Clone)]
pub struct CreateDealCommand {
    pub title: String,
    pub brand_id: Option<BrandId>,
    pub proposed_amount: Option<Decimal>,
}

/// Result of successful deal creation.
#[derive(Debug, Clone)]
pub struct CreateDealResult {
    pub deal: Deal,
    pub activity: DealActivity,
}

/// Handler for creating deals.
pub struct CreateDealHandler {
    repository: Arc<dyn DealRepository>,
}

impl CreateDealHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: CreateDealCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateDealResult, DealError> {
        let (deal, activity) = Deal::create(
            metadata.user_id.clone(),
            cmd.title,
            cmd.brand_id,
            cmd.proposed_amount,
        )?;

        self.repository.create(&deal, &activity).await?;

        tracing::info!(
            deal_id = %deal.id(),
            creator_id = %deal.creator_id(),
            correlation_id = %metadata.correlation_id(),
            "Deal created"
        );

        Ok(CreateDealResult { deal, activity })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::deal::{ActivityType, ConversationLog, DealStatus, StatusTransition};
    use crate::domain::foundation::{DealId, DomainError, ErrorCode, UserId};
    use async_trait::async_trait;

    struct FailingRepository;

    #[async_trait]
    impl DealRepository for FailingRepository {
        async fn create(&self, _: &Deal, _: &DealActivity) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "Simulated insert failure"))
        }
        async fn find_by_id(&self, _: &DealId) -> Result<Option<Deal>, DomainError> {
            Ok(None)
        }
        async fn list_by_creator(
            &self,
            _: &UserId,
            _: Option<DealStatus>,
        ) -> Result<Vec<Deal>, DomainError> {
            Ok(vec![])
        }
        async fn commit_transition(&self, _: &Deal, _: &StatusTransition) -> Result<(), DomainError> {
            Ok(())
        }
        async fn append_conversation(
            &self,
            _: &ConversationLog,
            _: &DealActivity,
        ) -> Result<(), DomainError> {
            Ok(())
        }
        async fn list_conversations(&self, _: &DealId) -> Result<Vec<ConversationLog>, DomainError> {
            Ok(vec![])
        }
        async fn list_activities(&self, _: &DealId) -> Result<Vec<DealActivity>, DomainError> {
            Ok(vec![])
        }
        async fn delete(&self, _: &DealId) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn command(title: &str) -> CreateDealCommand {
        CreateDealCommand {
            title: title.to_string(),
            brand_id: Some(BrandId::new()),
            proposed_amount: Some(Decimal::new(200000, 2)),
        }
    }

    #[tokio::test]
    async fn creates_prospect_owned_by_caller() {
        let repo = repository();
        let handler = CreateDealHandler::new(repo.clone());

        let result = handler.handle(command("Summer launch"), metadata()).await.unwrap();

        assert_eq!(result.deal.status(), DealStatus::Prospect);
        assert_eq!(result.deal.creator_id(), &creator());
        assert_eq!(result.deal.proposed_amount(), Some(Decimal::new(2000, 0)));
        assert!(repo.find_by_id(result.deal.id()).await.unwrap().is_some());

        let activities = repo.list_activities(result.deal.id()).await.unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity_type, ActivityType::DealCreated);
        assert_eq!(activities[0].actor, creator());
    }

    #[tokio::test]
    async fn fails_with_blank_title() {
        let repo = repository();
        let handler = CreateDealHandler::new(repo.clone());

        let result = handler.handle(command("  "), metadata()).await;

        assert!(matches!(result, Err(DealError::ValidationFailed { .. })));
        assert!(repo.list_by_creator(&creator(), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn surfaces_storage_failure_as_infrastructure() {
        let handler = CreateDealHandler::new(Arc::new(FailingRepository));

        let result = handler.handle(command("Summer launch"), metadata()).await;

        assert!(matches!(result, Err(DealError::Infrastructure(_))));
    }
}
