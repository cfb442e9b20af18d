//! Shared fixtures for deal handler tests.

use std::sync::Arc;

use crate::adapters::memory::InMemoryDealRepository;
use crate::domain::deal::{terms_fixtures::valid_terms, Deal, DealStatus};
use crate::domain::foundation::{CommandMetadata, UserId};
use crate::ports::DealRepository;

pub fn creator() -> UserId {
    UserId::new("creator-123").unwrap()
}

pub fn stranger() -> UserId {
    UserId::new("someone-else").unwrap()
}

pub fn metadata() -> CommandMetadata {
    CommandMetadata::new(creator()).with_correlation_id("test-correlation")
}

/// Persists a fresh deal and walks it to `status` through the repository.
pub async fn seed_deal(repo: &InMemoryDealRepository, status: DealStatus) -> Deal {
    let (mut deal, activity) =
        Deal::create(creator(), "TikTok x2 + IG story".to_string(), None, None).unwrap();
    repo.create(&deal, &activity).await.unwrap();

    let path = [
        DealStatus::OutreachSent,
        DealStatus::Negotiation,
        DealStatus::AgreementLocked,
        DealStatus::Invoiced,
        DealStatus::Paid,
    ];
    if status == DealStatus::Declined {
        let t = deal.transition(DealStatus::Declined, None, &creator()).unwrap();
        repo.commit_transition(&deal, &t).await.unwrap();
        return deal;
    }
    for step in path {
        if deal.status() == status {
            break;
        }
        let t = if step == DealStatus::AgreementLocked {
            deal.lock_agreement(&valid_terms(), &creator()).unwrap()
        } else {
            deal.transition(step, None, &creator()).unwrap()
        };
        repo.commit_transition(&deal, &t).await.unwrap();
    }
    deal
}

pub fn repository() -> Arc<InMemoryDealRepository> {
    Arc::new(InMemoryDealRepository::new())
}
