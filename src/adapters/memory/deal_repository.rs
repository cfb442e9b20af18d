//! In-memory implementation of DealRepository.
//!
//! All state sits behind one mutex, so every write is atomic with respect
//! to every other and the compare-and-swap in `commit_transition` has the
//! same semantics as the Postgres `UPDATE ... WHERE version = $n`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::deal::{ConversationLog, Deal, DealActivity, DealStatus, StatusTransition};
use crate::domain::foundation::{DealId, DomainError, ErrorCode, UserId};
use crate::ports::DealRepository;

#[derive(Default)]
struct Store {
    deals: HashMap<DealId, Deal>,
    conversations: Vec<ConversationLog>,
    activities: Vec<DealActivity>,
}

/// Mutex-backed deal store.
#[derive(Default)]
pub struct InMemoryDealRepository {
    store: Mutex<Store>,
}

impl InMemoryDealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, DomainError> {
        self.store
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "Deal store lock poisoned"))
    }
}

fn not_found(id: &DealId) -> DomainError {
    DomainError::new(ErrorCode::DealNotFound, format!("Deal not found: {}", id))
}

#[async_trait]
impl DealRepository for InMemoryDealRepository {
    async fn create(&self, deal: &Deal, activity: &DealActivity) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        if store.deals.contains_key(deal.id()) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Deal already exists: {}", deal.id()),
            ));
        }
        store.deals.insert(*deal.id(), deal.clone());
        store.activities.push(activity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DealId) -> Result<Option<Deal>, DomainError> {
        Ok(self.lock()?.deals.get(id).cloned())
    }

    async fn list_by_creator(
        &self,
        creator_id: &UserId,
        status: Option<DealStatus>,
    ) -> Result<Vec<Deal>, DomainError> {
        let store = self.lock()?;
        let mut deals: Vec<Deal> = store
            .deals
            .values()
            .filter(|d| d.creator_id() == creator_id)
            .filter(|d| status.map_or(true, |s| d.status() == s))
            .cloned()
            .collect();
        deals.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(deals)
    }

    async fn commit_transition(
        &self,
        deal: &Deal,
        transition: &StatusTransition,
    ) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        let stored = store.deals.get(deal.id()).ok_or_else(|| not_found(deal.id()))?;

        if stored.status() != transition.from || stored.version() != transition.expected_version {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("Deal {} was modified concurrently", deal.id()),
            )
            .with_detail("expected_version", transition.expected_version.to_string())
            .with_detail("actual_version", stored.version().to_string()));
        }
        if stored.terms_snapshot().is_some() && stored.terms_snapshot() != deal.terms_snapshot() {
            return Err(DomainError::new(
                ErrorCode::TermsAlreadyLocked,
                format!("Deal {} already has locked terms", deal.id()),
            ));
        }

        store.deals.insert(*deal.id(), deal.clone());
        store.activities.push(transition.activity.clone());
        Ok(())
    }

    async fn append_conversation(
        &self,
        log: &ConversationLog,
        activity: &DealActivity,
    ) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        if !store.deals.contains_key(&log.deal_id) {
            return Err(not_found(&log.deal_id));
        }
        store.conversations.push(log.clone());
        store.activities.push(activity.clone());
        Ok(())
    }

    async fn list_conversations(
        &self,
        deal_id: &DealId,
    ) -> Result<Vec<ConversationLog>, DomainError> {
        Ok(self
            .lock()?
            .conversations
            .iter()
            .filter(|c| &c.deal_id == deal_id)
            .cloned()
            .collect())
    }

    async fn list_activities(&self, deal_id: &DealId) -> Result<Vec<DealActivity>, DomainError> {
        Ok(self
            .lock()?
            .activities
            .iter()
            .filter(|a| &a.deal_id == deal_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &DealId) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        if store.deals.remove(id).is_none() {
            return Err(not_found(id));
        }
        store.conversations.retain(|c| &c.deal_id != id);
        store.activities.retain(|a| &a.deal_id != id);
        Ok(())
    }
}
