//! Deal repository port.
//!
//! Defines the contract for persisting Deal aggregates and their journals.
//!
//! # Design
//!
//! - **Atomic writes**: every mutation commits the deal row together with
//!   its activity entry, or neither
//! - **Optimistic concurrency**: `commit_transition` is a compare-and-swap
//!   on the stored status and version
//! - **Creator-scoped**: listing is always by owning creator

use async_trait::async_trait;

use crate::domain::deal::{ConversationLog, Deal, DealActivity, DealStatus, StatusTransition};
use crate::domain::foundation::{DealId, DomainError, UserId};

/// Repository port for Deal aggregate persistence.
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Insert a new deal together with its `deal_created` activity.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, deal: &Deal, activity: &DealActivity) -> Result<(), DomainError>;

    /// Find a deal by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DealId) -> Result<Option<Deal>, DomainError>;

    /// List a creator's deals, most recently updated first.
    async fn list_by_creator(
        &self,
        creator_id: &UserId,
        status: Option<DealStatus>,
    ) -> Result<Vec<Deal>, DomainError>;

    /// Persist an applied status change.
    ///
    /// `deal` is the aggregate after the transition was applied. The write
    /// only lands if the stored row still has `transition.from` as its
    /// status and `transition.expected_version` as its version. Lifecycle
    /// timestamps already stored are kept, and an already stored terms
    /// snapshot is never replaced.
    ///
    /// # Errors
    ///
    /// - `DealNotFound` if the deal doesn't exist
    /// - `ConcurrencyConflict` if the stored row moved on; nothing is written
    /// - `DatabaseError` on persistence failure
    async fn commit_transition(
        &self,
        deal: &Deal,
        transition: &StatusTransition,
    ) -> Result<(), DomainError>;

    /// Append a conversation log and its activity entry.
    ///
    /// # Errors
    ///
    /// - `DealNotFound` if the deal doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn append_conversation(
        &self,
        log: &ConversationLog,
        activity: &DealActivity,
    ) -> Result<(), DomainError>;

    /// Conversation logs for a deal, oldest first.
    async fn list_conversations(&self, deal_id: &DealId)
        -> Result<Vec<ConversationLog>, DomainError>;

    /// Activity entries for a deal, oldest first.
    async fn list_activities(&self, deal_id: &DealId) -> Result<Vec<DealActivity>, DomainError>;

    /// Delete a deal and its journals.
    ///
    /// # Errors
    ///
    /// - `DealNotFound` if the deal doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &DealId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DealRepository) {}
    }
}
