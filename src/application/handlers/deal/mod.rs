//! Deal command and query handlers.

mod create_deal;
mod get_available_actions;
mod get_deal;
mod get_deal_history;
mod list_deals;
mod lock_agreement;
mod log_conversation;
mod transition_deal;

#[cfg(test)]
mod test_support;

pub use create_deal::{CreateDealCommand, CreateDealHandler, CreateDealResult};
pub use get_available_actions::{AvailableActions, GetAvailableActionsHandler, GetAvailableActionsQuery};
pub use get_deal::{GetDealHandler, GetDealQuery};
pub use get_deal_history::{DealHistory, GetDealHistoryHandler, GetDealHistoryQuery};
pub use list_deals::{ListDealsHandler, ListDealsQuery};
pub use lock_agreement::{LockAgreementCommand, LockAgreementHandler, LockAgreementResult};
pub use log_conversation::{LogConversationCommand, LogConversationHandler, LogConversationResult};
pub use transition_deal::{TransitionDealCommand, TransitionDealHandler, TransitionDealResult};

use crate::domain::deal::{Deal, DealError};
use crate::domain::foundation::{DealId, UserId};
use crate::ports::DealRepository;

/// Loads a deal and checks that `user_id` owns it.
async fn load_owned(
    repository: &dyn DealRepository,
    deal_id: DealId,
    user_id: &UserId,
) -> Result<Deal, DealError> {
    let deal = repository
        .find_by_id(&deal_id)
        .await
        .map_err(DealError::for_deal(deal_id))?
        .ok_or(DealError::NotFound(deal_id))?;

    deal.authorize(user_id)?;
    Ok(deal)
}
