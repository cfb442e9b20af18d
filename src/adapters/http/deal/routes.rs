//! HTTP routes for deal endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_deal, get_available_actions, get_deal, get_deal_history, list_deals, lock_agreement,
    log_conversation, transition_deal, DealHandlers,
};

/// Creates the deal router with all endpoints.
pub fn deal_routes(handlers: DealHandlers) -> Router {
    Router::new()
        .route("/", post(create_deal).get(list_deals))
        .route("/:id", get(get_deal))
        .route("/:id/transition", post(transition_deal))
        .route("/:id/agreement", post(lock_agreement))
        .route("/:id/actions", get(get_available_actions))
        .route("/:id/conversations", post(log_conversation))
        .route("/:id/history", get(get_deal_history))
        .with_state(handlers)
}
