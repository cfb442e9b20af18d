//! HTTP adapter for deal endpoints.
//!
//! - `POST   /api/deals` - open a deal
//! - `GET    /api/deals` - list the caller's deals (`?status=`)
//! - `GET    /api/deals/:id` - deal details
//! - `POST   /api/deals/:id/transition` - move to another status
//! - `POST   /api/deals/:id/agreement` - lock agreement terms
//! - `GET    /api/deals/:id/actions` - next allowed statuses
//! - `POST   /api/deals/:id/conversations` - record a conversation
//! - `GET    /api/deals/:id/history` - activity and conversation journals

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ActivityResponse, ConversationLogResponse, CreateDealRequest, DealHistoryResponse,
    DealListResponse, DealResponse, ErrorResponse, ListDealsParams, LogConversationRequest,
    TransitionRequest,
};
pub use handlers::DealHandlers;
pub use routes::deal_routes;
