//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    AvailableActions, CreateDealCommand, CreateDealHandler, CreateDealResult, DealHistory,
    GetAvailableActionsHandler, GetAvailableActionsQuery, GetDealHandler, GetDealHistoryHandler,
    GetDealHistoryQuery, GetDealQuery, ListDealsHandler, ListDealsQuery, LockAgreementCommand,
    LockAgreementHandler, LockAgreementResult, LogConversationCommand, LogConversationHandler,
    LogConversationResult, TransitionDealCommand, TransitionDealHandler, TransitionDealResult,
};
