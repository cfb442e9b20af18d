//! Deal lifecycle module.
//!
//! A deal tracks one brand partnership from first contact to payment.
//!
//! - `DealStatus` - the seven-state pipeline and its transition table
//! - `Deal` - aggregate owning status, lifecycle timestamps and the locked
//!   terms snapshot
//! - `AgreementTerms` - the structured contract captured at lock time
//! - `ConversationLog` / `DealActivity` - append-only journals

mod aggregate;
mod errors;
mod journal;
mod money;
mod status;
mod terms;

pub use aggregate::{Deal, LifecycleTimestamps, StatusTransition, MAX_TITLE_LENGTH};
pub use errors::DealError;
pub use journal::{
    ActivityType, Channel, ConversationLog, DealActivity, Direction, Disposition, NewConversation,
};
pub use money::{validate_amount, MAX_AMOUNT, MONEY_SCALE};
pub use status::DealStatus;
pub use terms::{AgreementTerms, BrandPoc, Deliverable, DueDates, PaymentSchedule, Price};

#[cfg(test)]
pub(crate) use terms::fixtures as terms_fixtures;
