//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDealRepository` - Deals, conversation logs and activities

mod deal_repository;

pub use deal_repository::PostgresDealRepository;
