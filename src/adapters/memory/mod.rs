//! In-memory adapters.
//!
//! Used by handler tests, router integration tests, and local runs
//! without a database.

mod deal_repository;

pub use deal_repository::InMemoryDealRepository;
