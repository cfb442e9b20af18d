//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `deal` - Deal aggregate, status machine, agreement terms and journals

pub mod deal;
pub mod foundation;
