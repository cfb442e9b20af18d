//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - session validators (JWT, mock)
//! - `http` - REST API (axum)
//! - `memory` - in-process deal repository
//! - `postgres` - sqlx deal repository

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use http::{api_router, HttpOptions};
pub use memory::InMemoryDealRepository;
pub use postgres::PostgresDealRepository;
