//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DealRepository` - Deal persistence with journals and CAS transitions
//! - `SessionValidator` - Bearer token validation

mod deal_repository;
mod session_validator;

pub use deal_repository::DealRepository;
pub use session_validator::SessionValidator;
