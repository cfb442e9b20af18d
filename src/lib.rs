//! ManAIger - deal lifecycle manager for creator brand partnerships.
//!
//! Tracks each deal through a fixed pipeline
//! (`PROSPECT → OUTREACH_SENT → NEGOTIATION → AGREEMENT_LOCKED → INVOICED → PAID`,
//! with `DECLINED` reachable from any open status), captures the agreed
//! terms as a write-once snapshot, and journals every change.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
