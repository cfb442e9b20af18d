//! DealStatus - the seven-state deal pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Pipeline status of a brand partnership deal.
///
/// `Paid` and `Declined` are terminal. `Declined` is reachable from every
/// non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStatus {
    #[default]
    Prospect,
    OutreachSent,
    Negotiation,
    AgreementLocked,
    Invoiced,
    Paid,
    Declined,
}

impl DealStatus {
    /// Every status, in pipeline order.
    pub const ALL: [DealStatus; 7] = [
        DealStatus::Prospect,
        DealStatus::OutreachSent,
        DealStatus::Negotiation,
        DealStatus::AgreementLocked,
        DealStatus::Invoiced,
        DealStatus::Paid,
        DealStatus::Declined,
    ];

    /// Canonical wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Prospect => "PROSPECT",
            DealStatus::OutreachSent => "OUTREACH_SENT",
            DealStatus::Negotiation => "NEGOTIATION",
            DealStatus::AgreementLocked => "AGREEMENT_LOCKED",
            DealStatus::Invoiced => "INVOICED",
            DealStatus::Paid => "PAID",
            DealStatus::Declined => "DECLINED",
        }
    }

    /// Human-readable label used in activity messages.
    pub fn label(&self) -> &'static str {
        match self {
            DealStatus::Prospect => "Prospect",
            DealStatus::OutreachSent => "Outreach Sent",
            DealStatus::Negotiation => "Negotiation",
            DealStatus::AgreementLocked => "Agreement Locked",
            DealStatus::Invoiced => "Invoiced",
            DealStatus::Paid => "Paid",
            DealStatus::Declined => "Declined",
        }
    }
}

impl StateMachine for DealStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use DealStatus::*;
        match self {
            Prospect => vec![OutreachSent, Declined],
            OutreachSent => vec![Negotiation, Declined],
            Negotiation => vec![AgreementLocked, Declined],
            AgreementLocked => vec![Invoiced, Declined],
            Invoiced => vec![Paid, Declined],
            Paid | Declined => vec![],
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DealStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("status", format!("unknown deal status '{}'", s))
            })
    }
}
