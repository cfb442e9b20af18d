//! Append-only journals attached to a deal.
//!
//! - `DealActivity` - audit trail written alongside every committed change
//! - `ConversationLog` - one communication exchange with the brand
//!
//! Neither is ever updated after creation, and neither is read back into
//! transition logic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

use super::money::validate_amount;
use super::DealStatus;
use crate::domain::foundation::{
    ActivityId, ConversationLogId, DealId, Timestamp, UserId, ValidationError,
};

/// Declares a snake_case text enum stored as TEXT in the database.
macro_rules! text_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::invalid_format(
                        stringify!($name),
                        format!("unknown value '{}'", other),
                    )),
                }
            }
        }
    };
}

text_enum!(
    /// Kind of audit entry.
    ActivityType {
        DealCreated => "deal_created",
        StatusChange => "status_change",
        ConversationLogged => "conversation_logged",
    }
);

text_enum!(
    /// Medium a conversation happened over.
    Channel {
        Email => "email",
        Dm => "dm",
        Call => "call",
        Meeting => "meeting",
        Other => "other",
    }
);

text_enum!(
    Direction {
        Inbound => "inbound",
        Outbound => "outbound",
    }
);

text_enum!(
    /// How the exchange left the negotiation.
    Disposition {
        Positive => "positive",
        Neutral => "neutral",
        Negative => "negative",
        CounterOffer => "counter_offer",
        NoResponse => "no_response",
    }
);

// ════════════════════════════════════════════════════════════════════════════
// DealActivity
// ════════════════════════════════════════════════════════════════════════════

/// Audit entry describing one committed change to a deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealActivity {
    pub id: ActivityId,
    pub deal_id: DealId,
    pub activity_type: ActivityType,
    pub message: String,
    pub actor: UserId,
    pub metadata: Option<JsonValue>,
    pub created_at: Timestamp,
}

impl DealActivity {
    /// Creates a new activity entry stamped now.
    pub fn new(
        deal_id: DealId,
        activity_type: ActivityType,
        message: impl Into<String>,
        actor: &UserId,
        metadata: Option<JsonValue>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            deal_id,
            activity_type,
            message: message.into(),
            actor: actor.clone(),
            metadata,
            created_at: Timestamp::now(),
        }
    }

    pub(crate) fn deal_created(deal_id: DealId, title: &str, actor: &UserId) -> Self {
        Self::new(
            deal_id,
            ActivityType::DealCreated,
            format!("Deal \"{}\" created", title),
            actor,
            None,
        )
    }

    pub(crate) fn status_change(
        deal_id: DealId,
        from: DealStatus,
        to: DealStatus,
        notes: Option<&str>,
        message: String,
        actor: &UserId,
    ) -> Self {
        Self::new(
            deal_id,
            ActivityType::StatusChange,
            message,
            actor,
            Some(json!({ "from": from, "to": to, "notes": notes })),
        )
    }

    /// Activity written next to a freshly recorded conversation.
    pub fn conversation_logged(log: &ConversationLog, actor: &UserId) -> Self {
        Self::new(
            log.deal_id,
            ActivityType::ConversationLogged,
            format!(
                "Logged {} {} ({})",
                log.direction, log.channel, log.disposition
            ),
            actor,
            Some(json!({ "conversation_log_id": log.id })),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ConversationLog
// ════════════════════════════════════════════════════════════════════════════

/// Input for recording a conversation.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub channel: Channel,
    pub direction: Direction,
    pub summary: String,
    pub disposition: Disposition,
    pub amount: Option<Decimal>,
    pub terms_delta: Option<JsonValue>,
    pub attachments: Vec<String>,
}

/// One communication event tied to a deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    pub id: ConversationLogId,
    pub deal_id: DealId,
    pub channel: Channel,
    pub direction: Direction,
    pub summary: String,
    pub disposition: Disposition,
    pub amount: Option<Decimal>,
    pub terms_delta: Option<JsonValue>,
    pub attachments: Vec<String>,
    pub created_at: Timestamp,
}

impl ConversationLog {
    /// Validates and records a conversation against a deal.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if summary or an attachment is blank
    /// - `InvalidFormat` if amount is negative, finer than cents or too
    ///   large, or terms_delta is not an object
    pub fn record(deal_id: DealId, entry: NewConversation) -> Result<Self, ValidationError> {
        let summary = entry.summary.trim();
        if summary.is_empty() {
            return Err(ValidationError::empty_field("summary"));
        }
        if let Some(amount) = entry.amount {
            validate_amount("amount", amount)?;
        }
        if entry.terms_delta.as_ref().is_some_and(|d| !d.is_object()) {
            return Err(ValidationError::invalid_format(
                "terms_delta",
                "must be a JSON object",
            ));
        }
        if entry.attachments.iter().any(|a| a.trim().is_empty()) {
            return Err(ValidationError::empty_field("attachments"));
        }

        Ok(Self {
            id: ConversationLogId::new(),
            deal_id,
            channel: entry.channel,
            direction: entry.direction,
            summary: summary.to_string(),
            disposition: entry.disposition,
            amount: entry.amount,
            terms_delta: entry.terms_delta,
            attachments: entry.attachments,
            created_at: Timestamp::now(),
        })
    }
}
