//! HTTP DTOs for deal endpoints.
//!
//! These types decouple the HTTP API from domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::deal::{
    ActivityType, AgreementTerms, Channel, ConversationLog, Deal, DealActivity, DealError,
    DealStatus, Direction, Disposition,
};
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to open a deal.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDealRequest {
    pub title: String,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub proposed_amount: Option<Decimal>,
}

/// Request to move a deal to another status.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRequest {
    pub to: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<String>,
}

/// Request to record a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConversationRequest {
    pub channel: Channel,
    pub direction: Direction,
    pub summary: String,
    pub disposition: Disposition,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub terms_delta: Option<JsonValue>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Query parameters for listing deals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDealsParams {
    #[serde(default)]
    pub status: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full deal representation.
#[derive(Debug, Clone, Serialize)]
pub struct DealResponse {
    pub id: String,
    pub creator_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    pub title: String,
    pub status: DealStatus,
    pub proposed_amount: Option<Decimal>,
    pub agreed_amount: Option<Decimal>,
    pub terms_snapshot: Option<AgreementTerms>,
    pub lost_reason: Option<String>,
    pub invoice_id: Option<String>,
    pub outreach_sent_at: Option<String>,
    pub negotiation_started_at: Option<String>,
    pub agreement_locked_at: Option<String>,
    pub invoiced_at: Option<String>,
    pub paid_at: Option<String>,
    pub closed_at: Option<String>,
    pub available_actions: Vec<DealStatus>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

fn rfc3339(ts: Option<Timestamp>) -> Option<String> {
    ts.map(|t| t.to_rfc3339())
}

impl From<&Deal> for DealResponse {
    fn from(deal: &Deal) -> Self {
        let lifecycle = deal.lifecycle();
        Self {
            id: deal.id().to_string(),
            creator_id: deal.creator_id().to_string(),
            brand_id: deal.brand_id().map(|id| id.to_string()),
            title: deal.title().to_string(),
            status: deal.status(),
            proposed_amount: deal.proposed_amount(),
            agreed_amount: deal.agreed_amount(),
            terms_snapshot: deal.terms_snapshot().cloned(),
            lost_reason: deal.lost_reason().map(str::to_string),
            invoice_id: deal.invoice_id().map(|id| id.to_string()),
            outreach_sent_at: rfc3339(lifecycle.outreach_sent_at),
            negotiation_started_at: rfc3339(lifecycle.negotiation_started_at),
            agreement_locked_at: rfc3339(lifecycle.agreement_locked_at),
            invoiced_at: rfc3339(lifecycle.invoiced_at),
            paid_at: rfc3339(lifecycle.paid_at),
            closed_at: rfc3339(lifecycle.closed_at),
            available_actions: deal.available_actions(),
            version: deal.version(),
            created_at: deal.created_at().to_rfc3339(),
            updated_at: deal.updated_at().to_rfc3339(),
        }
    }
}

/// List of deals.
#[derive(Debug, Clone, Serialize)]
pub struct DealListResponse {
    pub items: Vec<DealResponse>,
    pub total: usize,
}

impl From<Vec<Deal>> for DealListResponse {
    fn from(deals: Vec<Deal>) -> Self {
        let items: Vec<DealResponse> = deals.iter().map(DealResponse::from).collect();
        Self {
            total: items.len(),
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationLogResponse {
    pub id: String,
    pub deal_id: String,
    pub channel: Channel,
    pub direction: Direction,
    pub summary: String,
    pub disposition: Disposition,
    pub amount: Option<Decimal>,
    pub terms_delta: Option<JsonValue>,
    pub attachments: Vec<String>,
    pub created_at: String,
}

impl From<ConversationLog> for ConversationLogResponse {
    fn from(log: ConversationLog) -> Self {
        Self {
            id: log.id.to_string(),
            deal_id: log.deal_id.to_string(),
            channel: log.channel,
            direction: log.direction,
            summary: log.summary,
            disposition: log.disposition,
            amount: log.amount,
            terms_delta: log.terms_delta,
            attachments: log.attachments,
            created_at: log.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    pub id: String,
    pub activity_type: ActivityType,
    pub message: String,
    pub actor: String,
    pub metadata: Option<JsonValue>,
    pub created_at: String,
}

impl From<DealActivity> for ActivityResponse {
    fn from(activity: DealActivity) -> Self {
        Self {
            id: activity.id.to_string(),
            activity_type: activity.activity_type,
            message: activity.message,
            actor: activity.actor.to_string(),
            metadata: activity.metadata,
            created_at: activity.created_at.to_rfc3339(),
        }
    }
}

/// Both journals of a deal.
#[derive(Debug, Clone, Serialize)]
pub struct DealHistoryResponse {
    pub activities: Vec<ActivityResponse>,
    pub conversations: Vec<ConversationLogResponse>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DealError> for ErrorResponse {
    fn from(error: &DealError) -> Self {
        let details = match error {
            DealError::InvalidTransition { from, to } => {
                Some(serde_json::json!({ "from": from, "to": to }))
            }
            DealError::ValidationFailed { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        };
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn deal_response_exposes_actions_and_null_snapshot() {
        let (deal, _) = Deal::create(
            UserId::new("creator-1").unwrap(),
            "Spring drop".to_string(),
            None,
            None,
        )
        .unwrap();

        let json = serde_json::to_value(DealResponse::from(&deal)).unwrap();

        assert_eq!(json["status"], "PROSPECT");
        assert_eq!(json["available_actions"], serde_json::json!(["OUTREACH_SENT", "DECLINED"]));
        assert!(json["terms_snapshot"].is_null());
        assert!(json["outreach_sent_at"].is_null());
        assert!(json.get("brand_id").is_none());
    }

    #[test]
    fn invalid_transition_error_carries_from_and_to() {
        let error = DealError::invalid_transition(DealStatus::Paid, DealStatus::Declined);
        let body = serde_json::to_value(ErrorResponse::from(&error)).unwrap();

        assert_eq!(body["code"], "INVALID_TRANSITION");
        assert_eq!(body["details"], serde_json::json!({ "from": "PAID", "to": "DECLINED" }));
    }

    #[test]
    fn conversation_request_uses_snake_case_values() {
        let req: LogConversationRequest = serde_json::from_value(serde_json::json!({
            "channel": "email",
            "direction": "outbound",
            "summary": "Sent media kit",
            "disposition": "no_response"
        }))
        .unwrap();

        assert_eq!(req.channel, Channel::Email);
        assert_eq!(req.disposition, Disposition::NoResponse);
        assert!(req.attachments.is_empty());
    }
}
