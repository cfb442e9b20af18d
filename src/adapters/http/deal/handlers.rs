//! HTTP handlers for deal endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value as JsonValue;

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::deal::{
    CreateDealCommand, CreateDealHandler, GetAvailableActionsHandler, GetAvailableActionsQuery,
    GetDealHandler, GetDealHistoryHandler, GetDealHistoryQuery, GetDealQuery, ListDealsHandler,
    ListDealsQuery, LockAgreementCommand, LockAgreementHandler, LogConversationCommand,
    LogConversationHandler, TransitionDealCommand, TransitionDealHandler,
};
use crate::domain::deal::{DealError, DealStatus, NewConversation};
use crate::domain::foundation::{BrandId, CommandMetadata, DealId, InvoiceId, UserId};
use crate::ports::DealRepository;

use super::dto::{
    ActivityResponse, ConversationLogResponse, CreateDealRequest, DealHistoryResponse,
    DealListResponse, DealResponse, ErrorResponse, ListDealsParams, LogConversationRequest,
    TransitionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DealHandlers {
    create_handler: Arc<CreateDealHandler>,
    transition_handler: Arc<TransitionDealHandler>,
    lock_handler: Arc<LockAgreementHandler>,
    log_conversation_handler: Arc<LogConversationHandler>,
    get_handler: Arc<GetDealHandler>,
    list_handler: Arc<ListDealsHandler>,
    actions_handler: Arc<GetAvailableActionsHandler>,
    history_handler: Arc<GetDealHistoryHandler>,
}

impl DealHandlers {
    /// Wires every deal handler to the same repository.
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self {
            create_handler: Arc::new(CreateDealHandler::new(repository.clone())),
            transition_handler: Arc::new(TransitionDealHandler::new(repository.clone())),
            lock_handler: Arc::new(LockAgreementHandler::new(repository.clone())),
            log_conversation_handler: Arc::new(LogConversationHandler::new(repository.clone())),
            get_handler: Arc::new(GetDealHandler::new(repository.clone())),
            list_handler: Arc::new(ListDealsHandler::new(repository.clone())),
            actions_handler: Arc::new(GetAvailableActionsHandler::new(repository.clone())),
            history_handler: Arc::new(GetDealHistoryHandler::new(repository)),
        }
    }
}

fn metadata(user_id: UserId) -> CommandMetadata {
    CommandMetadata::new(user_id)
        .with_correlation_id("http-request")
        .with_source("http")
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}

fn parse_deal_id(raw: &str) -> Result<DealId, Response> {
    raw.parse::<DealId>()
        .map_err(|_| bad_request("Invalid deal ID"))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/deals - Open a deal in PROSPECT
pub async fn create_deal(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<CreateDealRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let brand_id = match req.brand_id.as_deref().map(str::parse::<BrandId>).transpose() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid brand ID"),
    };

    let cmd = CreateDealCommand {
        title: req.title,
        brand_id,
        proposed_amount: req.proposed_amount,
    };

    match handlers.create_handler.handle(cmd, metadata(user.id)).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(DealResponse::from(&result.deal)),
        )
            .into_response(),
        Err(e) => handle_deal_error(e),
    }
}

/// GET /api/deals - List the caller's deals, optionally by status
pub async fn list_deals(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListDealsParams>,
) -> Response {
    let status = match params.status.as_deref().map(str::parse::<DealStatus>).transpose() {
        Ok(status) => status,
        Err(e) => return handle_deal_error(e.into()),
    };

    let query = ListDealsQuery {
        user_id: user.id,
        status,
    };

    match handlers.list_handler.handle(query).await {
        Ok(deals) => (StatusCode::OK, Json(DealListResponse::from(deals))).into_response(),
        Err(e) => handle_deal_error(e),
    }
}

/// GET /api/deals/:id - Get deal details
pub async fn get_deal(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<String>,
) -> Response {
    let deal_id = match parse_deal_id(&deal_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetDealQuery {
        deal_id,
        user_id: user.id,
    };

    match handlers.get_handler.handle(query).await {
        Ok(deal) => (StatusCode::OK, Json(DealResponse::from(&deal))).into_response(),
        Err(e) => handle_deal_error(e),
    }
}

/// POST /api/deals/:id/transition - Move a deal to another status
pub async fn transition_deal(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<String>,
    body: Result<Json<TransitionRequest>, JsonRejection>,
) -> Response {
    let deal_id = match parse_deal_id(&deal_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let to = match req.to.parse::<DealStatus>() {
        Ok(status) => status,
        Err(e) => return handle_deal_error(e.into()),
    };
    let invoice_id = match req.invoice_id.as_deref().map(str::parse::<InvoiceId>).transpose() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid invoice ID"),
    };

    let cmd = TransitionDealCommand {
        deal_id,
        to,
        notes: req.notes,
        invoice_id,
    };

    match handlers.transition_handler.handle(cmd, metadata(user.id)).await {
        Ok(result) => (StatusCode::OK, Json(DealResponse::from(&result.deal))).into_response(),
        Err(e) => handle_deal_error(e),
    }
}

/// POST /api/deals/:id/agreement - Lock the agreed terms
pub async fn lock_agreement(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let deal_id = match parse_deal_id(&deal_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let terms = match body {
        Ok(Json(terms)) => terms,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let cmd = LockAgreementCommand { deal_id, terms };

    match handlers.lock_handler.handle(cmd, metadata(user.id)).await {
        Ok(result) => (StatusCode::OK, Json(DealResponse::from(&result.deal))).into_response(),
        Err(e) => handle_deal_error(e),
    }
}

/// GET /api/deals/:id/actions - Statuses the deal may move to next
pub async fn get_available_actions(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<String>,
) -> Response {
    let deal_id = match parse_deal_id(&deal_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetAvailableActionsQuery {
        deal_id,
        user_id: user.id,
    };

    match handlers.actions_handler.handle(query).await {
        Ok(actions) => (StatusCode::OK, Json(actions)).into_response(),
        Err(e) => handle_deal_error(e),
    }
}

/// POST /api/deals/:id/conversations - Record a conversation
pub async fn log_conversation(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<String>,
    body: Result<Json<LogConversationRequest>, JsonRejection>,
) -> Response {
    let deal_id = match parse_deal_id(&deal_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let cmd = LogConversationCommand {
        deal_id,
        entry: NewConversation {
            channel: req.channel,
            direction: req.direction,
            summary: req.summary,
            disposition: req.disposition,
            amount: req.amount,
            terms_delta: req.terms_delta,
            attachments: req.attachments,
        },
    };

    match handlers.log_conversation_handler.handle(cmd, metadata(user.id)).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(ConversationLogResponse::from(result.log)),
        )
            .into_response(),
        Err(e) => handle_deal_error(e),
    }
}

/// GET /api/deals/:id/history - Activity and conversation journals
pub async fn get_deal_history(
    State(handlers): State<DealHandlers>,
    RequireAuth(user): RequireAuth,
    Path(deal_id): Path<String>,
) -> Response {
    let deal_id = match parse_deal_id(&deal_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetDealHistoryQuery {
        deal_id,
        user_id: user.id,
    };

    match handlers.history_handler.handle(query).await {
        Ok(history) => {
            let response = DealHistoryResponse {
                activities: history
                    .activities
                    .into_iter()
                    .map(ActivityResponse::from)
                    .collect(),
                conversations: history
                    .conversations
                    .into_iter()
                    .map(ConversationLogResponse::from)
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_deal_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_deal_error(error: DealError) -> Response {
    let status = match &error {
        DealError::NotFound(_) => StatusCode::NOT_FOUND,
        DealError::Forbidden => StatusCode::FORBIDDEN,
        DealError::InvalidTransition { .. } | DealError::ConcurrentModification(_) => {
            StatusCode::CONFLICT
        }
        DealError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        DealError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Deal request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response();
        }
    };

    (status, Json(ErrorResponse::from(&error))).into_response()
}
