//! PostgreSQL implementation of DealRepository.
//!
//! Deals live in `deals`, with the locked terms stored as JSONB. Journals
//! live in `conversation_logs` and `deal_activities`, both cascading on
//! deal deletion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::deal::{
    AgreementTerms, ConversationLog, Deal, DealActivity, DealStatus, LifecycleTimestamps,
    StatusTransition,
};
use crate::domain::foundation::{
    ActivityId, BrandId, ConversationLogId, DealId, DomainError, ErrorCode, InvoiceId, Timestamp,
    UserId,
};
use crate::ports::DealRepository;

/// SQLSTATE raised by the terms snapshot write-once trigger.
const CHECK_VIOLATION: &str = "23514";

const DEAL_COLUMNS: &str = r#"
    id, creator_id, brand_id, title, status, proposed_amount, agreed_amount,
    terms_snapshot, lost_reason, invoice_id, outreach_sent_at,
    negotiation_started_at, agreement_locked_at, invoiced_at, paid_at,
    closed_at, version, created_at, updated_at
"#;

/// PostgreSQL implementation of DealRepository.
#[derive(Clone)]
pub struct PostgresDealRepository {
    pool: PgPool,
}

impl PostgresDealRepository {
    /// Creates a new PostgresDealRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))
    }
}

#[async_trait]
impl DealRepository for PostgresDealRepository {
    async fn create(&self, deal: &Deal, activity: &DealActivity) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO deals (
                id, creator_id, brand_id, title, status, proposed_amount,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(deal.id().as_uuid())
        .bind(deal.creator_id().as_str())
        .bind(deal.brand_id().map(|id| *id.as_uuid()))
        .bind(deal.title())
        .bind(deal.status().as_str())
        .bind(deal.proposed_amount())
        .bind(deal.version())
        .bind(deal.created_at().as_datetime())
        .bind(deal.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to insert deal", e))?;

        insert_activity(&mut tx, activity).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))
    }

    async fn find_by_id(&self, id: &DealId) -> Result<Option<Deal>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM deals WHERE id = $1", DEAL_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch deal", e))?;

        row.map(|r| row_to_deal(&r)).transpose()
    }

    async fn list_by_creator(
        &self,
        creator_id: &UserId,
        status: Option<DealStatus>,
    ) -> Result<Vec<Deal>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM deals
            WHERE creator_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY updated_at DESC
            "#,
            DEAL_COLUMNS
        ))
        .bind(creator_id.as_str())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list deals", e))?;

        rows.iter().map(row_to_deal).collect()
    }

    async fn commit_transition(
        &self,
        deal: &Deal,
        transition: &StatusTransition,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        let lifecycle = deal.lifecycle();

        let result = sqlx::query(
            r#"
            UPDATE deals SET
                status = $4,
                agreed_amount = COALESCE(agreed_amount, $5),
                terms_snapshot = COALESCE(terms_snapshot, $6),
                lost_reason = COALESCE($7, lost_reason),
                invoice_id = COALESCE(invoice_id, $8),
                outreach_sent_at = COALESCE(outreach_sent_at, $9),
                negotiation_started_at = COALESCE(negotiation_started_at, $10),
                agreement_locked_at = COALESCE(agreement_locked_at, $11),
                invoiced_at = COALESCE(invoiced_at, $12),
                paid_at = COALESCE(paid_at, $13),
                closed_at = COALESCE(closed_at, $14),
                version = $3 + 1,
                updated_at = $15
            WHERE id = $1 AND status = $2 AND version = $3
            "#,
        )
        .bind(deal.id().as_uuid())
        .bind(transition.from.as_str())
        .bind(transition.expected_version)
        .bind(transition.to.as_str())
        .bind(deal.agreed_amount())
        .bind(deal.terms_snapshot().map(Json))
        .bind(deal.lost_reason())
        .bind(deal.invoice_id().map(|id| *id.as_uuid()))
        .bind(to_datetime(lifecycle.outreach_sent_at))
        .bind(to_datetime(lifecycle.negotiation_started_at))
        .bind(to_datetime(lifecycle.agreement_locked_at))
        .bind(to_datetime(lifecycle.invoiced_at))
        .bind(to_datetime(lifecycle.paid_at))
        .bind(to_datetime(lifecycle.closed_at))
        .bind(deal.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_check_violation(&e) {
                DomainError::new(
                    ErrorCode::TermsAlreadyLocked,
                    format!("Deal {} already has locked terms", deal.id()),
                )
            } else {
                DomainError::database("Failed to update deal", e)
            }
        })?;

        if result.rows_affected() == 0 {
            let current: Option<i64> = sqlx::query_scalar("SELECT version FROM deals WHERE id = $1")
                .bind(deal.id().as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::database("Failed to read deal version", e))?;

            // Dropping the transaction rolls it back.
            return Err(match current {
                None => DomainError::new(
                    ErrorCode::DealNotFound,
                    format!("Deal not found: {}", deal.id()),
                ),
                Some(actual) => DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!("Deal {} was modified concurrently", deal.id()),
                )
                .with_detail("expected_version", transition.expected_version.to_string())
                .with_detail("actual_version", actual.to_string()),
            });
        }

        insert_activity(&mut tx, &transition.activity).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))
    }

    async fn append_conversation(
        &self,
        log: &ConversationLog,
        activity: &DealActivity,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO conversation_logs (
                id, deal_id, channel, direction, summary, disposition,
                amount, terms_delta, attachments, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(log.id.as_uuid())
        .bind(log.deal_id.as_uuid())
        .bind(log.channel.as_str())
        .bind(log.direction.as_str())
        .bind(&log.summary)
        .bind(log.disposition.as_str())
        .bind(log.amount)
        .bind(&log.terms_delta)
        .bind(Json(&log.attachments))
        .bind(log.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::new(
                    ErrorCode::DealNotFound,
                    format!("Deal not found: {}", log.deal_id),
                )
            } else {
                DomainError::database("Failed to insert conversation log", e)
            }
        })?;

        insert_activity(&mut tx, activity).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))
    }

    async fn list_conversations(
        &self,
        deal_id: &DealId,
    ) -> Result<Vec<ConversationLog>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, deal_id, channel, direction, summary, disposition,
                   amount, terms_delta, attachments, created_at
            FROM conversation_logs
            WHERE deal_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(deal_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list conversation logs", e))?;

        rows.iter().map(row_to_conversation).collect()
    }

    async fn list_activities(&self, deal_id: &DealId) -> Result<Vec<DealActivity>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, deal_id, activity_type, message, actor, metadata, created_at
            FROM deal_activities
            WHERE deal_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(deal_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list deal activities", e))?;

        rows.iter().map(row_to_activity).collect()
    }

    async fn delete(&self, id: &DealId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete deal", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DealNotFound,
                format!("Deal not found: {}", id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

async fn insert_activity(
    tx: &mut Transaction<'static, Postgres>,
    activity: &DealActivity,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO deal_activities (
            id, deal_id, activity_type, message, actor, metadata, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(activity.id.as_uuid())
    .bind(activity.deal_id.as_uuid())
    .bind(activity.activity_type.as_str())
    .bind(&activity.message)
    .bind(activity.actor.as_str())
    .bind(&activity.metadata)
    .bind(activity.created_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::database("Failed to insert deal activity", e))?;

    Ok(())
}

fn to_datetime(ts: Option<Timestamp>) -> Option<DateTime<Utc>> {
    ts.map(|t| *t.as_datetime())
}

fn to_timestamp(dt: Option<DateTime<Utc>>) -> Option<Timestamp> {
    dt.map(Timestamp::from_datetime)
}

fn is_check_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == CHECK_VIOLATION)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(&format!("Failed to get {}", name), e))
}

fn parse_text<T>(value: &str, what: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| DomainError::database(&format!("Invalid {}", what), e))
}

fn row_to_deal(row: &PgRow) -> Result<Deal, DomainError> {
    let creator_id: String = column(row, "creator_id")?;
    let status: String = column(row, "status")?;
    let brand_id: Option<Uuid> = column(row, "brand_id")?;
    let invoice_id: Option<Uuid> = column(row, "invoice_id")?;
    let terms: Option<Json<AgreementTerms>> = column(row, "terms_snapshot")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let updated_at: DateTime<Utc> = column(row, "updated_at")?;

    let lifecycle = LifecycleTimestamps {
        outreach_sent_at: to_timestamp(column(row, "outreach_sent_at")?),
        negotiation_started_at: to_timestamp(column(row, "negotiation_started_at")?),
        agreement_locked_at: to_timestamp(column(row, "agreement_locked_at")?),
        invoiced_at: to_timestamp(column(row, "invoiced_at")?),
        paid_at: to_timestamp(column(row, "paid_at")?),
        closed_at: to_timestamp(column(row, "closed_at")?),
    };

    Ok(Deal::reconstitute(
        DealId::from_uuid(column(row, "id")?),
        UserId::new(creator_id).map_err(|e| DomainError::database("Invalid creator_id", e))?,
        brand_id.map(BrandId::from_uuid),
        column(row, "title")?,
        parse_text(&status, "deal status")?,
        column::<Option<Decimal>>(row, "proposed_amount")?,
        column::<Option<Decimal>>(row, "agreed_amount")?,
        terms.map(|Json(t)| t),
        column(row, "lost_reason")?,
        invoice_id.map(InvoiceId::from_uuid),
        lifecycle,
        column(row, "version")?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_conversation(row: &PgRow) -> Result<ConversationLog, DomainError> {
    let channel: String = column(row, "channel")?;
    let direction: String = column(row, "direction")?;
    let disposition: String = column(row, "disposition")?;
    let attachments: Json<Vec<String>> = column(row, "attachments")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;

    Ok(ConversationLog {
        id: ConversationLogId::from_uuid(column(row, "id")?),
        deal_id: DealId::from_uuid(column(row, "deal_id")?),
        channel: parse_text(&channel, "channel")?,
        direction: parse_text(&direction, "direction")?,
        summary: column(row, "summary")?,
        disposition: parse_text(&disposition, "disposition")?,
        amount: column(row, "amount")?,
        terms_delta: column(row, "terms_delta")?,
        attachments: attachments.0,
        created_at: Timestamp::from_datetime(created_at),
    })
}

fn row_to_activity(row: &PgRow) -> Result<DealActivity, DomainError> {
    let activity_type: String = column(row, "activity_type")?;
    let actor: String = column(row, "actor")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;

    Ok(DealActivity {
        id: ActivityId::from_uuid(column(row, "id")?),
        deal_id: DealId::from_uuid(column(row, "deal_id")?),
        activity_type: parse_text(&activity_type, "activity type")?,
        message: column(row, "message")?,
        actor: UserId::new(actor).map_err(|e| DomainError::database("Invalid actor", e))?,
        metadata: column(row, "metadata")?,
        created_at: Timestamp::from_datetime(created_at),
    })
}
