//! Deal aggregate entity.
//!
//! A deal is one brand-partnership negotiation owned by exactly one
//! creator. Its status only moves through [`Deal::transition`] and
//! [`Deal::lock_agreement`], both of which validate against the
//! [`DealStatus`] table before touching any field.
//!
//! # Invariants
//!
//! - `Paid` and `Declined` are terminal
//! - `terms_snapshot` is written once, on entering `AgreementLocked`
//!   through `lock_agreement`, and never again
//! - a lifecycle timestamp, once stamped, keeps its first value
//! - `version` increases by one per committed mutation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::validate_amount;
use super::{AgreementTerms, DealActivity, DealError, DealStatus};
use crate::domain::foundation::{
    BrandId, DealId, InvoiceId, StateMachine, Timestamp, UserId, ValidationError,
};

/// Maximum length for a deal title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Nullable timestamps marking when a deal entered each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleTimestamps {
    pub outreach_sent_at: Option<Timestamp>,
    pub negotiation_started_at: Option<Timestamp>,
    pub agreement_locked_at: Option<Timestamp>,
    pub invoiced_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
}

impl LifecycleTimestamps {
    /// Stamps the fields tied to entering `target`, keeping existing values.
    fn stamp(&mut self, target: DealStatus, now: Timestamp) {
        match target {
            DealStatus::Prospect => {}
            DealStatus::OutreachSent => {
                self.outreach_sent_at.get_or_insert(now);
            }
            DealStatus::Negotiation => {
                self.negotiation_started_at.get_or_insert(now);
            }
            DealStatus::AgreementLocked => {
                self.agreement_locked_at.get_or_insert(now);
            }
            DealStatus::Invoiced => {
                self.invoiced_at.get_or_insert(now);
            }
            DealStatus::Paid => {
                self.paid_at.get_or_insert(now);
                self.closed_at.get_or_insert(now);
            }
            DealStatus::Declined => {
                self.closed_at.get_or_insert(now);
            }
        }
    }
}

/// A validated, applied status change awaiting persistence.
///
/// The repository commits it only if the stored deal still has
/// `from` as its status and `expected_version` as its version.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub from: DealStatus,
    pub to: DealStatus,
    pub expected_version: i64,
    pub activity: DealActivity,
}

/// Deal aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    id: DealId,
    creator_id: UserId,
    brand_id: Option<BrandId>,
    title: String,
    status: DealStatus,
    proposed_amount: Option<Decimal>,
    agreed_amount: Option<Decimal>,
    terms_snapshot: Option<AgreementTerms>,
    lost_reason: Option<String>,
    invoice_id: Option<InvoiceId>,
    lifecycle: LifecycleTimestamps,
    version: i64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Deal {
    /// Create a new deal in `Prospect`.
    ///
    /// Returns the deal together with its `deal_created` activity.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is blank or too long, or the proposed
    ///   amount is negative
    pub fn create(
        creator_id: UserId,
        title: String,
        brand_id: Option<BrandId>,
        proposed_amount: Option<Decimal>,
    ) -> Result<(Self, DealActivity), DealError> {
        let title = Self::validate_title(&title)?;
        if let Some(amount) = proposed_amount {
            validate_amount("proposed_amount", amount)?;
        }

        let id = DealId::new();
        let now = Timestamp::now();
        let activity = DealActivity::deal_created(id, &title, &creator_id);
        let deal = Self {
            id,
            creator_id,
            brand_id,
            title,
            status: DealStatus::Prospect,
            proposed_amount,
            agreed_amount: None,
            terms_snapshot: None,
            lost_reason: None,
            invoice_id: None,
            lifecycle: LifecycleTimestamps::default(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        Ok((deal, activity))
    }

    /// Reconstitute a deal from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DealId,
        creator_id: UserId,
        brand_id: Option<BrandId>,
        title: String,
        status: DealStatus,
        proposed_amount: Option<Decimal>,
        agreed_amount: Option<Decimal>,
        terms_snapshot: Option<AgreementTerms>,
        lost_reason: Option<String>,
        invoice_id: Option<InvoiceId>,
        lifecycle: LifecycleTimestamps,
        version: i64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            creator_id,
            brand_id,
            title,
            status,
            proposed_amount,
            agreed_amount,
            terms_snapshot,
            lost_reason,
            invoice_id,
            lifecycle,
            version,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DealId {
        &self.id
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn brand_id(&self) -> Option<&BrandId> {
        self.brand_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> DealStatus {
        self.status
    }

    pub fn proposed_amount(&self) -> Option<Decimal> {
        self.proposed_amount
    }

    pub fn agreed_amount(&self) -> Option<Decimal> {
        self.agreed_amount
    }

    /// The locked contract record, if the agreement has been locked.
    pub fn terms_snapshot(&self) -> Option<&AgreementTerms> {
        self.terms_snapshot.as_ref()
    }

    pub fn lost_reason(&self) -> Option<&str> {
        self.lost_reason.as_deref()
    }

    pub fn invoice_id(&self) -> Option<&InvoiceId> {
        self.invoice_id.as_ref()
    }

    pub fn lifecycle(&self) -> &LifecycleTimestamps {
        &self.lifecycle
    }

    /// Optimistic concurrency counter.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Statuses this deal may move to next.
    pub fn available_actions(&self) -> Vec<DealStatus> {
        self.status.valid_transitions()
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates that the user owns this deal.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if user is not the creator
    pub fn authorize(&self, user_id: &UserId) -> Result<(), DealError> {
        if &self.creator_id == user_id {
            Ok(())
        } else {
            Err(DealError::Forbidden)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Move the deal to `target`.
    ///
    /// Entering `Declined` records `notes` as the lost reason.
    /// `AgreementLocked` is only entered through [`Deal::lock_agreement`],
    /// which carries the terms snapshot.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the table does not allow `status -> target`
    /// - `ValidationFailed` on field `to` if `target` is `AgreementLocked`
    ///
    /// The deal is left untouched on error.
    pub fn transition(
        &mut self,
        target: DealStatus,
        notes: Option<String>,
        actor: &UserId,
    ) -> Result<StatusTransition, DealError> {
        self.ensure_allowed(target)?;
        if target == DealStatus::AgreementLocked {
            return Err(DealError::validation(
                "to",
                "AGREEMENT_LOCKED is entered by locking the agreement terms",
            ));
        }
        let notes = normalize_notes(notes);
        let message = match (target, notes.as_deref()) {
            (DealStatus::Declined, Some(reason)) => format!("Deal declined: {}", reason),
            _ => format!(
                "Status changed from {} to {}",
                self.status.label(),
                target.label()
            ),
        };
        Ok(self.apply(target, notes, message, actor))
    }

    /// Move the deal to `Invoiced`, attaching the issued invoice.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the deal is `AgreementLocked`
    pub fn transition_with_invoice(
        &mut self,
        invoice_id: InvoiceId,
        notes: Option<String>,
        actor: &UserId,
    ) -> Result<StatusTransition, DealError> {
        self.ensure_allowed(DealStatus::Invoiced)?;
        self.invoice_id = Some(invoice_id);
        let message = format!("Invoice {} issued", invoice_id);
        Ok(self.apply(DealStatus::Invoiced, normalize_notes(notes), message, actor))
    }

    /// Lock the negotiated terms, moving `Negotiation -> AgreementLocked`.
    ///
    /// Stores an owned copy of `terms` as the snapshot and sets the agreed
    /// amount from `terms.price.amount`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the deal is in `Negotiation`
    /// - `ValidationFailed` if the terms are malformed
    pub fn lock_agreement(
        &mut self,
        terms: &AgreementTerms,
        actor: &UserId,
    ) -> Result<StatusTransition, DealError> {
        self.ensure_allowed(DealStatus::AgreementLocked)?;
        terms.validate()?;
        let agreed_amount = terms.agreed_amount()?;

        // Only Negotiation reaches this point and nothing leads back to it,
        // so the snapshot slot is still empty.
        self.terms_snapshot = Some(terms.clone());
        self.agreed_amount = Some(agreed_amount);

        let message = format!(
            "Agreement locked at {:.2} {}",
            agreed_amount, terms.price.currency
        );
        Ok(self.apply(DealStatus::AgreementLocked, None, message, actor))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_allowed(&self, target: DealStatus) -> Result<(), DealError> {
        if self.status.can_transition_to(&target) {
            Ok(())
        } else {
            Err(DealError::invalid_transition(self.status, target))
        }
    }

    /// Applies an already validated transition.
    fn apply(
        &mut self,
        target: DealStatus,
        notes: Option<String>,
        message: String,
        actor: &UserId,
    ) -> StatusTransition {
        let from = self.status;
        let now = Timestamp::now();

        self.status = target;
        self.lifecycle.stamp(target, now);
        if target == DealStatus::Declined {
            self.lost_reason = notes.clone();
        }
        let expected_version = self.version;
        self.version += 1;
        self.updated_at = now;

        StatusTransition {
            from,
            to: target,
            expected_version,
            activity: DealActivity::status_change(
                self.id,
                from,
                target,
                notes.as_deref(),
                message,
                actor,
            ),
        }
    }

    fn validate_title(title: &str) -> Result<String, ValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(ValidationError::invalid_format(
                "title",
                format!("must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(trimmed.to_string())
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
