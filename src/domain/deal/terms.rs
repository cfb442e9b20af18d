//! Agreement terms document captured when a deal is locked.
//!
//! The field names here are a fixed wire format: invoice rendering reads
//! the stored snapshot by these exact names.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::amount_from_f64;
use crate::domain::foundation::ValidationError;

/// Negotiated terms of a brand partnership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgreementTerms {
    pub price: Price,
    pub usage_rights: String,
    pub deliverables: Vec<Deliverable>,
    pub due_dates: DueDates,
    pub brand_poc: BrandPoc,
}

/// Agreed price and how it is paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
    pub schedule: PaymentSchedule,
}

/// When the brand pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentSchedule {
    #[serde(rename = "upfront")]
    Upfront,
    #[serde(rename = "on_delivery")]
    OnDelivery,
    #[serde(rename = "net_15")]
    Net15,
    #[serde(rename = "net_30")]
    Net30,
    #[serde(rename = "net_60")]
    Net60,
    #[serde(rename = "split")]
    Split,
}

/// One line of content the creator owes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Deliverable {
    pub platform: String,
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DueDates {
    pub content_due: NaiveDate,
    pub go_live: NaiveDate,
}

/// Brand-side point of contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrandPoc {
    pub name: String,
    pub email: String,
}

impl AgreementTerms {
    /// Parses and validates a raw terms document.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` on missing fields, wrong types, or unknown fields
    /// - any error from [`AgreementTerms::validate`]
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        let terms: AgreementTerms = serde_json::from_value(value)
            .map_err(|e| ValidationError::invalid_format("terms", e.to_string()))?;
        terms.validate()?;
        Ok(terms)
    }

    /// Checks the semantic constraints the type system does not carry.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.agreed_amount()?;

        let currency = &self.price.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "price.currency",
                "must be a 3-letter ISO currency code",
            ));
        }

        if self.usage_rights.trim().is_empty() {
            return Err(ValidationError::empty_field("usage_rights"));
        }

        if self.deliverables.is_empty() {
            return Err(ValidationError::empty_field("deliverables"));
        }
        for (i, deliverable) in self.deliverables.iter().enumerate() {
            if deliverable.platform.trim().is_empty() {
                return Err(ValidationError::empty_field(format!(
                    "deliverables[{}].platform",
                    i
                )));
            }
            if deliverable.count < 1 {
                return Err(ValidationError::below_minimum(
                    format!("deliverables[{}].count", i),
                    1,
                    deliverable.count,
                ));
            }
        }

        if self.brand_poc.name.trim().is_empty() {
            return Err(ValidationError::empty_field("brand_poc.name"));
        }
        if !is_plausible_email(&self.brand_poc.email) {
            return Err(ValidationError::invalid_format(
                "brand_poc.email",
                "must be an email address",
            ));
        }

        Ok(())
    }

    /// The price as an exact money amount.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the amount is negative, not finite, has more
    ///   than two decimal places, or exceeds the storable maximum
    pub fn agreed_amount(&self) -> Result<Decimal, ValidationError> {
        amount_from_f64("price.amount", self.price.amount)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn valid_terms_json() -> serde_json::Value {
        serde_json::json!({
            "price": { "amount": 1500.0, "currency": "USD", "schedule": "net_30" },
            "usage_rights": "Organic use for 90 days",
            "deliverables": [
                { "platform": "tiktok", "count": 2 },
                { "platform": "instagram", "count": 1, "notes": "Story with link sticker" }
            ],
            "due_dates": { "content_due": "2024-07-01", "go_live": "2024-07-08" },
            "brand_poc": { "name": "Jordan Lee", "email": "jordan@brand.example" }
        })
    }

    pub fn valid_terms() -> AgreementTerms {
        AgreementTerms::from_json(valid_terms_json()).unwrap()
    }
}
