//! Money amount rules shared by deals, terms and conversation logs.
//!
//! Amounts are stored as `NUMERIC(14, 2)`, so anything accepted here fits
//! a column without rounding.

use rust_decimal::Decimal;

use crate::domain::foundation::ValidationError;

/// Decimal places an amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// Largest storable amount: 999,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Checks sign, precision and magnitude of an amount.
pub fn validate_amount(field: &str, amount: Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::invalid_format(field, "must not be negative"));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::invalid_format(
            field,
            format!("must have at most {} decimal places", MONEY_SCALE),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::invalid_format(
            field,
            format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(())
}

/// Converts a JSON number into an exact amount.
///
/// Goes through the shortest decimal rendering of the float, so `1234.56`
/// becomes exactly `1234.56` rather than its binary approximation.
pub fn amount_from_f64(field: &str, amount: f64) -> Result<Decimal, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::invalid_format(field, "must be a finite number"));
    }
    if amount > 1e12 {
        return Err(ValidationError::invalid_format(
            field,
            format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    let decimal: Decimal = amount
        .to_string()
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "not representable as money"))?;
    validate_amount(field, decimal)?;
    Ok(decimal)
}
