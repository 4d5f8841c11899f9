//! Money helpers. Every amount is stored as `NUMERIC(6, 2)`.

use rust_decimal::Decimal;

/// Smallest price, line price or order total the store accepts.
pub const MIN_AMOUNT: Decimal = Decimal::TWO;

/// 9999.99, the largest value a `NUMERIC(6, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999, 0, 0, false, 2);

/// 12% sales tax.
pub const TAX_RATE: Decimal = Decimal::from_parts(112, 0, 0, false, 2);

/// Rounds to cents and pins the scale so amounts always render as `x.yy`.
pub fn to_money(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}

/// Checks an amount against the storable range. Returns the message to attach
/// to the offending field.
pub fn check_amount(label: &str, value: Decimal) -> Result<(), String> {
    if value < MIN_AMOUNT {
        return Err(format!("{} must be greater than or equal to 2", label));
    }
    if value > MAX_AMOUNT {
        return Err(format!("{} must not exceed 9999.99", label));
    }
    if value.normalize().scale() > 2 {
        return Err(format!("{} must have at most 2 decimal places", label));
    }
    Ok(())
}
