use rust_decimal::{Decimal, RoundingStrategy};

/// All fees and payments are recorded in Indian Rupees.
pub const CURRENCY_CODE: &str = "INR";

/// Maximum decimal places accepted for an amount (paise)
pub const AMOUNT_SCALE: u32 = 2;

/// Amounts are stored as DECIMAL(12, 2), so ten integer digits at most
pub const MAX_AMOUNT_EXCLUSIVE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Validates a fee or payment amount entered through the API
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("{} amount cannot be negative", CURRENCY_CODE));
    }

    if amount >= MAX_AMOUNT_EXCLUSIVE {
        return Err(format!(
            "{} amount must be below {}",
            CURRENCY_CODE, MAX_AMOUNT_EXCLUSIVE
        ));
    }

    let scale = amount.normalize().scale();
    if scale > AMOUNT_SCALE {
        return Err(format!(
            "{} amounts must have at most {} decimal places, got {}",
            CURRENCY_CODE, AMOUNT_SCALE, scale
        ));
    }

    Ok(())
}

/// Plain numeric rendering for CSV cells: no symbol, no trailing zeros.
pub fn plain_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Formats an amount for display the way the dashboard cards show it:
/// rupee sign, Indian digit grouping (12,34,567), no fractional part.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().normalize().to_string();
    let grouped = group_indian(&digits);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}
