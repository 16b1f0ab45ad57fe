//! Presentation helpers for derived amounts.

/// Statement figures are shown unsigned with two decimals; signs live in the checks.
pub fn display_amount(amount: f64) -> String {
    format!("{:.2}", amount.abs())
}

/// Two decimals, sign preserved. Used for running balances and discrepancies.
pub fn signed_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    // Avoid rendering "-0.00" for values that round to zero.
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_amount_drops_sign() {
        assert_eq!(display_amount(-1250.5), "1250.50");
        assert_eq!(display_amount(0.0), "0.00");
    }

    #[test]
    fn signed_amount_keeps_sign_but_not_negative_zero() {
        assert_eq!(signed_amount(-12.346), "-12.35");
        assert_eq!(signed_amount(-0.001), "0.00");
        assert_eq!(signed_amount(40.0), "40.00");
    }
}
