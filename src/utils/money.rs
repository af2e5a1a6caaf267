use rust_decimal::{Decimal, RoundingStrategy};

/// Arrondi monétaire à 2 décimales (banquier évité: demi vers le haut)
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// "1234.5" -> "1234.50"
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}

/// "150" -> "$150.00"
pub fn format_dollars(amount: Decimal) -> String {
    format!("${}", format_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(Decimal::new(12345, 1)), "1234.50");
        assert_eq!(format_amount(Decimal::new(10005, 3)), "10.01");
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(Decimal::from(150)), "$150.00");
    }
}
