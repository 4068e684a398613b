use crate::types::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Zero counts as down.
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// `$3,000.00`, `-€12.50`. Always two fractional digits.
pub fn format_currency(value: f64, currency: Currency) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let s = format!("{:.2}", value.abs());
    // -0.001 rounds to 0.00 and should not keep its sign
    let sign = if value < 0.0 && s != "0.00" { "-" } else { "" };
    format!("{}{}{}", sign, currency.symbol(), add_commas(&s))
}

pub fn format_pct(change: f64) -> String {
    if !change.is_finite() {
        return "--".to_string();
    }
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

fn add_commas(s: &str) -> String {
    let (int_part, frac) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let mut result = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let int_formatted: String = result.chars().rev().collect();
    match frac {
        Some(f) => format!("{}.{}", int_formatted, f),
        None => int_formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_usd() {
        assert_eq!(format_currency(3000.0, Currency::Usd), "$3,000.00");
        assert_eq!(format_currency(50000.0, Currency::Usd), "$50,000.00");
        assert_eq!(format_currency(1234567.891, Currency::Usd), "$1,234,567.89");
        assert_eq!(format_currency(0.5, Currency::Usd), "$0.50");
        assert_eq!(format_currency(999.999, Currency::Usd), "$1,000.00");
    }

    #[test]
    fn test_format_currency_symbols() {
        assert_eq!(format_currency(12.0, Currency::Eur), "\u{20ac}12.00");
        assert_eq!(format_currency(1500.25, Currency::Gbp), "\u{a3}1,500.25");
        assert_eq!(format_currency(7_000_000.0, Currency::Jpy), "\u{a5}7,000,000.00");
    }

    #[test]
    fn test_format_currency_negative_and_odd_values() {
        assert_eq!(format_currency(-1234.5, Currency::Usd), "-$1,234.50");
        assert_eq!(format_currency(-0.001, Currency::Usd), "$0.00");
        assert_eq!(format_currency(f64::NAN, Currency::Usd), "--");
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(1.23), "+1.23%");
        assert_eq!(format_pct(-0.5), "-0.50%");
        assert_eq!(format_pct(0.0), "0.00%");
    }

    #[test]
    fn test_trend_zero_is_down() {
        assert_eq!(Trend::of(1.23), Trend::Up);
        assert_eq!(Trend::of(-0.5), Trend::Down);
        assert_eq!(Trend::of(0.0), Trend::Down);
    }
}
