//! Money formatting for forecast annotations.

/// Renders signed cent amounts with a currency symbol, e.g. `+$1,250.00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountFormat {
    symbol: String,
    decimal_separator: char,
    grouping_separator: char,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self::for_currency("USD")
    }
}

impl AmountFormat {
    pub fn for_currency(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        let symbol = match code.as_str() {
            "USD" | "CAD" | "AUD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            _ => format!("{code} "),
        };
        Self {
            symbol,
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }

    pub fn with_separators(mut self, decimal: char, grouping: char) -> Self {
        self.decimal_separator = decimal;
        self.grouping_separator = grouping;
        self
    }

    /// Always carries an explicit sign.
    pub fn signed(&self, cents: i64) -> String {
        let sign = if cents < 0 { '-' } else { '+' };
        format!("{sign}{}", self.unsigned(cents.unsigned_abs()))
    }

    /// Sign only when negative.
    pub fn plain(&self, cents: i64) -> String {
        let body = self.unsigned(cents.unsigned_abs());
        if cents < 0 {
            format!("-{body}")
        } else {
            body
        }
    }

    /// Annotation for one delta landing on a day, e.g. `-$50.00: Rent`.
    pub fn describe(&self, cents: i64, description: &str) -> String {
        format!("{}: {}", self.signed(cents), description)
    }

    fn unsigned(&self, cents: u64) -> String {
        let whole = group_thousands(cents / 100, self.grouping_separator);
        format!(
            "{}{}{}{:02}",
            self.symbol,
            whole,
            self.decimal_separator,
            cents % 100
        )
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Largest per-occurrence amount a rule may carry.
pub const MAX_AMOUNT: f64 = 1e12;

/// Converts a magnitude to whole cents, saturating at `±i64::MAX` so the
/// result can always be negated.
pub fn to_cents(amount: f64) -> i64 {
    ((amount * 100.0).round() as i64).max(-i64::MAX)
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amounts_carry_symbol_and_sign() {
        let format = AmountFormat::default();
        assert_eq!(format.signed(5_000), "+$50.00");
        assert_eq!(format.signed(-5_000), "-$50.00");
        assert_eq!(format.signed(123_456_789), "+$1,234,567.89");
        assert_eq!(format.signed(7), "+$0.07");
    }

    #[test]
    fn describe_joins_delta_and_label() {
        let format = AmountFormat::default();
        assert_eq!(format.describe(5_000, "Paycheck"), "+$50.00: Paycheck");
    }

    #[test]
    fn other_currencies_and_separators() {
        let euro = AmountFormat::for_currency("eur").with_separators(',', '.');
        assert_eq!(euro.plain(-123_450), "-€1.234,50");
        let franc = AmountFormat::for_currency("CHF");
        assert_eq!(franc.plain(990), "CHF 9.90");
    }

    #[test]
    fn cents_round_trip_common_values() {
        assert_eq!(to_cents(12.34), 1234);
        assert_eq!(to_cents(0.1 + 0.2), 30);
        assert_eq!(from_cents(-10_050), -100.5);
    }

    #[test]
    fn out_of_range_amounts_saturate() {
        assert_eq!(to_cents(1e30), i64::MAX);
        assert_eq!(to_cents(-1e30), -i64::MAX);
        assert_eq!(-to_cents(-1e30), i64::MAX);
        assert_eq!(to_cents(f64::NAN), 0);
    }
}
