//! Type-safe money representation using decimal arithmetic.
//!
//! Platform money values arrive as an integer amount in the currency's minor
//! unit plus the number of fraction digits. Conversion to a [`Decimal`] is
//! exact, and display formatting follows the separator conventions of the
//! requested locale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest scale a [`Decimal`] can represent.
const MAX_FRACTION_DIGITS: u32 = 28;

/// No-break space used between amount and symbol, and as the French-style
/// thousands separator.
const NBSP: char = '\u{a0}';

/// A monetary amount in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's minor unit (e.g. cents for EUR).
    pub cent_amount: i64,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Number of digits after the decimal separator.
    #[serde(default = "default_fraction_digits")]
    pub fraction_digits: u32,
}

const fn default_fraction_digits() -> u32 {
    2
}

impl Money {
    /// Create a money value.
    #[must_use]
    pub fn new(cent_amount: i64, currency_code: impl Into<String>, fraction_digits: u32) -> Self {
        Self {
            cent_amount,
            currency_code: currency_code.into(),
            fraction_digits,
        }
    }

    /// The amount in the currency's standard unit.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.cent_amount, self.fraction_digits.min(MAX_FRACTION_DIGITS))
    }

    /// Format for display using the conventions of `locale` (e.g. `en`, `de-DE`).
    ///
    /// Unknown locales fall back to English conventions.
    #[must_use]
    pub fn format(&self, locale: &str) -> String {
        let style = NumberStyle::for_locale(locale);
        let amount = self.amount();
        let digits = amount.abs().to_string();
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut number = group_thousands(integer, style.group_separator());
        if !fraction.is_empty() {
            number.push(style.decimal_separator());
            number.push_str(fraction);
        }

        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };

        match (style, currency_symbol(&self.currency_code)) {
            (NumberStyle::English, Some(symbol)) => format!("{sign}{symbol}{number}"),
            (NumberStyle::English, None) => format!("{sign}{}{NBSP}{number}", self.currency_code),
            (_, Some(symbol)) => format!("{sign}{number}{NBSP}{symbol}"),
            (_, None) => format!("{sign}{number}{NBSP}{}", self.currency_code),
        }
    }
}

/// Digit grouping and decimal conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberStyle {
    /// `€1,234.56`
    English,
    /// `1.234,56 €`
    Continental,
    /// `1 234,56 €`
    Spaced,
}

impl NumberStyle {
    fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "de" | "nl" | "es" | "it" | "pt" | "da" | "id" | "tr" => Self::Continental,
            "fr" | "pl" | "cs" | "sv" | "nb" | "fi" | "ru" => Self::Spaced,
            _ => Self::English,
        }
    }

    const fn group_separator(self) -> char {
        match self {
            Self::English => ',',
            Self::Continental => '.',
            Self::Spaced => NBSP,
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::English => '.',
            Self::Continental | Self::Spaced => ',',
        }
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "EUR" => Some("€"),
        "USD" => Some("$"),
        "GBP" => Some("£"),
        "JPY" | "CNY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_uses_fraction_digits() {
        assert_eq!(Money::new(12_345, "EUR", 2).amount(), Decimal::new(12_345, 2));
        assert_eq!(Money::new(500, "JPY", 0).amount(), Decimal::from(500));
    }

    #[test]
    fn test_format_english() {
        assert_eq!(Money::new(123_456, "EUR", 2).format("en"), "€1,234.56");
        assert_eq!(Money::new(1_999, "USD", 2).format("en-US"), "$19.99");
        assert_eq!(Money::new(0, "GBP", 2).format("en-GB"), "£0.00");
    }

    #[test]
    fn test_format_continental() {
        assert_eq!(
            Money::new(123_456, "EUR", 2).format("de-DE"),
            "1.234,56\u{a0}€"
        );
    }

    #[test]
    fn test_format_spaced() {
        assert_eq!(
            Money::new(123_456_789, "EUR", 2).format("fr"),
            "1\u{a0}234\u{a0}567,89\u{a0}€"
        );
    }

    #[test]
    fn test_format_unknown_currency_uses_code() {
        assert_eq!(Money::new(1_050, "CHF", 2).format("en"), "CHF\u{a0}10.50");
        assert_eq!(Money::new(1_050, "CHF", 2).format("de"), "10,50\u{a0}CHF");
    }

    #[test]
    fn test_format_negative_and_no_fraction() {
        assert_eq!(Money::new(-250, "EUR", 2).format("en"), "-€2.50");
        assert_eq!(Money::new(1_000_000, "JPY", 0).format("en"), "¥1,000,000");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(Money::new(100, "USD", 2).format("xx"), "$1.00");
        assert_eq!(Money::new(100, "USD", 2).format(""), "$1.00");
    }

    #[test]
    fn test_deserialize_platform_shape() {
        let money: Money = serde_json::from_str(
            r#"{"centAmount": 4200, "currencyCode": "EUR", "fractionDigits": 2}"#,
        )
        .expect("valid money");
        assert_eq!(money, Money::new(4_200, "EUR", 2));
    }
}
