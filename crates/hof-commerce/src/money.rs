//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations.
//!
//! [`Money::display`] is the single formatting routine for prices. The cart
//! view, the admin price editor and the WhatsApp order message all go
//! through it, so a customer never sees two renderings of the same amount.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "BRL" => Some(Currency::BRL),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }

    fn locale(&self) -> Locale {
        match self {
            Currency::BRL => Locale {
                thousands: '.',
                decimal: ',',
                symbol_spacing: " ",
            },
            Currency::USD => Locale {
                thousands: ',',
                decimal: '.',
                symbol_spacing: "",
            },
            Currency::EUR => Locale {
                thousands: '.',
                decimal: ',',
                symbol_spacing: "",
            },
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Separators used when rendering an amount.
struct Locale {
    thousands: char,
    decimal: char,
    symbol_spacing: &'static str,
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (centavos for BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use hof_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(890.0, Currency::BRL);
    /// assert_eq!(price.amount_cents, 89000);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Parse a decimal string such as `890`, `5.50`, `5,50` or `1.234,56`.
    ///
    /// The last `.` or `,` followed by one or two digits is the decimal
    /// separator; every other separator is treated as grouping.
    pub fn parse(input: &str, currency: Currency) -> Option<Self> {
        let trimmed = input
            .trim()
            .trim_start_matches(currency.symbol())
            .trim();
        if trimmed.is_empty() {
            return None;
        }
        let negative = trimmed.starts_with('-');
        let body = trimmed.trim_start_matches('-');
        if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return None;
        }

        let (whole, fraction) = match body.rfind(['.', ',']) {
            Some(pos) if body.len() - pos - 1 <= 2 => (&body[..pos], &body[pos + 1..]),
            _ => (body, ""),
        };

        let whole_digits: String = whole.chars().filter(char::is_ascii_digit).collect();
        let whole_value: i64 = if whole_digits.is_empty() {
            0
        } else {
            whole_digits.parse().ok()?
        };
        let fraction_value: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().ok()? * 10,
            _ => fraction.parse().ok()?,
        };

        let cents = whole_value.checked_mul(100)?.checked_add(fraction_value)?;
        Some(Self::new(if negative { -cents } else { cents }, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format with the currency's locale (e.g., "R$ 1.234,56").
    pub fn display(&self) -> String {
        let locale = self.currency.locale();
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{sign}{}{}{}",
            self.currency.symbol(),
            locale.symbol_spacing,
            self.display_amount()
        )
    }

    /// Format without symbol (e.g., "1.234,56").
    pub fn display_amount(&self) -> String {
        let locale = self.currency.locale();
        let cents = self.amount_cents.unsigned_abs();
        let whole = (cents / 100).to_string();
        let fraction = cents % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(locale.thousands);
            }
            grouped.push(c);
        }

        format!("{grouped}{}{fraction:02}", locale.decimal)
    }

    /// Try to add another Money value, returning None if currencies don't
    /// match or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Try to multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a quantity, clamping at the representable range.
    pub fn saturating_multiply(&self, factor: i64) -> Money {
        Money::new(self.amount_cents.saturating_mul(factor), self.currency)
    }

    /// Sum an iterator of Money values, returning None on currency mismatch
    /// or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl Add for Money {
    type Output = Option<Money>;

    fn add(self, other: Money) -> Option<Money> {
        self.try_add(&other)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        self.saturating_multiply(factor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(5.5, Currency::BRL);
        assert_eq!(m.amount_cents, 550);
    }

    #[test]
    fn test_brl_display() {
        assert_eq!(Money::new(2000, Currency::BRL).display(), "R$ 20,00");
        assert_eq!(Money::new(550, Currency::BRL).display(), "R$ 5,50");
        assert_eq!(Money::new(123456, Currency::BRL).display(), "R$ 1.234,56");
        assert_eq!(Money::new(100000000, Currency::BRL).display(), "R$ 1.000.000,00");
        assert_eq!(Money::new(7, Currency::BRL).display(), "R$ 0,07");
    }

    #[test]
    fn test_other_locales() {
        assert_eq!(Money::new(123456, Currency::USD).display(), "$1,234.56");
        assert_eq!(Money::new(123456, Currency::EUR).display(), "\u{20ac}1.234,56");
        assert_eq!(Money::new(-550, Currency::BRL).display(), "-R$ 5,50");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("890", Currency::BRL).unwrap().amount_cents, 89000);
        assert_eq!(Money::parse("5.50", Currency::BRL).unwrap().amount_cents, 550);
        assert_eq!(Money::parse("5,5", Currency::BRL).unwrap().amount_cents, 550);
        assert_eq!(Money::parse("1.234,56", Currency::BRL).unwrap().amount_cents, 123456);
        assert_eq!(Money::parse("R$ 1.200", Currency::BRL).unwrap().amount_cents, 120000);
        assert!(Money::parse("", Currency::BRL).is_none());
        assert!(Money::parse("12a", Currency::BRL).is_none());
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::new(1000, Currency::BRL);
        let b = Money::new(550, Currency::BRL);
        assert_eq!((a + b).unwrap().amount_cents, 1550);
        assert_eq!(a.try_multiply(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::BRL).try_multiply(2).is_none());
        assert!(a.try_add(&Money::new(1, Currency::USD)).is_none());
    }

    #[test]
    fn test_try_sum() {
        let values = [
            Money::new(2000, Currency::BRL),
            Money::new(550, Currency::BRL),
        ];
        let total = Money::try_sum(values.iter(), Currency::BRL).unwrap();
        assert_eq!(total.display(), "R$ 25,50");

        let overflow = [Money::new(i64::MAX, Currency::BRL), Money::new(1, Currency::BRL)];
        assert!(Money::try_sum(overflow.iter(), Currency::BRL).is_none());

        let mixed = [Money::new(100, Currency::BRL), Money::new(100, Currency::USD)];
        assert!(Money::try_sum(mixed.iter(), Currency::BRL).is_none());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("brl"), Some(Currency::BRL));
        assert_eq!(Currency::from_code("JPY"), None);
    }
}
