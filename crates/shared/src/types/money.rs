//! Money and currency types with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts wrap `rust_decimal::Decimal` for exact arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places every settled amount is carried with.
pub const MONEY_SCALE: u32 = 2;

/// The single currency account balances are held in.
pub const BASE_CURRENCY: &str = "EUR";

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The decimal amount.
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "EUR", "USD").
    pub currency: Currency,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates an amount denominated in the base currency.
    #[must_use]
    pub fn base(amount: Decimal) -> Self {
        Self {
            amount,
            currency: Currency::base(),
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }

    /// Returns true if this amount is already denominated in the base currency.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.currency.is_base()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// ISO 4217 currency code.
///
/// Stored normalized to uppercase. The set of codes is open: the external
/// rate provider decides which currencies actually resolve on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Returns the base currency (EUR).
    #[must_use]
    pub fn base() -> Self {
        Self(BASE_CURRENCY.to_string())
    }

    /// Returns true if this is the base currency.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.0 == BASE_CURRENCY
    }

    /// The currency code as a string slice.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(format!("Invalid currency code: {s}"));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for Currency {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}
