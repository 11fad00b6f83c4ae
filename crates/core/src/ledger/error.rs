//! Ledger error types for validation and business-rule rejections.
//!
//! Every core operation returns a `Result`; nothing in this crate panics to
//! abort a request. Each variant maps to a stable error code and an HTTP
//! status so the API layer can serialize rejections uniformly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use kasse_shared::types::money::Currency;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount cannot be zero.
    #[error("Amount cannot be zero")]
    ZeroAmount,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// No balance snapshot was recorded on the requested date.
    #[error("No balance recorded on {0}")]
    NoBalanceRecorded(NaiveDate),

    // ========== Currency Errors ==========
    /// No usable exchange rate for the currency on the given date.
    #[error("No exchange rate available for {currency} on {date}")]
    ConversionUnavailable {
        /// Source currency code.
        currency: Currency,
        /// Date for which the rate was requested.
        date: NaiveDate,
    },

    // ========== Business Rule Rejections ==========
    /// Withdrawal exceeds the available balance.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount requested, in base currency.
        requested: Decimal,
        /// Balance available, in base currency.
        available: Decimal,
    },

    /// Withdrawal would push the rolling 6-day total past the cap.
    #[error(
        "Weekly withdrawal limit exceeded: requested {requested}, \
         already withdrawn {window_total}, cap {cap}"
    )]
    WeeklyCapExceeded {
        /// Amount requested, in base currency.
        requested: Decimal,
        /// Sum already withdrawn inside the rolling window.
        window_total: Decimal,
        /// The fixed cap.
        cap: Decimal,
    },

    // ========== Transfer Errors ==========
    /// A transfer rollback failed; the ledger may be inconsistent.
    #[error("Compensation failed for account {account}: {amount} could not be restored")]
    CompensationFailed {
        /// The source account whose funds could not be restored.
        account: String,
        /// The base-currency amount left unaccounted.
        amount: Decimal,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NoBalanceRecorded(_) => "NO_BALANCE_RECORDED",
            Self::ConversionUnavailable { .. } => "CONVERSION_UNAVAILABLE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::WeeklyCapExceeded { .. } => "WEEKLY_CAP_EXCEEDED",
            Self::CompensationFailed { .. } => "COMPENSATION_FAILED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::ZeroAmount | Self::NegativeAmount => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::NoBalanceRecorded(_) => 404,

            // 422 Unprocessable - business rule rejections
            Self::ConversionUnavailable { .. }
            | Self::InsufficientFunds { .. }
            | Self::WeeklyCapExceeded { .. } => 422,

            // 500 Internal Server Error - ledger inconsistency risk
            Self::CompensationFailed { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(LedgerError::NegativeAmount.error_code(), "NEGATIVE_AMOUNT");
        assert_eq!(
            LedgerError::AccountNotFound("bob".to_string()).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::InsufficientFunds {
                requested: dec!(100),
                available: dec!(50),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            LedgerError::WeeklyCapExceeded {
                requested: dec!(5000),
                window_total: dec!(6000),
                cap: dec!(10000),
            }
            .error_code(),
            "WEEKLY_CAP_EXCEEDED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::ZeroAmount.http_status_code(), 400);
        assert_eq!(
            LedgerError::AccountNotFound("alice".to_string()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::ConversionUnavailable {
                currency: "USD".parse().expect("valid code"),
                date: NaiveDate::from_ymd_opt(2018, 12, 9).expect("valid date"),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::CompensationFailed {
                account: "bob".to_string(),
                amount: dec!(10),
            }
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientFunds {
            requested: dec!(100.00),
            available: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 100.00, available 50.00"
        );

        let err = LedgerError::ConversionUnavailable {
            currency: "USD".parse().expect("valid code"),
            date: NaiveDate::from_ymd_opt(2018, 12, 9).expect("valid date"),
        };
        assert_eq!(
            err.to_string(),
            "No exchange rate available for USD on 2018-12-09"
        );
    }
}
