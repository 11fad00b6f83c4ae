//! Exchange-rate provider seam.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use kasse_shared::types::money::Currency;

/// Source of historical exchange rates.
///
/// Implementations return the number of units of `currency` per 1 base-currency
/// unit on `date`, or `None` when no usable rate exists: transport failure,
/// non-success response, currency absent from the rate table, or a
/// non-positive rate. Absence is the whole failure signal; providers log
/// their own diagnostics and never abort the calling operation.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the rate for `currency` on `date`.
    async fn fetch_rate(&self, date: NaiveDate, currency: &Currency) -> Option<Decimal>;
}
