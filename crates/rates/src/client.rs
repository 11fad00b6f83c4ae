//! HTTP client for the historical exchange-rate API.
//!
//! Lookup failure is not an error at this layer: the provider contract is
//! `Option<Decimal>`, and every failure mode (transport, non-success status,
//! body shape, missing or non-positive rate) is logged here and collapses to
//! `None` for the caller.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use kasse_core::currency::RateProvider;
use kasse_shared::config::RatesConfig;
use kasse_shared::types::money::{BASE_CURRENCY, Currency};

/// Body of a historical-rates response.
///
/// Only the rate table is read; the echoed base and date fields are ignored.
#[derive(Debug, Deserialize)]
struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    /// Picks the usable rate for `currency`, if the table holds one.
    fn rate_for(&self, currency: &Currency) -> Option<Decimal> {
        self.rates
            .get(currency.code())
            .copied()
            .filter(|rate| *rate > Decimal::ZERO)
    }
}

/// Rate provider backed by the exchange-rate HTTP API.
pub struct ExchangeRateClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExchangeRateClient {
    /// Builds a client from the rates section of the configuration.
    pub fn new(config: &RatesConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the historical-rates endpoint for one date and currency.
    fn request_url(&self, date: NaiveDate, currency: &Currency) -> String {
        format!(
            "{}/{}?base={}&symbols={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            BASE_CURRENCY,
            currency.code()
        )
    }
}

#[async_trait]
impl RateProvider for ExchangeRateClient {
    async fn fetch_rate(&self, date: NaiveDate, currency: &Currency) -> Option<Decimal> {
        let url = self.request_url(date, currency);
        debug!(%url, "fetching exchange rate");

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%currency, %date, error = %e, "rate request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                %currency, %date, status = %response.status(),
                "rate API returned non-success status"
            );
            return None;
        }

        let table: RateTable = match response.json().await {
            Ok(table) => table,
            Err(e) => {
                warn!(%currency, %date, error = %e, "rate response body unreadable");
                return None;
            }
        };

        let rate = table.rate_for(currency);
        if rate.is_none() {
            warn!(%currency, %date, "no usable rate in response");
        }
        rate
    }
}
