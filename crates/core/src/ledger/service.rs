//! Ledger service: account resolution, conversion-then-mutation, transfers.
//!
//! The rate lookup is awaited *before* the directory lock is taken, so a slow
//! provider never blocks unrelated operations. No await happens under the
//! lock; transfers mutate both accounts inside a single critical section.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use kasse_shared::types::money::Money;

use super::account::validate_amount;
use super::directory::Directory;
use super::error::LedgerError;
use crate::currency::{RateProvider, to_base};

/// Coordinates account operations over a shared directory.
pub struct LedgerService {
    directory: Mutex<Directory>,
    rates: Arc<dyn RateProvider>,
}

impl LedgerService {
    /// Creates a service over an explicitly constructed directory.
    #[must_use]
    pub fn new(directory: Directory, rates: Arc<dyn RateProvider>) -> Self {
        Self {
            directory: Mutex::new(directory),
            rates,
        }
    }

    /// Deposits `money` into the named account.
    ///
    /// Foreign-currency amounts are converted first; a failed lookup aborts
    /// the deposit with no state change. Returns the settled base-currency
    /// amount.
    pub async fn deposit(
        &self,
        account: &str,
        money: Money,
        date: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let settled = self.settle(&money, date).await?;

        let mut directory = self.lock_directory();
        let deposited = directory
            .get_mut(account)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?
            .deposit(settled, date)?;
        info!(account, amount = %deposited, %date, "deposit settled");
        Ok(deposited)
    }

    /// Withdraws `money` from the named account.
    ///
    /// Conversion-first like deposits; the rolling cap and the funds check
    /// run in that order. Returns the settled base-currency amount.
    pub async fn withdraw(
        &self,
        account: &str,
        money: Money,
        date: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let settled = self.settle(&money, date).await?;

        let mut directory = self.lock_directory();
        let withdrawn = directory
            .get_mut(account)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?
            .withdraw(settled, date)
            .inspect_err(
                |e| warn!(account, amount = %settled, %date, error = %e, "withdrawal rejected"),
            )?;
        info!(account, amount = %withdrawn, %date, "withdrawal settled");
        Ok(withdrawn)
    }

    /// Moves funds between two accounts.
    ///
    /// The withdrawal half converts into base currency; the deposit half
    /// receives that already-settled amount and never consults the rate
    /// provider again. If the deposit half is rejected, the withdrawn amount
    /// is re-credited to the source; a failed re-credit surfaces as
    /// [`LedgerError::CompensationFailed`] and marks a ledger inconsistency.
    ///
    /// Returns the settled base-currency amount on success.
    pub async fn transfer(
        &self,
        from: &str,
        to: &str,
        money: Money,
        date: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let settled = self.settle(&money, date).await?;

        let mut directory = self.lock_directory();
        // Resolve both parties before touching either balance.
        if !directory.contains(to) {
            return Err(LedgerError::AccountNotFound(to.to_string()));
        }

        let withdrawn = directory
            .get_mut(from)
            .ok_or_else(|| LedgerError::AccountNotFound(from.to_string()))?
            .withdraw(settled, date)?;

        let deposit_result = directory
            .get_mut(to)
            .ok_or_else(|| LedgerError::AccountNotFound(to.to_string()))
            .and_then(|account| account.deposit(withdrawn, date));

        match deposit_result {
            Ok(_) => {
                info!(from, to, amount = %withdrawn, %date, "transfer completed");
                Ok(withdrawn)
            }
            Err(deposit_err) => {
                let restored = directory
                    .get_mut(from)
                    .ok_or_else(|| LedgerError::AccountNotFound(from.to_string()))
                    .and_then(|account| account.deposit(withdrawn, date));
                match restored {
                    Ok(_) => {
                        warn!(
                            from, to, amount = %withdrawn, %date, error = %deposit_err,
                            "transfer deposit rejected, source compensated"
                        );
                        Err(deposit_err)
                    }
                    Err(restore_err) => {
                        error!(
                            from, amount = %withdrawn, %date, error = %restore_err,
                            "transfer compensation failed, funds unaccounted"
                        );
                        Err(LedgerError::CompensationFailed {
                            account: from.to_string(),
                            amount: withdrawn,
                        })
                    }
                }
            }
        }
    }

    /// The balance snapshot recorded for the named account on exactly `date`.
    pub fn balance(&self, account: &str, date: NaiveDate) -> Result<Decimal, LedgerError> {
        let directory = self.lock_directory();
        directory
            .get(account)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?
            .balance_on(date)
    }

    /// Settles a requested amount into base currency.
    ///
    /// Base-currency amounts pass through untouched; foreign amounts go
    /// through the rate provider. Amounts are validated before any network
    /// call so an invalid request never reaches the provider.
    async fn settle(&self, money: &Money, date: NaiveDate) -> Result<Decimal, LedgerError> {
        validate_amount(money.amount)?;
        if money.is_base() {
            return Ok(money.amount);
        }

        let rate = self.rates.fetch_rate(date, &money.currency).await;
        let settled = rate.and_then(|rate| to_base(money.amount, rate)).ok_or_else(|| {
            LedgerError::ConversionUnavailable {
                currency: money.currency.clone(),
                date,
            }
        })?;
        debug!(
            amount = %money.amount, currency = %money.currency, %date, %settled,
            "converted to base currency"
        );
        Ok(settled)
    }

    /// Mutations are total, so a poisoned lock still holds consistent state.
    fn lock_directory(&self) -> MutexGuard<'_, Directory> {
        self.directory.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
