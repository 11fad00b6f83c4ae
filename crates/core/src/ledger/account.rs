//! Account state: balance, per-day snapshots, and the rolling withdrawal cap.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::error::LedgerError;

/// Maximum total withdrawn inside the rolling window, in base currency.
pub const WEEKLY_WITHDRAWAL_CAP: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Days looked back from the operation date; the window covers 6 calendar
/// days ending on the operation date, inclusive.
pub const WITHDRAWAL_WINDOW_DAYS: u64 = 5;

/// Validates a base-currency operation amount.
///
/// Zero is rejected explicitly: the reference behaviour conflated a
/// zero-valued result with "no result", so zero gets its own reason here.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount);
    }
    Ok(())
}

/// One user's account.
///
/// Balances are held in the base currency only. Each successful mutation
/// overwrites the day's balance snapshot; each successful withdrawal also
/// accumulates into the day's withdrawal total.
#[derive(Debug, Clone)]
pub struct Account {
    name: String,
    balance: Decimal,
    daily_balance: BTreeMap<NaiveDate, Decimal>,
    daily_withdrawal: BTreeMap<NaiveDate, Decimal>,
}

impl Account {
    /// Creates an account with a zero balance.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: Decimal::ZERO,
            daily_balance: BTreeMap::new(),
            daily_withdrawal: BTreeMap::new(),
        }
    }

    /// The account's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current balance in base currency.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Adds a base-currency amount to the balance.
    ///
    /// Returns the settled amount on success.
    pub fn deposit(&mut self, amount: Decimal, date: NaiveDate) -> Result<Decimal, LedgerError> {
        validate_amount(amount)?;
        self.balance += amount;
        self.daily_balance.insert(date, self.balance);
        Ok(amount)
    }

    /// Removes a base-currency amount from the balance.
    ///
    /// The rolling-cap check runs before the funds check, so a withdrawal
    /// failing both reports the cap. Returns the amount withdrawn on success.
    pub fn withdraw(&mut self, amount: Decimal, date: NaiveDate) -> Result<Decimal, LedgerError> {
        validate_amount(amount)?;

        let window_total = self.withdrawn_in_window(date);
        if window_total + amount > WEEKLY_WITHDRAWAL_CAP {
            return Err(LedgerError::WeeklyCapExceeded {
                requested: amount,
                window_total,
                cap: WEEKLY_WITHDRAWAL_CAP,
            });
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        self.daily_balance.insert(date, self.balance);
        *self.daily_withdrawal.entry(date).or_insert(Decimal::ZERO) += amount;
        Ok(amount)
    }

    /// The balance snapshot recorded on exactly `date`.
    ///
    /// Snapshots are never inferred from neighbouring dates: a date with no
    /// successful mutation has no snapshot.
    pub fn balance_on(&self, date: NaiveDate) -> Result<Decimal, LedgerError> {
        self.daily_balance
            .get(&date)
            .copied()
            .ok_or(LedgerError::NoBalanceRecorded(date))
    }

    /// Sum of withdrawals inside the rolling window ending on `date`.
    #[must_use]
    pub fn withdrawn_in_window(&self, date: NaiveDate) -> Decimal {
        let start = date
            .checked_sub_days(Days::new(WITHDRAWAL_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        self.daily_withdrawal.range(start..=date).map(|(_, v)| *v).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_deposit_updates_balance_and_snapshot() {
        let mut account = Account::new("bob");
        let d = date(2018, 12, 9);

        assert_eq!(account.deposit(dec!(2000), d), Ok(dec!(2000)));
        assert_eq!(account.balance(), dec!(2000));
        assert_eq!(account.balance_on(d), Ok(dec!(2000)));
    }

    #[test]
    fn test_snapshot_is_last_mutation_of_the_day() {
        let mut account = Account::new("bob");
        let d = date(2018, 12, 9);

        account.deposit(dec!(2000), d).expect("deposit");
        account.withdraw(dec!(500), d).expect("withdraw");
        assert_eq!(account.balance_on(d), Ok(dec!(1500)));
    }

    #[test]
    fn test_balance_on_unknown_date_is_absent() {
        let mut account = Account::new("bob");
        account.deposit(dec!(100), date(2018, 12, 9)).expect("deposit");

        let other = date(2018, 12, 10);
        assert_eq!(
            account.balance_on(other),
            Err(LedgerError::NoBalanceRecorded(other))
        );
    }

    #[test]
    fn test_withdraw_insufficient_funds_leaves_state_untouched() {
        let mut account = Account::new("bob");
        let d = date(2018, 12, 9);
        account.deposit(dec!(1000), d).expect("deposit");

        let err = account.withdraw(dec!(2000), d).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                requested: dec!(2000),
                available: dec!(1000),
            }
        );
        assert_eq!(account.balance(), dec!(1000));
        assert_eq!(account.withdrawn_in_window(d), dec!(0));
    }

    #[test]
    fn test_withdraw_accumulates_daily_withdrawal() {
        let mut account = Account::new("bob");
        let d = date(2018, 12, 9);
        account.deposit(dec!(5000), d).expect("deposit");

        account.withdraw(dec!(1000), d).expect("withdraw");
        account.withdraw(dec!(500), d).expect("withdraw");
        assert_eq!(account.withdrawn_in_window(d), dec!(1500));
        assert_eq!(account.balance(), dec!(3500));
    }

    #[test]
    fn test_weekly_cap_blocks_within_window() {
        let mut account = Account::new("bob");
        account.deposit(dec!(50000), date(2018, 12, 1)).expect("deposit");

        // 6000 on day 4, 4000 on day 9: window for day 9 covers days 4..=9.
        account.withdraw(dec!(6000), date(2018, 12, 4)).expect("withdraw");
        let err = account.withdraw(dec!(4001), date(2018, 12, 9)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::WeeklyCapExceeded {
                requested: dec!(4001),
                window_total: dec!(6000),
                cap: WEEKLY_WITHDRAWAL_CAP,
            }
        );

        // Exactly at the cap is still allowed.
        assert_eq!(
            account.withdraw(dec!(4000), date(2018, 12, 9)),
            Ok(dec!(4000))
        );
    }

    #[test]
    fn test_weekly_cap_releases_outside_window() {
        let mut account = Account::new("bob");
        account.deposit(dec!(50000), date(2018, 12, 1)).expect("deposit");

        account.withdraw(dec!(10000), date(2018, 12, 3)).expect("withdraw");

        // Day 8 still sees day 3; day 9 no longer does.
        assert!(matches!(
            account.withdraw(dec!(1), date(2018, 12, 8)),
            Err(LedgerError::WeeklyCapExceeded { .. })
        ));
        assert_eq!(account.withdraw(dec!(1), date(2018, 12, 9)), Ok(dec!(1)));
    }

    #[test]
    fn test_cap_check_runs_before_funds_check() {
        // Request rejected by both rules reports the cap, matching the
        // reference ordering.
        let mut account = Account::new("bob");
        account.deposit(dec!(100), date(2018, 12, 9)).expect("deposit");

        let err = account.withdraw(dec!(10001), date(2018, 12, 9)).unwrap_err();
        assert!(matches!(err, LedgerError::WeeklyCapExceeded { .. }));
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        let mut account = Account::new("bob");
        let d = date(2018, 12, 9);

        assert_eq!(account.deposit(dec!(0), d), Err(LedgerError::ZeroAmount));
        assert_eq!(
            account.deposit(dec!(-5), d),
            Err(LedgerError::NegativeAmount)
        );
        assert_eq!(account.withdraw(dec!(0), d), Err(LedgerError::ZeroAmount));
        assert_eq!(
            account.withdraw(dec!(-5), d),
            Err(LedgerError::NegativeAmount)
        );
        // No snapshot is recorded by failed operations.
        assert_eq!(account.balance_on(d), Err(LedgerError::NoBalanceRecorded(d)));
    }
}
