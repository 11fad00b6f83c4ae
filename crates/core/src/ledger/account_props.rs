//! Property-based tests for account state.
//!
//! Covered invariants:
//! - Balance conservation: balance equals accepted deposits minus accepted
//!   withdrawals.
//! - The balance never goes negative.
//! - No rolling window ever holds more than the weekly cap.
//! - The daily snapshot always reflects the last accepted mutation of a day.
//! - Rejected operations leave the account untouched.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::{Account, WEEKLY_WITHDRAWAL_CAP};

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a day offset inside one month of activity.
fn day_offset() -> impl Strategy<Value = u64> {
    0u64..30
}

/// One requested account mutation.
#[derive(Debug, Clone)]
enum Op {
    Deposit(Decimal, u64),
    Withdraw(Decimal, u64),
}

/// Strategy to generate a mixed sequence of deposits and withdrawals.
fn op_sequence() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (positive_amount(), day_offset()).prop_map(|(a, d)| Op::Deposit(a, d)),
            (positive_amount(), day_offset()).prop_map(|(a, d)| Op::Withdraw(a, d)),
        ],
        1..40,
    )
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 12, 1).expect("valid date")
}

fn offset_date(offset: u64) -> NaiveDate {
    base_date()
        .checked_add_days(Days::new(offset))
        .expect("date in range")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of operations, the balance equals the sum of
    /// accepted deposits minus the sum of accepted withdrawals, and never
    /// goes negative.
    #[test]
    fn prop_balance_conservation(ops in op_sequence()) {
        let mut account = Account::new("bob");
        let mut deposited = Decimal::ZERO;
        let mut withdrawn = Decimal::ZERO;

        for op in ops {
            match op {
                Op::Deposit(amount, offset) => {
                    if account.deposit(amount, offset_date(offset)).is_ok() {
                        deposited += amount;
                    }
                }
                Op::Withdraw(amount, offset) => {
                    if account.withdraw(amount, offset_date(offset)).is_ok() {
                        withdrawn += amount;
                    }
                }
            }
            prop_assert!(
                account.balance() >= Decimal::ZERO,
                "balance went negative: {}",
                account.balance()
            );
        }

        prop_assert_eq!(account.balance(), deposited - withdrawn);
    }

    /// *For any* sequence of operations, the rolling window ending on any
    /// active day never holds more than the weekly cap.
    #[test]
    fn prop_window_never_exceeds_cap(ops in op_sequence()) {
        let mut account = Account::new("bob");
        // A large opening balance keeps withdrawals limited by the cap,
        // not by funds.
        account
            .deposit(Decimal::new(100_000_000, 2), base_date())
            .expect("seed deposit");

        for op in ops {
            if let Op::Withdraw(amount, offset) = op {
                let _ = account.withdraw(amount, offset_date(offset));
            }
        }

        for offset in 0..36 {
            prop_assert!(
                account.withdrawn_in_window(offset_date(offset)) <= WEEKLY_WITHDRAWAL_CAP,
                "window ending {} over cap",
                offset_date(offset)
            );
        }
    }

    /// *For any* accepted mutation, the day's snapshot equals the balance
    /// right after that mutation.
    #[test]
    fn prop_snapshot_tracks_last_mutation(ops in op_sequence()) {
        let mut account = Account::new("bob");

        for op in ops {
            let (accepted, date) = match op {
                Op::Deposit(amount, offset) => {
                    let date = offset_date(offset);
                    (account.deposit(amount, date).is_ok(), date)
                }
                Op::Withdraw(amount, offset) => {
                    let date = offset_date(offset);
                    (account.withdraw(amount, date).is_ok(), date)
                }
            };
            if accepted {
                prop_assert_eq!(account.balance_on(date), Ok(account.balance()));
            }
        }
    }

    /// *For any* rejected withdrawal, the balance, the snapshot map, and the
    /// withdrawal window are all left untouched.
    #[test]
    fn prop_rejected_withdrawal_leaves_state(
        seed in positive_amount(),
        excess in positive_amount(),
    ) {
        let mut account = Account::new("bob");
        let d = base_date();
        account.deposit(seed, d).expect("seed deposit");
        let window_before = account.withdrawn_in_window(d);

        let result = account.withdraw(seed + excess + WEEKLY_WITHDRAWAL_CAP, d);

        prop_assert!(result.is_err());
        prop_assert_eq!(account.balance(), seed);
        prop_assert_eq!(account.balance_on(d), Ok(seed));
        prop_assert_eq!(account.withdrawn_in_window(d), window_before);
    }
}
