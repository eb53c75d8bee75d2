//! Derived views over accounts and transactions for the dashboard.
//!
//! Everything here is computed from a cached
//! [Snapshot](crate::hub::Snapshot); nothing touches the store.

use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Month};

use crate::models::{Account, Transaction, TransactionKind};

/// The headline numbers and chart series for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The sum of all account balances.
    pub total_balance: f64,
    /// Income recorded since the start of the current month.
    pub monthly_income: f64,
    /// Expenses recorded since the start of the current month.
    pub monthly_expenses: f64,
    /// This month's expenses grouped by category, largest first.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Income and expense totals for the last six months, oldest first.
    pub monthly_totals: Vec<MonthlyTotal>,
}

/// Total spending within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The amount spent.
    pub amount: f64,
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// A short label for the month, e.g. "Oct 2023".
    pub month: String,
    /// Income recorded in the month.
    pub income: f64,
    /// Expenses recorded in the month.
    pub expenses: f64,
}

/// Compute the dashboard summary as of `today`.
pub fn summarize(
    accounts: &[Account],
    transactions: &[Transaction],
    today: Date,
) -> DashboardSummary {
    DashboardSummary {
        total_balance: total_balance(accounts),
        monthly_income: monthly_total(transactions, today, TransactionKind::Income),
        monthly_expenses: monthly_total(transactions, today, TransactionKind::Expense),
        expenses_by_category: expenses_by_category(transactions, today),
        monthly_totals: monthly_totals(transactions, today),
    }
}

/// The sum of all account balances.
///
/// Balances are summed as-is even when accounts use different
/// currencies, matching how they are entered and displayed.
pub fn total_balance(accounts: &[Account]) -> f64 {
    accounts.iter().map(|account| account.balance).sum()
}

fn month_start(today: Date) -> Date {
    today
        .replace_day(1)
        .expect("every month has a first day")
}

fn monthly_total(transactions: &[Transaction], today: Date, kind: TransactionKind) -> f64 {
    let start = month_start(today);

    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind && transaction.date.date() >= start)
        .map(|transaction| transaction.amount)
        .sum()
}

fn expenses_by_category(transactions: &[Transaction], today: Date) -> Vec<CategoryTotal> {
    let start = month_start(today);
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.kind == TransactionKind::Expense && transaction.date.date() >= start {
            *totals.entry(&transaction.category).or_default() += transaction.amount;
        }
    }

    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_owned(),
            amount,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    totals
}

pub(crate) fn short_month(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        _ => (year, month.previous()),
    }
}

/// The last six calendar months up to and including `today`'s month,
/// oldest first.
pub(crate) fn last_six_months(today: Date) -> Vec<(i32, Month)> {
    let mut months = Vec::with_capacity(6);
    let (mut year, mut month) = (today.year(), today.month());

    for _ in 0..6 {
        months.push((year, month));
        (year, month) = previous_month(year, month);
    }
    months.reverse();

    months
}

fn monthly_totals(transactions: &[Transaction], today: Date) -> Vec<MonthlyTotal> {
    last_six_months(today)
        .into_iter()
        .map(|(year, month)| {
            let in_month = |transaction: &&Transaction| {
                let date = transaction.date.date();
                date.year() == year && date.month() == month
            };

            MonthlyTotal {
                month: format!("{} {year}", short_month(month)),
                income: transactions
                    .iter()
                    .filter(in_month)
                    .filter(|t| t.kind == TransactionKind::Income)
                    .map(|t| t.amount)
                    .sum(),
                expenses: transactions
                    .iter()
                    .filter(in_month)
                    .filter(|t| t.kind == TransactionKind::Expense)
                    .map(|t| t.amount)
                    .sum(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{
        OffsetDateTime,
        macros::{date, datetime},
    };

    use super::{CategoryTotal, summarize, total_balance};
    use crate::{
        models::{Account, Transaction, TransactionKind},
        settings::Currency,
    };

    fn account(id: i64, balance: f64) -> Account {
        Account {
            id,
            name: format!("Account {id}"),
            balance,
            currency: Currency::Usd,
        }
    }

    fn transaction(
        kind: TransactionKind,
        amount: f64,
        category: &str,
        date: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id: 0,
            kind,
            amount,
            category: category.to_owned(),
            account_id: 1,
            date,
            notes: None,
        }
    }

    #[test]
    fn total_balance_sums_every_account() {
        let accounts = [
            account(1, 7850.55),
            account(2, 12340.00),
            account(3, 320.10),
        ];

        // The float sum lands a hair under 20,510.65; display-level
        // rounding is the currency formatter's job.
        assert_eq!(total_balance(&accounts), 7850.55 + 12340.00 + 320.10);
    }

    #[test]
    fn monthly_totals_only_count_the_current_month() {
        let transactions = [
            transaction(
                TransactionKind::Income,
                3500.0,
                "Salary",
                datetime!(2023-10-25 09:00 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                75.5,
                "Groceries",
                datetime!(2023-10-26 18:30 UTC),
            ),
            // The month before must not count.
            transaction(
                TransactionKind::Expense,
                1200.0,
                "Rent",
                datetime!(2023-09-30 12:00 UTC),
            ),
        ];

        let summary = summarize(&[], &transactions, date!(2023 - 10 - 31));

        assert_eq!(summary.monthly_income, 3500.0);
        assert_eq!(summary.monthly_expenses, 75.5);
    }

    #[test]
    fn the_first_of_the_month_is_included() {
        let transactions = [transaction(
            TransactionKind::Expense,
            1200.0,
            "Rent",
            datetime!(2023-10-01 00:00 UTC),
        )];

        let summary = summarize(&[], &transactions, date!(2023 - 10 - 15));

        assert_eq!(summary.monthly_expenses, 1200.0);
    }

    #[test]
    fn expenses_are_grouped_by_category_largest_first() {
        let transactions = [
            transaction(
                TransactionKind::Expense,
                40.0,
                "Groceries",
                datetime!(2023-10-02 10:00 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                35.5,
                "Groceries",
                datetime!(2023-10-09 10:00 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                1200.0,
                "Rent",
                datetime!(2023-10-01 10:00 UTC),
            ),
            // Income must not show up as spending.
            transaction(
                TransactionKind::Income,
                3500.0,
                "Salary",
                datetime!(2023-10-25 10:00 UTC),
            ),
        ];

        let summary = summarize(&[], &transactions, date!(2023 - 10 - 31));

        assert_eq!(
            summary.expenses_by_category,
            vec![
                CategoryTotal {
                    category: "Rent".to_owned(),
                    amount: 1200.0
                },
                CategoryTotal {
                    category: "Groceries".to_owned(),
                    amount: 75.5
                },
            ]
        );
    }

    #[test]
    fn monthly_series_covers_six_months_oldest_first() {
        let transactions = [
            transaction(
                TransactionKind::Income,
                3500.0,
                "Salary",
                datetime!(2023-08-25 09:00 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                1200.0,
                "Rent",
                datetime!(2023-10-01 12:00 UTC),
            ),
        ];

        let summary = summarize(&[], &transactions, date!(2023 - 10 - 31));
        let months: Vec<&str> = summary
            .monthly_totals
            .iter()
            .map(|total| total.month.as_str())
            .collect();

        assert_eq!(
            months,
            vec![
                "May 2023", "Jun 2023", "Jul 2023", "Aug 2023", "Sep 2023", "Oct 2023"
            ]
        );
        assert_eq!(summary.monthly_totals[3].income, 3500.0);
        assert_eq!(summary.monthly_totals[5].expenses, 1200.0);
    }

    #[test]
    fn the_series_crosses_year_boundaries() {
        let summary = summarize(&[], &[], date!(2024 - 02 - 10));
        let months: Vec<&str> = summary
            .monthly_totals
            .iter()
            .map(|total| total.month.as_str())
            .collect();

        assert_eq!(
            months,
            vec![
                "Sep 2023", "Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024"
            ]
        );
    }

    #[test]
    fn a_mixed_fixture_produces_the_expected_headline_numbers() {
        let accounts = [
            account(1, 7850.55),
            account(2, 12340.00),
            account(3, 320.10),
        ];
        let transactions = [
            transaction(
                TransactionKind::Income,
                3500.0,
                "Salary",
                datetime!(2023-10-25 09:00 UTC),
            ),
            transaction(
                TransactionKind::Income,
                200.0,
                "Freelance",
                datetime!(2023-10-28 14:00 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                75.5,
                "Groceries",
                datetime!(2023-10-26 18:30 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                1200.0,
                "Rent",
                datetime!(2023-10-01 08:00 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                40.0,
                "Transport",
                datetime!(2023-10-12 07:45 UTC),
            ),
            transaction(
                TransactionKind::Income,
                3500.0,
                "Salary",
                datetime!(2023-09-25 09:00 UTC),
            ),
            transaction(
                TransactionKind::Expense,
                900.0,
                "Rent",
                datetime!(2023-09-01 08:00 UTC),
            ),
        ];

        let summary = summarize(&accounts, &transactions, date!(2023 - 10 - 31));

        assert_eq!(summary.total_balance, 7850.55 + 12340.00 + 320.10);
        assert_eq!(summary.monthly_income, 3700.0);
        assert_eq!(summary.monthly_expenses, 1315.5);
    }

    #[test]
    fn an_empty_snapshot_produces_zeroes() {
        let summary = summarize(&[], &[], date!(2023 - 10 - 31));

        assert_eq!(summary.total_balance, 0.0);
        assert_eq!(summary.monthly_income, 0.0);
        assert_eq!(summary.monthly_expenses, 0.0);
        assert_eq!(summary.expenses_by_category, vec![]);
    }
}
