//! Spending totals over a caller-chosen date window.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use paymetrics_core::{AccountType, ExtractedTransaction};
use rust_decimal::Decimal;
use serde::Serialize;

/// Inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Swaps the bounds if given backwards.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// The `days` days ending on `end`, inclusive
    pub fn trailing_days(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self::new(end - Duration::days(span), end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountTotal {
    pub display: String,
    pub account_type: AccountType,
    pub last_four: String,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub range: DateRange,
    pub total_spent: Decimal,
    pub transaction_count: usize,
    /// Keyed by category display name
    pub categories: BTreeMap<String, CategoryTotal>,
    /// Keyed by `ExtractedTransaction::account_key`
    pub accounts: BTreeMap<String, AccountTotal>,
}

impl SpendingSummary {
    /// Categories by amount, largest first; ties by name
    pub fn top_categories(&self) -> Vec<(&str, &CategoryTotal)> {
        let mut rows: Vec<_> = self.categories.iter().map(|(k, v)| (k.as_str(), v)).collect();
        rows.sort_by(|a, b| b.1.amount.cmp(&a.1.amount).then_with(|| a.0.cmp(b.0)));
        rows
    }
}

/// Group records inside `range` by category and by account.
pub fn summarize(records: &[ExtractedTransaction], range: DateRange) -> SpendingSummary {
    let mut categories: BTreeMap<String, CategoryTotal> = BTreeMap::new();
    let mut accounts: BTreeMap<String, AccountTotal> = BTreeMap::new();
    let mut total_spent = Decimal::ZERO;
    let mut transaction_count = 0;

    for txn in records.iter().filter(|t| range.contains(t.transaction_date)) {
        total_spent += txn.amount;
        transaction_count += 1;

        let cat = categories.entry(txn.category.to_string()).or_default();
        cat.amount += txn.amount;
        cat.count += 1;

        let acct = accounts.entry(txn.account_key()).or_insert_with(|| AccountTotal {
            display: txn.account_display(),
            account_type: txn.account_type,
            last_four: txn.account_last_four.clone(),
            amount: Decimal::ZERO,
            count: 0,
        });
        acct.amount += txn.amount;
        acct.count += 1;
    }

    SpendingSummary {
        range,
        total_spent,
        transaction_count,
        categories,
        accounts,
    }
}
