//! Candidate transaction records emitted by the extraction pipeline

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::CategoryName;

/// Which kind of account a notification refers to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    CreditCard,
    #[default]
    DebitCard,
    Savings,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::CreditCard => "credit_card",
            AccountType::DebitCard => "debit_card",
            AccountType::Savings => "savings",
            AccountType::Other => "other",
        }
    }

    /// Human label, e.g. "Credit Card"
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::CreditCard => "Credit Card",
            AccountType::DebitCard => "Debit Card",
            AccountType::Savings => "Savings",
            AccountType::Other => "Other",
        }
    }
}

/// A transaction pulled out of one email, not yet confirmed unique or persisted.
///
/// The storage collaborator deduplicates on `source_email_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedTransaction {
    /// Always >= 0; direction is implied by the notification (debits only)
    pub amount: Decimal,
    /// Rightmost <= 4 characters of the captured account token
    pub account_last_four: String,
    pub account_type: AccountType,
    pub merchant: String,
    pub description: String,
    pub transaction_date: NaiveDate,
    /// Institution key in upper case (HDFC, SBI, ...)
    pub institution: String,
    pub source_email_id: String,
    pub sender_email: String,
    pub subject: String,
    pub category: CategoryName,
}

impl ExtractedTransaction {
    /// Grouping key for per-account views: `credit_card_2448`
    pub fn account_key(&self) -> String {
        format!("{}_{}", self.account_type.as_str(), self.account_last_four)
    }

    /// Display name for the account: `Credit Card ****2448`
    pub fn account_display(&self) -> String {
        format!("{} ****{}", self.account_type.label(), self.account_last_four)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractedTransaction {
        ExtractedTransaction {
            amount: Decimal::new(54979, 2),
            account_last_four: "2448".to_string(),
            account_type: AccountType::CreditCard,
            merchant: "Zomato Private Limited".to_string(),
            description: "Zomato Private Limited - HDFC".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
            institution: "HDFC".to_string(),
            source_email_id: "email_hdfc_cc_1".to_string(),
            sender_email: "alerts@hdfcbank.net".to_string(),
            subject: "Transaction Alert".to_string(),
            category: CategoryName::FoodAndDining,
        }
    }

    #[test]
    fn test_account_key_and_display() {
        let txn = sample();
        assert_eq!(txn.account_key(), "credit_card_2448");
        assert_eq!(txn.account_display(), "Credit Card ****2448");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["account_type"], "credit_card");
        assert_eq!(value["category"], "Food & Dining");
        assert_eq!(value["amount"], "549.79");
        assert_eq!(value["transaction_date"], "2025-08-02");
    }
}
