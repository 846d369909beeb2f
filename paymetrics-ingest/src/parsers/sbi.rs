//! State Bank of India alert formats
//!
//! Examples:
//!   INR 850.00 debited from a/c ****9012 at TATA POWER MUMBAI on 29-07-25.
//!   Dear UPI user A/C X9012 debited by 20.0 on date 29Jul25 trf to Rohit Sharma Refno 520912345678.
//!   Rs.1,499.00 spent on your SBI Credit Card ending 3456 at MYNTRA on 03/08/25.

use paymetrics_core::{AccountType, Result};

use super::{AT_MERCHANT, ON_DATE};
use crate::institution::{InstitutionProfile, Pattern};

pub fn profile() -> Result<InstitutionProfile> {
    Ok(InstitutionProfile::new("SBI", "State Bank of India")
        .sender_tokens(["sbi", "onlinesbi"])
        .subject_markers(["transaction alert", "debit alert"])
        .pattern(
            Pattern::new(
                "sbi_account_debit",
                10,
                concat!(
                    r"inr\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+(?:has\s+been\s+)?debited\s+from\s+",
                    r"(?:a/c|account)\s*(?:no\.?\s*)?[x*]*(?P<account>\d+)"
                ),
            )?
            .merchant_hint(AT_MERCHANT)?
            .date_hint(ON_DATE)?,
        )
        .pattern(
            Pattern::new(
                "sbi_upi_debit",
                15,
                r"a/c\s+[x*]*(?P<account>\d+)\s+debited\s+by\s+(?:rs\.?\s*|inr\s*)?(?P<amount>[\d,]+(?:\.\d+)?)",
            )?
            .merchant_hint(r"\btrf\s+to\s+(?P<merchant>.+?)\s+ref\s*no\b")?
            .date_hint(ON_DATE)?,
        )
        .pattern(
            Pattern::new(
                "sbi_card_spend",
                20,
                concat!(
                    r"rs\.?\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+spent\s+on\s+your\s+sbi\s+credit\s+card\s+",
                    r"ending\s+(?:with\s+)?[x*]*(?P<account>\d+)"
                ),
            )?
            .merchant_hint(AT_MERCHANT)?
            .date_hint(ON_DATE)?
            .targets(AccountType::CreditCard),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching(text: &str) -> Option<(String, String, String, Option<String>, Option<String>)> {
        let profile = profile().unwrap();
        profile.patterns().iter().find_map(|p| {
            p.captures(text).map(|m| {
                (
                    p.name.clone(),
                    m.amount.to_string(),
                    m.account.to_string(),
                    m.merchant.map(str::to_string),
                    m.date.map(str::to_string),
                )
            })
        })
    }

    #[test]
    fn test_account_debit() {
        let (name, amount, account, merchant, date) =
            matching("INR 850.00 debited from a/c ****9012 at TATA POWER MUMBAI on 29-07-25.").unwrap();
        assert_eq!(name, "sbi_account_debit");
        assert_eq!(amount, "850.00");
        assert_eq!(account, "9012");
        assert_eq!(merchant.as_deref(), Some("TATA POWER MUMBAI"));
        assert_eq!(date.as_deref(), Some("29-07-25"));
    }

    #[test]
    fn test_upi_debit_without_parseable_date() {
        let text = "Dear UPI user A/C X9012 debited by 20.0 on date 29Jul25 trf to Rohit Sharma Refno 520912345678.";
        let (name, amount, account, merchant, date) = matching(text).unwrap();
        assert_eq!(name, "sbi_upi_debit");
        assert_eq!(amount, "20.0");
        assert_eq!(account, "9012");
        assert_eq!(merchant.as_deref(), Some("Rohit Sharma"));
        assert_eq!(date, None);
    }

    #[test]
    fn test_card_spend() {
        let text = "Rs.1,499.00 spent on your SBI Credit Card ending 3456 at MYNTRA on 03/08/25.";
        let (name, amount, account, merchant, date) = matching(text).unwrap();
        assert_eq!(name, "sbi_card_spend");
        assert_eq!(amount, "1,499.00");
        assert_eq!(account, "3456");
        assert_eq!(merchant.as_deref(), Some("MYNTRA"));
        assert_eq!(date.as_deref(), Some("03/08/25"));
    }
}
