//! HDFC Bank alert formats
//!
//! Examples (after normalization):
//!   Rs.549.79 has been debited from account 2448 to VPA zomato.payu@axisbank Zomato private Limited on 02-08-25.
//!   Rs.100.00 debited from a/c **2448 on 05-08-25 to VPA swiggy@icici (UPI Ref No 523412345678).
//!   Rs.2500.00 has been debited from account 5678 at HDFC ATM on 30-07-25.
//!   Rs 1,250.00 spent on HDFC Bank Card x3456 at AMAZON on 01-08-25.

use paymetrics_core::{AccountType, Result};

use super::{AT_MERCHANT, ON_DATE};
use crate::institution::{InstitutionProfile, Pattern};

pub fn profile() -> Result<InstitutionProfile> {
    Ok(InstitutionProfile::new("HDFC", "HDFC Bank")
        .sender_tokens(["hdfc", "hdfcbank", "alerts@hdfcbank"])
        .subject_markers([
            "you have done a upi txn",
            "transaction alert",
            "debit card transaction",
        ])
        .pattern(Pattern::new(
            "hdfc_vpa_debit",
            10,
            concat!(
                r"rs\.?\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+has\s+been\s+debited\s+from\s+",
                r"(?:account|a/c)\s+[x*]*(?P<account>\d+)\s+",
                r"to\s+vpa\s+\S+\s+(?P<merchant>.+?)\s+",
                r"on\s+(?P<date>\d{1,2}[-/]\d{1,2}[-/]\d{2,4})"
            ),
        )?)
        .pattern(Pattern::new(
            "hdfc_upi_txn",
            15,
            concat!(
                r"rs\.?\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+debited\s+from\s+a/c\s+[x*]*(?P<account>\d+)\s+",
                r"on\s+(?P<date>\d{1,2}[-/]\d{1,2}[-/]\d{2,4})\s+",
                r"to\s+vpa\s+(?P<merchant>[^\s(]+)"
            ),
        )?)
        .pattern(
            Pattern::new(
                "hdfc_account_debit",
                20,
                concat!(
                    r"rs\.?\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+has\s+been\s+debited\s+from\s+",
                    r"(?:account|a/c)\s+(?:no\.?\s*)?[x*]*(?P<account>\d+)"
                ),
            )?
            .merchant_hint(AT_MERCHANT)?
            .date_hint(ON_DATE)?,
        )
        .pattern(
            Pattern::new(
                "hdfc_card_spend",
                30,
                concat!(
                    r"rs\.?\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+(?:was\s+)?spent\s+(?:on|using)\s+",
                    r"(?:your\s+)?hdfc\s+bank\s+(?:credit\s+)?card\s+(?:ending\s+)?[x*]*(?P<account>\d+)"
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

    fn first_match(text: &str) -> (String, crate::institution::PatternMatch<'_>) {
        let profile = profile().unwrap();
        profile
            .patterns()
            .iter()
            .find_map(|p| p.captures(text).map(|m| (p.name.clone(), m)))
            .expect("no HDFC pattern matched")
    }

    #[test]
    fn test_vpa_debit() {
        let text = "Dear Customer, Rs.549.79 has been debited from account 2448 to VPA zomato.payu@axisbank Zomato private Limited on 02-08-25.";
        let (name, m) = first_match(text);
        assert_eq!(name, "hdfc_vpa_debit");
        assert_eq!(m.amount, "549.79");
        assert_eq!(m.account, "2448");
        assert_eq!(m.merchant, Some("Zomato private Limited"));
        assert_eq!(m.date, Some("02-08-25"));
    }

    #[test]
    fn test_upi_txn() {
        let text = "Dear Customer, Rs.100.00 debited from a/c **2448 on 05-08-25 to VPA swiggy@icici (UPI Ref No 523412345678).";
        let (name, m) = first_match(text);
        assert_eq!(name, "hdfc_upi_txn");
        assert_eq!(m.amount, "100.00");
        assert_eq!(m.merchant, Some("swiggy@icici"));
        assert_eq!(m.date, Some("05-08-25"));
    }

    #[test]
    fn test_atm_debit_uses_hints() {
        let text = "Rs.2500.00 has been debited from account 5678 at HDFC ATM on 30-07-25.";
        let (name, m) = first_match(text);
        assert_eq!(name, "hdfc_account_debit");
        assert_eq!(m.account, "5678");
        assert_eq!(m.merchant, Some("HDFC ATM"));
        assert_eq!(m.date, Some("30-07-25"));
    }

    #[test]
    fn test_card_spend() {
        let text = "Rs 1,250.00 spent on HDFC Bank Card x3456 at AMAZON on 01-08-25.";
        let (name, m) = first_match(text);
        assert_eq!(name, "hdfc_card_spend");
        assert_eq!(m.amount, "1,250.00");
        assert_eq!(m.account, "3456");
        assert_eq!(m.merchant, Some("AMAZON"));
    }

    #[test]
    fn test_promo_text_matches_nothing() {
        let profile = profile().unwrap();
        let text = "Get 10% off on weekend dining with your HDFC Bank card. Unsubscribe here.";
        assert!(profile.patterns().iter().all(|p| p.captures(text).is_none()));
    }
}
