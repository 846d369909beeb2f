//! Axis Bank alert formats
//!
//! Examples:
//!   INR 499.00 debited from A/c no. XX0912 on 01-08-25 Info- UPI/P2M/421312345678/NETFLIX
//!   Spent INR 1,299.00 on Axis Bank Credit Card no. XX3456 at FLIPKART on 02-08-25.

use paymetrics_core::{AccountType, Result};

use super::{AT_MERCHANT, ON_DATE};
use crate::institution::{InstitutionProfile, Pattern};

pub fn profile() -> Result<InstitutionProfile> {
    Ok(InstitutionProfile::new("AXIS", "Axis Bank")
        .sender_tokens(["axisbank", "axis.bank"])
        .subject_markers(["debit transaction alert", "transaction alert"])
        .pattern(
            Pattern::new(
                "axis_account_debit",
                10,
                concat!(
                    r"inr\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+(?:has\s+been\s+)?debited\s+from\s+",
                    r"a/c\s+(?:no\.?\s*)?[x*]*(?P<account>\d+)"
                ),
            )?
            .merchant_hint(r"upi/p2[am]/\d+/(?P<merchant>[^/\n]+)")?
            .merchant_hint(AT_MERCHANT)?
            .date_hint(ON_DATE)?,
        )
        .pattern(
            Pattern::new(
                "axis_card_spend",
                20,
                concat!(
                    r"spent\s+inr\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+on\s+axis\s+bank\s+credit\s+card\s+",
                    r"(?:no\.?\s*)?[x*]*(?P<account>\d+)"
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

    #[test]
    fn test_upi_debit_merchant_from_info_line() {
        let profile = profile().unwrap();
        let text = "INR 499.00 debited from A/c no. XX0912 on 01-08-25 Info- UPI/P2M/421312345678/NETFLIX";
        let m = profile.patterns()[0].captures(text).unwrap();
        assert_eq!(m.amount, "499.00");
        assert_eq!(m.account, "0912");
        assert_eq!(m.merchant, Some("NETFLIX"));
        assert_eq!(m.date, Some("01-08-25"));
    }

    #[test]
    fn test_card_spend() {
        let profile = profile().unwrap();
        let text = "Spent INR 1,299.00 on Axis Bank Credit Card no. XX3456 at FLIPKART on 02-08-25.";
        let card = &profile.patterns()[1];
        let m = card.captures(text).unwrap();
        assert_eq!(m.amount, "1,299.00");
        assert_eq!(m.account, "3456");
        assert_eq!(m.merchant, Some("FLIPKART"));
    }
}
