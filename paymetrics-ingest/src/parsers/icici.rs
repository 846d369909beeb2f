//! ICICI Bank alert formats
//!
//! Examples:
//!   INR 1,200.00 debited from account ***5521 at URBAN COMPANY on 28-07-25.
//!   Your ICICI Bank Credit Card XX3456 has been used for a transaction of INR 2,200.00 on Aug 01, 2025 at 10:15:32. Info: INDIGO AIRLINES.

use paymetrics_core::{AccountType, Result};

use super::{AT_MERCHANT, ON_DATE};
use crate::institution::{InstitutionProfile, Pattern};

pub fn profile() -> Result<InstitutionProfile> {
    Ok(InstitutionProfile::new("ICICI", "ICICI Bank")
        .sender_tokens(["icici", "icicibankltd"])
        .subject_markers(["transaction alert", "icici bank credit card transaction"])
        .pattern(
            Pattern::new(
                "icici_account_debit",
                10,
                r"inr\s*(?P<amount>[\d,]+(?:\.\d+)?)\s+debited\s+from\s+(?:account|a/c)\s+[x*]*(?P<account>\d+)",
            )?
            .merchant_hint(AT_MERCHANT)?
            .date_hint(ON_DATE)?,
        )
        .pattern(
            Pattern::new(
                "icici_card_used",
                20,
                concat!(
                    r"credit\s+card\s+[x*]*(?P<account>\d+)\s+has\s+been\s+used\s+for\s+a\s+transaction\s+of\s+",
                    r"inr\s*(?P<amount>[\d,]+(?:\.\d+)?)"
                ),
            )?
            .merchant_hint(r"\binfo:?\s*(?P<merchant>[^.]+?)\s*(?:\.|$)")?
            .date_hint(ON_DATE)?
            .targets(AccountType::CreditCard),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_debit() {
        let profile = profile().unwrap();
        let text = "INR 1,200.00 debited from account ***5521 at URBAN COMPANY on 28-07-25.";
        let m = profile.patterns()[0].captures(text).unwrap();
        assert_eq!(m.amount, "1,200.00");
        assert_eq!(m.account, "5521");
        assert_eq!(m.merchant, Some("URBAN COMPANY"));
        assert_eq!(m.date, Some("28-07-25"));
    }

    #[test]
    fn test_card_used_with_info_merchant() {
        let profile = profile().unwrap();
        let text = "Your ICICI Bank Credit Card XX3456 has been used for a transaction of INR 2,200.00 on Aug 01, 2025 at 10:15:32. Info: INDIGO AIRLINES.";
        assert!(profile.patterns()[0].captures(text).is_none());
        let card = &profile.patterns()[1];
        assert_eq!(card.account_class, Some(AccountType::CreditCard));
        let m = card.captures(text).unwrap();
        assert_eq!(m.amount, "2,200.00");
        assert_eq!(m.account, "3456");
        assert_eq!(m.merchant, Some("INDIGO AIRLINES"));
        assert_eq!(m.date, None);
    }
}
