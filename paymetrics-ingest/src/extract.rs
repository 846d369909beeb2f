//! Transaction extractor: run an institution's patterns over normalized text
//! and turn the first usable match into an [`ExtractedTransaction`].

use chrono::{DateTime, NaiveDate, Utc};
use paymetrics_core::{AccountType, CategoryName, Clock, ExtractedTransaction, RawEmail};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::institution::{InstitutionProfile, InstitutionRegistry, PatternMatch};
use crate::normalize::NormalizedText;

/// Merchant names are cut here so legal boilerplate can't bleed in
pub const MAX_MERCHANT_LEN: usize = 40;

pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Parse a captured amount like `Rs. 1,234.50` or `₹99`. Negative or
/// non-numeric captures give `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut clean: String = raw
        .chars()
        .filter(|c| *c != ',' && *c != '₹' && !c.is_whitespace())
        .collect();
    let lower = clean.to_lowercase();
    for prefix in ["rs.", "rs", "inr"] {
        if lower.starts_with(prefix) {
            clean = clean[prefix.len()..].to_string();
            break;
        }
    }

    let amount = Decimal::from_str(&clean).ok()?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return None;
    }
    Some(amount.abs())
}

/// Rightmost four characters of the account token (fewer if it is shorter)
pub fn account_suffix(token: &str) -> String {
    let token = token.trim();
    let count = token.chars().count();
    token.chars().skip(count.saturating_sub(4)).collect()
}

/// `yy < 50` is 20yy, otherwise 19yy
pub fn pivot_year(yy: i32) -> i32 {
    if yy < 50 { 2000 + yy } else { 1900 + yy }
}

/// Parse `dd-mm-yy` (or `dd/mm/yy`, or a four-digit year)
pub fn parse_short_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split(['-', '/']).collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year = match year.len() {
        2 => pivot_year(year.parse().ok()?),
        4 => year.parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Trim, collapse whitespace, title-case and bound the length
pub fn clean_merchant(raw: &str) -> String {
    let titled = raw
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");

    let truncated: String = titled.chars().take(MAX_MERCHANT_LEN).collect();
    truncated.trim_end().to_string()
}

pub struct Extractor<'a> {
    registry: &'a InstitutionRegistry,
    clock: &'a dyn Clock,
}

impl<'a> Extractor<'a> {
    pub fn new(registry: &'a InstitutionRegistry, clock: &'a dyn Clock) -> Self {
        Self { registry, clock }
    }

    /// Extract from text alone. Without an email timestamp the date fallback
    /// is the clock's today.
    pub fn extract(
        &self,
        text: &NormalizedText,
        sender: &str,
        subject: &str,
    ) -> Option<ExtractedTransaction> {
        self.extract_inner(text, sender, subject, None, "")
    }

    /// Extract from a fetched email; the received timestamp backs up an
    /// unparseable body date.
    pub fn extract_email(&self, email: &RawEmail, text: &NormalizedText) -> Option<ExtractedTransaction> {
        self.extract_inner(text, &email.sender, &email.subject, email.received_at, &email.id)
    }

    fn extract_inner(
        &self,
        text: &NormalizedText,
        sender: &str,
        subject: &str,
        received_at: Option<DateTime<Utc>>,
        source_email_id: &str,
    ) -> Option<ExtractedTransaction> {
        let profile = self.registry.classify(sender)?;

        for pattern in profile.patterns() {
            let Some(m) = pattern.captures(text.as_str()) else {
                continue;
            };
            let Some(amount) = parse_amount(m.amount) else {
                debug!(pattern = %pattern.name, raw = m.amount, "unusable amount, trying next pattern");
                continue;
            };

            debug!(institution = %profile.key, pattern = %pattern.name, "pattern matched");
            return Some(self.build(
                profile,
                pattern.account_class,
                &m,
                amount,
                received_at,
                source_email_id,
                sender,
                subject,
            ));
        }

        debug!(institution = %profile.key, "no pattern matched");
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        profile: &InstitutionProfile,
        account_class: Option<AccountType>,
        m: &PatternMatch<'_>,
        amount: Decimal,
        received_at: Option<DateTime<Utc>>,
        source_email_id: &str,
        sender: &str,
        subject: &str,
    ) -> ExtractedTransaction {
        let account_last_four = account_suffix(m.account);
        let account_type = account_class
            .or_else(|| self.registry.account_type_for(&account_last_four))
            .unwrap_or(AccountType::DebitCard);

        let merchant = m
            .merchant
            .map(clean_merchant)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string());

        let transaction_date = m
            .date
            .and_then(parse_short_date)
            .unwrap_or_else(|| self.fallback_date(profile, received_at));

        ExtractedTransaction {
            amount,
            account_last_four,
            account_type,
            description: format!("{} - {}", merchant, profile.key),
            merchant,
            transaction_date,
            institution: profile.key.clone(),
            source_email_id: source_email_id.to_string(),
            sender_email: sender.to_string(),
            subject: subject.to_string(),
            category: CategoryName::Uncategorized,
        }
    }

    /// Email timestamp in the bank's timezone; the clock only when there is none
    fn fallback_date(&self, profile: &InstitutionProfile, received_at: Option<DateTime<Utc>>) -> NaiveDate {
        match received_at {
            Some(at) => at.with_timezone(&profile.timezone).date_naive(),
            None => self.clock.today(profile.timezone),
        }
    }
}
