//! Email filter: is this message plausibly a transaction notification?
//!
//! Dropping a real alert is cheap (extraction just never sees it); letting a
//! promotion through can fabricate a transaction. Rules are therefore biased
//! toward rejection.

use regex::Regex;
use std::sync::OnceLock;

use crate::institution::InstitutionRegistry;

/// Body must contain at least this many distinct indicators to be accepted on content alone
pub const MIN_BODY_INDICATORS: usize = 2;

/// Salutation, debit/credit verbs, currency markers and account vocabulary
pub const TRANSACTION_INDICATORS: [&str; 11] = [
    "dear customer",
    "debited",
    "credited",
    "rs.",
    "inr",
    "₹",
    "account",
    "a/c",
    "transaction",
    "txn",
    "spent",
];

/// Promotional, marketing and maintenance vocabulary
pub const EXCLUSION_TERMS: [&str; 13] = [
    "unsubscribe",
    "offer",
    "discount",
    "promo",
    "newsletter",
    "webinar",
    "maintenance",
    "scheduled downtime",
    "% off",
    "limited period",
    "pre-approved",
    "apply now",
    "reward points expiring",
];

/// Loose monetary/account vocabulary for the final fallback rule
/// Loose monetary/account vocabulary for the final fallback rule. The bare
/// "rs" currency token is matched separately on word boundaries.
pub const MONETARY_TERMS: [&str; 7] = ["inr", "₹", "debited", "credited", "account", "a/c", "card"];

/// Which rule decided the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    UnknownSender,
    SubjectMarker,
    Indicators(usize),
    Excluded,
    MonetaryFallback,
    NoSignal,
}

impl FilterDecision {
    pub fn accepted(&self) -> bool {
        matches!(
            self,
            FilterDecision::SubjectMarker
                | FilterDecision::Indicators(_)
                | FilterDecision::MonetaryFallback
        )
    }
}

/// Number of distinct transaction indicators present in `text` (case-insensitive)
pub fn indicator_count(text: &str) -> usize {
    let lower = text.to_lowercase();
    TRANSACTION_INDICATORS
        .iter()
        .filter(|t| lower.contains(*t))
        .count()
}

fn rupee_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\brs\b").expect("invalid rupee token regex"))
}

fn contains_any(haystacks: &[&str], terms: &[&str]) -> bool {
    haystacks.iter().any(|h| terms.iter().any(|t| h.contains(t)))
}

pub struct EmailFilter<'a> {
    registry: &'a InstitutionRegistry,
}

impl<'a> EmailFilter<'a> {
    pub fn new(registry: &'a InstitutionRegistry) -> Self {
        Self { registry }
    }

    /// Apply the rules in order and report which one decided.
    pub fn evaluate(&self, sender: &str, subject: &str, body: &str) -> FilterDecision {
        let Some(profile) = self.registry.classify(sender) else {
            return FilterDecision::UnknownSender;
        };

        if profile.has_subject_marker(subject) {
            return FilterDecision::SubjectMarker;
        }

        let subject = subject.to_lowercase();
        let body = body.to_lowercase();
        let excluded = contains_any(&[subject.as_str(), body.as_str()], &EXCLUSION_TERMS);

        let indicators = indicator_count(&body);
        if indicators >= MIN_BODY_INDICATORS && !excluded {
            return FilterDecision::Indicators(indicators);
        }
        if excluded {
            return FilterDecision::Excluded;
        }

        let monetary = contains_any(&[subject.as_str(), body.as_str()], &MONETARY_TERMS)
            || rupee_token_re().is_match(&subject)
            || rupee_token_re().is_match(&body);
        if monetary {
            FilterDecision::MonetaryFallback
        } else {
            FilterDecision::NoSignal
        }
    }

    pub fn is_transaction_email(&self, sender: &str, subject: &str, body: &str) -> bool {
        self.evaluate(sender, subject, body).accepted()
    }
}
