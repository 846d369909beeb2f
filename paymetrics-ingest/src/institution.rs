//! Institution profiles and the sender classifier.
//!
//! A profile says which sender addresses belong to a bank and which ordered
//! patterns pull transactions out of its alert text. Profiles are built once
//! and shared read-only.

use chrono_tz::Tz;
use paymetrics_core::{AccountType, Error, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::parsers;

/// Fields captured by one successful pattern match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'t> {
    pub amount: &'t str,
    pub account: &'t str,
    pub merchant: Option<&'t str>,
    pub date: Option<&'t str>,
}

/// One extraction rule.
///
/// The main regex must define the named groups `amount` and `account`; it may
/// also define `merchant` and `date`. When it doesn't, the hint regexes are
/// searched over the whole text for those optional fields.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: String,
    /// Lower runs first
    pub priority: u32,
    /// Account class this alert format always refers to, if any
    pub account_class: Option<AccountType>,
    regex: Regex,
    merchant_hints: Vec<Regex>,
    date_hint: Option<Regex>,
}

fn compile(name: &str, src: &str) -> Result<Regex> {
    RegexBuilder::new(src)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| Error::InvalidPattern {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn require_group(name: &str, re: &Regex, group: &str) -> Result<()> {
    if re.capture_names().flatten().any(|g| g == group) {
        Ok(())
    } else {
        Err(Error::InvalidPattern {
            name: name.to_string(),
            reason: format!("missing named group `{group}`"),
        })
    }
}

impl Pattern {
    pub fn new(name: impl Into<String>, priority: u32, regex: &str) -> Result<Self> {
        let name = name.into();
        let regex = compile(&name, regex)?;
        require_group(&name, &regex, "amount")?;
        require_group(&name, &regex, "account")?;
        Ok(Self {
            name,
            priority,
            account_class: None,
            regex,
            merchant_hints: Vec::new(),
            date_hint: None,
        })
    }

    /// Fallback regex with a `merchant` group. Several may be given; first hit wins.
    pub fn merchant_hint(mut self, regex: &str) -> Result<Self> {
        let re = compile(&self.name, regex)?;
        require_group(&self.name, &re, "merchant")?;
        self.merchant_hints.push(re);
        Ok(self)
    }

    /// Fallback regex with a `date` group
    pub fn date_hint(mut self, regex: &str) -> Result<Self> {
        let re = compile(&self.name, regex)?;
        require_group(&self.name, &re, "date")?;
        self.date_hint = Some(re);
        Ok(self)
    }

    pub fn targets(mut self, account_class: AccountType) -> Self {
        self.account_class = Some(account_class);
        self
    }

    /// Match against normalized text. `None` unless both required groups matched.
    ///
    /// Hints look at the text after the main match first, then the whole text.
    pub fn captures<'t>(&self, text: &'t str) -> Option<PatternMatch<'t>> {
        let caps = self.regex.captures(text)?;
        let amount = caps.name("amount")?.as_str();
        let account = caps.name("account")?.as_str();
        let tail = &text[caps.get(0)?.end()..];

        let merchant = caps.name("merchant").map(|m| m.as_str()).or_else(|| {
            self.merchant_hints
                .iter()
                .find_map(|re| hint_group(re, "merchant", tail, text))
        });
        let date = caps.name("date").map(|m| m.as_str()).or_else(|| {
            self.date_hint
                .as_ref()
                .and_then(|re| hint_group(re, "date", tail, text))
        });

        Some(PatternMatch {
            amount,
            account,
            merchant,
            date,
        })
    }
}

fn hint_group<'t>(re: &Regex, group: &str, tail: &'t str, text: &'t str) -> Option<&'t str> {
    [tail, text]
        .into_iter()
        .find_map(|haystack| re.captures(haystack).and_then(|c| c.name(group)))
        .map(|m| m.as_str())
}

/// Static description of one issuing bank
#[derive(Debug, Clone)]
pub struct InstitutionProfile {
    /// Upper-case key, e.g. `HDFC`
    pub key: String,
    pub display_name: String,
    pub timezone: Tz,
    sender_tokens: Vec<String>,
    subject_markers: Vec<String>,
    patterns: Vec<Pattern>,
}

impl InstitutionProfile {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into().to_uppercase(),
            display_name: display_name.into(),
            timezone: chrono_tz::Asia::Kolkata,
            sender_tokens: Vec::new(),
            subject_markers: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn sender_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sender_tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Fixed subject phrases that only ever appear on genuine payment alerts
    pub fn subject_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.subject_markers = markers
            .into_iter()
            .map(|m| m.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Add a pattern, keeping the list in priority order (stable for ties)
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self.patterns.sort_by_key(|p| p.priority);
        self
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn matches_sender(&self, sender: &str) -> bool {
        let sender = sender.to_lowercase();
        self.sender_tokens.iter().any(|t| sender.contains(t.as_str()))
    }

    pub fn has_subject_marker(&self, subject: &str) -> bool {
        let subject = subject.to_lowercase();
        self.subject_markers
            .iter()
            .any(|m| subject.contains(m.as_str()))
    }
}

/// All supported institutions in configuration order, plus the account-type
/// lookup used when a pattern doesn't pin the account class.
#[derive(Debug, Clone, Default)]
pub struct InstitutionRegistry {
    profiles: Vec<InstitutionProfile>,
    known_accounts: HashMap<String, AccountType>,
}

impl InstitutionRegistry {
    pub fn new(profiles: Vec<InstitutionProfile>) -> Self {
        Self {
            profiles,
            known_accounts: HashMap::new(),
        }
    }

    /// HDFC, SBI, ICICI and Axis, in that order
    pub fn builtin() -> Result<Self> {
        let registry = Self::new(vec![
            parsers::hdfc::profile()?,
            parsers::sbi::profile()?,
            parsers::icici::profile()?,
            parsers::axis::profile()?,
        ])
        .with_known_account("2448", AccountType::CreditCard)
        .with_known_account("3456", AccountType::CreditCard)
        .with_known_account("5678", AccountType::DebitCard)
        .with_known_account("9012", AccountType::Savings);
        Ok(registry)
    }

    pub fn with_known_account(mut self, suffix: impl Into<String>, account_type: AccountType) -> Self {
        self.known_accounts.insert(suffix.into(), account_type);
        self
    }

    /// Override every profile's timezone, e.g. from user config
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        for profile in &mut self.profiles {
            profile.timezone = tz;
        }
        self
    }

    pub fn profiles(&self) -> &[InstitutionProfile] {
        &self.profiles
    }

    /// Sender classifier: first profile (in configuration order) with a token
    /// contained in the lower-cased sender address.
    pub fn classify(&self, sender: &str) -> Option<&InstitutionProfile> {
        self.profiles.iter().find(|p| p.matches_sender(sender))
    }

    pub fn account_type_for(&self, last_four: &str) -> Option<AccountType> {
        self.known_accounts.get(last_four).copied()
    }
}
