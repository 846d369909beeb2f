//! Batch orchestration: sender check, filter, normalize, extract, categorize.
//!
//! Each email is processed in isolation. A failure on one email, including a
//! panic inside a pattern or parser, becomes a skip record and never aborts
//! the batch.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use paymetrics_core::{CategoryDefinition, Clock, ExtractedTransaction, RawEmail};
use paymetrics_ingest::{EmailFilter, Extractor, FilterDecision, InstitutionRegistry, normalize_email};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::categorizer::Categorizer;

/// Why an email produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    UnrecognizedSender,
    /// Sender known but the filter rejected it; detail names the rule
    FilteredOut(String),
    NoPatternMatch,
    DuplicateInBatch,
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnrecognizedSender => write!(f, "unrecognized sender"),
            SkipReason::FilteredOut(rule) => write!(f, "filtered out ({rule})"),
            SkipReason::NoPatternMatch => write!(f, "no pattern matched"),
            SkipReason::DuplicateInBatch => write!(f, "duplicate id in batch"),
            SkipReason::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

fn decision_label(decision: FilterDecision) -> String {
    match decision {
        FilterDecision::UnknownSender => "unknown_sender".to_string(),
        FilterDecision::Excluded => "excluded_term".to_string(),
        FilterDecision::NoSignal => "no_signal".to_string(),
        FilterDecision::Indicators(n) => format!("indicators_{n}"),
        FilterDecision::SubjectMarker => "subject_marker".to_string(),
        FilterDecision::MonetaryFallback => "monetary_fallback".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipRecord {
    pub email_id: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of one batch run. `attempted == succeeded + skipped` always holds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<ExtractedTransaction>,
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub skips: Vec<SkipRecord>,
}

impl BatchOutcome {
    /// e.g. "5 found, 3 parsed, 2 skipped"
    pub fn status_message(&self) -> String {
        format!(
            "{} found, {} parsed, {} skipped",
            self.attempted, self.succeeded, self.skipped
        )
    }

    pub fn is_consistent(&self) -> bool {
        self.attempted == self.succeeded + self.skipped
            && self.records.len() == self.succeeded
            && self.skips.len() == self.skipped
    }

    fn record(&mut self, txn: ExtractedTransaction) {
        self.attempted += 1;
        self.succeeded += 1;
        self.records.push(txn);
    }

    fn skip(&mut self, email_id: &str, reason: SkipReason) {
        self.attempted += 1;
        self.skipped += 1;
        self.skips.push(SkipRecord {
            email_id: email_id.to_string(),
            reason,
        });
    }
}

/// Holds the collaborators for a run; stateless between batches.
pub struct Pipeline<'a> {
    registry: &'a InstitutionRegistry,
    categories: &'a [CategoryDefinition],
    clock: &'a dyn Clock,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        registry: &'a InstitutionRegistry,
        categories: &'a [CategoryDefinition],
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            registry,
            categories,
            clock,
        }
    }

    /// Process every email in order. Output order follows input order.
    pub fn process_batch(&self, emails: &[RawEmail]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for email in emails {
            if !seen.insert(email.id.as_str()) {
                debug!(email_id = %email.id, "duplicate id in batch");
                outcome.skip(&email.id, SkipReason::DuplicateInBatch);
                continue;
            }

            let result = panic::catch_unwind(AssertUnwindSafe(|| self.process_one(email)))
                .unwrap_or_else(|payload| Err(SkipReason::Failed(panic_message(&*payload))));

            match result {
                Ok(txn) => {
                    debug!(
                        email_id = %email.id,
                        institution = %txn.institution,
                        amount = %txn.amount,
                        category = %txn.category,
                        "extracted transaction"
                    );
                    outcome.record(txn);
                }
                Err(reason) => {
                    if let SkipReason::Failed(msg) = &reason {
                        warn!(email_id = %email.id, error = %msg, "email processing failed");
                    } else {
                        debug!(email_id = %email.id, reason = %reason, "email skipped");
                    }
                    outcome.skip(&email.id, reason);
                }
            }
        }

        info!(
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            skipped = outcome.skipped,
            "batch complete"
        );
        outcome
    }

    /// Run one email through the stages, naming the stage that rejected it.
    pub fn process_one(&self, email: &RawEmail) -> Result<ExtractedTransaction, SkipReason> {
        if self.registry.classify(&email.sender).is_none() {
            return Err(SkipReason::UnrecognizedSender);
        }

        let body = filter_body(email);
        let decision = EmailFilter::new(self.registry).evaluate(&email.sender, &email.subject, &body);
        if !decision.accepted() {
            return Err(SkipReason::FilteredOut(decision_label(decision)));
        }

        let text = normalize_email(email);
        let mut txn = Extractor::new(self.registry, self.clock)
            .extract_email(email, &text)
            .ok_or(SkipReason::NoPatternMatch)?;

        txn.category = Categorizer::new(self.categories).categorize(&txn.merchant, &txn.description);
        Ok(txn)
    }
}

/// The raw body, or the joined parts when a multipart email left it empty
fn filter_body(email: &RawEmail) -> String {
    if !email.body.trim().is_empty() || email.parts.is_empty() {
        return email.body.clone();
    }
    email
        .parts
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during extraction".to_string()
    }
}
