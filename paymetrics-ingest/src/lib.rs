//! paymetrics-ingest: turn raw bank-alert emails into candidate transactions.
//!
//! Stages: sender classification ([`InstitutionRegistry::classify`]), the
//! [`EmailFilter`], body normalization and the [`Extractor`].

pub mod eml;
pub mod extract;
pub mod filter;
pub mod institution;
pub mod normalize;
pub mod parsers;

pub use eml::load_eml;
pub use extract::{Extractor, account_suffix, clean_merchant, parse_amount, parse_short_date};
pub use filter::{EmailFilter, FilterDecision, MIN_BODY_INDICATORS, indicator_count};
pub use institution::{InstitutionProfile, InstitutionRegistry, Pattern, PatternMatch};
pub use normalize::{NormalizedText, normalize, normalize_email, normalize_parts};
