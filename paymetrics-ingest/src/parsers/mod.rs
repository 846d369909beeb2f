//! Bank-specific alert formats, one module per institution.
//!
//! Each module exposes `profile()`, returning the sender tokens, subject markers
//! and ordered extraction patterns for that bank.

pub mod axis;
pub mod hdfc;
pub mod icici;
pub mod sbi;

/// "... at MERCHANT on ..." as used by most card and account alerts
pub(crate) const AT_MERCHANT: &str = r"\bat\s+(?P<merchant>.+?)\s+on\b";

/// "... on 02-08-25" / "on 02/08/2025"
pub(crate) const ON_DATE: &str = r"\bon\s+(?P<date>\d{1,2}[-/]\d{1,2}[-/]\d{2,4})\b";
