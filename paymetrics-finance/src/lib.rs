//! paymetrics-finance: categorization, batch orchestration, spending summaries, export

pub mod categorizer;
pub mod export;
pub mod pipeline;
pub mod summary;

pub use categorizer::{Categorizer, categorize, has_business_suffix, looks_like_person_name};
pub use export::{read_csv, write_csv, write_json};
pub use pipeline::{BatchOutcome, Pipeline, SkipReason, SkipRecord};
pub use summary::{AccountTotal, CategoryTotal, DateRange, SpendingSummary, summarize};
