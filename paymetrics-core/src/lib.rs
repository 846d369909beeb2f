//! paymetrics-core: shared types for the email-to-transaction pipeline

pub mod category;
pub mod clock;
pub mod email;
pub mod error;
pub mod transaction;

pub use category::{CategoryDefinition, CategoryName};
pub use clock::{Clock, FixedClock, SystemClock};
pub use email::{BodyPart, MimeHint, RawEmail};
pub use error::{Error, Result};
pub use transaction::{AccountType, ExtractedTransaction};
