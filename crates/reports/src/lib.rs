//! # Reports
//!
//! Report generation module.
//!
//! Responsibilities:
//! - Discover services under the year prefix of the report date
//! - Count each service's artifacts for that day
//! - Produce the immutable `Report` handed to the dispatcher
//!
//! ## Usage Example
//!
//! ```ignore
//! use reports::ReportGenerator;
//! use storage::InMemoryBucket;
//!
//! let generator = ReportGenerator::new(InMemoryBucket::new("backups"), "backups");
//! let report = generator.generate().await?;
//! ```

mod generator;
mod layout;

pub use contracts::{Report, ReportSource, Service};
pub use generator::ReportGenerator;
pub use layout::DateLayout;
