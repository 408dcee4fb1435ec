//! # Contracts
//!
//! Shared interface contracts: the report payload, the channel and report
//! source traits, configuration types and the error taxonomy.
//! Business crates depend on this crate, never the other way around.
//!
//! ## Data flow
//! - A `ReportSource` produces one immutable `Report` per invocation
//! - The report is shared read-only with every `NotificationChannel`

mod channel;
mod config;
mod error;
mod report;
mod source;

pub use channel::*;
pub use config::*;
pub use error::*;
pub use report::*;
pub use source::*;
