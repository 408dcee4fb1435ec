//! # Storage
//!
//! Object storage listing module.
//!
//! Responsibilities:
//! - Abstract delimiter-based object listing behind `BucketClient`
//! - Provide an S3 implementation with optional role assumption
//! - Provide an in-memory bucket for tests
//!
//! ## Feature Flags
//!
//! - `s3`: Enable the real S3 client (requires the AWS SDK)

pub mod client;
pub mod error;
pub mod memory;

#[cfg(feature = "s3")]
pub mod s3_client;

pub use client::{BucketClient, ListRequest, Listing};
pub use error::{Result, StorageError};
pub use memory::InMemoryBucket;

#[cfg(feature = "s3")]
pub use s3_client::{S3BucketClient, S3Settings};
