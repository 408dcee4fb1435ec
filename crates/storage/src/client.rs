//! Bucket client abstraction
//!
//! Defines the listing operation the report generator needs, supporting a
//! real object store and an in-memory bucket behind the same interface.

use std::future::Future;

use crate::error::Result;

/// One listing call: everything under `prefix`, grouped at `delimiter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub bucket: String,
    pub prefix: String,
    /// Empty string means no grouping
    pub delimiter: String,
}

impl ListRequest {
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        delimiter: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            delimiter: delimiter.into(),
        }
    }
}

/// Result of a listing, all pages merged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Object keys directly under the prefix
    pub keys: Vec<String>,
    /// Grouped sub-prefixes, each ending with the delimiter
    pub common_prefixes: Vec<String>,
}

impl Listing {
    /// Direct children of `prefix`: keys and sub-prefixes, minus the
    /// zero-byte folder marker equal to `prefix` itself
    pub fn children_of<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keys
            .iter()
            .chain(self.common_prefixes.iter())
            .map(String::as_str)
            .filter(move |entry| *entry != prefix)
    }
}

/// Bucket client trait
///
/// Implementations must consume every result page before returning.
pub trait BucketClient: Send + Sync {
    /// List objects under a prefix with delimiter grouping
    fn list(&self, request: &ListRequest) -> impl Future<Output = Result<Listing>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_exclude_folder_marker() {
        let listing = Listing {
            keys: vec![
                "2025/growth-rds/26032025/".into(),
                "2025/growth-rds/26032025/racket.mp4".into(),
            ],
            common_prefixes: vec!["2025/growth-rds/26032025/nested/".into()],
        };
        let children: Vec<_> = listing.children_of("2025/growth-rds/26032025/").collect();
        assert_eq!(
            children,
            vec![
                "2025/growth-rds/26032025/racket.mp4",
                "2025/growth-rds/26032025/nested/"
            ]
        );
    }
}
