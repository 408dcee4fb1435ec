//! In-memory bucket
//!
//! 用于单元测试的 mock 实现，支持注入失败场景。

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

use tracing::instrument;

use crate::client::{BucketClient, ListRequest, Listing};
use crate::error::{Result, StorageError};

/// Bucket held in memory, listing with object-store delimiter semantics
pub struct InMemoryBucket {
    bucket: String,
    keys: BTreeSet<String>,
    /// Prefixes whose listing should fail
    fail_prefixes: HashSet<String>,
    /// Every request received, in order
    requests: Mutex<Vec<ListRequest>>,
}

impl InMemoryBucket {
    /// Create an empty bucket
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            keys: BTreeSet::new(),
            fail_prefixes: HashSet::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Add objects
    pub fn with_objects<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Make listings of exactly `prefix` fail
    pub fn fail_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fail_prefixes.insert(prefix.into());
        self
    }

    /// Number of stored objects
    pub fn object_count(&self) -> usize {
        self.keys.len()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: &ListRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }

    fn list_sync(&self, request: &ListRequest) -> Result<Listing> {
        if request.bucket != self.bucket {
            return Err(StorageError::BucketNotFound {
                bucket: request.bucket.clone(),
            });
        }
        if self.fail_prefixes.contains(&request.prefix) {
            return Err(StorageError::request(
                &request.bucket,
                &request.prefix,
                "injected failure",
            ));
        }

        let mut keys = Vec::new();
        let mut common_prefixes = BTreeSet::new();

        for key in self.keys.range(request.prefix.clone()..) {
            let Some(rest) = key.strip_prefix(request.prefix.as_str()) else {
                break;
            };
            match (!request.delimiter.is_empty())
                .then(|| rest.find(request.delimiter.as_str()))
                .flatten()
            {
                Some(idx) => {
                    let end = request.prefix.len() + idx + request.delimiter.len();
                    common_prefixes.insert(key[..end].to_string());
                }
                None => keys.push(key.clone()),
            }
        }

        Ok(Listing {
            keys,
            common_prefixes: common_prefixes.into_iter().collect(),
        })
    }
}

impl BucketClient for InMemoryBucket {
    #[instrument(
        name = "memory_bucket_list",
        skip(self, request),
        fields(bucket = %request.bucket, prefix = %request.prefix)
    )]
    async fn list(&self, request: &ListRequest) -> Result<Listing> {
        self.record(request);
        self.list_sync(request)
    }
}
