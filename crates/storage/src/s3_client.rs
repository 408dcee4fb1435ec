//! S3 bucket client
//!
//! Uses the default AWS credential chain, optionally exchanging it for an
//! assumed role before any listing is made.

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, ConfigLoader, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use tracing::{debug, info, instrument};

use crate::client::{BucketClient, ListRequest, Listing};
use crate::error::{Result, StorageError};

const SESSION_NAME: &str = "backup-reporter";

/// Connection settings for [`S3BucketClient::connect`]
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    /// Region override; falls back to the default provider chain
    pub region: Option<String>,
    /// Role to assume via STS
    pub role_arn: Option<String>,
}

/// `BucketClient` backed by `ListObjectsV2`
#[derive(Clone)]
pub struct S3BucketClient {
    client: aws_sdk_s3::Client,
}

impl S3BucketClient {
    /// Wrap an existing SDK client
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Resolve credentials and build the SDK client
    #[instrument(
        name = "s3_client_connect",
        skip(settings),
        fields(region = ?settings.region, assume_role = settings.role_arn.is_some())
    )]
    pub async fn connect(settings: &S3Settings) -> Self {
        let region = settings.region.as_deref();
        let base = loader(region).load().await;

        let sdk_config = match settings.role_arn.as_deref() {
            Some(role_arn) => {
                let provider = AssumeRoleProvider::builder(role_arn)
                    .session_name(SESSION_NAME)
                    .configure(&base)
                    .build()
                    .await;
                info!(role_arn = %role_arn, "Using assumed role credentials");
                loader(region).credentials_provider(provider).load().await
            }
            None => base,
        };

        Self::new(aws_sdk_s3::Client::new(&sdk_config))
    }
}

fn loader(region: Option<&str>) -> ConfigLoader {
    let loader = aws_config::defaults(BehaviorVersion::latest());
    match region {
        Some(region) => loader.region(Region::new(region.to_string())),
        None => loader,
    }
}

impl BucketClient for S3BucketClient {
    #[instrument(
        name = "s3_client_list",
        skip(self, request),
        fields(bucket = %request.bucket, prefix = %request.prefix)
    )]
    async fn list(&self, request: &ListRequest) -> Result<Listing> {
        let delimiter = (!request.delimiter.is_empty()).then(|| request.delimiter.clone());
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&request.bucket)
            .prefix(&request.prefix)
            .set_delimiter(delimiter)
            .into_paginator()
            .send();

        let mut listing = Listing::default();
        let mut page_count = 0usize;

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                StorageError::request(
                    &request.bucket,
                    &request.prefix,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;
            page_count += 1;

            listing.keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(str::to_string),
            );
            listing.common_prefixes.extend(
                page.common_prefixes()
                    .iter()
                    .filter_map(|p| p.prefix())
                    .map(str::to_string),
            );
        }

        debug!(
            pages = page_count,
            keys = listing.keys.len(),
            prefixes = listing.common_prefixes.len(),
            "Listing complete"
        );

        Ok(listing)
    }
}
