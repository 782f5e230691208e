/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::{self, Error};
use crate::remote::{RemoteStore, S3Store, SharedRemoteStore};
use crate::types::ConcurrencySetting;

pub(crate) mod loader;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    concurrency: ConcurrencySetting,
    store: SharedRemoteStore,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the concurrency setting, i.e. how many files are compared and uploaded at the
    /// same time.
    pub fn concurrency(&self) -> &ConcurrencySetting {
        &self.concurrency
    }

    /// The remote store files are uploaded to.
    pub fn store(&self) -> &SharedRemoteStore {
        &self.store
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    concurrency: ConcurrencySetting,
    store: Option<SharedRemoteStore>,
    client: Option<aws_sdk_s3::Client>,
    bucket: Option<String>,
}

impl Builder {
    /// Set the number of files this component processes at the same time.
    ///
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set an explicit remote store to use.
    ///
    /// Takes precedence over [`client`](Self::client) and [`bucket`](Self::bucket).
    pub fn store(mut self, store: impl RemoteStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the bucket files are uploaded to.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    ///
    /// Fails when neither a store nor both an S3 client and a bucket are set.
    pub fn build(self) -> Result<Config, Error> {
        if let ConcurrencySetting::Explicit(0) = self.concurrency {
            return Err(error::invalid_input("concurrency must be at least 1"));
        }

        let store = match (self.store, self.client, self.bucket) {
            (Some(store), _, _) => store,
            (None, Some(client), Some(bucket)) if !bucket.is_empty() => {
                Arc::new(S3Store::new(client, bucket))
            }
            (None, _, _) => {
                return Err(error::invalid_input(
                    "a remote store or an S3 client and bucket are required",
                ))
            }
        };

        Ok(Config {
            concurrency: self.concurrency,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bucket_required() {
        let client = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::Config::builder()
                .behavior_version_latest()
                .region(aws_sdk_s3::config::Region::new("us-west-2"))
                .build(),
        );

        let err = Config::builder()
            .client(client.clone())
            .build()
            .unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());

        let config = Config::builder()
            .client(client)
            .bucket("my-bucket")
            .build()
            .unwrap();
        assert!(matches!(config.concurrency(), ConcurrencySetting::Auto));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = Config::builder()
            .concurrency(ConcurrencySetting::Explicit(0))
            .bucket("my-bucket")
            .build()
            .unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }
}
