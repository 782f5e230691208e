/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::Duration;

use aws_config::timeout::TimeoutConfig;

use crate::config::Builder;
use crate::error::Error;
use crate::{types::ConcurrencySetting, Config};

/// Load [`Config`] for an S3 backed client from the environment.
///
/// Credentials and region come from the standard AWS provider chains.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    builder: Builder,
    endpoint_url: Option<String>,
    operation_timeout: Option<Duration>,
}

impl ConfigLoader {
    /// The bucket files are uploaded to. Required.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.builder = self.builder.bucket(bucket);
        self
    }

    /// Send requests to a custom endpoint, e.g. an S3 compatible store.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Limit the total time of each request sent to the store, retries included.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Set the number of files processed at the same time.
    ///
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.builder = self.builder.concurrency(concurrency);
        self
    }

    /// Load the default configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> Result<Config, Error> {
        let mut loader = aws_config::from_env();
        if let Some(endpoint_url) = self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let Some(timeout) = self.operation_timeout {
            loader = loader.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        }
        let shared_config = loader.load().await;

        // path style addressing keeps custom endpoints (minio, localstack, ...) working
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(shared_config.endpoint_url().is_some())
            .build();
        let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

        self.builder.client(s3_client).build()
    }
}
