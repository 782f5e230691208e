/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::ConcurrencySetting;
use crate::Config;
use crate::DEFAULT_CONCURRENCY;
use std::sync::Arc;

/// Client for uploading local files to a remote store guarded by their `modified` timestamp.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, the remote store, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete number of workers to use based on the concurrency setting.
    pub(crate) fn num_workers(&self) -> usize {
        match self.config.concurrency() {
            ConcurrencySetting::Explicit(concurrency) => *concurrency,
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
        }
    }
}

impl Client {
    /// Creates a new client from a config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Upload a list of local files into a folder of the remote store.
    ///
    /// Each file is created when no object of the same name exists in the folder. An existing
    /// object is only overwritten when its `modified` property is older than the local file or
    /// when `force` is set. With `check` set nothing is written and the output reports what
    /// would have happened.
    ///
    /// Constructs a fluent builder for the
    /// [`UploadFiles`](crate::operation::upload_files::builders::UploadFilesFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::error::Error;
    ///
    /// async fn preview(client: &s3_mtime_upload::Client) -> Result<(), Box<dyn Error>> {
    ///     let handle = client
    ///         .upload_files()
    ///         .file_list(["/var/log/report.csv"])
    ///         .folder("reports")
    ///         .check(true)
    ///         .send()
    ///         .await?;
    ///
    ///     // send() returns before the files are processed.
    ///     // Call `join()` on the returned handle to drive the operation to completion.
    ///     let output = handle.join().await?;
    ///     for report in output.reports() {
    ///         println!("{} would be {}", report.remote_name(), report.outcome());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn upload_files(&self) -> crate::operation::upload_files::builders::UploadFilesFluentBuilder {
        crate::operation::upload_files::builders::UploadFilesFluentBuilder::new(self.handle.clone())
    }
}
