/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use crate::policy::Outcome;

/// The concurrency settings to use for processing the file list.
#[derive(Debug, Clone, Default)]
pub enum ConcurrencySetting {
    /// Use the library default.
    #[default]
    Auto,

    /// Explicitly configured number of files processed at the same time.
    Explicit(usize),
}

/// Policy for how to handle a failure of any individual file in the file list.
///
/// Default is to continue with the remaining files.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FailedTransferPolicy {
    /// Stop handing out new files after the first failure and report that failure.
    Abort,
    /// Continue with the remaining files. Every failure is logged and the details of all
    /// failed files are available in the output after the operation completes.
    #[default]
    Continue,
}

/// What was decided (and done) for a single file.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct FileReport {
    pub(crate) index: usize,
    pub(crate) local_path: PathBuf,
    pub(crate) remote_name: String,
    pub(crate) local_modified_at: i64,
    pub(crate) remote_modified_at: Option<i64>,
    pub(crate) outcome: Outcome,
    pub(crate) applied: bool,
}

impl FileReport {
    /// Resolved path of the local file
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Name of the object in the target folder
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    /// Last-modified time of the local file in epoch seconds
    pub fn local_modified_at(&self) -> i64 {
        self.local_modified_at
    }

    /// The `modified` property of the remote object seen before the decision, if any
    pub fn remote_modified_at(&self) -> Option<i64> {
        self.remote_modified_at
    }

    /// The decision for this file
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the decision was carried out against the remote store.
    ///
    /// Always `false` in check mode and for skipped files.
    pub fn applied(&self) -> bool {
        self.applied
    }
}

/// Detailed information about a file that could not be processed
#[non_exhaustive]
#[derive(Debug)]
pub struct FailedUpload {
    pub(crate) index: usize,
    pub(crate) local_path: PathBuf,
    pub(crate) remote_name: Option<String>,
    pub(crate) error: crate::error::Error,
}

impl FailedUpload {
    /// The path of the local file as resolved from the file list
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// The target object name, when one could be derived from the file list entry
    pub fn remote_name(&self) -> Option<&str> {
        self.remote_name.as_deref()
    }

    /// The error encountered processing the file
    pub fn error(&self) -> &crate::error::Error {
        &self.error
    }
}
