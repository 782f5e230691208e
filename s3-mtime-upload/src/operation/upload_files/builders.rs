/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::{path::Path, path::PathBuf, sync::Arc};

use crate::types::FailedTransferPolicy;

use super::{UploadFilesHandle, UploadFilesInputBuilder};

/// Fluent builder for constructing a file list upload
#[derive(Debug)]
pub struct UploadFilesFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadFilesInputBuilder,
}

impl UploadFilesFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: std::default::Default::default(),
        }
    }

    /// Initiate upload of the file list
    #[tracing::instrument(skip_all, level = "debug", name = "initiate-upload-files", fields(
        files = self.inner.file_list.len(),
        folder = self.inner.folder.as_deref().unwrap_or(crate::remote::ROOT_FOLDER),
        force = self.inner.force,
        check = self.inner.check,
    ))]
    pub async fn send(self) -> Result<UploadFilesHandle, crate::error::Error> {
        let input = self.inner.build()?;
        crate::operation::upload_files::UploadFiles::orchestrate(self.handle, input).await
    }

    /// Local paths to upload.
    /// Required, must not be empty.
    pub fn file_list<I, S>(mut self, input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner = self.inner.file_list(input);
        self
    }

    /// Append a single path to the file list.
    pub fn file(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.file(input);
        self
    }

    /// Local paths to upload.
    pub fn get_file_list(&self) -> &[String] {
        self.inner.get_file_list()
    }

    /// Base directory for relative entries of the file list.
    /// If not provided, entries are used as given.
    pub fn home_dir(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.home_dir(input);
        self
    }

    /// Base directory for relative entries of the file list.
    pub fn set_home_dir(mut self, input: Option<PathBuf>) -> Self {
        self.inner = self.inner.set_home_dir(input);
        self
    }

    /// Base directory for relative entries of the file list.
    pub fn get_home_dir(&self) -> Option<&Path> {
        self.inner.get_home_dir()
    }

    /// Name of the remote folder to upload into.
    /// If not provided (or `root`), files are uploaded to the root folder.
    /// A missing folder is created unless `check` is set.
    pub fn folder(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.folder(input);
        self
    }

    /// Name of the remote folder to upload into.
    pub fn set_folder(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_folder(input);
        self
    }

    /// Name of the remote folder to upload into.
    pub fn get_folder(&self) -> Option<&str> {
        self.inner.get_folder()
    }

    /// Overwrite existing objects regardless of their `modified` property.
    /// Defaults to false.
    pub fn force(mut self, input: bool) -> Self {
        self.inner = self.inner.force(input);
        self
    }

    /// Overwrite existing objects regardless of their `modified` property.
    pub fn get_force(&self) -> bool {
        self.inner.get_force()
    }

    /// Only report what would happen, nothing is created or written.
    /// Defaults to false.
    pub fn check(mut self, input: bool) -> Self {
        self.inner = self.inner.check(input);
        self
    }

    /// Only report what would happen.
    pub fn get_check(&self) -> bool {
        self.inner.get_check()
    }

    /// Content type for every uploaded object.
    pub fn mimetype(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.mimetype(input);
        self
    }

    /// Content type for every uploaded object.
    pub fn set_mimetype(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_mimetype(input);
        self
    }

    /// Content type for every uploaded object.
    pub fn get_mimetype(&self) -> Option<&str> {
        self.inner.get_mimetype()
    }

    /// The failure policy to use when any individual file fails.
    /// Defaults to [`FailedTransferPolicy::Continue`]
    pub fn failure_policy(mut self, input: FailedTransferPolicy) -> Self {
        self.inner = self.inner.failure_policy(input);
        self
    }

    /// The failure policy to use when any individual file fails.
    pub fn get_failure_policy(&self) -> &FailedTransferPolicy {
        self.inner.get_failure_policy()
    }
}
