/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use crate::error::{self, Error};
use crate::types::FailedTransferPolicy;

/// Input type for uploading a list of files
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct UploadFilesInput {
    /// Local paths to upload, resolved against `home_dir` when set.
    pub file_list: Vec<String>,

    /// Base directory for relative entries of the file list.
    pub home_dir: Option<PathBuf>,

    /// Name of the remote folder to upload into. The root folder when not set.
    pub folder: Option<String>,

    /// Overwrite existing objects regardless of their `modified` property.
    pub force: bool,

    /// Report what would happen without writing anything.
    pub check: bool,

    /// Content type for every uploaded object.
    pub mimetype: Option<String>,

    /// The failure policy to use when any individual file fails.
    pub failure_policy: FailedTransferPolicy,
}

impl UploadFilesInput {
    /// Creates a new builder-style object to manufacture [`UploadFilesInput`]
    pub fn builder() -> UploadFilesInputBuilder {
        UploadFilesInputBuilder::default()
    }

    /// Local paths to upload, resolved against `home_dir` when set.
    pub fn file_list(&self) -> &[String] {
        &self.file_list
    }

    /// Base directory for relative entries of the file list.
    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }

    /// Name of the remote folder to upload into.
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Overwrite existing objects regardless of their `modified` property.
    pub fn force(&self) -> bool {
        self.force
    }

    /// Report what would happen without writing anything.
    pub fn check(&self) -> bool {
        self.check
    }

    /// Content type for every uploaded object.
    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    /// The failure policy to use when any individual file fails.
    pub fn failure_policy(&self) -> &FailedTransferPolicy {
        &self.failure_policy
    }
}

/// A builder for [UploadFilesInput]
#[non_exhaustive]
#[derive(Clone, Default, Debug)]
pub struct UploadFilesInputBuilder {
    pub(crate) file_list: Vec<String>,
    pub(crate) home_dir: Option<PathBuf>,
    pub(crate) folder: Option<String>,
    pub(crate) force: bool,
    pub(crate) check: bool,
    pub(crate) mimetype: Option<String>,
    pub(crate) failure_policy: FailedTransferPolicy,
}

impl UploadFilesInputBuilder {
    /// Local paths to upload. Required, must not be empty.
    pub fn file_list<I, S>(mut self, input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_list = input.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single path to the file list.
    pub fn file(mut self, input: impl Into<String>) -> Self {
        self.file_list.push(input.into());
        self
    }

    /// Local paths to upload.
    pub fn get_file_list(&self) -> &[String] {
        &self.file_list
    }

    /// Base directory for relative entries of the file list.
    /// If not provided, entries are used as given.
    pub fn home_dir(self, input: impl Into<PathBuf>) -> Self {
        self.set_home_dir(Some(input.into()))
    }

    /// Base directory for relative entries of the file list.
    pub fn set_home_dir(mut self, input: Option<PathBuf>) -> Self {
        self.home_dir = input;
        self
    }

    /// Base directory for relative entries of the file list.
    pub fn get_home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }

    /// Name of the remote folder to upload into.
    /// If not provided (or `root`), files are uploaded to the root folder.
    pub fn folder(self, input: impl Into<String>) -> Self {
        self.set_folder(Some(input.into()))
    }

    /// Name of the remote folder to upload into.
    pub fn set_folder(mut self, input: Option<String>) -> Self {
        self.folder = input;
        self
    }

    /// Name of the remote folder to upload into.
    pub fn get_folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Overwrite existing objects regardless of their `modified` property.
    /// Defaults to false. Cannot be combined with `check`.
    pub fn force(mut self, input: bool) -> Self {
        self.force = input;
        self
    }

    /// Overwrite existing objects regardless of their `modified` property.
    pub fn get_force(&self) -> bool {
        self.force
    }

    /// Report what would happen without writing anything.
    /// Defaults to false. Cannot be combined with `force`.
    pub fn check(mut self, input: bool) -> Self {
        self.check = input;
        self
    }

    /// Report what would happen without writing anything.
    pub fn get_check(&self) -> bool {
        self.check
    }

    /// Content type for every uploaded object.
    /// If not provided, the store picks one.
    pub fn mimetype(self, input: impl Into<String>) -> Self {
        self.set_mimetype(Some(input.into()))
    }

    /// Content type for every uploaded object.
    pub fn set_mimetype(mut self, input: Option<String>) -> Self {
        self.mimetype = input;
        self
    }

    /// Content type for every uploaded object.
    pub fn get_mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    /// The failure policy to use when any individual file fails.
    /// Defaults to [`FailedTransferPolicy::Continue`]
    pub fn failure_policy(mut self, input: FailedTransferPolicy) -> Self {
        self.failure_policy = input;
        self
    }

    /// The failure policy to use when any individual file fails.
    pub fn get_failure_policy(&self) -> &FailedTransferPolicy {
        &self.failure_policy
    }

    /// Consumes the builder and constructs an [`UploadFilesInput`]
    pub fn build(self) -> Result<UploadFilesInput, Error> {
        if self.file_list.is_empty() {
            return Err(error::invalid_input("file list must not be empty"));
        }

        if self.force && self.check {
            return Err(error::invalid_input(
                "`force` and `check` cannot be used together",
            ));
        }

        if let Some(folder) = self.folder.as_deref() {
            if folder.trim().trim_matches('/').is_empty() {
                return Err(error::invalid_input(format!(
                    "`{folder}` is not a valid folder name"
                )));
            }
        }

        if let Some(mimetype) = self.mimetype.as_deref() {
            if mimetype.trim().is_empty() {
                return Err(error::invalid_input("mimetype must not be empty"));
            }
        }

        Ok(UploadFilesInput {
            file_list: self.file_list,
            home_dir: self.home_dir,
            folder: self.folder,
            force: self.force,
            check: self.check,
            mimetype: self.mimetype,
            failure_policy: self.failure_policy,
        })
    }
}
