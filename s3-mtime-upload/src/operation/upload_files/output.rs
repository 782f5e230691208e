/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::PoisonError;

use crate::policy::Outcome;
use crate::remote::Container;
use crate::types::{FailedUpload, FileReport};

use super::UploadFilesState;

/// Output type for uploading a list of files
#[non_exhaustive]
#[derive(Debug)]
pub struct UploadFilesOutput {
    /// One report per processed file, in file list order
    pub reports: Vec<FileReport>,

    /// The list of failed files, in file list order
    pub failed_transfers: Vec<FailedUpload>,

    /// The folder files were uploaded into.
    /// `None` when running in check mode and the folder does not exist yet.
    pub folder: Option<Container>,

    /// Whether nothing was written because the operation ran in check mode
    pub dry_run: bool,
}

impl UploadFilesOutput {
    /// Creates a new builder-style object to manufacture [`UploadFilesOutput`]
    pub fn builder() -> UploadFilesOutputBuilder {
        UploadFilesOutputBuilder::default()
    }

    /// One report per processed file, in file list order
    pub fn reports(&self) -> &[FileReport] {
        &self.reports
    }

    /// The list of failed files
    pub fn failed_transfers(&self) -> &[FailedUpload] {
        &self.failed_transfers
    }

    /// The folder files were uploaded into
    pub fn folder(&self) -> Option<&Container> {
        self.folder.as_ref()
    }

    /// Whether the operation ran in check mode
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Number of files created (or that would be created)
    pub fn files_created(&self) -> usize {
        self.count(|outcome| outcome == Outcome::Created)
    }

    /// Number of files updated (or that would be updated)
    pub fn files_updated(&self) -> usize {
        self.count(|outcome| outcome == Outcome::Updated)
    }

    /// Number of files skipped
    pub fn files_skipped(&self) -> usize {
        self.count(|outcome| !outcome.is_write())
    }

    fn count(&self, predicate: impl Fn(Outcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(report.outcome()))
            .count()
    }
}

/// Builder for [`UploadFilesOutput`]
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct UploadFilesOutputBuilder {
    pub(crate) reports: Vec<FileReport>,
    pub(crate) failed_transfers: Vec<FailedUpload>,
    pub(crate) folder: Option<Container>,
    pub(crate) dry_run: bool,
}

impl UploadFilesOutputBuilder {
    /// Append a file report.
    ///
    /// To override the contents of this collection use [`set_reports`](Self::set_reports)
    pub fn reports(mut self, input: FileReport) -> Self {
        self.reports.push(input);
        self
    }

    /// The reports of all processed files
    pub fn set_reports(mut self, input: Vec<FileReport>) -> Self {
        self.reports = input;
        self
    }

    /// Append a failed transfer.
    ///
    /// To override the contents of this collection use [`set_failed_transfers`](Self::set_failed_transfers)
    pub fn failed_transfers(mut self, input: FailedUpload) -> Self {
        self.failed_transfers.push(input);
        self
    }

    /// The list of any failed files
    pub fn set_failed_transfers(mut self, input: Vec<FailedUpload>) -> Self {
        self.failed_transfers = input;
        self
    }

    /// The folder files were uploaded into
    pub fn set_folder(mut self, input: Option<Container>) -> Self {
        self.folder = input;
        self
    }

    /// Whether the operation ran in check mode
    pub fn dry_run(mut self, input: bool) -> Self {
        self.dry_run = input;
        self
    }

    /// Consumes the builder and constructs an [`UploadFilesOutput`], ordering reports and
    /// failures by their position in the file list
    pub fn build(mut self) -> UploadFilesOutput {
        self.reports.sort_by_key(|report| report.index);
        self.failed_transfers.sort_by_key(|failed| failed.index);
        UploadFilesOutput {
            reports: self.reports,
            failed_transfers: self.failed_transfers,
            folder: self.folder,
            dry_run: self.dry_run,
        }
    }
}

impl From<&UploadFilesState> for UploadFilesOutput {
    fn from(state: &UploadFilesState) -> Self {
        let reports = std::mem::take(
            &mut *state
                .reports
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let failed_transfers = std::mem::take(
            &mut *state
                .failed_uploads
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        UploadFilesOutput::builder()
            .set_reports(reports)
            .set_failed_transfers(failed_transfers)
            .set_folder(state.folder.clone())
            .dry_run(state.input.check())
            .build()
    }
}
