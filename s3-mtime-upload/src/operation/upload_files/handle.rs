/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::{error::ErrorKind, types::FailedTransferPolicy};

use super::{UploadFilesContext, UploadFilesOutput};
use tokio::task;

/// Handle for `UploadFiles` operation
///
/// # Cancellation
///
/// The operation can be cancelled by either by dropping this handle or by calling
/// [`Self::abort`]. Dropping the handle terminates in-progress tasks at their next await
/// point, which may leave a single object half way through its write. Calling
/// [`Self::abort`] lets every worker finish the file it is working on and stops handing out
/// new ones.
#[derive(Debug)]
#[non_exhaustive]
pub struct UploadFilesHandle {
    /// All child tasks spawned for this upload
    pub(crate) tasks: task::JoinSet<Result<(), crate::error::Error>>,
    /// The context used to drive the upload to completion
    pub(crate) ctx: UploadFilesContext,
}

impl UploadFilesHandle {
    /// Consume the handle and wait for every file to be processed
    ///
    /// When the `FailedTransferPolicy` is set to [`FailedTransferPolicy::Abort`], this method
    /// returns the first error any file encountered, naming the file list entry. Files other
    /// workers were already processing still finish. Files that were not started because of
    /// it are not reported as errors.
    ///
    /// If the `FailedTransferPolicy` is set to [`FailedTransferPolicy::Continue`], the
    /// [`UploadFilesOutput`] holds a report for every processed file and the details of every
    /// failed one.
    #[tracing::instrument(skip_all, level = "debug", name = "join-upload-files")]
    pub async fn join(mut self) -> Result<UploadFilesOutput, crate::error::Error> {
        let mut first_error_to_report = None;
        while let Some(join_result) = self.tasks.join_next().await {
            let result = join_result?;
            if let Err(e) = result {
                match self.ctx.state.input.failure_policy() {
                    FailedTransferPolicy::Abort
                        if first_error_to_report.is_none()
                            && e.kind() != &ErrorKind::OperationCancelled =>
                    {
                        first_error_to_report = Some(e);
                    }
                    FailedTransferPolicy::Continue => {
                        tracing::warn!("encountered but dismissed error when the failure policy is `Continue`: {e}")
                    }
                    _ => {}
                }
            }
        }

        if let Some(e) = first_error_to_report {
            Err(e)
        } else {
            Ok(UploadFilesOutput::from(self.ctx.state.as_ref()))
        }
    }

    /// Stop handing out new files and wait for the in-progress ones to finish.
    pub async fn abort(&mut self) -> Result<(), crate::error::Error> {
        if self.ctx.state.cancel_tx.send(true).is_err() {
            tracing::warn!(
                "all receiver ends have been dropped, unable to send a cancellation signal"
            );
        }
        while (self.tasks.join_next().await).is_some() {}

        Ok(())
    }
}
