/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::PoisonError;

use async_channel::{Receiver, Sender};

use crate::error::{self, ErrorKind};
use crate::io;
use crate::policy::{self, Outcome, RemoteObjectRef, UploadTask};
use crate::remote::ObjectUpload;
use crate::types::{FailedTransferPolicy, FailedUpload, FileReport};

use super::UploadFilesContext;

#[derive(Debug)]
pub(super) struct UploadFileJob {
    index: usize,
    entry: String,
}

// worker to hand out the entries of the file list
pub(super) async fn distribute_file_list(
    ctx: UploadFilesContext,
    work_tx: Sender<UploadFileJob>,
) -> Result<(), error::Error> {
    let mut cancel_rx = ctx.state.cancel_rx.clone();

    for (index, entry) in ctx.state.input.file_list().iter().enumerate() {
        let entry = entry.trim();
        if entry.is_empty() {
            tracing::warn!("ignoring empty entry at position {index} of the file list");
            continue;
        }

        let job = UploadFileJob {
            index,
            entry: entry.to_owned(),
        };

        tokio::select! {
            biased;
            _ = cancel_rx.changed() => {
                tracing::error!("received cancellation signal, exiting and not distributing new files");
                return Err(error::operation_cancelled());
            }
            sent = work_tx.send(job) => {
                if sent.is_err() {
                    tracing::error!("all receiver ends have been dropped, unable to send a job!");
                    break;
                }
            }
        }
    }

    Ok(())
}

// worker to compare and upload a single file at a time
pub(super) async fn upload_files(
    ctx: UploadFilesContext,
    work_rx: Receiver<UploadFileJob>,
) -> Result<(), error::Error> {
    let mut cancel_rx = ctx.state.cancel_rx.clone();
    loop {
        tokio::select! {
            // a pending cancellation wins over queued work
            biased;
            _ = cancel_rx.changed() => {
                tracing::error!("received cancellation signal, exiting and not processing a new file");
                return Err(error::operation_cancelled());
            }
            job = work_rx.recv() => {
                match job {
                    Err(_) => break,
                    Ok(job) => {
                        tracing::debug!("worker recv'd file list entry {:?}", job.entry);

                        match upload_single_file(&ctx, &job).await {
                            Ok(report) => {
                                tracing::info!(
                                    applied = report.applied(),
                                    "{} -> {}: {}",
                                    report.local_path().display(),
                                    report.remote_name(),
                                    report.outcome()
                                );
                                ctx.state
                                    .reports
                                    .lock()
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .push(report);
                            }
                            Err(err) => {
                                tracing::debug!(
                                    "worker failed to upload file list entry {:?}: {}",
                                    job.entry,
                                    err
                                );
                                match ctx.state.input.failure_policy() {
                                    FailedTransferPolicy::Abort => {
                                        // Sending a cancellation signal during graceful shutdown would be redundant.
                                        if err.kind() != &ErrorKind::OperationCancelled
                                            && ctx.state.cancel_tx.send(true).is_err()
                                        {
                                            tracing::warn!(
                                                "all receiver ends have been dropped, unable to send a cancellation signal"
                                            );
                                        }
                                        return Err(err.with_file(job.entry));
                                    }
                                    FailedTransferPolicy::Continue => {
                                        tracing::warn!("failed to upload {:?}: {}", job.entry, err);
                                        let failed_transfer = FailedUpload {
                                            index: job.index,
                                            local_path: io::resolve_path(
                                                &job.entry,
                                                ctx.state.input.home_dir(),
                                            ),
                                            remote_name: io::remote_name(&job.entry).ok(),
                                            error: err,
                                        };

                                        ctx.state
                                            .failed_uploads
                                            .lock()
                                            .unwrap_or_else(PoisonError::into_inner)
                                            .push(failed_transfer);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    tracing::trace!("req channel closed, worker finished");
    Ok(())
}

async fn upload_single_file(
    ctx: &UploadFilesContext,
    job: &UploadFileJob,
) -> Result<FileReport, error::Error> {
    let input = &ctx.state.input;
    let local_path = io::resolve_path(&job.entry, input.home_dir());
    let remote_name = io::remote_name(&job.entry)?;
    let local = io::inspect(&local_path).await?;

    let task = UploadTask::new(local.path(), remote_name, local.modified_at()).with_index(job.index);
    compare_and_upload(ctx, task).await
}

async fn compare_and_upload(
    ctx: &UploadFilesContext,
    task: UploadTask,
) -> Result<FileReport, error::Error> {
    let state = &ctx.state;
    let mut report = FileReport {
        index: task.index,
        local_path: task.local_path.clone(),
        remote_name: task.remote_name.clone(),
        local_modified_at: task.local_modified_at,
        remote_modified_at: None,
        outcome: Outcome::Created,
        applied: false,
    };

    let Some(folder) = state.folder.as_ref() else {
        // check mode: the folder would be created, nothing can exist inside it yet
        return Ok(report);
    };

    let _guard = state.key_locks.lock(task.remote_name()).await;

    let existing = ctx.store().find_object(folder, task.remote_name()).await?;
    report.outcome = policy::decide(&task, existing.as_ref(), state.input.force());
    report.remote_modified_at = existing
        .as_ref()
        .and_then(RemoteObjectRef::get_remote_modified_at);

    if state.input.check() || !report.outcome.is_write() {
        return Ok(report);
    }

    let upload = ObjectUpload::new(
        task.remote_name(),
        task.local_path(),
        task.local_modified_at(),
    )
    .content_type(state.input.mimetype().map(str::to_owned));

    match existing.as_ref() {
        Some(existing) => ctx.store().update_object(existing, upload).await?,
        None => ctx.store().create_object(folder, upload).await?,
    }

    report.applied = true;
    Ok(report)
}
