/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Operation builders
pub mod builders;

mod input;
pub use input::{UploadFilesInput, UploadFilesInputBuilder};

mod handle;
pub use handle::UploadFilesHandle;

mod output;
pub use output::{UploadFilesOutput, UploadFilesOutputBuilder};
use tokio::sync::{watch, OwnedMutexGuard};
use tokio::task::JoinSet;
use tracing::Instrument;

mod worker;

use crate::remote::Container;
use crate::types::{FailedUpload, FileReport};

use super::resolve_folder::resolve_folder;
use super::TransferContext;

/// Operation struct for uploading a list of local files
#[derive(Clone, Default, Debug)]
pub(crate) struct UploadFiles;

impl UploadFiles {
    /// Execute a single `UploadFiles` operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: UploadFilesInput,
    ) -> Result<UploadFilesHandle, crate::error::Error> {
        // the folder is shared by every file, resolve it once up front
        let folder = resolve_folder(
            handle.config.store().as_ref(),
            input.folder(),
            input.check(),
        )
        .await?;

        let concurrency = handle.num_workers();
        let ctx = UploadFilesContext::new(handle.clone(), input, folder);

        // spawn all work into the same JoinSet such that when the set is dropped all tasks are cancelled.
        let mut tasks = JoinSet::new();
        let (work_tx, work_rx) = async_channel::bounded(concurrency);

        // spawn worker to distribute the file list
        tasks.spawn(worker::distribute_file_list(ctx.clone(), work_tx));

        for i in 0..concurrency {
            let worker = worker::upload_files(ctx.clone(), work_rx.clone())
                .instrument(tracing::debug_span!("file-uploader", worker = i));
            tasks.spawn(worker);
        }

        let handle = UploadFilesHandle { tasks, ctx };
        Ok(handle)
    }
}

/// Serializes work on the same object name.
///
/// Two entries of the file list may map to the same remote name. Their lookup, decision and
/// write must not interleave.
#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLocks {
    pub(crate) async fn lock(&self, name: &str) -> KeyGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(name.to_owned()).or_default().clone()
        };
        KeyGuard {
            locks: self,
            name: name.to_owned(),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held while a name is being worked on. The last holder removes the name from [`KeyLocks`].
#[derive(Debug)]
pub(crate) struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    name: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // clones are only taken under the map lock, so a count of one means nobody waits
        let mut locks = self
            .locks
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.name)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.name);
        }
    }
}

/// UploadFiles operation specific state
#[derive(Debug)]
pub(crate) struct UploadFilesState {
    input: UploadFilesInput,
    // `None` in check mode when the folder does not exist yet
    folder: Option<Container>,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
    reports: Mutex<Vec<FileReport>>,
    failed_uploads: Mutex<Vec<FailedUpload>>,
    key_locks: KeyLocks,
}

type UploadFilesContext = TransferContext<UploadFilesState>;

impl UploadFilesContext {
    fn new(
        handle: Arc<crate::client::Handle>,
        input: UploadFilesInput,
        folder: Option<Container>,
    ) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let state = Arc::new(UploadFilesState {
            input,
            folder,
            cancel_tx,
            cancel_rx,
            reports: Mutex::new(Vec::new()),
            failed_uploads: Mutex::new(Vec::new()),
            key_locks: KeyLocks::default(),
        });
        TransferContext { handle, state }
    }
}

#[cfg(test)]
mod tests {
    use super::KeyLocks;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_key_locks_serialize_same_name() {
        let locks = Arc::new(KeyLocks::default());
        let guard = locks.lock("a.txt").await;

        // other names are not blocked
        let _other = tokio::time::timeout(Duration::from_millis(50), locks.lock("b.txt"))
            .await
            .expect("different name acquires immediately");

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("a.txt").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("lock released")
            .unwrap();
    }

    #[tokio::test]
    async fn test_key_locks_forget_released_names() {
        let locks = Arc::new(KeyLocks::default());

        let first = locks.lock("a.txt").await;
        let second = locks.lock("b.txt").await;
        assert_eq!(2, locks.len());

        drop(first);
        assert_eq!(1, locks.len());

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("b.txt").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        // still wanted by the waiting task
        drop(second);
        assert_eq!(1, locks.len());

        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("lock released")
            .unwrap();
        assert_eq!(0, locks.len());
    }
}
