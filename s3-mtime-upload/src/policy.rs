/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::path::{Path, PathBuf};

/// A single file from the file list, ready to be compared against the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub(crate) index: usize,
    pub(crate) local_path: PathBuf,
    pub(crate) remote_name: String,
    pub(crate) local_modified_at: i64,
}

impl UploadTask {
    /// Create a new task
    pub fn new(
        local_path: impl Into<PathBuf>,
        remote_name: impl Into<String>,
        local_modified_at: i64,
    ) -> Self {
        Self {
            index: 0,
            local_path: local_path.into(),
            remote_name: remote_name.into(),
            local_modified_at,
        }
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

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
}

/// Projection of an object that already exists in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObjectRef {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) remote_modified_at: Option<i64>,
    pub(crate) e_tag: Option<String>,
}

impl RemoteObjectRef {
    /// Create a new reference to a remote object
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            remote_modified_at: None,
            e_tag: None,
        }
    }

    /// Set the value of the `modified` property, if the object has one
    pub fn remote_modified_at(mut self, input: Option<i64>) -> Self {
        self.remote_modified_at = input;
        self
    }

    /// Set the entity tag observed when the object was looked up
    pub fn e_tag(mut self, input: Option<String>) -> Self {
        self.e_tag = input;
        self
    }

    /// Store specific identifier (the full object key for S3)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Object name within its folder
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `modified` property, absent when the object was not written by this tool
    pub fn get_remote_modified_at(&self) -> Option<i64> {
        self.remote_modified_at
    }

    /// Entity tag observed when the object was looked up
    pub fn get_e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }
}

/// What happens (or would happen in check mode) to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No remote object existed; one was created
    Created,
    /// The remote object was overwritten
    Updated,
    /// The remote object is newer than the local file
    SkippedNewer,
    /// The remote object has the same timestamp as the local file
    SkippedSameAge,
    /// The remote object has no `modified` property
    SkippedNoMetadata,
}

impl Outcome {
    /// Whether the outcome implies a write to the remote store
    pub fn is_write(&self) -> bool {
        matches!(self, Outcome::Created | Outcome::Updated)
    }

    /// Whether `--force` would be needed to upload the file
    pub fn requires_force(&self) -> bool {
        !self.is_write()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Updated => write!(f, "updated"),
            Outcome::SkippedNewer => write!(f, "skipped: remote copy is newer"),
            Outcome::SkippedSameAge => write!(f, "skipped: same last modified date"),
            Outcome::SkippedNoMetadata => {
                write!(f, "skipped: remote copy has no `modified` property")
            }
        }
    }
}

/// Decide what to do with `task` given the matching remote object, if any.
///
/// A missing remote object is always created. Otherwise `force` overwrites unconditionally,
/// and without it the remote object is only overwritten when its `modified` property is
/// strictly older than the local file.
pub fn decide(task: &UploadTask, remote: Option<&RemoteObjectRef>, force: bool) -> Outcome {
    let Some(remote) = remote else {
        return Outcome::Created;
    };

    if force {
        return Outcome::Updated;
    }

    match remote.remote_modified_at {
        None => Outcome::SkippedNoMetadata,
        Some(remote_modified_at) if remote_modified_at > task.local_modified_at => {
            Outcome::SkippedNewer
        }
        Some(remote_modified_at) if remote_modified_at == task.local_modified_at => {
            Outcome::SkippedSameAge
        }
        Some(_) => Outcome::Updated,
    }
}
