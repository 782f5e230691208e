/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Error;
use crate::policy::RemoteObjectRef;

/// Amazon S3 implementation of [`RemoteStore`]
pub mod s3;
pub use self::s3::S3Store;

/// Name of the custom property holding the local last-modified time in epoch seconds.
pub const MODIFIED_PROPERTY: &str = "modified";

/// Folder name that refers to the store's top-level container.
pub const ROOT_FOLDER: &str = "root";

/// A folder-like grouping of objects in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    name: String,
}

impl Container {
    /// Create a reference to a container
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The store's top-level container. It always exists.
    pub fn root() -> Self {
        Self::new("", ROOT_FOLDER)
    }

    /// Store specific identifier (the key prefix for S3, empty for the root)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the top-level container
    pub fn is_root(&self) -> bool {
        self.id.is_empty()
    }
}

/// Content and metadata for a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpload {
    pub(crate) name: String,
    pub(crate) modified_at: i64,
    pub(crate) content_type: Option<String>,
    pub(crate) source: PathBuf,
}

impl ObjectUpload {
    /// Create a new upload of the file at `source` named `name`
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>, modified_at: i64) -> Self {
        Self {
            name: name.into(),
            modified_at,
            content_type: None,
            source: source.into(),
        }
    }

    /// Set an explicit content type
    pub fn content_type(mut self, input: Option<String>) -> Self {
        self.content_type = input;
        self
    }

    /// Object name within the target container
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for the `modified` property
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    /// Explicit content type, if any
    pub fn get_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Local file providing the content
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// The operations the uploader needs from a remote file store.
///
/// Implementations must be safe to share between concurrently running tasks.
#[async_trait]
pub trait RemoteStore: Send + Sync + fmt::Debug {
    /// Look up a container by name. `Ok(None)` when it does not exist.
    async fn find_container(&self, name: &str) -> Result<Option<Container>, Error>;

    /// Create a container named `name`.
    async fn create_container(&self, name: &str) -> Result<Container, Error>;

    /// Look up the object named `name` inside `container`. `Ok(None)` when it does not exist.
    async fn find_object(
        &self,
        container: &Container,
        name: &str,
    ) -> Result<Option<RemoteObjectRef>, Error>;

    /// Create a new object inside `container`.
    async fn create_object(&self, container: &Container, upload: ObjectUpload)
        -> Result<(), Error>;

    /// Replace the content and metadata of `existing`.
    async fn update_object(
        &self,
        existing: &RemoteObjectRef,
        upload: ObjectUpload,
    ) -> Result<(), Error>;
}

/// A [`RemoteStore`] shared between tasks
pub type SharedRemoteStore = Arc<dyn RemoteStore>;

/// Parse the value of the `modified` property.
///
/// Values that are not integers are treated as missing.
pub(crate) fn parse_modified(value: Option<&str>) -> Option<i64> {
    let value = value?;
    match value.trim().parse::<i64>() {
        Ok(modified) => Some(modified),
        Err(err) => {
            tracing::warn!("ignoring unparseable `{MODIFIED_PROPERTY}` property {value:?}: {err}");
            None
        }
    }
}
