/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{self, Error, ErrorKind};

/// Metadata of a local file that is about to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
    modified_at: i64,
}

impl LocalFile {
    /// The resolved path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last-modified time in whole epoch seconds
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }
}

/// Resolve a file list entry against the optional home directory.
///
/// Without a home directory the entry is used as given, i.e. relative entries are relative to
/// the current working directory.
pub fn resolve_path(entry: &str, home_dir: Option<&Path>) -> PathBuf {
    match home_dir {
        Some(home_dir) => home_dir.join(entry),
        None => PathBuf::from(entry),
    }
}

/// The object name for a file list entry: its final path component.
pub fn remote_name(entry: &str) -> Result<String, Error> {
    Path::new(entry)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            error::invalid_input(format!(
                "file list entry `{entry}` does not end with a file name"
            ))
        })
}

/// Read the metadata of the file at `path`.
///
/// Fails with [`ErrorKind::LocalFileNotFound`] when nothing exists at `path`.
pub async fn inspect(path: &Path) -> Result<LocalFile, Error> {
    let metadata = tokio::fs::metadata(path).await.map_err(|err| {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::LocalFileNotFound,
            _ => ErrorKind::IOError,
        };
        Error::new(kind, format!("{}: {err}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(error::invalid_input(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let modified_at = epoch_seconds(metadata.modified()?);

    Ok(LocalFile {
        path: path.to_owned(),
        modified_at,
    })
}

/// Whole seconds relative to the Unix epoch, truncated toward negative infinity for
/// timestamps before the epoch.
fn epoch_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => {
            let before = before.duration();
            let secs = before.as_secs() as i64;
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}
