/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_sdk_s3::error::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    file: Option<String>,
    source: BoxError,
}

/// General categories of upload errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input validation issues
    InputInvalid,

    /// A path from the file list does not exist
    LocalFileNotFound,

    /// I/O errors other than a missing local file
    IOError,

    /// Looking up a folder or an object in the remote store failed
    RemoteLookupError,

    /// Creating or updating a remote object (or folder) failed
    RemoteWriteError,

    /// Some kind of internal runtime issue (e.g. a worker task panicked)
    RuntimeError,

    /// The file was not processed because another file failed with the abort policy.
    OperationCancelled,
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            file: None,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The file list entry that failed, when the error is not already reported next to it.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub(crate) fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::LocalFileNotFound => write!(f, "local file not found"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::RemoteLookupError => write!(f, "remote lookup failed"),
            ErrorKind::RemoteWriteError => write!(f, "remote write failed"),
            ErrorKind::RuntimeError => write!(f, "runtime error"),
            ErrorKind::OperationCancelled => write!(f, "operation cancelled"),
        }?;
        if let Some(file) = &self.file {
            write!(f, " for {file:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        let kind = match value.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::LocalFileNotFound,
            _ => ErrorKind::IOError,
        };
        Self::new(kind, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn lookup_failed<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::RemoteLookupError, err)
}

pub(crate) fn write_failed<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::RemoteWriteError, err)
}

static CANCELLATION_ERROR: &str =
    "at least one upload has failed, not processing any more files";

pub(crate) fn operation_cancelled() -> Error {
    Error::new(ErrorKind::OperationCancelled, CANCELLATION_ERROR)
}
