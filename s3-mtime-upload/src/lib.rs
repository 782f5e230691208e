/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Upload local files to Amazon S3 guarded by a `modified` timestamp.
//!
//! Every object written by this crate carries a `modified` user metadata entry holding the
//! local file's last-modified time (epoch seconds). On later runs, an existing object is only
//! overwritten when the local copy is strictly newer, unless the caller forces the upload.
//!
//! # Examples
//!
//! Upload two files into the `backups` folder of a bucket:
//!
//! ```no_run
//! # async fn example() -> Result<(), s3_mtime_upload::error::Error> {
//! let config = s3_mtime_upload::from_env().bucket("my-bucket").load().await?;
//! let client = s3_mtime_upload::Client::new(config);
//!
//! let handle = client
//!     .upload_files()
//!     .file_list(["notes.txt", "todo.md"])
//!     .home_dir("/home/me")
//!     .folder("backups")
//!     .send()
//!     .await?;
//!
//! let output = handle.join().await?;
//! for report in output.reports() {
//!     println!("{}: {}", report.remote_name(), report.outcome());
//! }
//! # Ok(())
//! # }
//! ```

/// Default number of files processed concurrently
pub(crate) const DEFAULT_CONCURRENCY: usize = 8;

/// Error types emitted by `s3-mtime-upload`
pub mod error;

/// Common types used by `s3-mtime-upload`
pub mod types;

/// The skip/overwrite decision
pub mod policy;

/// Local file inspection
pub mod io;

/// Remote store abstraction and the Amazon S3 implementation
pub mod remote;

/// Client entry point
pub mod client;

/// Operations
pub mod operation;

/// Client configuration
pub mod config;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
