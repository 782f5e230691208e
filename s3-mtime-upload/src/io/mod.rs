/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Resolving file list entries and reading local file metadata
mod local_file;

// re-exports
pub use self::local_file::inspect;
pub use self::local_file::remote_name;
pub use self::local_file::resolve_path;
pub use self::local_file::LocalFile;
