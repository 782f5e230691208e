/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use s3_mtime_upload::operation::upload_files::UploadFilesOutput;
use s3_mtime_upload::types::{ConcurrencySetting, FailedTransferPolicy, FileReport};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "s3-mtime-upload")]
#[command(
    about = "Uploads local files to an S3 bucket, only overwriting remote copies that are older than the local file."
)]
struct Args {
    /// Comma separated list of files to upload
    #[arg(short = 'f', long = "file_list", required = true, value_delimiter = ',')]
    file_list: Vec<String>,

    /// Directory relative entries of the file list are resolved against
    #[arg(short = 'd', long = "home_dir")]
    home_dir: Option<PathBuf>,

    /// Folder to upload into, created when missing. Defaults to the top-level folder
    #[arg(long)]
    folder: Option<String>,

    /// Upload even when the remote copy is newer or was not written by this tool
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue, conflicts_with = "check")]
    force: bool,

    /// Prints last modified dates and whether 'force' is required to upload. Nothing is written
    #[arg(short = 'c', long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    check: bool,

    /// Content type of the uploaded files
    #[arg(long)]
    mimetype: Option<String>,

    /// Bucket backing the store
    #[arg(long, required = true)]
    bucket: String,

    /// Custom endpoint of an S3 compatible store
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Number of files processed at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Timeout for each request to the store, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Stop at the first file that fails
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    fail_fast: bool,
}

async fn do_upload(args: Args) -> Result<UploadFilesOutput, BoxError> {
    let mut loader = s3_mtime_upload::from_env().bucket(&args.bucket);
    if let Some(endpoint_url) = args.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    if let Some(timeout_secs) = args.timeout_secs {
        loader = loader.operation_timeout(Duration::from_secs(timeout_secs));
    }
    if let Some(concurrency) = args.concurrency {
        loader = loader.concurrency(ConcurrencySetting::Explicit(concurrency));
    }

    let client = s3_mtime_upload::Client::new(loader.load().await?);

    let failure_policy = if args.fail_fast {
        FailedTransferPolicy::Abort
    } else {
        FailedTransferPolicy::Continue
    };

    let handle = client
        .upload_files()
        .file_list(args.file_list)
        .set_home_dir(args.home_dir)
        .set_folder(args.folder)
        .force(args.force)
        .check(args.check)
        .set_mimetype(args.mimetype)
        .failure_policy(failure_policy)
        .send()
        .await?;

    Ok(handle.join().await?)
}

fn format_modified(modified: Option<i64>) -> String {
    modified.map_or_else(|| "-".to_owned(), |modified| modified.to_string())
}

fn print_check(report: &FileReport) {
    println!(
        "{}: local modified {}, remote modified {}, would be {}, force required: {}",
        report.remote_name(),
        report.local_modified_at(),
        format_modified(report.remote_modified_at()),
        report.outcome(),
        if report.outcome().requires_force() {
            "yes"
        } else {
            "no"
        },
    );
}

fn print_output(output: &UploadFilesOutput, folder: Option<&str>) {
    if output.dry_run() && output.folder().is_none() {
        if let Some(folder) = folder {
            println!("folder {folder} does not exist and would be created");
        }
    }

    for report in output.reports() {
        if output.dry_run() {
            print_check(report);
        } else {
            println!(
                "{} -> {}: {}",
                report.local_path().display(),
                report.remote_name(),
                report.outcome()
            );
        }
    }

    for failed in output.failed_transfers() {
        eprintln!(
            "{}: failed: {}",
            failed.local_path().display(),
            DisplayErrorContext(failed.error())
        );
    }

    println!(
        "{} created, {} updated, {} skipped, {} failed{}",
        output.files_created(),
        output.files_updated(),
        output.files_skipped(),
        output.failed_transfers().len(),
        if output.dry_run() { " (check only)" } else { "" },
    );
}

/// Process exit status: success only when the run started and every file was processed.
fn exit_status(result: &Result<UploadFilesOutput, BoxError>) -> u8 {
    match result {
        Ok(output) if output.failed_transfers().is_empty() => 0,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let folder = args.folder.clone();
    let result = do_upload(args).await;
    match &result {
        Ok(output) => print_output(output, folder.as_deref()),
        Err(err) => eprintln!("upload failed: {}", DisplayErrorContext(err.as_ref())),
    }

    ExitCode::from(exit_status(&result))
}
