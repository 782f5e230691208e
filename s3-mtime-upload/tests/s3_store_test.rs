/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::operation::put_object::PutObjectOutput;
use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use s3_mtime_upload::types::FailedTransferPolicy;
use s3_mtime_upload::{error::ErrorKind, policy::Outcome, Client, Config};
use test_common::{create_test_dir, s3_error_response};

const BUCKET: &str = "test-bucket";

fn client_for(s3_client: aws_sdk_s3::Client) -> Client {
    let config = Config::builder()
        .client(s3_client)
        .bucket(BUCKET)
        .build()
        .unwrap();
    Client::new(config)
}

fn head_not_found() -> HttpResponse {
    s3_error_response(404, None)
}

fn access_denied() -> HttpResponse {
    s3_error_response(403, Some("AccessDenied"))
}

fn modified_metadata(r: &aws_sdk_s3::operation::put_object::PutObjectInput) -> Option<&str> {
    r.metadata()
        .and_then(|m| m.get("modified"))
        .map(String::as_str)
}

#[tokio::test]
async fn test_upload_into_new_folder() {
    let dir = create_test_dir(&[("a.txt", "hello", 100)]);

    let head = mock!(aws_sdk_s3::Client::head_object)
        .then_http_response(head_not_found);
    let list = mock!(aws_sdk_s3::Client::list_objects_v2)
        .then_output(|| ListObjectsV2Output::builder().build());
    let put_marker = mock!(aws_sdk_s3::Client::put_object)
        .match_requests(|r| r.bucket() == Some(BUCKET) && r.key() == Some("photos/"))
        .then_output(|| PutObjectOutput::builder().build());
    let put_file = mock!(aws_sdk_s3::Client::put_object)
        .match_requests(|r| {
            r.key() == Some("photos/a.txt")
                && r.if_none_match() == Some("*")
                && modified_metadata(r) == Some("100")
        })
        .then_output(|| PutObjectOutput::builder().build());
    let s3_client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&head, &list, &put_marker, &put_file]
    );

    let output = client_for(s3_client)
        .upload_files()
        .file("a.txt")
        .home_dir(dir.path())
        .folder("photos")
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap();

    assert!(output.failed_transfers().is_empty());
    assert_eq!(Outcome::Created, output.reports()[0].outcome());
    assert!(output.reports()[0].applied());
    assert_eq!("photos/", output.folder().unwrap().id());
}

#[tokio::test]
async fn test_update_uses_observed_etag() {
    let dir = create_test_dir(&[("a.txt", "hello", 100)]);

    let head = mock!(aws_sdk_s3::Client::head_object)
        .match_requests(|r| r.key() == Some("a.txt"))
        .then_output(|| {
            HeadObjectOutput::builder()
                .metadata("modified", "50")
                .e_tag("\"etag-1\"")
                .build()
        });
    let put = mock!(aws_sdk_s3::Client::put_object)
        .match_requests(|r| {
            r.key() == Some("a.txt")
                && r.if_match() == Some("\"etag-1\"")
                && modified_metadata(r) == Some("100")
        })
        .then_output(|| PutObjectOutput::builder().build());
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head, &put]);

    let output = client_for(s3_client)
        .upload_files()
        .file("a.txt")
        .home_dir(dir.path())
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap();

    assert!(output.failed_transfers().is_empty());
    assert_eq!(Outcome::Updated, output.reports()[0].outcome());
    assert_eq!(Some(50), output.reports()[0].remote_modified_at());
}

#[tokio::test]
async fn test_newer_remote_object_is_not_written() {
    let dir = create_test_dir(&[("a.txt", "hello", 100)]);

    let head = mock!(aws_sdk_s3::Client::head_object).then_output(|| {
        HeadObjectOutput::builder()
            .metadata("modified", "150")
            .e_tag("\"etag-1\"")
            .build()
    });
    // any write would fail the file
    let put = mock!(aws_sdk_s3::Client::put_object).then_http_response(access_denied);
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head, &put]);

    let output = client_for(s3_client)
        .upload_files()
        .file("a.txt")
        .home_dir(dir.path())
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap();

    assert!(output.failed_transfers().is_empty());
    assert_eq!(Outcome::SkippedNewer, output.reports()[0].outcome());
    assert!(!output.reports()[0].applied());
}

#[tokio::test]
async fn test_write_failure_is_reported() {
    let dir = create_test_dir(&[("a.txt", "hello", 100)]);

    let head = mock!(aws_sdk_s3::Client::head_object)
        .then_http_response(head_not_found);
    let put = mock!(aws_sdk_s3::Client::put_object).then_http_response(access_denied);
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head, &put]);

    let output = client_for(s3_client)
        .upload_files()
        .file("a.txt")
        .home_dir(dir.path())
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap();

    assert!(output.reports().is_empty());
    let failed = &output.failed_transfers()[0];
    assert_eq!(&ErrorKind::RemoteWriteError, failed.error().kind());
    assert_eq!(Some("a.txt"), failed.remote_name());
}

#[tokio::test]
async fn test_abort_error_names_the_failed_file() {
    let dir = create_test_dir(&[("a.txt", "hello", 100)]);

    let head =
        mock!(aws_sdk_s3::Client::head_object).then_http_response(|| s3_error_response(403, None));
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head]);

    let err = client_for(s3_client)
        .upload_files()
        .file("a.txt")
        .home_dir(dir.path())
        .failure_policy(FailedTransferPolicy::Abort)
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::RemoteLookupError, err.kind());
    assert_eq!(Some("a.txt"), err.file());
    let message = format!("{}", DisplayErrorContext(&err));
    assert!(message.contains("a.txt"), "{message}");
}
