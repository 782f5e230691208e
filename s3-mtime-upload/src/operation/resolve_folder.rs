/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::Error;
use crate::remote::{Container, RemoteStore, ROOT_FOLDER};

/// Find the folder named `folder`, creating it when it does not exist yet.
///
/// No name (or [`ROOT_FOLDER`]) refers to the root container, which is never looked up or
/// created. In check mode a missing folder is not created and `Ok(None)` is returned.
#[tracing::instrument(skip_all, level = "debug", name = "resolve-folder", fields(folder = folder.unwrap_or(ROOT_FOLDER)))]
pub(crate) async fn resolve_folder(
    store: &dyn RemoteStore,
    folder: Option<&str>,
    check: bool,
) -> Result<Option<Container>, Error> {
    let name = match folder {
        None => return Ok(Some(Container::root())),
        Some(name) if name == ROOT_FOLDER => return Ok(Some(Container::root())),
        Some(name) => name,
    };

    if let Some(container) = store.find_container(name).await? {
        tracing::debug!("using existing folder {name} ({})", container.id());
        return Ok(Some(container));
    }

    if check {
        tracing::info!("folder {name} does not exist and would be created");
        return Ok(None);
    }

    store.create_container(name).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::resolve_folder;
    use crate::error::ErrorKind;
    use crate::remote::s3::mock_responses::{error_response, not_found};
    use crate::remote::{Container, S3Store};
    use aws_sdk_s3::operation::head_object::HeadObjectOutput;
    use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use aws_smithy_runtime_api::client::orchestrator::HttpResponse;

    fn denied() -> HttpResponse {
        error_response(403, None)
    }

    #[tokio::test]
    async fn test_root_is_never_looked_up() {
        // any request would fail
        let head = mock!(aws_sdk_s3::Client::head_object).then_http_response(denied);
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head]);
        let store = S3Store::new(client, "test-bucket");

        assert_eq!(
            Some(Container::root()),
            resolve_folder(&store, None, false).await.unwrap()
        );
        assert_eq!(
            Some(Container::root()),
            resolve_folder(&store, Some("root"), false).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_existing_folder_is_reused() {
        let head = mock!(aws_sdk_s3::Client::head_object)
            .match_requests(|r| r.key() == Some("photos/"))
            .then_output(|| HeadObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head]);
        let store = S3Store::new(client, "test-bucket");

        let folder = resolve_folder(&store, Some("photos"), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!("photos/", folder.id());
    }

    #[tokio::test]
    async fn test_missing_folder_is_created() {
        let head = mock!(aws_sdk_s3::Client::head_object)
            .then_http_response(not_found);
        let list = mock!(aws_sdk_s3::Client::list_objects_v2)
            .then_output(|| ListObjectsV2Output::builder().build());
        let put = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| r.key() == Some("photos/"))
            .then_output(|| PutObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head, &list, &put]);
        let store = S3Store::new(client, "test-bucket");

        let folder = resolve_folder(&store, Some("photos"), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Container::new("photos/", "photos"), folder);
    }

    #[tokio::test]
    async fn test_missing_folder_in_check_mode() {
        let head = mock!(aws_sdk_s3::Client::head_object)
            .then_http_response(not_found);
        let list = mock!(aws_sdk_s3::Client::list_objects_v2)
            .then_output(|| ListObjectsV2Output::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head, &list]);
        let store = S3Store::new(client, "test-bucket");

        assert!(resolve_folder(&store, Some("photos"), true)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_lookup_error_is_propagated() {
        let head = mock!(aws_sdk_s3::Client::head_object).then_http_response(denied);
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&head]);
        let store = S3Store::new(client, "test-bucket");

        let err = resolve_folder(&store, Some("photos"), false)
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::RemoteLookupError, err.kind());
    }
}
