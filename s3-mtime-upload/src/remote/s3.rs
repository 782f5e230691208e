/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::operation::put_object::builders::PutObjectFluentBuilder;
use aws_sdk_s3::primitives::ByteStream;

use super::{parse_modified, Container, ObjectUpload, RemoteStore, MODIFIED_PROPERTY};
use crate::error::{self, Error, ErrorKind};
use crate::policy::RemoteObjectRef;

/// Content type of the zero-byte objects marking a folder.
const FOLDER_CONTENT_TYPE: &str = "application/x-directory";

const DELIMITER: &str = "/";

/// [`RemoteStore`] backed by a single Amazon S3 bucket.
///
/// Folders are key prefixes ending in `/`. A folder exists when its zero-byte marker object
/// exists or when any key starts with its prefix. The `modified` property is stored as user
/// metadata (`x-amz-meta-modified`).
///
/// Writes are conditional: creating an object requires that the key is still free
/// (`If-None-Match: *`) and updating one requires that its ETag did not change since it was
/// looked up (`If-Match`).
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Create a store for `bucket` that sends requests through `client`.
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// The Amazon S3 client instance used to send requests.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }

    /// The bucket objects are written to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_request(
        &self,
        key: String,
        upload: ObjectUpload,
    ) -> Result<PutObjectFluentBuilder, Error> {
        let body = ByteStream::from_path(&upload.source)
            .await
            .map_err(|err| Error::new(ErrorKind::IOError, err))?;

        Ok(self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .metadata(MODIFIED_PROPERTY, upload.modified_at.to_string())
            .set_content_type(upload.content_type))
    }
}

fn folder_prefix(name: &str) -> Result<String, Error> {
    let trimmed = name.trim_matches('/');
    if trimmed.is_empty() {
        return Err(error::invalid_input(format!(
            "`{name}` is not a valid folder name"
        )));
    }
    Ok(format!("{trimmed}{DELIMITER}"))
}

fn is_not_found<R>(err: &aws_sdk_s3::error::SdkError<HeadObjectError, R>) -> bool {
    err.as_service_error()
        .map(HeadObjectError::is_not_found)
        .unwrap_or_default()
}

fn conditional_write_failed<E>(key: &str, err: E) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err.code() {
        Some("PreconditionFailed") => error::write_failed(format!(
            "`{key}` was modified by another writer since it was looked up"
        )),
        _ => error::write_failed(err),
    }
}

#[async_trait]
impl RemoteStore for S3Store {
    async fn find_container(&self, name: &str) -> Result<Option<Container>, Error> {
        let prefix = folder_prefix(name)?;

        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&prefix)
            .send()
            .await
        {
            Ok(_) => return Ok(Some(Container::new(prefix, name))),
            Err(err) if is_not_found(&err) => {}
            Err(err) => return Err(error::lookup_failed(err)),
        }

        // folders created by other tools often exist only through the keys below them
        let listing = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&prefix)
            .max_keys(1)
            .send()
            .await
            .map_err(error::lookup_failed)?;

        if listing.contents().is_empty() {
            Ok(None)
        } else {
            Ok(Some(Container::new(prefix, name)))
        }
    }

    async fn create_container(&self, name: &str) -> Result<Container, Error> {
        let prefix = folder_prefix(name)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&prefix)
            .content_type(FOLDER_CONTENT_TYPE)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map_err(error::write_failed)?;

        tracing::info!("created folder {name} (key {prefix})");
        Ok(Container::new(prefix, name))
    }

    async fn find_object(
        &self,
        container: &Container,
        name: &str,
    ) -> Result<Option<RemoteObjectRef>, Error> {
        let key = format!("{}{name}", container.id());

        let output = match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if is_not_found(&err) => return Ok(None),
            Err(err) => return Err(error::lookup_failed(err)),
        };

        let modified = output
            .metadata()
            .and_then(|metadata| metadata.get(MODIFIED_PROPERTY))
            .map(String::as_str);

        Ok(Some(
            RemoteObjectRef::new(key, name)
                .remote_modified_at(parse_modified(modified))
                .e_tag(output.e_tag().map(str::to_owned)),
        ))
    }

    async fn create_object(
        &self,
        container: &Container,
        upload: ObjectUpload,
    ) -> Result<(), Error> {
        let key = format!("{}{}", container.id(), upload.name);
        self.put_request(key.clone(), upload)
            .await?
            .if_none_match("*")
            .send()
            .await
            .map_err(|err| conditional_write_failed(&key, err))?;
        Ok(())
    }

    async fn update_object(
        &self,
        existing: &RemoteObjectRef,
        upload: ObjectUpload,
    ) -> Result<(), Error> {
        let key = existing.id().to_owned();
        self.put_request(key.clone(), upload)
            .await?
            .set_if_match(existing.e_tag.clone())
            .send()
            .await
            .map_err(|err| conditional_write_failed(&key, err))?;
        Ok(())
    }
}
