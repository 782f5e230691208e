/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, UNIX_EPOCH};
use std::{fs, io::Write};

use async_trait::async_trait;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::http::StatusCode;
use aws_smithy_types::body::SdkBody;
use s3_mtime_upload::error::{Error, ErrorKind};
use s3_mtime_upload::policy::RemoteObjectRef;
use s3_mtime_upload::remote::{Container, ObjectUpload, RemoteStore};
use tempfile::{tempdir, TempDir};
use tokio::sync::{Notify, Semaphore};

/// Set the last-modified time of the file at `path` to `secs` seconds after the epoch.
pub fn set_modified(path: &Path, secs: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

/// Create a temporary directory containing `files`, each given as
/// `(relative path, contents, last-modified epoch seconds)`.
pub fn create_test_dir(files: &[(&str, &str, u64)]) -> TempDir {
    let temp_dir = tempdir().unwrap();

    for (path, contents, modified) in files {
        let full_path = temp_dir.path().join(path);
        let parent = full_path.parent().unwrap();

        // Create the parent directories if they don't exist
        fs::create_dir_all(parent).unwrap();

        let mut file = fs::File::create(&full_path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        drop(file);
        set_modified(&full_path, *modified);
    }

    temp_dir
}

/// S3 error response with `status` and, unless it answers a HEAD request, an XML body
/// carrying the error `code`.
pub fn s3_error_response(status: u16, code: Option<&str>) -> HttpResponse {
    let body = match code {
        Some(code) => SdkBody::from(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Error><Code>{code}</Code><Message>{code}</Message></Error>"
        )),
        None => SdkBody::empty(),
    };
    HttpResponse::new(StatusCode::try_from(status).unwrap(), body)
}

/// An object held by [`InMemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub modified: Option<i64>,
    pub content_type: Option<String>,
    pub e_tag: String,
}

#[derive(Debug, Default)]
struct Inner {
    containers: HashSet<String>,
    objects: HashMap<String, StoredObject>,
    failing_lookups: HashSet<String>,
    containers_created: usize,
    creates: usize,
    updates: usize,
    lookups: usize,
    versions: u64,
}

impl Inner {
    fn next_e_tag(&mut self) -> String {
        self.versions += 1;
        format!("\"v{}\"", self.versions)
    }
}

/// Holds lookups of one object name until the test lets them through.
#[derive(Debug)]
pub struct LookupGate {
    name: String,
    entered: Notify,
    permits: Semaphore,
}

impl LookupGate {
    /// Wait until a lookup of the gated name has started
    pub async fn entered(&self) {
        self.entered.notified().await
    }

    /// Let one waiting lookup continue
    pub fn release(&self) {
        self.permits.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.permits.acquire().await.unwrap().forget();
    }
}

/// A [`RemoteStore`] keeping everything in memory. Clones share the same state.
///
/// Containers are key prefixes ending in `/` like the S3 store, so an object `a.txt` in the
/// folder `photos` lives under the key `photos/a.txt`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
    gate: Option<Arc<LookupGate>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing folder
    pub fn with_container(self, name: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .containers
            .insert(name.to_owned());
        self
    }

    /// Add an existing object at `key` with an optional `modified` property
    pub fn with_object(self, key: &str, body: &str, modified: Option<i64>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let e_tag = inner.next_e_tag();
            inner.objects.insert(
                key.to_owned(),
                StoredObject {
                    body: body.as_bytes().to_vec(),
                    modified,
                    content_type: None,
                    e_tag,
                },
            );
        }
        self
    }

    /// Make every lookup of the object named `name` fail
    pub fn with_failing_lookup(self, name: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .failing_lookups
            .insert(name.to_owned());
        self
    }

    /// Make lookups of the object named `name` wait on the returned gate
    pub fn with_gated_lookup(mut self, name: &str) -> (Self, Arc<LookupGate>) {
        let gate = Arc::new(LookupGate {
            name: name.to_owned(),
            entered: Notify::new(),
            permits: Semaphore::new(0),
        });
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.inner.lock().unwrap().objects.get(key).cloned()
    }

    pub fn has_container(&self, name: &str) -> bool {
        self.inner.lock().unwrap().containers.contains(name)
    }

    pub fn containers_created(&self) -> usize {
        self.inner.lock().unwrap().containers_created
    }

    pub fn creates(&self) -> usize {
        self.inner.lock().unwrap().creates
    }

    pub fn updates(&self) -> usize {
        self.inner.lock().unwrap().updates
    }

    pub fn writes(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.creates + inner.updates + inner.containers_created
    }

    pub fn lookups(&self) -> usize {
        self.inner.lock().unwrap().lookups
    }
}

fn container_for(name: &str) -> Container {
    Container::new(format!("{name}/"), name)
}

async fn read_body(upload: &ObjectUpload) -> Result<Vec<u8>, Error> {
    tokio::fs::read(upload.source())
        .await
        .map_err(|err| Error::new(ErrorKind::IOError, err))
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn find_container(&self, name: &str) -> Result<Option<Container>, Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.containers.contains(name).then(|| container_for(name)))
    }

    async fn create_container(&self, name: &str) -> Result<Container, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.containers.insert(name.to_owned());
        inner.containers_created += 1;
        Ok(container_for(name))
    }

    async fn find_object(
        &self,
        container: &Container,
        name: &str,
    ) -> Result<Option<RemoteObjectRef>, Error> {
        if let Some(gate) = self.gate.as_ref().filter(|gate| gate.name == name) {
            gate.pass().await;
        }

        let mut inner = self.inner.lock().unwrap();
        inner.lookups += 1;
        if inner.failing_lookups.contains(name) {
            return Err(Error::new(
                ErrorKind::RemoteLookupError,
                format!("lookup of {name} failed"),
            ));
        }

        let key = format!("{}{name}", container.id());
        Ok(inner.objects.get(&key).map(|object| {
            RemoteObjectRef::new(key.clone(), name)
                .remote_modified_at(object.modified)
                .e_tag(Some(object.e_tag.clone()))
        }))
    }

    async fn create_object(
        &self,
        container: &Container,
        upload: ObjectUpload,
    ) -> Result<(), Error> {
        let body = read_body(&upload).await?;
        let key = format!("{}{}", container.id(), upload.name());

        let mut inner = self.inner.lock().unwrap();
        if inner.objects.contains_key(&key) {
            return Err(Error::new(
                ErrorKind::RemoteWriteError,
                format!("{key} already exists"),
            ));
        }
        let e_tag = inner.next_e_tag();
        inner.objects.insert(
            key,
            StoredObject {
                body,
                modified: Some(upload.modified_at()),
                content_type: upload.get_content_type().map(str::to_owned),
                e_tag,
            },
        );
        inner.creates += 1;
        Ok(())
    }

    async fn update_object(
        &self,
        existing: &RemoteObjectRef,
        upload: ObjectUpload,
    ) -> Result<(), Error> {
        let body = read_body(&upload).await?;

        let mut inner = self.inner.lock().unwrap();
        let current = inner.objects.get(existing.id()).map(|o| o.e_tag.clone());
        if current.as_deref() != existing.get_e_tag() {
            return Err(Error::new(
                ErrorKind::RemoteWriteError,
                format!("{} changed since it was looked up", existing.id()),
            ));
        }
        let e_tag = inner.next_e_tag();
        inner.objects.insert(
            existing.id().to_owned(),
            StoredObject {
                body,
                modified: Some(upload.modified_at()),
                content_type: upload.get_content_type().map(str::to_owned),
                e_tag,
            },
        );
        inner.updates += 1;
        Ok(())
    }
}
