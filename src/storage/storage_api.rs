//! Object-store client adapter
//!
//! [`ObjectStoreClient`] puts a small, intention-revealing surface over any
//! [`ObjectBackend`]: make sure a container exists, upload an object, and ask
//! whether an object exists. Every call takes a [`CancellationToken`]; timeouts
//! are imposed by the caller through that token.

use crate::error::{BackendError, StorageError, StorageResult};
use crate::storage::adapter::{ObjectBackend, ObjectMetadata};
use crate::storage::probe::Existence;
use bytes::Bytes;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Client facade over an object-storage backend.
///
/// Holds nothing but the backend handle, so it can be reused for any number of
/// calls. Concurrent use is as safe as the backend itself.
#[derive(Debug, Clone)]
pub struct ObjectStoreClient<B> {
    backend: B,
}

impl<B: ObjectBackend> ObjectStoreClient<B> {
    /// Wrap a backend connection. Pass `&backend` to keep ownership with the caller.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask the backend to create `container`.
    ///
    /// Whatever the backend reports for an already existing container is passed
    /// through as-is.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn ensure_container(
        &self,
        cancel: &CancellationToken,
        container: &str,
    ) -> StorageResult<()> {
        utils::validate_container(container)?;

        run(
            cancel,
            "create_bucket",
            container.to_string(),
            self.backend.create_container(container),
        )
        .await?;

        debug!("container ready");
        Ok(())
    }

    /// Upload `content` under `key`, overwriting any existing object.
    #[tracing::instrument(skip(self, cancel, content), fields(len = content.len()))]
    pub async fn put_object(
        &self,
        cancel: &CancellationToken,
        container: &str,
        key: &str,
        content: Bytes,
    ) -> StorageResult<()> {
        utils::validate_container(container)?;
        utils::validate_key(key)?;

        run(
            cancel,
            "put_object",
            utils::resource(container, key),
            self.backend.put_object(container, key, content),
        )
        .await?;

        debug!("object stored");
        Ok(())
    }

    /// Check whether `key` exists in `container` with a metadata-only probe.
    ///
    /// Returns `Ok(false)` only when the backend reports not-found. Forbidden
    /// and every other failure are returned as errors.
    pub async fn object_exists(
        &self,
        cancel: &CancellationToken,
        container: &str,
        key: &str,
    ) -> StorageResult<bool> {
        self.object_metadata(cancel, container, key)
            .await
            .map(|metadata| metadata.is_some())
    }

    /// Metadata of `key` if it exists, `None` if the backend reports not-found.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn object_metadata(
        &self,
        cancel: &CancellationToken,
        container: &str,
        key: &str,
    ) -> StorageResult<Option<ObjectMetadata>> {
        utils::validate_container(container)?;
        utils::validate_key(key)?;

        let resource = utils::resource(container, key);
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(StorageError::Cancelled { operation: "head_object", resource });
            }
            outcome = self.backend.head_object(container, key) => outcome,
        };

        match Existence::classify(outcome) {
            Existence::Present(metadata) => {
                debug!(content_length = metadata.content_length, "object present");
                Ok(Some(metadata))
            }
            Existence::Absent => {
                debug!("object absent");
                Ok(None)
            }
            Existence::Indeterminate(source) => {
                warn!(error = %source, "existence probe failed");
                Err(StorageError::Backend {
                    operation: "head_object",
                    resource,
                    source,
                })
            }
        }
    }
}

/// Race a backend call against the caller's cancellation token, annotating
/// failures with the operation and resource.
async fn run<T, F>(
    cancel: &CancellationToken,
    operation: &'static str,
    resource: String,
    call: F,
) -> StorageResult<T>
where
    F: Future<Output = Result<T, BackendError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StorageError::Cancelled { operation, resource }),
        result = call => result.map_err(|source| StorageError::Backend {
            operation,
            resource,
            source,
        }),
    }
}

/// Utility functions for storage operations
pub mod utils {
    use crate::error::{StorageError, StorageResult};

    /// Validate a container identifier
    pub fn validate_container(container: &str) -> StorageResult<()> {
        if container.is_empty() {
            return Err(StorageError::InvalidInput {
                field: "container",
                reason: "Container identifier cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Validate an object key
    pub fn validate_key(key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::InvalidInput {
                field: "key",
                reason: "Key cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// `container/key` label used in errors and logs
    pub fn resource(container: &str, key: &str) -> String {
        format!("{}/{}", container, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusClass;
    use crate::storage::memory_adapter::MemoryBackend;
    use std::time::Duration;

    /// Backend whose calls never complete
    struct StalledBackend;

    impl ObjectBackend for StalledBackend {
        async fn create_container(&self, _container: &str) -> Result<(), BackendError> {
            std::future::pending().await
        }

        async fn put_object(
            &self,
            _container: &str,
            _key: &str,
            _content: Bytes,
        ) -> Result<(), BackendError> {
            std::future::pending().await
        }

        async fn head_object(
            &self,
            _container: &str,
            _key: &str,
        ) -> Result<ObjectMetadata, BackendError> {
            std::future::pending().await
        }
    }

    /// Backend that rejects re-creation of a container the way most S3 regions do
    #[derive(Default)]
    struct StrictBackend {
        inner: MemoryBackend,
        created: std::sync::Mutex<Vec<String>>,
    }

    impl ObjectBackend for StrictBackend {
        async fn create_container(&self, container: &str) -> Result<(), BackendError> {
            {
                let mut created = self.created.lock().unwrap();
                if created.iter().any(|c| c == container) {
                    return Err(BackendError::with_status(409, "BucketAlreadyOwnedByYou"));
                }
                created.push(container.to_string());
            }
            self.inner.create_container(container).await
        }

        async fn put_object(
            &self,
            container: &str,
            key: &str,
            content: Bytes,
        ) -> Result<(), BackendError> {
            self.inner.put_object(container, key, content).await
        }

        async fn head_object(
            &self,
            container: &str,
            key: &str,
        ) -> Result<ObjectMetadata, BackendError> {
            self.inner.head_object(container, key).await
        }
    }

    #[tokio::test]
    async fn test_put_then_exists() {
        let backend = MemoryBackend::new();
        let client = ObjectStoreClient::new(&backend);
        let cancel = CancellationToken::new();

        client.ensure_container(&cancel, "test").await.unwrap();
        client
            .put_object(&cancel, "test", "foo.bar", Bytes::from("hello world"))
            .await
            .unwrap();

        assert!(client.object_exists(&cancel, "test", "foo.bar").await.unwrap());
        assert!(!client.object_exists(&cancel, "test", "missing.txt").await.unwrap());

        let metadata = client
            .object_metadata(&cancel, "test", "foo.bar")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(metadata.content_length, 11);
    }

    #[tokio::test]
    async fn test_empty_content_is_accepted() {
        let backend = MemoryBackend::new();
        let client = ObjectStoreClient::new(&backend);
        let cancel = CancellationToken::new();

        client.ensure_container(&cancel, "test").await.unwrap();
        client
            .put_object(&cancel, "test", "empty", Bytes::new())
            .await
            .unwrap();
        assert!(client.object_exists(&cancel, "test", "empty").await.unwrap());
    }

    #[tokio::test]
    async fn test_forbidden_probe_is_an_error() {
        let backend = MemoryBackend::new();
        backend.deny_access("locked").unwrap();
        let client = ObjectStoreClient::new(&backend);
        let cancel = CancellationToken::new();

        let err = client
            .object_exists(&cancel, "locked", "secret.txt")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusClass::Forbidden));
    }

    #[tokio::test]
    async fn test_validation_skips_backend() {
        let backend = MemoryBackend::new();
        let client = ObjectStoreClient::new(&backend);
        let cancel = CancellationToken::new();

        assert!(client
            .ensure_container(&cancel, "")
            .await
            .unwrap_err()
            .is_invalid_input());
        assert!(client
            .put_object(&cancel, "test", "", Bytes::from("x"))
            .await
            .unwrap_err()
            .is_invalid_input());
        assert!(client
            .object_exists(&cancel, "", "foo.bar")
            .await
            .unwrap_err()
            .is_invalid_input());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_call() {
        let backend = MemoryBackend::new();
        let client = ObjectStoreClient::new(&backend);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client.object_exists(&cancel, "test", "missing.txt").await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_while_pending() {
        let client = ObjectStoreClient::new(StalledBackend);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = client
            .put_object(&cancel, "test", "foo.bar", Bytes::from("hello world"))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_existing_container_error_passes_through() {
        let backend = StrictBackend::default();
        let client = ObjectStoreClient::new(&backend);
        let cancel = CancellationToken::new();

        client.ensure_container(&cancel, "test").await.unwrap();
        let err = client.ensure_container(&cancel, "test").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusClass::Other(409)));
        assert_eq!(
            err.backend_error().map(|e| e.message()),
            Some("BucketAlreadyOwnedByYou")
        );
    }

    #[test]
    fn test_validate() {
        assert!(utils::validate_container("test").is_ok());
        assert!(utils::validate_container("").is_err());
        assert!(utils::validate_key("foo.bar").is_ok());
        assert!(utils::validate_key("").is_err());
        assert_eq!(utils::resource("test", "foo.bar"), "test/foo.bar");
    }
}
