//! Backend capability interface

use crate::error::BackendError;
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;

/// Metadata returned by a metadata-only probe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Content length in bytes
    pub content_length: u64,
    /// Content type
    pub content_type: Option<String>,
    /// ETag or hash
    pub etag: Option<String>,
    /// Last modified timestamp
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Store operations an object-storage backend must provide.
///
/// Implementations report failures as [`BackendError`], filling in the
/// protocol status code whenever a response was received.
pub trait ObjectBackend: Send + Sync {
    /// Create a container
    fn create_container(
        &self,
        container: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Store `content` under `key`, replacing any existing object
    fn put_object(
        &self,
        container: &str,
        key: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Fetch object metadata without transferring the body
    fn head_object(
        &self,
        container: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectMetadata, BackendError>> + Send;
}

impl<B: ObjectBackend + ?Sized> ObjectBackend for &B {
    fn create_container(
        &self,
        container: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send {
        (**self).create_container(container)
    }

    fn put_object(
        &self,
        container: &str,
        key: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<(), BackendError>> + Send {
        (**self).put_object(container, key, content)
    }

    fn head_object(
        &self,
        container: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectMetadata, BackendError>> + Send {
        (**self).head_object(container, key)
    }
}

impl<B: ObjectBackend + ?Sized> ObjectBackend for Arc<B> {
    fn create_container(
        &self,
        container: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send {
        (**self).create_container(container)
    }

    fn put_object(
        &self,
        container: &str,
        key: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<(), BackendError>> + Send {
        (**self).put_object(container, key, content)
    }

    fn head_object(
        &self,
        container: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectMetadata, BackendError>> + Send {
        (**self).head_object(container, key)
    }
}
