//! Memory storage backend

use crate::error::BackendError;
use crate::storage::adapter::{ObjectBackend, ObjectMetadata};
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct State {
    containers: HashMap<String, HashMap<String, StoredObject>>,
    denied: HashSet<String>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    last_modified: chrono::DateTime<chrono::Utc>,
}

/// In-memory object backend answering with S3 status codes.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<State>>,
    calls: Arc<AtomicUsize>,
}

impl MemoryBackend {
    /// Create a new, empty memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request against `container` with 403
    pub fn deny_access(&self, container: &str) -> Result<(), BackendError> {
        self.write()?.denied.insert(container.to_string());
        Ok(())
    }

    /// Number of backend calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, BackendError> {
        self.state
            .read()
            .map_err(|_| BackendError::transport("memory backend lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, BackendError> {
        self.state
            .write()
            .map_err(|_| BackendError::transport("memory backend lock poisoned"))
    }

    fn check_access(state: &State, container: &str) -> Result<(), BackendError> {
        if state.denied.contains(container) {
            return Err(BackendError::forbidden(format!(
                "AccessDenied: access to '{}' is denied",
                container
            )));
        }
        Ok(())
    }
}

impl ObjectBackend for MemoryBackend {
    async fn create_container(&self, container: &str) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.write()?;
        Self::check_access(&state, container)?;
        state.containers.entry(container.to_string()).or_default();
        Ok(())
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        content: Bytes,
    ) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.write()?;
        Self::check_access(&state, container)?;
        let objects = state.containers.get_mut(container).ok_or_else(|| {
            BackendError::not_found(format!("NoSuchBucket: '{}' does not exist", container))
        })?;
        objects.insert(
            key.to_string(),
            StoredObject {
                content,
                last_modified: chrono::Utc::now(),
            },
        );
        Ok(())
    }

    async fn head_object(
        &self,
        container: &str,
        key: &str,
    ) -> Result<ObjectMetadata, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.read()?;
        Self::check_access(&state, container)?;
        let object = state
            .containers
            .get(container)
            .and_then(|objects| objects.get(key))
            .ok_or_else(|| BackendError::not_found("NotFound"))?;
        Ok(ObjectMetadata {
            content_length: object.content.len() as u64,
            content_type: None,
            etag: None,
            last_modified: Some(object.last_modified),
        })
    }
}
