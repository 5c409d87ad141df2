//! # bucket-probe
//!
//! A minimal object-storage client facade for S3-compatible backends: create a
//! bucket, upload an object, and check whether an object exists with a
//! metadata-only request.
//!
//! The existence check tells "not found" apart from every other failure. A
//! forbidden response is an error, never "the object does not exist".
//!
//! ## Optional Features
//!
//! - `s3` (default): AWS S3 backend built on `aws-sdk-s3`
//!
//! ## Example
//!
//! ```rust
//! use bucket_probe::prelude::*;
//! use bytes::Bytes;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> bucket_probe::Result<()> {
//! let backend = MemoryBackend::new();
//! let client = ObjectStoreClient::new(&backend);
//! let cancel = CancellationToken::new();
//!
//! client.ensure_container(&cancel, "test").await?;
//! client.put_object(&cancel, "test", "foo.bar", Bytes::from("hello world")).await?;
//! assert!(client.object_exists(&cancel, "test", "foo.bar").await?);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

pub mod error;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::error::{BackendError, Error, Result, StatusClass, StorageError, StorageResult};
    pub use crate::storage::{Existence, MemoryBackend, ObjectBackend, ObjectMetadata, ObjectStoreClient};

    #[cfg(feature = "s3")]
    pub use crate::storage::{S3Backend, S3Config};
}

/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
