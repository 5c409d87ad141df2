//! Storage module
//!
//! A narrow client over object-storage backends:
//! - [`ObjectBackend`] - the capability a backend provides (create container,
//!   put object, metadata-only probe)
//! - [`ObjectStoreClient`] - validation, cancellation and error context on top
//!   of a backend
//! - [`Existence`] - classification of probe outcomes into present, absent or
//!   indeterminate
//! - [`MemoryBackend`] - in-process backend with S3 status semantics
//! - [`S3Backend`] - AWS SDK backend (requires the `s3` feature)
//!
//! # Examples
//!
//! ```rust
//! use bucket_probe::storage::{MemoryBackend, ObjectStoreClient};
//! use bytes::Bytes;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MemoryBackend::new();
//! let client = ObjectStoreClient::new(&backend);
//! let cancel = CancellationToken::new();
//!
//! client.ensure_container(&cancel, "test").await?;
//! client.put_object(&cancel, "test", "foo.bar", Bytes::from("hello world")).await?;
//!
//! assert!(client.object_exists(&cancel, "test", "foo.bar").await?);
//! assert!(!client.object_exists(&cancel, "test", "missing.txt").await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## S3 Storage (requires `s3` feature)
//!
//! ```rust,no_run
//! use bucket_probe::storage::{ObjectStoreClient, S3Backend, S3Config};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = S3Backend::connect(&S3Config::emulator("localhost:4566")).await?;
//! let client = ObjectStoreClient::new(&backend);
//!
//! let found = client
//!     .object_exists(&CancellationToken::new(), "test", "foo.bar")
//!     .await?;
//! println!("found: {}", found);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod memory_adapter;
pub mod probe;
pub mod storage_api;

#[cfg(feature = "s3")]
pub mod storage_s3;

pub use adapter::{ObjectBackend, ObjectMetadata};
pub use memory_adapter::MemoryBackend;
pub use probe::Existence;
pub use storage_api::ObjectStoreClient;

#[cfg(feature = "s3")]
pub use storage_s3::{S3Backend, S3Config};
