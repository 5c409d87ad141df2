//! AWS S3 storage backend implementation
//!
//! Connects an [`ObjectBackend`] to any S3-compatible endpoint through the AWS
//! SDK. Failures are reported with the HTTP status of the raw response rather
//! than the SDK's modelled error, so a 403 on `HeadObject` stays a 403.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    config::http::HttpResponse,
    error::{DisplayErrorContext, SdkError},
    primitives::ByteStream,
    Client as S3Client,
};

use crate::error::{BackendError, Error, Result};
use crate::storage::adapter::{ObjectBackend, ObjectMetadata};
use bytes::Bytes;
use tracing::debug;

/// Region used by the emulator configuration
pub const EMULATOR_REGION: &str = "us-east-1";

/// S3 storage configuration
///
/// Fields left as `None` fall back to the SDK's default provider chain
/// (environment, shared profile, instance metadata).
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    /// AWS region
    pub region: Option<String>,
    /// S3 endpoint URL (for S3-compatible services)
    pub endpoint_url: Option<String>,
    /// AWS access key ID (optional, can use IAM roles)
    pub access_key_id: Option<String>,
    /// AWS secret access key (optional, can use IAM roles)
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// Enable path-style addressing (`http://host/BUCKET/key`)
    pub path_style: bool,
}

impl S3Config {
    /// Configuration for a local emulator listening on `host_port`.
    ///
    /// Uses static test credentials and path-style addressing, so no per-bucket
    /// DNS entries are needed.
    pub fn emulator(host_port: &str) -> Self {
        Self {
            region: Some(EMULATOR_REGION.to_string()),
            endpoint_url: Some(format!("http://{}", host_port)),
            access_key_id: Some("AKID".to_string()),
            secret_access_key: Some("SECRET_KEY".to_string()),
            session_token: Some("TOKEN".to_string()),
            path_style: true,
        }
    }

    /// Check the configuration for contradictions
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.region, Some(region) if region.is_empty()) {
            return Err(Error::Configuration {
                message: "region cannot be empty".to_string(),
            });
        }

        if matches!(&self.endpoint_url, Some(endpoint) if endpoint.is_empty()) {
            return Err(Error::Configuration {
                message: "endpoint URL cannot be empty".to_string(),
            });
        }

        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(Error::Configuration {
                message: "access key ID and secret access key must be set together".to_string(),
            });
        }

        Ok(())
    }
}

/// S3 storage backend
#[derive(Debug, Clone)]
pub struct S3Backend {
    client: S3Client,
}

impl S3Backend {
    /// Build an S3 client from `config`
    pub async fn connect(config: &S3Config) -> Result<Self> {
        config.validate()?;

        let sdk_config = Self::build_aws_config(config).await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        debug!(
            endpoint = ?config.endpoint_url,
            path_style = config.path_style,
            "connected S3 backend"
        );

        Ok(Self::from_client(S3Client::from_conf(s3_config)))
    }

    /// Wrap an already configured client
    pub fn from_client(client: S3Client) -> Self {
        Self { client }
    }

    /// The underlying SDK client
    pub fn client(&self) -> &S3Client {
        &self.client
    }

    /// Build AWS configuration
    async fn build_aws_config(config: &S3Config) -> aws_config::SdkConfig {
        let mut builder = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            builder = builder.region(Region::new(region.clone()));
        }

        // Set credentials if provided
        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            builder = builder.credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key,
                secret_key,
                config.session_token.clone(),
                None,
                "bucket-probe",
            ));
        }

        // Set custom endpoint if provided
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        builder.load().await
    }
}

/// Convert an SDK failure, keeping the raw HTTP status when a response arrived
fn backend_error<E>(err: SdkError<E, HttpResponse>) -> BackendError
where
    E: std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match err.raw_response() {
        Some(response) => BackendError::with_status(response.status().as_u16(), message),
        None => BackendError::transport(message),
    }
}

impl ObjectBackend for S3Backend {
    async fn create_container(&self, container: &str) -> std::result::Result<(), BackendError> {
        self.client
            .create_bucket()
            .bucket(container)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        content: Bytes,
    ) -> std::result::Result<(), BackendError> {
        self.client
            .put_object()
            .bucket(container)
            .key(key)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn head_object(
        &self,
        container: &str,
        key: &str,
    ) -> std::result::Result<ObjectMetadata, BackendError> {
        let output = self
            .client
            .head_object()
            .bucket(container)
            .key(key)
            .send()
            .await
            .map_err(backend_error)?;

        Ok(ObjectMetadata {
            content_length: output.content_length.unwrap_or(0).max(0) as u64,
            content_type: output.content_type,
            etag: output.e_tag,
            last_modified: output
                .last_modified
                .and_then(|dt| chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
        })
    }
}
