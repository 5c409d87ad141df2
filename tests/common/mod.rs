//! LocalStack fixture for tests against a real S3 implementation
//!
//! Each test owns its own [`LocalStack`]: acquiring it starts a container via
//! the `docker` CLI and waits for the S3 service to report healthy, dropping
//! it removes the container.

use bucket_probe::storage::{S3Backend, S3Config};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use serde::Deserialize;
use std::process::Command;
use std::time::Duration;

const LOCALSTACK_IMAGE: &str = "localstack/localstack:2.0.2";
const EDGE_PORT: &str = "4566/tcp";
const HEALTH_ATTEMPTS: u32 = 30;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    services: Services,
}

#[derive(Debug, Deserialize)]
struct Services {
    #[serde(default)]
    s3: Option<String>,
}

/// A running LocalStack container, removed on drop
pub struct LocalStack {
    container_id: String,
    host_port: String,
}

impl LocalStack {
    /// Start a container and wait until S3 is available
    pub async fn start() -> Result<Self> {
        bucket_probe::logging::init_tracing("bucket_probe=debug");
        // Only the first fixture in a test binary can install the report hook.
        let _ = color_eyre::install();

        let container_id = docker(&["run", "-d", "-P", LOCALSTACK_IMAGE])
            .wrap_err("error starting localstack")?;
        // From here on the container is cleaned up by Drop even if startup fails.
        let mut fixture = Self {
            container_id,
            host_port: String::new(),
        };

        let mapping = docker(&["port", &fixture.container_id, EDGE_PORT])?;
        let port = mapping
            .lines()
            .next()
            .and_then(|line| line.rsplit(':').next())
            .ok_or_else(|| eyre!("no host port published for {}", EDGE_PORT))?;
        fixture.host_port = format!("localhost:{}", port.trim());

        fixture
            .wait_for_s3()
            .await
            .wrap_err("could not connect to localstack")?;
        Ok(fixture)
    }

    /// `host:port` of the S3 edge endpoint
    pub fn host_port(&self) -> &str {
        &self.host_port
    }

    /// S3 backend pointed at this container
    pub async fn backend(&self) -> Result<S3Backend> {
        Ok(S3Backend::connect(&S3Config::emulator(&self.host_port)).await?)
    }

    async fn wait_for_s3(&self) -> Result<()> {
        let url = format!("http://{}/_localstack/health", self.host_port);
        let mut delay = Duration::from_millis(250);
        let mut last_error = eyre!("S3 not available");

        for _ in 0..HEALTH_ATTEMPTS {
            match check_health(&url).await {
                Ok(()) => return Ok(()),
                Err(e) => last_error = e,
            }
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(Duration::from_secs(2));
        }

        Err(last_error)
    }
}

impl Drop for LocalStack {
    // Drop cannot await, so removal blocks the worker thread for the `docker rm` call.
    fn drop(&mut self) {
        if let Err(e) = docker(&["rm", "-f", "-v", &self.container_id]) {
            tracing::warn!(container = %self.container_id, error = %e, "could not purge localstack");
        }
    }
}

async fn check_health(url: &str) -> Result<()> {
    let response: HealthResponse = reqwest::get(url).await?.json().await?;
    match response.services.s3.as_deref() {
        Some("available") | Some("running") => Ok(()),
        other => bail!("S3 not available: {:?}", other),
    }
}

fn docker(args: &[&str]) -> Result<String> {
    let output = Command::new("docker")
        .args(args)
        .output()
        .wrap_err("failed to run docker")?;
    if !output.status.success() {
        bail!(
            "docker {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
