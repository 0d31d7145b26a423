use crate::upstream::{AuthUpstream, HttpAuthUpstream};
use anyhow::{Context, Result};
use media_pipeline::AudioUploader;
use presence_registry::{RegistryClient, RegistryConfig};
use session_core::PasswordHasher;
use std::env;
use std::sync::Arc;
use url::Url;

/// Main portal server state, cloned into every handler.
#[derive(Clone)]
pub struct PortalServer {
    pub config: ServerConfig,
    /// External auth/data service client
    pub upstream: Arc<dyn AuthUpstream>,
    /// Doctor presence registry client
    pub registry: Arc<RegistryClient>,
    /// Recording forwarder to the ingestion endpoint
    pub uploader: Arc<AudioUploader>,
    /// Legacy-compatible password hasher
    pub hasher: Arc<PasswordHasher>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    /// External auth/data service base URL
    pub base_url: String,
    /// Recording ingestion endpoint
    pub ingest_url: Url,
    /// Set Secure on the token cookie
    pub secure_cookies: bool,
}

impl ServerConfig {
    /// Read configuration from the environment. `BASE_URL` is required;
    /// everything else has a development default.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("BASE_URL").context("BASE_URL is not set")?;
        let ingest_url = env::var("INGEST_URL")
            .unwrap_or_else(|_| format!("{}/send/data/upload-audio", base_url.trim_end_matches('/')));
        let ingest_url = Url::parse(&ingest_url).context("INGEST_URL is not a valid URL")?;
        let secure_cookies = env::var("NODE_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Ok(Self {
            name: "HealthDesk Portal Engine".to_string(),
            base_url,
            ingest_url,
            secure_cookies,
        })
    }
}

impl PortalServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let upstream = Arc::new(HttpAuthUpstream::new(config.base_url.clone()));
        let registry = Arc::new(RegistryClient::new(RegistryConfig::new(
            config.base_url.clone(),
        ))?);
        let uploader = Arc::new(AudioUploader::new(config.ingest_url.clone()));
        let hasher = Arc::new(PasswordHasher::from_env());

        Ok(Self {
            config,
            upstream,
            registry,
            uploader,
            hasher,
        })
    }

    /// Build a server with injected collaborators, used by the HTTP tests.
    pub fn with_parts(
        config: ServerConfig,
        upstream: Arc<dyn AuthUpstream>,
        registry: Arc<RegistryClient>,
        uploader: Arc<AudioUploader>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            config,
            upstream,
            registry,
            uploader,
            hasher,
        }
    }
}
