use crate::error::{RegistryError, RegistryResult};
use crate::sentinel::{Availability, SENTINEL_OK, SENTINEL_UPDATE_FAILED};
use std::time::Duration;
use tracing::{debug, warn};

/// Registry endpoints relative to the HealthDesk backend base URL.
const SET_PATH: &str = "/send/data/set-doctor-availability";
const UPDATE_PATH: &str = "/send/data/update-doctor-availability";
const GET_PATH: &str = "/read/data/get-doctor-availability";

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// e.g. `https://codequantum.in/healthdesk`
    pub base_url: String,
    pub request_timeout: Duration,
}

impl RegistryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Synchronous request/response wrapper for doctor presence.
///
/// All operations are idempotent from the caller's perspective. The session
/// token travels in a `token` header, matching the collaborator's contract.
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str, doctor_key: &str) -> String {
        format!(
            "{}{}?key={}",
            self.config.base_url,
            path,
            urlencode(doctor_key)
        )
    }

    /// Mark a doctor as reachable. The registry answers sentinel 302 on
    /// success; any other body is an error.
    pub async fn set_available(&self, doctor_key: &str, token: &str) -> RegistryResult<()> {
        let sentinel = self
            .send_for_sentinel(reqwest::Method::POST, &self.url(SET_PATH, doctor_key), token)
            .await?;

        if sentinel == SENTINEL_OK {
            debug!(doctor = %doctor_key, "doctor availability set");
            Ok(())
        } else {
            Err(RegistryError::Rejected(sentinel))
        }
    }

    /// Refresh an existing presence flag. The update endpoint signals
    /// failure with sentinel 401 rather than an HTTP error status.
    pub async fn update_availability(&self, doctor_key: &str, token: &str) -> RegistryResult<()> {
        let sentinel = self
            .send_for_sentinel(
                reqwest::Method::PATCH,
                &self.url(UPDATE_PATH, doctor_key),
                token,
            )
            .await?;

        if sentinel == SENTINEL_UPDATE_FAILED {
            Err(RegistryError::Rejected(sentinel))
        } else {
            debug!(doctor = %doctor_key, "doctor availability refreshed");
            Ok(())
        }
    }

    /// Read a doctor's presence flag.
    ///
    /// Transport failures resolve to [`Availability::Unknown`]; sentinel
    /// interpretation is fail-closed (see [`Availability::from_sentinel`]).
    pub async fn get_availability(&self, doctor_key: &str, token: &str) -> Availability {
        match self
            .send_for_sentinel(reqwest::Method::GET, &self.url(GET_PATH, doctor_key), token)
            .await
        {
            Ok(sentinel) => {
                let availability = Availability::from_sentinel(sentinel);
                debug!(doctor = %doctor_key, ?availability, sentinel, "availability lookup");
                availability
            }
            Err(e) => {
                warn!(doctor = %doctor_key, error = %e, "availability lookup failed");
                Availability::Unknown
            }
        }
    }

    async fn send_for_sentinel(
        &self,
        method: reqwest::Method,
        url: &str,
        token: &str,
    ) -> RegistryResult<i64> {
        let response = self
            .http
            .request(method, url)
            .header("token", token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        // The registry encodes outcomes in the body, not the status line.
        let body: serde_json::Value = response.json().await?;
        body.as_i64()
            .ok_or_else(|| RegistryError::UnexpectedBody(body.to_string()))
    }
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
