//! Client for the external HealthDesk data/auth service.
//!
//! Every auth route in this server is a validating proxy over this service.
//! Its replies use `{"valid": bool, ...}` bodies; name/phone lookups answer
//! `{"value": "..."}`. All lookups are best-effort: a failed name fetch
//! degrades to a placeholder instead of failing the login.

use async_trait::async_trait;
use serde::Deserialize;
use session_core::Role;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Unable to connect to authentication service")]
    Unreachable(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Answer to a password check; a token is only present when valid.
#[derive(Debug, Clone)]
pub struct PasswordCheck {
    pub valid: bool,
    pub token: String,
}

/// New patient account, already validated locally.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
    pub blood_group: String,
    pub allergy: String,
    pub role_code: String,
}

#[async_trait]
pub trait AuthUpstream: Send + Sync {
    async fn check_password(
        &self,
        email: &str,
        password_hash: &str,
        role_code: &str,
    ) -> UpstreamResult<PasswordCheck>;

    /// True when an account with this email already exists for the role.
    async fn check_email(&self, email: &str, role_code: &str) -> UpstreamResult<bool>;

    async fn send_otp(&self, email: &str) -> UpstreamResult<()>;

    async fn verify_otp(&self, email: &str, otp: &str) -> UpstreamResult<bool>;

    /// Two-step signup: demographics first, then the account row. The
    /// upstream has no transaction across the two.
    async fn create_patient(&self, patient: &NewPatient) -> UpstreamResult<()>;

    /// Patient phone lookup; `None` on any failure.
    async fn patient_phone(&self, email: &str, token: &str) -> Option<String>;

    /// Display-name lookup keyed by role. Never fails; degrades to
    /// "Unknown-User".
    async fn user_name(&self, email: &str, phone: Option<&str>, role: Role, token: &str)
        -> String;
}

#[derive(Debug, Deserialize)]
struct ValidReply {
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueReply {
    #[serde(default)]
    value: Option<String>,
}

/// HTTP implementation against the configured base URL.
pub struct HttpAuthUpstream {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthUpstream {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_value(&self, url: &str, token: &str) -> Option<String> {
        let response = self
            .client
            .get(url)
            .header("token", token)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json::<ValueReply>().await.ok()?.value
    }
}

#[async_trait]
impl AuthUpstream for HttpAuthUpstream {
    async fn check_password(
        &self,
        email: &str,
        password_hash: &str,
        role_code: &str,
    ) -> UpstreamResult<PasswordCheck> {
        let url = format!(
            "{}?email={}&password={}&role={}",
            self.url("/auth/check/password"),
            urlencode(email),
            password_hash,
            role_code
        );
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "password check refused");
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message: "Authentication service unavailable".to_string(),
            });
        }

        let reply: ValidReply = response.json().await?;
        Ok(PasswordCheck {
            valid: reply.valid,
            token: reply.token.unwrap_or_default(),
        })
    }

    async fn check_email(&self, email: &str, role_code: &str) -> UpstreamResult<bool> {
        let url = format!(
            "{}?email={}&role={}",
            self.url("/auth/check/email"),
            urlencode(email),
            role_code
        );
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message: "Failed to check email".to_string(),
            });
        }
        let reply: ValidReply = response.json().await?;
        Ok(reply.valid)
    }

    async fn send_otp(&self, email: &str) -> UpstreamResult<()> {
        let url = format!("{}?email={}", self.url("/auth/send/email"), urlencode(email));
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let reply: ValidReply = response.json().await.unwrap_or(ValidReply {
                valid: false,
                token: None,
                message: None,
            });
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message: reply.message.unwrap_or_else(|| "Failed to send OTP".to_string()),
            });
        }
        Ok(())
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> UpstreamResult<bool> {
        let url = format!(
            "{}?email={}&otp={}",
            self.url("/auth/check/otp/email"),
            urlencode(email),
            otp
        );
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message: "OTP verification failed".to_string(),
            });
        }
        let reply: ValidReply = response.json().await?;
        Ok(reply.valid)
    }

    async fn create_patient(&self, patient: &NewPatient) -> UpstreamResult<()> {
        let details_url = format!(
            "{}?patientName={}&phone={}&age={}&gender={}&bloodType={}&allergies={}",
            self.url("/send/data/patient-details"),
            urlencode(&patient.username),
            urlencode(&patient.phone),
            urlencode(&patient.age),
            urlencode(&patient.gender),
            urlencode(&patient.blood_group),
            urlencode(&patient.allergy)
        );
        let response = self.client.post(details_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message: "Failed to save patient details".to_string(),
            });
        }
        let reply: ValidReply = response.json().await?;
        if !reply.valid {
            return Err(UpstreamError::Rejected {
                status: 400,
                message: "Patient details validation failed".to_string(),
            });
        }

        let account_url = format!(
            "{}?name={}&phone={}&email={}&password={}&role={}",
            self.url("/auth/create/patient"),
            urlencode(&patient.username),
            urlencode(&patient.phone),
            urlencode(&patient.email),
            urlencode(&patient.password_hash),
            urlencode(&patient.role_code)
        );
        let response = self.client.post(account_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message: "Failed to create patient account".to_string(),
            });
        }
        let reply: ValidReply = response.json().await?;
        if !reply.valid {
            return Err(UpstreamError::Rejected {
                status: 400,
                message: "Account creation failed".to_string(),
            });
        }
        Ok(())
    }

    async fn patient_phone(&self, email: &str, token: &str) -> Option<String> {
        let url = format!(
            "{}?email={}",
            self.url("/read/data/patient-phone"),
            urlencode(email)
        );
        self.fetch_value(&url, token).await
    }

    async fn user_name(
        &self,
        email: &str,
        phone: Option<&str>,
        role: Role,
        token: &str,
    ) -> String {
        let url = match role {
            // The patient-name index is keyed by phone number.
            Role::Patient => {
                let Some(phone) = phone else {
                    return "Unknown-User".to_string();
                };
                format!(
                    "{}?email={}",
                    self.url("/read/data/patient-name"),
                    urlencode(phone)
                )
            }
            Role::Doctor => format!(
                "{}?email={}",
                self.url("/read/data/doctor-name"),
                urlencode(email)
            ),
            Role::Pharmacist => return "Test Pharmacist".to_string(),
            Role::Admin => return "Unknown-User".to_string(),
        };

        self.fetch_value(&url, token)
            .await
            .unwrap_or_else(|| "Unknown-User".to_string())
    }
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
