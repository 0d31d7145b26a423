use crate::error::{ApiError, ApiResult};
use crate::middleware::{clear_session, plain_cookie, token_cookie};
use crate::server::PortalServer;
use crate::upstream::{NewPatient, UpstreamError};
use crate::validation::RequestValidation;
use crate::{validate_field, validate_required};
use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use logger_phi::PhiRedactor;
use serde::{Deserialize, Serialize};
use session_core::{cookies, validation, Role};
use std::collections::HashMap;
use tracing::info;
use utoipa::ToSchema;

/// Login request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(rename = "roleCode", default)]
    pub role_code: Option<String>,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub role: String,
    pub email: String,
}

impl LoginRequest {
    /// Per-field validation with the exact messages the login form shows.
    /// Runs before the password is hashed or any upstream call is made.
    fn field_errors(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if validation::validate_email(&self.email).is_err() {
            errors.insert("email".to_string(), validation::MSG_INVALID_EMAIL.to_string());
        }
        if validation::validate_login_password(&self.password).is_err() {
            errors.insert(
                "password".to_string(),
                validation::MSG_LOGIN_PASSWORD.to_string(),
            );
        }
        if validation::validate_role(&self.role).is_err() {
            errors.insert("role".to_string(), validation::MSG_INVALID_ROLE.to_string());
        }
        errors
    }
}

/// User login handler: validate, hash, proxy the credential check, then
/// establish the cookie session. Failure paths never set a cookie.
pub async fn login(
    State(server): State<PortalServer>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let errors = request.field_errors();
    if !errors.is_empty() {
        return Err(ApiError::validation_with_fields("Validation failed", errors));
    }

    let role = Role::parse(&request.role)?;
    let role_code = request
        .role_code
        .as_deref()
        .unwrap_or_else(|| role.code())
        .to_string();

    let hashed = server.hasher.hash(&request.password);
    let check = server
        .upstream
        .check_password(&request.email, &hashed, &role_code)
        .await
        .map_err(login_upstream_error)?;

    if !check.valid {
        return Err(ApiError::authentication("Invalid credentials"));
    }

    let phone = match role {
        Role::Patient => server.upstream.patient_phone(&request.email, &check.token).await,
        _ => None,
    };
    let user_name = server
        .upstream
        .user_name(&request.email, phone.as_deref(), role, &check.token)
        .await;

    let redactor = PhiRedactor::default();
    info!(
        role = %role.as_str(),
        user = %redactor.redact(&request.email),
        "login successful"
    );

    let mut jar = jar
        .add(token_cookie(check.token, server.config.secure_cookies))
        .add(plain_cookie(cookies::USER_NAME, user_name.clone()))
        .add(plain_cookie(cookies::ROLE, request.role.clone()))
        .add(plain_cookie(cookies::EMAIL, request.email.clone()));
    if role == Role::Patient {
        if let Some(phone) = phone {
            jar = jar.add(plain_cookie(cookies::PHONE, phone));
        }
    }

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user_name,
            role: request.role,
            email: request.email,
        }),
    ))
}

fn login_upstream_error(err: UpstreamError) -> ApiError {
    match err {
        UpstreamError::Unreachable(_) => {
            ApiError::upstream_unreachable("Unable to connect to authentication service")
        }
        UpstreamError::Rejected { .. } => ApiError::upstream("Authentication service unavailable"),
    }
}

/// Logout response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Clears all five session cookies. Always succeeds.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (
        clear_session(jar),
        Json(LogoutResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct CheckEmailQuery {
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckEmailResponse {
    pub exists: bool,
    pub success: bool,
}

/// Pre-signup email availability check.
pub async fn check_email(
    State(server): State<PortalServer>,
    Query(query): Query<CheckEmailQuery>,
) -> ApiResult<Json<CheckEmailResponse>> {
    let email = query
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required"))?;
    validation::validate_email(&email)?;
    let role_code = query.role.unwrap_or_else(|| "01".to_string());

    let exists = server
        .upstream
        .check_email(&email, &role_code)
        .await
        .map_err(proxy_error)?;

    Ok(Json(CheckEmailResponse {
        exists,
        success: true,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SendOtpQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

/// Trigger a signup OTP email.
pub async fn send_otp(
    State(server): State<PortalServer>,
    Query(query): Query<SendOtpQuery>,
) -> ApiResult<Json<OtpResponse>> {
    let email = query
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required"))?;
    validation::validate_email(&email)?;

    server.upstream.send_otp(&email).await.map_err(proxy_error)?;

    Ok(Json(OtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
        valid: None,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpQuery {
    pub email: Option<String>,
    pub otp: Option<String>,
}

/// Verify a signup OTP. The code must be exactly six digits; anything else
/// is rejected locally.
pub async fn verify_otp(
    State(server): State<PortalServer>,
    Query(query): Query<VerifyOtpQuery>,
) -> ApiResult<Json<OtpResponse>> {
    let (email, otp) = match (query.email, query.otp) {
        (Some(email), Some(otp)) if !email.is_empty() && !otp.is_empty() => (email, otp),
        _ => return Err(ApiError::validation("Email and OTP are required")),
    };
    validation::validate_email(&email)?;
    validation::validate_otp(&otp)?;

    let valid = server
        .upstream
        .verify_otp(&email, &otp)
        .await
        .map_err(proxy_error)?;

    Ok(Json(OtpResponse {
        success: true,
        message: if valid {
            "OTP verified successfully".to_string()
        } else {
            "Invalid OTP".to_string()
        },
        valid: Some(valid),
    }))
}

/// Patient signup request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePatientRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
    pub bloodgroup: String,
    #[serde(default = "default_allergy")]
    pub allergy: String,
    #[serde(default = "default_patient_role")]
    pub role: String,
}

fn default_allergy() -> String {
    "None".to_string()
}

fn default_patient_role() -> String {
    "01".to_string()
}

impl RequestValidation for CreatePatientRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.username, "username is required");
        validate_required!(self.email, "email is required");
        validate_required!(self.password, "password is required");
        validate_required!(self.phone, "phone is required");
        validate_required!(self.age, "age is required");
        validate_required!(self.gender, "gender is required");
        validate_required!(self.bloodgroup, "bloodgroup is required");

        validate_field!(
            self.username,
            validation::validate_username(&self.username).is_ok(),
            validation::MSG_USERNAME
        );
        validate_field!(
            self.email,
            validation::validate_email(&self.email).is_ok(),
            validation::MSG_INVALID_EMAIL
        );
        validate_field!(
            self.password,
            validation::validate_signup_password(&self.password).is_ok(),
            validation::MSG_SIGNUP_PASSWORD
        );
        validate_field!(
            self.phone,
            validation::validate_phone(&self.phone).is_ok(),
            validation::MSG_PHONE
        );
        validate_field!(
            self.age,
            matches!(self.age.parse::<u32>(), Ok(age) if (1..=150).contains(&age)),
            "Please enter a valid age between 1 and 150."
        );
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientResponse {
    pub success: bool,
    pub message: String,
    pub data: CreatedPatient,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedPatient {
    pub username: String,
    pub email: String,
    pub phone: String,
}

/// Patient signup: demographics and account are created upstream in two
/// steps after full local validation.
pub async fn create_patient(
    State(server): State<PortalServer>,
    Json(request): Json<CreatePatientRequest>,
) -> ApiResult<Json<CreatePatientResponse>> {
    request.validate()?;

    let patient = NewPatient {
        username: request.username.clone(),
        email: request.email.clone(),
        password_hash: server.hasher.hash(&request.password),
        phone: request.phone.clone(),
        age: request.age.clone(),
        gender: request.gender.clone(),
        blood_group: request.bloodgroup.clone(),
        allergy: request.allergy.clone(),
        role_code: request.role.clone(),
    };

    server
        .upstream
        .create_patient(&patient)
        .await
        .map_err(proxy_error)?;

    info!("patient account created");

    Ok(Json(CreatePatientResponse {
        success: true,
        message: "Patient account created successfully".to_string(),
        data: CreatedPatient {
            username: request.username,
            email: request.email,
            phone: request.phone,
        },
    }))
}

fn proxy_error(err: UpstreamError) -> ApiError {
    match err {
        UpstreamError::Unreachable(_) => {
            ApiError::upstream_unreachable("Service temporarily unavailable")
        }
        UpstreamError::Rejected { message, .. } => ApiError::upstream(message),
    }
}
