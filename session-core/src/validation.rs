//! Field validation rules applied before any network call.
//!
//! The exact predicates and messages are part of the portal's observable
//! behavior (the UI renders them inline) and are pinned: login accepts
//! passwords of 6+ characters while signup requires 7+, and the
//! username/phone/OTP patterns are strict.

use crate::error::{SessionError, SessionResult};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Login deliberately uses the looser email pattern.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{5,}$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\d{10}$").unwrap();
    static ref OTP_REGEX: Regex = Regex::new(r"^\d{6}$").unwrap();
}

pub const MSG_INVALID_EMAIL: &str = "Invalid email format";
pub const MSG_LOGIN_PASSWORD: &str = "Password must be at least 6 characters";
pub const MSG_INVALID_ROLE: &str = "Invalid role";
pub const MSG_USERNAME: &str =
    "Username must be at least 5 characters long and contain only letters and numbers.";
pub const MSG_SIGNUP_PASSWORD: &str = "Password must be at least 7 characters long.";
pub const MSG_PHONE: &str = "Phone number must be 10 digits long.";
pub const MSG_INVALID_OTP: &str = "Invalid OTP format";

pub fn validate_email(email: &str) -> SessionResult<()> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(SessionError::Validation(MSG_INVALID_EMAIL.to_string()))
    }
}

/// Login password rule: at least 6 characters.
pub fn validate_login_password(password: &str) -> SessionResult<()> {
    if password.len() >= 6 {
        Ok(())
    } else {
        Err(SessionError::Validation(MSG_LOGIN_PASSWORD.to_string()))
    }
}

/// Signup password rule is stricter than login: at least 7 characters.
pub fn validate_signup_password(password: &str) -> SessionResult<()> {
    if password.len() >= 7 {
        Ok(())
    } else {
        Err(SessionError::Validation(MSG_SIGNUP_PASSWORD.to_string()))
    }
}

pub fn validate_role(role: &str) -> SessionResult<()> {
    match role {
        "patient" | "doctor" | "admin" | "pharmacist" => Ok(()),
        _ => Err(SessionError::Validation(MSG_INVALID_ROLE.to_string())),
    }
}

pub fn validate_username(username: &str) -> SessionResult<()> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(SessionError::Validation(MSG_USERNAME.to_string()))
    }
}

pub fn validate_phone(phone: &str) -> SessionResult<()> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(SessionError::Validation(MSG_PHONE.to_string()))
    }
}

/// OTP is accepted iff the string matches `^\d{6}$` exactly.
pub fn validate_otp(otp: &str) -> SessionResult<()> {
    if OTP_REGEX.is_match(otp) {
        Ok(())
    } else {
        Err(SessionError::Validation(MSG_INVALID_OTP.to_string()))
    }
}
