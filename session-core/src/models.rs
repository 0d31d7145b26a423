use crate::error::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};

/// Portal roles and their external wire codes.
///
/// The upstream backend identifies roles by two-digit string codes; the
/// mapping is part of its contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
    Doctor,
    Pharmacist,
}

impl Role {
    /// External role code ("00".."03") used in upstream query strings.
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "00",
            Role::Patient => "01",
            Role::Doctor => "02",
            Role::Pharmacist => "03",
        }
    }

    pub fn from_code(code: &str) -> SessionResult<Self> {
        match code {
            "00" => Ok(Role::Admin),
            "01" => Ok(Role::Patient),
            "02" => Ok(Role::Doctor),
            "03" => Ok(Role::Pharmacist),
            other => Err(SessionError::UnknownRoleCode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Pharmacist => "pharmacist",
        }
    }

    pub fn parse(value: &str) -> SessionResult<Self> {
        match value {
            "admin" => Ok(Role::Admin),
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "pharmacist" => Ok(Role::Pharmacist),
            other => Err(SessionError::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The per-request session read from cookies.
///
/// Created by the external auth backend at login, destroyed when the logout
/// route clears the cookies. Immutable for the request lifetime; the phone
/// field is only populated for patients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl Session {
    pub fn empty() -> Self {
        Self {
            token: None,
            user_name: None,
            email: None,
            phone: None,
            role: None,
        }
    }

    /// A session is authenticated when both the token and a non-blank user
    /// name are present; the route guard applies the same test.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
            && self
                .user_name
                .as_deref()
                .map(|n| !n.trim().is_empty())
                .unwrap_or(false)
    }

    pub fn role(&self) -> SessionResult<Role> {
        let raw = self.role.as_deref().ok_or(SessionError::MissingField("role"))?;
        Role::parse(raw)
    }

    pub fn token(&self) -> SessionResult<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingField("token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip() {
        for role in [Role::Admin, Role::Patient, Role::Doctor, Role::Pharmacist] {
            assert_eq!(Role::from_code(role.code()).unwrap(), role);
        }
    }

    #[test]
    fn wire_codes_are_fixed() {
        assert_eq!(Role::Admin.code(), "00");
        assert_eq!(Role::Patient.code(), "01");
        assert_eq!(Role::Doctor.code(), "02");
        assert_eq!(Role::Pharmacist.code(), "03");
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(matches!(
            Role::from_code("07"),
            Err(SessionError::UnknownRoleCode(_))
        ));
    }

    #[test]
    fn blank_user_name_is_not_authenticated() {
        let session = Session {
            token: Some("tok-123".into()),
            user_name: Some("   ".into()),
            email: None,
            phone: None,
            role: Some("doctor".into()),
        };
        assert!(!session.is_authenticated());
    }

    #[test]
    fn token_and_name_mean_authenticated() {
        let session = Session {
            token: Some("tok-123".into()),
            user_name: Some("drpatel".into()),
            email: Some("dr@example.com".into()),
            phone: None,
            role: Some("doctor".into()),
        };
        assert!(session.is_authenticated());
        assert_eq!(session.role().unwrap(), Role::Doctor);
    }
}
