use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("registry rejected the request: sentinel {0}")]
    Rejected(i64),

    #[error("registry returned an unexpected body: {0}")]
    UnexpectedBody(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

impl From<RegistryError> for portal_errors::PortalError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Network(e) => portal_errors::PortalError::Network(e.to_string()),
            other => portal_errors::PortalError::Upstream(other.to_string()),
        }
    }
}
