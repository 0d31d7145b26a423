use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandshakeError {
    /// `take_consultation` was invoked while the initiator was blocked;
    /// the message is the human-readable reason the UI already shows.
    #[error("cannot request consultation: {0}")]
    NotReady(String),

    /// A request is already in flight; the triggering control should have
    /// been disabled.
    #[error("consultation request already in progress")]
    RequestInFlight,

    #[error("failed to send call request: {0}")]
    PublishFailed(#[from] call_channel::ChannelError),
}

pub type HandshakeResult<T> = Result<T, HandshakeError>;

impl From<HandshakeError> for portal_errors::PortalError {
    fn from(err: HandshakeError) -> Self {
        portal_errors::PortalError::Channel(err.to_string())
    }
}
