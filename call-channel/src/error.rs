use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    /// `publish` was called while the client was not in the connected
    /// state. Raised synchronously, before any I/O is attempted.
    #[error("Cannot send message, not connected.")]
    NotConnected,

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed STOMP frame: {0}")]
    MalformedFrame(String),

    #[error("websocket error: {0}")]
    Transport(String),

    #[error("broker reported error: {0}")]
    Broker(String),
}

pub type ChannelResult<T> = Result<T, ChannelError>;

impl From<ChannelError> for portal_errors::PortalError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::MalformedFrame(msg) => {
                portal_errors::PortalError::MalformedMessage(msg)
            }
            other => portal_errors::PortalError::Channel(other.to_string()),
        }
    }
}
