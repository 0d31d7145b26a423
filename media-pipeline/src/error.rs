use thiserror::Error;

/// Message surfaced when a stop produces zero captured chunks.
pub const MSG_NO_AUDIO: &str = "No audio was recorded. Please check microphone permissions.";

#[derive(Error, Debug)]
pub enum MediaError {
    /// Recording stopped without a single non-empty chunk. The upload is
    /// aborted; this message goes straight to the doctor.
    #[error("{MSG_NO_AUDIO}")]
    NoAudioRecorded,

    #[error("No supported audio format found")]
    NoSupportedEncoding,

    /// Every capture source in the priority chain failed to open.
    #[error("No audio stream available: {0}")]
    NoAudioSource(String),

    #[error("Audio decode failed: {0}")]
    Decode(String),

    #[error("WAV encoding failed: {0}")]
    WavEncoding(String),

    #[error("Upload transport error: {0}")]
    UploadTransport(#[from] reqwest::Error),

    /// The ingestion endpoint answered, but refused the recording.
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Missing upload field: {0}")]
    MissingUploadField(&'static str),
}

pub type MediaResult<T> = Result<T, MediaError>;

impl From<MediaError> for portal_errors::PortalError {
    fn from(err: MediaError) -> Self {
        portal_errors::PortalError::MediaCapture(err.to_string())
    }
}
