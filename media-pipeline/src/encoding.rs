use crate::error::{MediaError, MediaResult};
use std::fmt;

/// Container/codec combinations the recorder can produce, ordered by
/// preference. `Wav` never comes out of capture; it is the canonical form
/// produced after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    WebmOpus,
    Webm,
    Mp4,
    Ogg,
    Wav,
}

/// Capture preference order. Opus-in-WebM first, then progressively more
/// generic containers.
pub const PREFERRED: [AudioEncoding; 4] = [
    AudioEncoding::WebmOpus,
    AudioEncoding::Webm,
    AudioEncoding::Mp4,
    AudioEncoding::Ogg,
];

impl AudioEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::WebmOpus => "audio/webm;codecs=opus",
            AudioEncoding::Webm => "audio/webm",
            AudioEncoding::Mp4 => "audio/mp4",
            AudioEncoding::Ogg => "audio/ogg",
            AudioEncoding::Wav => "audio/wav",
        }
    }

    /// Extension used in the uploaded file name. Anything that is not WAV
    /// travels as `.webm`; the ingestion side keys off the mime type.
    pub fn file_extension(&self) -> &'static str {
        match self {
            AudioEncoding::Wav => "wav",
            _ => "webm",
        }
    }

    /// Pick the first encoding the running recorder supports.
    pub fn negotiate(support: &dyn EncodingSupport) -> MediaResult<AudioEncoding> {
        PREFERRED
            .into_iter()
            .find(|encoding| support.supports(*encoding))
            .ok_or(MediaError::NoSupportedEncoding)
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// What the capture backend can actually encode.
pub trait EncodingSupport: Send + Sync {
    fn supports(&self, encoding: AudioEncoding) -> bool;
}

/// Support table for a fixed set of encodings.
pub struct StaticSupport(pub Vec<AudioEncoding>);

impl EncodingSupport for StaticSupport {
    fn supports(&self, encoding: AudioEncoding) -> bool {
        self.0.contains(&encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiation_prefers_opus_in_webm() {
        let support = StaticSupport(vec![
            AudioEncoding::Ogg,
            AudioEncoding::WebmOpus,
            AudioEncoding::Mp4,
        ]);
        assert_eq!(
            AudioEncoding::negotiate(&support).unwrap(),
            AudioEncoding::WebmOpus
        );
    }

    #[test]
    fn negotiation_falls_through_the_preference_list() {
        let support = StaticSupport(vec![AudioEncoding::Mp4, AudioEncoding::Ogg]);
        assert_eq!(
            AudioEncoding::negotiate(&support).unwrap(),
            AudioEncoding::Mp4
        );
    }

    #[test]
    fn negotiation_fails_with_descriptive_error_when_nothing_is_supported() {
        let support = StaticSupport(vec![]);
        let err = AudioEncoding::negotiate(&support).unwrap_err();
        assert_eq!(err.to_string(), "No supported audio format found");
    }

    #[test]
    fn non_wav_encodings_upload_with_webm_extension() {
        assert_eq!(AudioEncoding::Wav.file_extension(), "wav");
        assert_eq!(AudioEncoding::Mp4.file_extension(), "webm");
        assert_eq!(AudioEncoding::WebmOpus.file_extension(), "webm");
    }
}
