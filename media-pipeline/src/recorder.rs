use crate::encoding::{AudioEncoding, EncodingSupport};
use crate::error::{MediaError, MediaResult};
use crate::wav::{self, PcmAudio};
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use session_core::Role;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Capture parameters handed to the backing recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub sample_rate_hz: u32,
    pub bits_per_second: u32,
    /// How often the backend emits a chunk while recording.
    pub timeslice: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 48_000,
            bits_per_second: 128_000,
            timeslice: Duration::from_secs(1),
        }
    }
}

/// Decodes captured chunks back to PCM so they can be canonicalized to WAV.
/// Decoding compressed audio is backend work; when no decoder is wired in,
/// or decoding fails, the recording is uploaded in its captured encoding.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, data: &[u8], encoding: AudioEncoding) -> MediaResult<PcmAudio>;
}

/// The finished recording, ready for upload.
#[derive(Debug, Clone)]
pub struct RecordingBlob {
    pub data: Bytes,
    pub encoding: AudioEncoding,
}

impl RecordingBlob {
    /// Upload file name; the meeting id ties the recording to its
    /// consultation, the timestamp disambiguates re-recordings.
    pub fn file_name(&self, meeting_id: &str) -> String {
        format!(
            "conversation_{}_{}.{}",
            meeting_id,
            Utc::now().timestamp_millis(),
            self.encoding.file_extension()
        )
    }
}

/// Doctor-side consultation recorder.
///
/// Start and stop are both idempotent. Only the doctor records; for any
/// other role `start` is a logged no-op so shared UI code can call it
/// unconditionally.
pub struct ConsultationRecorder {
    role: Role,
    config: RecorderConfig,
    decoder: Option<Arc<dyn AudioDecoder>>,
    encoding: Option<AudioEncoding>,
    chunks: Vec<Bytes>,
    recording: bool,
}

impl ConsultationRecorder {
    pub fn new(role: Role, config: RecorderConfig) -> Self {
        Self {
            role,
            config,
            decoder: None,
            encoding: None,
            chunks: Vec::new(),
            recording: false,
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn AudioDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Encoding selected by the last `start`, if any.
    pub fn encoding(&self) -> Option<AudioEncoding> {
        self.encoding
    }

    /// Begin capturing. Negotiates the capture encoding and resets the
    /// chunk buffer. No-op for non-doctors and while already recording.
    pub fn start(&mut self, support: &dyn EncodingSupport) -> MediaResult<()> {
        if self.role != Role::Doctor {
            debug!(role = %self.role.as_str(), "recording skipped for non-doctor role");
            return Ok(());
        }
        if self.recording {
            debug!("start ignored, already recording");
            return Ok(());
        }

        let encoding = AudioEncoding::negotiate(support)?;
        info!(encoding = %encoding, "recording started");
        self.encoding = Some(encoding);
        self.chunks.clear();
        self.recording = true;
        Ok(())
    }

    /// Accept one captured chunk. Empty chunks and chunks arriving outside
    /// a recording are dropped, matching the capture backend's delivery
    /// contract.
    pub fn push_chunk(&mut self, chunk: Bytes) {
        if !self.recording || chunk.is_empty() {
            return;
        }
        self.chunks.push(chunk);
    }

    /// Stop capturing and flush.
    ///
    /// Returns `Ok(None)` when nothing was recording. A recording with zero
    /// chunks aborts with `NoAudioRecorded` and nothing is uploaded. A
    /// non-empty recording is canonicalized to 16-bit WAV when a decoder is
    /// available; if decoding or WAV encoding fails, the captured bytes are
    /// returned in their original encoding so the recording is never lost.
    pub fn stop(&mut self) -> MediaResult<Option<RecordingBlob>> {
        if !self.recording {
            return Ok(None);
        }
        self.recording = false;

        let encoding = self.encoding.unwrap_or(AudioEncoding::Webm);
        let chunks = std::mem::take(&mut self.chunks);
        if chunks.is_empty() {
            warn!("recording stopped with zero chunks");
            return Err(MediaError::NoAudioRecorded);
        }

        let mut joined = BytesMut::new();
        for chunk in &chunks {
            joined.extend_from_slice(chunk);
        }
        let captured = joined.freeze();

        if let Some(decoder) = &self.decoder {
            match decoder
                .decode(&captured, encoding)
                .and_then(|pcm| wav::encode_wav(&pcm))
            {
                Ok(wav_bytes) => {
                    info!(bytes = wav_bytes.len(), "recording canonicalized to WAV");
                    return Ok(Some(RecordingBlob {
                        data: Bytes::from(wav_bytes),
                        encoding: AudioEncoding::Wav,
                    }));
                }
                Err(e) => {
                    warn!(error = %e, "WAV conversion failed, keeping captured encoding");
                }
            }
        }

        info!(bytes = captured.len(), encoding = %encoding, "recording flushed");
        Ok(Some(RecordingBlob {
            data: captured,
            encoding,
        }))
    }
}
