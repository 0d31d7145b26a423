//! Consultation audio capture and upload
//!
//! Doctor-side media pipeline for recorded consultations:
//!
//! - Capture source selection with a fixed fallback chain (system audio,
//!   mixed local+remote conference tracks, plain microphone)
//! - Capture encoding negotiation against a preference list
//! - Chunked recording with idempotent start/stop
//! - Canonicalization of finished recordings to 16-bit PCM WAV, falling
//!   back to the captured encoding when conversion fails
//! - Multipart upload with an observable in-progress flag
//!
//! The ordering contract is structural: `ConsultationRecorder::stop` fully
//! flushes before it returns the blob, and the upload only starts with that
//! blob in hand. Call teardown awaits the upload future.

pub mod encoding;
pub mod error;
pub mod mixer;
pub mod recorder;
pub mod source;
pub mod upload;
pub mod wav;

pub use encoding::{AudioEncoding, EncodingSupport, StaticSupport};
pub use error::{MediaError, MediaResult, MSG_NO_AUDIO};
pub use recorder::{AudioDecoder, ConsultationRecorder, RecorderConfig, RecordingBlob};
pub use source::{select_source, AudioSource, SourceKind};
pub use upload::{AudioUploader, UploadRequest};
pub use wav::PcmAudio;
