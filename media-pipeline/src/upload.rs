use crate::error::{MediaError, MediaResult};
use crate::recorder::RecordingBlob;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Everything the ingestion endpoint needs alongside the audio bytes.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub meeting_uuid: String,
    pub patient_phone: String,
    pub doctor_email: String,
    pub token: String,
}

impl UploadRequest {
    fn validate(&self) -> MediaResult<()> {
        if self.token.is_empty() {
            return Err(MediaError::MissingUploadField("token"));
        }
        if self.doctor_email.is_empty() {
            return Err(MediaError::MissingUploadField("doctor_email"));
        }
        if self.patient_phone.is_empty() {
            return Err(MediaError::MissingUploadField("phnumber"));
        }
        if self.meeting_uuid.is_empty() {
            return Err(MediaError::MissingUploadField("meetingUuid"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Multipart uploader for finished recordings.
///
/// One upload at a time is the expected usage; the in-progress flag exists
/// for the navigation-warning hook, not for serialization. Failures surface
/// to the caller and are never retried automatically.
pub struct AudioUploader {
    client: reqwest::Client,
    endpoint: Url,
    in_progress: Arc<AtomicBool>,
}

impl AudioUploader {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            in_progress: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_client(endpoint: Url, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint,
            in_progress: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while an upload is in flight. Shared handle, safe to poll from
    /// the teardown path.
    pub fn in_progress_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.in_progress)
    }

    pub fn is_upload_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Send the recording. The flag is cleared on every exit path,
    /// including transport errors.
    pub async fn upload(
        &self,
        blob: &RecordingBlob,
        request: &UploadRequest,
    ) -> MediaResult<()> {
        request.validate()?;

        let file_name = blob.file_name(&request.meeting_uuid);
        let part = Part::bytes(blob.data.to_vec())
            .file_name(file_name.clone())
            .mime_str(blob.encoding.mime_type())
            .map_err(|e| MediaError::UploadRejected(e.to_string()))?;

        let form = Form::new()
            .part("audio", part)
            .text("meetingUuid", request.meeting_uuid.clone())
            .text("phnumber", request.patient_phone.clone())
            .text("doctor_email", request.doctor_email.clone())
            .text("token", request.token.clone());

        self.in_progress.store(true, Ordering::SeqCst);
        let _guard = FlagGuard(Arc::clone(&self.in_progress));

        info!(file = %file_name, bytes = blob.data.len(), "uploading recording");

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "upload refused");
            return Err(MediaError::UploadRejected(format!("HTTP {status}")));
        }

        let body: UploadResponse = response.json().await?;
        if body.success {
            info!("recording uploaded");
            Ok(())
        } else {
            let message = body.message.unwrap_or_else(|| "Upload failed".to_string());
            warn!(message = %message, "upload rejected by ingestion endpoint");
            Err(MediaError::UploadRejected(message))
        }
    }
}

struct FlagGuard(Arc<AtomicBool>);

impl Drop for FlagGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::AudioEncoding;
    use bytes::Bytes;

    fn request() -> UploadRequest {
        UploadRequest {
            meeting_uuid: "abc1234567".to_string(),
            patient_phone: "9876543210".to_string(),
            doctor_email: "doctor@example.com".to_string(),
            token: "tok".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_fields_fail_before_any_network_io() {
        let uploader =
            AudioUploader::new(Url::parse("http://127.0.0.1:1/api/upload-audio").unwrap());
        let blob = RecordingBlob {
            data: Bytes::from_static(b"abc"),
            encoding: AudioEncoding::Wav,
        };

        let mut bad = request();
        bad.token.clear();
        let err = uploader.upload(&blob, &bad).await.unwrap_err();
        assert!(matches!(err, MediaError::MissingUploadField("token")));
        assert!(!uploader.is_upload_in_progress());
    }

    #[tokio::test]
    async fn transport_failure_surfaces_and_clears_the_flag() {
        // Port 1 refuses connections; no retry may happen.
        let uploader =
            AudioUploader::new(Url::parse("http://127.0.0.1:1/api/upload-audio").unwrap());
        let blob = RecordingBlob {
            data: Bytes::from_static(b"abc"),
            encoding: AudioEncoding::Wav,
        };

        let err = uploader.upload(&blob, &request()).await.unwrap_err();
        assert!(matches!(err, MediaError::UploadTransport(_)));
        assert!(!uploader.is_upload_in_progress());
    }
}
