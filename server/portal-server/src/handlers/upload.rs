use crate::error::{ApiError, ApiResult};
use crate::server::PortalServer;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use media_pipeline::{AudioEncoding, RecordingBlob, UploadRequest};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
}

/// Accept the doctor's consultation recording and forward it to the
/// ingestion endpoint. The multipart field set is fixed; a missing field is
/// a client bug and fails fast.
pub async fn upload_audio(
    State(server): State<PortalServer>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut audio: Option<(Bytes, AudioEncoding)> = None;
    let mut meeting_uuid = None;
    let mut phnumber = None;
    let mut doctor_email = None;
    let mut token = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "audio" => {
                let encoding = match field.content_type() {
                    Some(mime) if mime.contains("wav") => AudioEncoding::Wav,
                    Some("audio/mp4") => AudioEncoding::Mp4,
                    Some("audio/ogg") => AudioEncoding::Ogg,
                    Some(mime) if mime.contains("opus") => AudioEncoding::WebmOpus,
                    _ => AudioEncoding::Webm,
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Unreadable audio field: {e}")))?;
                audio = Some((data, encoding));
            }
            "meetingUuid" => meeting_uuid = field.text().await.ok(),
            "phnumber" => phnumber = field.text().await.ok(),
            "doctor_email" => doctor_email = field.text().await.ok(),
            "token" => token = field.text().await.ok(),
            _ => {}
        }
    }

    let (data, encoding) =
        audio.ok_or_else(|| ApiError::bad_request("Missing upload field: audio"))?;
    if data.is_empty() {
        return Err(ApiError::bad_request("Empty audio payload"));
    }

    let request = UploadRequest {
        meeting_uuid: meeting_uuid
            .ok_or_else(|| ApiError::bad_request("Missing upload field: meetingUuid"))?,
        patient_phone: phnumber
            .ok_or_else(|| ApiError::bad_request("Missing upload field: phnumber"))?,
        doctor_email: doctor_email
            .ok_or_else(|| ApiError::bad_request("Missing upload field: doctor_email"))?,
        token: token.ok_or_else(|| ApiError::bad_request("Missing upload field: token"))?,
    };

    let blob = RecordingBlob { data, encoding };
    info!(
        bytes = blob.data.len(),
        encoding = %blob.encoding,
        "forwarding recording to ingestion"
    );

    server.uploader.upload(&blob, &request).await?;

    Ok(Json(UploadResponse {
        success: true,
        message: "Recording uploaded".to_string(),
    }))
}
