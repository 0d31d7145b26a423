use crate::meeting::MeetingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call request the patient publishes, exactly once, to
/// `/app/healthdesk/videocall/create`. Field names are the broker
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    #[serde(rename = "doctorEmail")]
    pub doctor_email: String,
    #[serde(rename = "meetingUuid")]
    pub meeting_uuid: MeetingId,
}

/// Wire shape of the message the doctor's queue delivers. The backend
/// speaks snake_case here, unlike the camelCase request above.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IncomingCallWire {
    pub meeting_uuid: String,
    pub patient_phonenumber: String,
}

/// The doctor-side notification derived from a received channel message.
/// Lives only in the listener's transient state until joined or dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCall {
    pub meeting_uuid: MeetingId,
    /// The queue payload carries no display name; the UI shows a generic
    /// label until records are looked up by phone number.
    pub patient_name: String,
    pub patient_phone: String,
    pub received_at: DateTime<Utc>,
}
