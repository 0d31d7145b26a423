//! Consultation call handshake
//!
//! The request→notify→join sequence that takes a patient from "take
//! consultation" to a doctor's client holding a joinable meeting
//! identifier. Both sides are explicit state-machine objects with their
//! collaborators injected as traits, so every transition is unit-testable
//! without a broker or a UI harness.
//!
//! The handshake is complete for both sides once the conferencing view
//! opens; in-call behavior (recording, upload) belongs to `media-pipeline`.

pub mod doctor;
pub mod error;
pub mod meeting;
pub mod patient;
pub mod payload;

pub use doctor::{DoctorCallState, DoctorListener, JoinedCall};
pub use error::{HandshakeError, HandshakeResult};
pub use meeting::MeetingId;
pub use patient::{
    AvailabilityProbe, CallPublisher, CallTicket, PatientCallState, PatientInitiator,
};
pub use payload::{CallRequest, IncomingCall};

/// Path of the conferencing view, opened in a new browsing context with the
/// meeting identifier as its query parameter.
pub fn live_call_url(meeting_id: &MeetingId) -> String {
    format!("/consultation/live-call?meetingId={meeting_id}")
}
