use crate::live_call_url;
use crate::meeting::MeetingId;
use crate::payload::{IncomingCall, IncomingCallWire};
use call_channel::{destinations, ChannelEvent};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Display label when the queue payload carries no patient name.
const UNKNOWN_PATIENT: &str = "Patient";

/// Doctor-side handshake states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorCallState {
    /// Subscribed, no pending notification.
    Waiting,
    /// One notification pending; join or dismiss resolves it.
    Notified,
}

/// What `join` hands to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedCall {
    pub meeting_id: MeetingId,
    pub patient_phone: String,
    pub live_call_url: String,
}

/// Doctor-side incoming-call listener.
///
/// Holds a single notification slot: a second call request arriving while
/// one is pending overwrites it, so the doctor always sees the most recent
/// caller. Malformed messages are logged and ignored; the listener never
/// dies over one bad frame.
pub struct DoctorListener {
    state: DoctorCallState,
    pending: Option<IncomingCall>,
    message_count: u64,
}

impl Default for DoctorListener {
    fn default() -> Self {
        Self::new()
    }
}

impl DoctorListener {
    pub fn new() -> Self {
        Self {
            state: DoctorCallState::Waiting,
            pending: None,
            message_count: 0,
        }
    }

    pub fn state(&self) -> DoctorCallState {
        self.state
    }

    pub fn pending(&self) -> Option<&IncomingCall> {
        self.pending.as_ref()
    }

    /// Total messages accepted on the call queue, including overwritten
    /// ones. Lets the UI distinguish "first call" from "another call".
    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    /// Feed one channel event through the listener. Events for other
    /// destinations and connection lifecycle events pass through untouched.
    pub fn handle_event(&mut self, event: &ChannelEvent) {
        let ChannelEvent::Message { destination, body } = event else {
            return;
        };
        if destination != destinations::DOCTOR_CALL_QUEUE {
            return;
        }

        let wire: IncomingCallWire = match serde_json::from_str(body) {
            Ok(wire) => wire,
            Err(e) => {
                warn!(error = %e, "ignoring malformed call notification");
                return;
            }
        };

        let Some(meeting_uuid) = MeetingId::parse(&wire.meeting_uuid) else {
            warn!(
                meeting_uuid = %wire.meeting_uuid,
                "ignoring call notification with invalid meeting id"
            );
            return;
        };

        if self.pending.is_some() {
            debug!("replacing pending call notification");
        }

        self.message_count += 1;
        info!(
            meeting_id = %meeting_uuid,
            count = self.message_count,
            "incoming call"
        );
        self.pending = Some(IncomingCall {
            meeting_uuid,
            patient_name: UNKNOWN_PATIENT.to_string(),
            patient_phone: wire.patient_phonenumber,
            received_at: Utc::now(),
        });
        self.state = DoctorCallState::Notified;
    }

    /// Accept the pending call. Clears the slot and returns everything the
    /// conferencing view needs; `None` when nothing is pending.
    pub fn join(&mut self) -> Option<JoinedCall> {
        let call = self.pending.take()?;
        self.state = DoctorCallState::Waiting;
        info!(meeting_id = %call.meeting_uuid, "joining call");
        Some(JoinedCall {
            live_call_url: live_call_url(&call.meeting_uuid),
            patient_phone: call.patient_phone,
            meeting_id: call.meeting_uuid,
        })
    }

    /// Decline the pending call. No message goes back to the patient; their
    /// side stays in its sent state until they give up.
    pub fn dismiss(&mut self) {
        if self.pending.take().is_some() {
            info!("call notification dismissed");
        }
        self.state = DoctorCallState::Waiting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_message(body: &str) -> ChannelEvent {
        ChannelEvent::Message {
            destination: destinations::DOCTOR_CALL_QUEUE.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn incoming_call_notifies_with_meeting_id_and_phone() {
        let mut listener = DoctorListener::new();
        assert_eq!(listener.state(), DoctorCallState::Waiting);

        listener.handle_event(&call_message(
            r#"{"meeting_uuid":"abc1234567","patient_phonenumber":"9876543210"}"#,
        ));

        assert_eq!(listener.state(), DoctorCallState::Notified);
        let pending = listener.pending().unwrap();
        assert_eq!(pending.meeting_uuid.as_str(), "abc1234567");
        assert_eq!(pending.patient_phone, "9876543210");
        assert_eq!(pending.patient_name, "Patient");
        assert_eq!(listener.message_count(), 1);
    }

    #[test]
    fn join_returns_live_call_url_and_clears_slot() {
        let mut listener = DoctorListener::new();
        listener.handle_event(&call_message(
            r#"{"meeting_uuid":"abc1234567","patient_phonenumber":"9876543210"}"#,
        ));

        let joined = listener.join().unwrap();
        assert_eq!(
            joined.live_call_url,
            "/consultation/live-call?meetingId=abc1234567"
        );
        assert_eq!(joined.patient_phone, "9876543210");
        assert_eq!(listener.state(), DoctorCallState::Waiting);
        assert!(listener.pending().is_none());
        assert!(listener.join().is_none());
    }

    #[test]
    fn second_call_overwrites_pending_notification() {
        let mut listener = DoctorListener::new();
        listener.handle_event(&call_message(
            r#"{"meeting_uuid":"aaaaaaaaaa","patient_phonenumber":"1111111111"}"#,
        ));
        listener.handle_event(&call_message(
            r#"{"meeting_uuid":"bbbbbbbbbb","patient_phonenumber":"2222222222"}"#,
        ));

        let pending = listener.pending().unwrap();
        assert_eq!(pending.meeting_uuid.as_str(), "bbbbbbbbbb");
        assert_eq!(pending.patient_phone, "2222222222");
        assert_eq!(listener.message_count(), 2);
    }

    #[test]
    fn dismiss_clears_without_joining() {
        let mut listener = DoctorListener::new();
        listener.handle_event(&call_message(
            r#"{"meeting_uuid":"abc1234567","patient_phonenumber":"9876543210"}"#,
        ));
        listener.dismiss();
        assert_eq!(listener.state(), DoctorCallState::Waiting);
        assert!(listener.pending().is_none());
    }

    #[test]
    fn malformed_payload_is_ignored_and_listener_survives() {
        let mut listener = DoctorListener::new();
        listener.handle_event(&call_message("not json at all"));
        listener.handle_event(&call_message(r#"{"meeting_uuid":"abc1234567"}"#));
        listener.handle_event(&call_message(
            r#"{"meeting_uuid":"TOO_LONG_AND_WRONG","patient_phonenumber":"1"}"#,
        ));
        assert_eq!(listener.state(), DoctorCallState::Waiting);
        assert_eq!(listener.message_count(), 0);

        // Still fully functional afterwards.
        listener.handle_event(&call_message(
            r#"{"meeting_uuid":"abc1234567","patient_phonenumber":"9876543210"}"#,
        ));
        assert_eq!(listener.state(), DoctorCallState::Notified);
    }

    #[test]
    fn events_for_other_destinations_are_ignored() {
        let mut listener = DoctorListener::new();
        listener.handle_event(&ChannelEvent::Message {
            destination: "/user/queue/healthdesk/read/something-else".to_string(),
            body: r#"{"meeting_uuid":"abc1234567","patient_phonenumber":"9876543210"}"#
                .to_string(),
        });
        listener.handle_event(&ChannelEvent::Connected);
        assert_eq!(listener.state(), DoctorCallState::Waiting);
    }
}
