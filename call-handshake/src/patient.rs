use crate::error::{HandshakeError, HandshakeResult};
use crate::live_call_url;
use crate::meeting::MeetingId;
use crate::payload::CallRequest;
use async_trait::async_trait;
use call_channel::{destinations, ChannelClient, ChannelResult};
use presence_registry::{Availability, RegistryClient};
use std::sync::Arc;
use tracing::{info, warn};

/// Blocked-state reasons surfaced verbatim to the UI.
pub const REASON_CHECKING: &str = "Checking Availability...";
pub const REASON_OFFLINE: &str = "Offline - Refresh and Try";
pub const REASON_UNAVAILABLE: &str = "Doctor Unavailable";

/// The channel-facing half the initiator needs: a connection check and a
/// one-shot publish.
pub trait CallPublisher: Send + Sync {
    fn is_connected(&self) -> bool;
    fn publish_call(&self, request: &CallRequest) -> ChannelResult<()>;
}

impl CallPublisher for ChannelClient {
    fn is_connected(&self) -> bool {
        ChannelClient::is_connected(self)
    }

    fn publish_call(&self, request: &CallRequest) -> ChannelResult<()> {
        self.publish(destinations::CALL_CREATE, request)
    }
}

/// Presence lookup for one doctor.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn check(&self, doctor_key: &str) -> Availability;
}

/// Probe backed by the external registry, carrying the patient's session
/// token for the `token` header.
pub struct RegistryProbe {
    client: RegistryClient,
    token: String,
}

impl RegistryProbe {
    pub fn new(client: RegistryClient, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

#[async_trait]
impl AvailabilityProbe for RegistryProbe {
    async fn check(&self, doctor_key: &str) -> Availability {
        self.client.get_availability(doctor_key, &self.token).await
    }
}

/// Patient-side handshake states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientCallState {
    Idle,
    CheckingAvailability,
    Unavailable,
    Ready,
    Requesting,
    Sent { meeting_id: MeetingId },
    Failed { reason: String },
}

/// What a successful request hands to the caller: the id to reuse in the
/// conferencing view and the URL to open in a new browsing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTicket {
    pub meeting_id: MeetingId,
    pub live_call_url: String,
}

/// Patient-side handshake driver.
///
/// `Ready` requires the channel to be connected AND the doctor to be
/// available in the registry; any other combination is a blocked state
/// with a human-readable reason. The two facts come from different systems
/// and are not atomic: the registry may say "available" while the doctor's
/// channel is down.
pub struct PatientInitiator<P: CallPublisher, A: AvailabilityProbe> {
    publisher: Arc<P>,
    probe: Arc<A>,
    doctor_email: String,
    state: PatientCallState,
    availability: Availability,
    /// Kept for reuse by the conferencing view after `Sent`.
    last_meeting_id: Option<MeetingId>,
}

impl<P: CallPublisher, A: AvailabilityProbe> PatientInitiator<P, A> {
    pub fn new(publisher: Arc<P>, probe: Arc<A>, doctor_email: impl Into<String>) -> Self {
        Self {
            publisher,
            probe,
            doctor_email: doctor_email.into(),
            state: PatientCallState::Idle,
            availability: Availability::Unknown,
            last_meeting_id: None,
        }
    }

    pub fn state(&self) -> &PatientCallState {
        &self.state
    }

    pub fn last_meeting_id(&self) -> Option<&MeetingId> {
        self.last_meeting_id.as_ref()
    }

    /// Query availability and re-evaluate readiness. Run on mount and on
    /// explicit refresh, concurrently with channel activation.
    pub async fn refresh(&mut self) {
        self.state = PatientCallState::CheckingAvailability;
        self.availability = self.probe.check(&self.doctor_email).await;
        self.reevaluate();
    }

    /// Recompute the blocked/ready state from current channel and registry
    /// facts, without another registry round trip.
    pub fn reevaluate(&mut self) {
        if matches!(
            self.state,
            PatientCallState::Requesting | PatientCallState::Sent { .. }
        ) {
            return;
        }

        self.state = if !self.availability.is_available() {
            PatientCallState::Unavailable
        } else if !self.publisher.is_connected() {
            // Available but unreachable; the UI shows the offline reason.
            PatientCallState::Unavailable
        } else {
            PatientCallState::Ready
        };
    }

    /// Why "take consultation" is blocked right now, or `None` when ready.
    /// `Idle` reads as checking: until the first availability lookup
    /// completes the UI shows the loading label, not a verdict.
    pub fn blocked_reason(&self) -> Option<&'static str> {
        match self.state {
            PatientCallState::Idle | PatientCallState::CheckingAvailability => {
                Some(REASON_CHECKING)
            }
            PatientCallState::Ready | PatientCallState::Sent { .. } => None,
            _ if !self.publisher.is_connected() => Some(REASON_OFFLINE),
            _ if !self.availability.is_available() => Some(REASON_UNAVAILABLE),
            _ => None,
        }
    }

    /// The "take consultation" action.
    ///
    /// Generates a fresh meeting identifier, retains it for the
    /// conferencing view, and publishes the call request exactly once. On
    /// failure the initiator stays actionable: a retry is allowed from the
    /// `Failed` state without another availability round trip.
    pub fn take_consultation(&mut self) -> HandshakeResult<CallTicket> {
        match &self.state {
            PatientCallState::Ready | PatientCallState::Failed { .. } => {}
            PatientCallState::Requesting => return Err(HandshakeError::RequestInFlight),
            _ => {
                let reason = self
                    .blocked_reason()
                    .unwrap_or(REASON_CHECKING)
                    .to_string();
                return Err(HandshakeError::NotReady(reason));
            }
        }

        let meeting_id = MeetingId::generate();
        self.last_meeting_id = Some(meeting_id.clone());
        self.state = PatientCallState::Requesting;

        let request = CallRequest {
            doctor_email: self.doctor_email.clone(),
            meeting_uuid: meeting_id.clone(),
        };

        match self.publisher.publish_call(&request) {
            Ok(()) => {
                info!(meeting_id = %meeting_id, "call request sent");
                self.state = PatientCallState::Sent {
                    meeting_id: meeting_id.clone(),
                };
                Ok(CallTicket {
                    live_call_url: live_call_url(&meeting_id),
                    meeting_id,
                })
            }
            Err(e) => {
                warn!(error = %e, "call request failed");
                self.state = PatientCallState::Failed {
                    reason: e.to_string(),
                };
                Err(HandshakeError::PublishFailed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use call_channel::ChannelError;
    use parking_lot::Mutex;

    struct FakePublisher {
        connected: std::sync::atomic::AtomicBool,
        fail_next: std::sync::atomic::AtomicBool,
        sent: Mutex<Vec<CallRequest>>,
    }

    impl FakePublisher {
        fn new(connected: bool) -> Self {
            Self {
                connected: std::sync::atomic::AtomicBool::new(connected),
                fail_next: std::sync::atomic::AtomicBool::new(false),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl CallPublisher for FakePublisher {
        fn is_connected(&self) -> bool {
            self.connected.load(std::sync::atomic::Ordering::SeqCst)
        }

        fn publish_call(&self, request: &CallRequest) -> ChannelResult<()> {
            if self.fail_next.swap(false, std::sync::atomic::Ordering::SeqCst) {
                return Err(ChannelError::NotConnected);
            }
            self.sent.lock().push(request.clone());
            Ok(())
        }
    }

    struct FakeProbe(Availability);

    #[async_trait]
    impl AvailabilityProbe for FakeProbe {
        async fn check(&self, _doctor_key: &str) -> Availability {
            self.0
        }
    }

    fn initiator(
        connected: bool,
        availability: Availability,
    ) -> (
        Arc<FakePublisher>,
        PatientInitiator<FakePublisher, FakeProbe>,
    ) {
        let publisher = Arc::new(FakePublisher::new(connected));
        let probe = Arc::new(FakeProbe(availability));
        let initiator =
            PatientInitiator::new(Arc::clone(&publisher), probe, "testing@example.com");
        (publisher, initiator)
    }

    #[tokio::test]
    async fn happy_path_generates_id_and_publishes() {
        let (publisher, mut patient) = initiator(true, Availability::Available);
        patient.refresh().await;
        assert_eq!(*patient.state(), PatientCallState::Ready);
        assert_eq!(patient.blocked_reason(), None);

        let ticket = patient.take_consultation().unwrap();
        assert_eq!(ticket.meeting_id.as_str().len(), 10);
        assert_eq!(
            ticket.live_call_url,
            format!("/consultation/live-call?meetingId={}", ticket.meeting_id)
        );

        // Kept locally for the conferencing view.
        assert_eq!(patient.last_meeting_id(), Some(&ticket.meeting_id));

        let sent = publisher.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].doctor_email, "testing@example.com");
        assert_eq!(sent[0].meeting_uuid, ticket.meeting_id);
    }

    #[tokio::test]
    async fn offline_channel_blocks_with_offline_reason() {
        let (_publisher, mut patient) = initiator(false, Availability::Available);
        patient.refresh().await;
        assert_eq!(*patient.state(), PatientCallState::Unavailable);
        assert_eq!(patient.blocked_reason(), Some(REASON_OFFLINE));
        assert!(matches!(
            patient.take_consultation(),
            Err(HandshakeError::NotReady(_))
        ));
    }

    #[tokio::test]
    async fn unavailable_doctor_blocks_with_unavailable_reason() {
        let (_publisher, mut patient) = initiator(true, Availability::Unavailable);
        patient.refresh().await;
        assert_eq!(patient.blocked_reason(), Some(REASON_UNAVAILABLE));
    }

    #[tokio::test]
    async fn unknown_availability_fails_closed() {
        let (_publisher, mut patient) = initiator(true, Availability::Unknown);
        patient.refresh().await;
        assert_eq!(*patient.state(), PatientCallState::Unavailable);
    }

    #[tokio::test]
    async fn publish_failure_keeps_retry_possible() {
        let (publisher, mut patient) = initiator(true, Availability::Available);
        patient.refresh().await;

        publisher
            .fail_next
            .store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(matches!(
            patient.take_consultation(),
            Err(HandshakeError::PublishFailed(_))
        ));
        assert!(matches!(
            patient.state(),
            PatientCallState::Failed { .. }
        ));

        // Retry allowed from Failed; a fresh id is generated.
        let ticket = patient.take_consultation().unwrap();
        assert!(matches!(patient.state(), PatientCallState::Sent { .. }));
        assert_eq!(publisher.sent.lock().len(), 1);
        assert_eq!(patient.last_meeting_id(), Some(&ticket.meeting_id));
    }

    #[tokio::test]
    async fn checking_state_reports_checking_reason() {
        let (_publisher, patient) = initiator(true, Availability::Available);
        // Before any refresh completes the UI shows the loading reason.
        let mut patient = patient;
        patient.state = PatientCallState::CheckingAvailability;
        assert_eq!(patient.blocked_reason(), Some(REASON_CHECKING));
    }

    #[tokio::test]
    async fn idle_reports_checking_not_a_verdict() {
        // Channel down and availability unknown, but no refresh has run
        // yet: the reason must be the loading label, not offline or
        // unavailable.
        let (_publisher, patient) = initiator(false, Availability::Unknown);
        assert_eq!(*patient.state(), PatientCallState::Idle);
        assert_eq!(patient.blocked_reason(), Some(REASON_CHECKING));
    }
}
