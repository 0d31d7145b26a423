//! Call-notification signaling channel
//!
//! Patient and doctor clients talk to the HealthDesk broker over STOMP 1.2
//! carried on a WebSocket. One [`ChannelClient`] exists per role instance:
//! the doctor connects and subscribes to a private queue to receive call
//! requests; the patient connects and only publishes.
//!
//! Connection policy (part of the broker contract, do not tune casually):
//! bidirectional 4 s heartbeats, a 10 s window for the `CONNECTED`
//! acknowledgment, and a fixed 5 s reconnect delay. Authentication
//! rejections, broker `ERROR` frames and socket errors all collapse to the
//! same observable `Disconnected` event; the distinct cause is only logged.
//!
//! The STOMP wire format lives in [`frame`] and is unit-tested on its own;
//! [`client`] owns the connection driver task.

pub mod client;
pub mod config;
pub mod error;
pub mod frame;

pub use client::{ChannelClient, ChannelEvent, ChannelState};
pub use config::ChannelConfig;
pub use error::{ChannelError, ChannelResult};

/// Destinations fixed by the broker contract.
pub mod destinations {
    /// Private queue each doctor's client subscribes to for call requests.
    pub const DOCTOR_CALL_QUEUE: &str = "/user/queue/healthdesk/read/videocall-details";
    /// Application destination patients publish call requests to.
    pub const CALL_CREATE: &str = "/app/healthdesk/videocall/create";
}
