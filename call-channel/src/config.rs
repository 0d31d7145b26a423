use std::time::Duration;

/// Channel connection policy.
///
/// The defaults mirror what the broker side is provisioned for; a client
/// heartbeating slower than negotiated gets dropped as half-open.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Broker endpoint, e.g. `wss://codequantum.in/healthdesk-ws`
    pub broker_url: String,
    /// Outgoing and desired-incoming heartbeat interval.
    pub heartbeat: Duration,
    /// Fixed delay between reconnect attempts after a drop.
    pub reconnect_delay: Duration,
    /// How long to wait for the CONNECTED acknowledgment after activation.
    pub connect_timeout: Duration,
}

impl ChannelConfig {
    pub fn new(broker_url: impl Into<String>) -> Self {
        Self {
            broker_url: broker_url.into(),
            heartbeat: Duration::from_secs(4),
            reconnect_delay: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Heartbeat negotiation string for the CONNECT frame: `cx,cy` in
    /// milliseconds (what we can send, what we want to receive).
    pub(crate) fn heartbeat_header(&self) -> String {
        let ms = self.heartbeat.as_millis();
        format!("{ms},{ms}")
    }
}
