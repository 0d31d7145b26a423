use crate::config::ChannelConfig;
use crate::error::{ChannelError, ChannelResult};
use crate::frame::{Command, Frame};
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Notify};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Externally observable connection state.
///
/// Authentication failures, broker errors and socket errors all collapse to
/// `Disconnected`; callers that need the cause read the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// `connect` has not been called yet.
    Inactive,
    Connecting,
    Connected,
    Disconnected,
}

/// Events delivered to the owner of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Connected,
    Disconnected { reason: String },
    /// A raw broker message. Payload parsing belongs to the handshake
    /// layer; a malformed body must never kill this client.
    Message { destination: String, body: String },
}

struct Shared {
    state: RwLock<ChannelState>,
    shutdown: AtomicBool,
    shutdown_notify: Notify,
    /// Destinations to (re)subscribe to on every successful connect.
    subscriptions: RwLock<Vec<String>>,
}

impl Shared {
    fn set_state(&self, state: ChannelState) {
        *self.state.write() = state;
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

/// One publish/subscribe connection to the signaling broker, scoped to a
/// single role instance (doctor listener or patient initiator).
pub struct ChannelClient {
    config: ChannelConfig,
    shared: Arc<Shared>,
    outgoing_tx: mpsc::UnboundedSender<Frame>,
    outgoing_rx: Mutex<Option<mpsc::UnboundedReceiver<Frame>>>,
    events_tx: mpsc::UnboundedSender<ChannelEvent>,
    driver: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl ChannelClient {
    /// Create a client and the event stream its owner consumes.
    pub fn new(config: ChannelConfig) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();

        let client = Self {
            config,
            shared: Arc::new(Shared {
                state: RwLock::new(ChannelState::Inactive),
                shutdown: AtomicBool::new(false),
                shutdown_notify: Notify::new(),
                subscriptions: RwLock::new(Vec::new()),
            }),
            outgoing_tx,
            outgoing_rx: Mutex::new(Some(outgoing_rx)),
            events_tx,
            driver: Mutex::new(None),
        };

        (client, events_rx)
    }

    pub fn state(&self) -> ChannelState {
        *self.shared.state.read()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ChannelState::Connected
    }

    /// Activate the connection driver with the session token as the
    /// connect-time credential. Idempotent; a second call while the driver
    /// is running (or after `disconnect`) does nothing.
    ///
    /// If no CONNECTED acknowledgment arrives within the configured window
    /// the driver surfaces a `Disconnected` event rather than an error, and
    /// keeps retrying on the fixed reconnect delay.
    pub fn connect(&self, token: &str) {
        if self.shared.is_shutdown() {
            return;
        }

        let mut driver = self.driver.lock();
        if driver.is_some() {
            return;
        }

        let Some(outgoing_rx) = self.outgoing_rx.lock().take() else {
            return;
        };

        let config = self.config.clone();
        let token = token.to_string();
        let shared = Arc::clone(&self.shared);
        let events_tx = self.events_tx.clone();

        *driver = Some(tokio::spawn(run_driver(
            config,
            token,
            shared,
            outgoing_rx,
            events_tx,
        )));
    }

    /// Register a private queue subscription, applied on every connect.
    /// Doctor clients subscribe; patient clients never call this.
    pub fn subscribe(&self, destination: &str) {
        let index;
        {
            let mut subs = self.shared.subscriptions.write();
            if subs.iter().any(|d| d == destination) {
                return;
            }
            index = subs.len();
            subs.push(destination.to_string());
        }

        // Already connected: subscribe now instead of waiting for a
        // reconnect cycle.
        if self.is_connected() {
            let frame = Frame::new(Command::Subscribe)
                .header("id", format!("sub-{index}"))
                .header("destination", destination)
                .header("ack", "auto");
            let _ = self.outgoing_tx.send(frame);
        }
    }

    /// Send one JSON payload to `destination`, exactly once.
    ///
    /// Fails synchronously, before any I/O, when the client is not in the
    /// connected state; there is no implicit queuing or retry.
    pub fn publish<T: Serialize>(&self, destination: &str, payload: &T) -> ChannelResult<()> {
        if self.state() != ChannelState::Connected {
            return Err(ChannelError::NotConnected);
        }

        let body = serde_json::to_string(payload)?;
        let frame = Frame::new(Command::Send)
            .header("destination", destination)
            .header("content-type", "application/json")
            .body(body);

        self.outgoing_tx
            .send(frame)
            .map_err(|_| ChannelError::NotConnected)
    }

    /// Tear the connection down: unsubscribes (if subscribed), sends a
    /// DISCONNECT, closes the socket. Safe to call repeatedly and safe to
    /// call when `connect` never ran.
    pub fn disconnect(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.shutdown_notify.notify_one();
        self.shared.set_state(ChannelState::Disconnected);
    }
}

impl Drop for ChannelClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

enum SessionEnd {
    Shutdown,
    Dropped(String),
}

async fn run_driver(
    config: ChannelConfig,
    token: String,
    shared: Arc<Shared>,
    mut outgoing_rx: mpsc::UnboundedReceiver<Frame>,
    events_tx: mpsc::UnboundedSender<ChannelEvent>,
) {
    loop {
        if shared.is_shutdown() {
            break;
        }

        shared.set_state(ChannelState::Connecting);
        match run_session(&config, &token, &shared, &mut outgoing_rx, &events_tx).await {
            SessionEnd::Shutdown => break,
            SessionEnd::Dropped(reason) => {
                warn!(reason = %reason, "signaling channel dropped");
                shared.set_state(ChannelState::Disconnected);
                let _ = events_tx.send(ChannelEvent::Disconnected { reason });

                tokio::select! {
                    _ = tokio::time::sleep(config.reconnect_delay) => {}
                    _ = shared.shutdown_notify.notified() => break,
                }
            }
        }
    }

    shared.set_state(ChannelState::Disconnected);
    debug!("signaling channel driver stopped");
}

async fn run_session(
    config: &ChannelConfig,
    token: &str,
    shared: &Arc<Shared>,
    outgoing_rx: &mut mpsc::UnboundedReceiver<Frame>,
    events_tx: &mpsc::UnboundedSender<ChannelEvent>,
) -> SessionEnd {
    // Frames accepted while an earlier session was dying are stranded in
    // the queue; a call request must not surface seconds later under a new
    // session, and a stale SUBSCRIBE would duplicate the re-subscription
    // ids below.
    while outgoing_rx.try_recv().is_ok() {}

    let (ws, _) = match tokio_tungstenite::connect_async(&config.broker_url).await {
        Ok(ok) => ok,
        Err(e) => return SessionEnd::Dropped(format!("websocket connect failed: {e}")),
    };
    let (mut sink, mut stream) = ws.split();

    let connect_frame = Frame::new(Command::Connect)
        .header("accept-version", "1.2")
        .header("host", host_of(&config.broker_url))
        .header("token", token)
        .header("heart-beat", config.heartbeat_header());

    if let Err(e) = sink.send(Message::Text(connect_frame.encode())).await {
        return SessionEnd::Dropped(format!("failed to send CONNECT: {e}"));
    }

    // Wait for the CONNECTED acknowledgment. Past the deadline the caller
    // only sees "disconnected"; the timeout itself is logged.
    let handshake = tokio::time::timeout(config.connect_timeout, async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    if Frame::is_heartbeat(&text) {
                        continue;
                    }
                    match Frame::parse(&text) {
                        Ok(frame) if frame.command == Command::Connected => return Ok(()),
                        Ok(frame) if frame.command == Command::Error => {
                            return Err(format!(
                                "broker reported error: {}",
                                frame.get_header("message").unwrap_or("unknown")
                            ));
                        }
                        Ok(frame) => {
                            debug!(command = %frame.command, "unexpected frame before CONNECTED");
                        }
                        Err(e) => warn!(error = %e, "ignoring malformed frame during handshake"),
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    return Err("connection closed before CONNECTED".to_string());
                }
                Some(Err(e)) => return Err(format!("websocket error: {e}")),
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;

    match handshake {
        Ok(Ok(())) => {}
        Ok(Err(reason)) => return SessionEnd::Dropped(reason),
        Err(_) => {
            return SessionEnd::Dropped(format!(
                "connection timeout - no CONNECTED within {:?}",
                config.connect_timeout
            ))
        }
    }

    info!(broker = %config.broker_url, "connected to signaling broker");
    shared.set_state(ChannelState::Connected);
    let _ = events_tx.send(ChannelEvent::Connected);

    // Re-establish desired subscriptions on every (re)connect.
    let subscriptions = shared.subscriptions.read().clone();
    for (index, destination) in subscriptions.iter().enumerate() {
        let frame = Frame::new(Command::Subscribe)
            .header("id", format!("sub-{index}"))
            .header("destination", destination.clone())
            .header("ack", "auto");
        if let Err(e) = sink.send(Message::Text(frame.encode())).await {
            return SessionEnd::Dropped(format!("failed to subscribe: {e}"));
        }
        debug!(destination = %destination, "subscribed");
    }

    let mut heartbeat = tokio::time::interval(config.heartbeat);
    heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    heartbeat.tick().await; // first tick fires immediately
    let mut last_received = Instant::now();

    loop {
        tokio::select! {
            _ = shared.shutdown_notify.notified() => {
                let _ = sink.send(Message::Text(Frame::new(Command::Disconnect).encode())).await;
                let _ = sink.close().await;
                return SessionEnd::Shutdown;
            }

            queued = outgoing_rx.recv() => {
                match queued {
                    Some(frame) => {
                        if let Err(e) = sink.send(Message::Text(frame.encode())).await {
                            return SessionEnd::Dropped(format!("send failed: {e}"));
                        }
                    }
                    // Sender side dropped with the client.
                    None => return SessionEnd::Shutdown,
                }
            }

            _ = heartbeat.tick() => {
                if let Err(e) = sink.send(Message::Text("\n".to_string())).await {
                    return SessionEnd::Dropped(format!("heartbeat send failed: {e}"));
                }
                // Half-open detection: the broker promised heartbeats too.
                if last_received.elapsed() > config.heartbeat * 3 {
                    return SessionEnd::Dropped("heartbeat lapse, connection half-open".to_string());
                }
            }

            incoming = stream.next() => {
                last_received = Instant::now();
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if Frame::is_heartbeat(&text) {
                            continue;
                        }
                        match Frame::parse(&text) {
                            Ok(frame) => match frame.command {
                                Command::Message => {
                                    let destination = frame
                                        .get_header("destination")
                                        .unwrap_or_default()
                                        .to_string();
                                    let _ = events_tx.send(ChannelEvent::Message {
                                        destination,
                                        body: frame.body,
                                    });
                                }
                                Command::Error => {
                                    return SessionEnd::Dropped(format!(
                                        "broker reported error: {}",
                                        frame.get_header("message").unwrap_or("unknown")
                                    ));
                                }
                                Command::Receipt => {}
                                other => debug!(command = %other, "ignoring frame"),
                            },
                            // Malformed input never kills the listener.
                            Err(e) => warn!(error = %e, "ignoring malformed frame"),
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        return SessionEnd::Dropped("connection closed by broker".to_string());
                    }
                    Some(Err(e)) => return SessionEnd::Dropped(format!("websocket error: {e}")),
                }
            }
        }
    }
}

fn host_of(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}
