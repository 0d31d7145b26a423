//! STOMP 1.2 frame codec.
//!
//! A frame is a command line, zero or more `name:value` header lines, a
//! blank line, an optional body, and a terminating NUL. A lone LF between
//! frames is a heartbeat. Header names and values are escaped on every
//! frame except CONNECT/CONNECTED, per the STOMP 1.2 grammar.

use crate::error::{ChannelError, ChannelResult};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Send,
    Subscribe,
    Unsubscribe,
    Disconnect,
    Message,
    Receipt,
    Error,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Send => "SEND",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Disconnect => "DISCONNECT",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    pub fn parse(input: &str) -> ChannelResult<Self> {
        match input {
            "CONNECT" | "STOMP" => Ok(Command::Connect),
            "CONNECTED" => Ok(Command::Connected),
            "SEND" => Ok(Command::Send),
            "SUBSCRIBE" => Ok(Command::Subscribe),
            "UNSUBSCRIBE" => Ok(Command::Unsubscribe),
            "DISCONNECT" => Ok(Command::Disconnect),
            "MESSAGE" => Ok(Command::Message),
            "RECEIPT" => Ok(Command::Receipt),
            "ERROR" => Ok(Command::Error),
            other => Err(ChannelError::MalformedFrame(format!(
                "unknown command {other:?}"
            ))),
        }
    }

    /// CONNECT and CONNECTED frames predate header escaping and are exempt.
    fn escapes_headers(&self) -> bool {
        !matches!(self, Command::Connect | Command::Connected)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize to the wire form, NUL terminator included.
    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');

        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }

        if !self.body.is_empty() {
            out.push_str("content-length:");
            out.push_str(&self.body.len().to_string());
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse a single frame from its wire form.
    ///
    /// `input` must contain exactly one frame (the broker sends one frame
    /// per WebSocket message); the trailing NUL and any trailing heartbeat
    /// LFs are tolerated.
    pub fn parse(input: &str) -> ChannelResult<Self> {
        let input = input.trim_start_matches(['\n', '\r']);

        let (head, raw_body) = match input.split_once("\n\n") {
            Some((head, body)) => (head, body),
            None => (input.trim_end_matches(['\0', '\n', '\r']), ""),
        };

        let mut lines = head.lines();
        let command_line = lines
            .next()
            .ok_or_else(|| ChannelError::MalformedFrame("empty frame".to_string()))?
            .trim_end_matches('\r');
        let command = Command::parse(command_line)?;
        let unescape_headers = command.escapes_headers();

        let mut headers = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').ok_or_else(|| {
                ChannelError::MalformedFrame(format!("header without separator: {line:?}"))
            })?;
            if unescape_headers {
                headers.push((unescape_header(name)?, unescape_header(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        // With a content-length header the body is exactly that many bytes
        // and NULs inside it survive; without one the first NUL terminates
        // it. A declared length past the payload (or off a char boundary)
        // falls back to NUL termination.
        let declared_len = headers
            .iter()
            .find(|(name, _)| name == "content-length")
            .and_then(|(_, value)| value.trim().parse::<usize>().ok());

        let body = match declared_len.and_then(|len| raw_body.get(..len)) {
            Some(bounded) => bounded,
            None => raw_body.split('\0').next().unwrap_or(""),
        };

        Ok(Self {
            command,
            headers,
            body: body.to_string(),
        })
    }

    /// True for the lone-LF keepalive exchanged between frames.
    pub fn is_heartbeat(input: &str) -> bool {
        input.trim_matches(['\n', '\r']).is_empty()
    }
}

fn escape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\r' => out.push_str(r"\r"),
            '\n' => out.push_str(r"\n"),
            ':' => out.push_str(r"\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(value: &str) -> ChannelResult<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('c') => out.push(':'),
            other => {
                return Err(ChannelError::MalformedFrame(format!(
                    "invalid header escape \\{:?}",
                    other
                )))
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_connect_frame() {
        let frame = Frame::new(Command::Connect)
            .header("accept-version", "1.2")
            .header("host", "codequantum.in")
            .header("token", "jwt-abc")
            .header("heart-beat", "4000,4000");

        let wire = frame.encode();
        assert!(wire.starts_with("CONNECT\naccept-version:1.2\n"));
        assert!(wire.contains("heart-beat:4000,4000\n"));
        assert!(wire.ends_with("\n\n\0"));
    }

    #[test]
    fn encodes_send_with_body_and_content_length() {
        let body = r#"{"doctorEmail":"d@e.com","meetingUuid":"abc1234567"}"#;
        let frame = Frame::new(Command::Send)
            .header("destination", "/app/healthdesk/videocall/create")
            .header("content-type", "application/json")
            .body(body);

        let wire = frame.encode();
        assert!(wire.contains(&format!("content-length:{}\n", body.len())));
        assert!(wire.ends_with(&format!("\n\n{body}\0")));
    }

    #[test]
    fn parses_message_frame() {
        let wire = "MESSAGE\ndestination:/user/queue/healthdesk/read/videocall-details\nmessage-id:7\nsubscription:sub-0\n\n{\"meeting_uuid\":\"abc1234567\"}\0";
        let frame = Frame::parse(wire).unwrap();
        assert_eq!(frame.command, Command::Message);
        assert_eq!(
            frame.get_header("destination"),
            Some("/user/queue/healthdesk/read/videocall-details")
        );
        assert_eq!(frame.body, "{\"meeting_uuid\":\"abc1234567\"}");
    }

    #[test]
    fn parses_connected_without_body() {
        let frame = Frame::parse("CONNECTED\nversion:1.2\nheart-beat:4000,4000\n\n\0").unwrap();
        assert_eq!(frame.command, Command::Connected);
        assert_eq!(frame.get_header("version"), Some("1.2"));
        assert!(frame.body.is_empty());
    }

    #[test]
    fn round_trips_escaped_headers() {
        let frame = Frame::new(Command::Send)
            .header("destination", "/queue/a")
            .header("reply-to", "odd:value\nwith\\specials");
        let parsed = Frame::parse(&frame.encode()).unwrap();
        assert_eq!(
            parsed.get_header("reply-to"),
            Some("odd:value\nwith\\specials")
        );
    }

    #[test]
    fn content_length_preserves_interior_nul() {
        // encode declares content-length, so a NUL inside the body is data,
        // not a terminator.
        let frame = Frame::new(Command::Send)
            .header("destination", "/queue/a")
            .body("AB\0CD");
        let parsed = Frame::parse(&frame.encode()).unwrap();
        assert_eq!(parsed.get_header("content-length"), Some("5"));
        assert_eq!(parsed.body, "AB\0CD");
    }

    #[test]
    fn without_content_length_first_nul_ends_the_body() {
        let frame = Frame::parse("MESSAGE\ndestination:/queue/a\n\nAB\0CD\0").unwrap();
        assert_eq!(frame.body, "AB");
    }

    #[test]
    fn oversized_content_length_falls_back_to_nul_termination() {
        let frame =
            Frame::parse("MESSAGE\ndestination:/queue/a\ncontent-length:999\n\nAB\0").unwrap();
        assert_eq!(frame.body, "AB");
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(matches!(
            Frame::parse("NONSENSE\n\n\0"),
            Err(ChannelError::MalformedFrame(_))
        ));
    }

    #[test]
    fn rejects_header_without_colon() {
        assert!(matches!(
            Frame::parse("SEND\nbadheader\n\nbody\0"),
            Err(ChannelError::MalformedFrame(_))
        ));
    }

    #[test]
    fn heartbeat_detection() {
        assert!(Frame::is_heartbeat("\n"));
        assert!(Frame::is_heartbeat("\r\n"));
        assert!(!Frame::is_heartbeat("MESSAGE\n\n\0"));
    }

    #[test]
    fn error_frame_carries_broker_message() {
        let frame =
            Frame::parse("ERROR\nmessage:Invalid token\n\nAccess denied\0").unwrap();
        assert_eq!(frame.command, Command::Error);
        assert_eq!(frame.get_header("message"), Some("Invalid token"));
        assert_eq!(frame.body, "Access denied");
    }
}
