use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const LENGTH: usize = 10;

/// Opaque token naming a video-conference room; generated by the patient
/// client and shared with the doctor over the channel.
///
/// The format is fixed at 10 characters of `[a-z0-9]` (~51.7 bits from a
/// CSPRNG). There is no server-side uniqueness check, so a collision would
/// drop two consultations into one room; the id length is part of the
/// room-name contract and cannot be widened unilaterally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(String);

impl MeetingId {
    pub fn generate() -> Self {
        let mut rng = OsRng;
        let id: String = (0..LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    /// Accept an id received over the wire, enforcing the room-name format.
    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == LENGTH
            && value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_match_the_room_name_format() {
        for _ in 0..500 {
            let id = MeetingId::generate();
            assert_eq!(id.as_str().len(), 10);
            assert!(id
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn generated_ids_vary() {
        let ids: HashSet<String> = (0..100)
            .map(|_| MeetingId::generate().as_str().to_string())
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn parse_enforces_format() {
        assert!(MeetingId::parse("abc1234567").is_some());
        assert!(MeetingId::parse("abc123456").is_none()); // 9 chars
        assert!(MeetingId::parse("abc12345678").is_none()); // 11 chars
        assert!(MeetingId::parse("ABC1234567").is_none()); // uppercase
        assert!(MeetingId::parse("abc123456!").is_none());
    }
}
