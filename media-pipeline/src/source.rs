use crate::error::{MediaError, MediaResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Capture source kinds, in acquisition priority order. System audio
/// captures everything the machine plays; the mixed conference feed is the
/// next best thing; a bare microphone only hears the doctor's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    SystemAudio,
    MixedConference,
    Microphone,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::SystemAudio => "system audio",
            SourceKind::MixedConference => "mixed conference tracks",
            SourceKind::Microphone => "microphone",
        }
    }
}

/// A capture backend that may or may not be able to open right now.
/// Opening is where permission prompts and device probing happen, so it can
/// fail per-source without failing the recording.
#[async_trait]
pub trait AudioSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Try to open the source. An error here means "try the next one".
    async fn open(&self) -> MediaResult<()>;
}

/// Walk the sources in priority order and return the first that opens.
///
/// Sources are tried in `SourceKind` order regardless of how the slice is
/// arranged. When every source fails, the error carries the last failure so
/// the doctor sees why even the microphone was unusable.
pub async fn select_source(
    sources: &[Arc<dyn AudioSource>],
) -> MediaResult<Arc<dyn AudioSource>> {
    let mut ordered: Vec<&Arc<dyn AudioSource>> = sources.iter().collect();
    ordered.sort_by_key(|source| source.kind());

    let mut last_error = "no capture sources configured".to_string();
    for source in ordered {
        match source.open().await {
            Ok(()) => {
                debug!(source = source.kind().label(), "capture source selected");
                return Ok(Arc::clone(source));
            }
            Err(e) => {
                warn!(
                    source = source.kind().label(),
                    error = %e,
                    "capture source unavailable, trying next"
                );
                last_error = e.to_string();
            }
        }
    }
    Err(MediaError::NoAudioSource(last_error))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        kind: SourceKind,
        available: bool,
    }

    #[async_trait]
    impl AudioSource for FakeSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn open(&self) -> MediaResult<()> {
            if self.available {
                Ok(())
            } else {
                Err(MediaError::NoAudioSource(format!(
                    "{} unavailable",
                    self.kind.label()
                )))
            }
        }
    }

    fn source(kind: SourceKind, available: bool) -> Arc<dyn AudioSource> {
        Arc::new(FakeSource { kind, available })
    }

    #[tokio::test]
    async fn system_audio_wins_when_available() {
        let sources = vec![
            source(SourceKind::Microphone, true),
            source(SourceKind::SystemAudio, true),
            source(SourceKind::MixedConference, true),
        ];
        let selected = select_source(&sources).await.unwrap();
        assert_eq!(selected.kind(), SourceKind::SystemAudio);
    }

    #[tokio::test]
    async fn falls_back_to_mixed_then_microphone() {
        let sources = vec![
            source(SourceKind::SystemAudio, false),
            source(SourceKind::MixedConference, true),
            source(SourceKind::Microphone, true),
        ];
        let selected = select_source(&sources).await.unwrap();
        assert_eq!(selected.kind(), SourceKind::MixedConference);

        let sources = vec![
            source(SourceKind::SystemAudio, false),
            source(SourceKind::MixedConference, false),
            source(SourceKind::Microphone, true),
        ];
        let selected = select_source(&sources).await.unwrap();
        assert_eq!(selected.kind(), SourceKind::Microphone);
    }

    #[tokio::test]
    async fn all_sources_failing_is_an_error() {
        let sources = vec![
            source(SourceKind::SystemAudio, false),
            source(SourceKind::Microphone, false),
        ];
        let err = select_source(&sources)
            .await
            .err()
            .expect("every source is down");
        assert!(matches!(err, MediaError::NoAudioSource(_)));
    }
}
