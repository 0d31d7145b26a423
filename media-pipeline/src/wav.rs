//! Canonical WAV (16-bit PCM) encoding via `hound`.

use crate::error::{MediaError, MediaResult};
use std::io::Cursor;

/// Decoded audio, mono or interleaved, float samples nominally in
/// `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl PcmAudio {
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels: 1,
            samples,
        }
    }
}

/// Encode decoded PCM as a 16-bit WAV file in memory.
///
/// Samples outside `[-1.0, 1.0]` are clamped rather than wrapped; asymmetric
/// scaling (0x8000 down, 0x7FFF up) matches the canonical form the ingestion
/// side expects.
pub fn encode_wav(pcm: &PcmAudio) -> MediaResult<Vec<u8>> {
    if pcm.samples.is_empty() || pcm.channels == 0 || pcm.sample_rate == 0 {
        return Err(MediaError::WavEncoding("empty or malformed PCM".to_string()));
    }

    let spec = hound::WavSpec {
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| MediaError::WavEncoding(e.to_string()))?;
        for &sample in &pcm.samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let quantized = if clamped < 0.0 {
                (clamped * 32768.0) as i16
            } else {
                (clamped * 32767.0) as i16
            };
            writer
                .write_sample(quantized)
                .map_err(|e| MediaError::WavEncoding(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| MediaError::WavEncoding(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_riff_wave_header() {
        let wav = encode_wav(&PcmAudio::mono(48_000, vec![0.0, 0.5, -0.5])).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 3 samples, 16-bit mono: 44-byte header + 6 data bytes.
        assert_eq!(wav.len(), 50);
    }

    #[test]
    fn samples_are_quantized_and_clamped() {
        let wav = encode_wav(&PcmAudio::mono(8_000, vec![1.0, -1.0, 2.0, -2.0, 0.0])).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![32767, -32768, 32767, -32768, 0]);
    }

    #[test]
    fn stereo_spec_is_preserved() {
        let pcm = PcmAudio {
            sample_rate: 44_100,
            channels: 2,
            samples: vec![0.1, 0.2, 0.3, 0.4],
        };
        let wav = encode_wav(&pcm).unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 44_100);
        assert_eq!(reader.spec().bits_per_sample, 16);
    }

    #[test]
    fn rejects_empty_pcm() {
        assert!(encode_wav(&PcmAudio::mono(48_000, vec![])).is_err());
    }
}
