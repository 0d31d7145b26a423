//! Local/remote conference-track mixing.
//!
//! Used by the second capture source in the priority chain: when no system
//! audio is available, the doctor's own track and every remote track are
//! summed into a single mono signal. The local track is attenuated so the
//! doctor's voice does not dominate the remote patient.

pub const LOCAL_GAIN: f32 = 0.8;
pub const REMOTE_GAIN: f32 = 1.0;

/// Mix one optional local track with any number of remote tracks.
///
/// Tracks may have different lengths; the mix is as long as the longest
/// contributor and every sample is clamped to `[-1.0, 1.0]`. Returns `None`
/// when no track contributed anything, which tells the source chain to fall
/// through to the plain microphone.
pub fn mix_tracks(local: Option<&[f32]>, remote: &[Vec<f32>]) -> Option<Vec<f32>> {
    let mut connected = 0usize;
    let mut len = 0usize;

    if let Some(samples) = local {
        if !samples.is_empty() {
            connected += 1;
            len = len.max(samples.len());
        }
    }
    for track in remote {
        if !track.is_empty() {
            connected += 1;
            len = len.max(track.len());
        }
    }
    if connected == 0 {
        return None;
    }

    let mut mixed = vec![0.0f32; len];

    if let Some(samples) = local {
        for (out, sample) in mixed.iter_mut().zip(samples) {
            *out += sample * LOCAL_GAIN;
        }
    }
    for track in remote {
        for (out, sample) in mixed.iter_mut().zip(track) {
            *out += sample * REMOTE_GAIN;
        }
    }
    for sample in &mut mixed {
        *sample = sample.clamp(-1.0, 1.0);
    }

    Some(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_track_is_attenuated_remote_is_not() {
        let mixed = mix_tracks(Some(&[0.5, 0.5]), &[vec![0.2, 0.2]]).unwrap();
        assert!((mixed[0] - (0.5 * 0.8 + 0.2)).abs() < 1e-6);
    }

    #[test]
    fn hot_mix_is_clamped() {
        let mixed = mix_tracks(Some(&[1.0]), &[vec![1.0], vec![1.0]]).unwrap();
        assert_eq!(mixed[0], 1.0);

        let mixed = mix_tracks(Some(&[-1.0]), &[vec![-1.0]]).unwrap();
        assert_eq!(mixed[0], -1.0);
    }

    #[test]
    fn no_tracks_yields_none() {
        assert!(mix_tracks(None, &[]).is_none());
        assert!(mix_tracks(Some(&[]), &[vec![]]).is_none());
    }

    #[test]
    fn shorter_tracks_pad_with_silence() {
        let mixed = mix_tracks(Some(&[0.5]), &[vec![0.1, 0.1, 0.1]]).unwrap();
        assert_eq!(mixed.len(), 3);
        assert!((mixed[1] - 0.1).abs() < 1e-6);
        assert!((mixed[2] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn remote_only_mix_works() {
        let mixed = mix_tracks(None, &[vec![0.25, 0.25]]).unwrap();
        assert!((mixed[0] - 0.25).abs() < 1e-6);
    }
}
