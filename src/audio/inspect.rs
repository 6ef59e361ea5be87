use crate::audio::buffer::AudioBuffer;
use crate::foundation::error::ClipResult;

/// Playback length of `audio` in seconds: samples on the last axis divided
/// by the sample rate.
///
/// Fails with [`crate::ClipError::InvalidInput`] when the sample rate is not
/// positive.
pub fn duration_seconds(audio: &AudioBuffer) -> ClipResult<f64> {
    let rate = audio.sample_rate_hz()?;
    let samples = audio.num_samples()?;
    Ok(samples as f64 / f64::from(rate))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/inspect.rs"]
mod tests;
