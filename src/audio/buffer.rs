use ndarray::{Array1, ArrayD, ArrayView2, Axis, Ix2, IxDyn};

use crate::foundation::error::{ClipError, ClipResult};

/// Waveform plus sample rate, as handed over by the host.
///
/// Accepted layouts: `(samples)`, `(channels, samples)` and
/// `(batch, channels, samples)`. The sample rate is kept signed so that
/// non-positive host values survive until validation.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    pub waveform: ArrayD<f32>,
    pub sample_rate: i64,
}

/// Interleaved PCM pulled out of an [`AudioBuffer`] for encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct InterleavedPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioBuffer {
    pub fn new(waveform: ArrayD<f32>, sample_rate: i64) -> Self {
        Self {
            waveform,
            sample_rate,
        }
    }

    /// Single-channel buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: i64) -> Self {
        let waveform = Array1::from(samples).insert_axis(Axis(0)).into_dyn();
        Self::new(waveform, sample_rate)
    }

    /// Build a `(channels, samples)` buffer from interleaved samples.
    pub fn from_interleaved(channels: u16, data: &[f32], sample_rate: i64) -> ClipResult<Self> {
        if channels == 0 {
            return Err(ClipError::invalid_input("audio channel count must be non-zero"));
        }
        let ch = usize::from(channels);
        if !data.len().is_multiple_of(ch) {
            return Err(ClipError::invalid_input(format!(
                "interleaved audio length {} is not a multiple of {ch} channels",
                data.len()
            )));
        }
        let frames = data.len() / ch;
        let mut planar = Vec::with_capacity(data.len());
        for c in 0..ch {
            planar.extend(data.iter().skip(c).step_by(ch).copied());
        }
        let waveform = ArrayD::from_shape_vec(IxDyn(&[ch, frames]), planar)
            .map_err(|e| ClipError::invalid_input(format!("audio buffer shape mismatch: {e}")))?;
        Ok(Self::new(waveform, sample_rate))
    }

    /// Length of the last (time) axis.
    pub fn num_samples(&self) -> ClipResult<usize> {
        self.waveform
            .shape()
            .last()
            .copied()
            .ok_or_else(|| ClipError::invalid_input("audio waveform has no sample axis"))
    }

    /// Sample rate as a positive `u32`.
    pub fn sample_rate_hz(&self) -> ClipResult<u32> {
        if self.sample_rate <= 0 {
            return Err(ClipError::invalid_input(format!(
                "audio sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        u32::try_from(self.sample_rate).map_err(|_| {
            ClipError::invalid_input(format!(
                "audio sample rate {} is out of range",
                self.sample_rate
            ))
        })
    }

    /// Channel-interleaved samples for the encoder. Batched waveforms
    /// contribute their first item only.
    pub fn to_interleaved(&self) -> ClipResult<InterleavedPcm> {
        let sample_rate = self.sample_rate_hz()?;
        let planar = self.planar_view()?;
        let (channels, frames) = planar.dim();
        if channels == 0 {
            return Err(ClipError::invalid_input("audio waveform has no channels"));
        }
        let channels_u16 = u16::try_from(channels).map_err(|_| {
            ClipError::invalid_input(format!("audio has too many channels ({channels})"))
        })?;

        let mut samples = Vec::with_capacity(channels * frames);
        for frame in planar.axis_iter(Axis(1)) {
            samples.extend(frame.iter().copied());
        }

        Ok(InterleavedPcm {
            sample_rate,
            channels: channels_u16,
            samples,
        })
    }

    fn planar_view(&self) -> ClipResult<ArrayView2<'_, f32>> {
        let view = self.waveform.view();
        let planar = match view.ndim() {
            1 => view.insert_axis(Axis(0)),
            2 => view,
            3 => {
                if view.shape()[0] == 0 {
                    return Err(ClipError::invalid_input("audio batch is empty"));
                }
                view.index_axis_move(Axis(0), 0)
            }
            n => {
                return Err(ClipError::invalid_input(format!(
                    "audio waveform must have 1 to 3 dimensions, got {n}"
                )));
            }
        };
        planar
            .into_dimensionality::<Ix2>()
            .map_err(|e| ClipError::invalid_input(format!("audio waveform layout: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/buffer.rs"]
mod tests;
