use ndarray::{Array4, ArrayView3, Axis};

use crate::foundation::error::{ClipError, ClipResult};

/// Dense image tensor laid out as `(frames, height, width, channels)`.
///
/// `F32` buffers carry values in `[0, 1]`, `U8` buffers carry `[0, 255]`.
#[derive(Clone, Debug)]
pub enum ImageBuffer {
    F32(Array4<f32>),
    U8(Array4<u8>),
}

/// Shape summary of an [`ImageBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageShape {
    pub frames: usize,
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageBuffer {
    /// Build a float buffer from a flat row-major vector.
    pub fn from_f32(shape: (usize, usize, usize, usize), data: Vec<f32>) -> ClipResult<Self> {
        Array4::from_shape_vec(shape, data)
            .map(Self::F32)
            .map_err(|e| ClipError::invalid_input(format!("image buffer shape mismatch: {e}")))
    }

    /// Build an 8-bit buffer from a flat row-major vector.
    pub fn from_u8(shape: (usize, usize, usize, usize), data: Vec<u8>) -> ClipResult<Self> {
        Array4::from_shape_vec(shape, data)
            .map(Self::U8)
            .map_err(|e| ClipError::invalid_input(format!("image buffer shape mismatch: {e}")))
    }

    pub fn shape(&self) -> ImageShape {
        let dim = match self {
            Self::F32(a) => a.dim(),
            Self::U8(a) => a.dim(),
        };
        ImageShape {
            frames: dim.0,
            height: dim.1,
            width: dim.2,
            channels: dim.3,
        }
    }

    /// Check the buffer can be turned into pixels.
    ///
    /// Rejects empty frame/spatial axes, channel counts other than 1/3/4 and
    /// non-finite float samples.
    pub fn validate(&self) -> ClipResult<ImageShape> {
        let shape = self.shape();
        if shape.frames == 0 {
            return Err(ClipError::invalid_input("image buffer has no frames"));
        }
        if shape.height == 0 || shape.width == 0 {
            return Err(ClipError::invalid_input(format!(
                "image buffer has zero spatial dimensions ({}x{})",
                shape.width, shape.height
            )));
        }
        if !matches!(shape.channels, 1 | 3 | 4) {
            return Err(ClipError::invalid_input(format!(
                "image buffer must have 1, 3 or 4 channels, got {}",
                shape.channels
            )));
        }
        if let Self::F32(a) = self
            && a.index_axis(Axis(0), 0).iter().any(|v| !v.is_finite())
        {
            return Err(ClipError::invalid_input(
                "image buffer contains non-numeric (NaN/inf) values",
            ));
        }
        Ok(shape)
    }

    /// Convert the first frame to 8-bit samples, keeping the source channel count.
    ///
    /// Floats are clamped to `[0, 1]` and mapped with `round(v * 255)`.
    pub(crate) fn first_frame_u8(&self) -> Vec<u8> {
        match self {
            Self::F32(a) => frame_view_to_u8(a.index_axis(Axis(0), 0)),
            Self::U8(a) => a.index_axis(Axis(0), 0).iter().copied().collect(),
        }
    }
}

fn frame_view_to_u8(frame: ArrayView3<'_, f32>) -> Vec<u8> {
    frame.iter().map(|&v| unit_to_u8(v)).collect()
}

pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/frame/tensor.rs"]
mod tests;
