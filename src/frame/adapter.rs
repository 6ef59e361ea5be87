use std::path::{Path, PathBuf};

use crate::foundation::core::ClipDuration;
use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::tensor::ImageBuffer;

/// How the adapter interprets the source image.
///
/// Every flag has a fixed, documented effect; there is no open-ended
/// pass-through to the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipOptions {
    /// Treat the clip as a grayscale mask: each pixel becomes a single
    /// luminance value replicated across RGB, fully opaque.
    pub is_mask: bool,
    /// Keep the source alpha channel (4-channel input only). Alpha is
    /// flattened over the exporter's background colour at encode time.
    /// When `false` the clip is opaque.
    pub transparent: bool,
    /// Mask clips read their values from the source alpha channel instead of
    /// luminance. Requires `is_mask` and a 4-channel source.
    pub from_alpha: bool,
    /// Write a PNG of the converted frame here. Diagnostic only.
    pub preview: Option<PathBuf>,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            is_mask: false,
            transparent: true,
            from_alpha: false,
            preview: None,
        }
    }
}

/// A still frame with a playback duration, ready for the exporter.
///
/// Pixels are straight-alpha RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct VisualClip {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
    duration: ClipDuration,
    options: ClipOptions,
}

impl VisualClip {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn duration(&self) -> ClipDuration {
        self.duration
    }

    pub fn options(&self) -> &ClipOptions {
        &self.options
    }

    /// Straight-alpha RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.rgba8
    }

    /// Whether any pixel is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.rgba8.chunks_exact(4).any(|px| px[3] != 255)
    }

    /// Opaque RGBA8 frame for the encoder, alpha flattened over `bg_rgba`.
    pub fn encoder_frame(&self, bg_rgba: [u8; 4]) -> ClipResult<Vec<u8>> {
        let mut out = vec![0u8; self.rgba8.len()];
        flatten_straight_over_bg(&mut out, &self.rgba8, bg_rgba)?;
        Ok(out)
    }

    /// Save the clip's frame as PNG.
    pub fn save_preview(&self, path: &Path) -> ClipResult<()> {
        use anyhow::Context as _;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create preview dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.rgba8,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write preview png '{}'", path.display()))?;
        Ok(())
    }
}

/// Build a still-frame clip of `duration_secs` from the first frame of `image`.
pub fn create_clip(
    image: &ImageBuffer,
    duration_secs: f64,
    options: &ClipOptions,
) -> ClipResult<VisualClip> {
    let duration = ClipDuration::new(duration_secs)?;
    let shape = image.validate()?;

    if options.from_alpha {
        if !options.is_mask {
            return Err(ClipError::invalid_input(
                "from_alpha requires is_mask to be enabled",
            ));
        }
        if shape.channels != 4 {
            return Err(ClipError::invalid_input(format!(
                "from_alpha requires a 4-channel image, got {} channels",
                shape.channels
            )));
        }
    }
    if shape.frames > 1 {
        tracing::debug!(
            frames = shape.frames,
            "image buffer has multiple frames; only the first is used"
        );
    }

    let width = u32::try_from(shape.width)
        .map_err(|_| ClipError::invalid_input("image width exceeds u32"))?;
    let height = u32::try_from(shape.height)
        .map_err(|_| ClipError::invalid_input("image height exceeds u32"))?;

    let samples = image.first_frame_u8();
    let rgba8 = expand_to_rgba8(&samples, shape.channels, options);

    let clip = VisualClip {
        width,
        height,
        rgba8,
        duration,
        options: options.clone(),
    };

    tracing::debug!(
        width,
        height,
        duration = duration.as_secs(),
        is_mask = options.is_mask,
        "created visual clip"
    );

    if let Some(path) = options.preview.as_deref()
        && let Err(e) = clip.save_preview(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "clip preview not written");
    }

    Ok(clip)
}

fn expand_to_rgba8(samples: &[u8], channels: usize, options: &ClipOptions) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() / channels * 4);
    for px in samples.chunks_exact(channels) {
        let (r, g, b, a) = match px {
            [v] => (*v, *v, *v, 255),
            [r, g, b] => (*r, *g, *b, 255),
            [r, g, b, a] => (*r, *g, *b, *a),
            _ => unreachable!("channel count validated by ImageBuffer::validate"),
        };

        if options.is_mask {
            let v = if options.from_alpha {
                a
            } else {
                luma(r, g, b)
            };
            out.extend_from_slice(&[v, v, v, 255]);
        } else if options.transparent {
            out.extend_from_slice(&[r, g, b, a]);
        } else {
            out.extend_from_slice(&[r, g, b, 255]);
        }
    }
    out
}

/// Rec. 601 luma.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((y + 500) / 1000) as u8
}

fn flatten_straight_over_bg(dst: &mut [u8], src: &[u8], bg_rgba: [u8; 4]) -> ClipResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ClipError::invalid_input(
            "flatten_straight_over_bg expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let r = mul_div255(s[0] as u16, a) + mul_div255(bg_r, inv);
        let g = mul_div255(s[1] as u16, a) + mul_div255(bg_g, inv);
        let b = mul_div255(s[2] as u16, a) + mul_div255(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/frame/adapter.rs"]
mod tests;
