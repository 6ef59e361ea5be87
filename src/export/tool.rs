use std::path::Path;

use crate::audio::buffer::InterleavedPcm;
use crate::export::request::EncodeParams;
use crate::foundation::core::{CancelToken, ClipDuration};
use crate::foundation::error::ClipResult;

/// Everything the encoder needs to write one muxed file.
#[derive(Debug)]
pub struct MuxJob<'a> {
    /// Opaque RGBA8 still frame, `width * height * 4` bytes.
    pub frame_rgba: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub duration: ClipDuration,
    /// Staged audio track. `None` writes a video-only file.
    pub audio_path: Option<&'a Path>,
    pub out_path: &'a Path,
    pub params: &'a EncodeParams,
}

/// External media collaborator: audio staging and mux-and-write.
///
/// Implementations write exactly the path they are given and report
/// failures as [`crate::ClipError::ExportFailed`] (or
/// [`crate::ClipError::Cancelled`]); file cleanup is the caller's job.
pub trait MediaTool: Send + Sync {
    /// Encode `pcm` into a compressed audio file at `out_path`.
    fn stage_audio(&self, pcm: &InterleavedPcm, out_path: &Path) -> ClipResult<()>;

    /// Encode the still frame for `job.duration` and mux in the staged audio.
    ///
    /// `cancel` is polled while frames are fed to the encoder.
    fn mux(&self, job: &MuxJob<'_>, cancel: &CancelToken) -> ClipResult<()>;
}
