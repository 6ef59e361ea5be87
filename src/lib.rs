//! clipmux turns still images and audio buffers into muxed video files.
//!
//! The pipeline has three stages:
//!
//! 1. **Frame Adapter**: [`ImageBuffer`] (`(frames, h, w, c)`, float `[0,1]` or `u8`)
//!    → [`VisualClip`] with a validated duration ([`create_clip`]).
//! 2. **Audio Inspector**: [`AudioBuffer`] → seconds ([`duration_seconds`]).
//! 3. **Clip Exporter**: [`VisualClip`] + [`AudioBuffer`] → `<prefix>_<NNNNN>_.mp4`
//!    ([`ClipExporter::export`]). Audio is staged to a temporary `.mp3`, the
//!    still frame is streamed to the system `ffmpeg`, and every temporary or
//!    partial file is removed on failure.
//!
//! The node layer ([`NodeRegistry`], [`register_builtin_nodes`]) wraps the stages
//! as host nodes with declared, re-validated parameter schemas.
#![forbid(unsafe_code)]

mod audio;
mod export;
mod foundation;
mod frame;
mod nodes;

/// Exporter configuration.
pub mod config;

pub use crate::audio::buffer::{AudioBuffer, InterleavedPcm};
pub use crate::audio::inspect::duration_seconds;
pub use crate::config::ExporterConfig;
pub use crate::export::exporter::ClipExporter;
pub use crate::export::ffmpeg::FfmpegTool;
pub use crate::export::naming::{OutputReservation, OutputTarget, resolve_prefix};
pub use crate::export::request::{
    DEFAULT_FILENAME_PREFIX, EncodeParams, ExportRequest, ExportResult, MAX_FPS, MIN_FPS,
    OUTPUT_TYPE,
};
pub use crate::export::tool::{MediaTool, MuxJob};
pub use crate::foundation::core::{CLIP_DURATION_STEP, CancelToken, ClipDuration, MAX_CLIP_SECS};
pub use crate::foundation::error::{ClipError, ClipResult};
pub use crate::frame::adapter::{ClipOptions, VisualClip, create_clip};
pub use crate::frame::tensor::{ImageBuffer, ImageShape};
pub use crate::nodes::builtin::{
    AudioDurationNode, ImageClipNode, SaveVideoNode, register_builtin_nodes,
};
pub use crate::nodes::registry::{Node, NodeDescriptor, NodeOutput, NodeRegistry};
pub use crate::nodes::schema::{NodeInputs, NodeValue, ParamDecl, ParamSpec};
