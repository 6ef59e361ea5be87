use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::audio::buffer::AudioBuffer;
use crate::config::ExporterConfig;
use crate::export::ffmpeg::FfmpegTool;
use crate::export::naming::resolve_prefix;
use crate::export::request::{ExportRequest, ExportResult, OUTPUT_TYPE};
use crate::export::staging::StagingFile;
use crate::export::tool::{MediaTool, MuxJob};
use crate::foundation::core::CancelToken;
use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::adapter::VisualClip;

/// Writes muxed clip files under one output directory.
///
/// Exporters hold no per-export state and can be shared across threads;
/// concurrent exports coordinate only through the filesystem.
#[derive(Clone)]
pub struct ClipExporter {
    output_dir: PathBuf,
    background_rgba: [u8; 4],
    tool: Arc<dyn MediaTool>,
}

impl std::fmt::Debug for ClipExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipExporter")
            .field("output_dir", &self.output_dir)
            .field("background_rgba", &self.background_rgba)
            .finish_non_exhaustive()
    }
}

impl ClipExporter {
    pub fn new(output_dir: impl Into<PathBuf>, tool: Arc<dyn MediaTool>) -> Self {
        Self {
            output_dir: output_dir.into(),
            background_rgba: [0, 0, 0, 255],
            tool,
        }
    }

    /// Exporter driven by the `ffmpeg`/`ffprobe` binaries named in `cfg`.
    pub fn from_config(cfg: &ExporterConfig) -> Self {
        let tool = FfmpegTool::new(&cfg.ffmpeg_path, &cfg.ffprobe_path);
        Self::new(&cfg.output_dir, Arc::new(tool)).with_background(cfg.background_rgba)
    }

    /// Colour that transparent pixels are flattened over.
    pub fn with_background(mut self, rgba: [u8; 4]) -> Self {
        self.background_rgba = rgba;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Mux `clip` with `audio` into `<prefix>_<NNNNN>_.mp4`.
    ///
    /// The clip is consumed and released once encoding ends. The staged
    /// audio file is always removed; on failure or cancellation the output
    /// file is removed too.
    #[tracing::instrument(skip_all, fields(prefix = %request.filename_prefix))]
    pub fn export(
        &self,
        clip: VisualClip,
        audio: &AudioBuffer,
        request: &ExportRequest,
        cancel: &CancelToken,
    ) -> ClipResult<ExportResult> {
        request.params.validate()?;
        let pcm = audio.to_interleaved()?;
        let frame = clip.encoder_frame(self.background_rgba)?;

        let target = resolve_prefix(
            &self.output_dir,
            &request.filename_prefix,
            clip.width(),
            clip.height(),
        )?;
        std::fs::create_dir_all(&target.full_output_folder).map_err(|e| {
            ClipError::export_failed(format!(
                "failed to create output directory '{}': {e}",
                target.full_output_folder.display()
            ))
        })?;

        let reservation = target.reserve("mp4")?;
        let staging = StagingFile::new(target.file_path(reservation.counter(), "mp3"));

        let outcome = (|| -> ClipResult<()> {
            let audio_path = if pcm.samples.is_empty() {
                tracing::debug!("audio is empty, exporting without an audio track");
                None
            } else {
                self.tool.stage_audio(&pcm, staging.path())?;
                Some(staging.path())
            };
            if cancel.is_cancelled() {
                return Err(ClipError::Cancelled);
            }
            let job = MuxJob {
                frame_rgba: &frame,
                width: clip.width(),
                height: clip.height(),
                duration: clip.duration(),
                audio_path,
                out_path: reservation.path(),
                params: &request.params,
            };
            self.tool.mux(&job, cancel)
        })();

        let duration = clip.duration();
        drop(frame);
        drop(clip);

        if let Err(e) = staging.remove() {
            tracing::warn!(error = %e, "staging audio cleanup failed");
        }

        match outcome {
            Ok(()) => {
                let file_name = reservation.file_name().to_string();
                let path = reservation.commit();
                tracing::info!(
                    path = %path.display(),
                    duration = duration.as_secs(),
                    "exported clip"
                );
                Ok(ExportResult {
                    filename: file_name,
                    subfolder: target.subfolder,
                    kind: OUTPUT_TYPE.to_string(),
                    path,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, file = reservation.file_name(), "export failed");
                drop(reservation);
                Err(e)
            }
        }
    }
}
