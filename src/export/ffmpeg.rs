use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::audio::buffer::{AudioBuffer, InterleavedPcm};
use crate::export::tool::{MediaTool, MuxJob};
use crate::foundation::core::CancelToken;
use crate::foundation::error::{ClipError, ClipResult};

/// Codec used for the staged audio track.
const STAGING_AUDIO_CODEC: &str = "libmp3lame";
const STAGING_AUDIO_BITRATE: &str = "320k";

/// [`MediaTool`] backed by the system `ffmpeg`/`ffprobe` binaries.
///
/// Frames and PCM are streamed to `ffmpeg` over stdin; nothing links against
/// FFmpeg libraries.
#[derive(Clone, Debug)]
pub struct FfmpegTool {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl FfmpegTool {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Return `true` when the configured `ffmpeg` can be invoked.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn ensure_available(&self) -> ClipResult<()> {
        if self.is_available() {
            return Ok(());
        }
        Err(ClipError::export_failed(format!(
            "'{}' is required for encoding, but could not be run",
            self.ffmpeg.display()
        )))
    }

    /// Decode an audio (or audio-bearing video) file at its native sample
    /// rate and channel count.
    pub fn decode_audio_file(&self, path: &Path) -> ClipResult<AudioBuffer> {
        let info = self.probe_audio(path)?;

        let out = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args([
                "-vn",
                "-f",
                "f32le",
                "-acodec",
                "pcm_f32le",
                "-ac",
                &info.channels.to_string(),
                "-ar",
                &info.sample_rate.to_string(),
                "pipe:1",
            ])
            .output()
            .map_err(|e| {
                ClipError::invalid_input(format!("failed to run ffmpeg for audio decode: {e}"))
            })?;

        if !out.status.success() {
            return Err(ClipError::invalid_input(format!(
                "ffmpeg audio decode failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        if !out.stdout.len().is_multiple_of(4) {
            return Err(ClipError::invalid_input(
                "decoded audio byte length is not aligned to f32 samples",
            ));
        }

        let pcm: Vec<f32> = out
            .stdout
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        AudioBuffer::from_interleaved(info.channels, &pcm, i64::from(info.sample_rate))
    }

    fn probe_audio(&self, path: &Path) -> ClipResult<ProbedAudio> {
        #[derive(serde::Deserialize)]
        struct ProbeStream {
            codec_type: Option<String>,
            sample_rate: Option<String>,
            channels: Option<u16>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            streams: Vec<ProbeStream>,
        }

        let out = Command::new(&self.ffprobe)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .map_err(|e| ClipError::invalid_input(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(ClipError::invalid_input(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
            .map_err(|e| ClipError::invalid_input(format!("ffprobe json parse failed: {e}")))?;
        let stream = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("audio"))
            .ok_or_else(|| {
                ClipError::invalid_input(format!("no audio stream in '{}'", path.display()))
            })?;
        let sample_rate = stream
            .sample_rate
            .as_deref()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&r| r > 0)
            .ok_or_else(|| ClipError::invalid_input("missing audio sample rate from ffprobe"))?;
        let channels = stream
            .channels
            .filter(|&c| c > 0)
            .ok_or_else(|| ClipError::invalid_input("missing audio channel count from ffprobe"))?;

        Ok(ProbedAudio {
            sample_rate,
            channels,
        })
    }
}

struct ProbedAudio {
    sample_rate: u32,
    channels: u16,
}

impl MediaTool for FfmpegTool {
    fn stage_audio(&self, pcm: &InterleavedPcm, out_path: &Path) -> ClipResult<()> {
        if pcm.sample_rate == 0 || pcm.channels == 0 {
            return Err(ClipError::invalid_input(
                "audio sample rate and channel count must be non-zero",
            ));
        }
        self.ensure_available()?;

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "f32le",
            "-ar",
            &pcm.sample_rate.to_string(),
            "-ac",
            &pcm.channels.to_string(),
            "-i",
            "pipe:0",
            "-c:a",
            STAGING_AUDIO_CODEC,
            "-b:a",
            STAGING_AUDIO_BITRATE,
        ])
        .arg(out_path);

        let mut enc = EncoderProcess::spawn(cmd, "audio staging")?;
        let mut bytes = Vec::<u8>::with_capacity(pcm.samples.len() * 4);
        for &sample in &pcm.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        if let Err(e) = enc.write(&bytes) {
            // A closed pipe means ffmpeg quit; its stderr explains why.
            return Err(enc.finish().err().unwrap_or(e));
        }
        enc.finish()
    }

    fn mux(&self, job: &MuxJob<'_>, cancel: &CancelToken) -> ClipResult<()> {
        if job.width == 0 || job.height == 0 {
            return Err(ClipError::invalid_input("frame width/height must be non-zero"));
        }
        let frame_len = job.width as usize * job.height as usize * 4;
        if job.frame_rgba.len() != frame_len {
            return Err(ClipError::invalid_input(
                "frame data size mismatch with width*height*4",
            ));
        }
        self.ensure_available()?;

        let params = job.params;
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", job.width, job.height),
            // For rawvideo input, `-r` before `-i` sets the input frame rate.
            "-r",
            &params.fps.to_string(),
            "-i",
            "pipe:0",
        ]);
        match job.audio_path {
            Some(audio) => {
                cmd.arg("-i").arg(audio).args([
                    "-map",
                    "0:v:0",
                    "-map",
                    "1:a:0",
                    "-c:a",
                    &params.audio_codec,
                    "-b:a",
                    &params.audio_bitrate,
                ]);
            }
            None => {
                cmd.arg("-an");
            }
        }
        // yuv420p needs even dimensions; pad odd sizes by one pixel.
        cmd.args([
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            &params.video_codec,
            "-pix_fmt",
            "yuv420p",
            "-t",
            &format!("{:.3}", job.duration.as_secs()),
            "-movflags",
            "+faststart",
        ])
        .arg(job.out_path);

        let frames = job.duration.frame_count(params.fps);
        tracing::debug!(
            frames,
            fps = params.fps,
            codec = %params.video_codec,
            "streaming still frame to ffmpeg"
        );

        let mut enc = EncoderProcess::spawn(cmd, "mux")?;
        for _ in 0..frames {
            if cancel.is_cancelled() {
                enc.abort();
                return Err(ClipError::Cancelled);
            }
            if let Err(e) = enc.write(job.frame_rgba) {
                return Err(enc.finish().err().unwrap_or(e));
            }
        }
        enc.finish()
    }
}

/// A running `ffmpeg` child fed through stdin, with stderr drained on a
/// helper thread so the child never blocks on a full pipe.
struct EncoderProcess {
    stage: &'static str,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl EncoderProcess {
    fn spawn(mut cmd: Command, stage: &'static str) -> ClipResult<Self> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            ClipError::export_failed(format!(
                "failed to spawn ffmpeg for {stage} (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClipError::export_failed("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ClipError::export_failed("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            stage,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
        })
    }

    fn write(&mut self, bytes: &[u8]) -> ClipResult<()> {
        let stage = self.stage;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ClipError::export_failed(format!(
                "ffmpeg {stage} input is already closed"
            )));
        };
        stdin.write_all(bytes).map_err(|e| {
            ClipError::export_failed(format!("failed to write to ffmpeg {stage} stdin: {e}"))
        })
    }

    /// Close stdin, wait for exit, and surface ffmpeg's stderr on failure.
    fn finish(mut self) -> ClipResult<()> {
        drop(self.stdin.take());
        let status = self.child.wait().map_err(|e| {
            ClipError::export_failed(format!("failed to wait for ffmpeg {}: {e}", self.stage))
        })?;
        let stderr_bytes = self.join_stderr()?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ClipError::export_failed(format!(
                "ffmpeg {} exited with status {}: {}",
                self.stage,
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    /// Kill the child and reap it. Used on cancellation.
    fn abort(mut self) {
        drop(self.stdin.take());
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited before kill");
        }
        if let Err(e) = self.child.wait() {
            tracing::warn!(error = %e, "failed to reap cancelled ffmpeg");
        }
        if let Err(e) = self.join_stderr() {
            tracing::debug!(error = %e, "stderr of cancelled ffmpeg not collected");
        }
    }

    fn join_stderr(&mut self) -> ClipResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ClipError::export_failed("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ClipError::export_failed(format!("ffmpeg stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}
