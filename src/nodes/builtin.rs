use std::sync::Arc;

use crate::audio::inspect::duration_seconds;
use crate::export::exporter::ClipExporter;
use crate::export::request::{DEFAULT_FILENAME_PREFIX, EncodeParams, ExportRequest, MAX_FPS, MIN_FPS};
use crate::foundation::core::{CLIP_DURATION_STEP, CancelToken, MAX_CLIP_SECS};
use crate::foundation::error::{ClipError, ClipResult};
use crate::frame::adapter::{ClipOptions, create_clip};
use crate::nodes::registry::{Node, NodeDescriptor, NodeOutput, NodeRegistry};
use crate::nodes::schema::{NodeInputs, NodeValue, ParamDecl, ParamSpec};

/// Register `ImageClipNode`, `AudioDurationNode` and `SaveVideo`.
///
/// `defaults` seeds the encoder parameters advertised by `SaveVideo`.
pub fn register_builtin_nodes(
    registry: &mut NodeRegistry,
    exporter: Arc<ClipExporter>,
    defaults: &EncodeParams,
) -> ClipResult<()> {
    registry.register(Box::new(ImageClipNode::new()))?;
    registry.register(Box::new(AudioDurationNode::new()))?;
    registry.register(Box::new(SaveVideoNode::new(exporter, defaults)))?;
    Ok(())
}

/// Image tensor → still-frame clip.
pub struct ImageClipNode {
    descriptor: NodeDescriptor,
}

impl ImageClipNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeDescriptor {
                class_name: "ImageClipNode",
                display_name: "Image Clip Node",
                category: "Media Processing",
                inputs: vec![
                    ParamDecl::new("image", ParamSpec::Image),
                    ParamDecl::new("is_mask", ParamSpec::Bool { default: false }),
                    ParamDecl::new("transparent", ParamSpec::Bool { default: true }),
                    ParamDecl::new("fromalpha", ParamSpec::Bool { default: false }),
                    ParamDecl::new(
                        "duration",
                        ParamSpec::Float {
                            default: 1.0,
                            min: CLIP_DURATION_STEP,
                            max: MAX_CLIP_SECS,
                            step: CLIP_DURATION_STEP,
                        },
                    ),
                ],
                return_types: vec!["VideoCLIP"],
                output_node: false,
            },
        }
    }
}

impl Default for ImageClipNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for ImageClipNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut inputs: NodeInputs, _cancel: &CancelToken) -> ClipResult<NodeOutput> {
        let image = inputs.take_image("image")?;
        let options = ClipOptions {
            is_mask: inputs.take_bool("is_mask")?,
            transparent: inputs.take_bool("transparent")?,
            from_alpha: inputs.take_bool("fromalpha")?,
            preview: None,
        };
        let duration = inputs.take_float("duration")?;
        let clip = create_clip(&image, duration, &options)?;
        Ok(NodeOutput::Values(vec![NodeValue::Clip(clip)]))
    }
}

/// Audio buffer → duration in seconds.
pub struct AudioDurationNode {
    descriptor: NodeDescriptor,
}

impl AudioDurationNode {
    pub fn new() -> Self {
        Self {
            descriptor: NodeDescriptor {
                class_name: "AudioDurationNode",
                display_name: "Audio Duration Node",
                category: "audio",
                inputs: vec![ParamDecl::new("audio", ParamSpec::Audio)],
                return_types: vec!["FLOAT"],
                output_node: false,
            },
        }
    }
}

impl Default for AudioDurationNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for AudioDurationNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut inputs: NodeInputs, _cancel: &CancelToken) -> ClipResult<NodeOutput> {
        let audio = inputs.take_audio("audio")?;
        let secs = duration_seconds(&audio)?;
        Ok(NodeOutput::Values(vec![NodeValue::Float(secs)]))
    }
}

/// Clip + audio → muxed file on disk. Output node.
pub struct SaveVideoNode {
    descriptor: NodeDescriptor,
    exporter: Arc<ClipExporter>,
}

impl SaveVideoNode {
    pub fn new(exporter: Arc<ClipExporter>, defaults: &EncodeParams) -> Self {
        Self {
            descriptor: NodeDescriptor {
                class_name: "SaveVideo",
                display_name: "Save Video Node",
                category: "video",
                inputs: vec![
                    ParamDecl::new("video_clip", ParamSpec::Clip),
                    ParamDecl::new("audio", ParamSpec::Audio),
                    ParamDecl::new(
                        "filename_prefix",
                        ParamSpec::Str {
                            default: DEFAULT_FILENAME_PREFIX.to_string(),
                        },
                    ),
                    ParamDecl::new(
                        "fps",
                        ParamSpec::Int {
                            default: i64::from(defaults.fps),
                            min: i64::from(MIN_FPS),
                            max: i64::from(MAX_FPS),
                        },
                    ),
                    ParamDecl::new(
                        "codec",
                        ParamSpec::Str {
                            default: defaults.video_codec.clone(),
                        },
                    ),
                    ParamDecl::new(
                        "audio_codec",
                        ParamSpec::Str {
                            default: defaults.audio_codec.clone(),
                        },
                    ),
                    ParamDecl::new(
                        "audio_bitrate",
                        ParamSpec::Str {
                            default: defaults.audio_bitrate.clone(),
                        },
                    ),
                ],
                return_types: vec![],
                output_node: true,
            },
            exporter,
        }
    }
}

impl Node for SaveVideoNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut inputs: NodeInputs, cancel: &CancelToken) -> ClipResult<NodeOutput> {
        let clip = inputs.take_clip("video_clip")?;
        let audio = inputs.take_audio("audio")?;
        let fps = inputs.take_int("fps")?;
        let request = ExportRequest {
            filename_prefix: inputs.take_str("filename_prefix")?,
            params: EncodeParams {
                fps: u32::try_from(fps)
                    .map_err(|_| ClipError::invalid_input(format!("fps out of range: {fps}")))?,
                video_codec: inputs.take_str("codec")?,
                audio_codec: inputs.take_str("audio_codec")?,
                audio_bitrate: inputs.take_str("audio_bitrate")?,
            },
        };
        let result = self.exporter.export(clip, &audio, &request, cancel)?;
        Ok(NodeOutput::Ui(result.ui_payload()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/builtin.rs"]
mod tests;
