use super::*;
use crate::audio::buffer::{AudioBuffer, InterleavedPcm};
use crate::export::tool::{MediaTool, MuxJob};
use crate::frame::tensor::ImageBuffer;
use std::path::Path;

struct TouchTool;

impl MediaTool for TouchTool {
    fn stage_audio(&self, _pcm: &InterleavedPcm, out_path: &Path) -> ClipResult<()> {
        std::fs::write(out_path, b"mp3").map_err(|e| ClipError::export_failed(e.to_string()))
    }

    fn mux(&self, job: &MuxJob<'_>, _cancel: &CancelToken) -> ClipResult<()> {
        std::fs::write(job.out_path, b"mp4").map_err(|e| ClipError::export_failed(e.to_string()))
    }
}

fn registry(dir: &Path) -> NodeRegistry {
    let exporter = Arc::new(ClipExporter::new(dir, Arc::new(TouchTool)));
    let mut registry = NodeRegistry::new();
    register_builtin_nodes(&mut registry, exporter, &EncodeParams::default()).unwrap();
    registry
}

fn gray_image() -> ImageBuffer {
    ImageBuffer::from_f32((1, 4, 4, 3), vec![0.5; 48]).unwrap()
}

#[test]
fn builtin_nodes_register_with_display_names() {
    let dir = tempfile::tempdir().unwrap();
    let reg = registry(dir.path());
    assert_eq!(reg.len(), 3);
    assert_eq!(reg.display_name("ImageClipNode"), Some("Image Clip Node"));
    assert_eq!(reg.display_name("AudioDurationNode"), Some("Audio Duration Node"));
    assert_eq!(reg.display_name("SaveVideo"), Some("Save Video Node"));
    assert!(reg.get("SaveVideo").unwrap().descriptor().output_node);
}

#[test]
fn registering_twice_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry(dir.path());
    assert!(reg.register(Box::new(ImageClipNode::new())).is_err());
}

#[test]
fn image_clip_node_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let reg = registry(dir.path());
    let out = reg
        .run(
            "ImageClipNode",
            NodeInputs::new().with("image", NodeValue::Image(gray_image())),
            &CancelToken::new(),
        )
        .unwrap();
    let NodeOutput::Values(values) = out else {
        panic!("expected socket values");
    };
    let [NodeValue::Clip(clip)] = values.as_slice() else {
        panic!("expected a single clip");
    };
    assert_eq!(clip.duration().as_secs(), 1.0);
    assert_eq!(&clip.pixels()[..4], &[128, 128, 128, 255]);
}

#[test]
fn image_clip_node_rejects_out_of_range_duration() {
    let dir = tempfile::tempdir().unwrap();
    let reg = registry(dir.path());
    let err = reg
        .run(
            "ImageClipNode",
            NodeInputs::new()
                .with("image", NodeValue::Image(gray_image()))
                .with("duration", NodeValue::Float(12.0)),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ClipError::InvalidInput(_)));
}

#[test]
fn audio_duration_node_reports_seconds() {
    let dir = tempfile::tempdir().unwrap();
    let reg = registry(dir.path());
    let audio = AudioBuffer::mono(vec![0.0; 22_050], 44_100);
    let out = reg
        .run(
            "AudioDurationNode",
            NodeInputs::new().with("audio", NodeValue::Audio(audio)),
            &CancelToken::new(),
        )
        .unwrap();
    let NodeOutput::Values(values) = out else {
        panic!("expected socket values");
    };
    assert!(matches!(values.as_slice(), [NodeValue::Float(s)] if (*s - 0.5).abs() < 1e-9));
}

#[test]
fn save_video_node_returns_ui_payload() {
    let dir = tempfile::tempdir().unwrap();
    let reg = registry(dir.path());
    let clip = create_clip(&gray_image(), 1.0, &ClipOptions::default()).unwrap();
    let out = reg
        .run(
            "SaveVideo",
            NodeInputs::new()
                .with("video_clip", NodeValue::Clip(clip))
                .with("audio", NodeValue::Audio(AudioBuffer::mono(vec![0.0; 8], 8)))
                .with("filename_prefix", NodeValue::Str("test/clip".into())),
            &CancelToken::new(),
        )
        .unwrap();
    let NodeOutput::Ui(payload) = out else {
        panic!("expected ui payload");
    };
    assert_eq!(payload["ui"]["video"][0]["filename"], "clip_00001_.mp4");
    assert_eq!(payload["ui"]["video"][0]["subfolder"], "test");
    assert_eq!(payload["ui"]["video"][0]["type"], "output");
    assert!(dir.path().join("test").join("clip_00001_.mp4").exists());
}

#[test]
fn save_video_node_rejects_zero_fps() {
    let dir = tempfile::tempdir().unwrap();
    let reg = registry(dir.path());
    let clip = create_clip(&gray_image(), 1.0, &ClipOptions::default()).unwrap();
    let err = reg
        .run(
            "SaveVideo",
            NodeInputs::new()
                .with("video_clip", NodeValue::Clip(clip))
                .with("audio", NodeValue::Audio(AudioBuffer::mono(vec![0.0; 8], 8)))
                .with("fps", NodeValue::Int(0)),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ClipError::InvalidInput(_)));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn unknown_node_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let reg = registry(dir.path());
    assert!(matches!(
        reg.run("Nope", NodeInputs::new(), &CancelToken::new()),
        Err(ClipError::InvalidInput(_))
    ));
}
