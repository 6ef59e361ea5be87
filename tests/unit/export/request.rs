use super::*;

#[test]
fn defaults_match_documented_values() {
    let p = EncodeParams::default();
    assert_eq!(p.fps, 24);
    assert_eq!(p.video_codec, "libx264");
    assert_eq!(p.audio_codec, "aac");
    assert_eq!(p.audio_bitrate, "128k");
    assert!(p.validate().is_ok());
    assert_eq!(ExportRequest::default().filename_prefix, "video/ComfyUI");
}

#[test]
fn validation_catches_bad_values() {
    let cases = [
        EncodeParams {
            fps: 0,
            ..EncodeParams::default()
        },
        EncodeParams {
            fps: 61,
            ..EncodeParams::default()
        },
        EncodeParams {
            video_codec: String::new(),
            ..EncodeParams::default()
        },
        EncodeParams {
            audio_bitrate: "128 k".to_string(),
            ..EncodeParams::default()
        },
    ];
    for p in cases {
        assert!(matches!(p.validate(), Err(ClipError::InvalidInput(_))));
    }
}

#[test]
fn params_deserialize_with_defaults() {
    let p: EncodeParams = serde_json::from_str(r#"{"fps": 30}"#).unwrap();
    assert_eq!(p.fps, 30);
    assert_eq!(p.video_codec, "libx264");
    assert!(serde_json::from_str::<EncodeParams>(r#"{"fsp": 30}"#).is_err());
}

#[test]
fn ui_payload_has_host_shape() {
    let result = ExportResult {
        filename: "clip_00001_.mp4".to_string(),
        subfolder: "test".to_string(),
        kind: OUTPUT_TYPE.to_string(),
        path: PathBuf::from("/tmp/out/test/clip_00001_.mp4"),
    };
    let payload = result.ui_payload();
    assert_eq!(
        payload,
        serde_json::json!({
            "ui": { "video": [{
                "filename": "clip_00001_.mp4",
                "subfolder": "test",
                "type": "output"
            }]}
        })
    );
}
