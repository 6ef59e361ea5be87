use super::*;

#[test]
fn float_samples_map_with_rounding() {
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(0.2), 51);
    assert_eq!(unit_to_u8(-0.3), 0);
    assert_eq!(unit_to_u8(1.7), 255);
}

#[test]
fn first_frame_ignores_later_frames() {
    let mut data = vec![0.0f32; 2 * 2 * 3];
    data[6..].fill(1.0);
    let img = ImageBuffer::from_f32((2, 1, 2, 3), data).unwrap();
    assert_eq!(img.first_frame_u8(), vec![0u8; 6]);
}

#[test]
fn u8_buffers_pass_through() {
    let data: Vec<u8> = (0..12).collect();
    let img = ImageBuffer::from_u8((1, 2, 2, 3), data.clone()).unwrap();
    assert_eq!(img.first_frame_u8(), data);
}

#[test]
fn validate_rejects_degenerate_shapes() {
    let cases = [
        ImageBuffer::from_u8((0, 2, 2, 3), vec![]).unwrap(),
        ImageBuffer::from_u8((1, 0, 2, 3), vec![]).unwrap(),
        ImageBuffer::from_u8((1, 2, 0, 3), vec![]).unwrap(),
        ImageBuffer::from_u8((1, 1, 1, 2), vec![0, 0]).unwrap(),
    ];
    for img in cases {
        assert!(matches!(img.validate(), Err(ClipError::InvalidInput(_))));
    }
}

#[test]
fn validate_rejects_nan() {
    let img = ImageBuffer::from_f32((1, 1, 1, 3), vec![0.0, f32::NAN, 0.0]).unwrap();
    assert!(matches!(img.validate(), Err(ClipError::InvalidInput(_))));
}

#[test]
fn shape_mismatch_is_invalid_input() {
    let err = ImageBuffer::from_f32((1, 2, 2, 3), vec![0.0; 5]).unwrap_err();
    assert!(matches!(err, ClipError::InvalidInput(_)));
}
