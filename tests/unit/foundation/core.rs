use super::*;

#[test]
fn duration_accepts_grid_values_exactly() {
    for secs in [0.1, 1.0, 2.3, 9.9, 10.0] {
        let d = ClipDuration::new(secs).unwrap();
        assert_eq!(d.as_secs(), secs);
    }
}

#[test]
fn duration_rejects_out_of_range_and_off_grid() {
    for secs in [0.0, -1.0, 10.1, 12.0, 2.35, f64::NAN, f64::INFINITY] {
        let err = ClipDuration::new(secs).unwrap_err();
        assert!(matches!(err, ClipError::InvalidInput(_)), "{secs}: {err}");
    }
}

#[test]
fn frame_count_rounds_up_without_float_noise() {
    assert_eq!(ClipDuration::new(2.0).unwrap().frame_count(24), 48);
    assert_eq!(ClipDuration::new(0.1).unwrap().frame_count(24), 3);
    assert_eq!(ClipDuration::new(0.1).unwrap().frame_count(1), 1);
    assert_eq!(ClipDuration::new(0.3).unwrap().frame_count(30), 9);
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let a = CancelToken::new();
    let b = a.clone();
    assert!(!b.is_cancelled());
    a.cancel();
    assert!(b.is_cancelled());
}
