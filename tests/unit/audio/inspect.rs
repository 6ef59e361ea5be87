use super::*;
use crate::foundation::error::ClipError;
use ndarray::{ArrayD, IxDyn};

#[test]
fn one_second_at_cd_rate() {
    let audio = AudioBuffer::mono(vec![0.0; 44_100], 44_100);
    assert!((duration_seconds(&audio).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn duration_is_samples_over_rate() {
    for (len, rate) in [(0usize, 8_000i64), (1, 48_000), (12_345, 22_050), (96_000, 48_000)] {
        let audio = AudioBuffer::new(ArrayD::zeros(IxDyn(&[1, 2, len])), rate);
        let expected = len as f64 / rate as f64;
        assert!((duration_seconds(&audio).unwrap() - expected).abs() < 1e-9);
    }
}

#[test]
fn non_positive_sample_rate_is_invalid_input() {
    for rate in [0, -1, -48_000] {
        let audio = AudioBuffer::mono(vec![0.0; 10], rate);
        assert!(matches!(
            duration_seconds(&audio),
            Err(ClipError::InvalidInput(_))
        ));
    }
}

#[test]
fn repeated_calls_agree() {
    let audio = AudioBuffer::mono(vec![0.0; 1000], 3);
    assert_eq!(
        duration_seconds(&audio).unwrap(),
        duration_seconds(&audio).unwrap()
    );
}
