use super::*;

#[test]
fn num_samples_reads_last_axis() {
    let batched = AudioBuffer::new(ArrayD::zeros(IxDyn(&[1, 2, 300])), 100);
    assert_eq!(batched.num_samples().unwrap(), 300);

    let flat = AudioBuffer::new(ArrayD::zeros(IxDyn(&[17])), 100);
    assert_eq!(flat.num_samples().unwrap(), 17);
}

#[test]
fn scalar_waveform_has_no_sample_axis() {
    let scalar = AudioBuffer::new(ArrayD::zeros(IxDyn(&[])), 100);
    assert!(matches!(
        scalar.num_samples(),
        Err(ClipError::InvalidInput(_))
    ));
}

#[test]
fn interleave_round_trips_through_planar_layout() {
    let data = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
    let buf = AudioBuffer::from_interleaved(2, &data, 48_000).unwrap();
    assert_eq!(buf.waveform.shape(), &[2, 3]);

    let pcm = buf.to_interleaved().unwrap();
    assert_eq!(pcm.channels, 2);
    assert_eq!(pcm.sample_rate, 48_000);
    assert_eq!(pcm.samples, data.to_vec());
}

#[test]
fn batched_waveform_uses_first_item() {
    let mut wave = ArrayD::zeros(IxDyn(&[2, 1, 3]));
    wave[[1, 0, 0]] = 1.0;
    wave[[0, 0, 2]] = 0.5;
    let pcm = AudioBuffer::new(wave, 8_000).to_interleaved().unwrap();
    assert_eq!(pcm.channels, 1);
    assert_eq!(pcm.samples, vec![0.0, 0.0, 0.5]);
}

#[test]
fn mono_helper_is_single_channel() {
    let buf = AudioBuffer::mono(vec![0.0; 10], 10);
    assert_eq!(buf.waveform.shape(), &[1, 10]);
}

#[test]
fn non_positive_rate_and_bad_layouts_are_rejected() {
    assert!(AudioBuffer::mono(vec![0.0], 0).sample_rate_hz().is_err());
    assert!(AudioBuffer::mono(vec![0.0], -44_100).to_interleaved().is_err());
    assert!(
        AudioBuffer::new(ArrayD::zeros(IxDyn(&[1, 1, 1, 4])), 10)
            .to_interleaved()
            .is_err()
    );
    assert!(AudioBuffer::from_interleaved(2, &[0.0; 3], 10).is_err());
    assert!(AudioBuffer::from_interleaved(0, &[], 10).is_err());
}
