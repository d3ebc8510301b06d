use math::Vector;
use crate::*;
use super::*;

fn fast_config() -> GyroCalibrationConfig {
    GyroCalibrationConfig { sample_period_us: 0, ..GyroCalibrationConfig::default() }
}

#[test]
fn constant_stream_gives_exact_bias() {
    let bias = Vector::new(12.0, -7.0, 3.0);
    let estimate = estimate_bias(std::iter::repeat(bias).take(500), DEFAULT_MAX_OUTLIER_DEVIATION);
    assert!(estimate.bias.approx_eq(&bias, 1e-4), "{:?}", estimate.bias);
    assert_eq!(estimate.accepted, 500);
    assert_eq!(estimate.rejected, 0);
}

#[test]
fn outlier_does_not_move_mean() {
    let samples = vec![
        Vector::new(10.0, 10.0, 10.0),
        Vector::new(12.0, 10.0, 8.0),
        Vector::new(10.0, 500.0, 10.0),
        Vector::new(8.0, 10.0, 12.0),
    ];
    let estimate = estimate_bias(samples, 65.5);
    assert!(estimate.bias.approx_eq(&Vector::new(10.0, 10.0, 10.0), 1e-4), "{:?}", estimate.bias);
    assert_eq!(estimate.accepted, 3);
    assert_eq!(estimate.rejected, 1);
}

#[test]
fn non_finite_samples_are_rejected() {
    let mut mean = RunningMean::new();
    assert!(!mean.push(Vector::new(f32::NAN, 0.0, 0.0), 65.5));
    assert_eq!(mean.count(), 0);
    assert!(mean.push(Vector::new(1.0, 2.0, 3.0), 65.5));
    assert!(!mean.push(Vector::new(1.0, f32::INFINITY, 3.0), 65.5));
    assert_eq!(mean.count(), 1);
}

#[test]
fn calibrator_estimates_bias() {
    let bias = Vector::new(-20.0, 4.0, 31.0);
    let mut source = ScriptedSource::constant_gyro(bias);
    let mut delay = NoDelay::default();
    let mut observer = RecordingObserver::default();

    let calibration = GyroCalibrator::new(fast_config())
        .calibrate(&mut source, &mut delay, &CancelToken::new(), &mut observer)
        .unwrap();

    assert!(calibration.bias.approx_eq(&bias, 1e-4));
    assert_eq!(calibration.accepted, DEFAULT_GYRO_SAMPLES);
    assert_eq!(calibration.read_retries, 0);
    assert_eq!(source.gyro_reads, DEFAULT_GYRO_SAMPLES as usize);
    assert_eq!(observer.started, vec![CalibrationKind::Gyro]);
    assert_eq!(observer.finished, vec![(CalibrationKind::Gyro, true)]);
}

#[test]
fn too_many_outliers_fail_calibration() {
    // Alternate between two levels far apart, only the first level ever gets accepted.
    let mut source = ScriptedSource::new();
    for i in 0..200 {
        let level = if i % 2 == 0 { 0.0 } else { 1000.0 };
        source.gyro.push_back(Some(Vector::splat(level)));
    }
    let mut observer = RecordingObserver::default();

    let result = GyroCalibrator::new(fast_config())
        .calibrate(&mut source, &mut NoDelay::default(), &CancelToken::new(), &mut observer);

    match result {
        Err(CalibrationError::InsufficientSamples { accepted, required }) => {
            assert_eq!(accepted, 100);
            assert_eq!(required, DEFAULT_GYRO_MIN_ACCEPTED);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(observer.finished, vec![(CalibrationKind::Gyro, false)]);
}

#[test]
fn read_failure_aborts_by_default() {
    let mut source = ScriptedSource::constant_gyro(Vector::zero());
    source.gyro.extend([Some(Vector::zero()), None]);

    let result = GyroCalibrator::new(fast_config())
        .calibrate(&mut source, &mut NoDelay::default(), &CancelToken::new(), &mut ());

    assert!(matches!(result, Err(CalibrationError::Read(ReadFailed))));
    assert_eq!(source.gyro_reads, 2);
}

#[test]
fn read_failure_retried_and_reported() {
    let mut source = ScriptedSource::constant_gyro(Vector::splat(5.0));
    source.gyro.extend([None, None]);
    let config = GyroCalibrationConfig {
        read_failure: ReadFailurePolicy::Retry { max_consecutive: 3, delay_ms: 200 },
        ..fast_config()
    };
    let mut delay = NoDelay::default();

    let calibration = GyroCalibrator::new(config)
        .calibrate(&mut source, &mut delay, &CancelToken::new(), &mut ())
        .unwrap();

    assert_eq!(calibration.read_retries, 2);
    assert!(calibration.bias.approx_eq(&Vector::splat(5.0), 1e-4));
    assert_eq!(delay.total_ns, 2 * 200 * 1_000_000);
}

#[test]
fn retry_gives_up_after_consecutive_failures() {
    let mut source = ScriptedSource::new();
    let config = GyroCalibrationConfig {
        read_failure: ReadFailurePolicy::Retry { max_consecutive: 3, delay_ms: 1 },
        ..fast_config()
    };

    let result = GyroCalibrator::new(config)
        .calibrate(&mut source, &mut NoDelay::default(), &CancelToken::new(), &mut ());

    assert!(matches!(result, Err(CalibrationError::Read(ReadFailed))));
    assert_eq!(source.gyro_reads, 4);
}

#[test]
fn cancelled_before_first_read() {
    let mut source = ScriptedSource::constant_gyro(Vector::zero());
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = GyroCalibrator::new(fast_config())
        .calibrate(&mut source, &mut NoDelay::default(), &cancel, &mut ());

    assert!(matches!(result, Err(CalibrationError::Cancelled)));
    assert_eq!(source.gyro_reads, 0);
}
