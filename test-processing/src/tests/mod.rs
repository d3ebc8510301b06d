use std::{convert::Infallible, env, fs, path::PathBuf};
use math::Vector;
use processing::*;
use crate::*;

/// Fresh scratch directory per test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("test-processing-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn parses_recording_rows() {
    let csv = "time_us,gyro.x,gyro.y,gyro.z,accel.x,accel.y,accel.z\n\
               1000,1,2,3,4,5,8192\n\
               21000,-1,-2,-3,-4,-5,8190\n";
    let samples = read_recording(csv.as_bytes()).unwrap();

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].time_us, 1000.0);
    assert_eq!(samples[1].gyro, Vector::new(-1.0, -2.0, -3.0));
    assert_eq!(samples[0].accel, Vector::new(4.0, 5.0, 8192.0));
}

#[test]
fn short_rows_rejected() {
    let csv = "time_us,gyro.x\n1000,1\n";
    assert!(read_recording(csv.as_bytes()).is_err());
}

#[test]
fn bias_estimated_from_leading_rows() {
    let samples: Vec<_> = (0..300)
        .map(|i| Sample {
            time_us: (i * 20_000) as f64,
            gyro: if i < 200 { Vector::new(3.0, -2.0, 1.0) } else { Vector::splat(500.0) },
            accel: Vector::new(0.0, 0.0, 8192.0),
        })
        .collect();

    let calibration = estimate_calibration(&samples).unwrap();
    assert!(calibration.gyro_bias().approx_eq(&Vector::new(3.0, -2.0, 1.0), 1e-4));
    assert_eq!(calibration.accel_gain(), Vector::splat(1.0));
}

#[test]
fn dir_store_round_trip() {
    let dir = scratch_dir("round-trip");
    let mut store = DirStore::new(&dir).unwrap();
    let calibration = CalibrationSet::new(Vector::splat(2.0), Vector::new(10.0, -20.0, 5.0), Vector::splat(1.01)).unwrap();

    calibration.save(&mut store).unwrap();
    assert!(dir.join(format!("{}.bin", GYRO_BIAS_KEY)).exists());
    assert_eq!(CalibrationSet::restore(&mut store).unwrap(), calibration);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_calibration_is_estimated_and_stored() {
    let dir = scratch_dir("estimate");
    let mut store = DirStore::new(&dir).unwrap();
    let samples = vec![
        Sample { time_us: 0.0, gyro: Vector::splat(4.0), accel: Vector::new(0.0, 0.0, 8192.0) };
        STATIONARY_ROWS
    ];

    let calibration = restore_or_estimate(&mut store, &samples).unwrap();
    assert!(calibration.gyro_bias().approx_eq(&Vector::splat(4.0), 1e-4));
    assert_eq!(CalibrationSet::restore(&mut store).unwrap(), calibration);

    fs::remove_dir_all(&dir).unwrap();
}

/// Rows of a recording that starts with a single spike before lying still.
fn spiked_recording() -> Vec<Sample> {
    (0..STATIONARY_ROWS)
        .map(|i| Sample {
            time_us: (i * 20_000) as f64,
            gyro: if i == 0 { Vector::splat(900.0) } else { Vector::new(3.0, -2.0, 1.0) },
            accel: Vector::new(0.0, 0.0, 8192.0),
        })
        .collect()
}

#[test]
fn leading_spike_fails_estimate() {
    let err = estimate_calibration(&spiked_recording()).unwrap_err();
    match err.downcast_ref::<CalibrationError<Infallible>>() {
        Some(CalibrationError::InsufficientSamples { accepted, required }) => {
            assert_eq!(*accepted, 1);
            assert_eq!(*required, DEFAULT_GYRO_MIN_ACCEPTED);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn failed_estimate_is_not_stored() {
    let dir = scratch_dir("spike");
    let mut store = DirStore::new(&dir).unwrap();

    assert!(restore_or_estimate(&mut store, &spiked_recording()).is_err());
    assert!(!dir.join(format!("{}.bin", GYRO_BIAS_KEY)).exists());
    assert!(matches!(CalibrationSet::restore(&mut store), Err(PersistenceError::Missing { .. })));

    fs::remove_dir_all(&dir).unwrap();
}
