use math::Vector;
use crate::*;
use super::*;

fn sample_set() -> CalibrationSet {
    CalibrationSet::new(
        Vector::new(-21.5, 3.25, 0.125),
        Vector::new(110.0, -42.0, 64.5),
        Vector::new(1.0125, 0.99, 1.003),
    ).unwrap()
}

#[test]
fn blob_layout_is_little_endian_doubles() {
    let blob = vector_to_blob(&Vector::new(1.0, -2.0, 0.5));
    assert_eq!(&blob[0..8], &1.0f64.to_le_bytes());
    assert_eq!(&blob[8..16], &(-2.0f64).to_le_bytes());
    assert_eq!(&blob[16..24], &0.5f64.to_le_bytes());
}

#[test]
fn save_then_restore() {
    let mut store = MemoryStore::default();
    let calibration = sample_set();
    calibration.save(&mut store).unwrap();

    assert_eq!(store.blobs.len(), 3);
    for key in [GYRO_BIAS_KEY, ACCEL_BIAS_KEY, ACCEL_GAIN_KEY] {
        assert_eq!(store.blobs[key].len(), BLOB_SIZE);
    }

    let restored = CalibrationSet::restore(&mut store).unwrap();
    assert_eq!(restored, calibration);
}

#[test]
fn restore_from_empty_store() {
    let mut store = MemoryStore::default();
    let result = CalibrationSet::restore(&mut store);
    assert!(matches!(result, Err(PersistenceError::Missing { key: GYRO_BIAS_KEY })));
}

#[test]
fn restore_truncated_blob() {
    let mut store = MemoryStore::default();
    sample_set().save(&mut store).unwrap();
    store.blobs.get_mut(ACCEL_GAIN_KEY).unwrap().truncate(10);

    let result = CalibrationSet::restore(&mut store);
    assert!(matches!(result, Err(PersistenceError::Truncated { key: ACCEL_GAIN_KEY, len: 10 })));
}

#[test]
fn restore_rejects_zero_gain() {
    let mut store = MemoryStore::default();
    sample_set().save(&mut store).unwrap();
    store.blobs.insert(ACCEL_GAIN_KEY.to_string(), vector_to_blob(&Vector::new(1.0, 1.0, 0.0)).to_vec());

    let result = CalibrationSet::restore(&mut store);
    assert!(matches!(result, Err(PersistenceError::Invalid(InvalidCalibration::ZeroGain { .. }))));
}

#[test]
fn store_failure_is_reported() {
    let mut store = MemoryStore { fail_saves: true, ..MemoryStore::default() };
    let result = sample_set().save(&mut store);
    assert!(matches!(result, Err(PersistenceError::Store(ReadFailed))));
}
