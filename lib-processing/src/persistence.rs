//! Save/restore of a [`CalibrationSet`] as three fixed size binary blobs in a key/value store
//! (e.g. the NVS partition in flash), so calibration only has to be done once per device.
//! 
//! Every blob holds one vector as three little endian IEEE-754 doubles.

use core::fmt::Debug;
use math::Vector;
use crate::{CalibrationSet, PersistenceError};

pub const GYRO_BIAS_KEY: &str = "rawGyroBias";
pub const ACCEL_BIAS_KEY: &str = "rawAccelBias";
pub const ACCEL_GAIN_KEY: &str = "rawAccelGain";

/// Size in bytes of a single stored vector.
pub const BLOB_SIZE: usize = 3 * 8;

/// Persistent key/value storage for binary blobs.
/// 
pub trait BlobStore
{
    type Error: Debug;

    fn save_blob(&mut self, key: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Copies the blob stored under `key` into `buf` and returns its length, or `None` if nothing
    /// is stored under that key. Blobs longer than `buf` are cut off.
    fn read_blob(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, Self::Error>;
}

pub fn vector_to_blob(v: &Vector) -> [u8; BLOB_SIZE] {
    let mut blob = [0u8; BLOB_SIZE];
    let values: [f32; 3] = (*v).into();
    for (i, value) in values.iter().enumerate() {
        blob[i*8 .. i*8+8].copy_from_slice(&(*value as f64).to_le_bytes());
    }
    blob
}

pub fn vector_from_blob(blob: &[u8; BLOB_SIZE]) -> Vector {
    let mut values = [0.0f32; 3];
    for (i, value) in values.iter_mut().enumerate() {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&blob[i*8 .. i*8+8]);
        *value = f64::from_le_bytes(bytes) as f32;
    }
    Vector::from(values)
}

fn read_vector<S: BlobStore>(store: &mut S, key: &'static str) -> Result<Vector, PersistenceError<S::Error>> {
    let mut blob = [0u8; BLOB_SIZE];
    match store.read_blob(key, &mut blob).map_err(PersistenceError::Store)? {
        None => Err(PersistenceError::Missing { key }),
        Some(len) if len < BLOB_SIZE => Err(PersistenceError::Truncated { key, len }),
        Some(_) => Ok(vector_from_blob(&blob)),
    }
}

impl CalibrationSet
{
    /// Store all three calibration vectors under their fixed keys.
    /// 
    pub fn save<S: BlobStore>(&self, store: &mut S) -> Result<(), PersistenceError<S::Error>> {
        store.save_blob(GYRO_BIAS_KEY, &vector_to_blob(&self.gyro_bias())).map_err(PersistenceError::Store)?;
        store.save_blob(ACCEL_BIAS_KEY, &vector_to_blob(&self.accel_bias())).map_err(PersistenceError::Store)?;
        store.save_blob(ACCEL_GAIN_KEY, &vector_to_blob(&self.accel_gain())).map_err(PersistenceError::Store)?;
        log::debug!("Calibration saved");
        Ok(())
    }

    /// Load a previously saved calibration, the restored values go through the same validation as
    /// a freshly computed calibration.
    /// 
    pub fn restore<S: BlobStore>(store: &mut S) -> Result<Self, PersistenceError<S::Error>> {
        let gyro_bias = read_vector(store, GYRO_BIAS_KEY)?;
        let accel_bias = read_vector(store, ACCEL_BIAS_KEY)?;
        let accel_gain = read_vector(store, ACCEL_GAIN_KEY)?;
        Ok(CalibrationSet::new(gyro_bias, accel_bias, accel_gain)?)
    }
}
