use math::{Axis, Vector};
use crate::InvalidCalibration;

/// Smallest accelerometer gain magnitude accepted, anything closer to zero is treated as a failed
/// calibration.
pub const MIN_GAIN_MAGNITUDE: f32 = 1e-6;

/// The three calibration vectors the attitude estimator needs. Immutable once constructed and only
/// constructible through [`CalibrationSet::new`], which guarantees every gain component is finite
/// and non-zero.
/// 
/// Calibration is applied as:
/// - Gyro: `raw - gyro_bias`
/// - Accel: `(raw - accel_bias) / accel_gain` (element wise)
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSet
{
    gyro_bias: Vector,
    accel_bias: Vector,
    accel_gain: Vector,
}

impl CalibrationSet
{
    pub fn new(gyro_bias: Vector, accel_bias: Vector, accel_gain: Vector) -> Result<Self, InvalidCalibration> {
        if !gyro_bias.is_finite() {
            return Err(InvalidCalibration::NonFinite { field: "gyro_bias" });
        }
        if !accel_bias.is_finite() {
            return Err(InvalidCalibration::NonFinite { field: "accel_bias" });
        }
        if !accel_gain.is_finite() {
            return Err(InvalidCalibration::NonFinite { field: "accel_gain" });
        }
        for axis in Axis::ALL {
            let value = accel_gain.axis(axis);
            if libm::fabsf(value) < MIN_GAIN_MAGNITUDE {
                return Err(InvalidCalibration::ZeroGain { axis, value });
            }
        }
        Ok(CalibrationSet { gyro_bias, accel_bias, accel_gain })
    }

    /// Zero biases and unit gain, i.e. raw readings are used as is. Useful as an explicit fallback
    /// for an uncalibrated sensor, attitude accuracy will be poor.
    /// 
    pub const fn identity() -> Self {
        CalibrationSet {
            gyro_bias: Vector::zero(),
            accel_bias: Vector::zero(),
            accel_gain: Vector::splat(1.0),
        }
    }

    pub fn gyro_bias(&self) -> Vector {
        self.gyro_bias
    }

    pub fn accel_bias(&self) -> Vector {
        self.accel_bias
    }

    pub fn accel_gain(&self) -> Vector {
        self.accel_gain
    }

    #[inline]
    pub fn apply_gyro(&self, raw: Vector) -> Vector {
        raw - self.gyro_bias
    }

    #[inline]
    pub fn apply_accel(&self, raw: Vector) -> Vector {
        (raw - self.accel_bias) / self.accel_gain
    }
}

impl Default for CalibrationSet {
    fn default() -> Self {
        CalibrationSet::identity()
    }
}
