use math::*;
use crate::{CalibrationSet, InvalidCalibration};
use cfg_if::cfg_if;

/// In seconds; complementary filter time constant. Larger values trust the gyroscope more and
/// correct drift more slowly.
pub const DEFAULT_TIME_CONSTANT: f32 = 0.2;

/// In degrees; above this absolute pitch the accelerometer correction is skipped and the attitude
/// is purely integrated from the gyroscope.
pub const GIMBAL_LOCK_PITCH_LIMIT: f32 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AhrsConfig
{
    pub time_constant: f32,
    pub gimbal_lock_limit: f32,
    /// Gyroscope sensitivity in LSB / (deg/s), the bias corrected rate is divided by this. Keep
    /// at `1.0` when the gyroscope samples are already in deg/s.
    pub gyro_scale: f32,
}

impl AhrsConfig
{
    /// Complementary filter mixing factor for a tick of `dt` seconds, i.e. the weight of the
    /// gyroscope prediction.
    /// 
    #[inline]
    pub fn alpha(&self, dt: f32) -> f32 {
        self.time_constant / (self.time_constant + dt)
    }
}

impl Default for AhrsConfig {
    fn default() -> Self {
        AhrsConfig {
            time_constant: DEFAULT_TIME_CONSTANT,
            gimbal_lock_limit: GIMBAL_LOCK_PITCH_LIMIT,
            gyro_scale: 1.0,
        }
    }
}

/// Roll and pitch of the device according only to the direction of gravity in a calibrated
/// accelerometer reading. Gravity cannot give us a yaw value, so yaw is always zero.
/// 
pub fn accel_attitude(accel: &Vector) -> Attitude {
    let roll = libm::atan2f(accel.y, accel.z);
    let pitch = libm::atan2f(-accel.x, libm::sqrtf(accel.y * accel.y + accel.z * accel.z));
    Attitude::new(to_degrees(roll), to_degrees(pitch), 0.0)
}

/// Complementary filter attitude estimator: integrates the calibrated gyroscope rates (deg/s) and
/// pulls roll and pitch towards the accelerometer's gravity direction to keep them from drifting.
/// 
/// Yaw has no correcting reference and is integrated from the gyroscope z rate indefinitely, so it
/// will drift by whatever gyroscope bias remains after calibration.
/// 
pub struct AttitudeEstimator
{
    calibration: CalibrationSet,
    config: AhrsConfig,

    /// The current orientation of the device.
    attitude: Attitude,

    /// Orientation according only to the accelerometer's gravity vector in the last tick.
    #[cfg(feature = "debug")]
    pub accel_attitude: Attitude,

    /// Orientation according only to integrating the gyroscope in the last tick.
    #[cfg(feature = "debug")]
    pub gyro_prediction: Attitude,
}

impl AttitudeEstimator
{
    #[inline]
    pub fn new(calibration: CalibrationSet) -> Self {
        Self::with_config(calibration, AhrsConfig::default())
    }

    pub fn with_config(calibration: CalibrationSet, config: AhrsConfig) -> Self {
        AttitudeEstimator {
            calibration,
            config,
            attitude: Attitude::identity(),
            #[cfg(feature = "debug")]
            accel_attitude: Attitude::identity(),
            #[cfg(feature = "debug")]
            gyro_prediction: Attitude::identity(),
        }
    }

    /// Construct directly from the three calibration vectors, see [`CalibrationSet::new`].
    /// 
    pub fn try_new(gyro_bias: Vector, accel_bias: Vector, accel_gain: Vector) -> Result<Self, InvalidCalibration> {
        Ok(Self::new(CalibrationSet::new(gyro_bias, accel_bias, accel_gain)?))
    }

    /// Process a single tick of raw sensor readings taken `dt` seconds after the previous one and
    /// return the updated attitude.
    /// 
    pub fn update(&mut self, gyro_raw: Vector, accel_raw: Vector, dt: f32) -> Attitude {
        let gyro = self.calibration.apply_gyro(gyro_raw) / self.config.gyro_scale;
        let accel = self.calibration.apply_accel(accel_raw);

        let accel_estimate = accel_attitude(&accel);
        let prediction = Attitude::from(Vector::from(self.attitude) + gyro * dt);

        cfg_if!{ if #[cfg(feature = "debug")] {
            self.accel_attitude = accel_estimate;
            self.gyro_prediction = prediction;
        }}

        let next = if libm::fabsf(prediction.pitch) < self.config.gimbal_lock_limit {
            let correction = 1.0 - self.config.alpha(dt);
            Attitude::new(
                prediction.roll + correction * wrap_degrees(accel_estimate.roll - prediction.roll),
                prediction.pitch + correction * wrap_degrees(accel_estimate.pitch - prediction.pitch),
                prediction.yaw,
            )
        } else {
            // Roll is ill-conditioned near +-90 pitch, don't trust the accelerometer there.
            prediction
        };

        self.attitude = next.normalized();
        self.attitude
    }

    pub fn attitude(&self) -> Attitude {
        self.attitude
    }

    /// Seed the estimator with a known orientation, e.g. to start from the accelerometer attitude
    /// instead of waiting for the filter to converge.
    pub fn set_attitude(&mut self, attitude: Attitude) {
        self.attitude = attitude.normalized();
    }

    /// Back to the level orientation.
    pub fn reset(&mut self) {
        self.attitude = Attitude::identity();
    }

    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    pub fn config(&self) -> &AhrsConfig {
        &self.config
    }
}

/// Paces the estimator loop on a free running microsecond clock. Only ticks that were actually
/// fed to the estimator are marked, so a skipped tick (e.g. a failed sensor read) is covered by
/// the `dt` of the next one.
/// 
#[derive(Debug, Clone, Copy)]
pub struct TickClock
{
    period_us: u64,
    last_us: u64,
}

impl TickClock
{
    pub const fn new(period_us: u64, now_us: u64) -> Self {
        TickClock { period_us, last_us: now_us }
    }

    /// Microseconds to wait until the next tick is due, zero if it is due already.
    pub fn remaining_us(&self, now_us: u64) -> u64 {
        self.period_us.saturating_sub(now_us.saturating_sub(self.last_us))
    }

    /// In seconds; time since the last marked tick.
    pub fn dt(&self, now_us: u64) -> f32 {
        (now_us.saturating_sub(self.last_us) as f32) / 1_000_000.0
    }

    pub fn mark(&mut self, now_us: u64) {
        self.last_us = now_us;
    }
}
