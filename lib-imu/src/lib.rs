#![cfg_attr(not(test), no_std)]

use embedded_hal::delay::DelayNs;
use processing::SampleSource;

pub mod error;
pub use error::*;

pub mod accel_scale_range;
pub use accel_scale_range::*;

pub mod gyro_scale_range;
pub use gyro_scale_range::*;

pub mod registers;

pub mod icm20948;
pub use icm20948::*;

pub mod mpu9250;
pub use mpu9250::*;

pub mod any_imu;
pub use any_imu::*;

mod utils;

#[cfg(test)]
mod tests;

/// Default i2c address of both the ICM20948 and MPU9250 (AD0 pin pulled low).
/// 
pub const DEFAULT_I2C_ADDR: u8 = 0x68;

/// An IMU chip that delivers raw gyroscope and accelerometer counts. Samples are returned as
/// the signed 16 bit register values, see `gyro_scale()`/`accel_scale()` for the factors to
/// convert them into deg/s and g.
/// 
pub trait ImuDevice: SampleSource
{
    /// Human readable chip name for logging.
    fn name(&self) -> &'static str;

    /// Checks whether the chip on the bus identifies as this device.
    fn connective(&mut self) -> Result<bool, Self::Error>;

    /// Takes the chip out of sleep mode.
    fn wake_up<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Wakes the chip up, verifies its identity and configures ranges and sample rates. Reads
    /// fail until this succeeded.
    fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    fn gyro_scale(&self) -> GyroScaleRange;

    fn accel_scale(&self) -> AccelScaleRange;
}
