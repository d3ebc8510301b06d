#![cfg_attr(not(test), no_std)]

pub mod error;
pub use error::*;

pub mod source;
pub use source::*;

pub mod cancel;
pub use cancel::*;

pub mod observer;
pub use observer::*;

pub mod calibration_set;
pub use calibration_set::*;

pub mod persistence;
pub use persistence::*;

pub mod gyro_calibration;
pub use gyro_calibration::*;

pub mod accel_calibration;
pub use accel_calibration::*;

pub mod ahrs;
pub use ahrs::*;

pub mod startup;
pub use startup::*;

#[cfg(test)]
mod tests;
