use core::{error::Error, fmt};
use math::Axis;
use crate::Pose;

/// A calibration that cannot be used by the estimator, the accelerometer gain is a division operand
/// so a zero (or near zero) component means the calibration that produced it failed.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidCalibration
{
    ZeroGain { axis: Axis, value: f32 },
    NonFinite { field: &'static str },
}

impl Error for InvalidCalibration {}

impl fmt::Display for InvalidCalibration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ZeroGain { axis, value } => write!(f, "Accelerometer gain on {} axis is (near) zero: {}", axis.label(), value),
            Self::NonFinite { field } => write!(f, "Calibration field {} is not finite", field),
        }
    }
}

/// Why a calibration run did not produce a result. None of these carry a partial result, callers
/// must not trust anything from a failed run.
/// 
#[derive(Debug)]
pub enum CalibrationError<E>
{
    /// The sample source failed to deliver a reading (e.g. bus error, disconnected sensor).
    Read(E),
    /// Too many samples were rejected as outliers.
    InsufficientSamples { accepted: u16, required: u16 },
    /// The caller cancelled the calibration through its `CancelToken`.
    Cancelled,
    /// The operator did not hold the device in the requested pose within the retry ceiling.
    Timeout { pose: Pose, rejected: u32 },
    /// Positive and negative face of an axis averaged to the same value, no gain can be derived.
    DegenerateAxis { axis: Axis },
}

impl<E: fmt::Debug> Error for CalibrationError<E> {}

impl<E: fmt::Debug> fmt::Display for CalibrationError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "Sensor read failed: {:?}", err),
            Self::InsufficientSamples { accepted, required } => write!(f, "Only {} of required {} samples accepted", accepted, required),
            Self::Cancelled => write!(f, "Calibration cancelled"),
            Self::Timeout { pose, rejected } => write!(f, "Pose {} not held, {} samples rejected", pose.label(), rejected),
            Self::DegenerateAxis { axis } => write!(f, "No span between faces of {} axis", axis.label()),
        }
    }
}

/// Failure to save or restore a `CalibrationSet` through a `BlobStore`.
/// 
#[derive(Debug)]
pub enum PersistenceError<E>
{
    Store(E),
    Missing { key: &'static str },
    Truncated { key: &'static str, len: usize },
    Invalid(InvalidCalibration),
}

impl<E: fmt::Debug> Error for PersistenceError<E> {}

impl<E: fmt::Debug> fmt::Display for PersistenceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "Blob store error: {:?}", err),
            Self::Missing { key } => write!(f, "No blob stored under key {}", key),
            Self::Truncated { key, len } => write!(f, "Blob {} is truncated ({} bytes)", key, len),
            Self::Invalid(err) => write!(f, "Stored calibration is invalid: {}", err),
        }
    }
}

impl<E> From<InvalidCalibration> for PersistenceError<E>
{
    fn from(err: InvalidCalibration) -> Self {
        PersistenceError::Invalid(err)
    }
}

/// Failure of the startup calibration sequence.
/// 
#[derive(Debug)]
pub enum StartupError<E>
{
    Gyro(CalibrationError<E>),
    Accel(CalibrationError<E>),
    Invalid(InvalidCalibration),
}

impl<E: fmt::Debug> Error for StartupError<E> {}

impl<E: fmt::Debug> fmt::Display for StartupError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Gyro(err) => write!(f, "Gyroscope calibration failed: {}", err),
            Self::Accel(err) => write!(f, "Accelerometer calibration failed: {}", err),
            Self::Invalid(err) => write!(f, "Calibration rejected: {}", err),
        }
    }
}

impl<E> From<InvalidCalibration> for StartupError<E>
{
    fn from(err: InvalidCalibration) -> Self {
        StartupError::Invalid(err)
    }
}
