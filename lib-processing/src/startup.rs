use embedded_hal::delay::DelayNs;
use crate::*;

/// Runs the gyroscope calibration followed by the six-point accelerometer calibration and combines
/// both into a validated [`CalibrationSet`]. The device must be held still for the gyroscope part,
/// after which the observer is asked to walk the operator through the six poses.
/// 
pub fn run_startup_calibration<S, D, O>(
    source: &mut S,
    delay: &mut D,
    cancel: &CancelToken,
    observer: &mut O,
    gyro_config: &GyroCalibrationConfig,
    accel_config: &AccelCalibrationConfig,
) -> Result<CalibrationSet, StartupError<S::Error>>
where
    S: SampleSource,
    D: DelayNs,
    O: CalibrationObserver,
{
    let gyro = GyroCalibrator::new(*gyro_config)
        .calibrate(source, delay, cancel, observer)
        .map_err(StartupError::Gyro)?;

    let accel = AccelCalibrator::new(*accel_config)
        .calibrate(source, delay, cancel, observer)
        .map_err(StartupError::Accel)?;

    Ok(CalibrationSet::new(gyro.bias, accel.bias, accel.gain)?)
}

/// Restores the calibration from `store`, or if nothing usable is stored runs the startup
/// calibration and stores its result for the next boot. Failing to store the new calibration is
/// only logged, the calibration itself is still good to use.
/// 
pub fn restore_or_calibrate<B, S, D, O>(
    store: &mut B,
    source: &mut S,
    delay: &mut D,
    cancel: &CancelToken,
    observer: &mut O,
    gyro_config: &GyroCalibrationConfig,
    accel_config: &AccelCalibrationConfig,
) -> Result<CalibrationSet, StartupError<S::Error>>
where
    B: BlobStore,
    S: SampleSource,
    D: DelayNs,
    O: CalibrationObserver,
{
    match CalibrationSet::restore(store) {
        Ok(calibration) => {
            log::info!("Restored calibration: {:?}", calibration);
            return Ok(calibration);
        }
        Err(err) => log::warn!("No usable stored calibration ({}), calibrating", err),
    }

    let calibration = run_startup_calibration(source, delay, cancel, observer, gyro_config, accel_config)?;
    if let Err(err) = calibration.save(store) {
        log::error!("Failed to store calibration: {}", err);
    }
    Ok(calibration)
}
