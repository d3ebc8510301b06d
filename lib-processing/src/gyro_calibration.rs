use embedded_hal::delay::DelayNs;
use math::{Axis, Vector};
use crate::{CalibrationError, CalibrationKind, CalibrationObserver, CancelToken, SampleSource};

/// Samples drawn for a gyroscope calibration run (including the first sample seeding the mean).
pub const DEFAULT_GYRO_SAMPLES: u16 = 200;

/// Accepted samples required for the calibration to count as successful.
pub const DEFAULT_GYRO_MIN_ACCEPTED: u16 = 150;

/// In raw counts; 1 deg/s at the +-500 deg/s range (65.5 LSB per deg/s).
pub const DEFAULT_MAX_OUTLIER_DEVIATION: f32 = 65.5;

/// In microseconds; time between two gyroscope reads (50Hz).
pub const DEFAULT_GYRO_SAMPLE_PERIOD_US: u32 = 20_000;

/// In milliseconds; wait before reading again after a failed read.
pub const DEFAULT_READ_RETRY_DELAY_MS: u32 = 200;

/// What to do when the sample source fails to deliver a reading mid calibration.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailurePolicy
{
    /// Give up on the first failed read.
    Abort,
    /// Wait `delay_ms` and read again, giving up after `max_consecutive` failed reads in a row.
    Retry { max_consecutive: u8, delay_ms: u32 },
}

impl Default for ReadFailurePolicy {
    fn default() -> Self {
        ReadFailurePolicy::Abort
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GyroCalibrationConfig
{
    pub samples: u16,
    pub min_accepted: u16,
    /// Largest deviation from the running mean (on any axis) a sample may have to be accepted.
    pub max_outlier_deviation: f32,
    pub sample_period_us: u32,
    pub read_failure: ReadFailurePolicy,
}

impl Default for GyroCalibrationConfig {
    fn default() -> Self {
        GyroCalibrationConfig {
            samples: DEFAULT_GYRO_SAMPLES,
            min_accepted: DEFAULT_GYRO_MIN_ACCEPTED,
            max_outlier_deviation: DEFAULT_MAX_OUTLIER_DEVIATION,
            sample_period_us: DEFAULT_GYRO_SAMPLE_PERIOD_US,
            read_failure: ReadFailurePolicy::default(),
        }
    }
}

/// Incremental (Welford style) mean over a stream of vectors that rejects outliers. The first
/// sample seeds the mean, every later sample deviating more than the allowed amount on any axis
/// from the current mean is discarded without touching the mean or the count.
/// 
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMean
{
    mean: Vector,
    count: u16,
}

impl RunningMean
{
    pub const fn new() -> Self {
        RunningMean { mean: Vector::zero(), count: 0 }
    }

    pub fn mean(&self) -> Vector {
        self.mean
    }

    /// Amount of accepted samples so far.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Offer a sample, returns `false` if it was rejected as an outlier.
    /// 
    pub fn push(&mut self, sample: Vector, max_deviation: f32) -> bool {
        if !sample.is_finite() {
            return false;
        }
        if self.count == 0 {
            self.mean = sample;
            self.count = 1;
            return true;
        }

        let deviation = sample - self.mean;
        let outlier = Axis::ALL.iter().any(|axis| libm::fabsf(deviation.axis(*axis)) > max_deviation);
        if outlier || self.count == u16::MAX {
            return false;
        }

        self.count += 1;
        self.mean += deviation / (self.count as f32);
        true
    }
}

/// Result of [`estimate_bias`].
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasEstimate
{
    pub bias: Vector,
    pub accepted: u16,
    pub rejected: u16,
}

/// Estimates the zero rate bias of a gyroscope from a sequence of samples taken while the device
/// is stationary, see [`RunningMean`] for how outliers are handled. The bias has the same unit as
/// the samples.
/// 
pub fn estimate_bias<I>(samples: I, max_outlier_deviation: f32) -> BiasEstimate
where
    I: IntoIterator<Item = Vector>,
{
    let mut mean = RunningMean::new();
    let mut rejected = 0u16;
    for sample in samples {
        if !mean.push(sample, max_outlier_deviation) {
            rejected = rejected.saturating_add(1);
        }
    }
    BiasEstimate { bias: mean.mean(), accepted: mean.count(), rejected }
}

/// Successful gyroscope calibration.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroCalibration
{
    /// To subtract from future raw readings.
    pub bias: Vector,
    pub accepted: u16,
    pub rejected: u16,
    /// Failed reads that were retried according to `ReadFailurePolicy::Retry`.
    pub read_retries: u16,
}

pub struct GyroCalibrator
{
    config: GyroCalibrationConfig,
}

impl GyroCalibrator
{
    pub fn new(config: GyroCalibrationConfig) -> Self {
        GyroCalibrator { config }
    }

    pub fn config(&self) -> &GyroCalibrationConfig {
        &self.config
    }

    /// Estimate the gyroscope bias by sampling `source` while the device is held still. Blocks for
    /// `samples * sample_period_us` (plus retry delays).
    /// 
    pub fn calibrate<S, D, O>(
        &self,
        source: &mut S,
        delay: &mut D,
        cancel: &CancelToken,
        observer: &mut O,
    ) -> Result<GyroCalibration, CalibrationError<S::Error>>
    where
        S: SampleSource,
        D: DelayNs,
        O: CalibrationObserver,
    {
        observer.calibration_started(CalibrationKind::Gyro);
        let result = self.sample(source, delay, cancel);
        observer.calibration_finished(CalibrationKind::Gyro, result.is_ok());
        result
    }

    fn sample<S: SampleSource, D: DelayNs>(
        &self,
        source: &mut S,
        delay: &mut D,
        cancel: &CancelToken,
    ) -> Result<GyroCalibration, CalibrationError<S::Error>> {
        let mut mean = RunningMean::new();
        let mut rejected = 0u16;
        let mut read_retries = 0u16;

        for i in 0..self.config.samples {
            if i > 0 {
                delay.delay_us(self.config.sample_period_us);
            }
            let sample = self.read(source, delay, cancel, &mut read_retries)?;
            if !mean.push(sample, self.config.max_outlier_deviation) {
                log::trace!("Discarding gyro outlier {:?} (mean {:?})", sample, mean.mean());
                rejected += 1;
            }
        }

        if mean.count() < self.config.min_accepted {
            log::warn!("Gyro calibration accepted {} of {} samples", mean.count(), self.config.samples);
            return Err(CalibrationError::InsufficientSamples {
                accepted: mean.count(),
                required: self.config.min_accepted,
            });
        }

        log::info!("Gyro bias: {:?} ({} accepted, {} rejected)", mean.mean(), mean.count(), rejected);
        Ok(GyroCalibration { bias: mean.mean(), accepted: mean.count(), rejected, read_retries })
    }

    fn read<S: SampleSource, D: DelayNs>(
        &self,
        source: &mut S,
        delay: &mut D,
        cancel: &CancelToken,
        retries: &mut u16,
    ) -> Result<Vector, CalibrationError<S::Error>> {
        let mut consecutive = 0u8;
        loop {
            if cancel.is_cancelled() {
                return Err(CalibrationError::Cancelled);
            }
            let err = match source.read_gyro() {
                Ok(sample) => return Ok(sample),
                Err(err) => err,
            };
            match self.config.read_failure {
                ReadFailurePolicy::Retry { max_consecutive, delay_ms } if consecutive < max_consecutive => {
                    log::warn!("Gyro read failed ({:?}), retrying", err);
                    consecutive += 1;
                    *retries = retries.saturating_add(1);
                    delay.delay_ms(delay_ms);
                }
                _ => {
                    log::error!("Gyro read failed: {:?}", err);
                    return Err(CalibrationError::Read(err));
                }
            }
        }
    }
}
