use embedded_hal::delay::DelayNs;
use math::{Axis, Vector};
use crate::{CalibrationError, CalibrationKind, CalibrationObserver, CancelToken, SampleSource};

/// In raw counts per g; 1g at the +-4g range.
pub const DEFAULT_EXPECTED_GAIN: f32 = 8192.0;

/// In raw counts; a sample is only accepted within 10% of 1g from the expected reading.
pub const DEFAULT_ACCEL_TOLERANCE: f32 = DEFAULT_EXPECTED_GAIN * 0.1;

pub const DEFAULT_SAMPLES_PER_FACE: u16 = 500;

/// Rejected samples per pose before giving up, with the default cooldown this is about 5 minutes.
pub const DEFAULT_MAX_REJECTIONS_PER_FACE: u32 = 300;

/// In milliseconds; pause after a rejected sample to give the operator time to reposition.
pub const DEFAULT_REJECTION_COOLDOWN_MS: u32 = 998;

/// In microseconds; time between two accelerometer reads.
pub const DEFAULT_ACCEL_SAMPLE_PERIOD_US: u32 = 2_000;

/// The six static orientations of the six-point calibration, each one has a single axis aligned
/// with gravity. Calibration visits them in the order of [`Pose::ALL`].
/// 
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose
{
    XPositive = 0,
    XNegative = 1,
    YPositive = 2,
    YNegative = 3,
    ZPositive = 4,
    ZNegative = 5,
}

impl Pose
{
    pub const ALL: [Pose; 6] = [
        Pose::XPositive,
        Pose::XNegative,
        Pose::YPositive,
        Pose::YNegative,
        Pose::ZPositive,
        Pose::ZNegative,
    ];

    /// The axis that points along gravity in this pose.
    pub fn axis(&self) -> Axis {
        match self {
            Self::XPositive | Self::XNegative => Axis::X,
            Self::YPositive | Self::YNegative => Axis::Y,
            Self::ZPositive | Self::ZNegative => Axis::Z,
        }
    }

    /// `1.0` if the target axis should read `+expected_gain`, `-1.0` if it should read the negative.
    pub fn sign(&self) -> f32 {
        match self {
            Self::XPositive | Self::YPositive | Self::ZPositive => 1.0,
            Self::XNegative | Self::YNegative | Self::ZNegative => -1.0,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        (*self) as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::XPositive => "X+",
            Self::XNegative => "X-",
            Self::YPositive => "Y+",
            Self::YNegative => "Y-",
            Self::ZPositive => "Z+",
            Self::ZNegative => "Z-",
        }
    }
}

/// How the per-axis gain is derived from the two face means of an axis, `span` being
/// `mean[positive] - mean[negative]`.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GainConvention
{
    /// `gain = span / 2`: the measured counts per g of the axis. Dividing a bias corrected reading
    /// by it gives g, with the sensitivity mismatch between the axes removed.
    #[default]
    HalfSpan,
    /// `gain = expected_gain * 2 / |span|`: the ratio of the nominal to the measured sensitivity,
    /// `1.0` for a sensor that reads exactly `expected_gain` counts per g. This is the inverse of
    /// what `CalibrationSet::apply_accel` divides by, so it only matches recordings calibrated
    /// with this ratio; dividing raw readings by it doubles the sensitivity error.
    ReferenceRatio,
}

#[derive(Debug, Clone, Copy)]
pub struct AccelCalibrationConfig
{
    /// Expected reading of an axis aligned with gravity (1g in the unit of the samples).
    pub expected_gain: f32,
    /// Largest distance from the signed expected reading a sample may have to be accepted.
    pub tolerance: f32,
    pub samples_per_face: u16,
    pub max_rejections_per_face: u32,
    pub rejection_cooldown_ms: u32,
    pub sample_period_us: u32,
    pub gain_convention: GainConvention,
}

impl Default for AccelCalibrationConfig {
    fn default() -> Self {
        AccelCalibrationConfig {
            expected_gain: DEFAULT_EXPECTED_GAIN,
            tolerance: DEFAULT_ACCEL_TOLERANCE,
            samples_per_face: DEFAULT_SAMPLES_PER_FACE,
            max_rejections_per_face: DEFAULT_MAX_REJECTIONS_PER_FACE,
            rejection_cooldown_ms: DEFAULT_REJECTION_COOLDOWN_MS,
            sample_period_us: DEFAULT_ACCEL_SAMPLE_PERIOD_US,
            gain_convention: GainConvention::default(),
        }
    }
}

/// Successful six-point accelerometer calibration.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelCalibration
{
    pub bias: Vector,
    pub gain: Vector,
    /// Mean target axis reading of every pose, indexed by [`Pose::index`].
    pub face_means: [f32; 6],
}

impl AccelCalibration
{
    /// Derive per-axis bias and gain from the mean target axis reading of the six poses. Fails
    /// with the offending axis if both faces of an axis have the same mean.
    /// 
    pub fn from_face_means(face_means: [f32; 6], expected_gain: f32, convention: GainConvention) -> Result<Self, Axis> {
        let mut bias = Vector::zero();
        let mut gain = Vector::zero();

        for (i, axis) in Axis::ALL.iter().enumerate() {
            let positive = face_means[i * 2];
            let negative = face_means[i * 2 + 1];
            let span = positive - negative;
            if !span.is_finite() || libm::fabsf(span) < f32::EPSILON {
                return Err(*axis);
            }

            bias.set_axis(*axis, (positive + negative) / 2.0);
            gain.set_axis(*axis, match convention {
                GainConvention::ReferenceRatio => expected_gain * 2.0 / libm::fabsf(span),
                GainConvention::HalfSpan => span / 2.0,
            });
        }

        Ok(AccelCalibration { bias, gain, face_means })
    }
}

pub struct AccelCalibrator
{
    config: AccelCalibrationConfig,
}

impl AccelCalibrator
{
    pub fn new(config: AccelCalibrationConfig) -> Self {
        AccelCalibrator { config }
    }

    pub fn config(&self) -> &AccelCalibrationConfig {
        &self.config
    }

    /// Run the six-point calibration reading accelerometer samples from `source`.
    /// 
    pub fn calibrate<S, D, O>(
        &self,
        source: &mut S,
        delay: &mut D,
        cancel: &CancelToken,
        observer: &mut O,
    ) -> Result<AccelCalibration, CalibrationError<S::Error>>
    where
        S: SampleSource,
        D: DelayNs,
        O: CalibrationObserver,
    {
        self.calibrate_with(|_| source.read_accel(), delay, cancel, observer)
    }

    /// Run the six-point calibration with `read` delivering the current raw acceleration while
    /// the operator holds the device in the given pose. A failed read aborts the whole procedure.
    /// 
    pub fn calibrate_with<F, E, D, O>(
        &self,
        mut read: F,
        delay: &mut D,
        cancel: &CancelToken,
        observer: &mut O,
    ) -> Result<AccelCalibration, CalibrationError<E>>
    where
        F: FnMut(Pose) -> Result<Vector, E>,
        E: core::fmt::Debug,
        D: DelayNs,
        O: CalibrationObserver,
    {
        observer.calibration_started(CalibrationKind::Accel);

        let mut face_means = [0.0f32; 6];
        let mut result = Ok(());
        for pose in Pose::ALL {
            match self.sample_face(pose, &mut read, delay, cancel, observer) {
                Ok(mean) => face_means[pose.index()] = mean,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }

        let result = result.and_then(|_| {
            AccelCalibration::from_face_means(face_means, self.config.expected_gain, self.config.gain_convention)
                .map_err(|axis| CalibrationError::DegenerateAxis { axis })
        });

        match &result {
            Ok(calibration) => log::info!("Accel bias: {:?}, gain: {:?}", calibration.bias, calibration.gain),
            Err(err) => log::error!("Accel calibration failed: {}", err),
        }
        observer.calibration_finished(CalibrationKind::Accel, result.is_ok());
        result
    }

    /// Collect `samples_per_face` accepted readings for a single pose and return the mean of the
    /// target axis.
    fn sample_face<F, E, D, O>(
        &self,
        pose: Pose,
        read: &mut F,
        delay: &mut D,
        cancel: &CancelToken,
        observer: &mut O,
    ) -> Result<f32, CalibrationError<E>>
    where
        F: FnMut(Pose) -> Result<Vector, E>,
        D: DelayNs,
        O: CalibrationObserver,
    {
        observer.pose_requested(pose);

        let target = pose.sign() * self.config.expected_gain;
        let quota = self.config.samples_per_face.max(1);
        let mut sum = 0.0f64;
        let mut accepted = 0u16;
        let mut rejected = 0u32;

        while accepted < quota {
            if cancel.is_cancelled() {
                return Err(CalibrationError::Cancelled);
            }

            let value = read(pose).map_err(CalibrationError::Read)?.axis(pose.axis());
            if libm::fabsf(value - target) < self.config.tolerance {
                sum += value as f64;
                accepted += 1;
            } else {
                rejected += 1;
                observer.pose_rejected(pose, value);
                if rejected > self.config.max_rejections_per_face {
                    return Err(CalibrationError::Timeout { pose, rejected });
                }
                delay.delay_ms(self.config.rejection_cooldown_ms);
            }
            delay.delay_us(self.config.sample_period_us);
        }

        let mean = (sum / (accepted as f64)) as f32;
        observer.pose_completed(pose, mean);
        Ok(mean)
    }
}
