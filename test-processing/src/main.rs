use std::{convert::Infallible, env, error::Error, fs::{self, File}, io::{Read, Write}, path::Path};
use math::Vector;
use processing::*;

mod dir_store;
use dir_store::*;

#[cfg(test)]
mod tests;

static RESULTS_DIR: &str = "analysis";

/// Leading rows of a recording (device lying still) used to estimate the gyroscope bias when no
/// stored calibration is available.
const STATIONARY_ROWS: usize = 200;

/// In LSB / (deg/s); gyroscope sensitivity of recordings made at the +-500 deg/s range.
const DEFAULT_GYRO_LSB: f32 = 65.5;

/// Single row of a recording, gyroscope and accelerometer in raw counts.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample
{
    pub time_us: f64,
    pub gyro: Vector,
    pub accel: Vector,
}

/// Parses `time_us,gyro.x,gyro.y,gyro.z,accel.x,accel.y,accel.z` rows (with header).
/// 
pub fn read_recording<R: Read>(reader: R) -> Result<Vec<Sample>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut samples = Vec::new();
    for result in reader.deserialize::<Vec<f64>>() {
        let record = result?;
        if record.len() < 7 {
            return Err(format!("Expected 7 columns, got {}", record.len()).into());
        }
        samples.push(Sample {
            time_us: record[0],
            gyro: Vector::new(record[1] as f32, record[2] as f32, record[3] as f32),
            accel: Vector::new(record[4] as f32, record[5] as f32, record[6] as f32),
        });
    }
    Ok(samples)
}

/// Calibration from the recording itself: gyroscope bias from the leading stationary rows, the
/// accelerometer is left uncalibrated. Fails like an on device calibration when fewer than
/// `DEFAULT_GYRO_MIN_ACCEPTED` rows survive the outlier rejection.
/// 
pub fn estimate_calibration(samples: &[Sample]) -> Result<CalibrationSet, Box<dyn Error>> {
    let estimate = estimate_bias(
        samples.iter().take(STATIONARY_ROWS).map(|sample| sample.gyro),
        DEFAULT_MAX_OUTLIER_DEVIATION,
    );
    if estimate.accepted < DEFAULT_GYRO_MIN_ACCEPTED {
        log::error!("Gyro bias estimate rejected, {} rows accepted", estimate.accepted);
        return Err(Box::new(CalibrationError::<Infallible>::InsufficientSamples {
            accepted: estimate.accepted,
            required: DEFAULT_GYRO_MIN_ACCEPTED,
        }));
    }
    log::info!(
        "Estimated gyro bias {:?} from {} rows ({} rejected)",
        estimate.bias, estimate.accepted, estimate.rejected,
    );
    Ok(CalibrationSet::new(estimate.bias, Vector::zero(), Vector::splat(1.0))?)
}

pub fn restore_or_estimate<S: BlobStore>(store: &mut S, samples: &[Sample]) -> Result<CalibrationSet, Box<dyn Error>> {
    match CalibrationSet::restore(store) {
        Ok(calibration) => {
            log::info!("Using stored calibration {:?}", calibration);
            Ok(calibration)
        }
        Err(err) => {
            log::warn!("No usable stored calibration ({}), estimating from recording", err);
            let calibration = estimate_calibration(samples)?;
            if let Err(err) = calibration.save(store) {
                log::error!("Failed to store calibration: {}", err);
            }
            Ok(calibration)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("Usage: test-processing <recording.csv> [calibration-dir] [gyro-lsb]".into());
    }

    // Open the input CSV file.
    let in_path = Path::new(&args[1]);
    let samples = read_recording(File::open(in_path)?)?;
    if samples.is_empty() {
        return Err("Recording contains no samples".into());
    }
    log::info!("Read {} samples from {}", samples.len(), in_path.display());

    let calibration = match args.get(2) {
        Some(dir) => restore_or_estimate(&mut DirStore::new(dir)?, &samples)?,
        None => estimate_calibration(&samples)?,
    };
    let gyro_scale = match args.get(3) {
        Some(lsb) => lsb.parse::<f32>()?,
        None => DEFAULT_GYRO_LSB,
    };

    // Every input CSV file gets its own folder in the results directory.
    let out_dir = in_path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("recording");
    let out_dir = format!("{}/{}", RESULTS_DIR, out_dir);
    fs::create_dir_all(&out_dir)?;

    let mut attitude_file = File::create(format!("{}/{}", out_dir, "attitude.csv"))?;
    attitude_file.write_all(b"time_us,roll,pitch,yaw,accel.roll,accel.pitch,gyro.roll,gyro.pitch\n")?;

    let config = AhrsConfig { gyro_scale, ..AhrsConfig::default() };
    let mut estimator = AttitudeEstimator::with_config(calibration, config);

    // The first row only provides the starting timestamp.
    for pair in samples.windows(2) {
        let (prev, sample) = (pair[0], pair[1]);
        let dt = ((sample.time_us - prev.time_us) / 1e6) as f32;

        let attitude = estimator.update(sample.gyro, sample.accel, dt);
        writeln!(
            attitude_file,
            "{},{},{},{},{},{},{},{}",
            sample.time_us,
            attitude.roll, attitude.pitch, attitude.yaw,
            estimator.accel_attitude.roll, estimator.accel_attitude.pitch,
            estimator.gyro_prediction.roll, estimator.gyro_prediction.pitch,
        )?;
    }

    log::info!("Final attitude: {:?}", estimator.attitude());
    Ok(())
}
