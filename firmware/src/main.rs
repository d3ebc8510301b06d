#![no_std]
#![no_main]

use core::cell::RefCell;
use critical_section::Mutex;
use esp_backtrace as _;
use esp_hal::{delay::Delay, gpio::{Event, Input, Io, Pull}, i2c::master::{Config as I2cConfig, I2c}, prelude::*, time};
use imu::{AnyImu, ImuDevice};
use processing::*;
use cfg_if::cfg_if;

type Global<T> = Mutex<RefCell<Option<T>>>;

/// In microseconds; period of the attitude estimation loop (50Hz).
const TICK_PERIOD_US: u64 = 20_000;

/// Estimator ticks between two attitude log lines.
const LOG_EVERY_TICKS: u32 = 50;

/// The boot button, pressing it while calibrating aborts the calibration.
/// 
static BOOT_BUTTON: Global<Input> = Mutex::new(RefCell::new(None));

/// Set from the boot button interrupt, polled by the calibration routines.
/// 
static CALIBRATION_ABORT: CancelToken = CancelToken::new();

#[handler]
fn on_boot_button() {
    critical_section::with(|cs| {
        if let Some(pin) = BOOT_BUTTON.borrow_ref_mut(cs).as_mut() {
            if pin.is_interrupt_set() {
                pin.clear_interrupt();
                CALIBRATION_ABORT.cancel();
            }
        }
    });
}

#[entry]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init(esp_hal::Config::default());
    let mut io = Io::new(peripherals.IO_MUX);
    io.set_interrupt_handler(on_boot_button);
    let mut delay = Delay::new();


    // Initialize I2C connection for the IMU
    // ============================================================================================
    let mut i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig {
            frequency: 400.kHz(),
            timeout: None,
        }
    );
    cfg_if! {
        if #[cfg(feature = "old-pins")] {
            i2c = i2c.with_sda(peripherals.GPIO1);
            i2c = i2c.with_scl(peripherals.GPIO2);
        }
        else {
            i2c = i2c.with_sda(peripherals.GPIO8);
            i2c = i2c.with_scl(peripherals.GPIO7);
        }
    }


    // Setup an interrupt handler for the boot button
    // ============================================================================================
    let mut boot_button = Input::new(peripherals.GPIO9, Pull::Up);
    critical_section::with(|cs| {
        boot_button.listen(Event::FallingEdge);
        BOOT_BUTTON.borrow_ref_mut(cs).replace(boot_button);
    });


    // Detect and setup the IMU
    // ============================================================================================
    let mut imu = match AnyImu::detect(i2c, &mut delay) {
        Ok(imu) => imu,
        Err(err) => {
            log::error!("No IMU: {}, resetting", err);
            delay.delay_millis(1000);
            esp_hal::reset::software_reset();
            loop {}
        }
    };
    let gyro_lsb = imu.gyro_scale().as_scale_factor();
    let accel_lsb = imu.accel_scale().as_scale_factor();
    log::info!("Found {} ({} LSB/(deg/s), {} LSB/g)", imu.name(), gyro_lsb, accel_lsb);


    // Calibrate, press the boot button to skip
    // ============================================================================================
    let gyro_config = GyroCalibrationConfig {
        max_outlier_deviation: gyro_lsb,
        read_failure: ReadFailurePolicy::Retry { max_consecutive: 5, delay_ms: DEFAULT_READ_RETRY_DELAY_MS },
        ..GyroCalibrationConfig::default()
    };
    let accel_config = AccelCalibrationConfig {
        expected_gain: accel_lsb,
        tolerance: accel_lsb * 0.1,
        ..AccelCalibrationConfig::default()
    };
    let calibration = match run_startup_calibration(
        &mut imu, &mut delay, &CALIBRATION_ABORT, &mut LogObserver, &gyro_config, &accel_config,
    ) {
        Ok(calibration) => calibration,
        Err(err) => {
            log::error!("{}, continuing uncalibrated", err);
            CalibrationSet::identity()
        }
    };
    log::info!("Calibration: {:?}", calibration);


    // Main program loop
    // ============================================================================================
    let config = AhrsConfig { gyro_scale: gyro_lsb, ..AhrsConfig::default() };
    let mut estimator = AttitudeEstimator::with_config(calibration, config);
    let mut clock = TickClock::new(TICK_PERIOD_US, time::now().duration_since_epoch().to_micros());
    let mut ticks = 0u32;

    loop {
        let now = time::now().duration_since_epoch().to_micros();
        let remaining = clock.remaining_us(now);
        if remaining > 0 {
            delay.delay_micros(remaining as u32);
            continue;
        }

        let (gyro, accel) = match (imu.read_gyro(), imu.read_accel()) {
            (Ok(gyro), Ok(accel)) => (gyro, accel),
            (Err(err), _) | (_, Err(err)) => {
                log::warn!("Sensor read failed: {}", err);
                delay.delay_micros(TICK_PERIOD_US as u32);
                continue;
            }
        };

        let attitude = estimator.update(gyro, accel, clock.dt(now));
        clock.mark(now);

        ticks = ticks.wrapping_add(1);
        if ticks % LOG_EVERY_TICKS == 0 {
            log::info!("roll: {:.1}, pitch: {:.1}, yaw: {:.1}", attitude.roll, attitude.pitch, attitude.yaw);
        }
    }
}
