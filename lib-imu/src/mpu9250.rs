use embedded_hal::{delay::DelayNs, i2c::I2c};
use math::Vector;
use processing::SampleSource;
use crate::{registers::mpu9250::*, AccelScaleRange, GyroScaleRange, ImuDevice, ImuError, DEFAULT_I2C_ADDR};
use crate::utils::*;

/// In milliseconds; time the chip needs to come out of sleep.
pub const MPU9250_WAKE_UP_DELAY_MS: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Mpu9250Config
{
    pub address: u8,
    pub gyro_scale: GyroScaleRange,
    pub accel_scale: AccelScaleRange,
    /// Output rate is 1kHz / (1 + div) while the low pass filter is enabled.
    pub sample_rate_div: u8,
    /// Raw `CONFIG` register value (gyroscope DLPF_CFG).
    pub gyro_dlpf: u8,
    /// Raw `ACCEL_CONFIG_2` register value (A_DLPF_CFG).
    pub accel_dlpf: u8,
}

impl Default for Mpu9250Config {
    fn default() -> Self {
        Mpu9250Config {
            address: DEFAULT_I2C_ADDR,
            gyro_scale: GyroScaleRange::D500,
            accel_scale: AccelScaleRange::G4,
            sample_rate_div: 1,
            gyro_dlpf: 0,
            accel_dlpf: 0,
        }
    }
}

/// MPU9250 accelerometer/gyroscope on a blocking i2c bus. The magnetometer (AK8963) is not
/// used.
/// 
pub struct Mpu9250<I2C>
{
    i2c: I2C,
    config: Mpu9250Config,
    initialized: bool,
}

impl<I2C: I2c> Mpu9250<I2C>
{
    pub fn new(i2c: I2C, config: Mpu9250Config) -> Self {
        Mpu9250 { i2c, config, initialized: false }
    }

    /// Give back the i2c bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn config(&self) -> &Mpu9250Config {
        &self.config
    }

    pub fn who_am_i(&mut self) -> Result<u8, ImuError<I2C::Error>> {
        self.read_register(WHO_AM_I)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), ImuError<I2C::Error>> {
        self.i2c.write(self.config.address, &[ register, value ]).map_err(ImuError::Bus)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, ImuError<I2C::Error>> {
        let mut buf = [ 0u8 ];
        self.i2c.write_read(self.config.address, &[ register ], &mut buf).map_err(ImuError::Bus)?;
        Ok(buf[0])
    }

    fn read_vector(&mut self, register: u8) -> Result<Vector, ImuError<I2C::Error>> {
        if !self.initialized {
            return Err(ImuError::NotInitialized);
        }
        let mut data = [ 0u8; 6 ];
        self.i2c.write_read(self.config.address, &[ register ], &mut data).map_err(ImuError::Bus)?;
        Ok(be_bytes_to_vector(&data))
    }
}

impl<I2C: I2c> SampleSource for Mpu9250<I2C>
{
    type Error = ImuError<I2C::Error>;

    fn read_gyro(&mut self) -> Result<Vector, Self::Error> {
        self.read_vector(GYRO_XOUT_H)
    }

    fn read_accel(&mut self) -> Result<Vector, Self::Error> {
        self.read_vector(ACCEL_XOUT_H)
    }
}

impl<I2C: I2c> ImuDevice for Mpu9250<I2C>
{
    fn name(&self) -> &'static str {
        "MPU9250"
    }

    fn connective(&mut self) -> Result<bool, Self::Error> {
        Ok(WHO_AM_I_VALUES.contains(&self.who_am_i()?))
    }

    fn wake_up<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.write_register(PWR_MGMT_1, PWR_MGMT_1_CLKSEL_AUTO)?;
        delay.delay_ms(MPU9250_WAKE_UP_DELAY_MS);
        Ok(())
    }

    fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.initialized = false;
        self.wake_up(delay)?;

        let who_am_i = self.who_am_i()?;
        if !WHO_AM_I_VALUES.contains(&who_am_i) {
            log::error!("MPU9250 WHO_AM_I mismatch: {:#04x}", who_am_i);
            return Err(ImuError::UnknownDevice { who_am_i });
        }

        self.write_register(SMPLRT_DIV, self.config.sample_rate_div)?;
        self.write_register(GYRO_CONFIG, self.config.gyro_scale.as_mpu_register())?;
        self.write_register(CONFIG, self.config.gyro_dlpf)?;
        self.write_register(ACCEL_CONFIG, self.config.accel_scale.as_mpu_register())?;
        self.write_register(ACCEL_CONFIG_2, self.config.accel_dlpf)?;

        self.initialized = true;
        log::info!("MPU9250 initialized ({:?}, {:?})", self.config.gyro_scale, self.config.accel_scale);
        Ok(())
    }

    fn gyro_scale(&self) -> GyroScaleRange {
        self.config.gyro_scale
    }

    fn accel_scale(&self) -> AccelScaleRange {
        self.config.accel_scale
    }
}
