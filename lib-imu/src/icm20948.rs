use embedded_hal::{delay::DelayNs, i2c::I2c};
use math::Vector;
use processing::SampleSource;
use crate::{registers::icm20948::*, AccelScaleRange, GyroScaleRange, ImuDevice, ImuError, DEFAULT_I2C_ADDR};
use crate::utils::*;

/// In milliseconds; time the chip needs to come out of sleep.
pub const ICM20948_WAKE_UP_DELAY_MS: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Icm20948Config
{
    pub address: u8,
    pub gyro_scale: GyroScaleRange,
    pub accel_scale: AccelScaleRange,
    /// Gyroscope output rate is 1.1kHz / (1 + div).
    pub gyro_sample_rate_div: u8,
    /// Accelerometer output rate is 1.125kHz / (1 + div), 12 bits.
    pub accel_sample_rate_div: u16,
}

impl Default for Icm20948Config {
    fn default() -> Self {
        Icm20948Config {
            address: DEFAULT_I2C_ADDR,
            gyro_scale: GyroScaleRange::D500,
            accel_scale: AccelScaleRange::G4,
            gyro_sample_rate_div: 0,
            accel_sample_rate_div: 0,
        }
    }
}

/// ICM20948 accelerometer/gyroscope on a blocking i2c bus. The on chip magnetometer (AK09916)
/// is not used.
/// 
pub struct Icm20948<I2C>
{
    i2c: I2C,
    config: Icm20948Config,

    /// Register bank last selected, `None` if unknown (e.g. after a failed bank switch).
    bank: Option<u8>,

    initialized: bool,
}

impl<I2C: I2c> Icm20948<I2C>
{
    pub fn new(i2c: I2C, config: Icm20948Config) -> Self {
        Icm20948 { i2c, config, bank: None, initialized: false }
    }

    /// Give back the i2c bus, e.g. to probe for another chip.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn config(&self) -> &Icm20948Config {
        &self.config
    }

    pub fn who_am_i(&mut self) -> Result<u8, ImuError<I2C::Error>> {
        self.select_bank(BANK_0)?;
        self.read_register(WHO_AM_I)
    }

    fn select_bank(&mut self, bank: u8) -> Result<(), ImuError<I2C::Error>> {
        if self.bank == Some(bank) {
            return Ok(());
        }
        self.bank = None;
        self.write_register(REG_BANK_SEL, bank)?;
        self.bank = Some(bank);
        Ok(())
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
        self.select_bank(BANK_0)?;
        let mut data = [ 0u8; 6 ];
        self.i2c.write_read(self.config.address, &[ register ], &mut data).map_err(ImuError::Bus)?;
        Ok(be_bytes_to_vector(&data))
    }
}

impl<I2C: I2c> SampleSource for Icm20948<I2C>
{
    type Error = ImuError<I2C::Error>;

    fn read_gyro(&mut self) -> Result<Vector, Self::Error> {
        self.read_vector(GYRO_XOUT_H)
    }

    fn read_accel(&mut self) -> Result<Vector, Self::Error> {
        self.read_vector(ACCEL_XOUT_H)
    }
}

impl<I2C: I2c> ImuDevice for Icm20948<I2C>
{
    fn name(&self) -> &'static str {
        "ICM20948"
    }

    fn connective(&mut self) -> Result<bool, Self::Error> {
        Ok(self.who_am_i()? == WHO_AM_I_VALUE)
    }

    fn wake_up<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.select_bank(BANK_0)?;
        self.write_register(PWR_MGMT_1, PWR_MGMT_1_CLKSEL_AUTO)?;
        delay.delay_ms(ICM20948_WAKE_UP_DELAY_MS);
        Ok(())
    }

    fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.initialized = false;
        self.wake_up(delay)?;

        let who_am_i = self.who_am_i()?;
        if who_am_i != WHO_AM_I_VALUE {
            log::error!("ICM20948 WHO_AM_I mismatch: {:#04x}", who_am_i);
            return Err(ImuError::UnknownDevice { who_am_i });
        }

        self.write_register(PWR_MGMT_2, PWR_MGMT_2_ENABLE_ALL)?;

        self.select_bank(BANK_2)?;
        self.write_register(GYRO_CONFIG_1, self.config.gyro_scale.as_icm_register())?;
        self.write_register(GYRO_SMPLRT_DIV, self.config.gyro_sample_rate_div)?;
        self.write_register(ACCEL_CONFIG, self.config.accel_scale.as_icm_register())?;
        self.write_register(ACCEL_SMPLRT_DIV_1, ((self.config.accel_sample_rate_div >> 8) & 0x0F) as u8)?;
        self.write_register(ACCEL_SMPLRT_DIV_2, (self.config.accel_sample_rate_div & 0xFF) as u8)?;
        self.select_bank(BANK_0)?;

        self.initialized = true;
        log::info!("ICM20948 initialized ({:?}, {:?})", self.config.gyro_scale, self.config.accel_scale);
        Ok(())
    }

    fn gyro_scale(&self) -> GyroScaleRange {
        self.config.gyro_scale
    }

    fn accel_scale(&self) -> AccelScaleRange {
        self.config.accel_scale
    }
}
