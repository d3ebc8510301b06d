use embedded_hal::{delay::DelayNs, i2c::I2c};
use math::Vector;
use processing::SampleSource;
use crate::*;

/// Whichever supported IMU was found on the bus.
/// 
pub enum AnyImu<I2C>
{
    Icm20948(Icm20948<I2C>),
    Mpu9250(Mpu9250<I2C>),
}

impl<I2C: I2c> AnyImu<I2C>
{
    /// Probe the bus for an ICM20948 and then for an MPU9250 (both at their default address) and
    /// initialize the first one found.
    /// 
    pub fn detect<D: DelayNs>(i2c: I2C, delay: &mut D) -> Result<Self, ImuError<I2C::Error>> {
        Self::detect_with(i2c, delay, Icm20948Config::default(), Mpu9250Config::default())
    }

    pub fn detect_with<D: DelayNs>(
        i2c: I2C,
        delay: &mut D,
        icm_config: Icm20948Config,
        mpu_config: Mpu9250Config,
    ) -> Result<Self, ImuError<I2C::Error>> {
        let mut icm = Icm20948::new(i2c, icm_config);
        if icm.connective()? {
            icm.init(delay)?;
            return Ok(AnyImu::Icm20948(icm));
        }

        let mut mpu = Mpu9250::new(icm.release(), mpu_config);
        let who_am_i = mpu.who_am_i()?;
        if !registers::mpu9250::WHO_AM_I_VALUES.contains(&who_am_i) {
            log::error!("No supported IMU found (WHO_AM_I = {:#04x})", who_am_i);
            return Err(ImuError::UnknownDevice { who_am_i });
        }
        mpu.init(delay)?;
        Ok(AnyImu::Mpu9250(mpu))
    }
}

impl<I2C: I2c> SampleSource for AnyImu<I2C>
{
    type Error = ImuError<I2C::Error>;

    fn read_gyro(&mut self) -> Result<Vector, Self::Error> {
        match self {
            Self::Icm20948(imu) => imu.read_gyro(),
            Self::Mpu9250(imu) => imu.read_gyro(),
        }
    }

    fn read_accel(&mut self) -> Result<Vector, Self::Error> {
        match self {
            Self::Icm20948(imu) => imu.read_accel(),
            Self::Mpu9250(imu) => imu.read_accel(),
        }
    }
}

impl<I2C: I2c> ImuDevice for AnyImu<I2C>
{
    fn name(&self) -> &'static str {
        match self {
            Self::Icm20948(imu) => imu.name(),
            Self::Mpu9250(imu) => imu.name(),
        }
    }

    fn connective(&mut self) -> Result<bool, Self::Error> {
        match self {
            Self::Icm20948(imu) => imu.connective(),
            Self::Mpu9250(imu) => imu.connective(),
        }
    }

    fn wake_up<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        match self {
            Self::Icm20948(imu) => imu.wake_up(delay),
            Self::Mpu9250(imu) => imu.wake_up(delay),
        }
    }

    fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        match self {
            Self::Icm20948(imu) => imu.init(delay),
            Self::Mpu9250(imu) => imu.init(delay),
        }
    }

    fn gyro_scale(&self) -> GyroScaleRange {
        match self {
            Self::Icm20948(imu) => imu.gyro_scale(),
            Self::Mpu9250(imu) => imu.gyro_scale(),
        }
    }

    fn accel_scale(&self) -> AccelScaleRange {
        match self {
            Self::Icm20948(imu) => imu.accel_scale(),
            Self::Mpu9250(imu) => imu.accel_scale(),
        }
    }
}
