
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroScaleRange
{
    D250 = 0,
    D500 = 1,
    D1000 = 2,
    D2000 = 3,
}

impl GyroScaleRange {

    /// Bits for the `GYRO_CONFIG` register of the MPU9250 (GYRO_FS_SEL in bits 4:3).
    /// 
    pub fn as_mpu_register(&self) -> u8 {
        ((*self) as u8) << 3
    }

    /// Bits for the bank 2 `GYRO_CONFIG_1` register of the ICM20948 (GYRO_FS_SEL in bits 2:1),
    /// with the low pass filter (GYRO_FCHOICE) enabled.
    /// 
    pub fn as_icm_register(&self) -> u8 {
        (((*self) as u8) << 1) | 1
    }

    /// Gets the sensitivity scale factor for the given scale range.
    /// (Note scale factor is in LSB / (deg/s)).
    /// 
    pub fn as_scale_factor(&self) -> f32 {
        match self {
            Self::D250 => 131.0,
            Self::D500 => 65.5,
            Self::D1000 => 32.8,
            Self::D2000 => 16.4,
        }
    }
}

impl Default for GyroScaleRange {
    fn default() -> Self {
        GyroScaleRange::D500
    }
}
