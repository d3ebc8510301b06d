
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelScaleRange
{
    G2 = 0,
    G4 = 1,
    G8 = 2,
    G16 = 3,
}

impl AccelScaleRange {

    /// Bits for the `ACCEL_CONFIG` register of the MPU9250 (ACCEL_FS_SEL in bits 4:3).
    /// 
    pub fn as_mpu_register(&self) -> u8 {
        ((*self) as u8) << 3
    }

    /// Bits for the bank 2 `ACCEL_CONFIG` register of the ICM20948 (ACCEL_FS_SEL in bits 2:1),
    /// with the low pass filter (ACCEL_FCHOICE) enabled.
    /// 
    pub fn as_icm_register(&self) -> u8 {
        (((*self) as u8) << 1) | 1
    }

    /// Gets the sensitivity scale factor for the given scale range.
    /// (Note scale factor is in LSB/g).
    /// 
    pub fn as_scale_factor(&self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }
}

impl Default for AccelScaleRange {
    fn default() -> Self {
        AccelScaleRange::G4
    }
}
