//! Register addresses of the supported chips.

/// ICM20948 registers, the register map is split into four banks selected through
/// `REG_BANK_SEL` (which is reachable from every bank).
pub mod icm20948 {
    pub const WHO_AM_I_VALUE: u8 = 0xEA;

    pub const REG_BANK_SEL: u8 = 0x7F;

    pub const BANK_0: u8 = 0x00;
    pub const BANK_2: u8 = 0x20;

    // Bank 0
    pub const WHO_AM_I: u8 = 0x00;
    pub const PWR_MGMT_1: u8 = 0x06;
    pub const PWR_MGMT_2: u8 = 0x07;
    pub const ACCEL_XOUT_H: u8 = 0x2D;
    pub const GYRO_XOUT_H: u8 = 0x33;

    // Bank 2
    pub const GYRO_SMPLRT_DIV: u8 = 0x00;
    pub const GYRO_CONFIG_1: u8 = 0x01;
    pub const ACCEL_SMPLRT_DIV_1: u8 = 0x10;
    pub const ACCEL_SMPLRT_DIV_2: u8 = 0x11;
    pub const ACCEL_CONFIG: u8 = 0x14;

    /// Wake up (clear SLEEP) with the best available clock source.
    pub const PWR_MGMT_1_CLKSEL_AUTO: u8 = 0x01;
    /// Accelerometer and gyroscope enabled on all axes.
    pub const PWR_MGMT_2_ENABLE_ALL: u8 = 0x00;
}

/// MPU9250 registers (the MPU6500 part, magnetometer excluded).
pub mod mpu9250 {
    /// MPU9250, MPU9255 and MPU6500 all share this register map.
    pub const WHO_AM_I_VALUES: [u8; 4] = [0x71, 0x73, 0x75, 0x70];

    pub const SMPLRT_DIV: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_CONFIG_2: u8 = 0x1D;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const WHO_AM_I: u8 = 0x75;

    /// Wake up (clear SLEEP) with the PLL as clock source when ready.
    pub const PWR_MGMT_1_CLKSEL_AUTO: u8 = 0x01;
}
