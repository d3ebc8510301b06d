use core::{error::Error, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImuError<E>
{
    /// The underlying i2c transaction failed.
    Bus(E),
    /// A chip answered but its WHO_AM_I register holds an unexpected value.
    UnknownDevice { who_am_i: u8 },
    /// Sensor data was requested before `init` succeeded.
    NotInitialized,
}

impl<E: fmt::Debug> Error for ImuError<E> {}

impl<E: fmt::Debug> fmt::Display for ImuError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "I2C error: {:?}", err),
            Self::UnknownDevice { who_am_i } => write!(f, "Unknown device (WHO_AM_I = {:#04x})", who_am_i),
            Self::NotInitialized => write!(f, "IMU not initialized"),
        }
    }
}
