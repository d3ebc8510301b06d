use math::Vector;

/// Anything that can hand out raw gyroscope and accelerometer triples on demand, typically an IMU
/// driver. Values are raw sensor counts (signed 16 bit register values widened to f32) unless the
/// source scales them itself, in which case calibration results are in the same physical units.
/// 
/// Reads are synchronous and may block on the bus, a failed read (e.g. the sensor got
/// disconnected) is reported through `Self::Error`.
/// 
pub trait SampleSource
{
    type Error: core::fmt::Debug;

    /// Read the current angular rate on all three axes.
    fn read_gyro(&mut self) -> Result<Vector, Self::Error>;

    /// Read the current acceleration on all three axes.
    fn read_accel(&mut self) -> Result<Vector, Self::Error>;
}

impl<T: SampleSource + ?Sized> SampleSource for &mut T
{
    type Error = T::Error;

    fn read_gyro(&mut self) -> Result<Vector, Self::Error> {
        (**self).read_gyro()
    }

    fn read_accel(&mut self) -> Result<Vector, Self::Error> {
        (**self).read_accel()
    }
}
