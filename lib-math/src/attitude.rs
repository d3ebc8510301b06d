use crate::*;

/// Orientation of the device as roll/pitch/yaw in degrees, each kept within `(-180, 180]`. 
/// 
/// Roll = rotation around X-axis
/// Pitch = rotation around Y-axis
/// Yaw = rotation around Z-axis
/// 
/// Note that Euler angles suffer from gimbal lock: when pitch approaches +-90 degrees roll and yaw
/// become degenerate, so consumers should not trust roll/yaw much in that region.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude
{
    pub roll: f32,
    pub pitch: f32, 
    pub yaw: f32,
}

impl Attitude
{
    pub const fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Attitude { roll, pitch, yaw }
    }

    /// Creates an all zeros attitude, i.e. the level/no rotation orientation.
    /// 
    pub const fn identity() -> Self {
        Attitude { roll: 0.0, pitch: 0.0, yaw: 0.0 }
    }

    /// Wraps every angle into `(-180, 180]`, see [`wrap_degrees`].
    /// 
    pub fn normalized(&self) -> Self {
        Attitude {
            roll: wrap_degrees(self.roll),
            pitch: wrap_degrees(self.pitch),
            yaw: wrap_degrees(self.yaw),
        }
    }

    /// Approximate equality check with a given tolerance (in degrees). Wrap-around is taken into
    /// account, so `179.9` and `-179.9` are `0.2` degrees apart.
    pub fn approx_eq(&self, other: &Self, tol: f32) -> bool {
        libm::fabsf(wrap_degrees(self.roll - other.roll)) <= tol
            && libm::fabsf(wrap_degrees(self.pitch - other.pitch)) <= tol
            && libm::fabsf(wrap_degrees(self.yaw - other.yaw)) <= tol
    }
}

impl From<Vector> for Attitude {

    /// Interprets the x/y/z components of the vector as roll/pitch/yaw respectively, which is how
    /// integrated gyroscope rates (rotations around each axis) map onto the attitude.
    /// 
    #[inline]
    fn from(v: Vector) -> Self {
        Attitude::new(v.x, v.y, v.z)
    }
}

impl From<Attitude> for Vector {
    #[inline]
    fn from(a: Attitude) -> Self {
        Vector::new(a.roll, a.pitch, a.yaw)
    }
}
