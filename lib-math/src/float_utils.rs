use crate::{DEG_TO_RAD, RAD_TO_DEG};

/// Wraps an angle in degrees into the `(-180, 180]` range by adding or subtracting a single full
/// turn. Inputs are expected to be at most one turn out of range, which holds for everything the
/// estimator produces in a single tick (one integration step or one blend step).
/// 
/// Applied to the difference of two angles this gives the shortest angular path between them.
/// 
pub fn wrap_degrees(angle: f32) -> f32 {
    if angle > 180.0 {
        angle - 360.0
    } else if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Convert an angle from radians to degrees.
/// 
#[inline]
pub fn to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Convert an angle from degrees to radians.
/// 
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}
