use math::Vector;

/// Converts six bytes of big endian `[X_H, X_L, Y_H, Y_L, Z_H, Z_L]` register contents into a
/// vector of raw counts.
/// 
#[inline]
pub fn be_bytes_to_vector(data: &[u8; 6]) -> Vector {
    Vector::from([
        i16::from_be_bytes([data[0], data[1]]),
        i16::from_be_bytes([data[2], data[3]]),
        i16::from_be_bytes([data[4], data[5]]),
    ])
}
