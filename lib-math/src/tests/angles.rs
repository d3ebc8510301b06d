use crate::*;

#[test]
fn test_wrap_in_range_is_noop() {
    for angle in [0.0, 45.0, -45.0, 179.5, -179.5, 180.0] {
        assert_eq!(wrap_degrees(angle), angle);
    }
}

#[test]
fn test_wrap_out_of_range() {
    assert!(libm::fabsf(wrap_degrees(190.0) - -170.0) < 1e-4);
    assert!(libm::fabsf(wrap_degrees(-185.0) - 175.0) < 1e-4);
    assert_eq!(wrap_degrees(-180.0), 180.0);
}

#[test]
fn test_wrap_is_idempotent() {
    for angle in [190.0, -185.0, 359.0, -359.0, 12.5] {
        let once = wrap_degrees(angle);
        assert_eq!(wrap_degrees(once), once);
    }
}

#[test]
fn test_attitude_normalized() {
    let attitude = Attitude::new(190.0, -185.0, 10.0).normalized();
    assert!(attitude.approx_eq(&Attitude::new(-170.0, 175.0, 10.0), 1e-4));
}

#[test]
fn test_attitude_approx_eq_across_wrap() {
    let a = Attitude::new(179.9, 0.0, 0.0);
    let b = Attitude::new(-179.9, 0.0, 0.0);
    assert!(a.approx_eq(&b, 0.25));
    assert!(!a.approx_eq(&Attitude::identity(), 0.25));
}

#[test]
fn test_degree_radian_conversion() {
    assert!(libm::fabsf(to_degrees(core::f32::consts::PI) - 180.0) < 1e-3);
    assert!(libm::fabsf(to_radians(90.0) - core::f32::consts::FRAC_PI_2) < 1e-4);
}
