use super::*;

fn close(a: Point, b: Point, eps: f64) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
}

#[test]
fn zero_rotation_is_identity_inside_chart() {
    let m = Spherical::default();
    for &(x, y) in &[(0.0, 0.0), (0.3, -0.4), (-0.9, 0.8), (0.5, 0.5)] {
        let p = Point::new(x, y);
        assert!(close(m.apply(p).unwrap(), p, 1e-12), "{p:?}");
    }
}

#[test]
fn forward_then_inverse_round_trips() {
    let m = Spherical::new(0.7, -0.4);
    let inv = m.inverse();
    for iy in -8..=8 {
        for ix in -8..=8 {
            let p = Point::new(f64::from(ix) * 0.1, f64::from(iy) * 0.1);
            let q = m.apply(p).unwrap();
            let back = inv.apply(q).unwrap();
            assert!(close(back, p, 1e-9), "{p:?} -> {q:?} -> {back:?}");
        }
    }
}

#[test]
fn yaw_only_shifts_azimuth() {
    let m = Spherical::new(std::f64::consts::FRAC_PI_2, 0.0);
    let q = m.apply(Point::new(0.0, 0.25)).unwrap();
    assert!(close(q, Point::new(0.5, 0.25), 1e-12));
}

#[test]
fn azimuth_wraps_and_elevation_reflects() {
    let (a, e) = normalize_angles(3.0 * PI / 2.0, 0.0);
    assert!((a + PI / 2.0).abs() < 1e-12);
    assert_eq!(e, 0.0);

    let (a, e) = normalize_angles(0.0, PI * 0.75);
    assert!((e - PI * 0.25).abs() < 1e-12);
    assert!((a.abs() - PI).abs() < 1e-12);
}

#[test]
fn inverse_of_inverse_is_forward() {
    let m = Spherical::new(0.2, 0.3);
    assert_eq!(m.inverse().inverse(), m);
}
