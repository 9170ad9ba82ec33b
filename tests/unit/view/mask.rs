use super::*;

#[test]
fn default_admits_every_canvas_point() {
    let m = ViewMask::default();
    assert!(m.is_unbounded());
    for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (-1.0, 1.0), (0.999, -0.999)] {
        assert!(m.contains(Point::new(x, y)));
    }
    assert!(!m.contains(Point::new(1.01, 0.0)));
}

#[test]
fn annulus_excludes_center_and_rim() {
    let m = ViewMask::annulus(0.25, 0.75);
    assert!(!m.contains(Point::new(0.1, 0.0)));
    assert!(m.contains(Point::new(0.5, 0.0)));
    assert!(!m.contains(Point::new(0.8, 0.0)));
}

#[test]
fn inverted_bounds_are_rejected() {
    let m = ViewMask {
        min_x: 0.5,
        max_x: -0.5,
        ..ViewMask::default()
    };
    assert!(m.validate().is_err());
    assert!(ViewMask::default().validate().is_ok());
}
