use super::*;

#[test]
fn vertices_and_center_are_inside() {
    assert!(Hex::contains(Point::ORIGIN));
    assert!(Hex::contains(Point::new(1.0, 0.0)));
    assert!(Hex::contains(Point::new(-0.5, HALF_HEIGHT)));
}

#[test]
fn corners_are_outside() {
    assert!(!Hex::contains(Point::new(0.95, 0.95)));
    assert!(!Hex::contains(Point::new(0.0, 0.9)));
    assert!(!Hex::contains(Point::new(0.9, 0.3)));
}

#[test]
fn mask_discards_and_wrap_reflects() {
    let p = Point::new(0.9, -0.8);
    assert_eq!(Hex::mask().apply(p), None);
    assert_eq!(Hex::wrap().apply(p), Some(Point::new(-0.9, 0.8)));
    let inside = Point::new(0.1, 0.2);
    assert_eq!(Hex::mask().apply(inside), Some(inside));
    assert_eq!(Hex::wrap().apply(inside), Some(inside));
}
