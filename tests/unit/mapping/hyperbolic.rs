use super::*;

#[test]
fn rejects_euclidean_and_spherical_parameters() {
    assert!(Hyperbolic::new(4, 4).validate().is_err());
    assert!(Hyperbolic::new(6, 3).validate().is_err());
    assert!(Hyperbolic::new(3, 5).validate().is_err());
    assert!(Hyperbolic::new(7, 3).validate().is_ok());
    assert!(Hyperbolic::new(5, 4).validate().is_ok());
}

#[test]
fn sides_are_orthogonal_to_the_unit_circle() {
    let h = Hyperbolic::new(7, 3);
    for s in h.sides() {
        let d = s.center.length();
        assert!((d * d - s.radius * s.radius - 1.0).abs() < 1e-9);
        assert!((d - s.radius - h.inradius()).abs() < 1e-12);
    }
}

#[test]
fn central_tile_is_fixed() {
    let h = Hyperbolic::new(5, 4);
    let p = Point::new(0.05, -0.03);
    assert_eq!(h.apply(p), Some(p));
}

#[test]
fn folded_points_land_in_central_tile() {
    let h = Hyperbolic::new(7, 3);
    let sides = h.sides();
    for i in 0..40 {
        let angle = f64::from(i) * 0.37;
        let p = Point::new(0.85 * angle.cos(), 0.85 * angle.sin());
        let q = h.apply(p).unwrap();
        assert!(
            sides
                .iter()
                .all(|s| (q - s.center).length() >= s.radius - 1e-9),
            "{p:?} -> {q:?}"
        );
    }
}

#[test]
fn beyond_max_radius_is_undefined() {
    let h = Hyperbolic {
        max_radius: 0.5,
        ..Hyperbolic::new(7, 3)
    };
    assert_eq!(h.apply(Point::new(0.6, 0.0)), None);
}

#[test]
fn shallow_depth_leaves_far_points_undefined() {
    let shallow = Hyperbolic {
        depth: 1,
        ..Hyperbolic::new(7, 3)
    };
    assert_eq!(shallow.apply(Point::new(0.97, 0.0)), None);
}

#[test]
fn model_conversions_invert() {
    let p = Point::new(0.3, -0.45);
    for model in [DiskModel::Poincare, DiskModel::Klein, DiskModel::Squared] {
        let there = model.to_poincare(p).unwrap();
        let back = model.from_poincare(there).unwrap();
        assert!((back - p).length() < 1e-12, "{model:?}");
    }
}
