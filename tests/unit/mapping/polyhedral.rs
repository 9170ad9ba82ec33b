use super::*;

#[test]
fn generated_groups_have_expected_orders() {
    for g in [
        RotationGroup::Tetrahedral,
        RotationGroup::Octahedral,
        RotationGroup::Icosahedral,
    ] {
        assert_eq!(g.elements().len(), g.order(), "{g:?}");
    }
}

#[test]
fn group_elements_are_rotations() {
    for m in RotationGroup::Icosahedral.elements() {
        let t = Mat3([
            [m.0[0][0], m.0[1][0], m.0[2][0]],
            [m.0[0][1], m.0[1][1], m.0[2][1]],
            [m.0[0][2], m.0[1][2], m.0[2][2]],
        ]);
        assert!(m.mul(&t).approx_eq(&Mat3::IDENTITY, 1e-9));
    }
}

#[test]
fn reference_direction_is_a_fixed_point_of_the_fold() {
    let m = Polyhedral::new(RotationGroup::Octahedral);
    let r = Polyhedral::reference();
    let p = Point::new(r.x, r.y);
    let q = m.apply(p).unwrap();
    assert!((q.x - p.x).abs() < 1e-12 && (q.y - p.y).abs() < 1e-12);
}

#[test]
fn fold_is_invariant_under_the_group() {
    let m = Polyhedral::new(RotationGroup::Tetrahedral);
    let v = Vec3::new(0.3, -0.2, 0.9).normalized().unwrap();
    let reference = Polyhedral::reference();
    let base = fold(RotationGroup::Tetrahedral.elements(), v, reference).unwrap();
    for g in RotationGroup::Tetrahedral.elements() {
        let w = fold(RotationGroup::Tetrahedral.elements(), g.apply(v), reference).unwrap();
        assert!((w.x - base.x).abs() < 1e-9);
        assert!((w.y - base.y).abs() < 1e-9);
        assert!((w.z - base.z).abs() < 1e-9);
    }
    assert!(m.apply(Point::new(0.3, -0.2)).is_some());
}

#[test]
fn disk_fold_is_undefined_outside_the_disk_but_expansion_is_not() {
    let disk = Polyhedral::new(RotationGroup::Icosahedral);
    let expanded = Polyhedral::expanded(RotationGroup::Icosahedral);
    let corner = Point::new(0.95, -0.95);
    assert_eq!(disk.apply(corner), None);
    let q = expanded.apply(corner).unwrap();
    assert!(q.length() <= 1.0);
}
