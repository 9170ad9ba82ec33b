use super::*;

#[test]
fn unity_rank_3_is_stable_under_powers() {
    let u = Permutation::unity(3);
    assert!(u.is_unity());
    assert_eq!(u.order(), 1);
    for k in 0..8 {
        assert_eq!(u.power(k), u);
    }
    assert_eq!(u.compose(&u).unwrap(), u);
}

#[test]
fn rejects_duplicates_and_out_of_range() {
    assert!(Permutation::new([1, 1, 2]).is_err());
    assert!(Permutation::new([1, -1, 2]).is_err());
    assert!(Permutation::new([1, 4, 2]).is_err());
    assert!(Permutation::new([0, 1]).is_err());
    assert!(Permutation::new(Vec::<i32>::new()).is_err());
}

#[test]
fn cyclic_rgb_rotation_has_order_three() {
    let p = Permutation::new([2, 3, 1]).unwrap();
    assert_eq!(p.order(), 3);
    assert!(p.closes_after(3));
    assert!(!p.closes_after(2));
    let ring = p.ring();
    assert_eq!(ring.len(), 3);
    assert!(ring[0].is_unity());
    assert_eq!(ring[1], p);
    assert_eq!(ring[2], p.power(2));
}

#[test]
fn sign_flip_doubles_order() {
    let p = Permutation::new([-2, 1]).unwrap();
    // (1 -> -2 -> -1 -> 2 -> 1)
    assert_eq!(p.order(), 4);
    assert!(p.power(2).indices().iter().all(|v| *v < 0));
}

#[test]
fn composition_is_associative() {
    let a = Permutation::new([2, -3, 1]).unwrap();
    let b = Permutation::new([-1, 3, 2]).unwrap();
    let c = Permutation::new([3, 1, -2]).unwrap();
    let left = a.compose(&b).unwrap().compose(&c).unwrap();
    let right = a.compose(&b.compose(&c).unwrap()).unwrap();
    assert_eq!(left, right);
}

#[test]
fn inverse_composes_to_unity() {
    let p = Permutation::new([3, -1, 2, -4]).unwrap();
    assert!(p.compose(&p.inverse()).unwrap().is_unity());
    assert!(p.inverse().compose(&p).unwrap().is_unity());
}

#[test]
fn compose_rejects_rank_mismatch() {
    let a = Permutation::unity(2);
    let b = Permutation::unity(3);
    assert!(a.compose(&b).is_err());
}

#[test]
fn closing_enumeration_only_returns_closing_elements() {
    let all = Permutation::closing(3, 3).unwrap();
    assert!(all.iter().all(|p| p.closes_after(3)));
    assert!(all.iter().any(|p| p.is_unity()));
    assert!(all.contains(&Permutation::new([2, 3, 1]).unwrap()));
    assert!(!all.contains(&Permutation::new([2, 1, 3]).unwrap()));
    // Unity plus the two 3-cycles with an even number of sign flips each.
    assert_eq!(all.len(), 1 + 8);
    assert!(Permutation::closing(7, 2).is_err());
}

#[test]
fn serde_round_trip_validates() {
    let p: Permutation = serde_json::from_str("[2, -1, 3]").unwrap();
    assert_eq!(p.to_string(), "[2, -1, 3]");
    assert!(serde_json::from_str::<Permutation>("[1, 1]").is_err());
}
