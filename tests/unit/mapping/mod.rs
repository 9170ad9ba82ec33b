use super::*;

#[test]
fn identical_parameters_share_an_identity() {
    let a = Mapping::Hyperbolic(Hyperbolic::new(7, 3));
    let b = Mapping::Hyperbolic(Hyperbolic::new(7, 3));
    let c = Mapping::Hyperbolic(Hyperbolic::new(5, 4));
    assert_eq!(a.identity_hash(), b.identity_hash());
    assert_ne!(a.identity_hash(), c.identity_hash());
    assert_ne!(
        Mapping::Hex(Hex::mask()).identity_hash(),
        Mapping::Hex(Hex::wrap()).identity_hash()
    );
}

#[test]
fn json_uses_kind_tags() {
    let m: Mapping = serde_json::from_str(r#"{"kind":"tunnel","scale":3.0}"#).unwrap();
    assert_eq!(
        m,
        Mapping::Tunnel(Tunnel {
            scale: 3.0,
            ..Tunnel::default()
        })
    );
    let json = serde_json::to_string(&Mapping::Hex(Hex::wrap())).unwrap();
    assert_eq!(json, r#"{"kind":"hex","wrap":true}"#);
    let m: Mapping = serde_json::from_str(r#"{"kind":"identity"}"#).unwrap();
    assert_eq!(m, Mapping::Identity);
}

#[test]
fn non_finite_input_is_undefined() {
    assert_eq!(Mapping::Identity.apply(Point::new(f64::NAN, 0.0)), None);
    assert_eq!(
        Mapping::Rotate(Rotate::new(0.3)).apply(Point::new(0.0, f64::INFINITY)),
        None
    );
}

#[test]
fn domains_follow_the_family() {
    assert_eq!(
        Mapping::Hyperbolic(Hyperbolic::default()).domain(),
        MappingDomain::Disk
    );
    assert_eq!(
        Mapping::Polyhedral(Polyhedral::new(RotationGroup::Octahedral)).domain(),
        MappingDomain::Disk
    );
    assert_eq!(
        Mapping::Polyhedral(Polyhedral::expanded(RotationGroup::Octahedral)).domain(),
        MappingDomain::Square
    );
    assert!(MappingDomain::Disk.contains(Point::new(0.6, 0.6)));
    assert!(!MappingDomain::Disk.contains(Point::new(0.8, 0.8)));
    assert!(MappingDomain::Square.contains(Point::new(1.0, -1.0)));
}

#[test]
fn tunnel_center_is_excluded_not_a_panic() {
    assert_eq!(
        Mapping::Tunnel(Tunnel::default()).apply(Point::ORIGIN),
        None
    );
}

#[test]
fn validate_reports_mapping_errors() {
    let err = Mapping::Hyperbolic(Hyperbolic::new(4, 4))
        .validate()
        .unwrap_err();
    assert!(matches!(err, crate::SymmetraError::Mapping(_)));
    assert!(Mapping::Identity.validate().is_ok());
}
