use super::*;

#[test]
fn widths_are_sorted_and_deduplicated() {
    let s = ResolutionSchedule::new([64, 16, 32, 16]).unwrap();
    assert_eq!(s.widths(), &[16, 32, 64]);
    assert_eq!(s.len(), 3);
}

#[test]
fn empty_and_zero_widths_are_rejected() {
    assert!(ResolutionSchedule::new(Vec::new()).is_err());
    assert!(ResolutionSchedule::new([0, 8]).is_err());
}

#[test]
fn dimensions_keep_the_aspect_ratio() {
    let s = ResolutionSchedule::new([20, 40]).unwrap();
    let dims = s.dimensions(Dimensions::new(80, 40, 3));
    assert_eq!(dims, vec![Dimensions::new(20, 10, 3), Dimensions::new(40, 20, 3)]);
}

#[test]
fn json_goes_through_validation() {
    let s: ResolutionSchedule = serde_json::from_str("[32, 8]").unwrap();
    assert_eq!(s.widths(), &[8, 32]);
    assert!(serde_json::from_str::<ResolutionSchedule>("[]").is_err());
}
