use super::*;
use crate::mapping::Hex;

fn stage(dims: Dimensions, mapping: Mapping) -> TransformStage {
    View::new(mapping).unwrap().get_view(dims).unwrap()
}

#[test]
fn kaleidoscope_rejects_channels_that_do_not_close() {
    let cycle = Permutation::new([2, 3, 1]).unwrap();
    assert!(Kaleidoscope::new(3, cycle.clone()).is_ok());
    assert!(Kaleidoscope::new(6, cycle.clone()).is_ok());
    let err = Kaleidoscope::new(4, cycle).unwrap_err();
    assert!(matches!(err, SymmetraError::Validation(_)));
    assert!(Kaleidoscope::plain(0, 3).is_err());
}

#[test]
fn kaleidoscope_views_follow_the_channel_orbit() {
    let k = Kaleidoscope::new(4, Permutation::new([-1, 2]).unwrap()).unwrap();
    let views = k.views(None).unwrap();
    assert_eq!(views.len(), 4);
    assert!(views[0].is_none());
    let odd = views[1].as_ref().unwrap();
    assert_eq!(odd.channels().map(|p| p.indices().to_vec()), Some(vec![-1, 2]));
    let even = views[2].as_ref().unwrap();
    assert!(even.channels().is_none());
}

#[test]
fn soft_symmetry_halves_undefined_regions() {
    let dims = Dimensions::new(16, 16, 1);
    let sym = Symmetrizer::new(dims, vec![None, Some(stage(dims, Mapping::Hex(Hex::mask())))])
        .unwrap();
    let out = sym.forward(&ImageTensor::filled(dims, 100.0).unwrap()).unwrap();
    assert_eq!(out.image.get(8, 8, 0), 100.0);
    assert_eq!(out.image.get(0, 0, 0), 50.0);
    assert!(out.clamped.iter().all(|&c| !c));
}

#[test]
fn clamped_values_block_the_gradient() {
    let dims = Dimensions::new(2, 1, 1);
    let sym = Symmetrizer::new(dims, vec![None]).unwrap();
    let input = ImageTensor::new(dims, vec![300.0, 40.0]).unwrap();
    let out = sym.forward(&input).unwrap();
    assert_eq!(out.image.data(), &[255.0, 40.0]);
    assert_eq!(out.clamped, vec![true, false]);

    let grad = sym
        .backward(&out.clamped, &ImageTensor::filled(dims, 1.0).unwrap())
        .unwrap();
    assert_eq!(grad.data(), &[0.0, 1.0]);
}

#[test]
fn four_fold_kaleidoscope_is_rotation_invariant() {
    let dims = Dimensions::new(8, 8, 1);
    let k = Kaleidoscope::plain(4, 1).unwrap();
    let branches = k
        .views(None)
        .unwrap()
        .into_iter()
        .map(|v| v.map(|v| v.get_view(dims).unwrap()))
        .collect();
    let sym = Symmetrizer::new(dims, branches).unwrap();
    let data = (0..64).map(|i| ((i * 37) % 200) as f32).collect();
    let out = sym
        .forward(&ImageTensor::new(dims, data).unwrap())
        .unwrap()
        .image;
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(out.get(x, y, 0), out.get(7 - y, x, 0), "({x}, {y})");
        }
    }
}

#[test]
fn branches_must_match_the_canvas() {
    let dims = Dimensions::new(8, 8, 3);
    let other = stage(Dimensions::new(4, 4, 3), Mapping::Identity);
    assert!(Symmetrizer::new(dims, vec![None, Some(other)]).is_err());
    assert!(Symmetrizer::new(dims, Vec::new()).is_err());
}
