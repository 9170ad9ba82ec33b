use super::*;

#[test]
fn point_rotate_quarter_turn() {
    let p = Point::new(1.0, 0.0).rotate(std::f64::consts::FRAC_PI_2);
    assert!(p.x.abs() < 1e-12);
    assert!((p.y - 1.0).abs() < 1e-12);
}

#[test]
fn point_rms_and_length() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.length(), 5.0);
    assert!((p.rms() - (12.5f64).sqrt()).abs() < 1e-12);
    assert_eq!(p.scale(2.0), Point::new(6.0, 8.0));
}

#[test]
fn pixel_center_round_trips_through_nearest_pixel() {
    let d = Dimensions::new(7, 5, 3);
    for y in 0..d.height {
        for x in 0..d.width {
            assert_eq!(d.nearest_pixel(d.pixel_center(x, y)), Some((x, y)));
        }
    }
    assert_eq!(d.nearest_pixel(Point::new(1.5, 0.0)), None);
    assert_eq!(d.nearest_pixel(Point::new(f64::NAN, 0.0)), None);
}

#[test]
fn dimensions_reject_zero_extent() {
    assert!(Dimensions::new(0, 4, 3).validate().is_err());
    assert!(Dimensions::new(4, 4, 0).validate().is_err());
    assert_eq!(
        Dimensions::new(64, 32, 3).scaled_to_width(128),
        Dimensions::new(128, 64, 3)
    );
}

#[test]
fn tensor_rejects_mismatched_buffer() {
    let err = ImageTensor::new(Dimensions::new(2, 2, 3), vec![0.0; 5]).unwrap_err();
    assert!(matches!(err, SymmetraError::Validation(_)));
}

#[test]
fn nearest_resize_of_constant_image_is_constant() {
    let img = ImageTensor::filled(Dimensions::new(4, 4, 3), 100.0).unwrap();
    let out = img
        .resize(
            Dimensions::new(8, 8, 3),
            Resample::Nearest,
            ImageTensor::VALUE_MIN,
            ImageTensor::VALUE_MAX,
        )
        .unwrap();
    assert_eq!(out.dims(), Dimensions::new(8, 8, 3));
    assert!(out.data().iter().all(|v| (v - 100.0).abs() < 1e-3));
}

#[test]
fn resize_keeps_values_in_a_signed_range() {
    let img = ImageTensor::filled(Dimensions::new(2, 2, 1), -0.5).unwrap();
    let out = img
        .resize(Dimensions::new(4, 4, 1), Resample::Bilinear, -1.0, 1.0)
        .unwrap();
    assert!(out.data().iter().all(|v| (v + 0.5).abs() < 1e-5), "{:?}", out.data());

    let clipped = ImageTensor::filled(Dimensions::new(2, 2, 1), 3.0)
        .unwrap()
        .resize(Dimensions::new(4, 4, 1), Resample::Nearest, -1.0, 1.0)
        .unwrap();
    assert!(clipped.data().iter().all(|&v| v == 1.0));
}

#[test]
fn resize_rejects_an_empty_range() {
    let img = ImageTensor::filled(Dimensions::new(2, 2, 1), 0.0).unwrap();
    let err = img
        .resize(Dimensions::new(4, 4, 1), Resample::Nearest, 1.0, 1.0)
        .unwrap_err();
    assert!(matches!(err, SymmetraError::Validation(_)));
}

#[test]
fn rgb8_snapshot_quantizes_and_clamps() {
    let img = ImageTensor::new(Dimensions::new(1, 1, 3), vec![-4.0, 127.6, 300.0]).unwrap();
    assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [0, 128, 255]);
}
