use super::*;
use crate::optimize::provider::Evaluation;

fn quadratic_towards(
    target: f32,
) -> impl FnMut(&ImageTensor, Precision) -> SymmetraResult<Evaluation> {
    move |image, _| {
        let n = image.data().len() as f64;
        let loss = image
            .data()
            .iter()
            .map(|&v| f64::from(v - target).powi(2))
            .sum::<f64>()
            / n;
        let grad = image
            .data()
            .iter()
            .map(|&v| (2.0 * f64::from(v - target) / n) as f32)
            .collect();
        Ok(Evaluation {
            loss,
            gradient: ImageTensor::new(image.dims(), grad)?,
        })
    }
}

#[test]
fn frozen_values_cover_every_channel_of_a_pixel() {
    let dims = Dimensions::new(4, 4, 3);
    let frozen = frozen_values(&ViewMask::annulus(0.0, 0.5), dims);
    assert_eq!(frozen.len(), dims.len());
    let center = ((2 * 4 + 2) * 3) as usize;
    assert_eq!(&frozen[center..center + 3], &[true, true, true]);
    assert_eq!(&frozen[0..3], &[false, false, false]);
}

#[test]
fn perturbation_is_seeded_bounded_and_skips_frozen_values() {
    let cfg = OptimizerConfig::default();
    let dims = Dimensions::new(8, 8, 1);
    let frozen = (0..dims.len()).map(|i| i % 2 == 0).collect::<Vec<_>>();
    let noisy = |seed| {
        let mut canvas = ImageTensor::filled(dims, 250.0).unwrap();
        perturb(
            &mut canvas,
            0.4,
            &cfg,
            Some(&frozen),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        canvas
    };
    let a = noisy(7);
    assert_eq!(a, noisy(7));
    assert_ne!(a, noisy(8));
    for (i, &v) in a.data().iter().enumerate() {
        assert!((0.0..=255.0).contains(&v));
        if frozen[i] {
            assert_eq!(v, 250.0);
        }
    }
    assert!(a.data().iter().any(|&v| v < 250.0));
}

#[test]
fn perturbation_refuses_unbounded_noise() {
    let cfg = OptimizerConfig::default();
    let mut canvas = ImageTensor::filled(Dimensions::new(2, 2, 1), 10.0).unwrap();
    let err = perturb(
        &mut canvas,
        f64::INFINITY,
        &cfg,
        None,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap_err();
    assert!(matches!(err, SymmetraError::Evaluation(_)));
    assert!(canvas.data().iter().all(|&v| v == 10.0));
}

#[test]
fn quadratic_converges_in_one_resolution() {
    let cfg = OptimizerConfig {
        target_loss: Some(1e-2),
        ..OptimizerConfig::default()
    };
    let opt = Optimizer::new(cfg).unwrap();
    let canvas = ImageTensor::filled(Dimensions::new(6, 6, 3), 20.0).unwrap();
    let out = opt
        .optimize(
            &canvas,
            &mut quadratic_towards(100.0),
            &ResolutionSchedule::single(6).unwrap(),
        )
        .unwrap();
    assert_eq!(out.result.cause, TerminationCause::Succeeded);
    assert_eq!(out.result.runs, 1);
    assert!(out.result.noise_magnitudes.is_empty());
    assert!(out.result.final_loss <= 1e-2);
    assert!(out.canvas.data().iter().all(|&v| (v - 100.0).abs() < 1.0));
}

#[test]
fn exhausted_budget_is_timed_out_only_with_a_missed_target() {
    let canvas = ImageTensor::filled(Dimensions::new(2, 2, 1), 0.0).unwrap();
    let schedule = ResolutionSchedule::single(2).unwrap();

    let with_target = Optimizer::new(OptimizerConfig {
        max_iterations: 0,
        target_loss: Some(1.0),
        ..OptimizerConfig::default()
    })
    .unwrap();
    let out = with_target
        .optimize(&canvas, &mut quadratic_towards(100.0), &schedule)
        .unwrap();
    assert_eq!(out.result.cause, TerminationCause::TimedOut);
    assert_eq!(out.result.iterations, 0);

    let without_target = Optimizer::new(OptimizerConfig {
        timeout_ms: Some(0),
        ..OptimizerConfig::default()
    })
    .unwrap();
    let out = without_target
        .optimize(&canvas, &mut quadratic_towards(100.0), &schedule)
        .unwrap();
    assert_eq!(out.result.cause, TerminationCause::Succeeded);
    assert_eq!(out.canvas, canvas);
}

#[test]
fn frozen_region_is_left_untouched() {
    let cfg = OptimizerConfig {
        target_loss: Some(1e-6),
        max_iterations: 40,
        frozen: Some(ViewMask {
            max_x: 0.0,
            ..ViewMask::default()
        }),
        ..OptimizerConfig::default()
    };
    let canvas = ImageTensor::filled(Dimensions::new(4, 2, 1), 20.0).unwrap();
    let out = Optimizer::new(cfg)
        .unwrap()
        .optimize(
            &canvas,
            &mut quadratic_towards(100.0),
            &ResolutionSchedule::single(4).unwrap(),
        )
        .unwrap();
    for y in 0..2 {
        assert_eq!(out.canvas.get(0, y, 0), 20.0);
        assert_eq!(out.canvas.get(1, y, 0), 20.0);
        assert!(out.canvas.get(3, y, 0) > 20.0);
    }
}
