use super::*;
use crate::foundation::core::Dimensions;

fn search() -> LineSearch {
    LineSearch {
        max_steps: 8,
        armijo: 1e-4,
        backtrack: 0.5,
        lo: 0.0,
        hi: 255.0,
    }
}

fn quadratic(canvas: &ImageTensor) -> SymmetraResult<Measured> {
    let loss = canvas
        .data()
        .iter()
        .map(|&v| f64::from(v - 10.0).powi(2))
        .sum();
    let grad = canvas.data().iter().map(|&v| 2.0 * (v - 10.0)).collect();
    Ok(Measured {
        loss,
        gradient: ImageTensor::new(canvas.dims(), grad)?,
    })
}

fn single(v: f32) -> ImageTensor {
    ImageTensor::new(Dimensions::new(1, 1, 1), vec![v]).unwrap()
}

#[test]
fn overshooting_steps_are_halved() {
    let x = single(0.0);
    let at = quadratic(&x).unwrap();
    let mut calls = 0;
    let accepted = search()
        .search(&x, &at, &[40.0], Precision::Full, |c| {
            calls += 1;
            quadratic(c)
        })
        .unwrap()
        .unwrap();
    // 40 and 20 overshoot, 10 lands on the minimum.
    assert_eq!(calls, 3);
    assert_eq!(accepted.step, 0.25);
    assert_eq!(accepted.canvas.data(), &[10.0]);
    assert_eq!(accepted.measured.loss, 0.0);
}

#[test]
fn steps_are_projected_onto_the_bounds() {
    let x = single(250.0);
    let at = Measured {
        loss: 0.0,
        gradient: single(-1.0),
    };
    let accepted = search()
        .search(&x, &at, &[20.0], Precision::Reduced, |_| {
            Ok(Measured {
                loss: -5.0,
                gradient: single(0.0),
            })
        })
        .unwrap()
        .unwrap();
    assert_eq!(accepted.canvas.data(), &[255.0]);
}

#[test]
fn ascent_directions_are_refused_without_evaluating() {
    let x = single(0.0);
    let at = quadratic(&x).unwrap();
    let result = search()
        .search(&x, &at, &[-5.0], Precision::Full, |_| {
            panic!("must not evaluate")
        })
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn exhausted_trials_report_failure() {
    let x = single(100.0);
    let at = quadratic(&x).unwrap();
    let mut calls = 0;
    let result = search()
        .search(&x, &at, &[-1.0], Precision::Full, |c| {
            calls += 1;
            Ok(Measured {
                loss: f64::INFINITY,
                gradient: c.clone(),
            })
        })
        .unwrap();
    assert!(result.is_none());
    assert_eq!(calls, 8);
}

#[test]
fn evaluation_errors_propagate() {
    let x = single(100.0);
    let at = quadratic(&x).unwrap();
    let err = search()
        .search(&x, &at, &[-1.0], Precision::Full, |_| {
            Err(crate::foundation::error::SymmetraError::evaluation("engine down"))
        })
        .unwrap_err();
    assert!(err.to_string().contains("engine down"));
}
