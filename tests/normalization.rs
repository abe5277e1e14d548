use std::f64::consts::PI;
use angcorr::{
    angcorr::AngularCorrelation,
    cascade::{ EMCharacter::{ Electric, Magnetic }, Parity::Positive, State, Transition },
    distribution::Distribution,
    sphere::SphereIntegrator,
};

const N_POINTS: usize = 10_000;

fn check_normalized(w: &AngularCorrelation) {
    let integral
        = SphereIntegrator::default()
        .integrate_full(|theta, phi| w.eval(theta, phi), N_POINTS)
        .unwrap();
    assert!(
        (integral - 4.0 * PI).abs() < 1e-3,
        "{}: integral {} deviates from 4π", w.cascade(), integral,
    );
}

fn unpol(two_L: u32, two_Lp: u32, delta: f64) -> Transition {
    Transition::unpolarized(two_L, two_Lp, delta).unwrap()
}

#[test]
fn dir_dir_pure() {
    let w = AngularCorrelation::new(
        State::spin(0),
        vec![(unpol(2, 4, 0.0), State::spin(2)), (unpol(2, 4, 0.0), State::spin(4))],
    ).unwrap();
    check_normalized(&w);
}

#[test]
fn dir_dir_mixed() {
    let w = AngularCorrelation::new(
        State::spin(0),
        vec![(unpol(2, 4, 0.0), State::spin(2)), (unpol(2, 4, 2.0), State::spin(4))],
    ).unwrap();
    check_normalized(&w);
}

#[test]
fn dir_dir_unobserved_mixed() {
    let w = AngularCorrelation::new(
        State::spin(0),
        vec![
            (unpol(2, 4, 0.0), State::spin(2)),
            (unpol(2, 4, 2.0), State::spin(2)),
            (unpol(2, 4, 0.0), State::spin(4)),
        ],
    ).unwrap();
    check_normalized(&w);
}

#[test]
fn pol_dir_mixed() {
    let w = AngularCorrelation::new(
        State::new(3, Positive),
        vec![
            (Transition::new(Magnetic, 6, Electric, 8, 2.0).unwrap(), State::new(9, Positive)),
            (Transition::new(Magnetic, 2, Electric, 4, -2.0).unwrap(), State::new(7, Positive)),
        ],
    ).unwrap();
    assert!(w.is_polarized());
    check_normalized(&w);
}

#[test]
fn pol_dir_unobserved_mixed() {
    let w = AngularCorrelation::new(
        State::new(3, Positive),
        vec![
            (Transition::new(Magnetic, 6, Electric, 8, 0.0).unwrap(), State::new(9, Positive)),
            (Transition::new(Magnetic, 2, Electric, 4, 2.0).unwrap(), State::new(7, Positive)),
            (Transition::new(Magnetic, 2, Electric, 4, 0.0).unwrap(), State::new(7, Positive)),
        ],
    ).unwrap();
    assert!(w.is_polarized());
    check_normalized(&w);
}

#[test]
fn rotated_correlation_stays_normalized() {
    let w = AngularCorrelation::new(
        State::new(3, Positive),
        vec![
            (Transition::new(Magnetic, 6, Electric, 8, 2.0).unwrap(), State::new(9, Positive)),
            (Transition::new(Magnetic, 2, Electric, 4, -2.0).unwrap(), State::new(7, Positive)),
        ],
    ).unwrap();
    let integral
        = SphereIntegrator::default()
        .integrate_full(|theta, phi| w.eval_rotated(theta, phi, [0.3, 1.1, -0.4]), N_POINTS)
        .unwrap();
    assert!((integral - 4.0 * PI).abs() < 2e-3);
}
