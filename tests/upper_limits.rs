use angcorr::{
    angcorr::AngularCorrelation,
    cascade::{ EMCharacter::{ Electric, Magnetic }, Parity::{ Negative, Positive }, State, Transition },
    distribution::Distribution,
    notation::parse_cascade,
    sphere::SpherePointSampler,
};

fn max_on_sphere(w: &AngularCorrelation) -> f64 {
    let (theta, phi) = SpherePointSampler::default().sample(1000).unwrap();
    theta.iter().zip(phi.iter())
        .map(|(t, p)| w.eval(*t, *p))
        .fold(f64::NEG_INFINITY, f64::max)
}

#[test]
fn dir_dir_limit_is_attained() {
    for notation in ["0 1 0", "0 2 0", "0 1 [2.0] 2"] {
        let w = AngularCorrelation::from_cascade(parse_cascade(notation).unwrap()).unwrap();
        let max = max_on_sphere(&w);
        let limit = w.upper_limit();
        assert!(max <= limit + 1e-12);
        assert!(max > 0.98 * limit, "{}: max {} vs limit {}", notation, max, limit);
    }
}

#[test]
fn pol_dir_limit_is_an_upper_bound() {
    let cascades = [
        AngularCorrelation::new(
            State::new(0, Positive),
            vec![
                (Transition::new(Magnetic, 2, Electric, 4, 0.0).unwrap(), State::new(2, Positive)),
                (Transition::unpolarized(2, 4, 0.0).unwrap(), State::spin(0)),
            ],
        ).unwrap(),
        AngularCorrelation::new(
            State::new(0, Positive),
            vec![
                (Transition::new(Electric, 4, Magnetic, 6, 0.0).unwrap(), State::new(4, Positive)),
                (Transition::unpolarized(4, 6, 0.0).unwrap(), State::spin(0)),
            ],
        ).unwrap(),
        AngularCorrelation::new(
            State::new(3, Positive),
            vec![
                (Transition::new(Magnetic, 6, Electric, 8, 2.0).unwrap(), State::new(9, Positive)),
                (Transition::new(Magnetic, 2, Electric, 4, -2.0).unwrap(), State::new(7, Positive)),
            ],
        ).unwrap(),
        AngularCorrelation::new(
            State::new(0, Positive),
            vec![
                (Transition::new(Electric, 2, Magnetic, 4, 0.0).unwrap(), State::new(2, Negative)),
                (Transition::new(Electric, 2, Magnetic, 4, 0.5).unwrap(), State::new(2, Positive)),
            ],
        ).unwrap(),
    ];
    for w in cascades.iter() {
        assert!(w.is_polarized());
        assert!(max_on_sphere(w) <= w.upper_limit());
    }
}
