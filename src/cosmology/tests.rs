// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::{assert_abs_diff_eq, assert_relative_eq};

use super::*;

fn flat_lcdm() -> CosmologyParams {
    CosmologyParams {
        h: 0.7,
        omega_m: 0.3,
        omega_r: Some(0.0),
        ..Default::default()
    }
}

#[test]
fn test_default_densities() {
    let p = CosmologyParams::default();
    // Radiation is tiny but non-zero.
    assert!(p.omega_radiation() > 0.0);
    assert!(p.omega_radiation() < 1e-4);
    assert_abs_diff_eq!(
        p.omega_m + p.omega_k + p.omega_radiation() + p.omega_lambda(),
        1.0,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(p.e2(0.0), 1.0, epsilon = 1e-12);
}

#[test]
fn test_known_comoving_distance() {
    let cosmo = Cosmology::<f64>::new(&flat_lcdm()).unwrap();
    // FlatLambdaCDM(H0=70, Om0=0.3) has a comoving distance of ~3303.8 Mpc to
    // z = 1.
    let d = cosmo.redshift_to_distance(1.0).unwrap();
    assert_abs_diff_eq!(d, 3303.8, epsilon = 1.0);
    assert_abs_diff_eq!(cosmo.redshift_to_distance(0.0).unwrap(), 0.0);
    // Luminosity distance is (1+z) times that for a flat Universe.
    assert_relative_eq!(cosmo.luminosity_distance(1.0).unwrap(), 2.0 * d);
}

#[test]
fn test_round_trip() {
    let cosmo = Cosmology::<f64>::new(&CosmologyParams::default()).unwrap();
    let max = cosmo.max_distance();
    for i in 0..=1000 {
        let d = max * (i as f64 / 1000.0);
        let z = cosmo.distance_to_redshift(d).unwrap();
        let d2 = cosmo.redshift_to_distance(z).unwrap();
        assert_abs_diff_eq!(d, d2, epsilon = 1e-6 * max);
    }
}

#[test]
fn test_round_trip_single_precision() {
    let cosmo = Cosmology::<f32>::new(&CosmologyParams::default()).unwrap();
    for &d in &[1.0f32, 10.0, 500.0, 3000.0, 7000.0] {
        let z = cosmo.distance_to_redshift(d).unwrap();
        let d2 = cosmo.redshift_to_distance(z).unwrap();
        assert_relative_eq!(d, d2, max_relative = 1e-4);
    }
}

#[test]
fn test_distance_to_redshift_strictly_increasing() {
    let cosmo = Cosmology::<f64>::new(&CosmologyParams::default()).unwrap();
    let max = cosmo.max_distance();
    let mut prev = -1.0;
    for i in 0..=5000 {
        let z = cosmo.distance_to_redshift(max * (i as f64 / 5000.0)).unwrap();
        assert!(z > prev, "z = {z} is not larger than {prev}");
        prev = z;
    }
    assert_abs_diff_eq!(prev, cosmo.max_redshift(), epsilon = 1e-9);
}

#[test]
fn test_out_of_domain_is_an_error() {
    let cosmo = Cosmology::<f64>::with_table(&CosmologyParams::default(), 3.0, 1000).unwrap();
    assert!(matches!(
        cosmo.redshift_to_distance(3.5),
        Err(CosmologyError::RedshiftOutOfRange { .. })
    ));
    assert!(matches!(
        cosmo.redshift_to_distance(-0.1),
        Err(CosmologyError::RedshiftOutOfRange { .. })
    ));
    assert!(matches!(
        cosmo.redshift_to_distance(f64::NAN),
        Err(CosmologyError::RedshiftOutOfRange { .. })
    ));
    let too_far = cosmo.max_distance() * 1.001;
    assert!(matches!(
        cosmo.distance_to_redshift(too_far),
        Err(CosmologyError::DistanceOutOfRange { .. })
    ));
    assert!(matches!(
        cosmo.distance_to_redshift(-1.0),
        Err(CosmologyError::DistanceOutOfRange { .. })
    ));
}

#[test]
fn test_bad_parameters() {
    let params = CosmologyParams {
        h: -0.7,
        ..Default::default()
    };
    assert!(matches!(
        Cosmology::<f64>::new(&params),
        Err(CosmologyError::InvalidParameter { name: "h", .. })
    ));

    let params = CosmologyParams {
        omega_m: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        Cosmology::<f64>::new(&params),
        Err(CosmologyError::InvalidParameter {
            name: "omega_m",
            ..
        })
    ));

    assert!(matches!(
        Cosmology::<f64>::with_table(&CosmologyParams::default(), 5.0, 1),
        Err(CosmologyError::TableTooSmall(1))
    ));
    assert!(matches!(
        Cosmology::<f64>::with_table(&CosmologyParams::default(), 0.0, 100),
        Err(CosmologyError::BadTableRange(_))
    ));
}

#[test]
fn test_recollapsing_universe_is_rejected() {
    // E² = 2 - (1+z)² turns around at z = √2 - 1.
    let params = CosmologyParams {
        omega_m: 0.0,
        omega_k: -1.0,
        omega_r: Some(0.0),
        ..Default::default()
    };
    assert!(matches!(
        Cosmology::<f64>::new(&params),
        Err(CosmologyError::NonPositiveExpansion { .. })
    ));
}

#[test]
fn test_curvature() {
    let flat = Curvature {
        omega_k: 0.0,
        hubble_distance: 4000.0,
        min_distance: 1.0,
    };
    assert_abs_diff_eq!(flat.transverse(1000.0), 1000.0);

    let open = Curvature {
        omega_k: 0.1,
        hubble_distance: 4000.0,
        min_distance: 1.0,
    };
    assert!(open.transverse(1000.0) > 1000.0);

    let closed = Curvature {
        omega_k: -0.1,
        hubble_distance: 4000.0,
        min_distance: 1.0,
    };
    assert!(closed.transverse(1000.0) < 1000.0);
    // Small distances are insensitive to curvature.
    assert_relative_eq!(closed.transverse(1.0), 1.0, max_relative = 1e-6);
}

#[test]
fn test_flux_distance_is_floored() {
    let cosmo = Cosmology::<f64>::new(&CosmologyParams::default()).unwrap();
    let curvature = cosmo.curvature();
    assert!(curvature.min_distance > 0.0);
    assert_eq!(curvature.flux_distance(0.0), curvature.min_distance);
    assert_eq!(curvature.flux_distance(1000.0), 1000.0);
    // The floor is the first step of the distance table.
    let z1 = cosmo.distance_to_redshift(curvature.min_distance).unwrap();
    assert!(z1 > 0.0 && z1 < 0.01, "{z1}");
}

#[test]
fn test_virial_radius() {
    let cosmo = Cosmology::<f64>::new(&CosmologyParams::default()).unwrap();
    let r12 = cosmo.virial_radius(1e12);
    // A Milky-Way-sized halo is a few hundred comoving kpc across.
    assert!(r12 > 0.2 && r12 < 0.5, "{r12}");
    // R ∝ M^(1/3).
    assert_relative_eq!(cosmo.virial_radius(8e12), 2.0 * r12, max_relative = 1e-12);
}
