// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::f64::consts::LN_10;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{rngs::StdRng, SeedableRng};

use super::*;
use crate::tests::ZeroRng;

fn planck() -> CibPlanck2013<f64> {
    CibPlanck2013::new(CibParams::default()).unwrap()
}

struct NoEvolution(CibPlanck2013<f64>);

impl SourceModel<f64> for NoEvolution {
    fn base(&self) -> &CibPlanck2013<f64> {
        &self.0
    }

    fn redshift_evolution(&self, _z: f64) -> f64 {
        0.0
    }
}

#[test]
fn test_defaults_are_valid() {
    let params = CibParams::<f64>::default();
    assert!(params.validate().is_ok());
    assert_eq!(params.nside, 4096);
    assert_abs_diff_eq!(params.shang_mpeak, 10f64.powf(12.3));
    assert!(CibParams::<f32>::default().validate().is_ok());
}

#[test]
fn test_invalid_params_are_named() {
    let params = CibParams::<f64> {
        shang_td: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ModelError::InvalidParameter {
            name: "shang_td",
            ..
        })
    ));

    let params = CibParams::<f64> {
        min_redshift: 3.0,
        max_redshift: 2.0,
        ..Default::default()
    };
    assert!(matches!(
        CibPlanck2013::new(params),
        Err(ModelError::InvalidParameter {
            name: "max_redshift",
            ..
        })
    ));

    let params = CibParams::<f64> {
        nside: 0,
        ..Default::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ModelError::InvalidParameter { name: "nside", .. })
    ));

    let params = CibParams::<f64> {
        jiang_zeta: f64::NAN,
        ..Default::default()
    };
    assert!(params.validate().is_err());
}

#[test]
fn test_params_from_partial_toml() {
    let params: CibParams<f64> = toml::from_str("shang_td = 25.0\nnside = 512").unwrap();
    assert_abs_diff_eq!(params.shang_td, 25.0);
    assert_eq!(params.nside, 512);
    assert_abs_diff_eq!(params.shang_beta, 1.6);

    assert!(toml::from_str::<CibParams<f64>>("not_a_parameter = 1.0").is_err());
}

#[test]
fn test_params_cast() {
    let params = CibParams::<f64>::default();
    let single: CibParams<f32> = params.cast();
    assert_eq!(single.nside, params.nside);
    assert_relative_eq!(single.shang_mpeak as f64, params.shang_mpeak, max_relative = 1e-7);
    assert_abs_diff_eq!(single.jiang_alpha_1, -0.83);
}

#[test]
fn test_sed_break() {
    let model = planck();
    let x0 = model.sed_break();
    let p = model.params();
    let target = 3.0 + p.shang_beta + p.shang_gamma;
    assert_abs_diff_eq!(x0 / (1.0 - (-x0).exp()), target, epsilon = 1e-9);
    assert!(x0 > 6.0 && x0 < 6.5, "{x0}");
}

#[test]
fn test_sed_is_continuous_at_the_break() {
    let model = planck();
    let z = 0.5;
    let td = model.dust_temperature(z);
    let nu_break = model.sed_break() * td * BOLTZMANN_K / PLANCK_H;
    let below = model.theta(nu_break * (1.0 - 1e-9), z);
    let above = model.theta(nu_break * (1.0 + 1e-9), z);
    assert_relative_eq!(below, above, max_relative = 1e-6);

    // The slope matches too.
    let eps = 1e-4;
    let slope_below =
        (model.theta(nu_break, z) / model.theta(nu_break * (1.0 - eps), z)).ln() / -(1.0 - eps).ln();
    let slope_above =
        (model.theta(nu_break * (1.0 + eps), z) / model.theta(nu_break, z)).ln() / (1.0 + eps).ln();
    assert_abs_diff_eq!(slope_below, slope_above, epsilon = 1e-3);
    assert_abs_diff_eq!(slope_above, -model.params().shang_gamma, epsilon = 1e-3);
}

const PLANCK_H: f64 = crate::constants::PLANCK_H_CGS;
const BOLTZMANN_K: f64 = crate::constants::BOLTZMANN_K_CGS;

#[test]
fn test_redshift_evolution() {
    let model = planck();
    assert_abs_diff_eq!(model.redshift_evolution(0.0), 1.0);
    assert_relative_eq!(model.redshift_evolution(1.0), 2f64.powf(2.4));
    // Plateau beyond z = 2.
    assert_relative_eq!(model.redshift_evolution(2.0), 3f64.powf(2.4));
    assert_relative_eq!(model.redshift_evolution(4.5), 3f64.powf(2.4));
}

#[test]
fn test_luminosities() {
    let model = planck();
    let p = *model.params();
    let peak = p.shang_mpeak / (2.0 * std::f64::consts::PI * p.shang_sigma_m).sqrt();
    assert_relative_eq!(model.central_luminosity(p.shang_mpeak, 0.0), peak, max_relative = 1e-12);
    assert_relative_eq!(
        model.satellite_luminosity(p.shang_mpeak, 1.0),
        peak * 2f64.powf(2.4),
        max_relative = 1e-12
    );

    // Luminosity per unit mass peaks at M_peak.
    let l_over_m = |m: f64| model.central_luminosity(m, 0.0) / m;
    assert!(l_over_m(p.shang_mpeak) > l_over_m(p.shang_mpeak * 3.0));
    assert!(l_over_m(p.shang_mpeak) > l_over_m(p.shang_mpeak / 3.0));

    // Dark below the minimum mass.
    assert_eq!(model.central_luminosity(p.shang_mmin * 0.99, 0.0), 0.0);
    assert_eq!(model.satellite_luminosity(p.shang_mmin * 0.99, 0.0), 0.0);
    assert!(model.satellite_luminosity(p.shang_mmin, 0.0) > 0.0);
}

#[test]
fn test_no_evolution_variant_is_dark() {
    let model = NoEvolution(planck());
    for &z in &[0.0, 0.5, 3.0] {
        assert_eq!(model.central_luminosity(1e13, z), 0.0);
        assert_eq!(model.satellite_luminosity(1e12, z), 0.0);
    }
    // Everything else is inherited.
    assert_abs_diff_eq!(
        model.spectral_shape(1e12, 1.0),
        model.0.spectral_shape(1e12, 1.0)
    );
}

#[test]
fn test_flux_scaling() {
    let model = planck();
    let nu = 545e9;
    let s = model.flux(1e12, 1.0, nu, 3000.0).unwrap();
    assert!(s > 0.0 && s.is_finite());
    assert_relative_eq!(model.flux(2e12, 1.0, nu, 3000.0).unwrap(), 2.0 * s, max_relative = 1e-12);
    assert_relative_eq!(model.flux(1e12, 1.0, nu, 6000.0).unwrap(), s / 4.0, max_relative = 1e-12);
    assert_eq!(model.flux(0.0, 1.0, nu, 3000.0).unwrap(), 0.0);

    // Flux at z = 0 is finite given a non-zero distance.
    let s0 = model.flux(1e12, 0.0, nu, 10.0).unwrap();
    assert!(s0 > 0.0 && s0.is_finite());
}

#[test]
fn test_flux_errors() {
    let model = planck();
    assert_eq!(
        model.flux(-1.0, 1.0, 1e11, 100.0),
        Err(FluxError::BadLuminosity(-1.0))
    );
    assert_eq!(
        model.flux(1.0, -0.5, 1e11, 100.0),
        Err(FluxError::BadRedshift(-0.5))
    );
    assert_eq!(model.flux(1.0, 1.0, 0.0, 100.0), Err(FluxError::BadFrequency(0.0)));
    assert!(matches!(
        model.flux(1.0, 1.0, f64::NAN, 100.0),
        Err(FluxError::BadFrequency(_))
    ));
    assert_eq!(model.flux(1.0, 1.0, 1e11, 0.0), Err(FluxError::BadDistance(0.0)));
    assert!(matches!(
        model.flux(f64::INFINITY, 1.0, 1e11, 100.0),
        Err(FluxError::BadLuminosity(_))
    ));
}

#[test]
fn test_single_precision_agrees() {
    let double = planck();
    let single = CibPlanck2013::<f32>::new(CibParams::default()).unwrap();
    for &(l, z, nu, d) in &[(1e12, 0.3, 353e9, 1200.0), (5e13, 2.5, 857e9, 5500.0)] {
        let s64 = double.flux(l, z, nu, d).unwrap();
        let s32 = single
            .flux(l as f32, z as f32, nu as f32, d as f32)
            .unwrap();
        assert_relative_eq!(s32 as f64, s64, max_relative = 1e-4);
    }
}

fn radio() -> RadioSehgal2009<f64> {
    RadioSehgal2009::new(RadioParams::default()).unwrap()
}

#[test]
fn test_radio_defaults_are_valid() {
    let params = RadioParams::<f64>::default();
    assert!(params.validate().is_ok());
    assert!(RadioParams::<f32>::default().validate().is_ok());
    assert_abs_diff_eq!(params.nu_ref, 151e6);
    assert_eq!(params.fr1, PopulationParams::fr1());

    let params = RadioParams::<f64> {
        fr2: PopulationParams {
            lf_max: -1.0,
            ..PopulationParams::fr2()
        },
        ..Default::default()
    };
    assert!(matches!(
        RadioSehgal2009::new(params),
        Err(ModelError::InvalidParameter {
            name: "fr2.lf_max",
            ..
        })
    ));
}

#[test]
fn test_radio_params_from_toml() {
    let params: RadioParams<f64> = toml::from_str("nside = 64\nmin_mass = 2e13").unwrap();
    assert_eq!(params.nside, 64);
    assert_abs_diff_eq!(params.min_mass, 2e13);
    assert_eq!(params.fr2, PopulationParams::fr2());

    // The defaults survive a trip through TOML.
    let s = toml::to_string(&RadioParams::<f64>::default()).unwrap();
    let params: RadioParams<f64> = toml::from_str(&s).unwrap();
    assert_eq!(params, RadioParams::default());

    // Population tables must be complete.
    assert!(toml::from_str::<RadioParams<f64>>("[fr1]\nn0 = 2.0").is_err());
}

#[test]
fn test_radio_populations() {
    let model = radio();
    let fr1 = model.population(FanaroffRiley::I);
    let fr2 = model.population(FanaroffRiley::II);
    assert_eq!(fr1.kind(), FanaroffRiley::I);
    assert_eq!(fr2.kind().to_string(), "FR II");
    assert_eq!(model.populations()[1].kind(), FanaroffRiley::II);

    let cuts = fr1.halo_cuts();
    assert_abs_diff_eq!(cuts.max_redshift, 4.5);
    assert_abs_diff_eq!(cuts.min_mass, 1e13);

    let p = fr1.params();
    assert_relative_eq!(fr1.mean_count(p.m0), p.n0);
    assert_relative_eq!(fr1.mean_count(10.0 * p.m0), p.n0 * 10f64.powf(p.alpha));

    // The break evolves up to the plateau.
    assert_relative_eq!(fr1.break_luminosity(0.0), p.lb);
    assert_relative_eq!(fr1.break_luminosity(0.5), p.lb * 1.5f64.powf(p.delta));
    assert_relative_eq!(fr1.break_luminosity(3.0), fr1.break_luminosity(p.z_plat));
}

#[test]
fn test_radio_luminosity_function() {
    let model = radio();
    let fr1 = model.population(FanaroffRiley::I);
    let p = *fr1.params();
    let mut rng = StdRng::seed_from_u64(5);
    let n = 100_000;
    let draws: Vec<f64> = (0..n).map(|_| fr1.sample_log_luminosity(&mut rng)).collect();
    assert!(draws.iter().all(|&u| u >= p.lf_min && u <= p.lf_max));

    // The fraction below the break matches the luminosity function.
    let faint = |u0: f64| (10f64.powf(-p.faint_slope * u0) - 1.0) / (p.faint_slope * LN_10);
    let bright = (1.0 - 10f64.powf(-p.bright_slope * p.lf_max)) / (p.bright_slope * LN_10);
    let expected = faint(p.lf_min) / (faint(p.lf_min) + bright);
    let observed = draws.iter().filter(|&&u| u < 0.0).count() as f64 / n as f64;
    assert_abs_diff_eq!(observed, expected, epsilon = 0.01);

    // So does the fraction within a decade below the break.
    let within = draws.iter().filter(|&&u| (-1.0..0.0).contains(&u)).count() as f64 / n as f64;
    assert_abs_diff_eq!(within, faint(-1.0) / (faint(p.lf_min) + bright), epsilon = 0.01);

    // The smallest deviate gives the faintest source.
    assert_abs_diff_eq!(fr1.sample_log_luminosity(&mut ZeroRng), p.lf_min, epsilon = 1e-12);
}

#[test]
fn test_radio_occupation() {
    let model = radio();
    let fr2 = model.population(FanaroffRiley::II);
    let mut rng = StdRng::seed_from_u64(9);
    let mass = 1e14;
    let expected = fr2.mean_count(mass);
    assert!(expected < 1.0);
    let n = 50_000;
    let mut lit = 0;
    let mut luminosities = vec![];
    for _ in 0..n {
        let l = fr2.central_source(&(), &mut rng, mass, 1.0).unwrap();
        if l > 0.0 {
            lit += 1;
        }
        fr2.satellite_sources(&(), &mut rng, mass, 1.0, &mut luminosities)
            .unwrap();
    }
    assert_abs_diff_eq!(lit as f64 / n as f64, expected, epsilon = 0.005);
    // Rare populations have no satellites.
    assert!(luminosities.is_empty());

    // Heavy halos always have a lit central and satellites on average
    // numbering one less than the mean count.
    let fr1 = model.population(FanaroffRiley::I);
    let mass = 1e17;
    let expected = fr1.mean_count(mass) - 1.0;
    let n = 20_000;
    for _ in 0..n {
        assert!(fr1.central_source(&(), &mut rng, mass, 0.5).unwrap() > 0.0);
        fr1.satellite_sources(&(), &mut rng, mass, 0.5, &mut luminosities)
            .unwrap();
    }
    assert_relative_eq!(
        luminosities.len() as f64 / n as f64,
        expected,
        max_relative = 0.05
    );
    assert!(luminosities.iter().all(|&l| l > 0.0 && l.is_finite()));
}

#[test]
fn test_radio_zero_rng() {
    let fr1 = radio().population(FanaroffRiley::I).clone();
    let mut luminosities = vec![];
    fr1.satellite_sources(&(), &mut ZeroRng, 1e17, 0.0, &mut luminosities)
        .unwrap();
    assert!(luminosities.is_empty());
    // A zero deviate is below any positive probability.
    let l = fr1.central_source(&(), &mut ZeroRng, 1e13, 0.0).unwrap();
    assert_relative_eq!(
        l,
        fr1.params().lb * 10f64.powf(fr1.params().lf_min),
        max_relative = 1e-12
    );
}

#[test]
fn test_radio_flux() {
    let model = radio();
    let fr1 = model.population(FanaroffRiley::I);
    let s = fr1.params().spectral_index;
    let (l, z, d) = (1e25, 0.5, 1900.0);
    let s1 = fr1.flux(l, z, 100e9, d).unwrap();
    let s2 = fr1.flux(l, z, 220e9, d).unwrap();
    assert_relative_eq!(s2 / s1, 2.2f64.powf(s), max_relative = 1e-10);

    // A 10^25 W/Hz source at 1 Gpc with no redshift or k-correction.
    let flat = fr1.flux(l, 0.0, 151e6, 1000.0).unwrap();
    let by_hand = l / (4.0 * std::f64::consts::PI * (1000.0 * 3.085677581491367e22f64).powi(2)) / 1e-26;
    assert_relative_eq!(flat, by_hand, max_relative = 1e-12);

    assert_eq!(fr1.flux(l, z, 100e9, 0.0), Err(FluxError::BadDistance(0.0)));
    assert_eq!(fr1.flux(0.0, z, 100e9, d).unwrap(), 0.0);

    // Single precision doesn't overflow for bright FR II sources.
    let single = RadioSehgal2009::<f32>::new(RadioParams::default()).unwrap();
    let fr2 = single.population(FanaroffRiley::II);
    let l = fr2.break_luminosity(4.0) * 100.0;
    assert!(l.is_finite());
    let s32 = fr2.flux(l, 4.0, 30e9, 7000.0).unwrap();
    let s64 = model
        .population(FanaroffRiley::II)
        .flux(l as f64, 4.0, 30e9, 7000.0)
        .unwrap();
    assert_relative_eq!(s32 as f64, s64, max_relative = 1e-4);
}
