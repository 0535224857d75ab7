// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The radio model: FR I and FR II radio galaxies with power-law spectra.

use std::f64::consts::LN_10;

use log::debug;
use rand::Rng;
use strum_macros::{Display, EnumIter};

use super::{
    check_flux_inputs, finite_flux, FluxError, HaloCuts, HaloModel, ModelError,
    OccupationError, PopulationParams, RadioParams,
};
use crate::{
    constants::{JANSKY, MPC_M, PI},
    math::{sample_poisson, Real},
};

/// The two radio populations.
#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum FanaroffRiley {
    #[strum(serialize = "FR I")]
    I,

    #[strum(serialize = "FR II")]
    II,
}

/// The radio model of Li et al. (2021), after Sehgal et al. (2009). Each of
/// its populations is painted separately.
#[derive(Debug, Clone)]
pub struct RadioSehgal2009<T> {
    params: RadioParams<T>,
    fr1: RadioPopulation<T>,
    fr2: RadioPopulation<T>,
}

impl<T: Real> RadioSehgal2009<T> {
    pub fn new(params: RadioParams<T>) -> Result<RadioSehgal2009<T>, ModelError> {
        params.validate()?;
        let fr1 = RadioPopulation::new(FanaroffRiley::I, &params, params.fr1);
        let fr2 = RadioPopulation::new(FanaroffRiley::II, &params, params.fr2);
        Ok(RadioSehgal2009 { params, fr1, fr2 })
    }

    pub fn params(&self) -> &RadioParams<T> {
        &self.params
    }

    pub fn population(&self, kind: FanaroffRiley) -> &RadioPopulation<T> {
        match kind {
            FanaroffRiley::I => &self.fr1,
            FanaroffRiley::II => &self.fr2,
        }
    }

    pub fn populations(&self) -> [&RadioPopulation<T>; 2] {
        [&self.fr1, &self.fr2]
    }
}

/// One population of radio galaxies.
#[derive(Debug, Clone)]
pub struct RadioPopulation<T> {
    kind: FanaroffRiley,
    cuts: HaloCuts<T>,
    nu_ref: T,
    params: PopulationParams<T>,

    /// The unnormalised probability of a source being fainter than the break.
    faint_weight: f64,

    /// The unnormalised probability of a source being brighter than the break.
    bright_weight: f64,
}

impl<T: Real> RadioPopulation<T> {
    fn new(
        kind: FanaroffRiley,
        radio: &RadioParams<T>,
        params: PopulationParams<T>,
    ) -> RadioPopulation<T> {
        let lf_min = params.lf_min.as_f64();
        let lf_max = params.lf_max.as_f64();
        let faint_weight = exp10_area(params.faint_slope.as_f64(), lf_min, 0.0);
        let bright_weight = exp10_area(params.bright_slope.as_f64(), 0.0, lf_max);
        debug!(
            "{kind}: {:.3} of sources are fainter than the break",
            faint_weight / (faint_weight + bright_weight)
        );
        RadioPopulation {
            kind,
            cuts: HaloCuts {
                min_redshift: radio.min_redshift,
                max_redshift: radio.max_redshift,
                min_mass: radio.min_mass,
            },
            nu_ref: radio.nu_ref,
            params,
            faint_weight,
            bright_weight,
        }
    }

    pub fn kind(&self) -> FanaroffRiley {
        self.kind
    }

    pub fn params(&self) -> &PopulationParams<T> {
        &self.params
    }

    /// The mean number of sources in a halo with mass `mass` \[M☉\].
    pub fn mean_count(&self, mass: T) -> T {
        self.params.n0 * (mass / self.params.m0).powf(self.params.alpha)
    }

    /// The break of the luminosity function at redshift `z` \[W/Hz\].
    pub fn break_luminosity(&self, z: T) -> T {
        self.params.lb * (T::one() + z.min(self.params.z_plat)).powf(self.params.delta)
    }

    /// Draw log10(L / L_b) by inverting the CDF of the broken luminosity
    /// function. Uses exactly one uniform deviate.
    pub fn sample_log_luminosity<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let lf_min = self.params.lf_min.as_f64();
        let lf_max = self.params.lf_max.as_f64();
        let area = rng.gen::<f64>() * (self.faint_weight + self.bright_weight);
        let u = if area < self.faint_weight {
            invert_exp10_area(self.params.faint_slope.as_f64(), lf_min, area)
        } else {
            invert_exp10_area(
                self.params.bright_slope.as_f64(),
                0.0,
                area - self.faint_weight,
            )
        };
        T::cast(u.clamp(lf_min, lf_max))
    }

    /// A luminosity at `nu_ref` for a source at redshift `z` \[W/Hz\].
    pub fn sample_luminosity<R: Rng + ?Sized>(&self, rng: &mut R, z: T) -> T {
        let u = self.sample_log_luminosity(rng);
        self.break_luminosity(z) * T::cast(10f64.powf(u.as_f64()))
    }
}

impl<T: Real> HaloModel<T> for RadioPopulation<T> {
    type Tables = ();

    fn halo_cuts(&self) -> HaloCuts<T> {
        self.cuts
    }

    fn tables(&self, _max_host_mass: T) -> Result<(), OccupationError> {
        Ok(())
    }

    /// The central is lit with probability min(1, ⟨N⟩).
    fn central_source<R: Rng + ?Sized>(
        &self,
        _tables: &(),
        rng: &mut R,
        mass: T,
        z: T,
    ) -> Result<T, OccupationError> {
        let mean = self.mean_count(mass).as_f64();
        if rng.gen::<f64>() < mean.min(1.0) {
            Ok(self.sample_luminosity(rng, z))
        } else {
            Ok(T::zero())
        }
    }

    /// A Poisson number of satellites with mean max(⟨N⟩ - 1, 0).
    fn satellite_sources<R: Rng + ?Sized>(
        &self,
        _tables: &(),
        rng: &mut R,
        mass: T,
        z: T,
        luminosities: &mut Vec<T>,
    ) -> Result<(), OccupationError> {
        let mean = self.mean_count(mass).as_f64() - 1.0;
        let count = sample_poisson(rng, mean)?;
        luminosities.reserve(count);
        for _ in 0..count {
            luminosities.push(self.sample_luminosity(rng, z));
        }
        Ok(())
    }

    /// The flux \[Jy\] of a source with luminosity `luminosity` at `nu_ref`
    /// \[W/Hz\].
    fn flux(
        &self,
        luminosity: T,
        z: T,
        nu_obs: T,
        transverse_distance: T,
    ) -> Result<T, FluxError> {
        check_flux_inputs(luminosity, z, nu_obs, transverse_distance)?;

        let one_plus_z = T::one() + z;
        let k_correction = (nu_obs * one_plus_z / self.nu_ref).powf(self.params.spectral_index);
        // Applied first, so single precision doesn't overflow.
        let to_jy = T::cast(1.0 / (4.0 * PI * MPC_M * MPC_M * JANSKY));
        finite_flux(
            luminosity * to_jy * k_correction
                / (transverse_distance * transverse_distance * one_plus_z),
        )
    }
}

/// The integral of 10^(-slope u) du over `[u0, u1]`.
fn exp10_area(slope: f64, u0: f64, u1: f64) -> f64 {
    if slope == 0.0 {
        u1 - u0
    } else {
        (10f64.powf(-slope * u0) - 10f64.powf(-slope * u1)) / (slope * LN_10)
    }
}

/// The u for which the integral of 10^(-slope u) over `[u0, u]` is `area`.
fn invert_exp10_area(slope: f64, u0: f64, area: f64) -> f64 {
    if slope == 0.0 {
        u0 + area
    } else {
        -(10f64.powf(-slope * u0) - area * slope * LN_10).log10() / slope
    }
}
