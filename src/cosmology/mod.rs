// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Background cosmology. The expensive part of a [`Cosmology`] is the table
//! relating comoving distance and redshift; it is built once and then used
//! for every halo in a catalogue.

mod error;
#[cfg(test)]
mod tests;

pub use error::CosmologyError;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_TABLE_MAX_REDSHIFT, DEFAULT_TABLE_SIZE, HUBBLE_DISTANCE_H1_MPC,
        PHOTON_DENSITY_COEFF, RHO_CRIT_H1, VIRIAL_OVERDENSITY,
    },
    math::{interp_increasing, simpson, Real},
};

/// The parameters of a background cosmology. Dark energy follows the CPL
/// parametrisation w(a) = w0 + wa (1 - a).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CosmologyParams {
    /// Dimensionless Hubble constant.
    pub h: f64,

    /// Matter density (Ω_m).
    pub omega_m: f64,

    /// Curvature density (Ω_k).
    pub omega_k: f64,

    /// Radiation density (Ω_r). If this isn't given, it is derived from
    /// `tcmb` and `neff`.
    pub omega_r: Option<f64>,

    /// CMB temperature \[K\]; used to compute Ω_γ.
    pub tcmb: f64,

    /// Effective number of massless neutrino species; used to compute Ω_ν.
    pub neff: f64,

    pub w0: f64,
    pub wa: f64,
}

impl Default for CosmologyParams {
    fn default() -> Self {
        Self {
            h: 0.69,
            omega_m: 0.29,
            omega_k: 0.0,
            omega_r: None,
            tcmb: 2.7255,
            neff: 3.04,
            w0: -1.0,
            wa: 0.0,
        }
    }
}

impl CosmologyParams {
    /// Photon density parameter (Ω_γ).
    pub fn omega_gamma(&self) -> f64 {
        PHOTON_DENSITY_COEFF * self.tcmb.powi(4) / (self.h * self.h)
    }

    /// Radiation density parameter (Ω_r), including massless neutrinos unless
    /// it was given explicitly.
    pub fn omega_radiation(&self) -> f64 {
        self.omega_r.unwrap_or_else(|| {
            let omega_gamma = self.omega_gamma();
            let omega_nu = self.neff * (7.0 / 8.0) * (4.0f64 / 11.0).powf(4.0 / 3.0) * omega_gamma;
            omega_gamma + omega_nu
        })
    }

    /// Dark-energy density parameter (Ω_Λ), which closes the budget.
    pub fn omega_lambda(&self) -> f64 {
        1.0 - self.omega_k - self.omega_m - self.omega_radiation()
    }

    /// E(z)² = H(z)² / H0².
    pub fn e2(&self, z: f64) -> f64 {
        let a = 1.0 / (1.0 + z);
        let de_exponent = -3.0 * (1.0 + self.w0 + self.wa);
        self.omega_radiation() / a.powi(4)
            + self.omega_m / a.powi(3)
            + self.omega_k / a.powi(2)
            + self.omega_lambda() * a.powf(de_exponent) * (-3.0 * self.wa * (1.0 - a)).exp()
    }

    /// The Hubble distance c / H0 \[Mpc\].
    pub fn hubble_distance(&self) -> f64 {
        HUBBLE_DISTANCE_H1_MPC / self.h
    }

    /// The mean comoving matter density \[M☉ / Mpc³\].
    pub fn mean_matter_density(&self) -> f64 {
        self.omega_m * RHO_CRIT_H1 * self.h * self.h
    }

    /// Check that the parameters are usable. The first offending parameter is
    /// reported.
    pub fn validate(&self) -> Result<(), CosmologyError> {
        let check = |name: &'static str, value: f64, ok: bool, reason: &'static str| {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(CosmologyError::InvalidParameter {
                    name,
                    value,
                    reason,
                })
            }
        };
        check("h", self.h, self.h > 0.0, "must be positive")?;
        check("omega_m", self.omega_m, self.omega_m >= 0.0, "must not be negative")?;
        check("omega_k", self.omega_k, true, "must be finite")?;
        if let Some(omega_r) = self.omega_r {
            check("omega_r", omega_r, omega_r >= 0.0, "must not be negative")?;
        }
        check("tcmb", self.tcmb, self.tcmb >= 0.0, "must not be negative")?;
        check("neff", self.neff, self.neff >= 0.0, "must not be negative")?;
        check("w0", self.w0, true, "must be finite")?;
        check("wa", self.wa, true, "must be finite")?;
        Ok(())
    }
}

/// The geometry needed to turn a comoving distance into a transverse comoving
/// distance. Source catalogues carry a copy of this so that they can be
/// painted without the full [`Cosmology`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curvature<T> {
    pub omega_k: T,
    /// c / H0 \[Mpc\].
    pub hubble_distance: T,
    /// The smallest nonzero tabulated comoving distance \[Mpc\]. Fluxes of
    /// closer sources are evaluated at this distance.
    pub min_distance: T,
}

impl<T: Real> Curvature<T> {
    /// The transverse comoving distance D_M corresponding to the
    /// line-of-sight comoving distance `chi` \[Mpc\].
    pub fn transverse(&self, chi: T) -> T {
        let ok = self.omega_k;
        if ok == T::zero() {
            return chi;
        }

        let sqrt_ok = ok.abs().sqrt();
        let arg = sqrt_ok * chi / self.hubble_distance;
        if ok > T::zero() {
            self.hubble_distance / sqrt_ok * arg.sinh()
        } else {
            self.hubble_distance / sqrt_ok * arg.sin()
        }
    }

    /// The transverse comoving distance used to dim a source at
    /// line-of-sight comoving distance `chi` \[Mpc\]. This is
    /// [`Curvature::transverse`] with `chi` floored at `min_distance`, so a
    /// source at the observer (z = 0) still has a finite flux.
    pub fn flux_distance(&self, chi: T) -> T {
        self.transverse(chi.max(self.min_distance))
    }
}

/// A background cosmology with a precomputed comoving distance ↔ redshift
/// table.
#[derive(Debug, Clone)]
pub struct Cosmology<T> {
    params: CosmologyParams,
    omega_r: f64,
    omega_lambda: f64,
    curvature: Curvature<T>,

    /// Uniformly spaced redshifts, starting at 0.
    redshifts: Vec<T>,
    /// Comoving distances at `redshifts` \[Mpc\]. Strictly increasing.
    distances: Vec<T>,
}

impl<T: Real> Cosmology<T> {
    /// Create a cosmology tabulated over the default redshift range.
    pub fn new(params: &CosmologyParams) -> Result<Cosmology<T>, CosmologyError> {
        Self::with_table(params, DEFAULT_TABLE_MAX_REDSHIFT, DEFAULT_TABLE_SIZE)
    }

    /// Create a cosmology with a distance-redshift table spanning
    /// `[0, max_redshift]` with `num_points` uniformly-spaced redshifts.
    pub fn with_table(
        params: &CosmologyParams,
        max_redshift: f64,
        num_points: usize,
    ) -> Result<Cosmology<T>, CosmologyError> {
        params.validate()?;
        if num_points < 2 {
            return Err(CosmologyError::TableTooSmall(num_points));
        }
        if !(max_redshift.is_finite() && max_redshift > 0.0) {
            return Err(CosmologyError::BadTableRange(max_redshift));
        }

        let hubble_distance = params.hubble_distance();
        let dz = max_redshift / (num_points - 1) as f64;
        let inv_e = |z: f64| 1.0 / params.e2(z).sqrt();

        let mut redshifts = Vec::with_capacity(num_points);
        let mut distances = Vec::with_capacity(num_points);
        let mut chi = 0.0;
        for i in 0..num_points {
            let z = i as f64 * dz;
            let e2 = params.e2(z);
            if !(e2.is_finite() && e2 > 0.0) {
                return Err(CosmologyError::NonPositiveExpansion { z });
            }
            if i > 0 {
                let z_mid = z - 0.5 * dz;
                let e2_mid = params.e2(z_mid);
                if !(e2_mid.is_finite() && e2_mid > 0.0) {
                    return Err(CosmologyError::NonPositiveExpansion { z: z_mid });
                }
                chi += hubble_distance * simpson(inv_e, z - dz, z, 2);
            }

            let z_t = T::cast(z);
            let chi_t = T::cast(chi);
            if let Some(&prev) = distances.last() {
                if chi_t <= prev {
                    return Err(CosmologyError::NotMonotonic {
                        z,
                        precision: T::PRECISION,
                    });
                }
            }
            redshifts.push(z_t);
            distances.push(chi_t);
        }

        debug!(
            "Tabulated comoving distances to z = {max_redshift} ({:.2} Mpc) with {num_points} points in {} precision",
            chi,
            T::PRECISION
        );

        Ok(Cosmology {
            params: *params,
            omega_r: params.omega_radiation(),
            omega_lambda: params.omega_lambda(),
            curvature: Curvature {
                omega_k: T::cast(params.omega_k),
                hubble_distance: T::cast(hubble_distance),
                // The table has at least two strictly increasing entries.
                min_distance: distances[1],
            },
            redshifts,
            distances,
        })
    }

    pub fn params(&self) -> &CosmologyParams {
        &self.params
    }

    pub fn omega_radiation(&self) -> f64 {
        self.omega_r
    }

    pub fn omega_lambda(&self) -> f64 {
        self.omega_lambda
    }

    pub fn curvature(&self) -> Curvature<T> {
        self.curvature
    }

    /// c / H0 \[Mpc\].
    pub fn hubble_distance(&self) -> T {
        self.curvature.hubble_distance
    }

    /// The largest tabulated redshift.
    pub fn max_redshift(&self) -> T {
        // There are always at least two entries.
        self.redshifts[self.redshifts.len() - 1]
    }

    /// The comoving distance to [`Cosmology::max_redshift`] \[Mpc\].
    pub fn max_distance(&self) -> T {
        self.distances[self.distances.len() - 1]
    }

    /// E(z) = H(z) / H0.
    pub fn hubble_parameter_ratio(&self, z: T) -> T {
        T::cast(self.params.e2(z.as_f64()).sqrt())
    }

    /// The line-of-sight comoving distance to redshift `z` \[Mpc\].
    pub fn redshift_to_distance(&self, z: T) -> Result<T, CosmologyError> {
        interp_increasing(&self.redshifts, &self.distances, z).ok_or_else(|| {
            CosmologyError::RedshiftOutOfRange {
                z: z.as_f64(),
                max: self.max_redshift().as_f64(),
            }
        })
    }

    /// The redshift at the line-of-sight comoving distance `distance` \[Mpc\].
    pub fn distance_to_redshift(&self, distance: T) -> Result<T, CosmologyError> {
        interp_increasing(&self.distances, &self.redshifts, distance).ok_or_else(|| {
            CosmologyError::DistanceOutOfRange {
                distance: distance.as_f64(),
                max: self.max_distance().as_f64(),
            }
        })
    }

    /// The transverse comoving distance D_M for a line-of-sight comoving
    /// distance \[Mpc\].
    pub fn transverse_comoving_distance(&self, chi: T) -> T {
        self.curvature.transverse(chi)
    }

    /// The luminosity distance to redshift `z` \[Mpc\].
    pub fn luminosity_distance(&self, z: T) -> Result<T, CosmologyError> {
        let chi = self.redshift_to_distance(z)?;
        Ok((T::one() + z) * self.transverse_comoving_distance(chi))
    }

    /// The mean comoving matter density \[M☉ / Mpc³\].
    pub fn mean_matter_density(&self) -> T {
        T::cast(self.params.mean_matter_density())
    }

    /// The comoving radius enclosing a mean overdensity of 200 relative to
    /// the mean matter density for a halo of mass `mass` \[M☉\] \[Mpc\].
    pub fn virial_radius(&self, mass: T) -> T {
        let denominator =
            T::cast(4.0 / 3.0 * std::f64::consts::PI * VIRIAL_OVERDENSITY) * self.mean_matter_density();
        (mass / denominator).cbrt()
    }
}
