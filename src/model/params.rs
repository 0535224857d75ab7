// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters of the CIB and radio halo models.

use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::math::Real;

/// The parameters of the Planck 2013 CIB halo model (Planck Collaboration
/// XXX 2014, with the Viero et al. 2013 SED). Luminosities follow Shang et
/// al. 2012 and subhalo masses the unevolved mass function of Jiang & van den
/// Bosch 2014.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, bound = "T: Real")]
pub struct CibParams<T> {
    /// HEALPix resolution of painted maps.
    pub nside: u32,

    /// Overall normalisation of the specific intensity.
    pub inu_norm: T,

    /// Halos closer than this redshift are skipped.
    pub min_redshift: T,

    /// Halos beyond this redshift are skipped.
    pub max_redshift: T,

    /// Halos lighter than this are skipped \[M☉\].
    pub min_mass: T,

    /// Redshift at which luminosity evolution plateaus.
    pub shang_zplat: T,

    /// Dust temperature at z = 0 \[K\].
    pub shang_td: T,

    /// Emissivity index of the grey body.
    pub shang_beta: T,

    /// Luminosity evolution index.
    pub shang_eta: T,

    /// Dust temperature evolution index.
    pub shang_alpha: T,

    /// Power-law index of the high-frequency SED tail.
    pub shang_gamma: T,

    /// Halo mass with the largest luminosity-to-mass ratio \[M☉\].
    pub shang_mpeak: T,

    /// Variance of log10(M) in the luminosity-mass relation.
    pub shang_sigma_m: T,

    /// Minimum subhalo mass \[M☉\].
    pub shang_msmin: T,

    /// Halos and subhalos lighter than this are dark \[M☉\].
    pub shang_mmin: T,

    /// SED normalisation.
    pub shang_i0: T,

    pub jiang_gamma_1: T,
    pub jiang_alpha_1: T,
    pub jiang_gamma_2: T,
    pub jiang_alpha_2: T,
    pub jiang_beta_2: T,
    pub jiang_zeta: T,
}

impl<T: Real> Default for CibParams<T> {
    fn default() -> Self {
        Self {
            nside: 4096,
            inu_norm: T::cast(0.3180384),
            min_redshift: T::zero(),
            max_redshift: T::cast(5.0),
            min_mass: T::cast(1e12),
            shang_zplat: T::cast(2.0),
            shang_td: T::cast(20.7),
            shang_beta: T::cast(1.6),
            shang_eta: T::cast(2.4),
            shang_alpha: T::cast(0.2),
            shang_gamma: T::cast(1.7),
            shang_mpeak: T::cast(10f64.powf(12.3)),
            shang_sigma_m: T::cast(0.3),
            shang_msmin: T::cast(1e11),
            shang_mmin: T::cast(1e10),
            shang_i0: T::cast(46.0),
            jiang_gamma_1: T::cast(0.13),
            jiang_alpha_1: T::cast(-0.83),
            jiang_gamma_2: T::cast(1.33),
            jiang_alpha_2: T::cast(-0.02),
            jiang_beta_2: T::cast(5.67),
            jiang_zeta: T::cast(1.19),
        }
    }
}

impl<T: Real> CibParams<T> {
    /// Convert these parameters to another precision.
    pub fn cast<U: Real>(&self) -> CibParams<U> {
        let c = |v: T| U::cast(v.as_f64());
        CibParams {
            nside: self.nside,
            inu_norm: c(self.inu_norm),
            min_redshift: c(self.min_redshift),
            max_redshift: c(self.max_redshift),
            min_mass: c(self.min_mass),
            shang_zplat: c(self.shang_zplat),
            shang_td: c(self.shang_td),
            shang_beta: c(self.shang_beta),
            shang_eta: c(self.shang_eta),
            shang_alpha: c(self.shang_alpha),
            shang_gamma: c(self.shang_gamma),
            shang_mpeak: c(self.shang_mpeak),
            shang_sigma_m: c(self.shang_sigma_m),
            shang_msmin: c(self.shang_msmin),
            shang_mmin: c(self.shang_mmin),
            shang_i0: c(self.shang_i0),
            jiang_gamma_1: c(self.jiang_gamma_1),
            jiang_alpha_1: c(self.jiang_alpha_1),
            jiang_gamma_2: c(self.jiang_gamma_2),
            jiang_alpha_2: c(self.jiang_alpha_2),
            jiang_beta_2: c(self.jiang_beta_2),
            jiang_zeta: c(self.jiang_zeta),
        }
    }

    /// Check that the parameters describe a usable model. The first offending
    /// parameter is reported.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.nside == 0 {
            return Err(ModelError::InvalidParameter {
                name: "nside",
                value: 0.0,
                reason: "must be positive",
            });
        }

        let zero = T::zero();
        let checks: [(&'static str, T, bool, &'static str); 21] = [
            ("inu_norm", self.inu_norm, self.inu_norm > zero, "must be positive"),
            ("min_redshift", self.min_redshift, self.min_redshift >= zero, "must not be negative"),
            ("max_redshift", self.max_redshift, self.max_redshift > self.min_redshift, "must be larger than min_redshift"),
            ("min_mass", self.min_mass, self.min_mass >= zero, "must not be negative"),
            ("shang_zplat", self.shang_zplat, self.shang_zplat >= zero, "must not be negative"),
            ("shang_td", self.shang_td, self.shang_td > zero, "must be positive"),
            ("shang_beta", self.shang_beta, true, "must be finite"),
            ("shang_eta", self.shang_eta, true, "must be finite"),
            ("shang_alpha", self.shang_alpha, true, "must be finite"),
            ("shang_gamma", self.shang_gamma, self.shang_gamma > zero, "must be positive"),
            ("shang_mpeak", self.shang_mpeak, self.shang_mpeak > zero, "must be positive"),
            ("shang_sigma_m", self.shang_sigma_m, self.shang_sigma_m > zero, "must be positive"),
            ("shang_msmin", self.shang_msmin, self.shang_msmin > zero, "must be positive"),
            ("shang_mmin", self.shang_mmin, self.shang_mmin >= zero, "must not be negative"),
            ("shang_i0", self.shang_i0, self.shang_i0 > zero, "must be positive"),
            ("jiang_gamma_1", self.jiang_gamma_1, self.jiang_gamma_1 >= zero, "must not be negative"),
            ("jiang_alpha_1", self.jiang_alpha_1, true, "must be finite"),
            ("jiang_gamma_2", self.jiang_gamma_2, self.jiang_gamma_2 >= zero, "must not be negative"),
            ("jiang_alpha_2", self.jiang_alpha_2, true, "must be finite"),
            ("jiang_beta_2", self.jiang_beta_2, self.jiang_beta_2 >= zero, "must not be negative"),
            ("jiang_zeta", self.jiang_zeta, true, "must be finite"),
        ];
        for (name, value, ok, reason) in checks {
            if !(value.is_finite() && ok) {
                return Err(ModelError::InvalidParameter {
                    name,
                    value: value.as_f64(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// The parameters of the radio halo model of Li et al. (2021), after Sehgal et
/// al. (2009). Halos host FR I and FR II radio galaxies; each population has
/// its own occupation, luminosity function and spectral index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, bound = "T: Real")]
pub struct RadioParams<T> {
    /// HEALPix resolution of painted maps.
    pub nside: u32,

    /// Halos closer than this redshift are skipped.
    pub min_redshift: T,

    /// Halos beyond this redshift are skipped.
    pub max_redshift: T,

    /// Halos lighter than this are skipped \[M☉\].
    pub min_mass: T,

    /// The frequency luminosities are quoted at \[Hz\].
    pub nu_ref: T,

    /// FR I parameters. A population table must list every parameter.
    pub fr1: PopulationParams<T>,

    /// FR II parameters. A population table must list every parameter.
    pub fr2: PopulationParams<T>,
}

/// The parameters of one radio population.
///
/// The mean number of sources in a halo of mass M is n0 (M / m0)^alpha. The
/// luminosities at `nu_ref` are L_b(z) 10^u, with the break luminosity
/// L_b(z) = lb (1 + min(z, z_plat))^delta. u is distributed as 10^(-faint_slope
/// u) below zero and 10^(-bright_slope u) above, within `[lf_min, lf_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound = "T: Real")]
pub struct PopulationParams<T> {
    pub n0: T,

    /// \[M☉\]
    pub m0: T,

    pub alpha: T,

    /// Break luminosity at z = 0 \[W/Hz\].
    pub lb: T,

    pub delta: T,

    pub z_plat: T,

    pub faint_slope: T,

    pub bright_slope: T,

    /// Faintest source, as log10(L / L_b).
    pub lf_min: T,

    /// Brightest source, as log10(L / L_b).
    pub lf_max: T,

    /// S ∝ ν^spectral_index.
    pub spectral_index: T,
}

impl<T: Real> PopulationParams<T> {
    pub fn fr1() -> PopulationParams<T> {
        PopulationParams {
            n0: T::cast(1.0),
            m0: T::cast(4e13),
            alpha: T::cast(0.1),
            lb: T::cast(1e24),
            delta: T::cast(3.0),
            z_plat: T::cast(0.8),
            faint_slope: T::cast(0.55),
            bright_slope: T::cast(1.5),
            lf_min: T::cast(-3.0),
            lf_max: T::cast(3.0),
            spectral_index: T::cast(-0.5),
        }
    }

    pub fn fr2() -> PopulationParams<T> {
        PopulationParams {
            n0: T::cast(0.015),
            m0: T::cast(4e13),
            alpha: T::cast(0.1),
            lb: T::cast(10f64.powf(27.5)),
            delta: T::cast(6.5),
            z_plat: T::cast(2.3),
            faint_slope: T::cast(0.6),
            bright_slope: T::cast(2.0),
            lf_min: T::cast(-3.0),
            lf_max: T::cast(2.0),
            spectral_index: T::cast(-0.8),
        }
    }

    pub fn cast<U: Real>(&self) -> PopulationParams<U> {
        let c = |v: T| U::cast(v.as_f64());
        PopulationParams {
            n0: c(self.n0),
            m0: c(self.m0),
            alpha: c(self.alpha),
            lb: c(self.lb),
            delta: c(self.delta),
            z_plat: c(self.z_plat),
            faint_slope: c(self.faint_slope),
            bright_slope: c(self.bright_slope),
            lf_min: c(self.lf_min),
            lf_max: c(self.lf_max),
            spectral_index: c(self.spectral_index),
        }
    }

    /// `names` holds the population's parameter names, in field order.
    fn validate(&self, names: [&'static str; 11]) -> Result<(), ModelError> {
        let zero = T::zero();
        let checks: [(T, bool, &'static str); 11] = [
            (self.n0, self.n0 >= zero, "must not be negative"),
            (self.m0, self.m0 > zero, "must be positive"),
            (self.alpha, true, "must be finite"),
            (self.lb, self.lb > zero, "must be positive"),
            (self.delta, true, "must be finite"),
            (self.z_plat, self.z_plat >= zero, "must not be negative"),
            (self.faint_slope, true, "must be finite"),
            (self.bright_slope, true, "must be finite"),
            (self.lf_min, self.lf_min <= zero, "must not be positive"),
            (self.lf_max, self.lf_max >= zero && self.lf_max > self.lf_min, "must not be negative, and must be larger than lf_min"),
            (self.spectral_index, true, "must be finite"),
        ];
        for (name, (value, ok, reason)) in names.into_iter().zip(checks) {
            if !(value.is_finite() && ok) {
                return Err(ModelError::InvalidParameter {
                    name,
                    value: value.as_f64(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

impl<T: Real> Default for RadioParams<T> {
    fn default() -> Self {
        Self {
            nside: 4096,
            min_redshift: T::zero(),
            max_redshift: T::cast(4.5),
            min_mass: T::cast(1e13),
            nu_ref: T::cast(151e6),
            fr1: PopulationParams::fr1(),
            fr2: PopulationParams::fr2(),
        }
    }
}

impl<T: Real> RadioParams<T> {
    /// Convert these parameters to another precision.
    pub fn cast<U: Real>(&self) -> RadioParams<U> {
        let c = |v: T| U::cast(v.as_f64());
        RadioParams {
            nside: self.nside,
            min_redshift: c(self.min_redshift),
            max_redshift: c(self.max_redshift),
            min_mass: c(self.min_mass),
            nu_ref: c(self.nu_ref),
            fr1: self.fr1.cast(),
            fr2: self.fr2.cast(),
        }
    }

    /// Check that the parameters describe a usable model. The first offending
    /// parameter is reported.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.nside == 0 {
            return Err(ModelError::InvalidParameter {
                name: "nside",
                value: 0.0,
                reason: "must be positive",
            });
        }

        let zero = T::zero();
        let checks: [(&'static str, T, bool, &'static str); 4] = [
            ("min_redshift", self.min_redshift, self.min_redshift >= zero, "must not be negative"),
            ("max_redshift", self.max_redshift, self.max_redshift > self.min_redshift, "must be larger than min_redshift"),
            ("min_mass", self.min_mass, self.min_mass >= zero, "must not be negative"),
            ("nu_ref", self.nu_ref, self.nu_ref > zero, "must be positive"),
        ];
        for (name, value, ok, reason) in checks {
            if !(value.is_finite() && ok) {
                return Err(ModelError::InvalidParameter {
                    name,
                    value: value.as_f64(),
                    reason,
                });
            }
        }

        self.fr1.validate([
            "fr1.n0",
            "fr1.m0",
            "fr1.alpha",
            "fr1.lb",
            "fr1.delta",
            "fr1.z_plat",
            "fr1.faint_slope",
            "fr1.bright_slope",
            "fr1.lf_min",
            "fr1.lf_max",
            "fr1.spectral_index",
        ])?;
        self.fr2.validate([
            "fr2.n0",
            "fr2.m0",
            "fr2.alpha",
            "fr2.lb",
            "fr2.delta",
            "fr2.z_plat",
            "fr2.faint_slope",
            "fr2.bright_slope",
            "fr2.lf_min",
            "fr2.lf_max",
            "fr2.spectral_index",
        ])
    }
}
