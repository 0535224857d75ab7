// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::debug;

use super::{CibParams, ModelError, SourceModel};
use crate::{
    constants::{BOLTZMANN_K_CGS, PLANCK_H_CGS},
    math::{bisect, Real},
};

/// The Planck 2013 CIB model.
#[derive(Debug, Clone)]
pub struct CibPlanck2013<T> {
    params: CibParams<T>,

    /// The value of hν/kT_d above which the SED follows a power law.
    x_break: T,

    /// The grey body evaluated at `x_break`.
    g_break: T,
}

impl<T: Real> CibPlanck2013<T> {
    pub fn new(params: CibParams<T>) -> Result<CibPlanck2013<T>, ModelError> {
        params.validate()?;

        // Where d ln g / d ln x of the grey body equals -gamma.
        let beta = params.shang_beta.as_f64();
        let gamma = params.shang_gamma.as_f64();
        let target = 3.0 + beta + gamma;
        let x_break = bisect(|x| x / (-(-x).exp_m1()) - target, 1e-6, 1e3)
            .ok_or(ModelError::NoSedBreak { beta, gamma })?;
        let g_break = x_break.powf(3.0 + beta) / x_break.exp_m1();
        debug!("CIB SED break at hν/kT = {x_break:.6}");

        Ok(CibPlanck2013 {
            params,
            x_break: T::cast(x_break),
            g_break: T::cast(g_break),
        })
    }

    pub fn params(&self) -> &CibParams<T> {
        &self.params
    }

    /// The break of the SED in units of hν/kT_d.
    pub fn sed_break(&self) -> T {
        self.x_break
    }

    /// Φ(z) = (1 + min(z, z_plat))^η.
    pub fn shang_z_evo(&self, z: T) -> T {
        (T::one() + z.min(self.params.shang_zplat)).powf(self.params.shang_eta)
    }

    /// The log-normal luminosity-to-mass relation Σ(M).
    pub fn sigma_mass(&self, mass: T) -> T {
        let sigma2 = self.params.shang_sigma_m;
        let two = T::cast(2.0);
        let log_ratio = mass.log10() - self.params.shang_mpeak.log10();
        mass / (two * T::PI() * sigma2).sqrt() * (-log_ratio * log_ratio / (two * sigma2)).exp()
    }

    /// The dust temperature at redshift `z` \[K\].
    pub fn dust_temperature(&self, z: T) -> T {
        self.params.shang_td * (T::one() + z).powf(self.params.shang_alpha)
    }

    /// The normalised rest-frame SED Θ(ν, z) \[Hz⁻¹\].
    pub fn theta(&self, nu_rest: T, z: T) -> T {
        let h_over_k = T::cast(PLANCK_H_CGS / BOLTZMANN_K_CGS);
        let td = self.dust_temperature(z);
        let x = h_over_k * nu_rest / td;
        let g = if x < self.x_break {
            x.powf(T::cast(3.0) + self.params.shang_beta) / x.exp_m1()
        } else {
            self.g_break * (x / self.x_break).powf(-self.params.shang_gamma)
        };
        g * h_over_k / (td * self.params.shang_i0)
    }
}

impl<T: Real> SourceModel<T> for CibPlanck2013<T> {
    fn base(&self) -> &CibPlanck2013<T> {
        self
    }
}
