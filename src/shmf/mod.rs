// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sampling satellites from the unevolved subhalo mass function of Jiang &
//! van den Bosch (2014):
//!
//! dN/d ln x = (γ1 x^α1 + γ2 x^α2) exp(-β2 x^ζ),  x = m / M_host.
//!
//! The cumulative function N(>x) is tabulated once (in double precision) over
//! the range of mass ratios needed by a catalogue, so that satellite counts
//! and masses can be drawn with table lookups.

mod error;

pub use error::ShmfError;

use log::debug;
use rand::Rng;

use crate::{
    constants::DEFAULT_SHMF_TABLE_SIZE,
    math::{interp_decreasing, interp_increasing, sample_poisson, simpson, Real},
    model::CibParams,
};

#[derive(Debug, Clone)]
pub struct SubhaloMassFunction {
    gamma_1: f64,
    alpha_1: f64,
    gamma_2: f64,
    alpha_2: f64,
    beta_2: f64,
    zeta: f64,

    /// The smallest subhalo mass \[M☉\].
    min_mass: f64,
    /// The largest host mass this table supports \[M☉\].
    max_host_mass: f64,

    /// ln x, increasing up to 0. Empty if no host can have satellites.
    ln_x: Vec<f64>,
    /// N(>x) at `ln_x`; decreasing down to 0.
    cumulative: Vec<f64>,
}

impl SubhaloMassFunction {
    /// Tabulate the mass function for hosts up to `max_host_mass` \[M☉\].
    pub fn new<T: Real>(
        params: &CibParams<T>,
        max_host_mass: T,
    ) -> Result<SubhaloMassFunction, ShmfError> {
        Self::with_table_size(params, max_host_mass, DEFAULT_SHMF_TABLE_SIZE)
    }

    pub fn with_table_size<T: Real>(
        params: &CibParams<T>,
        max_host_mass: T,
        num_points: usize,
    ) -> Result<SubhaloMassFunction, ShmfError> {
        let max_host_mass = max_host_mass.as_f64();
        if !(max_host_mass.is_finite() && max_host_mass > 0.0) {
            return Err(ShmfError::BadMaxHostMass(max_host_mass));
        }
        let min_mass = params.shang_msmin.as_f64();
        if !(min_mass.is_finite() && min_mass > 0.0) {
            return Err(ShmfError::BadMinMass(min_mass));
        }
        if num_points < 2 {
            return Err(ShmfError::TableTooSmall(num_points));
        }

        let mut shmf = SubhaloMassFunction {
            gamma_1: params.jiang_gamma_1.as_f64(),
            alpha_1: params.jiang_alpha_1.as_f64(),
            gamma_2: params.jiang_gamma_2.as_f64(),
            alpha_2: params.jiang_alpha_2.as_f64(),
            beta_2: params.jiang_beta_2.as_f64(),
            zeta: params.jiang_zeta.as_f64(),
            min_mass,
            max_host_mass,
            ln_x: vec![],
            cumulative: vec![],
        };
        if max_host_mass <= min_mass {
            debug!("No host is heavier than the minimum subhalo mass; no satellites possible");
            return Ok(shmf);
        }

        let ln_x_min = (min_mass / max_host_mass).ln();
        let d_ln_x = -ln_x_min / (num_points - 1) as f64;
        let ln_x: Vec<f64> = (0..num_points)
            .map(|i| {
                if i == num_points - 1 {
                    0.0
                } else {
                    ln_x_min + i as f64 * d_ln_x
                }
            })
            .collect();

        // Integrate down from x = 1.
        let mut cumulative = vec![0.0; num_points];
        for i in (0..num_points - 1).rev() {
            let integrand = |u: f64| shmf.differential(u.exp());
            cumulative[i] = cumulative[i + 1] + simpson(integrand, ln_x[i], ln_x[i + 1], 2);
        }
        debug!(
            "Tabulated the subhalo mass function down to x = {:.3e} with {num_points} points; N(>x_min) = {:.3}",
            ln_x_min.exp(),
            cumulative[0]
        );

        shmf.ln_x = ln_x;
        shmf.cumulative = cumulative;
        Ok(shmf)
    }

    /// dN/d ln x at the mass ratio `x`.
    pub fn differential(&self, x: f64) -> f64 {
        (self.gamma_1 * x.powf(self.alpha_1) + self.gamma_2 * x.powf(self.alpha_2))
            * (-self.beta_2 * x.powf(self.zeta)).exp()
    }

    pub fn min_mass(&self) -> f64 {
        self.min_mass
    }

    pub fn max_host_mass(&self) -> f64 {
        self.max_host_mass
    }

    /// N(>x) from the table.
    fn cumulative_at(&self, ln_x: f64) -> Option<f64> {
        interp_increasing(&self.ln_x, &self.cumulative, ln_x)
    }

    /// The mean number of subhalos above the minimum subhalo mass in a host of
    /// mass `host_mass` \[M☉\].
    pub fn mean_count<T: Real>(&self, host_mass: T) -> Result<T, ShmfError> {
        let host_mass = host_mass.as_f64();
        if !(host_mass <= self.max_host_mass) {
            return Err(ShmfError::HostOutOfRange {
                mass: host_mass,
                max: self.max_host_mass,
            });
        }
        if host_mass <= self.min_mass {
            return Ok(T::zero());
        }

        let ln_x_min = (self.min_mass / host_mass).ln();
        self.cumulative_at(ln_x_min)
            .map(T::cast)
            .ok_or(ShmfError::HostOutOfRange {
                mass: host_mass,
                max: self.max_host_mass,
            })
    }

    /// Draw a Poisson-distributed count with the given mean.
    pub fn sample_count<R: Rng + ?Sized, T: Real>(
        &self,
        rng: &mut R,
        mean: T,
    ) -> Result<usize, ShmfError> {
        Ok(sample_poisson(rng, mean.as_f64())?)
    }

    /// Draw the mass of one subhalo of a host with mass `host_mass` \[M☉\].
    /// `mean_count` is the host's [`SubhaloMassFunction::mean_count`], which
    /// normalises the cumulative table.
    pub fn sample_mass<R: Rng + ?Sized, T: Real>(
        &self,
        rng: &mut R,
        host_mass: T,
        mean_count: T,
    ) -> T {
        let u: f64 = rng.gen();
        let target = u * mean_count.as_f64();
        let ln_x = interp_decreasing(&self.cumulative, &self.ln_x, target).unwrap_or(0.0);
        T::cast(host_mass.as_f64() * ln_x.exp())
    }

    /// Draw a count and that many subhalo masses for a host with mass
    /// `host_mass` \[M☉\], appending the masses to `masses`. Returns the count.
    ///
    /// The mass function has no explicit redshift dependence: ζ only shapes
    /// the high-mass cutoff in x = m / M_host, so hosts of the same mass get
    /// the same satellite statistics at every redshift.
    pub fn sample<R: Rng + ?Sized, T: Real>(
        &self,
        rng: &mut R,
        host_mass: T,
        masses: &mut Vec<T>,
    ) -> Result<usize, ShmfError> {
        let mean = self.mean_count(host_mass)?;
        let count = self.sample_count(rng, mean)?;
        masses.reserve(count);
        for _ in 0..count {
            masses.push(self.sample_mass(rng, host_mass, mean));
        }
        Ok(count)
    }
}
