// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. `halopaint` casts them to the
working precision at the point of use.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Speed of light \[km/s\].
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// The Hubble distance for h = 1, i.e. c / (100 km/s/Mpc) \[Mpc\].
pub const HUBBLE_DISTANCE_H1_MPC: f64 = SPEED_OF_LIGHT_KM_S / 100.0;

/// The critical density of the Universe today for h = 1 \[M☉ / Mpc³\].
pub const RHO_CRIT_H1: f64 = 2.775366e11;

/// Photon density parameter coefficient; Ω_γ h² = this × T_cmb⁴.
pub const PHOTON_DENSITY_COEFF: f64 = 4.48131e-7;

/// Planck constant \[erg s\].
pub const PLANCK_H_CGS: f64 = 6.62606957e-27;

/// Boltzmann constant \[erg/K\].
pub const BOLTZMANN_K_CGS: f64 = 1.3806488e-16;

/// Metres in a megaparsec.
pub const MPC_M: f64 = 3.085_677_581_491_367e22;

/// One jansky \[W m⁻² Hz⁻¹\].
pub const JANSKY: f64 = 1e-26;

/// Added to the seed of the second radio population, so that the FR I and FR
/// II populations never share a random number stream.
pub const FR2_SEED_OFFSET: u64 = 1 << 32;

/// Halo overdensity with respect to the mean matter density used to define the
/// virial radius.
pub const VIRIAL_OVERDENSITY: f64 = 200.0;

/// The largest redshift tabulated by default in a [`crate::Cosmology`].
pub const DEFAULT_TABLE_MAX_REDSHIFT: f64 = 10.0;

/// The default number of points in the distance-redshift table.
pub const DEFAULT_TABLE_SIZE: usize = 8192;

/// The default number of points in the cumulative subhalo mass function table.
pub const DEFAULT_SHMF_TABLE_SIZE: usize = 2048;

/// Below this Poisson mean, satellite counts are drawn by CDF inversion.
pub const POISSON_INVERSION_LIMIT: f64 = 30.0;

/// The number of halos handled by a single RNG stream when generating sources.
pub const HALO_CHUNK_SIZE: usize = 4096;

/// The seed used when none is specified.
pub const DEFAULT_SEED: u64 = 42;
