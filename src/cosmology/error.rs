// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with background cosmologies.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CosmologyError {
    #[error("Cosmological parameter '{name}' has an invalid value ({value}): {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("E(z)² is not positive at z = {z}; this cosmology cannot be tabulated")]
    NonPositiveExpansion { z: f64 },

    #[error("The distance-redshift table needs at least 2 points, but {0} were requested")]
    TableTooSmall(usize),

    #[error("The maximum tabulated redshift must be positive and finite, but it is {0}")]
    BadTableRange(f64),

    #[error("Comoving distance is not strictly increasing near z = {z} at {precision} precision; use fewer table points or double precision")]
    NotMonotonic { z: f64, precision: &'static str },

    #[error("Redshift {z} is outside the tabulated domain [0, {max}]")]
    RedshiftOutOfRange { z: f64, max: f64 },

    #[error("Comoving distance {distance} Mpc is outside the tabulated domain [0, {max}] Mpc")]
    DistanceOutOfRange { distance: f64, max: f64 },
}
