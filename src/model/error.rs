// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with source models.

use thiserror::Error;

use crate::shmf::ShmfError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model parameter '{name}' has an invalid value ({value}): {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Couldn't match the SED power-law tail to the grey body (beta = {beta}, gamma = {gamma})")]
    NoSedBreak { beta: f64, gamma: f64 },
}

/// Errors from evaluating an observed flux.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluxError {
    #[error("Luminosity must be finite and not negative, but it is {0}")]
    BadLuminosity(f64),

    #[error("Redshift must be finite and not negative, but it is {0}")]
    BadRedshift(f64),

    #[error("Observing frequency must be finite and positive, but it is {0} Hz")]
    BadFrequency(f64),

    #[error("Transverse comoving distance must be finite and positive, but it is {0} Mpc")]
    BadDistance(f64),

    #[error("Flux is not finite ({0})")]
    NotFinite(f64),
}

/// Errors from populating a halo with sources.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OccupationError {
    #[error(transparent)]
    Shmf(#[from] ShmfError),

    #[error("Couldn't sample a source count: {0}")]
    Poisson(#[from] rand_distr::PoissonError),
}
