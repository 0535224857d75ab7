// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with subhalo sampling.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShmfError {
    #[error("The largest host halo mass must be finite and positive, but it is {0} M☉")]
    BadMaxHostMass(f64),

    #[error("The minimum subhalo mass must be finite and positive, but it is {0} M☉")]
    BadMinMass(f64),

    #[error("The cumulative subhalo mass function table needs at least 2 points, but {0} were requested")]
    TableTooSmall(usize),

    #[error("Host halo mass {mass} M☉ is outside the tabulated range (up to {max} M☉)")]
    HostOutOfRange { mass: f64, max: f64 },

    #[error("Couldn't sample a satellite count: {0}")]
    Poisson(#[from] rand_distr::PoissonError),
}
