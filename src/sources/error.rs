// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with generating sources from halos.

use thiserror::Error;

use crate::{cosmology::CosmologyError, model::OccupationError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Halo positions must have shape (3, N), but they have shape ({rows}, {cols})")]
    BadPositionsShape { rows: usize, cols: usize },

    #[error("There are {positions} halo positions but {masses} halo masses")]
    LengthMismatch { positions: usize, masses: usize },

    #[error("Halo {index} has an invalid mass ({mass} M☉); masses must be finite and not negative")]
    BadMass { index: usize, mass: f64 },

    #[error("Halo {index} has a non-finite position")]
    BadPosition { index: usize },

    #[error("The model's maximum redshift ({max}) is beyond the cosmology's tabulated range (up to {table_max})")]
    RedshiftRangeNotTabulated { max: f64, table_max: f64 },

    #[error("Couldn't get a redshift for halo {index}: {source}")]
    HaloRedshift {
        index: usize,
        #[source]
        source: CosmologyError,
    },

    #[error("Couldn't sample the central source of halo {index}: {source}")]
    Central {
        index: usize,
        #[source]
        source: OccupationError,
    },

    #[error("Couldn't sample satellites of halo {index}: {source}")]
    Satellites {
        index: usize,
        #[source]
        source: OccupationError,
    },

    #[error("Couldn't allocate {len} elements for {what}")]
    Allocation { what: &'static str, len: usize },

    #[error(transparent)]
    Cosmology(#[from] CosmologyError),

    #[error(transparent)]
    Occupation(#[from] OccupationError),
}
