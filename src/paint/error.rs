// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with sky maps and painting.

use thiserror::Error;

use super::SourceKind;
use crate::{cosmology::CosmologyError, healpix::HealpixError, model::FluxError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error(transparent)]
    Nside(#[from] HealpixError),

    #[error("Couldn't allocate a map with {0} pixels")]
    Allocation(u64),

    #[error("A map with nside {nside} has {expected} pixels, but {actual} were given")]
    WrongLength {
        nside: u32,
        expected: u64,
        actual: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    #[error("Observing frequency must be finite and positive, but it is {0} Hz")]
    BadFrequency(f64),

    #[error("The {kind} flux buffer has {actual} elements, but there are {expected} {kind} sources")]
    BufferLength {
        kind: SourceKind,
        expected: usize,
        actual: usize,
    },

    #[error("The sources were generated for a map with {sources} pixels, but the map has {map} pixels")]
    PixelizationMismatch { sources: u64, map: u64 },

    #[error("{kind} source {index} is in pixel {pixel}, but the map only has {num_pixels} pixels")]
    PixelOutOfRange {
        kind: SourceKind,
        index: usize,
        pixel: u64,
        num_pixels: u64,
    },

    #[error("Couldn't evaluate the flux of {kind} source {index}: {source}")]
    Flux {
        kind: SourceKind,
        index: usize,
        #[source]
        source: FluxError,
    },

    #[error(transparent)]
    Cosmology(#[from] CosmologyError),

    #[error(transparent)]
    ObservedFlux(#[from] FluxError),
}
