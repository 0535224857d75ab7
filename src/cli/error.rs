// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all halopaint-related errors. This should be the *only*
//! error enum that is publicly visible from the command-line code.

use thiserror::Error;

use super::paint::PaintArgsError;
use crate::{
    cosmology::CosmologyError,
    healpix::HealpixError,
    io::{HaloReadError, MapWriteError},
    model::ModelError,
    paint::{MapError, PaintError},
    params::PaintRunError,
    sources::SourceError,
};

const PAINT_HELP: &str = "See `halopaint paint --help` for the available arguments.";
const DEFAULTS_HELP: &str =
    "See `halopaint print-defaults` for every parameter and its default value.";

/// The *only* publicly visible error from the halopaint command line. Each
/// error message should point somewhere useful, unless it's "generic".
#[derive(Error, Debug)]
pub enum HalopaintError {
    /// An error related to the arguments of `paint`.
    #[error("{0}\n\n{PAINT_HELP}")]
    Paint(String),

    /// An error related to cosmological parameters or distances.
    #[error("{0}\n\n{DEFAULTS_HELP}")]
    Cosmology(String),

    /// An error related to model parameters.
    #[error("{0}\n\n{DEFAULTS_HELP}")]
    Model(String),

    /// An error related to reading a halo catalogue.
    #[error("{0}\n\nHalo catalogues must be Websky \"pksc\" binary files or HDF5 files with a \"halos\" dataset.")]
    HaloCatalog(String),

    /// An error encountered while populating halos with sources.
    #[error("{0}")]
    Sources(String),

    /// An error encountered while painting sources onto a map.
    #[error("{0}")]
    Painting(String),

    /// An error related to writing maps.
    #[error("{0}")]
    MapWrite(String),

    /// An error related to argument files.
    #[error("{0}\n\n{DEFAULTS_HELP}")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation, e.g.
    /// IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<PaintArgsError> for HalopaintError {
    fn from(e: PaintArgsError) -> Self {
        let s = e.to_string();
        match e {
            PaintArgsError::Cosmology(e) => Self::from(e),
            PaintArgsError::Model(e) => Self::from(e),
            PaintArgsError::HaloRead(e) => Self::from(e),
            PaintArgsError::NoHalos
            | PaintArgsError::HalosDoesntExist(_)
            | PaintArgsError::NoFreqs
            | PaintArgsError::BadFreq(_)
            | PaintArgsError::BadPrecision(_)
            | PaintArgsError::BadSourceModel(_)
            | PaintArgsError::BadMapFormat(_)
            | PaintArgsError::OutputDirNotDir(_) => Self::Paint(s),
        }
    }
}

impl From<PaintRunError> for HalopaintError {
    fn from(e: PaintRunError) -> Self {
        match e {
            PaintRunError::Cosmology(e) => Self::from(e),
            PaintRunError::Model(e) => Self::from(e),
            PaintRunError::Healpix(e) => Self::from(e),
            PaintRunError::Map(e) => Self::from(e),
            PaintRunError::Sources(e) => Self::from(e),
            PaintRunError::Paint(e) => Self::from(e),
            PaintRunError::MapWrite(e) => Self::from(e),
            PaintRunError::IO(e) => Self::from(e),
        }
    }
}

impl From<CosmologyError> for HalopaintError {
    fn from(e: CosmologyError) -> Self {
        Self::Cosmology(e.to_string())
    }
}

impl From<ModelError> for HalopaintError {
    fn from(e: ModelError) -> Self {
        Self::Model(e.to_string())
    }
}

impl From<HealpixError> for HalopaintError {
    fn from(e: HealpixError) -> Self {
        Self::Model(e.to_string())
    }
}

impl From<HaloReadError> for HalopaintError {
    fn from(e: HaloReadError) -> Self {
        let s = e.to_string();
        match e {
            HaloReadError::UnsupportedExt { .. }
            | HaloReadError::Hdf5Disabled(_)
            | HaloReadError::BadHdf5Shape { .. }
            | HaloReadError::NegativeCount { .. }
            | HaloReadError::Truncated { .. } => Self::HaloCatalog(s),
            #[cfg(feature = "hdf5")]
            HaloReadError::Hdf5(_) => Self::HaloCatalog(s),
            HaloReadError::Allocation(_) | HaloReadError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<SourceError> for HalopaintError {
    fn from(e: SourceError) -> Self {
        let s = e.to_string();
        match e {
            SourceError::RedshiftRangeNotTabulated { .. } | SourceError::Cosmology(_) => {
                Self::Cosmology(s)
            }
            SourceError::BadPositionsShape { .. }
            | SourceError::LengthMismatch { .. }
            | SourceError::BadMass { .. }
            | SourceError::BadPosition { .. } => Self::HaloCatalog(s),
            SourceError::HaloRedshift { .. }
            | SourceError::Central { .. }
            | SourceError::Satellites { .. }
            | SourceError::Occupation(_) => Self::Sources(s),
            SourceError::Allocation { .. } => Self::Generic(s),
        }
    }
}

impl From<PaintError> for HalopaintError {
    fn from(e: PaintError) -> Self {
        Self::Painting(e.to_string())
    }
}

impl From<MapError> for HalopaintError {
    fn from(e: MapError) -> Self {
        let s = e.to_string();
        match e {
            MapError::Nside(_) => Self::Model(s),
            MapError::Allocation(_) | MapError::WrongLength { .. } => Self::Generic(s),
        }
    }
}

impl From<MapWriteError> for HalopaintError {
    fn from(e: MapWriteError) -> Self {
        let s = e.to_string();
        match e {
            MapWriteError::UnsupportedExt { .. } | MapWriteError::NonUtf8Path(_) => {
                Self::MapWrite(s)
            }
            MapWriteError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<std::io::Error> for HalopaintError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
