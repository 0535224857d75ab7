// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading halo catalogues and writing maps.

use itertools::Itertools;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::HaloFileType;

#[derive(Error, Debug)]
pub enum HaloReadError {
    #[error("Halo catalogue {file} has unsupported extension '{ext}'; supported types are: {}", HaloFileType::iter().join(", "))]
    UnsupportedExt { file: String, ext: String },

    #[error("{0} is an HDF5 file, but halopaint was compiled without the \"hdf5\" feature")]
    Hdf5Disabled(String),

    #[error("The \"halos\" dataset in {file} should have shape (N, 4) (x, y, z, M_h), but it has shape {shape:?}")]
    BadHdf5Shape { file: String, shape: Vec<usize> },

    #[error("{file} claims to have {count} halos; a negative count doesn't make sense")]
    NegativeCount { file: String, count: i32 },

    #[error("{file} should have {expected} bytes for {num_halos} halos, but it only has {actual}")]
    Truncated {
        file: String,
        num_halos: usize,
        expected: u64,
        actual: u64,
    },

    #[error("Couldn't allocate memory for {0} halos")]
    Allocation(usize),

    #[cfg(feature = "hdf5")]
    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum MapWriteError {
    #[error("Tried to write a map with unsupported extension '{ext}'")]
    UnsupportedExt { ext: String },

    #[error("Map file name {0} isn't valid UTF-8")]
    NonUtf8Path(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
