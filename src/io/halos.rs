// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read halo catalogues.
//!
//! Two formats are understood, chosen by file extension:
//!
//! * Websky "pksc" files. These are little endian: an i32 halo count, the f32 maximum top-hat
//! radius, the f32 redshift of the box, then 10 f32s per halo (x, y, z, vx,
//! vy, vz, R_TH, xL, yL, zL).
//! * HDF5 files with a 2D "halos" dataset of shape (N, 4), each record holding
//!   x, y, z and M_h. This is how the light Websky catalogues are distributed.
//!   Reading these needs the "hdf5" feature.
//!
//! Positions are comoving \[Mpc\] with the observer at the origin.

use std::{
    fs::File,
    io::{BufReader, ErrorKind},
    path::Path,
    str::FromStr,
};

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use ndarray::prelude::*;
use strum_macros::{Display, EnumIter, EnumString};

use super::error::HaloReadError;
use crate::cosmology::CosmologyParams;

const HEADER_BYTES: u64 = 12;
const FLOATS_PER_HALO: usize = 10;
#[cfg(feature = "hdf5")]
const HDF5_DATASET: &str = "halos";

/// All of the halo catalogue file types that can be read.
#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum HaloFileType {
    #[strum(serialize = "pksc")]
    Pksc,

    #[strum(to_string = "hdf5", serialize = "h5")]
    Hdf5,
}

impl HaloFileType {
    /// The halo file type of `file`, going by its extension.
    pub fn from_path(file: &Path) -> Result<HaloFileType, HaloReadError> {
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        HaloFileType::from_str(&ext.to_lowercase()).map_err(|_| HaloReadError::UnsupportedExt {
            file: file.display().to_string(),
            ext: ext.to_string(),
        })
    }
}

/// Halo positions and masses.
#[derive(Debug, Clone)]
pub struct HaloCatalog {
    /// Comoving Cartesian coordinates, shape (3, N) \[Mpc\].
    pub positions: Array2<f32>,

    /// \[M☉\]
    pub masses: Array1<f32>,

    /// The largest top-hat radius in the catalogue, as recorded in a pksc
    /// header \[Mpc\].
    pub r_th_max: Option<f32>,

    /// The redshift of the box, as recorded in a pksc header.
    pub z_box: Option<f32>,
}

impl HaloCatalog {
    pub fn num_halos(&self) -> usize {
        self.masses.len()
    }
}

/// Read at most `max_halos` halos (or all of them) from a halo catalogue,
/// choosing the reader from the file's extension. `cosmology` is only needed
/// for pksc files, whose masses are derived from top-hat radii.
pub fn read_halo_catalog(
    file: &Path,
    cosmology: &CosmologyParams,
    max_halos: Option<usize>,
) -> Result<HaloCatalog, HaloReadError> {
    match HaloFileType::from_path(file)? {
        HaloFileType::Pksc => read_pksc(file, cosmology, max_halos),
        HaloFileType::Hdf5 => read_hdf5(file, max_halos),
    }
}

/// Read every halo in a pksc file. Masses are derived from the top-hat radii
/// with the mean matter density of `cosmology`.
pub fn read_halo_catalog_pksc(
    file: &Path,
    cosmology: &CosmologyParams,
) -> Result<HaloCatalog, HaloReadError> {
    read_pksc(file, cosmology, None)
}

/// Read at most `max_halos` halos from the start of a pksc file.
pub fn read_first_halos_pksc(
    file: &Path,
    cosmology: &CosmologyParams,
    max_halos: usize,
) -> Result<HaloCatalog, HaloReadError> {
    read_pksc(file, cosmology, Some(max_halos))
}

fn read_pksc(
    file: &Path,
    cosmology: &CosmologyParams,
    max_halos: Option<usize>,
) -> Result<HaloCatalog, HaloReadError> {
    let file_str = file.display().to_string();
    let handle = File::open(file)?;
    let actual = handle.metadata()?.len();
    let mut reader = BufReader::new(handle);

    let count = reader.read_i32::<LittleEndian>()?;
    let total_num_halos = usize::try_from(count).map_err(|_| HaloReadError::NegativeCount {
        file: file_str.clone(),
        count,
    })?;
    let r_th_max = reader.read_f32::<LittleEndian>()?;
    let z_box = reader.read_f32::<LittleEndian>()?;

    let expected = HEADER_BYTES + (total_num_halos * FLOATS_PER_HALO * 4) as u64;
    if actual < expected {
        return Err(HaloReadError::Truncated {
            file: file_str,
            num_halos: total_num_halos,
            expected,
            actual,
        });
    }

    let num_halos = max_halos.map_or(total_num_halos, |m| m.min(total_num_halos));
    debug!("Reading {num_halos} of {total_num_halos} halos from {file_str}");
    let num_floats = num_halos * FLOATS_PER_HALO;
    let mut records: Vec<f32> = Vec::new();
    records
        .try_reserve_exact(num_floats)
        .map_err(|_| HaloReadError::Allocation(num_halos))?;
    records.resize(num_floats, 0.0);
    reader
        .read_f32_into::<LittleEndian>(&mut records)
        .map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => HaloReadError::Truncated {
                file: file_str.clone(),
                num_halos: total_num_halos,
                expected,
                actual,
            },
            _ => HaloReadError::IO(e),
        })?;

    let records = Array2::from_shape_vec((num_halos, FLOATS_PER_HALO), records)
        .map_err(|_| HaloReadError::Allocation(num_halos))?;
    let positions = records.slice(s![.., 0..3]).t().to_owned();
    let mass_per_volume = (4.0 / 3.0 * std::f64::consts::PI * cosmology.mean_matter_density()) as f32;
    let masses = records
        .column(6)
        .mapv(|r_th| mass_per_volume * r_th * r_th * r_th);

    Ok(HaloCatalog {
        positions,
        masses,
        r_th_max: Some(r_th_max),
        z_box: Some(z_box),
    })
}

/// Read every halo in an HDF5 catalogue.
pub fn read_halo_catalog_hdf5(file: &Path) -> Result<HaloCatalog, HaloReadError> {
    read_hdf5(file, None)
}

#[cfg(feature = "hdf5")]
fn read_hdf5(file: &Path, max_halos: Option<usize>) -> Result<HaloCatalog, HaloReadError> {
    let file_str = file.display().to_string();
    let h5 = hdf5::File::open(file)?;
    let dataset = h5.dataset(HDF5_DATASET)?;
    let shape = dataset.shape();
    if shape.len() != 2 || shape[1] != 4 {
        return Err(HaloReadError::BadHdf5Shape {
            file: file_str,
            shape,
        });
    }
    let total_num_halos = shape[0];

    let num_halos = max_halos.map_or(total_num_halos, |m| m.min(total_num_halos));
    debug!("Reading {num_halos} of {total_num_halos} halos from {file_str}");
    let records: Vec<f32> = if num_halos == total_num_halos {
        dataset.read_raw()?
    } else {
        dataset
            .read_slice_2d::<f32, _>((0..num_halos, ..))?
            .into_iter()
            .collect()
    };
    let records = Array2::from_shape_vec((num_halos, 4), records)
        .map_err(|_| HaloReadError::Allocation(num_halos))?;

    Ok(HaloCatalog {
        positions: records.slice(s![.., 0..3]).t().to_owned(),
        masses: records.column(3).to_owned(),
        r_th_max: None,
        z_box: None,
    })
}

#[cfg(not(feature = "hdf5"))]
fn read_hdf5(file: &Path, _max_halos: Option<usize>) -> Result<HaloCatalog, HaloReadError> {
    Err(HaloReadError::Hdf5Disabled(file.display().to_string()))
}
