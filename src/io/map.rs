// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to write sky maps as HEALPix FITS files (a binary table in RING
//! ordering, written by `healpix_fits`).

use std::{fs::File, path::Path, str::FromStr};

use log::debug;
use strum_macros::{Display, EnumIter, EnumString};

use super::error::MapWriteError;
use crate::{math::Real, paint::SkyMap};

/// All of the map file types that can be written.
#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum MapFileType {
    #[strum(serialize = "fits")]
    Fits,
}

/// A pixel type that can be stored in a HEALPix FITS map. Maps are stored at
/// the precision they were painted with.
pub trait MapPixel: Real {
    #[doc(hidden)]
    fn write_healpix(file: &str, pixels: &[Self]);
}

impl MapPixel for f32 {
    fn write_healpix(file: &str, pixels: &[f32]) {
        healpix_fits::write_map(file, &[pixels], false, true);
    }
}

impl MapPixel for f64 {
    fn write_healpix(file: &str, pixels: &[f64]) {
        healpix_fits::write_map(file, &[pixels], false, true);
    }
}

/// Write a map, choosing the format from the file's extension.
pub fn write_map<T: MapPixel>(file: &Path, map: &SkyMap<T>) -> Result<(), MapWriteError> {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match MapFileType::from_str(&ext.to_lowercase()) {
        Ok(MapFileType::Fits) => write_map_fits(file, map),
        Err(_) => Err(MapWriteError::UnsupportedExt {
            ext: ext.to_string(),
        }),
    }
}

/// Write a map as a HEALPix FITS file. An existing file is overwritten.
pub fn write_map_fits<T: MapPixel>(file: &Path, map: &SkyMap<T>) -> Result<(), MapWriteError> {
    let file_str = file
        .to_str()
        .ok_or_else(|| MapWriteError::NonUtf8Path(file.display().to_string()))?;
    // Surface an unwritable destination as an error before handing the path
    // to `healpix_fits`, which panics on failure.
    File::create(file)?;
    T::write_healpix(file_str, map.pixels());
    debug!("Wrote {}", file.display());
    Ok(())
}
