// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! File stuff: reading halo catalogues and writing maps.

mod error;
mod halos;
mod map;

pub use error::{HaloReadError, MapWriteError};
pub use halos::{
    read_first_halos_pksc, read_halo_catalog, read_halo_catalog_hdf5, read_halo_catalog_pksc,
    HaloCatalog, HaloFileType,
};
pub use map::{write_map, write_map_fits, MapFileType, MapPixel};
