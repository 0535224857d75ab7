// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Paint extragalactic foregrounds, the cosmic infrared background (CIB) and
radio galaxies, from a catalogue of dark-matter halos.

Halos are populated with central and satellite sources following a halo
occupation model, each source is given a luminosity, and at every observing
frequency the sources' fluxes are accumulated onto a HEALPix map.
 */

pub mod constants;
pub mod cosmology;
pub mod healpix;
pub mod io;
mod math;
pub mod model;
pub mod paint;
pub mod shmf;
pub mod sources;

mod cli;
pub(crate) mod params;

#[cfg(test)]
mod tests;

use crossbeam_utils::atomic::AtomicCell;

/// Should progress bars be drawn? Only the binary sets this.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);

// Re-exports.
pub use cli::{Halopaint, HalopaintError};
pub use cosmology::{Cosmology, CosmologyParams, Curvature};
pub use healpix::{HealpixRing, Pixelization};
pub use io::{read_halo_catalog, read_halo_catalog_pksc, HaloCatalog};
pub use math::Real;
pub use model::{
    CibParams, CibPlanck2013, HaloModel, RadioParams, RadioSehgal2009, SourceModel,
};
pub use paint::{observed_flux, paint, SkyMap};
pub use sources::{generate_sources, SourceCatalog, SourceGenerator};
