// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Painting sources onto sky maps.
//!
//! Fluxes are evaluated in parallel (each source writes only its own slot of
//! a flux buffer), then added into the map in a single pass in source order.
//! Many sources can share a pixel, and this keeps the result deterministic.

mod error;

pub use error::{MapError, PaintError};

use log::trace;
use rayon::prelude::*;
use strum_macros::Display;

use crate::{
    cosmology::{Cosmology, Curvature},
    healpix::{HealpixRing, Pixelization},
    math::Real,
    model::HaloModel,
    sources::{SourceArrays, SourceCatalog},
};

/// Whether a source is a central or a satellite.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    #[strum(serialize = "central")]
    Central,
    #[strum(serialize = "satellite")]
    Satellite,
}

/// A HEALPix (RING-ordered) map accumulating flux.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyMap<T> {
    nside: u32,
    pixels: Vec<T>,
}

impl<T: Real> SkyMap<T> {
    /// A zeroed map.
    pub fn new(nside: u32) -> Result<SkyMap<T>, MapError> {
        let num_pixels = HealpixRing::new(nside)?.num_pixels();
        let len = usize::try_from(num_pixels).map_err(|_| MapError::Allocation(num_pixels))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| MapError::Allocation(num_pixels))?;
        pixels.resize(len, T::zero());
        Ok(SkyMap { nside, pixels })
    }

    /// Wrap existing pixel values.
    pub fn from_pixels(nside: u32, pixels: Vec<T>) -> Result<SkyMap<T>, MapError> {
        let expected = HealpixRing::new(nside)?.num_pixels();
        if pixels.len() as u64 != expected {
            return Err(MapError::WrongLength {
                nside,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(SkyMap { nside, pixels })
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    pub fn num_pixels(&self) -> u64 {
        self.pixels.len() as u64
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<T> {
        self.pixels
    }

    /// Set every pixel to zero.
    pub fn reset(&mut self) {
        self.pixels.par_iter_mut().for_each(|p| *p = T::zero());
    }

    /// The sum of all pixels.
    pub fn total(&self) -> T {
        self.pixels.par_iter().copied().sum()
    }
}

/// Evaluate the flux of every source at the observing frequency `nu_obs`
/// \[Hz\], write it into `fluxes_cen` and `fluxes_sat` (overwriting them), and
/// add it into `map`. If an error occurs the map is left untouched.
pub fn paint<T, M>(
    map: &mut SkyMap<T>,
    nu_obs: T,
    model: &M,
    sources: &SourceCatalog<T>,
    fluxes_cen: &mut [T],
    fluxes_sat: &mut [T],
) -> Result<(), PaintError>
where
    T: Real,
    M: HaloModel<T> + ?Sized,
{
    if !(nu_obs.is_finite() && nu_obs > T::zero()) {
        return Err(PaintError::BadFrequency(nu_obs.as_f64()));
    }
    for (kind, expected, actual) in [
        (SourceKind::Central, sources.num_centrals(), fluxes_cen.len()),
        (SourceKind::Satellite, sources.num_satellites(), fluxes_sat.len()),
    ] {
        if expected != actual {
            return Err(PaintError::BufferLength {
                kind,
                expected,
                actual,
            });
        }
    }
    if sources.num_pixels != map.num_pixels() {
        return Err(PaintError::PixelizationMismatch {
            sources: sources.num_pixels,
            map: map.num_pixels(),
        });
    }

    let num_pixels = map.num_pixels();
    compute_fluxes(
        SourceKind::Central,
        &sources.centrals,
        sources.curvature,
        num_pixels,
        nu_obs,
        model,
        fluxes_cen,
    )?;
    compute_fluxes(
        SourceKind::Satellite,
        &sources.satellites,
        sources.curvature,
        num_pixels,
        nu_obs,
        model,
        fluxes_sat,
    )?;

    // Pixel indices were checked above.
    let pixels = map.pixels_mut();
    for (&pixel, &flux) in sources
        .centrals
        .pixel
        .iter()
        .zip(fluxes_cen.iter())
        .chain(sources.satellites.pixel.iter().zip(fluxes_sat.iter()))
    {
        pixels[pixel as usize] += flux;
    }
    trace!(
        "Painted {} centrals and {} satellites at {} Hz",
        sources.num_centrals(),
        sources.num_satellites(),
        nu_obs
    );

    Ok(())
}

fn compute_fluxes<T, M>(
    kind: SourceKind,
    sources: &SourceArrays<T>,
    curvature: Curvature<T>,
    num_pixels: u64,
    nu_obs: T,
    model: &M,
    fluxes: &mut [T],
) -> Result<(), PaintError>
where
    T: Real,
    M: HaloModel<T> + ?Sized,
{
    fluxes
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(index, flux)| {
            let pixel = sources.pixel[index];
            if pixel >= num_pixels {
                return Err(PaintError::PixelOutOfRange {
                    kind,
                    index,
                    pixel,
                    num_pixels,
                });
            }
            let transverse_distance = curvature.flux_distance(sources.distance[index]);
            *flux = model
                .flux(
                    sources.luminosity[index],
                    sources.redshift[index],
                    nu_obs,
                    transverse_distance,
                )
                .map_err(|source| PaintError::Flux {
                    kind,
                    index,
                    source,
                })?;
            Ok(())
        })
}

/// The flux observed at `nu_obs` \[Hz\] from a source with luminosity
/// `luminosity` at redshift `z`. This is the flux [`paint`] gives the same
/// source, including at z = 0 (see [`Curvature::flux_distance`]).
pub fn observed_flux<T, M>(
    model: &M,
    cosmology: &Cosmology<T>,
    luminosity: T,
    z: T,
    nu_obs: T,
) -> Result<T, PaintError>
where
    T: Real,
    M: HaloModel<T> + ?Sized,
{
    let distance = cosmology.redshift_to_distance(z)?;
    let transverse_distance = cosmology.curvature().flux_distance(distance);
    Ok(model.flux(luminosity, z, nu_obs, transverse_distance)?)
}
