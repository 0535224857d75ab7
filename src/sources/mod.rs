// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Populating halos with sources.
//!
//! Every accepted halo gets a central source at its centre and the model's
//! satellites (for CIB models, a Poisson number drawn from the subhalo mass
//! function), scattered uniformly within the halo's virial radius. Halos are processed in parallel
//! in fixed-size chunks; each chunk has its own random number generator seeded
//! from the run's seed and the chunk index, so the output only depends on the
//! seed and never on the number of threads.

mod error;

pub use error::SourceError;

use indicatif::ProgressBar;
use log::debug;
use ndarray::{ArrayView1, ArrayView2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::{
    constants::{DEFAULT_SEED, HALO_CHUNK_SIZE, TAU},
    cosmology::{Cosmology, Curvature},
    healpix::Pixelization,
    math::{norm3, Real},
    model::HaloModel,
};

/// Parallel arrays describing a set of sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceArrays<T> {
    /// The pixel containing each source.
    pub pixel: Vec<u64>,

    pub luminosity: Vec<T>,

    pub redshift: Vec<T>,

    /// Line-of-sight comoving distance \[Mpc\].
    pub distance: Vec<T>,

    /// The index of the halo that hosts each source.
    pub halo_index: Vec<usize>,
}

impl<T: Real> SourceArrays<T> {
    pub fn len(&self) -> usize {
        self.pixel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixel.is_empty()
    }

    fn push(&mut self, pixel: u64, luminosity: T, redshift: T, distance: T, halo_index: usize) {
        self.pixel.push(pixel);
        self.luminosity.push(luminosity);
        self.redshift.push(redshift);
        self.distance.push(distance);
        self.halo_index.push(halo_index);
    }

    fn try_with_capacity(what: &'static str, len: usize) -> Result<Self, SourceError> {
        let mut arrays = Self::default();
        let err = || SourceError::Allocation { what, len };
        arrays.pixel.try_reserve_exact(len).map_err(|_| err())?;
        arrays.luminosity.try_reserve_exact(len).map_err(|_| err())?;
        arrays.redshift.try_reserve_exact(len).map_err(|_| err())?;
        arrays.distance.try_reserve_exact(len).map_err(|_| err())?;
        arrays.halo_index.try_reserve_exact(len).map_err(|_| err())?;
        Ok(arrays)
    }

    fn extend_from(&mut self, other: SourceArrays<T>) {
        self.pixel.extend(other.pixel);
        self.luminosity.extend(other.luminosity);
        self.redshift.extend(other.redshift);
        self.distance.extend(other.distance);
        self.halo_index.extend(other.halo_index);
    }
}

/// The sources generated from a halo catalogue. Centrals are in the same order
/// as their halos; satellites are grouped by their host halo.
#[derive(Debug, Clone)]
pub struct SourceCatalog<T> {
    pub centrals: SourceArrays<T>,
    pub satellites: SourceArrays<T>,

    /// Needed to turn the source distances into transverse comoving distances
    /// when painting.
    pub curvature: Curvature<T>,

    /// The number of pixels of the pixelization used to generate the sources.
    pub num_pixels: u64,
}

impl<T: Real> SourceCatalog<T> {
    pub fn num_centrals(&self) -> usize {
        self.centrals.len()
    }

    pub fn num_satellites(&self) -> usize {
        self.satellites.len()
    }

    /// Zeroed flux buffers for centrals and satellites, sized for this
    /// catalogue.
    pub fn flux_buffers(&self) -> Result<(Vec<T>, Vec<T>), SourceError> {
        fn zeroed<T: Real>(what: &'static str, len: usize) -> Result<Vec<T>, SourceError> {
            let mut v = Vec::new();
            v.try_reserve_exact(len)
                .map_err(|_| SourceError::Allocation { what, len })?;
            v.resize(len, T::zero());
            Ok(v)
        }

        Ok((
            zeroed("central fluxes", self.num_centrals())?,
            zeroed("satellite fluxes", self.num_satellites())?,
        ))
    }
}

/// Generates a [`SourceCatalog`] from halos.
pub struct SourceGenerator<'a, T: Real, M: ?Sized, P: ?Sized> {
    model: &'a M,
    cosmology: &'a Cosmology<T>,
    pixelization: &'a P,
    seed: u64,
    progress_bar: Option<ProgressBar>,
}

impl<'a, T, M, P> SourceGenerator<'a, T, M, P>
where
    T: Real,
    M: HaloModel<T> + ?Sized,
    P: Pixelization + ?Sized,
{
    pub fn new(
        model: &'a M,
        cosmology: &'a Cosmology<T>,
        pixelization: &'a P,
    ) -> SourceGenerator<'a, T, M, P> {
        SourceGenerator {
            model,
            cosmology,
            pixelization,
            seed: DEFAULT_SEED,
            progress_bar: None,
        }
    }

    /// Set the seed of the random number generators.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Report progress (in halos) on this progress bar. The caller finishes
    /// it, so one bar can follow several generation passes.
    pub fn progress_bar(mut self, progress_bar: ProgressBar) -> Self {
        self.progress_bar = Some(progress_bar);
        self
    }

    /// Generate sources with [`StdRng`] random number generators.
    pub fn generate<TH: Real>(
        &self,
        positions: ArrayView2<TH>,
        masses: ArrayView1<TH>,
    ) -> Result<SourceCatalog<T>, SourceError> {
        self.generate_with_rng::<StdRng, TH>(positions, masses)
    }

    /// Generate sources. `positions` are comoving Cartesian coordinates with
    /// the observer at the origin, shape (3, N) \[Mpc\]; `masses` are halo
    /// masses \[M☉\].
    pub fn generate_with_rng<R, TH>(
        &self,
        positions: ArrayView2<TH>,
        masses: ArrayView1<TH>,
    ) -> Result<SourceCatalog<T>, SourceError>
    where
        R: Rng + SeedableRng,
        TH: Real,
    {
        let (rows, num_halos) = positions.dim();
        if rows != 3 {
            return Err(SourceError::BadPositionsShape {
                rows,
                cols: num_halos,
            });
        }
        if masses.len() != num_halos {
            return Err(SourceError::LengthMismatch {
                positions: num_halos,
                masses: masses.len(),
            });
        }

        let cuts = self.model.halo_cuts();
        if cuts.max_redshift > self.cosmology.max_redshift() {
            return Err(SourceError::RedshiftRangeNotTabulated {
                max: cuts.max_redshift.as_f64(),
                table_max: self.cosmology.max_redshift().as_f64(),
            });
        }
        let min_distance = self.cosmology.redshift_to_distance(cuts.min_redshift)?;
        let max_distance = self.cosmology.redshift_to_distance(cuts.max_redshift)?;

        // Validate everything before any sampling, and find the heaviest
        // accepted halo for the model's sampling tables.
        let halo = |i: usize| -> ([T; 3], T) {
            let pos = [
                T::cast(positions[(0, i)].as_f64()),
                T::cast(positions[(1, i)].as_f64()),
                T::cast(positions[(2, i)].as_f64()),
            ];
            (pos, T::cast(masses[i].as_f64()))
        };
        let accepted = |pos: [T; 3], mass: T| -> Option<T> {
            let distance = norm3(pos);
            if mass < cuts.min_mass || distance < min_distance || distance > max_distance {
                None
            } else {
                Some(distance)
            }
        };
        let mut max_host_mass: Option<T> = None;
        let mut num_accepted = 0;
        for i in 0..num_halos {
            let (pos, mass) = halo(i);
            if !(mass.is_finite() && mass >= T::zero()) {
                return Err(SourceError::BadMass {
                    index: i,
                    mass: masses[i].as_f64(),
                });
            }
            if pos.iter().any(|p| !p.is_finite()) {
                return Err(SourceError::BadPosition { index: i });
            }
            if accepted(pos, mass).is_some() {
                num_accepted += 1;
                max_host_mass = Some(max_host_mass.map_or(mass, |m| m.max(mass)));
            }
        }
        debug!(
            "{num_accepted} of {num_halos} halos are within z = [{}, {}] and heavier than {:e} M☉",
            cuts.min_redshift,
            cuts.max_redshift,
            cuts.min_mass.as_f64()
        );
        let tables = match max_host_mass {
            Some(m) => Some(self.model.tables(m)?),
            None => None,
        };

        let num_chunks = num_halos.div_ceil(HALO_CHUNK_SIZE);
        let chunks: Vec<(SourceArrays<T>, SourceArrays<T>)> = (0..num_chunks)
            .into_par_iter()
            .map(|chunk_index| {
                let start = chunk_index * HALO_CHUNK_SIZE;
                let end = (start + HALO_CHUNK_SIZE).min(num_halos);
                let mut rng = R::seed_from_u64(self.seed.wrapping_add(chunk_index as u64));
                let mut centrals = SourceArrays::default();
                let mut satellites = SourceArrays::default();
                let mut luminosities = vec![];

                for i in start..end {
                    let (pos, mass) = halo(i);
                    let distance = match accepted(pos, mass) {
                        Some(d) => d,
                        None => continue,
                    };
                    let z = self
                        .cosmology
                        .distance_to_redshift(distance)
                        .map_err(|source| SourceError::HaloRedshift { index: i, source })?;
                    // Tables exist whenever any halo is accepted.
                    let tables = match &tables {
                        Some(t) => t,
                        None => continue,
                    };
                    let luminosity = self
                        .model
                        .central_source(tables, &mut rng, mass, z)
                        .map_err(|source| SourceError::Central { index: i, source })?;
                    centrals.push(
                        self.pixelization.pixel_of(as_f64(pos)),
                        luminosity,
                        z,
                        distance,
                        i,
                    );

                    luminosities.clear();
                    self.model
                        .satellite_sources(tables, &mut rng, mass, z, &mut luminosities)
                        .map_err(|source| SourceError::Satellites { index: i, source })?;
                    if luminosities.is_empty() {
                        continue;
                    }
                    let radius = self.cosmology.virial_radius(mass);
                    for &luminosity in &luminosities {
                        let offset = random_offset(&mut rng, radius);
                        let sat_pos = [pos[0] + offset[0], pos[1] + offset[1], pos[2] + offset[2]];
                        satellites.push(
                            self.pixelization.pixel_of(as_f64(sat_pos)),
                            luminosity,
                            z,
                            distance,
                            i,
                        );
                    }
                }

                if let Some(pb) = &self.progress_bar {
                    pb.inc((end - start) as u64);
                }
                Ok((centrals, satellites))
            })
            .collect::<Result<_, SourceError>>()?;

        let num_centrals = chunks.iter().map(|(c, _)| c.len()).sum();
        let num_satellites = chunks.iter().map(|(_, s)| s.len()).sum();
        let mut centrals = SourceArrays::try_with_capacity("central sources", num_centrals)?;
        let mut satellites = SourceArrays::try_with_capacity("satellite sources", num_satellites)?;
        for (c, s) in chunks {
            centrals.extend_from(c);
            satellites.extend_from(s);
        }
        debug!("Generated {num_centrals} centrals and {num_satellites} satellites");

        Ok(SourceCatalog {
            centrals,
            satellites,
            curvature: self.cosmology.curvature(),
            num_pixels: self.pixelization.num_pixels(),
        })
    }
}

/// Populate halos with sources. See [`SourceGenerator`].
pub fn generate_sources<T, TH, M, P>(
    model: &M,
    cosmology: &Cosmology<T>,
    pixelization: &P,
    positions: ArrayView2<TH>,
    masses: ArrayView1<TH>,
    seed: u64,
) -> Result<SourceCatalog<T>, SourceError>
where
    T: Real,
    TH: Real,
    M: HaloModel<T> + ?Sized,
    P: Pixelization + ?Sized,
{
    SourceGenerator::new(model, cosmology, pixelization)
        .seed(seed)
        .generate(positions, masses)
}

/// A point drawn uniformly from a ball of radius `radius`.
fn random_offset<T: Real, R: Rng + ?Sized>(rng: &mut R, radius: T) -> [T; 3] {
    let r = radius * T::cast(rng.gen::<f64>().cbrt());
    let cos_theta = T::cast(2.0 * rng.gen::<f64>() - 1.0);
    let phi = T::cast(TAU * rng.gen::<f64>());
    let sin_theta = (T::one() - cos_theta * cos_theta).max(T::zero()).sqrt();
    [
        r * sin_theta * phi.cos(),
        r * sin_theta * phi.sin(),
        r * cos_theta,
    ]
}

#[inline]
fn as_f64<T: Real>(v: [T; 3]) -> [f64; 3] {
    [v[0].as_f64(), v[1].as_f64(), v[2].as_f64()]
}
