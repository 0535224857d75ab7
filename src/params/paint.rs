// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Paint maps from a halo catalogue.

use std::path::PathBuf;

use indicatif::{MultiProgress, ProgressDrawTarget};
use log::{debug, info};
use thiserror::Error;

use super::{styled_progress_bar, Precision};
use crate::{
    constants::FR2_SEED_OFFSET,
    cosmology::{Cosmology, CosmologyError, CosmologyParams},
    healpix::{HealpixError, HealpixRing},
    io::{write_map, HaloCatalog, MapPixel, MapWriteError},
    model::{CibParams, CibPlanck2013, HaloModel, ModelError, RadioParams, RadioSehgal2009},
    paint::{paint, MapError, PaintError, SkyMap},
    sources::{SourceCatalog, SourceError, SourceGenerator},
    PROGRESS_BARS,
};

/// The model to paint, with its parameters.
#[derive(Debug, Clone)]
pub(crate) enum ModelParams {
    Cib(CibParams<f64>),
    Radio(RadioParams<f64>),
}

impl ModelParams {
    pub(crate) fn nside(&self) -> u32 {
        match self {
            ModelParams::Cib(p) => p.nside,
            ModelParams::Radio(p) => p.nside,
        }
    }
}

/// Parameters needed to paint maps.
pub(crate) struct PaintParams {
    /// The halos to populate with sources.
    pub(crate) halos: HaloCatalog,

    pub(crate) cosmology: CosmologyParams,

    /// The model parameters, including the map resolution.
    pub(crate) model: ModelParams,

    /// The observing frequencies \[Hz\], each paired with the file its map is
    /// written to.
    pub(crate) outputs: Vec<(f64, PathBuf)>,

    /// The directory containing the output maps. Created if necessary.
    pub(crate) output_dir: PathBuf,

    pub(crate) seed: u64,

    pub(crate) precision: Precision,
}

impl PaintParams {
    pub(crate) fn run(&self) -> Result<(), PaintRunError> {
        match self.precision {
            Precision::Single => self.run_inner::<f32>(),
            Precision::Double => self.run_inner::<f64>(),
        }
    }

    fn run_inner<T: MapPixel>(&self) -> Result<(), PaintRunError> {
        let cosmology = Cosmology::<T>::new(&self.cosmology)?;
        match &self.model {
            ModelParams::Cib(params) => {
                let model = CibPlanck2013::new(params.cast::<T>())?;
                self.paint_populations(&cosmology, &[(&model, self.seed)])
            }
            ModelParams::Radio(params) => {
                let model = RadioSehgal2009::new(params.cast::<T>())?;
                let [fr1, fr2] = model.populations();
                self.paint_populations(
                    &cosmology,
                    &[
                        (fr1, self.seed),
                        (fr2, self.seed.wrapping_add(FR2_SEED_OFFSET)),
                    ],
                )
            }
        }
    }

    /// Generate sources for every population once, then paint all of them
    /// into one map per frequency.
    fn paint_populations<T, M>(
        &self,
        cosmology: &Cosmology<T>,
        populations: &[(&M, u64)],
    ) -> Result<(), PaintRunError>
    where
        T: MapPixel,
        M: HaloModel<T>,
    {
        let PaintParams {
            halos,
            cosmology: _,
            model,
            outputs,
            output_dir,
            seed: _,
            precision: _,
        } = self;

        let nside = model.nside();
        let pixelization = HealpixRing::new(nside)?;
        let mut map = SkyMap::<T>::new(nside)?;
        std::fs::create_dir_all(output_dir)?;

        let multi_progress = MultiProgress::with_draw_target(if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        });
        let generate_progress = multi_progress.add(styled_progress_bar(
            (halos.num_halos() * populations.len()) as u64,
            "halos",
            "Generating sources",
        ));
        let paint_progress = multi_progress.add(styled_progress_bar(
            outputs.len() as u64,
            "maps",
            "Painting",
        ));

        struct Population<'a, T, M> {
            model: &'a M,
            sources: SourceCatalog<T>,
            fluxes_cen: Vec<T>,
            fluxes_sat: Vec<T>,
        }
        let mut generated = Vec::with_capacity(populations.len());
        for &(model, seed) in populations {
            let sources = SourceGenerator::new(model, cosmology, &pixelization)
                .seed(seed)
                .progress_bar(generate_progress.clone())
                .generate(halos.positions.view(), halos.masses.view())?;
            info!(
                "Generated {} centrals and {} satellites",
                sources.num_centrals(),
                sources.num_satellites()
            );
            let (fluxes_cen, fluxes_sat) = sources.flux_buffers()?;
            generated.push(Population {
                model,
                sources,
                fluxes_cen,
                fluxes_sat,
            });
        }
        generate_progress.finish();

        for (freq_hz, output) in outputs {
            map.reset();
            for population in &mut generated {
                paint(
                    &mut map,
                    T::cast(*freq_hz),
                    population.model,
                    &population.sources,
                    &mut population.fluxes_cen,
                    &mut population.fluxes_sat,
                )?;
            }
            write_map(output, &map)?;
            debug!(
                "{} GHz: total flux {:e}, written to {}",
                freq_hz / 1e9,
                map.total().as_f64(),
                output.display()
            );
            paint_progress.inc(1);
        }
        paint_progress.finish();

        info!("Wrote {} maps to {}", outputs.len(), output_dir.display());
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(crate) enum PaintRunError {
    #[error(transparent)]
    Cosmology(#[from] CosmologyError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Healpix(#[from] HealpixError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Sources(#[from] SourceError),

    #[error(transparent)]
    Paint(#[from] PaintError),

    #[error(transparent)]
    MapWrite(#[from] MapWriteError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
