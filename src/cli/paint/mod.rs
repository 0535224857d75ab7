// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Paint CIB or radio maps from a halo catalogue.


use std::{borrow::Cow, path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::{
    common::{display_warnings, CosmologyArgs, InfoPrinter, Warn, ARG_FILE_HELP},
    HalopaintError,
};
use crate::{
    constants::DEFAULT_SEED,
    cosmology::CosmologyError,
    io::{read_halo_catalog, HaloFileType, HaloReadError, MapFileType},
    model::{CibParams, ModelError, RadioParams},
    params::{ModelParams, PaintParams, Precision, SourceModelType},
};

const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_SOURCE_MODEL: SourceModelType = SourceModelType::Cib;
const DEFAULT_PRECISION: Precision = Precision::Single;
const DEFAULT_MAP_FORMAT: MapFileType = MapFileType::Fits;

lazy_static::lazy_static! {
    static ref MAP_FILE_TYPES_COMMA_SEPARATED: String = MapFileType::iter().join(", ");

    static ref HALO_FILE_TYPES_COMMA_SEPARATED: String = HaloFileType::iter().join(", ");

    static ref SOURCE_MODELS_COMMA_SEPARATED: String = SourceModelType::iter().join(", ");

    static ref HALOS_HELP: String =
        format!("Path to the halo catalogue. Supported formats: {}", *HALO_FILE_TYPES_COMMA_SEPARATED);

    static ref SOURCE_MODEL_HELP: String =
        format!("The sources to paint. Supported models: {}. Default: {DEFAULT_SOURCE_MODEL}", *SOURCE_MODELS_COMMA_SEPARATED);

    static ref PRECISIONS_COMMA_SEPARATED: String = Precision::iter().join(", ");

    static ref OUTPUT_DIR_HELP: String =
        format!("The directory to write maps into. It is created if it doesn't exist. Default: {DEFAULT_OUTPUT_DIR}");

    static ref PREFIX_HELP: String =
        "Maps are named <PREFIX>_<FREQ>.<FORMAT>, with the frequency in GHz. Default: the source model's name".to_string();

    static ref MAP_FORMAT_HELP: String =
        format!("The format of the output maps. Supported formats: {}. Default: {DEFAULT_MAP_FORMAT}", *MAP_FILE_TYPES_COMMA_SEPARATED);

    static ref SEED_HELP: String =
        format!("The seed of the random number generators. The same seed always produces the same maps. Default: {DEFAULT_SEED}");

    static ref NSIDE_HELP: String =
        format!("The HEALPix resolution of the maps. Default: {}", CibParams::<f64>::default().nside);

    static ref PRECISION_HELP: String =
        format!("The floating-point precision of sources and maps. Supported precisions: {}. Default: {DEFAULT_PRECISION}", *PRECISIONS_COMMA_SEPARATED);

    static ref MIN_REDSHIFT_HELP: String =
        format!("Halos closer than this redshift are skipped. Default: {} (CIB), {} (radio)", CibParams::<f64>::default().min_redshift, RadioParams::<f64>::default().min_redshift);

    static ref MAX_REDSHIFT_HELP: String =
        format!("Halos beyond this redshift are skipped. Default: {} (CIB), {} (radio)", CibParams::<f64>::default().max_redshift, RadioParams::<f64>::default().max_redshift);

    static ref MIN_MASS_HELP: String =
        format!("Halos lighter than this are skipped [solar masses]. Default: {:e} (CIB), {:e} (radio)", CibParams::<f64>::default().min_mass, RadioParams::<f64>::default().min_mass);
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PaintCliArgs {
    #[clap(short = 'i', long, help = HALOS_HELP.as_str(), parse(from_str), help_heading = "INPUT FILES")]
    pub(super) halos: Option<PathBuf>,

    /// Only use this many halos from the start of the catalogue. The default
    /// is to use them all.
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) max_halos: Option<usize>,

    #[clap(long, help = SOURCE_MODEL_HELP.as_str(), help_heading = "MAPS")]
    pub(super) source_model: Option<String>,

    /// The observing frequencies [GHz]. One map is painted per frequency.
    #[clap(short, long, multiple_values(true), help_heading = "MAPS")]
    pub(super) freqs: Option<Vec<f64>>,

    #[clap(long, help = NSIDE_HELP.as_str(), help_heading = "MAPS")]
    pub(super) nside: Option<u32>,

    #[clap(long, help = PRECISION_HELP.as_str(), help_heading = "MAPS")]
    pub(super) precision: Option<String>,

    #[clap(long, help = SEED_HELP.as_str(), help_heading = "MAPS")]
    pub(super) seed: Option<u64>,

    #[clap(long, help = MIN_REDSHIFT_HELP.as_str(), help_heading = "HALO CUTS")]
    pub(super) min_redshift: Option<f64>,

    #[clap(long, help = MAX_REDSHIFT_HELP.as_str(), help_heading = "HALO CUTS")]
    pub(super) max_redshift: Option<f64>,

    #[clap(long, help = MIN_MASS_HELP.as_str(), help_heading = "HALO CUTS")]
    pub(super) min_mass: Option<f64>,

    #[clap(short, long, help = OUTPUT_DIR_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,

    #[clap(long, help = PREFIX_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) prefix: Option<String>,

    #[clap(long, help = MAP_FORMAT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) map_format: Option<String>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PaintArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "cosmology")]
    #[serde(default)]
    pub(super) cosmology_args: CosmologyArgs,

    /// CIB model parameters can only be given in an arguments file; see
    /// `print-defaults`.
    #[clap(skip)]
    #[serde(rename = "model")]
    #[serde(default)]
    pub(super) model: Option<CibParams<f64>>,

    /// Radio model parameters can only be given in an arguments file; see
    /// `print-defaults`.
    #[clap(skip)]
    #[serde(rename = "radio")]
    #[serde(default)]
    pub(super) radio: Option<RadioParams<f64>>,

    #[clap(flatten)]
    #[serde(rename = "paint")]
    #[serde(default)]
    pub(super) paint_args: PaintCliArgs,
}

impl PaintArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<PaintArgs, HalopaintError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let PaintArgs {
                args_file: _,
                cosmology_args,
                model,
                radio,
                paint_args,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(PaintArgs {
                args_file: None,
                cosmology_args: cli_args.cosmology_args.merge(cosmology_args),
                model: cli_args.model.or(model),
                radio: cli_args.radio.or(radio),
                paint_args: cli_args.paint_args.merge(paint_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Every argument that has a default, filled in with it.
    pub(super) fn defaults() -> PaintArgs {
        PaintArgs {
            args_file: None,
            cosmology_args: CosmologyArgs::defaults(),
            model: Some(CibParams::default()),
            radio: Some(RadioParams::default()),
            paint_args: PaintCliArgs {
                halos: None,
                max_halos: None,
                source_model: Some(DEFAULT_SOURCE_MODEL.to_string()),
                freqs: None,
                nside: None,
                precision: Some(DEFAULT_PRECISION.to_string()),
                seed: Some(DEFAULT_SEED),
                min_redshift: None,
                max_redshift: None,
                min_mass: None,
                output_dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
                prefix: None,
                map_format: Some(DEFAULT_MAP_FORMAT.to_string()),
            },
        }
    }

    fn parse(self) -> Result<PaintParams, PaintArgsError> {
        debug!("{:#?}", self);

        // Expose all the struct fields to ensure they're all used.
        let PaintArgs {
            args_file: _,
            cosmology_args,
            model,
            radio,
            paint_args:
                PaintCliArgs {
                    halos,
                    max_halos,
                    source_model,
                    freqs,
                    nside,
                    precision,
                    seed,
                    min_redshift,
                    max_redshift,
                    min_mass,
                    output_dir,
                    prefix,
                    map_format,
                },
        } = self;

        let cosmology = cosmology_args.parse()?;

        let source_model = match source_model {
            Some(m) => SourceModelType::from_str(&m.to_lowercase())
                .map_err(|_| PaintArgsError::BadSourceModel(m))?,
            None => DEFAULT_SOURCE_MODEL,
        };
        let cuts = HaloCutArgs {
            nside,
            min_redshift,
            max_redshift,
            min_mass,
        };

        let precision = match precision {
            Some(p) => Precision::from_str(&p.to_lowercase())
                .map_err(|_| PaintArgsError::BadPrecision(p))?,
            None => DEFAULT_PRECISION,
        };
        let seed = seed.unwrap_or(DEFAULT_SEED);

        // Command-line cuts take precedence over the model parameters.
        let mut model_printer = InfoPrinter::new(format!("Model: {source_model}").into());
        let model = match source_model {
            SourceModelType::Cib => {
                let mut model = model.unwrap_or_default();
                cuts.apply(
                    &mut model.nside,
                    &mut model.min_redshift,
                    &mut model.max_redshift,
                    &mut model.min_mass,
                );
                model.validate()?;
                model_printer.push_block(vec![
                    format!(
                        "Halos within z = [{}, {}], heavier than {:e} M☉",
                        model.min_redshift, model.max_redshift, model.min_mass
                    )
                    .into(),
                    format!(
                        "Subhalos heavier than {:e} M☉, dark below {:e} M☉",
                        model.shang_msmin, model.shang_mmin
                    )
                    .into(),
                ]);
                ModelParams::Cib(model)
            }
            SourceModelType::Radio => {
                let mut model = radio.unwrap_or_default();
                cuts.apply(
                    &mut model.nside,
                    &mut model.min_redshift,
                    &mut model.max_redshift,
                    &mut model.min_mass,
                );
                model.validate()?;
                model_printer.push_block(vec![
                    format!(
                        "Halos within z = [{}, {}], heavier than {:e} M☉",
                        model.min_redshift, model.max_redshift, model.min_mass
                    )
                    .into(),
                    format!(
                        "FR I and FR II populations, luminosities at {} MHz",
                        model.nu_ref / 1e6
                    )
                    .into(),
                ]);
                ModelParams::Radio(model)
            }
        };
        let nside = model.nside();
        model_printer.push_line(
            format!(
                "nside {nside} ({} pixels), {precision} precision, seed {seed}",
                12 * u64::from(nside) * u64::from(nside)
            )
            .into(),
        );
        model_printer.display();

        // Observing frequencies.
        let freqs_ghz = match freqs {
            None => return Err(PaintArgsError::NoFreqs),
            Some(f) if f.is_empty() => return Err(PaintArgsError::NoFreqs),
            Some(f) => f,
        };
        let mut unique_freqs_ghz: Vec<f64> = Vec::with_capacity(freqs_ghz.len());
        for f in freqs_ghz {
            if !(f.is_finite() && f > 0.0) {
                return Err(PaintArgsError::BadFreq(f));
            }
            if unique_freqs_ghz.contains(&f) {
                format!("Frequency {f} GHz was specified more than once; painting it once").warn();
            } else {
                unique_freqs_ghz.push(f);
            }
        }

        // Outputs.
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(PaintArgsError::OutputDirNotDir(output_dir));
        }
        let prefix = prefix.unwrap_or_else(|| source_model.to_string());
        let map_format = match map_format {
            Some(f) => MapFileType::from_str(&f.to_lowercase())
                .map_err(|_| PaintArgsError::BadMapFormat(f))?,
            None => DEFAULT_MAP_FORMAT,
        };
        let outputs: Vec<(f64, PathBuf)> = unique_freqs_ghz
            .iter()
            .map(|&f| (f * 1e9, output_dir.join(format!("{prefix}_{f}.{map_format}"))))
            .collect();
        let existing: Vec<Cow<'static, str>> = outputs
            .iter()
            .filter(|(_, path)| path.exists())
            .map(|(_, path)| format!("{} will be overwritten", path.display()).into())
            .collect();
        if !existing.is_empty() {
            existing.warn();
        }

        // Halos.
        let halos_file = halos.ok_or(PaintArgsError::NoHalos)?;
        if !halos_file.exists() {
            return Err(PaintArgsError::HalosDoesntExist(halos_file));
        }
        let halos = read_halo_catalog(&halos_file, &cosmology, max_halos)?;
        let mut halo_printer = InfoPrinter::new("Halos".into());
        halo_printer.push_line(format!("from {}", halos_file.display()).into());
        let mut block: Vec<Cow<'static, str>> =
            vec![format!("{} halos", halos.num_halos()).into()];
        if let Some((min, max)) = halos
            .masses
            .iter()
            .copied()
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
        {
            block.push(format!("Masses from {min:e} to {max:e} M☉").into());
        }
        halo_printer.push_block(block);
        halo_printer.display();

        let mut output_printer = InfoPrinter::new("Output maps".into());
        output_printer.push_block(
            outputs
                .iter()
                .map(|(f, path)| format!("{:>8} GHz: {}", f / 1e9, path.display()).into())
                .collect(),
        );
        output_printer.display();

        display_warnings();

        Ok(PaintParams {
            halos,
            cosmology,
            model,
            outputs,
            output_dir,
            seed,
            precision,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), HalopaintError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

/// Render the arguments file containing every default.
pub(super) fn defaults_toml() -> Result<String, HalopaintError> {
    toml::to_string(&PaintArgs::defaults())
        .map_err(|e| HalopaintError::Generic(format!("Couldn't serialise the defaults: {e}")))
}

#[derive(Error, Debug)]
pub(super) enum PaintArgsError {
    #[error("No halo catalogue was supplied")]
    NoHalos,

    #[error("Halo catalogue '{}' doesn't exist", .0.display())]
    HalosDoesntExist(PathBuf),

    #[error("No observing frequencies were supplied")]
    NoFreqs,

    #[error("Observing frequencies must be finite and positive, but {0} GHz was given")]
    BadFreq(f64),

    #[error("Precision '{0}' isn't recognised. Supported precisions: {}", *PRECISIONS_COMMA_SEPARATED)]
    BadPrecision(String),

    #[error("Source model '{0}' isn't recognised. Supported models: {}", *SOURCE_MODELS_COMMA_SEPARATED)]
    BadSourceModel(String),

    #[error("Map format '{0}' isn't recognised. Supported formats: {}", *MAP_FILE_TYPES_COMMA_SEPARATED)]
    BadMapFormat(String),

    #[error("Output directory '{}' exists but isn't a directory", .0.display())]
    OutputDirNotDir(PathBuf),

    #[error(transparent)]
    Cosmology(#[from] CosmologyError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    HaloRead(#[from] HaloReadError),
}

/// Halo cuts given on the command line.
struct HaloCutArgs {
    nside: Option<u32>,
    min_redshift: Option<f64>,
    max_redshift: Option<f64>,
    min_mass: Option<f64>,
}

impl HaloCutArgs {
    fn apply(
        &self,
        nside: &mut u32,
        min_redshift: &mut f64,
        max_redshift: &mut f64,
        min_mass: &mut f64,
    ) {
        if let Some(n) = self.nside {
            *nside = n;
        }
        if let Some(z) = self.min_redshift {
            *min_redshift = z;
        }
        if let Some(z) = self.max_redshift {
            *max_redshift = z;
        }
        if let Some(m) = self.min_mass {
            *min_mass = m;
        }
    }
}

impl PaintCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            halos: self.halos.or(other.halos),
            max_halos: self.max_halos.or(other.max_halos),
            source_model: self.source_model.or(other.source_model),
            freqs: self.freqs.or(other.freqs),
            nside: self.nside.or(other.nside),
            precision: self.precision.or(other.precision),
            seed: self.seed.or(other.seed),
            min_redshift: self.min_redshift.or(other.min_redshift),
            max_redshift: self.max_redshift.or(other.max_redshift),
            min_mass: self.min_mass.or(other.min_mass),
            output_dir: self.output_dir.or(other.output_dir),
            prefix: self.prefix.or(other.prefix),
            map_format: self.map_format.or(other.map_format),
        }
    }
}
