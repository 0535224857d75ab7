// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. The background cosmology is
//! needed both to read halo catalogues and to paint maps, so its arguments
//! live here.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use clap::Parser;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::cosmology::{CosmologyError, CosmologyParams};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref H_HELP: String =
        format!("The dimensionless Hubble constant. Default: {}", CosmologyParams::default().h);

    static ref OMEGA_M_HELP: String =
        format!("The matter density parameter. Default: {}", CosmologyParams::default().omega_m);

    static ref OMEGA_K_HELP: String =
        format!("The curvature density parameter. Default: {}", CosmologyParams::default().omega_k);

    static ref TCMB_HELP: String =
        format!("The CMB temperature, used to derive the radiation density [K]. Default: {}", CosmologyParams::default().tcmb);

    static ref NEFF_HELP: String =
        format!("The effective number of neutrino species, used to derive the radiation density. Default: {}", CosmologyParams::default().neff);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(HalopaintError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(HalopaintError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(HalopaintError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Parameters of the background cosmology. Anything not specified takes its
/// default value.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CosmologyArgs {
    #[clap(long = "hubble-h", help = H_HELP.as_str(), help_heading = "COSMOLOGY")]
    pub(super) h: Option<f64>,

    #[clap(long, help = OMEGA_M_HELP.as_str(), help_heading = "COSMOLOGY")]
    pub(super) omega_m: Option<f64>,

    #[clap(long, help = OMEGA_K_HELP.as_str(), help_heading = "COSMOLOGY", allow_hyphen_values = true)]
    pub(super) omega_k: Option<f64>,

    /// The radiation density parameter. If this isn't given, it is derived
    /// from the CMB temperature and the number of neutrino species.
    #[clap(long, help_heading = "COSMOLOGY")]
    pub(super) omega_r: Option<f64>,

    #[clap(long, help = TCMB_HELP.as_str(), help_heading = "COSMOLOGY")]
    pub(super) tcmb: Option<f64>,

    #[clap(long, help = NEFF_HELP.as_str(), help_heading = "COSMOLOGY")]
    pub(super) neff: Option<f64>,

    /// The dark energy equation of state at z = 0. Default: -1
    #[clap(long, help_heading = "COSMOLOGY", allow_hyphen_values = true)]
    pub(super) w0: Option<f64>,

    /// The evolution of the dark energy equation of state. Default: 0
    #[clap(long, help_heading = "COSMOLOGY", allow_hyphen_values = true)]
    pub(super) wa: Option<f64>,
}

impl CosmologyArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            h: self.h.or(other.h),
            omega_m: self.omega_m.or(other.omega_m),
            omega_k: self.omega_k.or(other.omega_k),
            omega_r: self.omega_r.or(other.omega_r),
            tcmb: self.tcmb.or(other.tcmb),
            neff: self.neff.or(other.neff),
            w0: self.w0.or(other.w0),
            wa: self.wa.or(other.wa),
        }
    }

    /// All parameters, filled in with their defaults.
    pub(super) fn defaults() -> Self {
        let CosmologyParams {
            h,
            omega_m,
            omega_k,
            omega_r,
            tcmb,
            neff,
            w0,
            wa,
        } = CosmologyParams::default();
        Self {
            h: Some(h),
            omega_m: Some(omega_m),
            omega_k: Some(omega_k),
            omega_r,
            tcmb: Some(tcmb),
            neff: Some(neff),
            w0: Some(w0),
            wa: Some(wa),
        }
    }

    pub(super) fn parse(self) -> Result<CosmologyParams, CosmologyError> {
        let Self {
            h,
            omega_m,
            omega_k,
            omega_r,
            tcmb,
            neff,
            w0,
            wa,
        } = self;
        let d = CosmologyParams::default();
        let params = CosmologyParams {
            h: h.unwrap_or(d.h),
            omega_m: omega_m.unwrap_or(d.omega_m),
            omega_k: omega_k.unwrap_or(d.omega_k),
            omega_r: omega_r.or(d.omega_r),
            tcmb: tcmb.unwrap_or(d.tcmb),
            neff: neff.unwrap_or(d.neff),
            w0: w0.unwrap_or(d.w0),
            wa: wa.unwrap_or(d.wa),
        };
        params.validate()?;

        let mut printer = InfoPrinter::new("Cosmology".into());
        printer.push_block(vec![
            format!("h = {}, Ω_m = {}, Ω_k = {}", params.h, params.omega_m, params.omega_k).into(),
            format!(
                "Ω_r = {:.3e}{}, Ω_Λ = {:.6}",
                params.omega_radiation(),
                if params.omega_r.is_none() {
                    " (derived)"
                } else {
                    ""
                },
                params.omega_lambda()
            )
            .into(),
        ]);
        if params.w0 != -1.0 || params.wa != 0.0 {
            printer.push_line(format!("w0 = {}, wa = {}", params.w0, params.wa).into());
        }
        printer.display();

        Ok(params)
    }
}
