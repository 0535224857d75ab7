// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Source models: which halos light up, how brightly, and what their light
//! looks like.
//!
//! Source generation and painting work with any [`HaloModel`]. Two families
//! are provided:
//!
//! * the Planck 2013 CIB model ([`CibPlanck2013`]);
//! * the radio model of Li et al. (2021), after Sehgal et al. (2009)
//!   ([`RadioSehgal2009`]). Its FR I and FR II populations
//!   ([`RadioPopulation`]) are each a [`HaloModel`].
//!
//! CIB variants implement [`SourceModel`]. Every capability has a default that
//! defers to the base CIB model, so a variant only needs to hold a base model
//! and override what differs. For example, a model without luminosity
//! evolution:
//!
//! ```
//! use halopaint::{CibParams, CibPlanck2013, SourceModel};
//!
//! struct NoEvolution(CibPlanck2013<f64>);
//!
//! impl SourceModel<f64> for NoEvolution {
//!     fn base(&self) -> &CibPlanck2013<f64> {
//!         &self.0
//!     }
//!
//!     fn redshift_evolution(&self, _z: f64) -> f64 {
//!         0.0
//!     }
//! }
//!
//! let model = NoEvolution(CibPlanck2013::new(CibParams::default()).unwrap());
//! assert_eq!(model.central_luminosity(1e13, 1.0), 0.0);
//! ```

mod cib;
mod error;
mod params;
mod radio;
#[cfg(test)]
mod tests;

pub use cib::CibPlanck2013;
pub use error::{FluxError, ModelError, OccupationError};
pub use params::{CibParams, PopulationParams, RadioParams};
pub use radio::{FanaroffRiley, RadioPopulation, RadioSehgal2009};

use rand::Rng;

use crate::{math::Real, shmf::SubhaloMassFunction};

/// The halos a model populates: those with `min_mass` or more at redshifts
/// within `[min_redshift, max_redshift]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloCuts<T> {
    pub min_redshift: T,
    pub max_redshift: T,
    /// \[M☉\]
    pub min_mass: T,
}

/// What the source generator and the painter need from a model. Every
/// accepted halo gets one central record (possibly dark) and any number of
/// satellites.
///
/// All CIB models ([`SourceModel`] implementors) get this trait for free.
pub trait HaloModel<T: Real>: Send + Sync {
    /// Sampling state built once per catalogue and shared by all threads.
    type Tables: Send + Sync;

    fn halo_cuts(&self) -> HaloCuts<T>;

    /// Build the sampling state for a catalogue whose heaviest accepted halo
    /// has mass `max_host_mass` \[M☉\].
    fn tables(&self, max_host_mass: T) -> Result<Self::Tables, OccupationError>;

    /// The luminosity of the central source of a halo with mass `mass` \[M☉\]
    /// at redshift `z`. A halo without a lit central gets zero.
    fn central_source<R: Rng + ?Sized>(
        &self,
        tables: &Self::Tables,
        rng: &mut R,
        mass: T,
        z: T,
    ) -> Result<T, OccupationError>;

    /// Append the luminosities of the satellites of a halo with mass `mass`
    /// \[M☉\] at redshift `z` to `luminosities`.
    fn satellite_sources<R: Rng + ?Sized>(
        &self,
        tables: &Self::Tables,
        rng: &mut R,
        mass: T,
        z: T,
        luminosities: &mut Vec<T>,
    ) -> Result<(), OccupationError>;

    /// The observed flux of a source with luminosity `luminosity` at redshift
    /// `z`, observed at `nu_obs` \[Hz\]. `transverse_distance` is the
    /// transverse comoving distance to the source \[Mpc\].
    fn flux(&self, luminosity: T, z: T, nu_obs: T, transverse_distance: T)
        -> Result<T, FluxError>;
}

/// The behaviour of a CIB halo model. Implementors must be shareable across
/// threads, as sources are generated and painted in parallel.
pub trait SourceModel<T: Real>: Send + Sync {
    /// The model supplying parameters and default behaviour.
    fn base(&self) -> &CibPlanck2013<T>;

    fn params(&self) -> &CibParams<T> {
        self.base().params()
    }

    /// The redshift evolution of the luminosity-mass relation.
    fn redshift_evolution(&self, z: T) -> T {
        self.base().shang_z_evo(z)
    }

    /// The luminosity of the central source of a halo with mass `mass` \[M☉\]
    /// at redshift `z`.
    fn central_luminosity(&self, mass: T, z: T) -> T {
        if mass < self.params().shang_mmin {
            return T::zero();
        }
        self.redshift_evolution(z) * self.base().sigma_mass(mass)
    }

    /// The luminosity of a satellite source in a subhalo with mass `mass`
    /// \[M☉\] at redshift `z`.
    fn satellite_luminosity(&self, mass: T, z: T) -> T {
        if mass < self.params().shang_mmin {
            return T::zero();
        }
        self.redshift_evolution(z) * self.base().sigma_mass(mass)
    }

    /// The rest-frame spectral shape at rest-frame frequency `nu_rest` \[Hz\].
    fn spectral_shape(&self, nu_rest: T, z: T) -> T {
        self.base().theta(nu_rest, z)
    }
}

impl<T: Real, M: SourceModel<T> + ?Sized> HaloModel<T> for M {
    type Tables = SubhaloMassFunction;

    fn halo_cuts(&self) -> HaloCuts<T> {
        let params = self.params();
        HaloCuts {
            min_redshift: params.min_redshift,
            max_redshift: params.max_redshift,
            min_mass: params.min_mass,
        }
    }

    fn tables(&self, max_host_mass: T) -> Result<SubhaloMassFunction, OccupationError> {
        Ok(SubhaloMassFunction::new(self.params(), max_host_mass)?)
    }

    fn central_source<R: Rng + ?Sized>(
        &self,
        _tables: &SubhaloMassFunction,
        _rng: &mut R,
        mass: T,
        z: T,
    ) -> Result<T, OccupationError> {
        Ok(self.central_luminosity(mass, z))
    }

    fn satellite_sources<R: Rng + ?Sized>(
        &self,
        tables: &SubhaloMassFunction,
        rng: &mut R,
        mass: T,
        z: T,
        luminosities: &mut Vec<T>,
    ) -> Result<(), OccupationError> {
        // Subhalo masses are drawn into the output, then replaced by their
        // luminosities.
        let start = luminosities.len();
        tables.sample(rng, mass, luminosities)?;
        for l in &mut luminosities[start..] {
            *l = self.satellite_luminosity(*l, z);
        }
        Ok(())
    }

    fn flux(
        &self,
        luminosity: T,
        z: T,
        nu_obs: T,
        transverse_distance: T,
    ) -> Result<T, FluxError> {
        check_flux_inputs(luminosity, z, nu_obs, transverse_distance)?;

        let one_plus_z = T::one() + z;
        let shape = self.spectral_shape(nu_obs * one_plus_z, z);
        let dimming =
            T::cast(4.0) * T::PI() * transverse_distance * transverse_distance * one_plus_z;
        finite_flux(self.params().inu_norm * luminosity * shape / dimming)
    }
}

/// Reject the flux inputs no model can handle.
pub(crate) fn check_flux_inputs<T: Real>(
    luminosity: T,
    z: T,
    nu_obs: T,
    transverse_distance: T,
) -> Result<(), FluxError> {
    let zero = T::zero();
    if !(luminosity.is_finite() && luminosity >= zero) {
        return Err(FluxError::BadLuminosity(luminosity.as_f64()));
    }
    if !(z.is_finite() && z >= zero) {
        return Err(FluxError::BadRedshift(z.as_f64()));
    }
    if !(nu_obs.is_finite() && nu_obs > zero) {
        return Err(FluxError::BadFrequency(nu_obs.as_f64()));
    }
    if !(transverse_distance.is_finite() && transverse_distance > zero) {
        return Err(FluxError::BadDistance(transverse_distance.as_f64()));
    }
    Ok(())
}

pub(crate) fn finite_flux<T: Real>(flux: T) -> Result<T, FluxError> {
    if flux.is_finite() {
        Ok(flux)
    } else {
        Err(FluxError::NotFinite(flux.as_f64()))
    }
}
