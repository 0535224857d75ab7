// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sky pixelizations. Source generation only needs a bijection between
//! directions and pixel indices; [`HealpixRing`] provides the HEALPix RING
//! scheme (Górski et al. 2005) on top of `scorus`.

mod error;

pub use error::HealpixError;

use scorus::{
    coordinates::SphCoord,
    healpix::{
        pix::{ang2pix_ring, pix2ang_ring},
        utils::nside2npix,
    },
};

/// The largest supported HEALPix resolution parameter.
pub const MAX_NSIDE: u32 = 1 << 29;

/// A partition of the sphere into pixels.
pub trait Pixelization: Send + Sync {
    /// The total number of pixels.
    fn num_pixels(&self) -> u64;

    /// The pixel containing `direction`. The direction need not be
    /// normalised; a zero vector is treated as pointing along +z.
    fn pixel_of(&self, direction: [f64; 3]) -> u64;

    /// The unit vector to the centre of `pixel`, or `None` if the pixel index
    /// is out of range.
    fn direction_of(&self, pixel: u64) -> Option<[f64; 3]>;
}

/// HEALPix in RING ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealpixRing {
    nside: u32,
}

impl HealpixRing {
    pub fn new(nside: u32) -> Result<HealpixRing, HealpixError> {
        if nside == 0 || nside > MAX_NSIDE {
            return Err(HealpixError::BadNside(nside));
        }
        Ok(HealpixRing { nside })
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    /// Number of pixels in a map with resolution `nside`.
    pub fn num_pixels_for(nside: u32) -> u64 {
        nside2npix(nside as usize) as u64
    }
}

impl Pixelization for HealpixRing {
    fn num_pixels(&self) -> u64 {
        Self::num_pixels_for(self.nside)
    }

    fn pixel_of(&self, direction: [f64; 3]) -> u64 {
        let [x, y, z] = direction;
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return 0;
        }
        // Colatitude and longitude. atan2 of the unnormalised components keeps
        // precision near the poles.
        let pol = x.hypot(y).atan2(z);
        let az = y.atan2(x);
        ang2pix_ring::<f64>(self.nside as usize, &SphCoord::new(pol, az)) as u64
    }

    fn direction_of(&self, pixel: u64) -> Option<[f64; 3]> {
        if pixel >= self.num_pixels() {
            return None;
        }
        let centre = pix2ang_ring::<f64>(self.nside as usize, pixel as usize);
        let (sin_pol, cos_pol) = centre.pol.sin_cos();
        let (sin_az, cos_az) = centre.az.sin_cos();
        Some([sin_pol * cos_az, sin_pol * sin_az, cos_pol])
    }
}
