// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::{Array1, Array2};
use rand::{Error, RngCore, SeedableRng};

/// A "random" number generator that only ever produces zeros. Any Poisson
/// draw with it is 0.
#[derive(Debug, Clone, Default)]
pub(crate) struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        dest.fill(0);
        Ok(())
    }
}

impl SeedableRng for ZeroRng {
    type Seed = [u8; 8];

    fn from_seed(_seed: Self::Seed) -> Self {
        ZeroRng
    }
}

/// Halos along the coordinate axes, at comoving distances `distances` \[Mpc\],
/// all with mass `mass`.
pub(crate) fn halos_on_axes(distances: &[f64], mass: f64) -> (Array2<f64>, Array1<f64>) {
    let n = distances.len();
    let mut positions = Array2::zeros((3, n));
    for (i, &d) in distances.iter().enumerate() {
        let axis = i % 3;
        let sign = if (i / 3) % 2 == 0 { 1.0 } else { -1.0 };
        positions[(axis, i)] = sign * d;
    }
    (positions, Array1::from_elem(n, mass))
}

/// Write a Websky "pksc" halo catalogue. `count` is written to the header
/// as-is, so it may disagree with `halos`.
pub(crate) fn write_pksc(file: &Path, count: i32, halos: &[[f32; 10]]) {
    let mut w = BufWriter::new(File::create(file).unwrap());
    w.write_i32::<LittleEndian>(count).unwrap();
    w.write_f32::<LittleEndian>(4.5).unwrap();
    w.write_f32::<LittleEndian>(0.0).unwrap();
    for halo in halos {
        for &v in halo {
            w.write_f32::<LittleEndian>(v).unwrap();
        }
    }
    w.flush().unwrap();
}

/// A pksc row with Lagrangian positions at 90% of the Eulerian ones.
pub(crate) fn pksc_halo(x: f32, y: f32, z: f32, r_th: f32) -> [f32; 10] {
    [x, y, z, 10.0, -20.0, 30.0, r_th, x * 0.9, y * 0.9, z * 0.9]
}

/// The 80-byte cards and data records of a FITS file, without any DATE
/// cards, so files written at different times compare equal.
pub(crate) fn fits_without_dates(file: &Path) -> Vec<u8> {
    std::fs::read(file)
        .unwrap()
        .chunks(80)
        .filter(|card| !card.starts_with(b"DATE"))
        .flatten()
        .copied()
        .collect()
}

/// The value of header keyword `key` in the first HDU that has it.
pub(crate) fn fits_header_value(file: &Path, key: &str) -> Option<String> {
    let bytes = std::fs::read(file).unwrap();
    bytes.chunks(80).find_map(|card| {
        let card = std::str::from_utf8(card).ok()?;
        let (name, rest) = card.split_at(8.min(card.len()));
        if name.trim_end() != key {
            return None;
        }
        let value = rest.strip_prefix("= ")?;
        let value = value.split('/').next()?.trim().trim_matches('\'').trim();
        Some(value.to_string())
    })
}
