// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod paint;
mod pipeline;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use byteorder::{LittleEndian, WriteBytesExt};

fn halopaint_cmd() -> Command {
    Command::cargo_bin("halopaint").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a small Websky "pksc" halo catalogue into `dir`. Halos sit between
/// 800 and 3000 Mpc from the observer, and are all heavier than 10^12 M☉.
fn write_halo_catalogue(dir: &Path) -> PathBuf {
    // (x, y, z, Lagrangian radius)
    let halos: [[f32; 4]; 8] = [
        [1500.0, 0.0, 0.0, 4.0],
        [0.0, -2000.0, 10.0, 3.0],
        [5.0, 20.0, 2500.0, 5.0],
        [-900.0, 900.0, -900.0, 3.5],
        [800.0, 30.0, -40.0, 2.5],
        [-3000.0, -10.0, 100.0, 6.0],
        [1200.0, 1200.0, 0.0, 3.0],
        [0.0, 700.0, -1900.0, 4.5],
    ];

    let file = dir.join("halos.pksc");
    let mut w = BufWriter::new(File::create(&file).unwrap());
    w.write_i32::<LittleEndian>(halos.len() as i32).unwrap();
    w.write_f32::<LittleEndian>(6.0).unwrap();
    w.write_f32::<LittleEndian>(0.0).unwrap();
    for [x, y, z, r] in halos {
        for v in [x, y, z, 0.0, 0.0, 0.0, r, x, y, z] {
            w.write_f32::<LittleEndian>(v).unwrap();
        }
    }
    w.flush().unwrap();
    file
}

/// The bytes of a FITS file without any DATE cards, so files written at
/// different times compare equal.
fn fits_without_dates(file: &Path) -> Vec<u8> {
    std::fs::read(file)
        .unwrap()
        .chunks(80)
        .filter(|card| !card.starts_with(b"DATE"))
        .flatten()
        .copied()
        .collect()
}
