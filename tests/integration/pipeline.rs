// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests of the library, from a halo catalogue to a map.

use approx::assert_relative_eq;
use tempfile::TempDir;

use halopaint::{
    generate_sources, io::write_map, paint, read_halo_catalog, read_halo_catalog_pksc,
    CibParams, CibPlanck2013, Cosmology, CosmologyParams, HealpixRing, SkyMap,
};

use crate::{fits_without_dates, halopaint_cmd, write_halo_catalogue};

#[test]
fn test_pipeline_conserves_flux() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = write_halo_catalogue(tmp_dir.path());

    let cosmology_params = CosmologyParams::default();
    let catalogue = read_halo_catalog_pksc(&halos, &cosmology_params).unwrap();
    assert_eq!(catalogue.num_halos(), 8);

    let cosmology = Cosmology::<f64>::new(&cosmology_params).unwrap();
    let model = CibPlanck2013::new(CibParams {
        nside: 16,
        ..Default::default()
    })
    .unwrap();
    let pixelization = HealpixRing::new(16).unwrap();
    let sources = generate_sources(
        &model,
        &cosmology,
        &pixelization,
        catalogue.positions.view(),
        catalogue.masses.view(),
        9,
    )
    .unwrap();
    assert_eq!(sources.num_centrals(), 8);

    let (mut fluxes_cen, mut fluxes_sat) = sources.flux_buffers().unwrap();
    let mut map = SkyMap::<f64>::new(16).unwrap();
    for nu in [217e9, 353e9, 857e9] {
        map.reset();
        paint(
            &mut map,
            nu,
            &model,
            &sources,
            &mut fluxes_cen,
            &mut fluxes_sat,
        )
        .unwrap();
        let expected: f64 = fluxes_cen.iter().chain(fluxes_sat.iter()).sum();
        assert!(expected > 0.0);
        assert_relative_eq!(map.total(), expected, max_relative = 1e-12);
    }
}

#[test]
fn test_library_and_binary_agree() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = write_halo_catalogue(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            "--freqs", "353",
            "--halos", &format!("{}", halos.display()),
            "--output-dir", &format!("{}", tmp_dir.path().display()),
            "--nside", "8",
            "--seed", "5",
            "--precision", "single",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "paint failed: {}", cmd.err().unwrap());
    let from_binary = fits_without_dates(&tmp_dir.path().join("cib_353.fits"));

    let cosmology_params = CosmologyParams::default();
    let catalogue = read_halo_catalog(&halos, &cosmology_params, None).unwrap();
    let cosmology = Cosmology::<f32>::new(&cosmology_params).unwrap();
    let model = CibPlanck2013::new(CibParams {
        nside: 8,
        ..Default::default()
    })
    .unwrap();
    let pixelization = HealpixRing::new(8).unwrap();
    let sources = generate_sources(
        &model,
        &cosmology,
        &pixelization,
        catalogue.positions.view(),
        catalogue.masses.view(),
        5,
    )
    .unwrap();
    let (mut fluxes_cen, mut fluxes_sat) = sources.flux_buffers().unwrap();
    let mut map = SkyMap::<f32>::new(8).unwrap();
    paint(
        &mut map,
        353e9,
        &model,
        &sources,
        &mut fluxes_cen,
        &mut fluxes_sat,
    )
    .unwrap();

    let from_library = tmp_dir.path().join("library.fits");
    write_map(&from_library, &map).unwrap();
    assert_eq!(fits_without_dates(&from_library), from_binary);
}
