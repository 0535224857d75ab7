// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests of the `paint` and `print-defaults` subcommands.

use tempfile::TempDir;

use crate::{fits_without_dates, get_cmd_output, halopaint_cmd, write_halo_catalogue};

#[test]
fn test_paint_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = write_halo_catalogue(tmp_dir.path());
    let maps = tmp_dir.path().join("maps");

    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            "--freqs", "353", "545",
            "--halos", &format!("{}", halos.display()),
            "--output-dir", &format!("{}", maps.display()),
            "--nside", "8",
            "--no-progress-bars",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "paint failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("halopaint paint complete."), "{stdout}");

    for freq in ["353", "545"] {
        let bytes = std::fs::read(maps.join(format!("cib_{freq}.fits"))).unwrap();
        assert!(bytes.starts_with(b"SIMPLE"));
        assert_eq!(bytes.len() % 2880, 0);
    }
}

#[test]
fn test_paint_dry_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = write_halo_catalogue(tmp_dir.path());
    let maps = tmp_dir.path().join("maps");

    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            "--freqs", "857",
            "--halos", &format!("{}", halos.display()),
            "--output-dir", &format!("{}", maps.display()),
            "--nside", "8",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "paint --dry-run failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"), "{stdout}");
    assert!(!maps.exists());
}

#[test]
fn test_saved_arguments_reproduce_maps() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = write_halo_catalogue(tmp_dir.path());
    let args_file = tmp_dir.path().join("args.toml");

    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            "--freqs", "545",
            "--halos", &format!("{}", halos.display()),
            "--output-dir", &format!("{}", tmp_dir.path().join("first").display()),
            "--nside", "8",
            "--seed", "11",
            "--precision", "double",
            "--no-progress-bars",
            "--save-toml", &format!("{}", args_file.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "paint failed: {}", cmd.err().unwrap());
    assert!(args_file.exists());

    // Everything comes from the arguments file except the output directory.
    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            &format!("{}", args_file.display()),
            "--output-dir", &format!("{}", tmp_dir.path().join("second").display()),
            "--no-progress-bars",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "paint with an arguments file failed: {}",
        cmd.err().unwrap()
    );

    let first = fits_without_dates(&tmp_dir.path().join("first").join("cib_545.fits"));
    let second = fits_without_dates(&tmp_dir.path().join("second").join("cib_545.fits"));
    assert_eq!(first, second);
}

#[test]
fn test_paint_without_freqs_fails() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = write_halo_catalogue(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            "--halos", &format!("{}", halos.display()),
            "--output-dir", &format!("{}", tmp_dir.path().display()),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No observing frequencies"), "{stderr}");
}

#[test]
fn test_print_defaults() {
    let cmd = halopaint_cmd().arg("print-defaults").ok();
    assert!(cmd.is_ok(), "print-defaults failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");

    let defaults: toml::Value = toml::from_str(&stdout).unwrap();
    assert_eq!(defaults["model"]["nside"].as_integer(), Some(4096));
    assert_eq!(defaults["cosmology"]["omega_m"].as_float(), Some(0.29));
    assert_eq!(defaults["paint"]["map_format"].as_str(), Some("fits"));
    assert_eq!(defaults["paint"]["source_model"].as_str(), Some("cib"));
    assert_eq!(defaults["radio"]["nu_ref"].as_float(), Some(151e6));
    assert_eq!(defaults["radio"]["fr1"]["lb"].as_float(), Some(1e24));
}

#[test]
fn test_paint_radio() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = write_halo_catalogue(tmp_dir.path());
    let maps = tmp_dir.path().join("maps");

    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            "--source-model", "radio",
            "--freqs", "30", "150",
            "--halos", &format!("{}", halos.display()),
            "--output-dir", &format!("{}", maps.display()),
            "--nside", "8",
            "--min-mass", "1e12",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "radio paint failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Model: radio"), "{stdout}");
    assert!(maps.join("radio_30.fits").exists());
    assert!(maps.join("radio_150.fits").exists());
}

#[test]
fn test_unsupported_halo_file_fails() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let halos = tmp_dir.path().join("halos.csv");
    std::fs::write(&halos, "1,2,3,1e13\n").unwrap();

    #[rustfmt::skip]
    let cmd = halopaint_cmd()
        .args([
            "paint",
            "--freqs", "545",
            "--halos", &format!("{}", halos.display()),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("unsupported extension 'csv'"), "{stderr}");
}
