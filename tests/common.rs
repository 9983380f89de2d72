#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("drivershift")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_drivershift.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh photo directory for one test
pub fn setup_photo_dir(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_drivershift_photos", name));
    fs::remove_dir_all(&path).ok();
    path.to_string_lossy().to_string()
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// A small fake JPEG on disk, usable as any odometer photo
pub fn sample_photo(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_odometer.jpg", name));
    fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, b'j', b'p', b'g']).expect("write photo");
    path.to_string_lossy().to_string()
}

/// Test fixture: database, photo directory and sample photo for one test
pub struct Env {
    pub db: String,
    pub photos: String,
    pub photo: String,
}

impl Env {
    pub fn new(name: &str) -> Self {
        let env = Self {
            db: setup_test_db(name),
            photos: setup_photo_dir(name),
            photo: sample_photo(name),
        };
        rti()
            .args(["--db", &env.db, "--photos", &env.photos, "--test", "init"])
            .assert()
            .success();
        env
    }

    /// Command preloaded with this environment and a pinned clock
    pub fn cmd(&self, now: &str) -> Command {
        let mut cmd = rti();
        cmd.args(["--db", &self.db, "--photos", &self.photos, "--now", now]);
        cmd
    }

    /// Run a successful command and parse its JSON answer
    pub fn json(&self, now: &str, args: &[&str]) -> Value {
        let out = self.cmd(now).args(args).assert().success();
        serde_json::from_slice(&out.get_output().stdout).expect("json answer")
    }

    pub fn start(&self, driver: &str, at: &str) -> String {
        let v = self.json(
            at,
            &[
                "start",
                "--driver-id",
                driver,
                "--driver-name",
                &format!("Driver {driver}"),
                "--helper-company",
                "Acme",
                "--vehicle",
                "DXB-100",
                "--odometer",
                "1000",
                "--photo",
                &self.photo,
                "--drops",
                "40",
                "--at",
                at,
            ],
        );
        v["rowId"].as_str().expect("rowId").to_string()
    }
}
