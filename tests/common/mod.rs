//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use file_rom::{Origin, TriggerPolarity, WindowedDevice};
use tempfile::TempDir;

/// First bytes of the built-in demo image
pub const SCENARIO: [u8; 5] = [0x9e, 0xdd, 0x07, 0x09, 0x5e];

/// Temporary directory holding one data file
pub struct DataFile {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl DataFile {
    pub fn new(name: &str, bytes: &[u8]) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        DataFile { dir, path }
    }

    pub fn dir_path(&self) -> &Path {
        self.dir.path()
    }

    pub fn origin(&self) -> Origin {
        Origin::Path(self.path.clone())
    }

    pub fn rewrite(&self, bytes: &[u8]) {
        fs::write(&self.path, bytes).unwrap();
    }
}

pub fn counting_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

pub fn rising_device(origin: Origin) -> WindowedDevice {
    WindowedDevice::new(origin, TriggerPolarity::Rising)
}

/// Present `address` on a full low-high clock cycle
pub fn pulse(device: &mut WindowedDevice, address: i64) -> u8 {
    device.step(false, address);
    device.step(true, address)
}
