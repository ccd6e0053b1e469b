//! Windowed device behaviour against real files on disk

mod common;

use common::*;
use file_rom::{DeviceState, Origin};
use std::fs::OpenOptions;

#[cfg(test)]
mod device_file_tests {
    use super::*;

    #[test]
    fn test_scenario_file() {
        let data = DataFile::new("scenario.bin", &SCENARIO);
        let mut device = rising_device(data.origin());

        assert_eq!(pulse(&mut device, 2), 0x07);
        assert_eq!(device.state(), DeviceState::Valid);
        assert_eq!(device.source_len(), 5);
        let window: Vec<Option<u8>> = (-2..=2).map(|offset| device.inspect(offset)).collect();
        assert_eq!(window, SCENARIO.iter().copied().map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn test_window_at_file_edges() {
        let data = DataFile::new("edges.bin", &SCENARIO);
        let mut device = rising_device(data.origin());

        pulse(&mut device, 0);
        assert_eq!(device.inspect(-2), None);
        assert_eq!(device.inspect(-1), None);
        assert_eq!(device.inspect(0), Some(0x9e));

        pulse(&mut device, 4);
        assert_eq!(device.inspect(0), Some(0x5e));
        assert_eq!(device.inspect(1), None);
        assert_eq!(device.inspect(2), None);
    }

    #[test]
    fn test_address_clamped_to_file() {
        let data = DataFile::new("clamp.bin", &SCENARIO);
        let mut device = rising_device(data.origin());

        assert_eq!(pulse(&mut device, 1000), 0x5e);
        assert_eq!(device.current_address_value(), 4);
        assert_eq!(pulse(&mut device, -7), 0x9e);
        assert_eq!(device.current_address_value(), 0);
    }

    #[test]
    fn test_empty_file() {
        let data = DataFile::new("empty.bin", &[]);
        let mut device = rising_device(data.origin());

        assert_eq!(pulse(&mut device, 3), 0);
        assert_eq!(device.state(), DeviceState::Valid);
        assert_eq!(device.current_address_value(), 0);
        assert!(device.window().iter().all(Option::is_none));
    }

    #[test]
    fn test_missing_file_is_not_retried() {
        let data = DataFile::new("present.bin", &SCENARIO);
        let missing = data.dir_path().join("later.bin");
        let mut device = rising_device(Origin::Path(missing.clone()));

        assert_eq!(pulse(&mut device, 2), 0);
        assert_eq!(device.state(), DeviceState::Invalid);

        std::fs::write(&missing, SCENARIO).unwrap();
        pulse(&mut device, 2);
        assert_eq!(device.state(), DeviceState::Invalid);

        device.reload();
        device.step(false, 2);
        assert_eq!(device.state(), DeviceState::Valid);
        assert_eq!(pulse(&mut device, 2), 0x07);
    }

    #[test]
    fn test_directory_is_unavailable() {
        let data = DataFile::new("unused.bin", &SCENARIO);
        let mut device = rising_device(Origin::Path(data.dir_path().to_path_buf()));
        device.step(false, 0);
        assert_eq!(device.state(), DeviceState::Invalid);
        assert_eq!(device.output(), 0);
    }

    #[test]
    fn test_truncated_file_degrades() {
        let data = DataFile::new("shrinking.bin", &counting_bytes(256));
        let mut device = rising_device(data.origin());
        assert_eq!(pulse(&mut device, 100), 100);

        OpenOptions::new()
            .write(true)
            .open(&data.path)
            .unwrap()
            .set_len(2)
            .unwrap();

        assert_eq!(pulse(&mut device, 120), 0);
        assert_eq!(device.state(), DeviceState::Invalid);
        assert_eq!(device.current_address_value(), 0);
        assert!(device.window().iter().all(Option::is_none));

        data.rewrite(&counting_bytes(256));
        device.reload();
        assert_eq!(pulse(&mut device, 120), 120);
        assert_eq!(device.state(), DeviceState::Valid);
    }

    #[test]
    fn test_origin_change_switches_file() {
        let first = DataFile::new("first.bin", &SCENARIO);
        let second = DataFile::new("second.bin", &[0x11, 0x22, 0x33]);
        let mut device = rising_device(first.origin());
        assert_eq!(pulse(&mut device, 3), 0x09);

        device.configure(second.origin(), device.trigger());
        // Clock stays high, so only the re-bind happens
        assert_eq!(device.step(true, 3), 0x11);
        assert_eq!(device.current_address_value(), 0);
        assert_eq!(device.bound_origin(), Some(&second.origin()));
        assert_eq!(pulse(&mut device, 1), 0x22);
    }

    #[test]
    fn test_file_contents_read_on_refresh() {
        let data = DataFile::new("live.bin", &SCENARIO);
        let mut device = rising_device(data.origin());
        pulse(&mut device, 1);

        // Same length, new contents: the next latch reads the new bytes
        data.rewrite(&[0xa0, 0xa1, 0xa2, 0xa3, 0xa4]);
        assert_eq!(pulse(&mut device, 1), 0xa1);
    }
}
