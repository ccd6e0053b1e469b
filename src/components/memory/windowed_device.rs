//! # Windowed Device
//!
//! The clocked core of a file memory. Each step it may re-bind to a new
//! origin, watches the clock for the configured edge, latches the address on
//! that edge and refreshes a five-byte window centred on it.
//!
//! Source failures never leave this module: an origin that cannot be opened,
//! or a store that stops answering, degrades the device to "no data" (output
//! 0, every window slot empty) until the next successful re-open.

use log::{debug, info, warn};

use super::byte_source::{ByteSource, Origin};
use crate::types::TriggerPolarity;

/// Bytes shown on each side of the latched address
pub const WINDOW_RADIUS: i64 = 2;
pub const WINDOW_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Never stepped, no origin bound yet
    Unbound,
    /// Bound and the source answers reads
    Valid,
    /// Bound but the source could not be opened or stopped answering
    Invalid,
}

#[derive(Debug)]
pub struct WindowedDevice {
    configured_origin: Origin,
    trigger: TriggerPolarity,
    bound_origin: Option<Origin>,
    reload_requested: bool,
    source: ByteSource,
    current_address: u64,
    window: [Option<u8>; WINDOW_SIZE],
    // `None` while the clock line is unknown
    last_clock_level: Option<bool>,
}

impl WindowedDevice {
    pub fn new(origin: Origin, trigger: TriggerPolarity) -> Self {
        Self {
            source: ByteSource::closed(origin.clone()),
            configured_origin: origin,
            trigger,
            bound_origin: None,
            reload_requested: false,
            current_address: 0,
            window: [None; WINDOW_SIZE],
            last_clock_level: Some(false),
        }
    }

    /// Set the target origin and edge polarity. No I/O happens until the next step.
    pub fn configure(&mut self, origin: Origin, trigger: TriggerPolarity) {
        self.configured_origin = origin;
        self.trigger = trigger;
    }

    /// Re-open the configured origin on the next step even if it is unchanged
    pub fn reload(&mut self) {
        self.reload_requested = true;
    }

    pub fn step(&mut self, clock_level: bool, address_level: i64) -> u8 {
        self.step_sampled(Some(clock_level), address_level)
    }

    /// Step with a clock sample that may be unknown. An unknown level never
    /// fires a trigger and the edge that follows it is not counted either.
    pub fn step_sampled(&mut self, clock_level: Option<bool>, address_level: i64) -> u8 {
        if self.needs_rebind() {
            self.rebind();
        }

        let triggered = match (self.last_clock_level, clock_level) {
            (Some(previous), Some(current)) => self.trigger.is_edge(previous, current),
            _ => false,
        };
        self.last_clock_level = clock_level;

        if triggered {
            self.latch(address_level);
        }

        self.output()
    }

    /// Byte at `offset` from the latched address, `None` outside the source bounds
    pub fn inspect(&self, offset: i64) -> Option<u8> {
        if !(-WINDOW_RADIUS..=WINDOW_RADIUS).contains(&offset) {
            return None;
        }
        self.window[(offset + WINDOW_RADIUS) as usize]
    }

    pub fn window(&self) -> &[Option<u8>; WINDOW_SIZE] {
        &self.window
    }

    pub fn current_address_value(&self) -> u64 {
        self.current_address
    }

    pub fn output(&self) -> u8 {
        self.inspect(0).unwrap_or(0)
    }

    pub fn is_available(&self) -> bool {
        self.source.is_open()
    }

    pub fn state(&self) -> DeviceState {
        match (&self.bound_origin, self.source.is_open()) {
            (None, _) => DeviceState::Unbound,
            (Some(_), true) => DeviceState::Valid,
            (Some(_), false) => DeviceState::Invalid,
        }
    }

    pub fn source_len(&self) -> u64 {
        self.source.len()
    }

    pub fn configured_origin(&self) -> &Origin {
        &self.configured_origin
    }

    pub fn bound_origin(&self) -> Option<&Origin> {
        self.bound_origin.as_ref()
    }

    pub fn trigger(&self) -> TriggerPolarity {
        self.trigger
    }

    fn needs_rebind(&self) -> bool {
        self.reload_requested || self.bound_origin.as_ref() != Some(&self.configured_origin)
    }

    fn rebind(&mut self) {
        // Replacing the source drops the previous handle
        self.source = match ByteSource::open(&self.configured_origin) {
            Ok(source) => source,
            Err(err) => {
                warn!("{}", err);
                ByteSource::closed(self.configured_origin.clone())
            }
        };
        self.bound_origin = Some(self.configured_origin.clone());
        self.reload_requested = false;
        self.current_address = 0;
        self.refresh_window();
        info!(
            "Bound to {} ({:?}, {} bytes)",
            self.configured_origin,
            self.state(),
            self.source.len()
        );
    }

    fn latch(&mut self, address_level: i64) {
        let highest = self.source.len().saturating_sub(1);
        self.current_address = u64::try_from(address_level).unwrap_or(0).min(highest);
        debug!(
            "{} edge: latched 0x{:X} (requested {})",
            self.trigger, self.current_address, address_level
        );
        self.refresh_window();
    }

    fn refresh_window(&mut self) {
        let length = self.source.len();
        let mut window = [None; WINDOW_SIZE];

        for (slot, offset) in window.iter_mut().zip(-WINDOW_RADIUS..=WINDOW_RADIUS) {
            let position = self.current_address as i64 + offset;
            if position < 0 || position as u64 >= length {
                continue;
            }
            match self.source.read_at(position) {
                Ok(byte) => *slot = Some(byte),
                Err(err) => {
                    warn!("Read failed, marking source unavailable: {}", err);
                    self.source.close();
                    self.current_address = 0;
                    self.window = [None; WINDOW_SIZE];
                    return;
                }
            }
        }

        self.window = window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: [u8; 5] = [0x9e, 0xdd, 0x07, 0x09, 0x5e];

    fn device_with(bytes: &[u8]) -> WindowedDevice {
        let mut device = WindowedDevice::new(Origin::parse("builtin:demo"), TriggerPolarity::Rising);
        // Bind first, then swap in the test bytes as the bound source
        device.step(false, 0);
        device.source = ByteSource::from_bytes(Origin::parse("builtin:demo"), bytes.to_vec());
        device.refresh_window();
        device
    }

    fn latch(device: &mut WindowedDevice, address: i64) -> u8 {
        device.step(false, address);
        device.step(true, address)
    }

    #[test]
    fn test_new_device_is_unbound() {
        let device = WindowedDevice::new(Origin::parse("builtin:demo"), TriggerPolarity::Rising);
        assert_eq!(device.state(), DeviceState::Unbound);
        assert_eq!(device.output(), 0);
        assert!(device.window().iter().all(Option::is_none));
    }

    #[test]
    fn test_first_step_binds_and_fills_window() {
        let mut device = WindowedDevice::new(Origin::parse("builtin:demo"), TriggerPolarity::Rising);
        let output = device.step(false, 10);
        assert_eq!(device.state(), DeviceState::Valid);
        assert_eq!(device.current_address_value(), 0);
        assert_eq!(output, 0x9e);
        assert_eq!(device.inspect(-1), None);
        assert_eq!(device.inspect(1), Some(0xdd));
    }

    #[test]
    fn test_scenario_window() {
        let mut device = device_with(&SCENARIO);

        assert_eq!(latch(&mut device, 2), 0x07);
        assert_eq!(device.inspect(-2), Some(0x9e));
        assert_eq!(device.inspect(-1), Some(0xdd));
        assert_eq!(device.inspect(0), Some(0x07));
        assert_eq!(device.inspect(1), Some(0x09));
        assert_eq!(device.inspect(2), Some(0x5e));

        assert_eq!(latch(&mut device, 4), 0x5e);
        assert_eq!(device.inspect(1), None);
        assert_eq!(device.inspect(2), None);
        assert_eq!(device.inspect(-2), Some(0x07));
    }

    #[test]
    fn test_inspect_outside_window() {
        let device = device_with(&SCENARIO);
        assert_eq!(device.inspect(3), None);
        assert_eq!(device.inspect(-3), None);
    }

    #[test]
    fn test_address_clamping() {
        let mut device = device_with(&SCENARIO);
        latch(&mut device, 100);
        assert_eq!(device.current_address_value(), 4);
        latch(&mut device, -7);
        assert_eq!(device.current_address_value(), 0);
    }

    #[test]
    fn test_rising_edge_sequence() {
        let mut device = device_with(&SCENARIO);
        let levels = [false, false, true, true, false, true];
        let addresses = [1, 1, 2, 3, 3, 4];
        let mut latched = Vec::new();
        for (level, address) in levels.iter().zip(addresses) {
            device.step(*level, address);
            latched.push(device.current_address_value());
        }
        assert_eq!(latched, vec![0, 0, 2, 2, 2, 4]);
    }

    #[test]
    fn test_falling_edge() {
        let mut device = device_with(&SCENARIO);
        device.configure(Origin::parse("builtin:demo"), TriggerPolarity::Falling);
        device.step(true, 3);
        assert_eq!(device.current_address_value(), 0);
        device.step(false, 3);
        assert_eq!(device.current_address_value(), 3);
    }

    #[test]
    fn test_unknown_clock_never_triggers() {
        let mut device = device_with(&SCENARIO);
        device.step_sampled(Some(false), 1);
        device.step_sampled(None, 1);
        device.step_sampled(Some(true), 1);
        assert_eq!(device.current_address_value(), 0);
        device.step_sampled(Some(false), 3);
        device.step_sampled(Some(true), 3);
        assert_eq!(device.current_address_value(), 3);
    }

    #[test]
    fn test_unavailable_origin() {
        let mut device = WindowedDevice::new(Origin::parse("builtin:missing"), TriggerPolarity::Rising);
        assert_eq!(device.step(false, 0), 0);
        assert_eq!(device.step(true, 3), 0);
        assert_eq!(device.state(), DeviceState::Invalid);
        assert!(!device.is_available());
        assert_eq!(device.current_address_value(), 0);
        for offset in -2..=2 {
            assert_eq!(device.inspect(offset), None);
        }
        assert_eq!(device.bound_origin(), Some(&Origin::parse("builtin:missing")));
    }

    #[test]
    fn test_reconfigure_resets_address() {
        let mut device = WindowedDevice::new(Origin::parse("builtin:missing"), TriggerPolarity::Rising);
        device.step(false, 0);
        device.step(true, 0);
        assert_eq!(device.state(), DeviceState::Invalid);

        device.configure(Origin::parse("builtin:demo"), TriggerPolarity::Rising);
        // Clock held high: no edge, the re-bind still happens
        device.step(true, 9);
        assert_eq!(device.state(), DeviceState::Valid);
        let output = device.step(true, 9);
        assert_eq!(device.current_address_value(), 0);
        assert_eq!(output, 0x9e);
    }

    #[test]
    fn test_reload_reopens_same_origin() {
        let mut device = device_with(&SCENARIO);
        latch(&mut device, 3);
        assert_eq!(device.output(), 0x09);

        device.reload();
        let output = device.step(true, 3);
        // Re-opened from the built-in image, address reset
        assert_eq!(device.current_address_value(), 0);
        assert_eq!(output, 0x9e);
        assert_eq!(device.source_len(), 256);
    }
}
