//! # Device Views
//!
//! Read-only snapshots of a file memory for presentation: the trace printer
//! and the terminal console both render from a `DeviceView` and never touch
//! the device itself.

use std::fmt;

use crate::components::memory::file_memory::FileMemoryAttributes;
use crate::components::memory::windowed_device::{DeviceState, WindowedDevice, WINDOW_SIZE};
use crate::types::{AddressWidth, TriggerPolarity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceView {
    pub label: String,
    pub filename: String,
    pub trigger: TriggerPolarity,
    pub addr_width: AddressWidth,
    pub address: u64,
    pub window: [Option<u8>; WINDOW_SIZE],
    pub available: bool,
    pub state: DeviceState,
}

impl DeviceView {
    pub fn new(attributes: &FileMemoryAttributes, device: Option<&WindowedDevice>) -> Self {
        Self {
            label: attributes.label.clone(),
            filename: attributes.filename.clone(),
            trigger: attributes.trigger,
            addr_width: attributes.addr_width,
            address: device.map_or(0, WindowedDevice::current_address_value),
            window: device.map_or([None; WINDOW_SIZE], |d| *d.window()),
            available: device.is_some_and(WindowedDevice::is_available),
            state: device.map_or(DeviceState::Unbound, WindowedDevice::state),
        }
    }

    /// Address as `0x` plus one hex digit per started nibble of the address width
    pub fn address_text(&self) -> String {
        self.addr_width.format_address(self.address)
    }

    pub fn output(&self) -> u8 {
        self.window[WINDOW_SIZE / 2].unwrap_or(0)
    }

    /// Unbound devices have not been stepped yet and are not reported as errors
    pub fn has_error(&self) -> bool {
        self.state == DeviceState::Invalid
    }
}

/// Two hex digits, or blanks for a slot outside the source
pub fn format_window_entry(entry: Option<u8>) -> String {
    match entry {
        Some(byte) => format!("{:02X}", byte),
        None => "  ".to_string(),
    }
}

impl fmt::Display for DeviceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.label.is_empty() {
            write!(f, "{} ", self.label)?;
        }
        write!(f, "\u{00BB} {} @ {} [", self.filename, self.address_text())?;
        for (i, entry) in self.window.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if i == WINDOW_SIZE / 2 {
                write!(f, "|{}|", format_window_entry(*entry))?;
            } else {
                write!(f, "{}", format_window_entry(*entry))?;
            }
        }
        write!(f, "]")?;
        if self.has_error() {
            write!(f, " UNAVAILABLE")?;
        }
        Ok(())
    }
}
