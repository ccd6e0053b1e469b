use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::byte_source::Origin;
use super::windowed_device::WindowedDevice;
use crate::component::{BaseComponent, Component, PinError};
use crate::pin::{Pin, PinValue};
use crate::types::{AddressWidth, LocationType, TriggerPolarity};
use crate::view::DeviceView;

pub const CLOCK_PIN: &str = "CLK";
pub const DATA_WIDTH: usize = 8;

/// Placement properties of a file memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMemoryAttributes {
    pub addr_width: AddressWidth,
    pub trigger: TriggerPolarity,
    pub filename: String,
    pub location_type: LocationType,
    pub label: String,
}

impl Default for FileMemoryAttributes {
    fn default() -> Self {
        Self {
            addr_width: AddressWidth::default(),
            trigger: TriggerPolarity::Rising,
            filename: "foobar.bin".to_string(),
            location_type: LocationType::Absolute,
            label: String::new(),
        }
    }
}

/// Value reported to the host's signal logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedValue {
    pub label: Option<String>,
    pub bit_width: usize,
    pub value: u8,
}

/// File Memory - read-only memory backed by an external file
///
/// Pinout:
/// - A0..A{n-1}: address input, width set by `addr_width`
/// - CLK: clock input, the configured edge latches the address
/// - D0..D7: data output, always driven with the byte at the latched address
///
/// The windowed device that does the actual work is created on the first
/// `update()`, so an idle placement never touches the file system.
#[derive(Debug)]
pub struct FileMemory {
    base: BaseComponent,
    attributes: FileMemoryAttributes,
    base_dir: PathBuf,
    device: Option<WindowedDevice>,
}

impl FileMemory {
    pub fn new(name: String, attributes: FileMemoryAttributes, base_dir: impl Into<PathBuf>) -> Self {
        let pins = Self::create_pins(&name, attributes.addr_width);
        FileMemory {
            base: BaseComponent::new(name, pins),
            attributes,
            base_dir: base_dir.into(),
            device: None,
        }
    }

    fn create_pins(name: &str, width: AddressWidth) -> HashMap<String, Arc<Mutex<Pin>>> {
        let mut pin_names: Vec<String> = (0..width.bits()).map(address_pin_name).collect();
        pin_names.push(CLOCK_PIN.to_string());
        pin_names.extend((0..DATA_WIDTH).map(data_pin_name));
        BaseComponent::create_pin_map(&pin_names, name)
    }

    pub fn attributes(&self) -> &FileMemoryAttributes {
        &self.attributes
    }

    /// Apply new attributes. A width change rebuilds the address pins; origin
    /// and trigger changes reach the device on the next update.
    pub fn set_attributes(&mut self, attributes: FileMemoryAttributes) {
        if attributes.addr_width != self.attributes.addr_width {
            let pins = Self::create_pins(self.base.get_name(), attributes.addr_width);
            self.base.replace_pins(pins);
        }
        self.attributes = attributes;

        let origin = self.origin();
        if let Some(device) = self.device.as_mut() {
            device.configure(origin, self.attributes.trigger);
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn origin(&self) -> Origin {
        Origin::resolve(
            &self.attributes.filename,
            self.attributes.location_type,
            &self.base_dir,
        )
    }

    pub fn device(&self) -> Option<&WindowedDevice> {
        self.device.as_ref()
    }

    /// Force a re-open of the current origin on the next update
    pub fn reload(&mut self) {
        if let Some(device) = self.device.as_mut() {
            device.reload();
        }
    }

    pub fn output(&self) -> u8 {
        self.device.as_ref().map_or(0, WindowedDevice::output)
    }

    pub fn log_value(&self) -> LoggedValue {
        let label = &self.attributes.label;
        LoggedValue {
            label: (!label.is_empty()).then(|| label.clone()),
            bit_width: DATA_WIDTH,
            value: self.output(),
        }
    }

    pub fn view(&self) -> DeviceView {
        DeviceView::new(&self.attributes, self.device.as_ref())
    }

    /// Assemble the address from A0..A{n-1}; floating bits read as 0
    fn read_address_bus(&self) -> u64 {
        let width = self.attributes.addr_width;
        let address = (0..width.bits()).fold(0u64, |address, bit| {
            if self.base.read_pin(&address_pin_name(bit)) == PinValue::High {
                address | (1 << bit)
            } else {
                address
            }
        });
        width.mask(address)
    }

    fn drive_data_bus(&self, value: u8) {
        for bit in 0..DATA_WIDTH {
            let level = PinValue::from_bool((value >> bit) & 1 == 1);
            // Every data pin is created with the component
            let _ = self.base.drive_pin(&data_pin_name(bit), level);
        }
    }
}

impl Component for FileMemory {
    fn name(&self) -> String {
        self.base.name()
    }

    fn pins(&self) -> HashMap<String, Arc<Mutex<Pin>>> {
        self.base.pins()
    }

    fn get_pin(&self, name: &str) -> Result<Arc<Mutex<Pin>>, PinError> {
        self.base.get_pin(name)
    }

    fn update(&mut self) {
        let clock = self.base.read_pin(CLOCK_PIN).to_bool();
        let address = self.read_address_bus();

        if self.device.is_none() {
            info!("{}: creating device for {}", self.base.get_name(), self.origin());
            self.device = Some(WindowedDevice::new(self.origin(), self.attributes.trigger));
        }

        let output = match self.device.as_mut() {
            Some(device) => device.step_sampled(clock, address as i64),
            None => 0,
        };
        self.drive_data_bus(output);
    }
}

pub fn address_pin_name(bit: u8) -> String {
    format!("A{}", bit)
}

pub fn data_pin_name(bit: usize) -> String {
    format!("D{}", bit)
}
