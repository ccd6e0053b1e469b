//! # Circuit Host
//!
//! The simulation host for file memories. A `Circuit` owns every placement
//! exclusively, keyed by `PlacementId`, together with a tick clock and an
//! address stimulus per placement. Each `tick()` advances the clock, drives
//! the clock and address pins of every placement and collects the bytes the
//! placements drive back.
//!
//! Removing a placement drops its component, which drops its device and
//! with it any open file handle.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::component::{drive_pin, Component, PinError};
use crate::components::clock::tick_clock::TickClock;
use crate::components::memory::file_memory::{
    address_pin_name, FileMemory, FileMemoryAttributes, LoggedValue, CLOCK_PIN,
};
use crate::pin::PinValue;
use crate::view::DeviceView;

const HOST_DRIVER: &str = "HOST";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(String);

impl PlacementId {
    pub fn new(id: impl Into<String>) -> Self {
        PlacementId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlacementId {
    fn from(id: &str) -> Self {
        PlacementId::new(id)
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("unknown placement '{0}'")]
    UnknownPlacement(PlacementId),
    #[error("placement '{0}' already exists")]
    DuplicatePlacement(PlacementId),
    #[error(transparent)]
    Pin(#[from] PinError),
}

/// Address presented to a placement, as a function of the number of rising
/// clock edges seen before the current tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressStimulus {
    Fixed(u64),
    Counter {
        #[serde(default)]
        start: u64,
        #[serde(default = "default_counter_step")]
        step: u64,
    },
    /// Cycles through the listed addresses
    Script(Vec<u64>),
}

fn default_counter_step() -> u64 {
    1
}

impl Default for AddressStimulus {
    fn default() -> Self {
        AddressStimulus::Fixed(0)
    }
}

impl AddressStimulus {
    pub fn value_at(&self, rising_edges: u64) -> u64 {
        match self {
            AddressStimulus::Fixed(address) => *address,
            AddressStimulus::Counter { start, step } => {
                start.wrapping_add(step.wrapping_mul(rising_edges))
            }
            AddressStimulus::Script(addresses) if addresses.is_empty() => 0,
            AddressStimulus::Script(addresses) => {
                addresses[(rising_edges % addresses.len() as u64) as usize]
            }
        }
    }
}

#[derive(Debug)]
struct Placement {
    memory: FileMemory,
    stimulus: AddressStimulus,
}

/// Result of one simulation tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickRecord {
    pub tick: u64,
    pub clock: PinValue,
    pub outputs: Vec<(PlacementId, u8)>,
}

#[derive(Debug)]
pub struct Circuit {
    name: String,
    description: String,
    base_dir: PathBuf,
    clock: TickClock,
    placements: BTreeMap<PlacementId, Placement>,
    tick_count: u64,
    rising_edges: u64,
}

impl Circuit {
    pub fn new(name: impl Into<String>, base_dir: impl Into<PathBuf>, clock: TickClock) -> Self {
        Circuit {
            name: name.into(),
            description: String::new(),
            base_dir: base_dir.into(),
            clock,
            placements: BTreeMap::new(),
            tick_count: 0,
            rising_edges: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn rising_edges(&self) -> u64 {
        self.rising_edges
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut TickClock {
        &mut self.clock
    }

    pub fn placement_ids(&self) -> Vec<PlacementId> {
        self.placements.keys().cloned().collect()
    }

    pub fn add_placement(
        &mut self,
        id: PlacementId,
        attributes: FileMemoryAttributes,
        stimulus: AddressStimulus,
    ) -> Result<(), CircuitError> {
        if self.placements.contains_key(&id) {
            return Err(CircuitError::DuplicatePlacement(id));
        }

        info!("Placing file memory '{}' for {}", id, attributes.filename);
        let memory = FileMemory::new(id.to_string(), attributes, self.base_dir.clone());
        self.placements.insert(id, Placement { memory, stimulus });
        Ok(())
    }

    pub fn remove_placement(&mut self, id: &PlacementId) -> Result<(), CircuitError> {
        self.placements
            .remove(id)
            .map(|_| info!("Removed file memory '{}'", id))
            .ok_or_else(|| CircuitError::UnknownPlacement(id.clone()))
    }

    pub fn set_attributes(
        &mut self,
        id: &PlacementId,
        attributes: FileMemoryAttributes,
    ) -> Result<(), CircuitError> {
        self.placement_mut(id)?.memory.set_attributes(attributes);
        Ok(())
    }

    pub fn set_stimulus(
        &mut self,
        id: &PlacementId,
        stimulus: AddressStimulus,
    ) -> Result<(), CircuitError> {
        self.placement_mut(id)?.stimulus = stimulus;
        Ok(())
    }

    pub fn reload(&mut self, id: &PlacementId) -> Result<(), CircuitError> {
        self.placement_mut(id)?.memory.reload();
        Ok(())
    }

    pub fn reload_all(&mut self) {
        for placement in self.placements.values_mut() {
            placement.memory.reload();
        }
    }

    pub fn memory(&self, id: &PlacementId) -> Result<&FileMemory, CircuitError> {
        self.placements
            .get(id)
            .map(|placement| &placement.memory)
            .ok_or_else(|| CircuitError::UnknownPlacement(id.clone()))
    }

    pub fn view(&self, id: &PlacementId) -> Result<DeviceView, CircuitError> {
        self.memory(id).map(FileMemory::view)
    }

    pub fn views(&self) -> Vec<(PlacementId, DeviceView)> {
        self.placements
            .iter()
            .map(|(id, placement)| (id.clone(), placement.memory.view()))
            .collect()
    }

    pub fn log_values(&self) -> Vec<(PlacementId, LoggedValue)> {
        self.placements
            .iter()
            .map(|(id, placement)| (id.clone(), placement.memory.log_value()))
            .collect()
    }

    /// Run one simulation step
    pub fn tick(&mut self) -> Result<TickRecord, CircuitError> {
        let previous = self.clock.level();
        self.clock.update();
        let level = self.clock.level();

        let mut outputs = Vec::with_capacity(self.placements.len());
        for (id, placement) in self.placements.iter_mut() {
            let address = placement.stimulus.value_at(self.rising_edges);
            Self::drive_inputs(&placement.memory, level, address)?;
            placement.memory.update();
            outputs.push((id.clone(), placement.memory.output()));
        }

        if previous == PinValue::Low && level == PinValue::High {
            self.rising_edges += 1;
        }
        self.tick_count += 1;
        debug!("Tick {}: CLK={} outputs={:?}", self.tick_count, level, outputs);

        Ok(TickRecord {
            tick: self.tick_count,
            clock: level,
            outputs,
        })
    }

    fn drive_inputs(memory: &FileMemory, clock: PinValue, address: u64) -> Result<(), PinError> {
        drive_pin(&memory.get_pin(CLOCK_PIN)?, HOST_DRIVER, clock)?;

        let width = memory.attributes().addr_width;
        let address = width.mask(address);
        for bit in 0..width.bits() {
            let level = PinValue::from_bool((address >> bit) & 1 == 1);
            drive_pin(&memory.get_pin(&address_pin_name(bit))?, HOST_DRIVER, level)?;
        }
        Ok(())
    }

    fn placement_mut(&mut self, id: &PlacementId) -> Result<&mut Placement, CircuitError> {
        self.placements
            .get_mut(id)
            .ok_or_else(|| CircuitError::UnknownPlacement(id.clone()))
    }
}
