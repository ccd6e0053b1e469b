//! # JSON Configuration System
//!
//! Circuits of file memories are described in JSON files and built by a
//! `CircuitFactory`.
//!
//! ## Usage
//!
//! ```no_run
//! use file_rom::system_config::CircuitFactory;
//!
//! let circuit = CircuitFactory::new()
//!     .create_from_json("configs/demo_circuit.json")
//!     .expect("Could not create circuit!");
//! println!("Created circuit: {}", circuit.name());
//! ```
//!
//! ## Configuration File Format
//!
//! ```json
//! {
//!   "name": "demo",
//!   "description": "two file memories",
//!   "clock": { "half_period": 1, "enabled": true },
//!   "placements": {
//!     "rom0": {
//!       "attributes": { "filename": "builtin:demo", "trigger": "rising", "addr_width": 8 },
//!       "address": { "counter": { "start": 0, "step": 1 } }
//!     }
//!   }
//! }
//! ```
//!
//! Relative filenames (`"location_type": "relative"`) are resolved against
//! the directory holding the configuration file. Attributes that are left
//! out take the component defaults.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::circuit::{AddressStimulus, Circuit, CircuitError, PlacementId};
use crate::components::clock::tick_clock::TickClock;
use crate::components::memory::file_memory::FileMemoryAttributes;
use crate::console::ConsoleConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    pub placements: BTreeMap<PlacementId, PlacementConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub half_period: u32,
    pub enabled: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            half_period: 1,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub attributes: FileMemoryAttributes,
    pub address: AddressStimulus,
}

#[derive(Debug, Default)]
pub struct CircuitFactory;

impl CircuitFactory {
    pub fn new() -> Self {
        CircuitFactory
    }

    /// Load a circuit file; its directory becomes the base for relative filenames
    pub fn create_from_json(&self, json_path: impl AsRef<Path>) -> Result<Circuit, ConfigError> {
        let json_path = json_path.as_ref();
        let config = self.load_json_config(json_path)?;
        self.create_from_config(&config, base_dir_of(json_path))
    }

    pub fn load_json_config(&self, json_path: impl AsRef<Path>) -> Result<CircuitConfig, ConfigError> {
        let json_path = json_path.as_ref();
        let content = std::fs::read_to_string(json_path).map_err(|source| ConfigError::Io {
            path: json_path.to_path_buf(),
            source,
        })?;
        self.parse(&content, &json_path.display().to_string())
    }

    pub fn parse(&self, content: &str, origin: &str) -> Result<CircuitConfig, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn create_from_config(
        &self,
        config: &CircuitConfig,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Circuit, ConfigError> {
        let mut clock = TickClock::new("CLOCK".to_string(), config.clock.half_period);
        if !config.clock.enabled {
            clock.disable();
        }

        let mut circuit = Circuit::new(config.name.clone(), base_dir, clock)
            .with_description(config.description.clone());
        for (id, placement) in &config.placements {
            circuit.add_placement(
                id.clone(),
                placement.attributes.clone(),
                placement.address.clone(),
            )?;
        }

        info!(
            "Created circuit '{}' with {} placement(s)",
            circuit.name(),
            config.placements.len()
        );
        Ok(circuit)
    }
}

pub fn base_dir_of(json_path: &Path) -> PathBuf {
    json_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
