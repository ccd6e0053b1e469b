//! # File ROM Library
//!
//! A read-only memory component whose contents live in an external file.
//!
//! This library provides:
//! - A windowed memory device that latches an address on a clock edge and
//!   exposes the byte there plus two neighbours on each side
//! - Byte sources backed by a fixed buffer or a file on disk, with graceful
//!   degradation when the file is missing or shrinks underneath the reader
//! - A pin-level `FileMemory` component and a tick-driven `Circuit` host
//! - JSON circuit definitions and a terminal console for watching them run

pub mod circuit;
pub mod component;
pub mod components;
pub mod console;
pub mod pin;
pub mod system_config;
pub mod types;
pub mod view;

// Re-export commonly used items for easier importing
pub use circuit::{AddressStimulus, Circuit, CircuitError, PlacementId, TickRecord};
pub use component::{BaseComponent, Component, PinError};
pub use components::memory::byte_source::{ByteSource, Origin, SourceError};
pub use components::memory::file_memory::{FileMemory, FileMemoryAttributes, LoggedValue};
pub use components::memory::windowed_device::{DeviceState, WindowedDevice};
pub use pin::{Pin, PinValue};
pub use system_config::{CircuitFactory, ConfigError};
pub use types::{AddressWidth, LocationType, TriggerPolarity};
pub use view::DeviceView;
