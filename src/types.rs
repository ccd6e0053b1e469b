use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Width of the address input port, 1 to 24 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AddressWidth(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address width {0} is outside the supported range 1..=24")]
pub struct InvalidAddressWidth(pub u8);

impl AddressWidth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 24;

    pub fn new(bits: u8) -> Result<Self, InvalidAddressWidth> {
        if (Self::MIN..=Self::MAX).contains(&bits) {
            Ok(AddressWidth(bits))
        } else {
            Err(InvalidAddressWidth(bits))
        }
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn mask(&self, value: u64) -> u64 {
        value & ((1u64 << self.0) - 1)
    }

    /// Number of hex digits needed to show a full address
    pub fn hex_digits(&self) -> usize {
        (self.0 as usize + 3) / 4
    }

    /// Format an address as `0x` followed by a fixed number of hex digits
    pub fn format_address(&self, address: u64) -> String {
        format!("0x{:0width$X}", self.mask(address), width = self.hex_digits())
    }
}

impl Default for AddressWidth {
    fn default() -> Self {
        AddressWidth(Self::MAX)
    }
}

impl TryFrom<u8> for AddressWidth {
    type Error = InvalidAddressWidth;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        AddressWidth::new(bits)
    }
}

impl From<AddressWidth> for u8 {
    fn from(width: AddressWidth) -> Self {
        width.bits()
    }
}

impl fmt::Display for AddressWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}

/// Clock edge that latches a new address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPolarity {
    #[default]
    Rising,
    Falling,
}

impl TriggerPolarity {
    pub fn is_edge(&self, previous: bool, current: bool) -> bool {
        match self {
            TriggerPolarity::Rising => !previous && current,
            TriggerPolarity::Falling => previous && !current,
        }
    }
}

impl fmt::Display for TriggerPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerPolarity::Rising => write!(f, "rising"),
            TriggerPolarity::Falling => write!(f, "falling"),
        }
    }
}

/// How a configured filename is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    #[default]
    Absolute,
    /// Resolved against the directory of the loaded circuit
    Relative,
}
