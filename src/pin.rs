use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinValue {
    Low,
    High,
    HighZ, // Tri-state, also "unknown" for inputs
}

impl PinValue {
    pub fn to_str(&self) -> &'static str {
        match self {
            PinValue::Low => "Low",
            PinValue::High => "High",
            PinValue::HighZ => "HighZ",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            PinValue::Low => '0',
            PinValue::High => '1',
            PinValue::HighZ => 'Z',
        }
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            PinValue::High
        } else {
            PinValue::Low
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            PinValue::Low => Some(false),
            PinValue::High => Some(true),
            PinValue::HighZ => None,
        }
    }
}

/// A single component terminal. Every driver contributes a value and the
/// pin settles on the resolved level: Low dominates High, and HighZ drivers
/// are ignored.
#[derive(Debug)]
pub struct Pin {
    name: String,
    drivers: HashMap<String, PinValue>,
    settled_value: PinValue,
}

impl Pin {
    pub fn new(name: String) -> Self {
        Pin {
            name,
            drivers: HashMap::new(),
            settled_value: PinValue::HighZ,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_driver(&mut self, driver_name: Option<String>, value: PinValue) {
        let driver_id = driver_name.unwrap_or_else(|| "anonymous".to_string());

        if value == PinValue::HighZ {
            self.drivers.remove(&driver_id);
        } else {
            self.drivers.insert(driver_id, value);
        }

        self.recalculate_value();
    }

    pub fn remove_driver(&mut self, driver_name: &str) {
        self.drivers.remove(driver_name);
        self.recalculate_value();
    }

    pub fn read(&self) -> PinValue {
        self.settled_value
    }

    pub fn get_drivers(&self) -> &HashMap<String, PinValue> {
        &self.drivers
    }

    fn recalculate_value(&mut self) {
        self.settled_value = if self.drivers.values().any(|v| *v == PinValue::Low) {
            PinValue::Low
        } else if self.drivers.values().any(|v| *v == PinValue::High) {
            PinValue::High
        } else {
            PinValue::HighZ
        };
    }
}

impl Default for Pin {
    fn default() -> Self {
        Pin::new("unnamed".to_string())
    }
}

impl std::fmt::Display for PinValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl std::fmt::Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.settled_value)?;

        if !self.drivers.is_empty() {
            let mut drivers: Vec<_> = self.drivers.iter().collect();
            drivers.sort_by(|a, b| a.0.cmp(b.0));
            write!(f, " [drivers: ")?;
            for (i, (driver, value)) in drivers.into_iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", driver, value.to_char())?;
            }
            write!(f, "]")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_creation() {
        let pin = Pin::new("TEST".to_string());
        assert_eq!(pin.name(), "TEST");
        assert_eq!(pin.read(), PinValue::HighZ);
        assert!(pin.get_drivers().is_empty());
    }

    #[test]
    fn test_pin_driving() {
        let mut pin = Pin::new("TEST".to_string());

        pin.set_driver(Some("driver1".to_string()), PinValue::High);
        assert_eq!(pin.read(), PinValue::High);

        // Low wins over High
        pin.set_driver(Some("driver2".to_string()), PinValue::Low);
        assert_eq!(pin.read(), PinValue::Low);

        pin.remove_driver("driver2");
        assert_eq!(pin.read(), PinValue::High);
    }

    #[test]
    fn test_pin_tri_state() {
        let mut pin = Pin::new("TEST".to_string());

        pin.set_driver(Some("driver".to_string()), PinValue::High);
        assert_eq!(pin.read(), PinValue::High);

        pin.set_driver(Some("driver".to_string()), PinValue::HighZ);
        assert_eq!(pin.read(), PinValue::HighZ);
        assert!(pin.get_drivers().is_empty());
    }

    #[test]
    fn test_pin_value_bool_conversion() {
        assert_eq!(PinValue::from_bool(true), PinValue::High);
        assert_eq!(PinValue::High.to_bool(), Some(true));
        assert_eq!(PinValue::Low.to_bool(), Some(false));
        assert_eq!(PinValue::HighZ.to_bool(), None);
    }

    #[test]
    fn test_pin_display() {
        let mut pin = Pin::new("CLK".to_string());
        pin.set_driver(Some("HOST".to_string()), PinValue::High);
        assert_eq!(pin.to_string(), "CLK: High [drivers: HOST=1]");
    }
}
