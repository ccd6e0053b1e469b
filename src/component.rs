use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::pin::{Pin, PinValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("pin '{pin}' not found on component '{component}'")]
    NotFound { component: String, pin: String },
    #[error("pin '{0}' lock poisoned")]
    Poisoned(String),
}

pub trait Component {
    fn name(&self) -> String;
    fn pins(&self) -> HashMap<String, Arc<Mutex<Pin>>>;
    fn get_pin(&self, name: &str) -> Result<Arc<Mutex<Pin>>, PinError>;
    /// Advance the component by one simulation step
    fn update(&mut self);
}

#[derive(Debug, Clone)]
pub struct BaseComponent {
    name: String,
    pins: HashMap<String, Arc<Mutex<Pin>>>,
}

impl BaseComponent {
    pub fn new(name: String, pins: HashMap<String, Arc<Mutex<Pin>>>) -> Self {
        Self { name, pins }
    }

    pub fn create_pin_map<S: AsRef<str>>(
        pin_names: &[S],
        component_name: &str,
    ) -> HashMap<String, Arc<Mutex<Pin>>> {
        pin_names
            .iter()
            .map(|pin_name| {
                let pin_name = pin_name.as_ref();
                let pin = Pin::new(format!("{}.{}", component_name, pin_name));
                (pin_name.to_string(), Arc::new(Mutex::new(pin)))
            })
            .collect()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn name(&self) -> String {
        self.name.clone()
    }

    pub fn pins(&self) -> HashMap<String, Arc<Mutex<Pin>>> {
        self.pins.clone()
    }

    pub fn replace_pins(&mut self, pins: HashMap<String, Arc<Mutex<Pin>>>) {
        self.pins = pins;
    }

    pub fn get_pin(&self, name: &str) -> Result<Arc<Mutex<Pin>>, PinError> {
        self.pins.get(name).cloned().ok_or_else(|| PinError::NotFound {
            component: self.name.clone(),
            pin: name.to_string(),
        })
    }

    /// Read a pin, HighZ if it is missing or its lock is poisoned
    pub fn read_pin(&self, name: &str) -> PinValue {
        self.pins
            .get(name)
            .and_then(|pin| pin.lock().ok().map(|guard| guard.read()))
            .unwrap_or(PinValue::HighZ)
    }

    /// Drive a pin with this component as the driver
    pub fn drive_pin(&self, name: &str, value: PinValue) -> Result<(), PinError> {
        drive_pin(&self.get_pin(name)?, self.get_name(), value)
    }
}

/// Drive `pin` on behalf of `driver`
pub fn drive_pin(pin: &Arc<Mutex<Pin>>, driver: &str, value: PinValue) -> Result<(), PinError> {
    let mut guard = pin
        .lock()
        .map_err(|_| PinError::Poisoned(driver.to_string()))?;
    guard.set_driver(Some(driver.to_string()), value);
    Ok(())
}
