use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::component::{BaseComponent, Component, PinError};
use crate::pin::{Pin, PinValue};

/// Square-wave clock measured in simulation ticks rather than wall time.
/// The output toggles every `half_period` updates while enabled; a disabled
/// clock, or one whose ENABLE pin is driven low, holds CLK low.
#[derive(Debug)]
pub struct TickClock {
    base: BaseComponent,
    half_period: u32,
    ticks_in_phase: u32,
    current_state: PinValue,
    enabled: bool,
}

impl TickClock {
    pub fn new(name: String, half_period: u32) -> Self {
        let pins = BaseComponent::create_pin_map(&["CLK", "ENABLE"], &name);

        let clock = TickClock {
            base: BaseComponent::new(name, pins),
            half_period: half_period.max(1),
            ticks_in_phase: 0,
            current_state: PinValue::Low,
            enabled: true,
        };
        clock.set_clock_output(PinValue::Low);
        clock
    }

    pub fn half_period(&self) -> u32 {
        self.half_period
    }

    pub fn level(&self) -> PinValue {
        self.current_state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.hold_low();
    }

    fn hold_low(&mut self) {
        self.current_state = PinValue::Low;
        self.ticks_in_phase = 0;
        self.set_clock_output(PinValue::Low);
    }

    fn set_clock_output(&self, value: PinValue) {
        let _ = self.base.drive_pin("CLK", value);
    }

    fn read_enable_pin(&self) -> bool {
        // Floating ENABLE counts as enabled
        self.base.read_pin("ENABLE") != PinValue::Low
    }

    fn perform_transition(&mut self) {
        let new_state = match self.current_state {
            PinValue::High => PinValue::Low,
            PinValue::Low | PinValue::HighZ => PinValue::High,
        };

        self.current_state = new_state;
        self.set_clock_output(new_state);
    }
}

impl Component for TickClock {
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
        if !(self.enabled && self.read_enable_pin()) {
            if self.current_state != PinValue::Low {
                self.hold_low();
            }
            return;
        }

        self.ticks_in_phase += 1;
        if self.ticks_in_phase >= self.half_period {
            self.ticks_in_phase = 0;
            self.perform_transition();
        }
    }
}
