//! Raspberry Pi gpio backend, BCM pin numbering
use std::collections::HashMap;

use rppal::gpio::{Gpio, OutputPin};

use super::prelude::*;
use super::traits::GpioBackend;
use crate::common::error::DriverError;
use crate::debug;

const LOG_TAG: &str = "rpi_gpio";
const BACKEND_TYPE: &str = "rpi";

pub struct RpiGpio {
    gpio: Gpio,
    // dropping an OutputPin resets the pin to its previous mode
    pins: HashMap<PinId, OutputPin>,
}

impl RpiGpio {
    pub fn new() -> Result<Self, DriverError> {
        let gpio = Gpio::new()
            .map_err(|e| DriverError::config(format!("cannot open raspberry pi gpio: {}", e)))?;
        debug!(LOG_TAG, "gpio opened");
        Ok(RpiGpio { gpio, pins: HashMap::new() })
    }
}

impl GpioBackend for RpiGpio {
    fn get_type(&self) -> String {
        BACKEND_TYPE.to_string()
    }

    fn setup_output(&mut self, pin: PinId) -> Result<(), DriverError> {
        if self.pins.contains_key(&pin) {
            return Err(DriverError::gpio(format!("rpi gpio: pin {} is already in use", pin)));
        }
        let output = self.gpio
            .get(pin)
            .map_err(|e| DriverError::gpio(format!("rpi gpio: cannot get pin {}: {}", pin, e)))?
            .into_output_low();
        self.pins.insert(pin, output);
        Ok(())
    }

    fn output(&mut self, pin: PinId, level: Level) -> Result<(), DriverError> {
        let output = self.pins
            .get_mut(&pin)
            .ok_or(DriverError::gpio(format!("rpi gpio: pin {} is not set up as output", pin)))?;
        match level {
            Level::Low => output.set_low(),
            Level::High => output.set_high(),
        }
        Ok(())
    }

    fn cleanup(&mut self, pins: &[PinId]) -> Result<(), DriverError> {
        let unclaimed: Vec<PinId> = pins
            .iter()
            .filter(|pin| self.pins.remove(*pin).is_none())
            .copied()
            .collect();
        debug!(LOG_TAG, "pins {:?} released", pins);
        if !unclaimed.is_empty() {
            return Err(DriverError::gpio(format!("rpi gpio: cleanup of unclaimed pins {:?}", unclaimed)));
        }
        Ok(())
    }
}
