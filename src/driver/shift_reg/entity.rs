use std::fmt::{self, Display, Formatter};

use crate::common::error::DriverError;
use crate::driver::gpio::prelude::PinId;

/// The four lines of a register chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortStruct {
    // serial data
    pub si: PinId,
    // shift clock
    pub clk: PinId,
    // latch (storage) clock
    pub rck: PinId,
    // shift register clear, active low
    pub sclr: PinId,
}

impl PortStruct {
    pub fn new(si: PinId, clk: PinId, rck: PinId, sclr: PinId) -> Self {
        PortStruct { si, clk, rck, sclr }
    }

    /// Pins in claim order
    pub fn as_array(&self) -> [PinId; 4] {
        [self.si, self.clk, self.rck, self.sclr]
    }

    pub fn check_distinct(&self) -> Result<(), DriverError> {
        let pins = self.as_array();
        for i in 0..pins.len() {
            if pins[i + 1..].contains(&pins[i]) {
                return Err(DriverError::invalid_argument(format!("ports must be distinct pins, got {}", self)));
            }
        }
        Ok(())
    }
}

impl Display for PortStruct {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "si={} clk={} rck={} sclr={}", self.si, self.clk, self.rck, self.sclr)
    }
}
