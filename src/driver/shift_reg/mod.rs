//! Shift register drivers
//! - ShiftRegGpio bit-bangs the SIPO protocol over four claimed pins
//! - ShiftRegBuffered keeps a shadow word on top of any ShiftRegister and commits it atomically

pub mod entity;
pub mod shift_reg_gpio;
pub mod shift_reg_buffered;

#[cfg(test)]
mod test_support;
