//! Shift register output engine
//! Drives daisy-chained SIPO shift registers (74HC595 style) over four gpio lines.
//!
//! - `driver::shift_reg::shift_reg_gpio::ShiftRegGpio` speaks the serial protocol
//! - `driver::shift_reg::shift_reg_buffered::ShiftRegBuffered` stages bits and commits them atomically
//! - `driver::factory` builds both from settings
//! - `common` holds settings, logger and the error type

pub mod common;
pub mod driver;
