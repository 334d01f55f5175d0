use crate::common::error::DriverError;
use super::gpio::prelude::DataWord;

/// A chain of shift registers seen as one wide output word
pub trait ShiftRegister {
    /// number of addressable outputs, a multiple of 8
    fn get_capacity(&self) -> usize;

    /// reset the register contents to all-zero
    fn clear(&mut self) -> Result<(), DriverError>;

    /// replace the register contents with `data`, bit `i` drives output `i % 8` of register `i / 8`
    fn write_data(&mut self, data: &DataWord) -> Result<(), DriverError>;
}
