//! Buffered shift register
//! - keeps a shadow word that callers edit bit by bit without touching the hardware
//! - write_buffer commits the whole shadow word with a single write to the wrapped register
//! - commits are serialized: the wrapped register sits behind the commit lock, so two
//!   shift sequences never interleave on the wire
//! - bit edits take the shadow lock only. An edit racing a commit lands either in that
//!   commit or in the next one; it is never torn or lost.

use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::shift_reg_gpio::check_data;
use crate::common::error::DriverError;
use crate::debug;
use crate::driver::gpio::prelude::DataWord;
use crate::driver::traits::ShiftRegister;

const LOG_TAG: &str = "shift_reg_buffered";

pub struct ShiftRegBuffered<R: ShiftRegister> {
    capacity: usize,
    // shadow word, pending state not yet on the outputs
    buffer: Mutex<DataWord>,
    // commit lock, held for a whole shift sequence
    shift_reg: Mutex<R>,
}

impl<R: ShiftRegister> ShiftRegBuffered<R> {
    pub fn new(shift_reg: R) -> Self {
        ShiftRegBuffered {
            capacity: shift_reg.get_capacity(),
            buffer: Mutex::new(DataWord::default()),
            shift_reg: Mutex::new(shift_reg),
        }
    }

    pub fn get_capacity(&self) -> usize {
        self.capacity
    }

    /// Validate a bit position, returns it as an index
    pub fn check_bit_pos<P>(&self, bit_pos: P) -> Result<usize, DriverError>
    where
        P: TryInto<usize> + Display + Copy,
    {
        let pos: usize = bit_pos.try_into().map_err(|_| {
            DriverError::invalid_argument(format!("bit position must be positive or zero, got {}", bit_pos))
        })?;

        if pos >= self.capacity {
            return Err(DriverError::invalid_argument(format!(
                "bit position can't be bigger than register capacity ({}), got {}",
                self.capacity, pos
            )));
        }
        Ok(pos)
    }

    /// Read one bit of the shadow word, 0 or 1
    pub fn get_buf_bit<P>(&self, bit_pos: P) -> Result<u8, DriverError>
    where
        P: TryInto<usize> + Display + Copy,
    {
        let pos = self.check_bit_pos(bit_pos)?;
        Ok(self.lock_buffer().bit(pos as u64) as u8)
    }

    /// Set one bit of the shadow word. Accepts 0, 1, false or true.
    /// Nothing reaches the outputs until the next commit.
    pub fn set_buf_bit<P, V>(&self, bit_pos: P, value: V) -> Result<(), DriverError>
    where
        P: TryInto<usize> + Display + Copy,
        V: TryInto<u8> + Display + Copy,
    {
        let pos = self.check_bit_pos(bit_pos)?;

        let bit: Result<u8, _> = value.try_into();
        match bit {
            Ok(0) => self.lock_buffer().set_bit(pos as u64, false),
            Ok(1) => self.lock_buffer().set_bit(pos as u64, true),
            _ => {
                return Err(DriverError::invalid_argument(format!(
                    "value must be 1 or zero, true or false, got {}",
                    value
                )))
            }
        }
        Ok(())
    }

    /// Commit the shadow word to the register
    pub fn write_buffer(&self) -> Result<(), DriverError> {
        let mut shift_reg = self.lock_shift_reg();
        let data = self.get_buffer();
        debug!(LOG_TAG, "write planned, data: {:#x}", data);
        shift_reg.write_data(&data)?;
        debug!(LOG_TAG, "write finished");
        Ok(())
    }

    /// Snapshot of the shadow word
    pub fn get_buffer(&self) -> DataWord {
        self.lock_buffer().clone()
    }

    /// Overwrite the shadow word and commit it
    pub fn write_data(&self, data: &DataWord) -> Result<(), DriverError> {
        check_data(data, self.capacity)?;

        let mut shift_reg = self.lock_shift_reg();
        *self.lock_buffer() = data.clone();
        debug!(LOG_TAG, "write planned, data: {:#x}", data);
        shift_reg.write_data(data)?;
        debug!(LOG_TAG, "write finished");
        Ok(())
    }

    /// Zero the shadow word and clear the register
    pub fn clear(&self) -> Result<(), DriverError> {
        let mut shift_reg = self.lock_shift_reg();
        *self.lock_buffer() = DataWord::default();
        shift_reg.clear()
    }

    /// Take the wrapped register back
    pub fn into_inner(self) -> R {
        self.shift_reg.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // a panic mid-commit leaves no invariant broken, the next write starts with a clear
    fn lock_shift_reg(&self) -> MutexGuard<'_, R> {
        self.shift_reg.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_buffer(&self) -> MutexGuard<'_, DataWord> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: ShiftRegister> ShiftRegister for ShiftRegBuffered<R> {
    fn get_capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) -> Result<(), DriverError> {
        ShiftRegBuffered::clear(self)
    }

    fn write_data(&mut self, data: &DataWord) -> Result<(), DriverError> {
        ShiftRegBuffered::write_data(self, data)
    }
}
