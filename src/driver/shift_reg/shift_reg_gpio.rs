//! Shift register driven over gpio
//! - claims si, clk, rck and sclr as outputs, all or nothing
//! - every write clears the register, shifts capacity bits msb first, then latches once
//! - outputs only change on the latch pulse
//! - dropping the driver clears and latches the register, drives all lines low and releases the pins

use std::fmt::{self, Display, Formatter};
use std::thread;
use std::time::Duration;

use super::entity::PortStruct;
use crate::common::error::DriverError;
use crate::common::setting::edge_delay;
use crate::driver::gpio::prelude::*;
use crate::driver::gpio::traits::GpioBackend;
use crate::driver::traits::ShiftRegister;
use crate::{debug, error};

const LOG_TAG: &str = "shift_reg_gpio";

/// Capacity of a master register followed by `num_of_slaves` chained registers
pub fn capacity_for<N>(num_of_slaves: N) -> Result<usize, DriverError>
where
    N: TryInto<usize> + Display + Copy,
{
    let slaves: usize = num_of_slaves.try_into().map_err(|_| {
        DriverError::invalid_argument(format!("num_of_slaves can't be negative, got {}", num_of_slaves))
    })?;

    // only overflows the address space
    slaves
        .checked_add(1)
        .and_then(|registers| registers.checked_mul(REGISTER_WIDTH))
        .ok_or(DriverError::invalid_argument(format!(
            "num_of_slaves is too large to address, got {}",
            num_of_slaves
        )))
}

/// Fails unless `data` fits in `capacity` bits
pub fn check_data(data: &DataWord, capacity: usize) -> Result<(), DriverError> {
    if data.bits() > capacity as u64 {
        return Err(DriverError::invalid_argument(format!(
            "number of bits in data can't exceed {} bits, got {} bits ({:#x})",
            capacity,
            data.bits(),
            data
        )));
    }
    Ok(())
}

/// Claim every port as output. On failure the ports claimed so far are released
/// before the error is returned.
fn setup_ports(gpio: &mut dyn GpioBackend, ports: &PortStruct) -> Result<(), DriverError> {
    let pins = ports.as_array();
    for i in 0..pins.len() {
        if let Err(e) = gpio.setup_output(pins[i]) {
            if i != 0 {
                debug!(LOG_TAG, "failed port setup, cleaning up: {:?}", &pins[0..i]);
                if let Err(cleanup_err) = gpio.cleanup(&pins[0..i]) {
                    error!(LOG_TAG, "cleanup after failed setup failed: {}", cleanup_err);
                }
            }
            return Err(DriverError::hardware_config(format!("cannot set up pin {} as output: {}", pins[i], e.msg)));
        }
    }
    Ok(())
}

pub struct ShiftRegGpio {
    ports: PortStruct,
    capacity: usize,
    delay: Duration,
    gpio: Box<dyn GpioBackend>,
}

impl ShiftRegGpio {
    /// Single register, no chained slaves
    pub fn new(gpio: Box<dyn GpioBackend>, ports: PortStruct) -> Result<Self, DriverError> {
        Self::new_chained(gpio, ports, 0usize)
    }

    /// Master register followed by `num_of_slaves` chained registers.
    /// Arguments are validated before any pin is touched.
    pub fn new_chained<N>(mut gpio: Box<dyn GpioBackend>, ports: PortStruct, num_of_slaves: N) -> Result<Self, DriverError>
    where
        N: TryInto<usize> + Display + Copy,
    {
        debug!(LOG_TAG, "init started, ports: {}, backend: {}", ports, gpio.get_type());

        let capacity = capacity_for(num_of_slaves)?;
        ports.check_distinct()?;
        setup_ports(gpio.as_mut(), &ports)?;

        let shift_reg = ShiftRegGpio {
            ports,
            capacity,
            delay: edge_delay(),
            gpio,
        };
        debug!(LOG_TAG, "{} init finished", shift_reg);
        Ok(shift_reg)
    }

    pub fn get_ports(&self) -> PortStruct {
        self.ports
    }

    /// Drive all four lines low
    pub fn set_zero(&mut self) -> Result<(), DriverError> {
        self.gpio.output_many(&self.ports.as_array(), Level::Low)
    }

    fn wait(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    /// low, high, low
    fn pulse(&mut self, pin: PinId) -> Result<(), DriverError> {
        self.gpio.output(pin, Level::Low)?;
        self.wait();
        self.gpio.output(pin, Level::High)?;
        self.wait();
        self.gpio.output(pin, Level::Low)
    }

    fn shutdown(&mut self) -> Result<(), DriverError> {
        self.clear()?;
        // push the cleared shift stage to the outputs
        self.pulse(self.ports.rck)?;
        self.set_zero()
    }
}

impl ShiftRegister for ShiftRegGpio {
    fn get_capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) -> Result<(), DriverError> {
        self.gpio.output(self.ports.sclr, Level::Low)?;
        self.wait();
        self.gpio.output(self.ports.sclr, Level::High)
    }

    fn write_data(&mut self, data: &DataWord) -> Result<(), DriverError> {
        check_data(data, self.capacity)?;

        self.clear()?;

        for i in (0..self.capacity).rev() {
            self.gpio.output(self.ports.si, Level::from(data.bit(i as u64)))?;
            self.pulse(self.ports.clk)?;
        }

        self.pulse(self.ports.rck)
    }
}

impl Display for ShiftRegGpio {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "ShiftRegGpio({}, capacity={})", self.ports, self.capacity)
    }
}

impl Drop for ShiftRegGpio {
    fn drop(&mut self) {
        debug!(LOG_TAG, "{} destruction started", self);

        if let Err(e) = self.shutdown() {
            error!(LOG_TAG, "{} cannot reset register outputs: {}", self, e);
        }

        let pins = self.ports.as_array();
        if let Err(e) = self.gpio.cleanup(&pins) {
            error!(LOG_TAG, "{} cannot release pins: {}", self, e);
        }

        debug!(LOG_TAG, "{} destruction finished", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::test_support::*;
    use crate::common::error::ErrorCode;
    use crate::common::logger::init_logger;
    use crate::driver::gpio::dummy_gpio::{DummyGpio, GpioEvent};

    #[test]
    fn test_capacity_for() {
        assert_eq!(capacity_for(0usize).unwrap(), 8);
        assert_eq!(capacity_for(1i64).unwrap(), 16);
        assert_eq!(capacity_for(15u8).unwrap(), 128);
        assert_eq!(capacity_for(16usize).unwrap(), 136);
        assert_eq!(capacity_for(1000u32).unwrap(), 8008);
        assert_eq!(capacity_for(-1i32).unwrap_err().code, ErrorCode::InvalidArgument);
        assert_eq!(capacity_for(usize::MAX).unwrap_err().code, ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_check_data() {
        assert!(check_data(&word(0xFF), 8).is_ok());
        assert!(check_data(&word(0x100), 8).is_err());
        assert!(check_data(&word(0xFFFF), 16).is_ok());
        assert!(check_data(&word(u128::MAX), 128).is_ok());
        assert!(check_data(&DataWord::default(), 8).is_ok());

        let top = DataWord::from(1u8) << 199usize;
        assert!(check_data(&top, 200).is_ok());
        assert!(check_data(&top, 192).is_err());
    }

    #[test]
    fn test_new_claims_ports() {
        let _ = init_logger();
        let (gpio, shift_reg) = build(0);
        assert_eq!(shift_reg.get_capacity(), 8);
        assert_eq!(shift_reg.get_ports(), PORTS);
        for pin in PORTS.as_array() {
            assert!(gpio.is_claimed(pin));
        }
        assert_eq!(
            gpio.events(),
            PORTS.as_array().iter().map(|pin| GpioEvent::Setup(*pin)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_new_rejects_bad_arguments_before_claiming() {
        let _ = init_logger();
        let gpio = DummyGpio::new();

        let err = ShiftRegGpio::new_chained(Box::new(gpio.clone()), PORTS, -1i64).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidArgument);

        let err = ShiftRegGpio::new_chained(Box::new(gpio.clone()), PORTS, usize::MAX).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidArgument);

        let ports = PortStruct::new(5, 6, 5, 7);
        let err = ShiftRegGpio::new(Box::new(gpio.clone()), ports).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidArgument);

        assert!(gpio.events().is_empty());
    }

    #[test]
    fn test_long_chain() {
        let _ = init_logger();
        let shift_reg = ShiftRegGpio::new_chained(Box::new(DummyGpio::new()), PORTS, 16usize).unwrap();
        assert_eq!(shift_reg.get_capacity(), 136);
        drop(shift_reg);

        let (gpio, mut shift_reg) = build(40);
        let capacity = shift_reg.get_capacity();
        assert_eq!(capacity, 328);

        // first and last output of the chain
        let mut data = DataWord::from(1u8) << (capacity - 1);
        data.set_bit(0, true);
        shift_reg.write_data(&data).unwrap();
        assert_eq!(gpio.output_word(), data);
        assert_eq!(gpio.register_outputs(0), [true, false, false, false, false, false, false, false]);
        assert_eq!(gpio.register_outputs(40), [false, false, false, false, false, false, false, true]);
        assert_eq!(gpio.rising_edges(PORTS.clk), capacity);

        let err = shift_reg.write_data(&(DataWord::from(1u8) << capacity)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(gpio.output_word(), data);
    }

    #[test]
    fn test_failed_claim_rolls_back() {
        let _ = init_logger();
        let gpio = DummyGpio::new();
        gpio.fail_setup_on(PORTS.rck);

        let err = ShiftRegGpio::new(Box::new(gpio.clone()), PORTS).err().unwrap();
        assert_eq!(err.code, ErrorCode::HardwareConfigError);

        // both claimed pins are released before the error comes back, nothing else is touched
        assert_eq!(gpio.events(), vec![
            GpioEvent::Setup(PORTS.si),
            GpioEvent::Setup(PORTS.clk),
            GpioEvent::Cleanup(PORTS.si),
            GpioEvent::Cleanup(PORTS.clk),
        ]);
        for pin in PORTS.as_array() {
            assert!(!gpio.is_claimed(pin));
        }
        assert_eq!(gpio.release_count(PORTS.rck), 0);
        assert_eq!(gpio.release_count(PORTS.sclr), 0);
    }

    #[test]
    fn test_failed_first_claim_releases_nothing() {
        let gpio = DummyGpio::new();
        gpio.fail_setup_on(PORTS.si);
        let err = ShiftRegGpio::new(Box::new(gpio.clone()), PORTS).err().unwrap();
        assert_eq!(err.code, ErrorCode::HardwareConfigError);
        assert!(gpio.events().is_empty());
    }

    #[test]
    fn test_clear_pulses_sclr_only() {
        let (gpio, mut shift_reg) = build(1);
        shift_reg.write_data(&word(0xFFFF)).unwrap();
        assert!(gpio.shift_stage().iter().all(|bit| *bit));
        gpio.clear_events();

        shift_reg.clear().unwrap();
        assert_eq!(gpio.events(), vec![
            GpioEvent::Output(PORTS.sclr, Level::Low),
            GpioEvent::Output(PORTS.sclr, Level::High),
        ]);
        assert_eq!(gpio.shift_stage(), vec![false; 16]);
        // no latch yet, the outputs keep the last word
        assert_eq!(gpio.output_word(), word(0xFFFF));
    }

    #[test]
    fn test_write_chained_scenario() {
        let _ = init_logger();
        let (gpio, mut shift_reg) = build(1);
        gpio.clear_events();

        shift_reg.write_data(&word(0b0000_1001_0000_0000)).unwrap();

        assert_eq!(gpio.register_outputs(0), [false; 8]);
        assert_eq!(gpio.register_outputs(1), [true, false, false, true, false, false, false, false]);
        assert_eq!(gpio.rising_edges(PORTS.clk), 16);
        assert_eq!(gpio.rising_edges(PORTS.rck), 1);

        // the latch is the last thing on the wire
        let events = gpio.events();
        assert_eq!(&events[events.len() - 3..], &[
            GpioEvent::Output(PORTS.rck, Level::Low),
            GpioEvent::Output(PORTS.rck, Level::High),
            GpioEvent::Output(PORTS.rck, Level::Low),
        ]);
        assert_eq!(events, expected_trace(PORTS, &word(0b0000_1001_0000_0000), 16));
    }

    #[test]
    fn test_write_every_capacity() {
        let _ = init_logger();
        for num_of_slaves in (0..=20usize).chain([31, 63]) {
            let (gpio, mut shift_reg) = build(num_of_slaves);
            let capacity = shift_reg.get_capacity();
            for data in sample_words(capacity) {
                gpio.clear_events();
                shift_reg.write_data(&data).unwrap();
                assert_eq!(gpio.output_word(), data, "capacity {} data {:#x}", capacity, data);
                assert_eq!(gpio.events().len(), trace_len(capacity));

                let outputs = gpio.outputs();
                assert_eq!(outputs.len(), capacity);
                for i in 0..capacity {
                    assert_eq!(outputs[i], data.bit(i as u64), "capacity {} bit {}", capacity, i);
                }
            }
        }
    }

    #[test]
    fn test_write_replaces_previous_state() {
        let (gpio, mut shift_reg) = build(0);
        shift_reg.write_data(&word(0b1111_0000)).unwrap();
        shift_reg.write_data(&word(0b0000_0011)).unwrap();
        assert_eq!(gpio.output_word(), word(0b0000_0011));
    }

    #[test]
    fn test_write_out_of_range_touches_nothing() {
        let (gpio, mut shift_reg) = build(0);
        shift_reg.write_data(&word(0b1010)).unwrap();
        gpio.clear_events();

        let err = shift_reg.write_data(&word(0x100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert!(gpio.events().is_empty());
        assert_eq!(gpio.output_word(), word(0b1010));
    }

    #[test]
    fn test_set_zero() {
        let (gpio, mut shift_reg) = build(0);
        shift_reg.write_data(&word(0xFF)).unwrap();
        gpio.clear_events();
        shift_reg.set_zero().unwrap();
        for pin in PORTS.as_array() {
            assert_eq!(gpio.level(pin), Some(Level::Low));
        }
        assert_eq!(gpio.events().len(), 4);
    }

    #[test]
    fn test_drop_resets_and_releases_once() {
        let _ = init_logger();
        let (gpio, mut shift_reg) = build(1);
        shift_reg.write_data(&word(0xA5A5)).unwrap();
        assert_eq!(gpio.output_word(), word(0xA5A5));
        gpio.clear_events();

        drop(shift_reg);

        assert_eq!(gpio.output_word(), DataWord::default());
        let events = gpio.events();
        assert_eq!(&events[..5], &[
            GpioEvent::Output(PORTS.sclr, Level::Low),
            GpioEvent::Output(PORTS.sclr, Level::High),
            GpioEvent::Output(PORTS.rck, Level::Low),
            GpioEvent::Output(PORTS.rck, Level::High),
            GpioEvent::Output(PORTS.rck, Level::Low),
        ]);
        for pin in PORTS.as_array() {
            assert!(events[5..9].contains(&GpioEvent::Output(pin, Level::Low)));
            assert!(events[9..].contains(&GpioEvent::Cleanup(pin)));
            assert_eq!(gpio.release_count(pin), 1);
            assert!(!gpio.is_claimed(pin));
        }
        assert_eq!(events.len(), 13);
    }
}
