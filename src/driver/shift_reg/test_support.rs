//! Helpers shared by the shift register tests
use super::entity::PortStruct;
use super::shift_reg_gpio::ShiftRegGpio;
use crate::driver::gpio::dummy_gpio::{DummyGpio, GpioEvent};
use crate::driver::gpio::prelude::*;

pub const PORTS: PortStruct = PortStruct { si: 17, clk: 27, rck: 22, sclr: 23 };

/// Driver on a dummy backend with a simulated chain of matching length
pub fn build(num_of_slaves: usize) -> (DummyGpio, ShiftRegGpio) {
    let gpio = DummyGpio::new();
    gpio.attach_chain(PORTS.si, PORTS.clk, PORTS.rck, PORTS.sclr, num_of_slaves + 1);
    let shift_reg = ShiftRegGpio::new_chained(Box::new(gpio.clone()), PORTS, num_of_slaves)
        .unwrap_or_else(|e| panic!("cannot build driver: {}", e));
    (gpio, shift_reg)
}

fn pulse(trace: &mut Vec<GpioEvent>, pin: PinId) {
    trace.push(GpioEvent::Output(pin, Level::Low));
    trace.push(GpioEvent::Output(pin, Level::High));
    trace.push(GpioEvent::Output(pin, Level::Low));
}

/// Data word from a small literal
pub fn word(value: u128) -> DataWord {
    DataWord::from(value)
}

/// Events one write of `data` puts on the wire
pub fn expected_trace(ports: PortStruct, data: &DataWord, capacity: usize) -> Vec<GpioEvent> {
    let mut trace = vec![
        GpioEvent::Output(ports.sclr, Level::Low),
        GpioEvent::Output(ports.sclr, Level::High),
    ];
    for i in (0..capacity).rev() {
        trace.push(GpioEvent::Output(ports.si, Level::from(data.bit(i as u64))));
        pulse(&mut trace, ports.clk);
    }
    pulse(&mut trace, ports.rck);
    trace
}

/// Number of events one write puts on the wire
pub fn trace_len(capacity: usize) -> usize {
    2 + 4 * capacity + 3
}

/// Edge values, single bits spread over the word and a few pseudo random words that fit in `capacity` bits
pub fn sample_words(capacity: usize) -> Vec<DataWord> {
    let mask = (DataWord::from(1u8) << capacity) - 1u8;
    let mut odd = DataWord::default();
    for i in (0..capacity).step_by(2) {
        odd.set_bit(i as u64, true);
    }
    let even = &mask ^ &odd;
    let mut words = vec![DataWord::default(), mask.clone(), odd, even];

    // every bit of short chains, a spread including the top bit for long ones
    let step = (capacity / 64).max(1);
    let mut positions: Vec<usize> = (0..capacity).step_by(step).collect();
    if positions.last() != Some(&(capacity - 1)) {
        positions.push(capacity - 1);
    }
    words.extend(positions.into_iter().map(|i| DataWord::from(1u8) << i));

    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..4 {
        let bytes: Vec<u8> = (0..capacity.div_ceil(8))
            .map(|_| {
                seed = seed.wrapping_mul(0x5851_F42D_4C95_7F2D).wrapping_add(1);
                (seed >> 56) as u8
            })
            .collect();
        words.push(DataWord::from_bytes_le(&bytes) & &mask);
    }
    words
}
