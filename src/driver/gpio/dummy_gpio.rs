//! Simulated gpio backend
//! - keeps the level of every claimed pin and a trace of every call
//! - optionally models a chain of 74HC595 style SIPO registers wired to four pins
//! - clones share state, so a test can keep a handle while a driver owns the backend

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::prelude::*;
use super::traits::GpioBackend;
use crate::common::error::DriverError;
use crate::trace;

const LOG_TAG: &str = "dummy_gpio";
const BACKEND_TYPE: &str = "dummy";

/// One recorded backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioEvent {
    Setup(PinId),
    Output(PinId, Level),
    Cleanup(PinId),
}

/// Shift stage and output stage of a register chain.
/// Stage index `i` is output `i % 8` of register `i / 8`, register 0 nearest the controller.
#[derive(Debug)]
struct SipoChain {
    si: PinId,
    clk: PinId,
    rck: PinId,
    sclr: PinId,
    shift_stage: Vec<bool>,
    output_stage: Vec<bool>,
}

impl SipoChain {
    /// react to a level change on one pin
    fn on_edge(&mut self, pin: PinId, old: Level, new: Level, levels: &HashMap<PinId, Level>) {
        let rising = old == Level::Low && new == Level::High;

        if pin == self.sclr && new == Level::Low {
            self.shift_stage.iter_mut().for_each(|bit| *bit = false);
        } else if pin == self.clk && rising {
            // the clear input is level triggered, clocking is ignored while it is held low
            if levels.get(&self.sclr) == Some(&Level::Low) {
                return;
            }
            let si = levels.get(&self.si).copied().unwrap_or(Level::Low);
            self.shift_stage.rotate_right(1);
            self.shift_stage[0] = si.into();
        } else if pin == self.rck && rising {
            self.output_stage.copy_from_slice(&self.shift_stage);
        }
    }
}

#[derive(Debug, Default)]
struct DummyGpioState {
    claimed: BTreeSet<PinId>,
    levels: HashMap<PinId, Level>,
    events: Vec<GpioEvent>,
    release_count: HashMap<PinId, usize>,
    fail_setup: HashSet<PinId>,
    chain: Option<SipoChain>,
}

impl DummyGpioState {
    fn drive(&mut self, pin: PinId, level: Level) -> Result<(), DriverError> {
        if !self.claimed.contains(&pin) {
            return Err(DriverError::gpio(format!("dummy gpio: pin {} is not set up as output", pin)));
        }
        self.events.push(GpioEvent::Output(pin, level));
        let old = self.levels.insert(pin, level).unwrap_or(Level::Low);
        if let Some(chain) = self.chain.as_mut() {
            chain.on_edge(pin, old, level, &self.levels);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DummyGpio {
    state: Arc<Mutex<DummyGpioState>>,
}

impl DummyGpio {
    pub fn new() -> Self {
        DummyGpio::default()
    }

    /// Wire a simulated chain of `registers` SIPO registers to the given pins
    pub fn attach_chain(&self, si: PinId, clk: PinId, rck: PinId, sclr: PinId, registers: usize) {
        let capacity = registers * REGISTER_WIDTH;
        self.lock().chain = Some(SipoChain {
            si,
            clk,
            rck,
            sclr,
            shift_stage: vec![false; capacity],
            output_stage: vec![false; capacity],
        });
    }

    /// Make every setup of `pin` fail from now on
    pub fn fail_setup_on(&self, pin: PinId) {
        self.lock().fail_setup.insert(pin);
    }

    pub fn events(&self) -> Vec<GpioEvent> {
        self.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.lock().events.clear();
    }

    /// Number of low to high transitions recorded on `pin`
    pub fn rising_edges(&self, pin: PinId) -> usize {
        let state = self.lock();
        let mut level = Level::Low;
        let mut count = 0;
        for event in state.events.iter() {
            match event {
                GpioEvent::Output(p, l) if *p == pin => {
                    if level == Level::Low && *l == Level::High {
                        count += 1;
                    }
                    level = *l;
                }
                GpioEvent::Setup(p) if *p == pin => level = Level::Low,
                _ => {}
            }
        }
        count
    }

    pub fn is_claimed(&self, pin: PinId) -> bool {
        self.lock().claimed.contains(&pin)
    }

    pub fn release_count(&self, pin: PinId) -> usize {
        self.lock().release_count.get(&pin).copied().unwrap_or(0)
    }

    pub fn level(&self, pin: PinId) -> Option<Level> {
        self.lock().levels.get(&pin).copied()
    }

    /// Parallel outputs of the simulated chain, empty without a chain
    pub fn outputs(&self) -> Vec<bool> {
        self.lock().chain.as_ref().map(|c| c.output_stage.clone()).unwrap_or_default()
    }

    /// Shift stage of the simulated chain, not yet visible on the outputs
    pub fn shift_stage(&self) -> Vec<bool> {
        self.lock().chain.as_ref().map(|c| c.shift_stage.clone()).unwrap_or_default()
    }

    /// Parallel outputs of the simulated chain packed into a data word
    pub fn output_word(&self) -> DataWord {
        let mut word = DataWord::default();
        for (i, bit) in self.outputs().iter().enumerate() {
            if *bit {
                word.set_bit(i as u64, true);
            }
        }
        word
    }

    /// Outputs A..H of register `index`, 0 being the register nearest the controller
    pub fn register_outputs(&self, index: usize) -> [bool; REGISTER_WIDTH] {
        let mut outputs = [false; REGISTER_WIDTH];
        let all = self.outputs();
        let start = index * REGISTER_WIDTH;
        if start + REGISTER_WIDTH <= all.len() {
            outputs.copy_from_slice(&all[start..start + REGISTER_WIDTH]);
        }
        outputs
    }

    fn lock(&self) -> MutexGuard<'_, DummyGpioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GpioBackend for DummyGpio {
    fn get_type(&self) -> String {
        BACKEND_TYPE.to_string()
    }

    fn setup_output(&mut self, pin: PinId) -> Result<(), DriverError> {
        let mut state = self.lock();
        if state.fail_setup.contains(&pin) {
            return Err(DriverError::gpio(format!("dummy gpio: setup of pin {} refused", pin)));
        }
        if !state.claimed.insert(pin) {
            return Err(DriverError::gpio(format!("dummy gpio: pin {} is already in use", pin)));
        }
        state.levels.insert(pin, Level::Low);
        state.events.push(GpioEvent::Setup(pin));
        trace!(LOG_TAG, "pin {} set up as output", pin);
        Ok(())
    }

    fn output(&mut self, pin: PinId, level: Level) -> Result<(), DriverError> {
        self.lock().drive(pin, level)
    }

    fn output_many(&mut self, pins: &[PinId], level: Level) -> Result<(), DriverError> {
        // one lock for the whole set, other handles never see a partial update
        let mut state = self.lock();
        for pin in pins {
            state.drive(*pin, level)?;
        }
        Ok(())
    }

    fn cleanup(&mut self, pins: &[PinId]) -> Result<(), DriverError> {
        let mut state = self.lock();
        let mut unclaimed = Vec::new();
        for pin in pins {
            if !state.claimed.remove(pin) {
                unclaimed.push(*pin);
                continue;
            }
            state.levels.remove(pin);
            *state.release_count.entry(*pin).or_insert(0) += 1;
            state.events.push(GpioEvent::Cleanup(*pin));
        }
        trace!(LOG_TAG, "pins {:?} released", pins);
        if !unclaimed.is_empty() {
            return Err(DriverError::gpio(format!("dummy gpio: cleanup of unclaimed pins {:?}", unclaimed)));
        }
        Ok(())
    }
}
