use crate::common::error::DriverError;
use super::prelude::*;

/// Digital output backend a driver claims its pins from
pub trait GpioBackend: Send {
    /// backend name, as used in settings
    fn get_type(&self) -> String;

    /// configure a pin as output, driven low
    fn setup_output(&mut self, pin: PinId) -> Result<(), DriverError>;

    /// drive one claimed pin
    fn output(&mut self, pin: PinId, level: Level) -> Result<(), DriverError>;

    /// drive several claimed pins to the same level
    fn output_many(&mut self, pins: &[PinId], level: Level) -> Result<(), DriverError> {
        for pin in pins {
            self.output(*pin, level)?;
        }
        Ok(())
    }

    /// release claimed pins, every claimed pin in `pins` is released even when some are not claimed
    fn cleanup(&mut self, pins: &[PinId]) -> Result<(), DriverError>;
}
