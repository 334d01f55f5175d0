//! raspberry pi gpio backend factory
use super::traits::Factory;
use crate::common::error::DriverError;
use crate::common::setting;
use crate::driver::gpio::rpi_gpio::RpiGpio;
use crate::driver::gpio::traits::GpioBackend;

pub struct RpiFactory {}

impl Factory for RpiFactory {
    type Product = Box<dyn GpioBackend>;
    type Config = setting::Gpio;

    fn get_type(&self) -> String {
        "rpi".to_string()
    }

    fn create(&self, _config: &setting::Gpio) -> Result<Box<dyn GpioBackend>, DriverError> {
        Ok(Box::new(RpiGpio::new()?))
    }
}

impl RpiFactory {
    pub fn new() -> Self {
        RpiFactory {}
    }
}
