//! dummy gpio backend factory
use super::traits::Factory;
use crate::common::error::DriverError;
use crate::common::setting;
use crate::driver::gpio::dummy_gpio::DummyGpio;
use crate::driver::gpio::traits::GpioBackend;

pub struct DummyFactory {
    // handed out instead of a fresh simulator, lets the caller watch the backend
    prototype: Option<DummyGpio>,
}

impl Factory for DummyFactory {
    type Product = Box<dyn GpioBackend>;
    type Config = setting::Gpio;

    fn get_type(&self) -> String {
        "dummy".to_string()
    }

    fn create(&self, _config: &setting::Gpio) -> Result<Box<dyn GpioBackend>, DriverError> {
        let gpio = match &self.prototype {
            Some(gpio) => gpio.clone(),
            None => DummyGpio::new(),
        };
        Ok(Box::new(gpio))
    }
}

impl DummyFactory {
    pub fn new() -> Self {
        DummyFactory { prototype: None }
    }

    pub fn with_backend(gpio: DummyGpio) -> Self {
        DummyFactory { prototype: Some(gpio) }
    }
}
