use std::collections::HashMap;

use super::dummy_factory::DummyFactory;
#[cfg(feature = "rpi")]
use super::rpi_factory::RpiFactory;
use super::traits::Factory;
use crate::common::error::DriverError;
use crate::common::setting;
use crate::driver::gpio::traits::GpioBackend;
use crate::{info, warn};

const LOG_TAG: &str = "gpio_factory";
const FALLBACK_BACKEND: &str = "dummy";

pub type BackendFactory = dyn Factory<Product = Box<dyn GpioBackend>, Config = setting::Gpio>;

pub struct GpioFactory {
    factory_map: HashMap<String, Box<BackendFactory>>,
}

impl GpioFactory {
    /// Factory knowing every backend compiled into the crate
    pub fn new() -> Self {
        let mut gpio_factory = GpioFactory { factory_map: HashMap::new() };
        gpio_factory.register(Box::new(DummyFactory::new()));
        #[cfg(feature = "rpi")]
        gpio_factory.register(Box::new(RpiFactory::new()));
        gpio_factory
    }

    /// Add or replace the factory for its backend type
    pub fn register(&mut self, factory: Box<BackendFactory>) {
        self.factory_map.insert(factory.get_type(), factory);
    }

    pub fn create_backend(&self, config: &setting::Gpio) -> Result<Box<dyn GpioBackend>, DriverError> {
        let backend_type = config.backend.as_str();
        let factory = self.factory_map.get(backend_type).ok_or(DriverError::config(format!(
            "gpio backend not supported: {}",
            backend_type
        )))?;
        let gpio = factory.create(config)?;
        info!(LOG_TAG, "gpio backend created: {}", backend_type);
        Ok(gpio)
    }

    /// Backend named in settings. Falls back to the simulator only when the settings ask for it.
    pub fn create_from_setting(&self, config: &setting::Gpio) -> Result<Box<dyn GpioBackend>, DriverError> {
        match self.create_backend(config) {
            Ok(gpio) => Ok(gpio),
            Err(e) if config.fallback_to_dummy && config.backend != FALLBACK_BACKEND => {
                warn!(LOG_TAG, "{}, falling back to {} gpio", e, FALLBACK_BACKEND);
                let fallback = setting::Gpio {
                    backend: FALLBACK_BACKEND.to_string(),
                    fallback_to_dummy: false,
                    edge_delay_us: config.edge_delay_us,
                };
                self.create_backend(&fallback)
            }
            Err(e) => Err(e),
        }
    }
}
