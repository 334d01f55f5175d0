//! buffered shift register factory
use super::gpio_factory::GpioFactory;
use super::traits::Factory;
use crate::common::error::DriverError;
use crate::common::setting::Settings;
use crate::driver::shift_reg::entity::PortStruct;
use crate::driver::shift_reg::shift_reg_buffered::ShiftRegBuffered;
use crate::driver::shift_reg::shift_reg_gpio::ShiftRegGpio;
use crate::info;

const LOG_TAG: &str = "shift_reg_factory";

pub struct ShiftRegFactory {
    gpio_factory: GpioFactory,
}

impl Factory for ShiftRegFactory {
    type Product = ShiftRegBuffered<ShiftRegGpio>;
    type Config = Settings;

    fn get_type(&self) -> String {
        "shift_register".to_string()
    }

    fn create(&self, settings: &Settings) -> Result<ShiftRegBuffered<ShiftRegGpio>, DriverError> {
        let gpio = self.gpio_factory.create_from_setting(&settings.gpio)?;

        let config = &settings.shift_register;
        let ports = PortStruct::new(config.si, config.clk, config.rck, config.sclr);
        let shift_reg = ShiftRegGpio::new_chained(gpio, ports, config.num_of_slaves)?;
        info!(LOG_TAG, "{} ready: {}", self.get_type(), shift_reg);

        Ok(ShiftRegBuffered::new(shift_reg))
    }
}

impl ShiftRegFactory {
    pub fn new() -> Self {
        ShiftRegFactory { gpio_factory: GpioFactory::new() }
    }

    pub fn with_gpio_factory(gpio_factory: GpioFactory) -> Self {
        ShiftRegFactory { gpio_factory }
    }
}
