//! Driver factories
//! - pick a gpio backend by name
//! - assemble a buffered shift register from settings

mod traits;
pub mod dummy_factory;
#[cfg(feature = "rpi")]
pub mod rpi_factory;
pub mod gpio_factory;
pub mod shift_reg_factory;

pub use traits::Factory;
