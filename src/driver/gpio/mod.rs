//! Digital output backends
//! - dummy: in-process simulator, records every edge and models a SIPO chain
//! - rpi: Raspberry Pi header pins through rppal, needs the `rpi` feature

pub mod prelude;
pub mod traits;
pub mod dummy_gpio;
#[cfg(feature = "rpi")]
pub mod rpi_gpio;
