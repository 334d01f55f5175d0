pub mod traits;
pub mod gpio;
pub mod shift_reg;
pub mod factory;
