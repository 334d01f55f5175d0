//! common factory trait
use crate::common::error::DriverError;

pub trait Factory {
    type Product;
    type Config;

    /// name the factory is registered under
    fn get_type(&self) -> String;

    fn create(&self, config: &Self::Config) -> Result<Self::Product, DriverError>;
}
