use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // bad bit position, data word out of range, bad chain length, bad bit value
    InvalidArgument = 1001,
    // pin claim failed while building a driver
    HardwareConfigError = 1002,
    // pin drive or release failed on a built driver
    GpioError = 1003,
    // settings file or backend selection
    ConfigError = 1004,
}

/// Error raised by drivers and backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub code: ErrorCode,
    pub msg: String,
}

impl DriverError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DriverError { code: ErrorCode::InvalidArgument, msg: msg.into() }
    }

    pub fn hardware_config(msg: impl Into<String>) -> Self {
        DriverError { code: ErrorCode::HardwareConfigError, msg: msg.into() }
    }

    pub fn gpio(msg: impl Into<String>) -> Self {
        DriverError { code: ErrorCode::GpioError, msg: msg.into() }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        DriverError { code: ErrorCode::ConfigError, msg: msg.into() }
    }
}

impl Display for DriverError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "driver error code: {}, msg: {}", self.code as u16, self.msg)
    }
}

impl Error for DriverError {}
