//! setting config file
//! read from config_{ENV}.toml, ENV defaults to dev

use std::{fs::File, io::Read};
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use lazy_static::lazy_static;
use serde_derive::Deserialize;
use super::error::DriverError;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Env {
    pub debug: bool,
    pub env: String,
    pub log_level: String,
}

impl Default for Env {
    fn default() -> Self {
        Env {
            debug: false,
            env: String::from("dev"),
            log_level: String::from("info"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Gpio {
    /// backend name, "dummy" or "rpi"
    pub backend: String,
    /// use the simulator when the configured backend cannot be opened
    pub fallback_to_dummy: bool,
    /// delay between two edges of any pulse, in microseconds
    pub edge_delay_us: u64,
}

impl Default for Gpio {
    fn default() -> Self {
        Gpio {
            backend: String::from("dummy"),
            fallback_to_dummy: false,
            edge_delay_us: 0,
        }
    }
}

impl Gpio {
    pub fn edge_delay(&self) -> Duration {
        Duration::from_micros(self.edge_delay_us)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShiftRegister {
    pub si: u8,
    pub clk: u8,
    pub rck: u8,
    pub sclr: u8,
    // signed on purpose, a negative count is reported instead of failing the parse
    pub num_of_slaves: i64,
}

impl Default for ShiftRegister {
    fn default() -> Self {
        ShiftRegister {
            si: 17,
            clk: 27,
            rck: 22,
            sclr: 23,
            num_of_slaves: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Demo {
    pub step_ms: u64,
}

impl Default for Demo {
    fn default() -> Self {
        Demo { step_ms: 200 }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub env: Env,
    pub gpio: Gpio,
    pub shift_register: ShiftRegister,
    pub demo: Demo,
}

impl Settings {
    /// Settings file name for the current ENV
    pub fn file_path() -> String {
        let env = match env::var("ENV") {
            Ok(e) => e,
            Err(_) => String::from("dev"),
        };
        format!("config_{}.toml", env)
    }

    pub fn from_toml_str(str_val: &str) -> Result<Self, DriverError> {
        toml::from_str(str_val)
            .map_err(|e| DriverError::config(format!("config file format invalid: {}", e)))
    }

    /// Read the settings file, a missing file yields the built-in defaults
    pub fn load() -> Result<Self, DriverError> {
        let file_path = Self::file_path();

        let mut file = match File::open(file_path.as_str()) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("no config file {} ({}), using defaults", file_path, e);
                return Ok(Settings::default());
            }
        };

        let mut str_val = String::new();
        file.read_to_string(&mut str_val)
            .map_err(|e| DriverError::config(format!("cannot read config file {}: {}", file_path, e)))?;

        Self::from_toml_str(&str_val)
    }

    pub fn get<'a>() -> &'a Self {
        lazy_static! {
            static ref CACHE: Settings = match Settings::load() {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("{}, using defaults", e);
                    Settings::default()
                }
            };
        }
        &CACHE
    }
}

static EDGE_DELAY: OnceLock<Duration> = OnceLock::new();

/// Fix the process-wide inter-edge delay, only allowed before the first read
pub fn set_edge_delay(delay: Duration) -> Result<(), DriverError> {
    EDGE_DELAY.set(delay).map_err(|_| {
        DriverError::config(format!("edge delay already fixed at {:?}", edge_delay()))
    })
}

/// Process-wide inter-edge delay, frozen on first read
pub fn edge_delay() -> Duration {
    *EDGE_DELAY.get_or_init(|| Settings::get().gpio.edge_delay())
}
