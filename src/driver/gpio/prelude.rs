use num_bigint::BigUint;

// gpio pin number
pub type PinId = u8;
// register data word, one bit per output, as wide as the chain
pub type DataWord = BigUint;
// outputs per register
pub const REGISTER_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value { Level::High } else { Level::Low }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}
