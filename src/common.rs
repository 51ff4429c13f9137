use crate::Error;
use embedded_hal::digital::PinState;

/// Interface between [`Pin`](crate::Pin) objects and the chip driver.
///
/// All pin numbers are in `0..=15`; the driver validates them anyway.
pub trait PortDriver {
    type Error;

    /// Configure `pin` as input or output.
    fn set_direction(&mut self, pin: u8, dir: Direction) -> Result<(), Self::Error>;

    /// Drive output `pin` to `level`.
    fn write(&mut self, pin: u8, level: Level) -> Result<(), Self::Error>;

    /// Sample the electrical level of `pin` from the chip.
    fn read(&mut self, pin: u8) -> Result<bool, Self::Error>;

    /// Check whether `pin` was last set HIGH.  Must not touch the bus.
    fn is_set(&mut self, pin: u8) -> Result<bool, Self::Error>;

    fn toggle(&mut self, pin: u8) -> Result<(), Self::Error> {
        let level = if self.is_set(pin)? {
            Level::Low
        } else {
            Level::High
        };
        self.write(pin, level)
    }
}

/// I2C device address of the chip.
///
/// The MCP23017 answers on `0x20..=0x27`, selected with the three address straps.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    pub const BASE: u8 = 0x20;

    pub fn from_pins(a0: bool, a1: bool, a2: bool) -> Self {
        Address(Self::BASE | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8))
    }
}

impl Default for Address {
    fn default() -> Self {
        Address(Self::BASE)
    }
}

impl From<u8> for Address {
    fn from(a: u8) -> Self {
        Address(a)
    }
}

impl From<Address> for u8 {
    fn from(a: Address) -> u8 {
        a.0
    }
}

/// Pin direction as stored in the IODIR registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Numeric sentinel for inputs (IODIR bit set).
    pub const INPUT: u8 = 1;
    /// Numeric sentinel for outputs (IODIR bit clear).
    pub const OUTPUT: u8 = 0;

    pub(crate) fn is_input(self) -> bool {
        self == Direction::Input
    }
}

impl From<Direction> for u8 {
    fn from(d: Direction) -> u8 {
        match d {
            Direction::Input => Direction::INPUT,
            Direction::Output => Direction::OUTPUT,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error<core::convert::Infallible>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            Direction::INPUT => Ok(Direction::Input),
            Direction::OUTPUT => Ok(Direction::Output),
            other => Err(Error::InvalidDirection(other)),
        }
    }
}

/// Logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const LOW: u8 = 0;
    pub const HIGH: u8 = 1;

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<PinState> for Level {
    fn from(state: PinState) -> Self {
        match state {
            PinState::Low => Level::Low,
            PinState::High => Level::High,
        }
    }
}

impl From<Level> for PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        }
    }
}

/// Values accepted by `digital_write()`.
///
/// Booleans and levels always convert.  Integers convert only when they are exactly `0` or `1`,
/// anything else is rejected with the raw value.
pub trait IntoLevel {
    /// Normalize into a [`Level`], or return the offending raw value.
    fn into_level(self) -> Result<Level, i32>;
}

impl IntoLevel for bool {
    fn into_level(self) -> Result<Level, i32> {
        Ok(self.into())
    }
}

impl IntoLevel for Level {
    fn into_level(self) -> Result<Level, i32> {
        Ok(self)
    }
}

impl IntoLevel for PinState {
    fn into_level(self) -> Result<Level, i32> {
        Ok(self.into())
    }
}

impl IntoLevel for i32 {
    fn into_level(self) -> Result<Level, i32> {
        match self {
            0 => Ok(Level::Low),
            1 => Ok(Level::High),
            other => Err(other),
        }
    }
}

impl IntoLevel for u8 {
    fn into_level(self) -> Result<Level, i32> {
        i32::from(self).into_level()
    }
}

/// Pin Modes
pub mod mode {
    /// Trait for pin-modes which can be used to set a logic level.
    pub trait HasOutput {}
    /// Trait for pin-modes which can be used to read a logic level.
    pub trait HasInput {}

    /// Pin configured as an input.
    pub struct Input;
    impl HasInput for Input {}

    /// Pin configured as an output.
    pub struct Output;
    impl HasOutput for Output {}
}
