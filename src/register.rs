//! Register map and pin addressing of the MCP23017.
//!
//! The chip is split into two eight-bit banks.  Pins 0..=7 live on bank A (GPA0..GPA7), pins
//! 8..=15 on bank B (GPB0..GPB7).
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// N.B.: These values are for BANK=0, which is the reset state of the chip (and this driver does
/// not change).
pub enum Register {
    /// IODIR: input/output direction: 0=output; 1=input
    IODIRA = 0x00,
    /// IODIR: input/output direction: 0=output; 1=input
    IODIRB = 0x01,
    /// GPIO: reflects logic level on pins
    GPIOA = 0x12,
    /// GPIO: reflects logic level on pins
    GPIOB = 0x13,
    /// OLAT: output latches: sets state for pins configured as outputs
    OLATA = 0x14,
    /// OLAT: output latches: sets state for pins configured as outputs
    OLATB = 0x15,
}

impl From<Register> for u8 {
    fn from(r: Register) -> u8 {
        r as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    A,
    B,
}

impl Bank {
    pub fn direction_register(self) -> Register {
        match self {
            Bank::A => Register::IODIRA,
            Bank::B => Register::IODIRB,
        }
    }

    pub fn input_register(self) -> Register {
        match self {
            Bank::A => Register::GPIOA,
            Bank::B => Register::GPIOB,
        }
    }

    pub fn output_register(self) -> Register {
        match self {
            Bank::A => Register::OLATA,
            Bank::B => Register::OLATB,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Bank::A => 0,
            Bank::B => 1,
        }
    }
}

/// A pin number that is known to be in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinIndex(u8);

impl PinIndex {
    pub const COUNT: u8 = 16;

    pub fn new<E>(pin: u8) -> Result<Self, Error<E>> {
        if pin < Self::COUNT {
            Ok(Self(pin))
        } else {
            Err(Error::InvalidPin(pin))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn bank(self) -> Bank {
        if self.0 >= 8 {
            Bank::B
        } else {
            Bank::A
        }
    }

    /// Bit position inside the bank register.
    pub fn bit(self) -> u8 {
        self.0 % 8
    }

    pub fn mask(self) -> u8 {
        1 << self.bit()
    }
}

/// Contents of one eight-bit bank register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortRegister(u8);

impl PortRegister {
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether all bits in `mask` are set.
    pub const fn is_set(self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    pub const fn set(self, mask: u8) -> Self {
        Self(self.0 | mask)
    }

    pub const fn clear(self, mask: u8) -> Self {
        Self(self.0 & !mask)
    }

    pub const fn with(self, mask: u8, state: bool) -> Self {
        if state {
            self.set(mask)
        } else {
            self.clear(mask)
        }
    }
}
