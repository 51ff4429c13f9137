//! Host-side copies of the direction and output-latch registers.
//!
//! Mutations are planned first and committed only once the chip acknowledged the write, so the
//! shadow never runs ahead of the hardware.
use crate::register::{Bank, PinIndex, PortRegister, Register};
use crate::{Direction, Level};

/// Power-on value of IODIRA/IODIRB: every pin is an input.
pub const DIRECTION_DEFAULT: u8 = 0xff;
/// Power-on value of OLATA/OLATB.
pub const OUTPUT_DEFAULT: u8 = 0x00;

/// A single register write that is pending acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Update {
    pub register: Register,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadow {
    direction: [PortRegister; 2],
    output: [PortRegister; 2],
}

impl Shadow {
    pub const fn new() -> Self {
        Self {
            direction: [PortRegister::new(DIRECTION_DEFAULT); 2],
            output: [PortRegister::new(OUTPUT_DEFAULT); 2],
        }
    }

    /// Writes that bring the chip back to its default state, in bus order.
    pub const fn reset_sequence() -> [Update; 4] {
        [
            Update {
                register: Register::IODIRA,
                value: DIRECTION_DEFAULT,
            },
            Update {
                register: Register::OLATA,
                value: OUTPUT_DEFAULT,
            },
            Update {
                register: Register::IODIRB,
                value: DIRECTION_DEFAULT,
            },
            Update {
                register: Register::OLATB,
                value: OUTPUT_DEFAULT,
            },
        ]
    }

    pub fn direction(&self, bank: Bank) -> u8 {
        self.direction[bank.index()].bits()
    }

    pub fn output(&self, bank: Bank) -> u8 {
        self.output[bank.index()].bits()
    }

    pub fn is_output_set(&self, pin: PinIndex) -> bool {
        self.output[pin.bank().index()].is_set(pin.mask())
    }

    /// Plan the IODIR write for `pin`.  `None` if the pin already has direction `dir`.
    pub fn direction_update(&self, pin: PinIndex, dir: Direction) -> Option<Update> {
        let bank = pin.bank();
        Self::plan(
            self.direction[bank.index()],
            bank.direction_register(),
            pin.mask(),
            dir.is_input(),
        )
    }

    /// Plan the OLAT write for `pin`.  `None` if the pin already drives `level`.
    pub fn output_update(&self, pin: PinIndex, level: Level) -> Option<Update> {
        let bank = pin.bank();
        Self::plan(
            self.output[bank.index()],
            bank.output_register(),
            pin.mask(),
            level.is_high(),
        )
    }

    fn plan(current: PortRegister, register: Register, mask: u8, state: bool) -> Option<Update> {
        if current.is_set(mask) == state {
            return None;
        }
        Some(Update {
            register,
            value: current.with(mask, state).bits(),
        })
    }

    /// Record an acknowledged write.  Writes to registers that are not shadowed are ignored.
    pub fn commit(&mut self, update: Update) {
        let slot = match update.register {
            Register::IODIRA => &mut self.direction[0],
            Register::IODIRB => &mut self.direction[1],
            Register::OLATA => &mut self.output[0],
            Register::OLATB => &mut self.output[1],
            Register::GPIOA | Register::GPIOB => return,
        };
        *slot = PortRegister::new(update.value);
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::new()
    }
}
