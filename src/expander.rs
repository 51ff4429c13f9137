//! Pin-level access to an [`Mcp23017`].
//!
//! The driver is moved into a [`PortMutex`] and split into sixteen [`Pin`](crate::Pin) objects,
//! GPA0..GPA7 for pins 0..=7 and GPB0..GPB7 for pins 8..=15.  All pins start out as inputs, which
//! is the state the driver leaves the chip in after `reset()`.
use crate::{Mcp23017, PortMutex};
use embedded_hal::i2c::I2c;

/// `MCP23017` whose pins can be handed out individually.
pub struct Expander<M>(M);

impl<I2C: I2c> Expander<core::cell::RefCell<Mcp23017<I2C>>> {
    pub fn new(driver: Mcp23017<I2C>) -> Self {
        Self::with_mutex(driver)
    }
}

impl<I2C, M> Expander<M>
where
    I2C: I2c,
    M: PortMutex<Port = Mcp23017<I2C>>,
{
    pub fn with_mutex(driver: Mcp23017<I2C>) -> Self {
        Self(PortMutex::create(driver))
    }

    /// Run `f` with exclusive access to the driver, e.g. to read the shadow registers.
    pub fn lock<R, F: FnOnce(&mut Mcp23017<I2C>) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }

    pub fn split<'a>(&'a mut self) -> Parts<'a, I2C, M> {
        Parts {
            gpa0: crate::Pin::new(0, &self.0),
            gpa1: crate::Pin::new(1, &self.0),
            gpa2: crate::Pin::new(2, &self.0),
            gpa3: crate::Pin::new(3, &self.0),
            gpa4: crate::Pin::new(4, &self.0),
            gpa5: crate::Pin::new(5, &self.0),
            gpa6: crate::Pin::new(6, &self.0),
            gpa7: crate::Pin::new(7, &self.0),
            gpb0: crate::Pin::new(8, &self.0),
            gpb1: crate::Pin::new(9, &self.0),
            gpb2: crate::Pin::new(10, &self.0),
            gpb3: crate::Pin::new(11, &self.0),
            gpb4: crate::Pin::new(12, &self.0),
            gpb5: crate::Pin::new(13, &self.0),
            gpb6: crate::Pin::new(14, &self.0),
            gpb7: crate::Pin::new(15, &self.0),
        }
    }

    pub fn into_inner(self) -> M {
        self.0
    }
}

pub struct Parts<'a, I2C, M = core::cell::RefCell<Mcp23017<I2C>>>
where
    I2C: I2c,
    M: PortMutex<Port = Mcp23017<I2C>>,
{
    pub gpa0: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa1: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa2: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa3: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa4: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa5: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa6: crate::Pin<'a, crate::mode::Input, M>,
    pub gpa7: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb0: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb1: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb2: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb3: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb4: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb5: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb6: crate::Pin<'a, crate::mode::Input, M>,
    pub gpb7: crate::Pin<'a, crate::mode::Input, M>,
}
