use crate::{Direction, Level, PortDriver, PortMutex};
use core::marker::PhantomData;
use embedded_hal::digital::{self as hal_digital, ErrorType};

/// Representation of a single MCP23017 pin.
///
/// `Pin` is not constructed directly, this type is created by wrapping a driver in an
/// [`Expander`](crate::Expander) and then getting access to all its pins using the `.split()`
/// method.
pub struct Pin<'a, MODE, MUTEX> {
    pin: u8,
    port_driver: &'a MUTEX,
    _m: PhantomData<MODE>,
}

impl<'a, MODE, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: PortDriver,
    MUTEX: PortMutex<Port = PD>,
{
    pub(crate) fn new(pin: u8, port_driver: &'a MUTEX) -> Self {
        assert!(pin < 16);
        Self {
            pin,
            port_driver,
            _m: PhantomData,
        }
    }

    /// Pin number in `0..=15`.
    pub fn number(&self) -> u8 {
        self.pin
    }

    pub fn into_input(self) -> Result<Pin<'a, crate::mode::Input, MUTEX>, PD::Error> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin, Direction::Input))?;
        Ok(Pin {
            pin: self.pin,
            port_driver: self.port_driver,
            _m: PhantomData,
        })
    }

    pub fn into_output(self) -> Result<Pin<'a, crate::mode::Output, MUTEX>, PD::Error> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin, Direction::Output))?;
        Ok(Pin {
            pin: self.pin,
            port_driver: self.port_driver,
            _m: PhantomData,
        })
    }

    /// Drive the latch to `level` first, then turn the pin into an output so it never glitches
    /// to the old latch value.
    pub fn into_output_level(
        self,
        level: Level,
    ) -> Result<Pin<'a, crate::mode::Output, MUTEX>, PD::Error> {
        self.port_driver.lock(|drv| drv.write(self.pin, level))?;
        self.into_output()
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: PortDriver,
    MUTEX: PortMutex<Port = PD>,
{
    pub fn is_high(&self) -> Result<bool, PD::Error> {
        self.port_driver.lock(|drv| drv.read(self.pin))
    }

    pub fn is_low(&self) -> Result<bool, PD::Error> {
        self.is_high().map(|b| !b)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: PortDriver,
    MUTEX: PortMutex<Port = PD>,
{
    pub fn set_high(&mut self) -> Result<(), PD::Error> {
        self.port_driver.lock(|drv| drv.write(self.pin, Level::High))
    }

    pub fn set_low(&mut self) -> Result<(), PD::Error> {
        self.port_driver.lock(|drv| drv.write(self.pin, Level::Low))
    }

    pub fn set_level(&mut self, level: Level) -> Result<(), PD::Error> {
        self.port_driver.lock(|drv| drv.write(self.pin, level))
    }

    /// Whether the pin was last set HIGH.  Answered from the shadow, no bus traffic.
    pub fn is_set_high(&self) -> Result<bool, PD::Error> {
        self.port_driver.lock(|drv| drv.is_set(self.pin))
    }

    pub fn is_set_low(&self) -> Result<bool, PD::Error> {
        self.is_set_high().map(|b| !b)
    }

    pub fn toggle(&mut self) -> Result<(), PD::Error> {
        self.port_driver.lock(|drv| drv.toggle(self.pin))
    }
}

impl<'a, MODE, MUTEX, PD> ErrorType for Pin<'a, MODE, MUTEX>
where
    PD: PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: PortMutex<Port = PD>,
{
    type Error = PD::Error;
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> hal_digital::InputPin for Pin<'a, MODE, MUTEX>
where
    PD: PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: PortMutex<Port = PD>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> hal_digital::OutputPin for Pin<'a, MODE, MUTEX>
where
    PD: PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: PortMutex<Port = PD>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> hal_digital::StatefulOutputPin
    for Pin<'a, MODE, MUTEX>
where
    PD: PortDriver,
    PD::Error: hal_digital::Error,
    MUTEX: PortMutex<Port = PD>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}
