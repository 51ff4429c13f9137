//! Asynchronous variant of the [`Mcp23017`](crate::Mcp23017) driver, using
//! [`embedded_hal_async::i2c::I2c`].
//!
//! This module is only built if the `"async"` feature is enabled.  Every register write is
//! awaited before the shadow is updated, so a cancelled or failed operation never leaves the
//! shadow ahead of the chip.
//!
//! **Concurrency caution**: the driver does no queuing of its own.  Mutating operations take
//! `&mut self`, which already forces callers to run them one after the other.
use crate::bus::AsyncI2cExt;
use crate::error::{Context, ErrorHandler, ErrorSink};
use crate::register::{Bank, PinIndex};
use crate::shadow::{Shadow, Update};
use crate::{Address, Direction, Error, IntoLevel, Level};
use embedded_hal_async::i2c::I2c;

/// Async `MCP23017` driver.
pub struct Mcp23017Async<I2C: I2c> {
    i2c: I2C,
    addr: u8,
    shadow: Shadow,
    errors: ErrorSink<I2C::Error>,
}

impl<I2C: I2c> Mcp23017Async<I2C> {
    /// Create a driver and put the chip into its default state (all inputs, all latches low).
    pub async fn new(i2c: I2C, address: Address) -> Result<Self, Error<I2C::Error>> {
        let mut drv = Self {
            i2c,
            addr: address.into(),
            shadow: Shadow::new(),
            errors: ErrorSink::new(),
        };
        drv.reset().await?;
        Ok(drv)
    }

    /// See [`Mcp23017::reset()`](crate::Mcp23017::reset).
    pub async fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("reset of device {:#x}", self.addr);
        let mut result = Ok(());
        for update in Shadow::reset_sequence() {
            if let Err(e) = self.apply(update).await {
                let e = self.errors.report(Context::Reset, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// See [`Mcp23017::pin_mode()`](crate::Mcp23017::pin_mode).
    pub async fn pin_mode(
        &mut self,
        pin: u8,
        direction: Direction,
    ) -> Result<(), Error<I2C::Error>> {
        let pin = PinIndex::new(pin).map_err(|e| self.errors.report(Context::PinMode, e))?;
        let Some(update) = self.shadow.direction_update(pin, direction) else {
            debug!("pin {} already has direction {:?}", pin.number(), direction);
            return Ok(());
        };
        self.apply(update)
            .await
            .map_err(|e| self.errors.report(Context::PinMode, e))
    }

    /// See [`Mcp23017::digital_write()`](crate::Mcp23017::digital_write).
    pub async fn digital_write<V: IntoLevel>(
        &mut self,
        pin: u8,
        value: V,
    ) -> Result<(), Error<I2C::Error>> {
        let level = value
            .into_level()
            .map_err(|raw| self.errors.report(Context::DigitalWrite, Error::InvalidValue(raw)))?;
        let pin = PinIndex::new(pin).map_err(|e| self.errors.report(Context::DigitalWrite, e))?;
        let Some(update) = self.shadow.output_update(pin, level) else {
            debug!("pin {} already at {:?}", pin.number(), level);
            return Ok(());
        };
        self.apply(update)
            .await
            .map_err(|e| self.errors.report(Context::DigitalWrite, e))
    }

    /// See [`Mcp23017::digital_read()`](crate::Mcp23017::digital_read).
    pub async fn digital_read(&mut self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        let pin = PinIndex::new(pin).map_err(|e| self.errors.report(Context::DigitalRead, e))?;
        let reg = pin.bank().input_register();
        let value = match self.i2c.read_reg(self.addr, reg).await {
            Ok(v) => v,
            Err(e) => return Err(self.errors.report(Context::DigitalRead, Error::Bus(e))),
        };
        trace!("read {:?} = {:#x}", reg, value);
        Ok(value & pin.mask() == pin.mask())
    }

    /// Level `pin` was last driven to, taken from the shadow.
    pub fn output_level(&self, pin: u8) -> Result<Level, Error<I2C::Error>> {
        let pin = PinIndex::new(pin)?;
        Ok(self.shadow.is_output_set(pin).into())
    }

    /// Register the error handler, replacing any previous one.
    pub fn set_error_handler(&mut self, handler: ErrorHandler<I2C::Error>) {
        self.errors.set(handler);
    }

    /// Remove the registered error handler, if any.
    pub fn clear_error_handler(&mut self) {
        self.errors.clear();
    }

    /// Shadow of IODIRA.
    pub fn direction_a(&self) -> u8 {
        self.shadow.direction(Bank::A)
    }

    /// Shadow of IODIRB.
    pub fn direction_b(&self) -> u8 {
        self.shadow.direction(Bank::B)
    }

    /// Shadow of OLATA.
    pub fn output_a(&self) -> u8 {
        self.shadow.output(Bank::A)
    }

    /// Shadow of OLATB.
    pub fn output_b(&self) -> u8 {
        self.shadow.output(Bank::B)
    }

    /// 7-bit bus address of the chip.
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Destroy the driver and give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn apply(&mut self, update: Update) -> Result<(), Error<I2C::Error>> {
        trace!("write {:?} = {:#x}", update.register, update.value);
        self.i2c
            .write_reg(self.addr, update.register, update.value)
            .await
            .map_err(Error::Bus)?;
        self.shadow.commit(update);
        Ok(())
    }
}
