//! Blocking driver for the `MCP23017` "16-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/devicedoc/20001952c.pdf
//!
//! The driver keeps a shadow copy of the IODIR and OLAT registers of both banks.  Single pins are
//! changed by modifying the shadow and writing the whole register byte back, without reading the
//! register from the chip first.  A write that would not change the register is skipped.
use crate::bus::I2cExt;
use crate::error::{Context, ErrorHandler, ErrorSink};
use crate::register::{Bank, PinIndex};
use crate::shadow::{Shadow, Update};
use crate::{Address, Direction, Error, IntoLevel, Level};
use embedded_hal::i2c::I2c;

/// Blocking `MCP23017` driver.
pub struct Mcp23017<I2C: I2c> {
    i2c: I2C,
    addr: u8,
    shadow: Shadow,
    errors: ErrorSink<I2C::Error>,
}

impl<I2C: I2c> Mcp23017<I2C> {
    /// Create a driver and put the chip into its default state (all inputs, all latches low).
    pub fn new(i2c: I2C, address: Address) -> Result<Self, Error<I2C::Error>> {
        let mut drv = Self {
            i2c,
            addr: address.into(),
            shadow: Shadow::new(),
            errors: ErrorSink::new(),
        };
        drv.reset()?;
        Ok(drv)
    }

    /// Force both banks back to all-input with all output latches low.
    ///
    /// All four register writes are always attempted.  Each failure goes to the error handler,
    /// the first one is returned once the sequence is done.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("reset of device {:#x}", self.addr);
        let mut result = Ok(());
        for update in Shadow::reset_sequence() {
            if let Err(e) = self.apply(update) {
                let e = self.errors.report(Context::Reset, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Configure `pin` (0..=15) as input or output.
    pub fn pin_mode(&mut self, pin: u8, direction: Direction) -> Result<(), Error<I2C::Error>> {
        let pin = PinIndex::new(pin).map_err(|e| self.errors.report(Context::PinMode, e))?;
        match self.shadow.direction_update(pin, direction) {
            Some(update) => self
                .apply(update)
                .map_err(|e| self.errors.report(Context::PinMode, e)),
            None => {
                debug!("pin {} already has direction {:?}", pin.number(), direction);
                Ok(())
            }
        }
    }

    /// Drive output `pin` to `value`.
    ///
    /// Accepts `true`, `false`, `0`, `1` and [`Level`]s.  Any other value is reported as
    /// [`Error::InvalidValue`] and nothing is written.
    pub fn digital_write<V: IntoLevel>(
        &mut self,
        pin: u8,
        value: V,
    ) -> Result<(), Error<I2C::Error>> {
        let level = value
            .into_level()
            .map_err(|raw| self.errors.report(Context::DigitalWrite, Error::InvalidValue(raw)))?;
        let pin = PinIndex::new(pin).map_err(|e| self.errors.report(Context::DigitalWrite, e))?;
        self.write_level(pin, level)
            .map_err(|e| self.errors.report(Context::DigitalWrite, e))
    }

    /// Read the current electrical level of `pin` from the GPIO register.
    ///
    /// The shadow state is not touched.
    pub fn digital_read(&mut self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        let pin = PinIndex::new(pin).map_err(|e| self.errors.report(Context::DigitalRead, e))?;
        let reg = pin.bank().input_register();
        let value = self
            .i2c
            .read_reg(self.addr, reg)
            .map_err(|e| self.errors.report(Context::DigitalRead, Error::Bus(e)))?;
        trace!("read {:?} = {:#x}", reg, value);
        Ok(value & pin.mask() == pin.mask())
    }

    /// Level `pin` was last driven to, taken from the shadow.  No bus traffic.
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

    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Destroy the driver and give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_level(&mut self, pin: PinIndex, level: Level) -> Result<(), Error<I2C::Error>> {
        match self.shadow.output_update(pin, level) {
            Some(update) => self.apply(update),
            None => {
                debug!("pin {} already at {:?}", pin.number(), level);
                Ok(())
            }
        }
    }

    fn apply(&mut self, update: Update) -> Result<(), Error<I2C::Error>> {
        trace!("write {:?} = {:#x}", update.register, update.value);
        self.i2c
            .write_reg(self.addr, update.register, update.value)
            .map_err(Error::Bus)?;
        self.shadow.commit(update);
        Ok(())
    }
}

impl<I2C: I2c> crate::PortDriver for Mcp23017<I2C> {
    type Error = Error<I2C::Error>;

    fn set_direction(&mut self, pin: u8, dir: Direction) -> Result<(), Self::Error> {
        self.pin_mode(pin, dir)
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), Self::Error> {
        self.digital_write(pin, level)
    }

    fn read(&mut self, pin: u8) -> Result<bool, Self::Error> {
        self.digital_read(pin)
    }

    fn is_set(&mut self, pin: u8) -> Result<bool, Self::Error> {
        self.output_level(pin).map(Level::is_high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x20;

    fn reset_expectations() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(ADDR, vec![0x00, 0xff]),
            I2cTransaction::write(ADDR, vec![0x14, 0x00]),
            I2cTransaction::write(ADDR, vec![0x01, 0xff]),
            I2cTransaction::write(ADDR, vec![0x15, 0x00]),
        ]
    }

    fn with_reset(rest: &[I2cTransaction]) -> Vec<I2cTransaction> {
        let mut all = reset_expectations();
        all.extend_from_slice(rest);
        all
    }

    #[test]
    fn construction_resets_chip() {
        let mut i2c = I2cMock::new(&reset_expectations());

        let mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        assert_eq!(mcp.direction_a(), 0xff);
        assert_eq!(mcp.direction_b(), 0xff);
        assert_eq!(mcp.output_a(), 0x00);
        assert_eq!(mcp.output_b(), 0x00);
        assert_eq!(mcp.address(), 0x20);

        i2c.done();
    }

    #[test]
    fn pin_mode() {
        let mut i2c = I2cMock::new(&with_reset(&[
            I2cTransaction::write(ADDR, vec![0x00, 0xf7]),
            I2cTransaction::write(ADDR, vec![0x01, 0xef]),
            I2cTransaction::write(ADDR, vec![0x01, 0xff]),
        ]));

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        mcp.pin_mode(3, Direction::Output).unwrap();
        mcp.pin_mode(12, Direction::Output).unwrap();
        assert_eq!(mcp.direction_a(), 0xf7);
        assert_eq!(mcp.direction_b(), 0xef);

        // no-ops must not touch the bus
        mcp.pin_mode(3, Direction::Output).unwrap();
        mcp.pin_mode(0, Direction::Input).unwrap();

        mcp.pin_mode(12, Direction::Input).unwrap();
        assert_eq!(mcp.direction_b(), 0xff);

        i2c.done();
    }

    #[test]
    fn digital_write() {
        let mut i2c = I2cMock::new(&with_reset(&[
            I2cTransaction::write(ADDR, vec![0x14, 0x08]),
            I2cTransaction::write(ADDR, vec![0x15, 0x80]),
            I2cTransaction::write(ADDR, vec![0x14, 0x00]),
        ]));

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        mcp.digital_write(3, true).unwrap();
        assert_eq!(mcp.output_a(), 0x08);
        assert_eq!(mcp.output_level(3), Ok(Level::High));

        // already low, no write
        mcp.digital_write(12, false).unwrap();
        assert_eq!(mcp.output_b(), 0x00);

        mcp.digital_write(15, 1u8).unwrap();
        assert_eq!(mcp.output_b(), 0x80);
        // idempotent
        mcp.digital_write(15, 1).unwrap();

        mcp.digital_write(3, 0).unwrap();
        assert_eq!(mcp.output_a(), 0x00);

        i2c.done();
    }

    #[test]
    fn output_round_trip() {
        let mut i2c = I2cMock::new(&with_reset(&[
            I2cTransaction::write(ADDR, vec![0x01, 0xfd]),
            I2cTransaction::write(ADDR, vec![0x15, 0x02]),
        ]));

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        mcp.pin_mode(9, Direction::Output).unwrap();
        mcp.digital_write(9, Level::High).unwrap();
        mcp.digital_write(9, Level::High).unwrap();
        assert_eq!(mcp.output_b() & 0x02, 0x02);

        i2c.done();
    }

    #[test]
    fn digital_read() {
        let mut i2c = I2cMock::new(&with_reset(&[
            I2cTransaction::write_read(ADDR, vec![0x12], vec![0x80]),
            I2cTransaction::write_read(ADDR, vec![0x12], vec![0x7f]),
            I2cTransaction::write_read(ADDR, vec![0x13], vec![0x01]),
        ]));

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        assert!(mcp.digital_read(7).unwrap());
        assert!(!mcp.digital_read(7).unwrap());
        assert!(mcp.digital_read(8).unwrap());

        // reads never change the shadow
        assert_eq!(mcp.direction_a(), 0xff);
        assert_eq!(mcp.output_a(), 0x00);
        assert_eq!(mcp.output_b(), 0x00);

        i2c.done();
    }

    static INVALID_VALUE_REPORTS: AtomicUsize = AtomicUsize::new(0);

    fn on_invalid_value(report: crate::ErrorReport<'_, ErrorKind>) {
        assert_eq!(report.context, Context::DigitalWrite);
        assert_eq!(*report.error, Error::InvalidValue(2));
        INVALID_VALUE_REPORTS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn invalid_value_is_reported_and_dropped() {
        let mut i2c = I2cMock::new(&reset_expectations());

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        mcp.set_error_handler(on_invalid_value);

        assert_eq!(mcp.digital_write(3, 2), Err(Error::InvalidValue(2)));
        assert_eq!(INVALID_VALUE_REPORTS.load(Ordering::SeqCst), 1);
        assert_eq!(mcp.output_a(), 0x00);

        i2c.done();
    }

    #[test]
    fn invalid_pins_are_rejected() {
        let mut i2c = I2cMock::new(&reset_expectations());

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        assert_eq!(
            mcp.pin_mode(16, Direction::Output),
            Err(Error::InvalidPin(16))
        );
        assert_eq!(mcp.digital_write(16, true), Err(Error::InvalidPin(16)));
        assert_eq!(mcp.digital_read(42), Err(Error::InvalidPin(42)));
        // value is checked before the pin
        assert_eq!(mcp.digital_write(16, 7), Err(Error::InvalidValue(7)));
        assert_eq!(mcp.direction_a(), 0xff);
        assert_eq!(mcp.direction_b(), 0xff);

        i2c.done();
    }

    static READ_FAILURES: AtomicUsize = AtomicUsize::new(0);

    fn on_read_failure(report: crate::ErrorReport<'_, ErrorKind>) {
        assert_eq!(report.context, Context::DigitalRead);
        assert_eq!(*report.error, Error::Bus(ErrorKind::Other));
        READ_FAILURES.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn read_failure_goes_to_handler_and_caller() {
        let mut i2c = I2cMock::new(&with_reset(&[I2cTransaction::write_read(
            ADDR,
            vec![0x13],
            vec![0x00],
        )
        .with_error(ErrorKind::Other)]));

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        mcp.set_error_handler(on_read_failure);
        assert_eq!(mcp.digital_read(10), Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(READ_FAILURES.load(Ordering::SeqCst), 1);

        i2c.done();
    }

    #[test]
    fn failed_write_keeps_shadow() {
        let mut i2c = I2cMock::new(&with_reset(&[
            I2cTransaction::write(ADDR, vec![0x00, 0xfe]).with_error(ErrorKind::Other),
            I2cTransaction::write(ADDR, vec![0x00, 0xfe]),
            I2cTransaction::write(ADDR, vec![0x14, 0x01]).with_error(ErrorKind::Other),
        ]));

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        assert_eq!(
            mcp.pin_mode(0, Direction::Output),
            Err(Error::Bus(ErrorKind::Other))
        );
        assert_eq!(mcp.direction_a(), 0xff);

        // retrying issues the same write again
        mcp.pin_mode(0, Direction::Output).unwrap();
        assert_eq!(mcp.direction_a(), 0xfe);

        assert_eq!(
            mcp.digital_write(0, true),
            Err(Error::Bus(ErrorKind::Other))
        );
        assert_eq!(mcp.output_a(), 0x00);

        i2c.done();
    }

    #[test]
    fn reset_restores_defaults() {
        let mut expectations = with_reset(&[
            I2cTransaction::write(ADDR, vec![0x01, 0x7f]),
            I2cTransaction::write(ADDR, vec![0x15, 0x80]),
        ]);
        expectations.extend(reset_expectations());
        let mut i2c = I2cMock::new(&expectations);

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        mcp.pin_mode(15, Direction::Output).unwrap();
        mcp.digital_write(15, true).unwrap();
        mcp.reset().unwrap();
        assert_eq!(mcp.direction_b(), 0xff);
        assert_eq!(mcp.output_b(), 0x00);

        i2c.done();
    }

    #[test]
    fn reset_failure_is_returned() {
        // the remaining writes still go out after a failure
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(ADDR, vec![0x00, 0xff]),
            I2cTransaction::write(ADDR, vec![0x14, 0x00]).with_error(ErrorKind::Other),
            I2cTransaction::write(ADDR, vec![0x01, 0xff]),
            I2cTransaction::write(ADDR, vec![0x15, 0x00]),
        ]);

        let res = Mcp23017::new(&mut i2c, Address::default());
        assert!(matches!(res, Err(Error::Bus(ErrorKind::Other))));

        i2c.done();
    }

    static RESET_FAILURES: AtomicUsize = AtomicUsize::new(0);

    fn on_reset_failure(report: crate::ErrorReport<'_, ErrorKind>) {
        assert_eq!(report.context, Context::Reset);
        RESET_FAILURES.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn reset_continues_past_failed_write() {
        let mut i2c = I2cMock::new(&with_reset(&[
            I2cTransaction::write(ADDR, vec![0x00, 0xfe]),
            I2cTransaction::write(ADDR, vec![0x15, 0x10]),
            // second reset, IODIRA is not acknowledged
            I2cTransaction::write(ADDR, vec![0x00, 0xff]).with_error(ErrorKind::Other),
            I2cTransaction::write(ADDR, vec![0x14, 0x00]),
            I2cTransaction::write(ADDR, vec![0x01, 0xff]),
            I2cTransaction::write(ADDR, vec![0x15, 0x00]),
        ]));

        let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
        mcp.pin_mode(0, Direction::Output).unwrap();
        mcp.digital_write(12, true).unwrap();
        mcp.set_error_handler(on_reset_failure);

        assert_eq!(mcp.reset(), Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(RESET_FAILURES.load(Ordering::SeqCst), 1);

        // only the acknowledged writes reached the shadow
        assert_eq!(mcp.direction_a(), 0xfe);
        assert_eq!(mcp.output_a(), 0x00);
        assert_eq!(mcp.direction_b(), 0xff);
        assert_eq!(mcp.output_b(), 0x00);

        i2c.done();
    }

    #[test]
    fn strapped_address() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(0x25, vec![0x00, 0xff]),
            I2cTransaction::write(0x25, vec![0x14, 0x00]),
            I2cTransaction::write(0x25, vec![0x01, 0xff]),
            I2cTransaction::write(0x25, vec![0x15, 0x00]),
        ]);

        let mcp = Mcp23017::new(&mut i2c, Address::from_pins(true, false, true)).unwrap();
        assert_eq!(mcp.address(), 0x25);

        i2c.done();
    }
}
