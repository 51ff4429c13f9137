use core::fmt;

/// Errors reported by the MCP23017 drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying I2C transfer failed.
    Bus(E),
    /// Pin number outside of `0..=15`.
    InvalidPin(u8),
    /// A level other than `0`, `1`, `true` or `false` was passed to `digital_write()`.
    InvalidValue(i32),
    /// A direction sentinel other than `INPUT` (1) or `OUTPUT` (0).
    InvalidDirection(u8),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Error::InvalidPin(pin) => write!(f, "invalid pin {}", pin),
            Error::InvalidValue(value) => write!(f, "invalid value {}", value),
            Error::InvalidDirection(dir) => write!(f, "invalid direction {}", dir),
        }
    }
}

impl<E: fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Operation during which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Context {
    Reset,
    PinMode,
    DigitalWrite,
    DigitalRead,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Context::Reset => "MCP23017 > reset",
            Context::PinMode => "MCP23017 > pin mode",
            Context::DigitalWrite => "MCP23017 > digital write",
            Context::DigitalRead => "MCP23017 > digital read",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the registered error handler gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorReport<'a, E> {
    pub context: Context,
    pub error: &'a Error<E>,
}

/// Error handler slot.  Only one handler can be registered at a time.
pub type ErrorHandler<E> = fn(ErrorReport<'_, E>);

/// Single-slot error observer shared by the blocking and async drivers.
pub(crate) struct ErrorSink<E> {
    handler: Option<ErrorHandler<E>>,
}

impl<E> ErrorSink<E> {
    pub(crate) const fn new() -> Self {
        Self { handler: None }
    }

    pub(crate) fn set(&mut self, handler: ErrorHandler<E>) {
        self.handler = Some(handler);
    }

    pub(crate) fn clear(&mut self) {
        self.handler = None;
    }

    /// Hand `error` to the handler (if any) and give it back to the caller.
    pub(crate) fn report(&self, context: Context, error: Error<E>) -> Error<E> {
        warn!("{}: operation failed", context.label());
        if let Some(handler) = self.handler {
            handler(ErrorReport {
                context,
                error: &error,
            });
        }
        error
    }
}
