//! Driver for the `MCP23017` 16-bit I2C GPIO-expander.
//!
//! The driver caches the direction (IODIR) and output-latch (OLAT) registers of both banks on the
//! host.  Changing a single pin only writes the affected register, and only when its value
//! actually changes.  Inputs are always read from the chip.
//!
//! ```
//! # use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
//! # let mut i2c = Mock::new(&[
//! #     Transaction::write(0x20, vec![0x00, 0xff]),
//! #     Transaction::write(0x20, vec![0x14, 0x00]),
//! #     Transaction::write(0x20, vec![0x01, 0xff]),
//! #     Transaction::write(0x20, vec![0x15, 0x00]),
//! #     Transaction::write(0x20, vec![0x00, 0xf7]),
//! #     Transaction::write(0x20, vec![0x14, 0x08]),
//! #     Transaction::write_read(0x20, vec![0x13], vec![0x01]),
//! # ]);
//! use mcp23017_shadow::{Address, Direction, Mcp23017};
//!
//! let mut mcp = Mcp23017::new(&mut i2c, Address::default()).unwrap();
//! mcp.pin_mode(3, Direction::Output).unwrap();
//! mcp.digital_write(3, true).unwrap();
//! assert_eq!(mcp.output_a(), 0x08);
//! assert!(mcp.digital_read(8).unwrap());
//! # i2c.done();
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod fmt;

mod bus;
mod common;
mod driver;
#[cfg(feature = "async")]
mod driver_async;
mod error;
mod expander;
mod mutex;
mod pin;
pub mod register;
pub mod shadow;

pub use common::mode;
pub use common::Address;
pub use common::Direction;
pub use common::IntoLevel;
pub use common::Level;
pub use common::PortDriver;
pub use driver::Mcp23017;
#[cfg(feature = "async")]
pub use driver_async::Mcp23017Async;
pub use error::{Context, Error, ErrorHandler, ErrorReport};
pub use expander::{Expander, Parts};
pub use mutex::PortMutex;
pub use pin::Pin;
