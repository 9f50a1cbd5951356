//! AT command line processor for virtual modem serial channels.
//!
//! An emulated modem exposes a serial channel (a CDC-ACM data interface, a UART) whose host side
//! speaks AT commands. [`AtModem`] sits behind that channel: it takes whatever bytes the host
//! writes, reconstructs `AT` command lines from them no matter how they were split, runs each line
//! through a command table and queues the framed responses until the [`Frontend`] has room for
//! them.
//!
//! The command table is an ordered list of [`Command`]s, each an exact or prefix [`Pattern`]
//! paired with a handler. The first matching entry runs; lines nothing matches are answered with
//! `ERROR`. [`DEFAULT_COMMANDS`] only knows the bare `AT` and `D` (dial) commands.
//!
//! Example
//! =======
//!
//! ```
//! use atmodem::{nb, AtModem, Frontend};
//!
//! struct Console(Vec<u8>);
//!
//! impl Frontend for Console {
//!     type Error = core::convert::Infallible;
//!
//!     fn can_write(&mut self) -> usize {
//!         64
//!     }
//!
//!     fn write_out(&mut self, data: &[u8]) -> nb::Result<usize, Self::Error> {
//!         self.0.extend_from_slice(data);
//!         Ok(data.len())
//!     }
//! }
//!
//! let mut modem = AtModem::new(Console(Vec::new()));
//!
//! assert_eq!(modem.write(b"AT\rATD:555\rAT+FOO\r"), 18);
//! assert_eq!(modem.close().0, b"\r\nOK\r\n\r\nOK\r\n\r\nERROR\r\n");
//! ```

#![no_std]

mod buffer;
mod command;
mod config;
mod io;
mod modem;
mod response;
mod scanner;

pub use crate::command::{
    dispatch, handle_at, handle_dial, Command, CommandLine, Fatal, Handler, Pattern, Respond,
    DEFAULT_COMMANDS,
};
pub use crate::config::Config;
pub use crate::io::{Frontend, IoFrontend, SerialFrontend};
pub use crate::modem::AtModem;
pub use embedded_io;
pub use generic_array;
pub use generic_array::typenum;
pub use nb;
