use crate::buffer::Buffer;
use crate::command::{self, Command, Respond, DEFAULT_COMMANDS};
use crate::config::Config;
use crate::io::Frontend;
use crate::response;
use crate::scanner::{self, LastCommand};
use core::fmt;
use embedded_hal::serial;
use generic_array::typenum;
use generic_array::ArrayLength;
use log::{debug, warn};

/// Line processor of a virtual AT modem channel.
///
/// Bytes written by the host are scanned for `AT` command lines, which are dispatched through a
/// command table. Responses are queued in an outgoing buffer and handed to the [`Frontend`]
/// whenever it has room.
///
/// Buffer sizes are type-level: `NIN` for pending input, `NOUT` for pending responses and `NCMD`
/// for the line kept for `A/`.
pub struct AtModem<F, NIN = typenum::U128, NOUT = typenum::U1024, NCMD = typenum::U128>
where
    F: Frontend,
    NIN: ArrayLength<u8>,
    NOUT: ArrayLength<u8>,
    NCMD: ArrayLength<u8>,
{
    frontend: F,
    read_buf: Buffer<NIN>,
    write_buf: Buffer<NOUT>,
    last_cmd: LastCommand<NCMD>,
    config: Config,
    commands: &'static [Command],
}

impl<F: Frontend> AtModem<F> {
    /// Creates a modem with default buffer sizes, framing and the built-in command table.
    pub fn new(frontend: F) -> AtModem<F> {
        AtModem::with_config(frontend, Config::default(), DEFAULT_COMMANDS)
    }
}

impl<F, NIN, NOUT, NCMD> AtModem<F, NIN, NOUT, NCMD>
where
    F: Frontend,
    NIN: ArrayLength<u8>,
    NOUT: ArrayLength<u8>,
    NCMD: ArrayLength<u8>,
{
    pub fn with_config(frontend: F, config: Config, commands: &'static [Command]) -> Self {
        AtModem {
            frontend,
            read_buf: Buffer::new(),
            write_buf: Buffer::new(),
            last_cmd: LastCommand::new(),
            config,
            commands,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Changes the framing. Takes effect for the next scan and the next response.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// The last command line (without `AT`), as `A/` would repeat it.
    pub fn last_command(&self) -> &[u8] {
        self.last_cmd.as_bytes()
    }

    /// Bytes received but not yet consumed as part of a command.
    pub fn pending_input(&self) -> usize {
        self.read_buf.available_read()
    }

    /// How many more input bytes the next `write` would accept.
    pub fn available_input(&self) -> usize {
        self.read_buf.available_write()
    }

    /// Response bytes waiting for the frontend.
    pub fn pending_output(&self) -> usize {
        self.write_buf.available_read()
    }

    /// Writes bytes from the host and returns the number of bytes accepted.
    ///
    /// Accepts at most the free input space; the caller retries the rest later. Every complete
    /// command line in the buffer is processed before returning.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let count = self.read_buf.write(data);
        self.scan();

        if count < data.len() && self.read_buf.available_write() == 0 {
            warn!(
                "input buffer full ({} bytes) without a complete command line",
                self.read_buf.capacity()
            );
        }

        count
    }

    /// Called by the host when the frontend can take more data.
    pub fn accept_input(&mut self) -> Result<(), F::Error> {
        response::drain(&mut self.write_buf, &mut self.frontend)
    }

    /// Queues a line that is not an answer to a command (e.g. `RING`).
    pub fn respond(&mut self, args: fmt::Arguments<'_>) {
        Responder {
            buf: &mut self.write_buf,
            config: self.config,
            frontend: &mut self.frontend,
        }
        .respond(args);
    }

    /// Drops all buffered input and output and forgets the last command.
    pub fn reset(&mut self) {
        self.read_buf.clear();
        self.write_buf.clear();
        self.last_cmd.clear();
    }

    /// Closes the channel and hands back the frontend. Unsent responses are discarded.
    pub fn close(self) -> F {
        if self.write_buf.available_read() > 0 {
            debug!("closing with {} unsent bytes", self.write_buf.available_read());
        }

        self.frontend
    }

    /// Reads from a serial receiver into the modem until it would block or input is full.
    ///
    /// Returns the number of bytes taken from `rx`.
    pub fn read_from<R: serial::Read<u8>>(&mut self, rx: &mut R) -> Result<usize, R::Error> {
        let mut chunk = [0u8; 32];
        let mut total = 0;

        loop {
            let room = self.read_buf.available_write().min(chunk.len());
            if room == 0 {
                return Ok(total);
            }

            let mut count = 0;
            let mut blocked = false;

            while count < room {
                match rx.read() {
                    Ok(word) => {
                        chunk[count] = word;
                        count += 1;
                    }
                    Err(nb::Error::WouldBlock) => {
                        blocked = true;
                        break;
                    }
                    Err(nb::Error::Other(err)) => {
                        self.write(&chunk[..count]);
                        return Err(err);
                    }
                }
            }

            total += self.write(&chunk[..count]);

            if blocked {
                return Ok(total);
            }
        }
    }

    fn scan(&mut self) {
        let AtModem {
            frontend,
            read_buf,
            write_buf,
            last_cmd,
            config,
            commands,
        } = self;

        let commands: &[Command] = *commands;
        let mut out = Responder {
            buf: write_buf,
            config: *config,
            frontend,
        };

        let consumed = scanner::scan(read_buf.peek(), config.line_terminator, last_cmd, |line| {
            command::dispatch(commands, line, &mut out)
        });

        read_buf.consume(consumed);
        read_buf.compact();
    }
}

struct Responder<'a, F, N: ArrayLength<u8>> {
    buf: &'a mut Buffer<N>,
    config: Config,
    frontend: &'a mut F,
}

impl<F: Frontend, N: ArrayLength<u8>> Respond for Responder<'_, F, N> {
    fn respond(&mut self, args: fmt::Arguments<'_>) {
        if !response::queue_line(&mut *self.buf, &self.config, args) {
            warn!(
                "output buffer full, dropping \"{}\" ({} bytes free)",
                args,
                self.buf.available_write()
            );
        }

        if let Err(err) = response::drain(&mut *self.buf, &mut *self.frontend) {
            warn!("frontend write failed: {:?}", err);
        }
    }
}
