//! Channel behaviour through the public API.

use atmodem::generic_array::ArrayLength;
use atmodem::typenum::{U1024, U128, U16, U4, U8};
use atmodem::{nb, AtModem, Command, CommandLine, Config, Fatal, Frontend, Pattern, Respond};
use core::str::from_utf8;

/// Frontend that takes at most `per_call` bytes per write, and nothing while `ready` is false.
struct Host {
    out: Vec<u8>,
    per_call: usize,
    ready: bool,
}

impl Host {
    fn new(per_call: usize) -> Host {
        Host { out: Vec::new(), per_call, ready: true }
    }
}

impl Frontend for Host {
    type Error = ();

    fn can_write(&mut self) -> usize {
        if self.ready {
            self.per_call
        } else {
            0
        }
    }

    fn write_out(&mut self, data: &[u8]) -> nb::Result<usize, ()> {
        let count = data.len().min(self.can_write());
        self.out.extend_from_slice(&data[..count]);
        Ok(count)
    }
}

fn echo(cmd: &CommandLine<'_>, out: &mut dyn Respond) -> Result<(), Fatal> {
    let command = from_utf8(cmd.command).unwrap_or("?");
    let content = cmd.content.map(|c| from_utf8(c).unwrap_or("?")).unwrap_or("-");
    out.respond(format_args!("{}|{}", command, content));
    Ok(())
}

static ECHO: &[Command] = &[Command { pattern: Pattern::Prefix(b""), handler: echo }];

fn run(input: &[u8]) -> Vec<u8> {
    let mut modem = AtModem::new(Host::new(usize::MAX));
    assert_eq!(modem.write(input), input.len());
    modem.close().out
}

/// Delivers `input` in chunks of `size`, re-delivering whatever was not accepted.
fn deliver_chunked<F, NIN, NOUT, NCMD>(modem: &mut AtModem<F, NIN, NOUT, NCMD>, input: &[u8], size: usize)
where
    F: Frontend,
    NIN: ArrayLength<u8>,
    NOUT: ArrayLength<u8>,
    NCMD: ArrayLength<u8>,
{
    for chunk in input.chunks(size) {
        let mut rest = chunk;
        while !rest.is_empty() {
            let count = modem.write(rest);
            assert!(count > 0, "input stalled");
            rest = &rest[count..];
        }
    }
}

#[test]
fn bare_at() {
    assert_eq!(run(b"AT\r"), b"\r\nOK\r\n");
}

#[test]
fn dial() {
    assert_eq!(run(b"ATD:555\r"), b"\r\nOK\r\n");

    let mut modem: AtModem<Host> = AtModem::with_config(Host::new(64), Config::default(), ECHO);
    modem.write(b"ATD:555\r");
    assert_eq!(modem.close().out, b"\r\nD|555\r\n");
}

#[test]
fn unknown_command() {
    assert_eq!(run(b"AT+UNKNOWN\r"), b"\r\nERROR\r\n");
}

#[test]
fn repeat_last_command() {
    assert_eq!(run(b"AT\ra/"), b"\r\nOK\r\n\r\nOK\r\n");
    assert_eq!(run(b"AT+X\rA/"), b"\r\nERROR\r\n\r\nERROR\r\n");
}

#[test]
fn repeat_split_across_writes() {
    let mut modem = AtModem::new(Host::new(64));

    modem.write(b"AT\r");
    modem.write(b"A");
    assert_eq!(modem.pending_input(), 1);
    assert_eq!(modem.frontend().out, b"\r\nOK\r\n");

    modem.write(b"/");
    assert_eq!(modem.pending_input(), 0);
    assert_eq!(modem.close().out, b"\r\nOK\r\n\r\nOK\r\n");
}

#[test]
fn noise_is_ignored() {
    assert_eq!(run(b"+++\r\nAx AT\r\n"), b"\r\nOK\r\n");
}

#[test]
fn chunk_size_independence() {
    let input: &[u8] = b"garbage\r\nAT\rat+cgmi\rATD:555;\ra/Ab\rAT+CSQ:\rA/aT:x:y\r\r\n";

    let mut whole: AtModem<Host> = AtModem::with_config(Host::new(usize::MAX), Config::default(), ECHO);
    deliver_chunked(&mut whole, input, input.len());
    let expected = whole.close().out;

    assert_eq!(
        from_utf8(&expected).unwrap(),
        "\r\n|-\r\n\r\n+cgmi|-\r\n\r\nD|555;\r\n\r\nD|555;\r\n\r\n+CSQ|\r\n\r\n+CSQ|\r\n\r\n|x:y\r\n"
    );

    for size in 1..input.len() {
        let mut modem: AtModem<Host, U16, U1024, U128> =
            AtModem::with_config(Host::new(usize::MAX), Config::default(), ECHO);
        deliver_chunked(&mut modem, input, size);
        assert_eq!(modem.close().out, expected, "chunk size {}", size);
    }
}

#[test]
fn oversized_response_is_dropped() {
    let mut host = Host::new(64);
    host.ready = false;

    let mut modem: AtModem<Host, U128, U8> = AtModem::with_config(host, Config::default(), atmodem::DEFAULT_COMMANDS);

    modem.write(b"AT\r");
    assert_eq!(modem.pending_output(), 6);

    modem.write(b"AT+NOPE\r");
    assert_eq!(modem.pending_output(), 6);

    modem.frontend_mut().ready = true;
    assert_eq!(modem.accept_input(), Ok(()));
    assert_eq!(modem.close().out, b"\r\nOK\r\n");
}

#[test]
fn drain_one_byte_per_call() {
    let mut host = Host::new(1);
    host.ready = false;
    let mut modem = AtModem::new(host);

    modem.write(b"AT\rAT+NOPE\rATD\r");
    assert_eq!(modem.pending_output(), 21);

    modem.frontend_mut().ready = true;
    assert_eq!(modem.accept_input(), Ok(()));
    assert_eq!(modem.pending_output(), 0);

    assert_eq!(modem.close().out, run(b"AT\rAT+NOPE\rATD\r"));
}

#[test]
fn long_line_repeats_truncated() {
    let mut modem: AtModem<Host, U128, U1024, U4> =
        AtModem::with_config(Host::new(64), Config::default(), ECHO);

    modem.write(b"AT+CGDCONT=1\rA/");
    assert_eq!(modem.last_command(), b"+CGD");
    assert_eq!(modem.close().out, &b"\r\n+CGDCONT=1|-\r\n\r\n+CGD|-\r\n"[..]);
}

#[test]
fn unterminated_line_stalls_input() {
    let mut modem: AtModem<Host, U8> = AtModem::with_config(Host::new(64), Config::default(), atmodem::DEFAULT_COMMANDS);

    assert_eq!(modem.write(b"AT123456789\r"), 8);
    assert_eq!(modem.write(b"\r"), 0);
    assert_eq!(modem.available_input(), 0);

    modem.reset();
    assert_eq!(modem.write(b"AT\r"), 3);
    assert_eq!(modem.close().out, b"\r\nOK\r\n");
}

#[test]
fn custom_terminator() {
    let config = Config::new(b'\n', b'\r');
    let mut modem: AtModem<Host> = AtModem::with_config(Host::new(64), config, atmodem::DEFAULT_COMMANDS);

    modem.write(b"AT\r");
    assert_eq!(modem.pending_input(), 3);

    modem.write(b"\n");
    assert_eq!(modem.close().out, b"\n\rERROR\n\r");
}
