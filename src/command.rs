//! Command table and dispatch.

use core::fmt;
use log::debug;

/// Returned by a handler to stop processing the rest of the buffered input for now.
///
/// Lines after the failing one stay buffered and are scanned again on the next write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fatal;

/// Sink for response lines.
///
/// Each call produces one framed line on the channel. Lines that do not fit in the outgoing buffer
/// are dropped.
pub trait Respond {
    fn respond(&mut self, args: fmt::Arguments<'_>);
}

/// A command line with the leading `AT` removed, split at the first `:`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommandLine<'a> {
    /// Text before the first `:` (the whole line if there is none).
    pub command: &'a [u8],

    /// Text after the first `:`, or `None` if the line has no `:`.
    pub content: Option<&'a [u8]>,
}

impl<'a> CommandLine<'a> {
    pub fn parse(line: &'a [u8]) -> CommandLine<'a> {
        match line.iter().position(|&b| b == b':') {
            Some(i) => CommandLine {
                command: &line[..i],
                content: Some(&line[i + 1..]),
            },
            None => CommandLine {
                command: line,
                content: None,
            },
        }
    }
}

/// How a table entry is matched against the command token. Both kinds ignore ASCII case.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pattern {
    /// The whole token must equal the pattern.
    Exact(&'static [u8]),

    /// The token must start with the pattern.
    Prefix(&'static [u8]),
}

impl Pattern {
    pub fn matches(&self, token: &[u8]) -> bool {
        match *self {
            Pattern::Exact(p) => token.eq_ignore_ascii_case(p),
            Pattern::Prefix(p) => token.len() >= p.len() && token[..p.len()].eq_ignore_ascii_case(p),
        }
    }
}

pub type Handler = fn(&CommandLine<'_>, &mut dyn Respond) -> Result<(), Fatal>;

/// Command table entry
#[derive(Clone, Copy)]
pub struct Command {
    pub pattern: Pattern,
    pub handler: Handler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Built-in commands: bare `AT` and `D` (dial).
pub static DEFAULT_COMMANDS: &[Command] = &[
    Command { pattern: Pattern::Exact(b""), handler: handle_at },
    Command { pattern: Pattern::Prefix(b"D"), handler: handle_dial },
];

/// Runs the first entry of `commands` that matches `line`, or answers `ERROR` if none does.
pub fn dispatch(commands: &[Command], line: &[u8], out: &mut dyn Respond) -> Result<(), Fatal> {
    let cmd = CommandLine::parse(line);

    match commands.iter().find(|c| c.pattern.matches(cmd.command)) {
        Some(c) => {
            debug!("AT{} -> {:?}", Escaped(line), c.pattern);
            (c.handler)(&cmd, out)
        }
        None => {
            debug!("AT{} -> no match", Escaped(line));
            out.respond(format_args!("ERROR"));
            Ok(())
        }
    }
}

pub fn handle_at(_cmd: &CommandLine<'_>, out: &mut dyn Respond) -> Result<(), Fatal> {
    out.respond(format_args!("OK"));
    Ok(())
}

pub fn handle_dial(_cmd: &CommandLine<'_>, out: &mut dyn Respond) -> Result<(), Fatal> {
    out.respond(format_args!("OK"));
    Ok(())
}

/// Displays bytes with non-printable characters escaped.
pub(crate) struct Escaped<'a>(pub &'a [u8]);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            for c in core::ascii::escape_default(b) {
                fmt::Write::write_char(f, c as char)?;
            }
        }
        Ok(())
    }
}
