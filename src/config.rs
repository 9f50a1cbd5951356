/// Line framing characters of a modem channel.
///
/// These are the classic `S3` and `S4` registers: `S3` ends an incoming command line and, followed
/// by `S4`, brackets every outgoing response line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// S3: command line terminator. Defaults to carriage return.
    pub line_terminator: u8,

    /// S4: response formatting character. Defaults to line feed.
    pub line_formatter: u8,
}

impl Config {
    pub const fn new(line_terminator: u8, line_formatter: u8) -> Config {
        Config {
            line_terminator,
            line_formatter,
        }
    }

    /// The two bytes written before and after every response line.
    pub fn line_break(&self) -> [u8; 2] {
        [self.line_terminator, self.line_formatter]
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(b'\r', b'\n')
    }
}
