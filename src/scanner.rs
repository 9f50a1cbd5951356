//! Command line scanning over buffered input.

use crate::command::{Escaped, Fatal};
use generic_array::{ArrayLength, GenericArray};
use log::trace;

/// The most recently processed command line, replayed by `A/`.
///
/// Lines longer than the capacity are kept truncated.
pub struct LastCommand<N: ArrayLength<u8>> {
    buf: GenericArray<u8, N>,
    len: usize,
}

impl<N: ArrayLength<u8>> LastCommand<N> {
    pub fn new() -> Self {
        LastCommand {
            buf: GenericArray::default(),
            len: 0,
        }
    }

    pub fn set(&mut self, line: &[u8]) {
        let len = line.len().min(self.buf.len());
        self.buf[..len].copy_from_slice(&line[..len]);
        self.len = len;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl<N: ArrayLength<u8>> Default for LastCommand<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn is_a(b: u8) -> bool {
    b == b'A' || b == b'a'
}

fn is_t(b: u8) -> bool {
    b == b'T' || b == b't'
}

/// Scans `data` for command lines and returns the number of leading bytes consumed.
///
/// `dispatch` receives every complete line (the text between `AT` and `terminator`) and, for each
/// `A/`, the previous line again. Scanning stops at an incomplete line, leaving it unconsumed, or
/// right after a line for which `dispatch` returns `Fatal`. Bytes that cannot start a command are
/// consumed and ignored.
pub fn scan<N: ArrayLength<u8>>(
    data: &[u8],
    terminator: u8,
    last: &mut LastCommand<N>,
    mut dispatch: impl FnMut(&[u8]) -> Result<(), Fatal>,
) -> usize {
    let mut pos = 0;

    while pos < data.len() {
        if !is_a(data[pos]) {
            pos += 1;
            continue;
        }

        let next = match data.get(pos + 1) {
            Some(&b) => b,
            // Lone 'A' at the end, wait for the next byte
            None => return pos,
        };

        if next == b'/' {
            pos += 2;
            trace!("A/ repeats AT{}", Escaped(last.as_bytes()));
            if dispatch(last.as_bytes()).is_err() {
                return pos;
            }
        } else if is_t(next) {
            let start = pos + 2;
            let len = match data[start..].iter().position(|&b| b == terminator) {
                Some(len) => len,
                None => return pos,
            };

            let line = &data[start..start + len];
            pos = start + len + 1;

            trace!("line AT{}", Escaped(line));
            last.set(line);
            if dispatch(line).is_err() {
                return pos;
            }
        } else {
            pos += 1;
        }
    }

    pos
}
