use crate::buffer::Buffer;
use crate::config::Config;
use crate::io::Frontend;
use core::fmt::{self, Write};
use generic_array::ArrayLength;
use log::trace;

/// fmt::Write over a fixed slice that fails instead of truncating.
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl SliceWriter<'_> {
    fn put(&mut self, data: &[u8]) -> fmt::Result {
        let end = self.pos + data.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }

        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put(s.as_bytes())
    }
}

/// Appends one response line, framed as `S3 S4 <text> S3 S4`, to `buf`.
///
/// Returns `false` and leaves `buf` untouched if the framed line does not fit.
pub fn queue_line<N: ArrayLength<u8>>(
    buf: &mut Buffer<N>,
    config: &Config,
    args: fmt::Arguments<'_>,
) -> bool {
    let line_break = config.line_break();

    let written = buf.write_all(buf.available_write(), |dst| {
        let mut w = SliceWriter { buf: dst, pos: 0 };
        w.put(&line_break)?;
        w.write_fmt(args)?;
        w.put(&line_break)?;
        Ok::<usize, fmt::Error>(w.pos)
    });

    matches!(written, Ok(n) if n > 0)
}

/// Hands buffered bytes to `frontend` for as long as it accepts them.
///
/// Stops when the buffer is empty, when the frontend reports no capacity, or when it takes nothing.
/// Bytes not taken stay buffered for the next call.
pub fn drain<N: ArrayLength<u8>, F: Frontend>(
    buf: &mut Buffer<N>,
    frontend: &mut F,
) -> Result<(), F::Error> {
    while buf.available_read() > 0 {
        let room = frontend.can_write();
        if room == 0 {
            break;
        }

        let count = buf.read(room, |data| match frontend.write_out(data) {
            Ok(count) => Ok(count),
            Err(nb::Error::WouldBlock) => Ok(0),
            Err(nb::Error::Other(err)) => Err(err),
        })?;

        if count == 0 {
            break;
        }

        trace!("drained {} bytes, {} left", count, buf.available_read());
    }

    buf.compact();
    Ok(())
}
