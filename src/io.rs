use core::fmt::Debug;
use embedded_hal::serial;
use log::warn;

/// The consumer side of a modem channel: whatever reads the modem's responses.
pub trait Frontend {
    type Error: Debug;

    /// Number of bytes the consumer can take right now. `0` means it is not ready.
    fn can_write(&mut self) -> usize;

    /// Passes bytes to the consumer and returns how many it took. Should not take more than the
    /// last `can_write` reported.
    fn write_out(&mut self, data: &[u8]) -> nb::Result<usize, Self::Error>;
}

impl<T: Frontend + ?Sized> Frontend for &mut T {
    type Error = T::Error;

    fn can_write(&mut self) -> usize {
        (**self).can_write()
    }

    fn write_out(&mut self, data: &[u8]) -> nb::Result<usize, Self::Error> {
        (**self).write_out(data)
    }
}

/// Frontend over a byte-wise `embedded-hal` serial writer, such as a UART or a USB CDC-ACM port.
///
/// The writer can't report its free space, so capacity is found by writing until it would block.
pub struct SerialFrontend<W> {
    inner: W,
}

impl<W> SerialFrontend<W> {
    pub fn new(inner: W) -> Self {
        SerialFrontend { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> Frontend for SerialFrontend<W>
where
    W: serial::Write<u8>,
    W::Error: Debug,
{
    type Error = W::Error;

    fn can_write(&mut self) -> usize {
        usize::MAX
    }

    fn write_out(&mut self, data: &[u8]) -> nb::Result<usize, Self::Error> {
        let mut count = 0;

        for &word in data {
            match self.inner.write(word) {
                Ok(()) => count += 1,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(err)) if count == 0 => return Err(nb::Error::Other(err)),
                Err(nb::Error::Other(err)) => {
                    // The bytes before the error were sent, report those.
                    warn!("serial write failed after {} bytes: {:?}", count, err);
                    break;
                }
            }
        }

        if count == 0 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(count)
        }
    }
}

/// Frontend over an `embedded-io` writer that can tell whether it is ready.
pub struct IoFrontend<W> {
    inner: W,
}

impl<W> IoFrontend<W> {
    pub fn new(inner: W) -> Self {
        IoFrontend { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> Frontend for IoFrontend<W>
where
    W: embedded_io::Write + embedded_io::WriteReady,
{
    type Error = <W as embedded_io::ErrorType>::Error;

    fn can_write(&mut self) -> usize {
        match self.inner.write_ready() {
            Ok(true) => usize::MAX,
            Ok(false) => 0,
            Err(err) => {
                warn!("write_ready failed: {:?}", err);
                0
            }
        }
    }

    fn write_out(&mut self, data: &[u8]) -> nb::Result<usize, Self::Error> {
        // Only called after write_ready, so this doesn't block.
        match self.inner.write(data) {
            Ok(0) => Err(nb::Error::WouldBlock),
            Ok(count) => Ok(count),
            Err(err) => Err(nb::Error::Other(err)),
        }
    }
}
