use core::cmp;
use generic_array::{ArrayLength, GenericArray};

/// A fixed-capacity byte buffer that hands out contiguous slices and compacts on demand.
///
/// wpos points to the first byte that can be written rpos points at the next byte that can be read
///
/// invariants: 0 <= rpos <= wpos <= data.len()
pub struct Buffer<N: ArrayLength<u8>> {
    store: GenericArray<u8, N>,
    rpos: usize,
    wpos: usize,
}

impl<N: ArrayLength<u8>> Buffer<N> {
    pub fn new() -> Self {
        Self {
            store: GenericArray::default(),
            rpos: 0,
            wpos: 0,
        }
    }

    // Clears the buffer
    pub fn clear(&mut self) {
        self.rpos = 0;
        self.wpos = 0;
    }

    pub fn capacity(&self) -> usize {
        self.store.len()
    }

    // Amount of bytes available for reading
    pub fn available_read(&self) -> usize {
        self.wpos - self.rpos
    }

    // Amount of space in bytes available for writing
    pub fn available_write(&self) -> usize {
        self.available_write_without_discard() + self.rpos
    }

    fn available_write_without_discard(&self) -> usize {
        self.store.len() - self.wpos
    }

    // Writes as much as possible of data to the buffer and returns the number of bytes written
    pub fn write(&mut self, data: &[u8]) -> usize {
        if data.len() > self.available_write_without_discard() && self.rpos > 0 {
            self.compact();
        }

        let count = cmp::min(self.available_write_without_discard(), data.len());
        if count == 0 {
            // Buffer is full (or data is empty)
            return 0;
        }

        self.store[self.wpos..self.wpos + count].copy_from_slice(&data[..count]);

        self.wpos += count;
        count
    }

    // Reserves max_count bytes of space for writing, and passes a slice pointing to them to a
    // closure for writing. The closure returns the number of bytes actually written. If the
    // callback returns an error, nothing is committed.
    pub fn write_all<E>(
        &mut self,
        max_count: usize,
        f: impl FnOnce(&mut [u8]) -> Result<usize, E>,
    ) -> Result<usize, E> {
        if max_count > self.available_write_without_discard() {
            if max_count > self.available_write() {
                // Doesn't fit even if we discard already read data
                return Ok(0);
            }

            self.compact();
        }

        let wpos = self.wpos;
        let count = f(&mut self.store[wpos..wpos + max_count])?;
        self.wpos += cmp::min(count, max_count);
        Ok(count)
    }

    // Takes up to max_count bytes from the buffer and passes a slice pointing to them to a closure
    // for reading. The closure returns the number of bytes actually taken and is allowed to take
    // less than offered. If the callback returns an error, nothing is discarded.
    pub fn read<E>(
        &mut self,
        max_count: usize,
        f: impl FnOnce(&[u8]) -> Result<usize, E>,
    ) -> Result<usize, E> {
        let count = cmp::min(max_count, self.available_read());

        f(&self.store[self.rpos..self.rpos + count]).map(|taken| {
            let taken = cmp::min(taken, count);
            self.rpos += taken;
            taken
        })
    }

    /// Readable bytes, without consuming them.
    pub fn peek(&self) -> &[u8] {
        &self.store[self.rpos..self.wpos]
    }

    /// Marks `count` readable bytes as consumed.
    pub fn consume(&mut self, count: usize) {
        self.rpos += cmp::min(count, self.available_read());
    }

    /// Moves the unread bytes to the start of the store.
    pub fn compact(&mut self) {
        if self.rpos == 0 {
            return;
        }

        let (rpos, wpos) = (self.rpos, self.wpos);
        self.store.copy_within(rpos..wpos, 0);

        self.wpos -= rpos;
        self.rpos = 0;
    }
}

impl<N: ArrayLength<u8>> Default for Buffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
