//! Sequential byte sources with a single byte of pushback.
//!
//! The decoder never looks further ahead than one byte: optional
//! terminators are read, compared, and pushed back when they turn out to be
//! the start of the next field or record.

use crate::error::{Iso8211Error, Result};
use std::io::BufRead;

/// Upper bound on the buffer reserved ahead of a read; lengths come from the
/// file and are only trusted as far as bytes actually arrive.
const MAX_PREALLOCATION: usize = 4096;

/// A forward-only byte reader with one pending pushback slot.
pub trait ByteSource {
    /// Read the next byte, or fail with [`Iso8211Error::UnexpectedEndOfData`].
    fn next_byte(&mut self) -> Result<u8>;

    /// Return one byte to the source. At most one byte may be pending.
    fn push_back(&mut self, byte: u8);

    /// Whether at least one more byte can be read.
    fn has_remaining(&mut self) -> Result<bool>;

    /// Number of bytes handed out so far, net of pushback.
    fn position(&self) -> u64;

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n.min(MAX_PREALLOCATION));
        for _ in 0..n {
            out.push(self.next_byte()?);
        }
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]>
    where
        Self: Sized,
    {
        let mut out = [0u8; N];
        for b in out.iter_mut() {
            *b = self.next_byte()?;
        }
        Ok(out)
    }

    /// Consume `expected` if it is the next byte, otherwise leave the stream
    /// untouched. Returns whether the byte was consumed.
    fn skip_optional(&mut self, expected: u8) -> Result<bool> {
        if !self.has_remaining()? {
            return Ok(false);
        }
        let b = self.next_byte()?;
        if b == expected {
            Ok(true)
        } else {
            self.push_back(b);
            Ok(false)
        }
    }
}

// ============================================================================
// In-memory source
// ============================================================================

/// Byte source over a borrowed slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
    pending: Option<u8>,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            pending: None,
        }
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> Result<u8> {
        if let Some(b) = self.pending.take() {
            return Ok(b);
        }
        let b = *self
            .data
            .get(self.pos)
            .ok_or(Iso8211Error::UnexpectedEndOfData)?;
        self.pos += 1;
        Ok(b)
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.pending.is_none(), "pushback slot already in use");
        self.pending = Some(byte);
    }

    fn has_remaining(&mut self) -> Result<bool> {
        Ok(self.pending.is_some() || self.pos < self.data.len())
    }

    fn position(&self) -> u64 {
        (self.pos - usize::from(self.pending.is_some())) as u64
    }
}

// ============================================================================
// Buffered reader source
// ============================================================================

/// Byte source over any buffered reader (files, network streams).
pub struct ReaderSource<R> {
    inner: R,
    consumed: u64,
    pending: Option<u8>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            consumed: 0,
            pending: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> ByteSource for ReaderSource<R> {
    fn next_byte(&mut self) -> Result<u8> {
        if let Some(b) = self.pending.take() {
            return Ok(b);
        }
        let b = match self.inner.fill_buf()?.first() {
            Some(&b) => b,
            None => return Err(Iso8211Error::UnexpectedEndOfData),
        };
        self.inner.consume(1);
        self.consumed += 1;
        Ok(b)
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.pending.is_none(), "pushback slot already in use");
        self.pending = Some(byte);
    }

    fn has_remaining(&mut self) -> Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        Ok(!self.inner.fill_buf()?.is_empty())
    }

    fn position(&self) -> u64 {
        self.consumed - u64::from(self.pending.is_some())
    }
}
