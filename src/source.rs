//! Byte sources feeding the frame decoder.
//!
//! A [`ByteSource`] hands out one byte per call together with the number of
//! bytes still buffered behind it. Running dry is reported as
//! [`SourceRead::Empty`], distinct from an I/O failure.

use std::io;

use bytes::Buf;

/// Result of a single [`ByteSource::read_byte`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceRead {
    /// The next byte, with the count of bytes still buffered after it.
    Byte {
        /// Byte read from the source.
        byte: u8,
        /// Bytes remaining after this one.
        remaining: usize,
    },
    /// No data is currently available.
    Empty,
}

/// Capability yielding input bytes one at a time.
///
/// Implementations wrap the receive buffer of a serial driver or any other
/// transport. The decoder stops draining on [`SourceRead::Empty`] and waits
/// for the next delivery.
pub trait ByteSource {
    /// Take the next available byte.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the underlying transport failed.
    fn read_byte(&mut self) -> io::Result<SourceRead>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<SourceRead> { (**self).read_byte() }
}

/// [`ByteSource`] over any in-memory [`Buf`].
///
/// # Examples
///
/// ```
/// use hciframe::source::{BufSource, ByteSource, SourceRead};
///
/// let mut source = BufSource::new(&[0x04, 0x0E][..]);
/// assert_eq!(
///     source.read_byte().expect("in-memory read"),
///     SourceRead::Byte { byte: 0x04, remaining: 1 }
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct BufSource<B> {
    buf: B,
}

impl<B: Buf> BufSource<B> {
    /// Wrap `buf`.
    #[must_use]
    pub fn new(buf: B) -> Self { Self { buf } }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize { self.buf.remaining() }

    /// Recover the wrapped buffer.
    #[must_use]
    pub fn into_inner(self) -> B { self.buf }
}

impl<B: Buf> ByteSource for BufSource<B> {
    fn read_byte(&mut self) -> io::Result<SourceRead> {
        if !self.buf.has_remaining() {
            return Ok(SourceRead::Empty);
        }
        let byte = self.buf.get_u8();
        Ok(SourceRead::Byte {
            byte,
            remaining: self.buf.remaining(),
        })
    }
}
