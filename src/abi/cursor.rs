use super::Error;
use super::types::PREFIX_BYTES;

/// Read position over the hex payload of a single top-level decode.
///
/// Every decode step consumes a prefix of the remaining input; the position only moves forward.
#[derive(Debug, Clone)]
pub struct HexCursor<'a> {
    hex: &'a str,
    pos: usize,
}

impl<'a> HexCursor<'a> {
    /// Creates a cursor over `hex`. Only ASCII input is accepted so that every offset is a
    /// valid slice boundary; the digits themselves are validated by the leaf decoders.
    pub fn new(hex: &'a str) -> Result<Self, Error> {
        if !hex.is_ascii() {
            return Err(Error::InvalidHex(hex.to_string()));
        }
        Ok(Self { hex, pos: 0 })
    }

    pub fn remaining(&self) -> &'a str {
        &self.hex[self.pos..]
    }

    pub fn remaining_len(&self) -> usize {
        self.hex.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_len() == 0
    }

    /// Consumed hex characters so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consumes exactly `len` hex characters.
    pub fn take(&mut self, len: usize) -> Result<&'a str, Error> {
        let remaining = self.remaining_len();
        if len > remaining {
            return Err(Error::CursorExhausted {
                requested: len,
                remaining,
            });
        }
        let chunk = &self.hex[self.pos..self.pos + len];
        self.pos += len;
        Ok(chunk)
    }

    /// Consumes up to `len` hex characters, fewer when the input ends first.
    pub fn take_up_to(&mut self, len: usize) -> &'a str {
        let len = len.min(self.remaining_len());
        let chunk = &self.hex[self.pos..self.pos + len];
        self.pos += len;
        chunk
    }

    /// Consumes everything that is left.
    pub fn take_rest(&mut self) -> &'a str {
        let chunk = self.remaining();
        self.pos = self.hex.len();
        chunk
    }

    /// Consumes `byte_len` bytes worth of hex, or the rest of the input when no length is known.
    pub fn take_bytes(&mut self, byte_len: Option<usize>) -> Result<&'a str, Error> {
        match byte_len {
            Some(len) => self.take(len * 2),
            None => Ok(self.take_rest()),
        }
    }

    /// Reads a 4-byte big-endian length or count prefix.
    pub fn read_prefix(&mut self) -> Result<usize, Error> {
        let raw = self.take(PREFIX_BYTES * 2)?;
        u32::from_str_radix(raw, 16)
            .map(|len| len as usize)
            .map_err(|_| Error::InvalidHex(raw.to_string()))
    }
}
