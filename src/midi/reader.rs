//! Bounds-checked big-endian byte reader over a MIDI buffer.

use crate::error::PianolaError;

/// Longest delta time / length encoding allowed by the SMF format
const MAX_VLQ_BYTES: usize = 4;

/// Reader over `bytes[pos..end]`. Offsets in errors are absolute positions in the
/// underlying buffer, so sub-readers for chunks report file offsets.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            end: bytes.len(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.end
    }

    pub fn error(&self, message: impl Into<String>) -> PianolaError {
        PianolaError::MalformedMidi {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn ensure(&self, len: usize, what: &str) -> Result<(), PianolaError> {
        if self.end - self.pos < len {
            return Err(self.error(format!(
                "{} needs {} byte(s) but only {} remain",
                what,
                len,
                self.end - self.pos
            )));
        }
        Ok(())
    }

    pub fn peek_u8(&self) -> Result<u8, PianolaError> {
        self.ensure(1, "event")?;
        Ok(self.bytes[self.pos])
    }

    pub fn read_u8(&mut self) -> Result<u8, PianolaError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, PianolaError> {
        self.ensure(2, "16-bit field")?;
        let value = u16::from_be_bytes([self.bytes[self.pos], self.bytes[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, PianolaError> {
        self.ensure(4, "32-bit field")?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.bytes[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(u32::from_be_bytes(buf))
    }

    /// Read a variable-length quantity: 7 bits per byte, high bit set on all but
    /// the last byte.
    pub fn read_vlq(&mut self) -> Result<u32, PianolaError> {
        let start = self.pos;
        let mut value: u32 = 0;
        for _ in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(PianolaError::MalformedMidi {
            offset: start,
            message: format!("variable-length quantity longer than {} bytes", MAX_VLQ_BYTES),
        })
    }

    pub fn skip(&mut self, len: usize) -> Result<(), PianolaError> {
        self.ensure(len, "event payload")?;
        self.pos += len;
        Ok(())
    }

    /// Consume a 4-byte chunk tag, failing if it differs from `tag`.
    pub fn expect_tag(&mut self, tag: &[u8; 4]) -> Result<(), PianolaError> {
        let expected = String::from_utf8_lossy(tag);
        self.ensure(4, &format!("'{}' tag", expected))?;
        if &self.bytes[self.pos..self.pos + 4] != tag {
            return Err(self.error(format!("expected '{}' chunk", expected)));
        }
        self.pos += 4;
        Ok(())
    }

    /// Split off a reader over the next `len` bytes and advance past them.
    pub fn take(&mut self, len: usize, what: &str) -> Result<ByteReader<'a>, PianolaError> {
        self.ensure(len, what)?;
        let chunk = ByteReader {
            bytes: self.bytes,
            pos: self.pos,
            end: self.pos + len,
        };
        self.pos += len;
        Ok(chunk)
    }
}
