//! Half-byte variable length integer encoding shared by the linear and pic codecs.
//!
//! A 32-bit integer is written as one header nibble followed by up to eight
//! data nibbles, least significant first:
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `0..=8` | `h` leading zero nibbles, then `8 - h` data nibbles |
//! | `9..=15` | `h - 8` leading `0xF` nibbles, then `16 - h` data nibbles |
//!
//! Nibbles are packed two per byte, the first one in the high half. A stream
//! with an odd number of nibbles is padded with a zero low nibble, which the
//! decoder recognises as the end of the stream.

use super::error::DecodeError;

/// Largest number of nibbles a single integer can occupy (header + 8 data nibbles)
pub const MAX_NIBBLES: usize = 9;

const TOP_NIBBLE: u32 = 0xF000_0000;

/// Nibbles produced by encoding one integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nibbles {
    buf: [u8; MAX_NIBBLES],
    len: u8,
}

impl Nibbles {
    /// The header nibble
    pub fn header(&self) -> u8 {
        self.buf[0]
    }

    /// All nibbles, header first
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..usize::from(self.len)]
    }

    /// Number of nibbles (1..=9)
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Always false; an encoded integer has at least its header
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Encode `x` as a minimal run of nibbles.
pub fn encode_int(x: i32) -> Nibbles {
    let bits = x as u32;
    let (header, skip) = match bits & TOP_NIBBLE {
        0 => {
            let zeros = (bits.leading_zeros() / 4) as usize;
            (zeros as u8, zeros)
        }
        TOP_NIBBLE => {
            // one data nibble always follows, so -1 is header 15 plus 0xF
            let ones = ((bits.leading_ones() / 4) as usize).min(7);
            (ones as u8 + 8, ones)
        }
        _ => (0, 0),
    };

    let mut buf = [0u8; MAX_NIBBLES];
    buf[0] = header;
    for (k, slot) in buf[1..=8 - skip].iter_mut().enumerate() {
        *slot = ((bits >> (4 * k)) & 0xF) as u8;
    }

    Nibbles {
        buf,
        len: (MAX_NIBBLES - skip) as u8,
    }
}

/// Read position inside a nibble-packed byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NibbleCursor {
    /// Index of the byte holding the next nibble
    pub byte_index: usize,
    /// Whether the next nibble is the high half of that byte
    pub high_nibble_next: bool,
}

impl Default for NibbleCursor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NibbleCursor {
    /// Cursor positioned on the high nibble of `byte_index`
    pub const fn new(byte_index: usize) -> Self {
        Self {
            byte_index,
            high_nibble_next: true,
        }
    }

    /// Read the next nibble and advance, or `None` at the end of `data`
    #[inline]
    pub fn read(&mut self, data: &[u8]) -> Option<u8> {
        let byte = *data.get(self.byte_index)?;
        if self.high_nibble_next {
            self.high_nibble_next = false;
            Some(byte >> 4)
        } else {
            self.high_nibble_next = true;
            self.byte_index += 1;
            Some(byte & 0x0F)
        }
    }

    /// True when only the zero padding nibble of the last byte remains
    #[inline]
    pub fn at_padding(&self, data: &[u8]) -> bool {
        !self.high_nibble_next
            && self.byte_index + 1 == data.len()
            && data[self.byte_index] & 0x0F == 0
    }
}

/// Decode one integer starting at `cursor`.
///
/// Returns the value and the cursor positioned after its last nibble. An
/// integer whose nibbles run past the end of `data` is a corrupt stream.
pub fn decode_int(data: &[u8], mut cursor: NibbleCursor) -> Result<(i32, NibbleCursor), DecodeError> {
    let head = cursor
        .read(data)
        .ok_or_else(|| DecodeError::corrupt(data.len(), "missing integer header"))?;

    let (leading, mut value) = if head <= 8 {
        (usize::from(head), 0u32)
    } else {
        let ones = usize::from(head - 8);
        (ones, !(u32::MAX >> (4 * ones)))
    };

    for k in 0..8 - leading {
        let nibble = cursor
            .read(data)
            .ok_or_else(|| DecodeError::corrupt(data.len(), "integer runs past end of buffer"))?;
        value |= u32::from(nibble) << (4 * k);
    }

    Ok((value as i32, cursor))
}

/// Packs nibbles two per byte onto the end of a byte buffer
#[derive(Debug)]
pub struct NibbleWriter {
    bytes: Vec<u8>,
    pending: Option<u8>,
}

impl NibbleWriter {
    /// Append to `bytes`, which may already hold a header
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            pending: None,
        }
    }

    /// Append a single nibble (only the low four bits are used)
    #[inline]
    pub fn push(&mut self, nibble: u8) {
        match self.pending.take() {
            Some(high) => self.bytes.push((high << 4) | (nibble & 0x0F)),
            None => self.pending = Some(nibble & 0x0F),
        }
    }

    /// Append the nibbles of `x`
    #[inline]
    pub fn write_int(&mut self, x: i32) {
        for &nibble in encode_int(x).as_slice() {
            self.push(nibble);
        }
    }

    /// Flush a dangling nibble with zero padding and return the buffer
    pub fn finish(mut self) -> Vec<u8> {
        if let Some(high) = self.pending.take() {
            self.bytes.push(high << 4);
        }
        self.bytes
    }
}

/// Iterator over the integers of a nibble-packed stream
#[derive(Debug, Clone)]
pub struct IntStream<'a> {
    data: &'a [u8],
    cursor: NibbleCursor,
    failed: bool,
}

impl<'a> IntStream<'a> {
    /// Stream starting at the first byte of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_cursor(data, NibbleCursor::default())
    }

    /// Stream starting at `cursor`
    pub fn with_cursor(data: &'a [u8], cursor: NibbleCursor) -> Self {
        Self {
            data,
            cursor,
            failed: false,
        }
    }

    /// Current read position
    pub fn cursor(&self) -> NibbleCursor {
        self.cursor
    }
}

impl Iterator for IntStream<'_> {
    type Item = Result<i32, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.byte_index >= self.data.len() {
            return None;
        }
        if self.cursor.at_padding(self.data) {
            self.cursor = NibbleCursor::new(self.data.len());
            return None;
        }

        match decode_int(self.data, self.cursor) {
            Ok((value, next)) => {
                self.cursor = next;
                Some(Ok(value))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
