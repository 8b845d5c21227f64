//! Bit packing for compressed payloads

use crate::codec::Code;

/// Packs codes MSB-first into bytes
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    pub(crate) fn push_code(&mut self, code: Code) {
        for bit in code.bits() {
            self.push_bit(bit);
        }
    }

    /// Zero-pads the last byte and returns the packed bytes with the pad length
    pub(crate) fn finish(mut self) -> (Vec<u8>, u8) {
        if self.filled == 0 {
            return (self.bytes, 0);
        }
        let pad = 8 - self.filled;
        self.bytes.push(self.current << pad);
        (self.bytes, pad)
    }
}

/// Reads the first `len` bits of a byte slice, MSB-first
pub(crate) fn bits_of(bytes: &[u8], len: usize) -> impl Iterator<Item = bool> + '_ {
    (0..len).map(move |offset| (bytes[offset / 8] >> (7 - offset % 8)) & 1 == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_pads_with_zeros() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true] {
            writer.push_bit(bit);
        }
        let (bytes, pad) = writer.finish();
        assert_eq!(bytes, vec![0b1010_0000]);
        assert_eq!(pad, 5);
    }

    #[test]
    fn test_full_bytes_need_no_padding() {
        let mut writer = BitWriter::new();
        for _ in 0..16 {
            writer.push_bit(true);
        }
        let (bytes, pad) = writer.finish();
        assert_eq!(bytes, vec![0xFF, 0xFF]);
        assert_eq!(pad, 0);
    }

    #[test]
    fn test_bits_of_reads_msb_first() {
        let bits: Vec<bool> = bits_of(&[0b1000_0001, 0b0100_0000], 10).collect();
        assert_eq!(
            bits,
            vec![true, false, false, false, false, false, false, true, false, true]
        );
    }
}
