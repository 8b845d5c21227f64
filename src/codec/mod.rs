//! Huffman text codec
//!
//! Every call to [`compress`] is an independent session: it counts symbol
//! frequencies, builds a tree, derives a [`CodeBook`] and returns that code
//! book together with the packed payload. Nothing is cached between calls.
//!
//! # Payload layout
//!
//! ```text
//! +--------+---------------------------------------+
//! | header | packed code bits, MSB first, 0-padded  |
//! +--------+---------------------------------------+
//!   1 byte   ceil(bits / 8) bytes
//! ```
//!
//! The header holds the number of padding bits (0-7) appended to the last
//! byte. The code table is not part of the payload; callers keep it next to
//! the payload and hand the [`ReverseTable`] back to [`decompress`].
//!
//! # Example
//!
//! ```
//! use huffcrawl::codec::{compress, decompress};
//!
//! let compressed = compress("Hello Hello").unwrap();
//! let text = decompress(&compressed.payload, &compressed.codebook.reverse).unwrap();
//! assert_eq!(text, "Hello Hello");
//! ```

mod bits;
mod frequency;
mod table;
mod tree;

pub use frequency::FrequencyTable;
pub use table::{Code, CodeBook, CodeTable, ReverseTable};
pub use tree::{HuffmanTree, Node, NodeId};

use crate::CodecError;
use bits::{bits_of, BitWriter};

/// Largest pad length a well-formed header can carry
pub const MAX_PADDING: u8 = 7;

/// Output of one compression session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    /// Header byte followed by the packed bits
    pub payload: Vec<u8>,

    /// Tables needed to decode `payload`
    pub codebook: CodeBook,
}

impl Compressed {
    /// Pad length recorded in the header
    pub fn padding(&self) -> u8 {
        self.payload.first().copied().unwrap_or(0)
    }
}

/// Compresses `text` with a code book built from its own symbol frequencies
///
/// The empty string compresses to the single header byte `0x00` and an empty
/// code book.
pub fn compress(text: &str) -> Result<Compressed, CodecError> {
    if text.is_empty() {
        return Ok(Compressed {
            payload: vec![0],
            codebook: CodeBook::default(),
        });
    }

    let codebook = CodeBook::from_frequencies(&FrequencyTable::from_text(text))?;
    let payload = encode_with(&codebook.codes, text)?;
    Ok(Compressed { payload, codebook })
}

/// Encodes `text` with an existing code table
///
/// Fails with [`CodecError::UnknownSymbol`] if `text` uses a symbol the table
/// does not cover.
pub fn encode_with(codes: &CodeTable, text: &str) -> Result<Vec<u8>, CodecError> {
    let mut writer = BitWriter::new();
    for symbol in text.chars() {
        let code = codes
            .get(symbol)
            .ok_or(CodecError::UnknownSymbol(symbol))?;
        writer.push_code(code);
    }

    let (packed, pad) = writer.finish();
    let mut payload = Vec::with_capacity(packed.len() + 1);
    payload.push(pad);
    payload.extend_from_slice(&packed);
    Ok(payload)
}

/// Decodes a payload produced by [`compress`] or [`encode_with`]
///
/// Bits are accumulated into a candidate code until it matches an entry of
/// `reverse`; the matched symbol is emitted and the candidate reset. Nothing
/// is returned unless the whole payload decodes cleanly.
///
/// # Errors
///
/// * `MissingHeader` - `payload` is empty
/// * `InvalidHeader` - pad length above 7, or padding without any body byte
/// * `DecodeMismatch` - a candidate outgrew every code in the table, the
///   bits ran out in the middle of a code, or a pad bit is set
pub fn decompress(payload: &[u8], reverse: &ReverseTable) -> Result<String, CodecError> {
    let (&padding, body) = payload.split_first().ok_or(CodecError::MissingHeader)?;
    if padding > MAX_PADDING || (padding > 0 && body.is_empty()) {
        return Err(CodecError::InvalidHeader(padding));
    }

    let bit_len = body.len() * 8 - usize::from(padding);
    let pad_mask = (1u8 << padding) - 1;
    if body.last().is_some_and(|&last| last & pad_mask != 0) {
        return Err(CodecError::DecodeMismatch {
            bit_offset: bit_len,
        });
    }
    let mut text = String::new();
    let mut candidate = Code::empty();

    for (offset, bit) in bits_of(body, bit_len).enumerate() {
        candidate = match candidate.push(bit) {
            Some(code) if code.len() <= reverse.max_len() => code,
            _ => return Err(CodecError::DecodeMismatch { bit_offset: offset }),
        };

        if let Some(symbol) = reverse.get(&candidate) {
            text.push(symbol);
            candidate = Code::empty();
        }
    }

    if !candidate.is_empty() {
        return Err(CodecError::DecodeMismatch {
            bit_offset: bit_len,
        });
    }

    Ok(text)
}
