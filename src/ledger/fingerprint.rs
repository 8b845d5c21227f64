//! SHA-256 content fingerprints

use sha2::{Digest, Sha256};
use std::fmt;

/// Fixed-size digest of extracted document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentFingerprint([u8; 32]);

impl ContentFingerprint {
    /// Hashes the UTF-8 bytes of `text`
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
