//! Content fingerprints for level sources.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest of a level's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelFingerprint([u8; 32]);

impl LevelFingerprint {
    /// Hashes `source`.
    #[must_use]
    pub fn of(source: &str) -> Self {
        Self(Sha256::digest(source.as_bytes()).into())
    }

    /// RNG seed derived from the digest, used when the level sets none.
    #[must_use]
    pub fn seed(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(head)
    }

    /// A stable 128-bit identifier for the zone at `index` named `name`.
    #[must_use]
    pub fn zone_key(&self, index: usize, name: &str) -> u128 {
        let mut hasher = Sha256::new();
        hasher.update(self.0);
        hasher.update(index.to_le_bytes());
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();
        let mut head = [0u8; 16];
        head.copy_from_slice(&digest[..16]);
        u128::from_le_bytes(head)
    }
}

impl fmt::Display for LevelFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
