use sha2::{Digest, Sha256};
use std::path::Path;

use crate::classifier::ClassifierError;

/// Raw model artifact bytes with their SHA-256 checksum
///
/// Guards against serving predictions from a truncated or swapped model file:
/// 1. The checksum is computed once when the file is read
/// 2. It is logged at startup so deployments can pin it
/// 3. When `MODEL_SHA256` is configured, a mismatch aborts startup
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    bytes: Vec<u8>,
    checksum: String,
}

impl ModelArtifact {
    /// Reads the artifact from disk and computes its checksum
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let checksum = Self::compute_checksum(&bytes);
        Self { bytes, checksum }
    }

    /// Computes SHA-256 checksum of the data (hex encoded)
    pub fn compute_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Compares the checksum against an expected hex digest
    ///
    /// Passing `None` skips the check. Comparison ignores case and surrounding whitespace.
    pub fn verify(&self, expected: Option<&str>) -> Result<(), ClassifierError> {
        let Some(expected) = expected else {
            return Ok(());
        };

        let expected = expected.trim().to_ascii_lowercase();
        if expected == self.checksum {
            Ok(())
        } else {
            tracing::warn!(
                "Model checksum mismatch. Expected: {}, Data length: {}",
                expected,
                self.bytes.len()
            );
            Err(ClassifierError::ChecksumMismatch {
                expected,
                actual: self.checksum.clone(),
            })
        }
    }
}
