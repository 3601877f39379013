//! The immutable input to an analysis.

use crate::error::{Result, TrustScanError};
use crate::hashing::sha256_digest;
use crate::triage::config::IoConfig;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name reported for artifacts whose declared filename is blank.
pub const UNKNOWN_FILENAME: &str = "unknown";

/// An untrusted binary: bytes plus the filename it was submitted under.
///
/// The buffer is shared (`Arc`) so batch analysis can hand the same artifact
/// to several workers without copying; it is never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryArtifact {
    filename: String,
    data: Arc<[u8]>,
}

impl BinaryArtifact {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: Arc::from(data.into()),
        }
    }

    /// Read an artifact from disk, refusing empty files and files larger
    /// than `io.max_file_size`.
    pub fn from_path(path: impl AsRef<Path>, io: &IoConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let declared = file.metadata()?.len();
        if declared > io.max_file_size {
            warn!(path = %path.display(), size = declared, limit = io.max_file_size, "artifact rejected: too large");
            return Err(TrustScanError::ResourceExhausted {
                resource: "file size".to_string(),
                used: declared,
                limit: io.max_file_size,
            });
        }

        // The file may grow between stat and read; never read past the cap.
        let mut data = Vec::with_capacity(declared as usize);
        file.take(io.max_file_size.saturating_add(1))
            .read_to_end(&mut data)?;
        if data.len() as u64 > io.max_file_size {
            return Err(TrustScanError::ResourceExhausted {
                resource: "file size".to_string(),
                used: data.len() as u64,
                limit: io.max_file_size,
            });
        }
        if data.is_empty() {
            return Err(TrustScanError::InvalidInput(format!(
                "{} is empty",
                path.display()
            )));
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file = %filename, size = data.len(), "artifact loaded");
        Ok(Self::new(filename, data))
    }

    /// Filename as submitted (may be blank).
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Filename for reports: `"unknown"` when blank.
    pub fn display_name(&self) -> &str {
        display_name(&self.filename)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn sha256(&self) -> String {
        sha256_digest(&self.data)
    }
}

/// `"unknown"` for blank names, the trimmed name otherwise.
pub fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNKNOWN_FILENAME
    } else {
        trimmed
    }
}
