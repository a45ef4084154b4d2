//! Binary storage format for polynomials.
//!
//! ```text
//! offset  size  field
//! 0       4     magic b"PSRG"
//! 4       1     format version
//! 5       8     payload length (u64, little-endian)
//! 13      4     CRC32 of payload (u32, little-endian)
//! 17      ..    postcard-encoded payload
//! ```

use std::{fs, io::Write as _, path::Path};

use serde::{Deserialize, Serialize};
use snafu::ResultExt as _;
use tempfile::NamedTempFile;

use crate::{DecodeSnafu, EncodeSnafu, IoSnafu, PolyError};

/// Magic bytes identifying a polynomial model file.
pub const MAGIC: &[u8; 4] = b"PSRG";

/// Current format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 17;

/// Everything needed to rebuild a polynomial, in coefficient order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PolynomialPayload {
    pub degrees: Vec<u32>,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    version: u8,
    payload_size: u64,
    checksum: u32,
}

impl Header {
    fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4] = self.version;
        bytes[5..13].copy_from_slice(&self.payload_size.to_le_bytes());
        bytes[13..17].copy_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PolyError> {
        if bytes.len() < HEADER_SIZE {
            // Don't report a short garbage file as truncated.
            if !MAGIC.starts_with(&bytes[..bytes.len().min(MAGIC.len())]) {
                return Err(PolyError::NotAModel);
            }
            return Err(PolyError::Truncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != MAGIC {
            return Err(PolyError::NotAModel);
        }

        let version = bytes[4];
        if version != FORMAT_VERSION {
            return Err(PolyError::UnsupportedVersion {
                found: version,
                supported: FORMAT_VERSION,
            });
        }

        let mut payload_size = [0u8; 8];
        payload_size.copy_from_slice(&bytes[5..13]);
        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&bytes[13..17]);

        Ok(Self {
            version,
            payload_size: u64::from_le_bytes(payload_size),
            checksum: u32::from_le_bytes(checksum),
        })
    }
}

pub(crate) fn encode(payload: &PolynomialPayload) -> Result<Vec<u8>, PolyError> {
    let payload_bytes = postcard::to_allocvec(payload).context(EncodeSnafu)?;

    let header = Header {
        version: FORMAT_VERSION,
        payload_size: payload_bytes.len() as u64,
        checksum: crc32fast::hash(&payload_bytes),
    };

    let mut output = Vec::with_capacity(HEADER_SIZE + payload_bytes.len());
    output.extend_from_slice(&header.to_bytes());
    output.extend_from_slice(&payload_bytes);
    Ok(output)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<PolynomialPayload, PolyError> {
    let header = Header::from_bytes(bytes)?;
    log::trace!(
        "Decoding format v{} payload of {} bytes",
        header.version,
        header.payload_size
    );
    let payload = &bytes[HEADER_SIZE..];

    let expected = usize::try_from(header.payload_size).unwrap_or(usize::MAX);
    if payload.len() < expected {
        return Err(PolyError::Truncated {
            expected: HEADER_SIZE.saturating_add(expected),
            actual: bytes.len(),
        });
    }
    if payload.len() > expected {
        return Err(PolyError::TrailingBytes {
            count: payload.len() - expected,
        });
    }

    let actual = crc32fast::hash(payload);
    if actual != header.checksum {
        return Err(PolyError::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    postcard::from_bytes(payload).context(DecodeSnafu)
}

/// Writes `bytes` to a temporary file next to `path` and renames it into
/// place, so an existing file at `path` is only replaced by a complete one.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PolyError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).context(IoSnafu { path })?;
    file.write_all(bytes).context(IoSnafu { path })?;
    file.as_file().sync_all().context(IoSnafu { path })?;
    file.persist(path)
        .map_err(|e| e.error)
        .context(IoSnafu { path })?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, PolyError> {
    let bytes = fs::read(path).context(IoSnafu { path })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
