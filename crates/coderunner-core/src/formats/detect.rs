//! Archive format detection by content sniffing.

use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

use crate::ExtractionError;

/// Number of leading bytes inspected when sniffing a stream.
pub const SNIFF_LEN: usize = 512;

/// ZIP local file header signature.
const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// ZIP end-of-central-directory signature (empty archive).
const ZIP_EMPTY_MAGIC: [u8; 4] = *b"PK\x05\x06";

/// Gzip member header with the deflate method byte.
const GZIP_MAGIC: [u8; 3] = [0x1F, 0x8B, 0x08];

/// Archive formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveType {
    /// ZIP archive.
    Zip,
    /// Gzip-compressed tar archive.
    TarGz,
    /// Tar archive (uncompressed); also the fallback for unknown content.
    Tar,
}

impl ArchiveType {
    /// Returns the format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::Tar => "tar",
        }
    }

    /// Number of filename extensions the format contributes
    /// (`.zip`, `.tar`, `.tar.gz`).
    #[must_use]
    pub const fn extension_count(self) -> usize {
        match self {
            Self::Zip | Self::Tar => 1,
            Self::TarGz => 2,
        }
    }
}

/// Classifies an archive from its leading bytes.
///
/// Never fails: anything that is neither ZIP nor gzip is treated as a plain
/// tar stream and left to the tar decoder to accept or reject.
///
/// # Examples
///
/// ```
/// use coderunner_core::formats::detect::{ArchiveType, sniff};
///
/// assert_eq!(sniff(b"PK\x03\x04rest"), ArchiveType::Zip);
/// assert_eq!(sniff(&[0x1F, 0x8B, 0x08, 0x00]), ArchiveType::TarGz);
/// assert_eq!(sniff(b"hello.txt\0\0\0"), ArchiveType::Tar);
/// ```
#[must_use]
pub fn sniff(header: &[u8]) -> ArchiveType {
    let header = &header[..header.len().min(SNIFF_LEN)];
    if header.starts_with(&ZIP_MAGIC) || header.starts_with(&ZIP_EMPTY_MAGIC) {
        ArchiveType::Zip
    } else if header.starts_with(&GZIP_MAGIC) {
        ArchiveType::TarGz
    } else {
        ArchiveType::Tar
    }
}

/// Reads up to [`SNIFF_LEN`] bytes from `reader`, classifies them and seeks
/// back to where the reader started.
///
/// # Errors
///
/// Returns `ExtractionError::Io` if reading or seeking fails.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<ArchiveType, ExtractionError> {
    let start = reader.stream_position()?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    reader.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    reader.seek(SeekFrom::Start(start))?;
    Ok(sniff(&header))
}
