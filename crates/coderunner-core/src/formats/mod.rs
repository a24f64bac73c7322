//! Archive format implementations.

pub mod common;
pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ArchiveType;
pub use self::tar::TarArchive;
pub use traits::ArchiveFormat;
pub use self::zip::ZipArchive;
