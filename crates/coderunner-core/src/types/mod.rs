//! Type-safe wrappers for archive extraction.
//!
//! `DestDir` and `SafePath` can only be built through validation, so a path
//! that reaches the filesystem writer has already passed the containment
//! check.

pub mod dest_dir;
pub mod entry_type;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry_type::ArchiveEntry;
pub use entry_type::EntryKind;
pub use safe_path::SafePath;
