//! High-level extraction entry points.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use tracing::debug;

use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::formats::ArchiveFormat;
use crate::formats::ArchiveType;
use crate::formats::TarArchive;
use crate::formats::ZipArchive;
use crate::formats::detect::detect_format;
use crate::types::DestDir;

/// Extracts an archive stream, choosing the decoder by content sniffing.
///
/// # Errors
///
/// Returns the first error raised by the decoder or by an entry's
/// containment check. Entries written before the error are not removed.
///
/// # Examples
///
/// ```no_run
/// use coderunner_core::ExtractionConfig;
/// use coderunner_core::extract_archive;
/// use coderunner_core::types::DestDir;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/output")?;
/// let report = extract_archive(File::open("submission.tar.gz")?, &dest, &ExtractionConfig::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<R: Read + Seek>(
    mut reader: R,
    dest: &DestDir,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, ExtractionError> {
    let format = detect_format(&mut reader)?;
    extract_as(reader, format, dest, config)
}

/// Extracts an archive stream with an already detected format.
///
/// # Errors
///
/// See [`extract_archive`].
pub fn extract_as<R: Read + Seek>(
    reader: R,
    format: ArchiveType,
    dest: &DestDir,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, ExtractionError> {
    debug!(format = format.name(), dest = %dest.as_path().display(), "extracting archive");
    match format {
        ArchiveType::Zip => ZipArchive::new(reader)?.extract(dest, config),
        ArchiveType::TarGz => TarArchive::gzip(reader).extract(dest, config),
        ArchiveType::Tar => TarArchive::new(reader).extract(dest, config),
    }
}

/// Extracts an archive file into `output_dir`, creating the directory if
/// needed.
///
/// # Errors
///
/// Returns `ExtractionError::Io` if the archive cannot be opened or the
/// output directory cannot be created, otherwise see [`extract_archive`].
pub fn extract_archive_file<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, ExtractionError> {
    let file = File::open(archive_path.as_ref())?;
    std::fs::create_dir_all(output_dir.as_ref())?;
    let dest = DestDir::new(output_dir.as_ref())?;
    extract_archive(BufReader::new(file), &dest, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::create_test_zip;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_extract_archive_dispatches_by_content() {
        let config = ExtractionConfig::default();
        let inputs = [
            create_test_zip(vec![("f.txt", b"zip")]),
            TarTestBuilder::new().add_file("f.txt", b"tar").build(),
            TarTestBuilder::new().add_file("f.txt", b"tgz").build_gz(),
        ];

        for (data, expected) in inputs.into_iter().zip(["zip", "tar", "tgz"]) {
            let temp = TempDir::new().unwrap();
            let dest = DestDir::new(temp.path()).unwrap();
            extract_archive(Cursor::new(data), &dest, &config).unwrap();
            assert_eq!(
                std::fs::read_to_string(temp.path().join("f.txt")).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_extract_archive_file_creates_output_dir() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("upload.bin");
        std::fs::write(&archive, TarTestBuilder::new().add_file("x", b"x").build_gz()).unwrap();

        let output = temp.path().join("out/nested");
        let report = extract_archive_file(&archive, &output, &ExtractionConfig::default()).unwrap();

        assert_eq!(report.files_extracted, 1);
        assert!(output.join("x").is_file());
    }

    #[test]
    fn test_extract_archive_file_missing() {
        let temp = TempDir::new().unwrap();
        let result = extract_archive_file(
            temp.path().join("missing.zip"),
            temp.path().join("out"),
            &ExtractionConfig::default(),
        );
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }
}
