//! Packaging the converted import as a Mattermost bulk-import ZIP.
//!
//! Archive layout:
//!
//! ```text
//! import.jsonl                 (deflated; version header + one post per line)
//! data/photos/
//! data/files/
//! data/video_files/
//! data/voice_messages/
//! data/<sanitized attachment path>   (stored, no recompression)
//! ```
//!
//! Attachment paths come straight from the export and may contain characters
//! that are unsafe on the importing host, so each path component is
//! sanitized before going into the archive.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::report::Reporter;

/// Name of the import file inside the archive.
pub const IMPORT_FILE_NAME: &str = "import.jsonl";

/// Default archive name when the caller does not pick one.
pub const DEFAULT_ARCHIVE_NAME: &str = "mattermost_import.zip";

/// Media directories the Mattermost importer expects under `data/`.
const MEDIA_DIRS: [&str; 4] = ["photos", "files", "video_files", "voice_messages"];

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_@=+:.,\-]").unwrap());

/// Sanitizes an attachment path for the archive.
///
/// Directory structure is preserved; within each component every character
/// outside the safe set is replaced with `_`, and components that end up
/// empty are dropped.
#[must_use]
pub fn sanitize_filename(path: &str) -> String {
    path.split(['/', '\\'])
        .map(|part| UNSAFE_CHARS.replace_all(part, "_").into_owned())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Writes the import archive to `output_file`.
///
/// `lines` are the import-file lines (header included); `attachments` are
/// export-relative paths resolved against `input_dir`. A missing attachment
/// file is a warning and a skip, not a failure.
pub fn write_archive(
    output_file: &Path,
    input_dir: &Path,
    lines: &[String],
    attachments: &BTreeSet<String>,
    reporter: &dyn Reporter,
) -> Result<()> {
    let file = File::create(output_file)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let dir_options = SimpleFileOptions::default();
    for dir in MEDIA_DIRS {
        zip.add_directory(format!("data/{dir}"), dir_options)?;
    }

    add_attachments(&mut zip, input_dir, attachments, reporter)?;

    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(IMPORT_FILE_NAME, deflated)?;
    zip.write_all(lines.join("\n").as_bytes())?;

    zip.finish()?;
    Ok(())
}

fn add_attachments<W: io::Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    input_dir: &Path,
    attachments: &BTreeSet<String>,
    reporter: &dyn Reporter,
) -> Result<()> {
    // Media files are already compressed formats; store them as-is.
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for attachment in attachments {
        let source = input_dir.join(attachment);
        if !source.exists() {
            reporter.warn(&format!("Skipping missing attachment: {attachment}"));
            continue;
        }
        let safe_path = sanitize_filename(attachment);
        reporter.debug(&format!("Adding attachment: {safe_path}"));
        zip.start_file(format!("data/{safe_path}"), stored)?;
        let mut reader = File::open(&source)?;
        io::copy(&mut reader, zip)?;
    }
    Ok(())
}
