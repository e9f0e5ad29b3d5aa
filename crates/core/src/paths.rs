//! Source discovery and output path derivation.

use std::io;
use std::path::{Path, PathBuf};

/// Output path for `input`: same file stem, `extension`, inside `output_dir`.
///
/// Two inputs with the same stem in different directories map to the same
/// output path; callers writing into one directory get the last one.
pub fn safe_output_path(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    let mut file_name = stem;
    file_name.push(".");
    file_name.push(extension);
    output_dir.join(file_name)
}

/// Whether the file name ends in `.<extension>`, ignoring case.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let suffix = format!(".{}", extension.to_lowercase());
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(&suffix))
        .unwrap_or(false)
}

/// Finds source files under `path`.
///
/// A file with the right extension yields itself. A directory yields its
/// direct entries with the right extension, sorted. Anything else yields
/// nothing.
pub async fn find_source_files(path: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    if meta.is_file() {
        return Ok(if has_extension(path, extension) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let mut files = Vec::new();
    if meta.is_dir() {
        let mut entries = tokio::fs::read_dir(path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let entry_path = entry.path();
            if has_extension(&entry_path, extension) {
                files.push(entry_path);
            }
        }
    }
    files.sort();
    Ok(files)
}
