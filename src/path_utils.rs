//! Path utilities for naming inputs and outputs.
//!
//! This module provides the small, pure helpers the converter uses to recognize CBZ
//! inputs, derive book titles from archive names, and default the output paths.

use std::path::{Path, PathBuf};

/// Extension of comic archives accepted by the converter (compared case-insensitively).
pub const CBZ_EXTENSION: &str = "cbz";

/// Extension given to assembled e-books.
pub const EPUB_EXTENSION: &str = "epub";

/// Output used by merge when none is configured.
pub const DEFAULT_MERGE_OUTPUT: &str = "merged.cbz";

/// Converts a path to a string with fallback to lossy conversion.
pub fn path_to_string_lossy(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Gets the file name from a path with fallback to lossy conversion.
///
/// # Returns
///
/// * `String` - The file name, or `"unknown"` when the path has none
pub fn get_file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Checks if a path names a CBZ archive, ignoring the extension's case.
pub fn is_cbz_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(CBZ_EXTENSION))
        .unwrap_or(false)
}

/// Derives a book title from an archive path.
///
/// The title is the file name with a trailing `.cbz` removed. No other cleanup is
/// done; the generators escape the title when they embed it in markup.
///
/// # Example
///
/// ```
/// use cbz2epub::path_utils::title_from_path;
/// use std::path::Path;
///
/// assert_eq!(title_from_path(Path::new("comics/Vol 1.cbz")), "Vol 1");
/// assert_eq!(title_from_path(Path::new("notes.zip")), "notes.zip");
/// ```
pub fn title_from_path(path: &Path) -> String {
    if is_cbz_file(path) {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| get_file_name_lossy(path))
    } else {
        get_file_name_lossy(path)
    }
}

/// Default output path of a conversion: the input with its extension replaced by `.epub`.
pub fn epub_output_path(input: &Path) -> PathBuf {
    input.with_extension(EPUB_EXTENSION)
}
