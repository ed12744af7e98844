//! CBZ archive reading.
//!
//! This module opens zip containers and collects the page images they hold. Entries
//! that are directories or that do not carry an image extension are skipped, and
//! the retained pages are sorted by base file name so that every consumer sees the
//! same canonical page order regardless of how the container was written.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};
use crate::types::{Archive, Image, base_name, is_image_file};

/// Reads the page images of the CBZ container at `path`.
///
/// # Arguments
///
/// * `path` - Path to a zip-compatible archive
///
/// # Returns
///
/// * `Ok(Archive)` - The images, sorted by name, with `source_path` set to `path`
/// * `Err(Error::Open)` - The file is missing or not a valid zip container
/// * `Err(Error::Read)` - An image entry is present but its data is corrupt
pub fn read_archive(path: &Path) -> Result<Archive> {
    let open_error = |source: ZipError| Error::Open {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| open_error(ZipError::Io(e)))?;
    let mut zip = ZipArchive::new(file).map_err(open_error)?;

    let mut images = Vec::new();
    for index in 0..zip.len() {
        // Filter on the central directory name so skipped entries are never opened
        let Some(entry_name) = zip.name_for_index(index).map(str::to_string) else {
            continue;
        };
        if is_directory_entry(&entry_name) || !is_image_file(&entry_name) {
            continue;
        }

        let read_error = |source: std::io::Error| Error::Read {
            path: path.to_path_buf(),
            entry: entry_name.clone(),
            source,
        };

        let mut entry = zip
            .by_index(index)
            .map_err(|e| read_error(std::io::Error::other(e)))?;
        let mut data = Vec::new();
        entry.read_to_end(&mut data).map_err(read_error)?;

        images.push(Image::new(base_name(&entry_name), data));
    }

    log::debug!(
        "Read {} images from '{}'",
        images.len(),
        path.to_string_lossy()
    );

    Ok(Archive::new(path, images))
}

fn is_directory_entry(entry_name: &str) -> bool {
    entry_name.ends_with('/') || entry_name.ends_with('\\')
}

impl Archive {
    /// Reads an archive from disk. See [`read_archive`].
    pub fn read(path: impl AsRef<Path>) -> Result<Archive> {
        read_archive(path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::is_directory_entry;

    #[test]
    fn test_is_directory_entry() {
        assert!(is_directory_entry("chapter/"));
        assert!(is_directory_entry("cover.jpg/"));
        assert!(is_directory_entry("windows\\"));
        assert!(!is_directory_entry("chapter/01.jpg"));
    }
}
