//! Core data types for the cbz2epub conversion library.
//!
//! This module defines the fundamental data structures used throughout the crate:
//! - Page content read from archives (`Image`, `MimeType`, `Archive`)
//! - Positional naming for writers (`PagePlacement`)
//! - Reports returned by the merge and conversion drivers (`MergeReport`, `ConversionReport`)

use std::path::{Path, PathBuf};

/// Extensions (lowercase, dot included) recognized as page images.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Media type of a page image, derived from its file extension.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MimeType {
    Jpeg,
    Png,
    Gif,
    Webp,
    OctetStream, // Anything we don't recognize
}

impl MimeType {
    /// Maps a file name to its media type by extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Self {
        match file_extension(file_name).to_ascii_lowercase().as_str() {
            ".jpg" | ".jpeg" => MimeType::Jpeg,
            ".png" => MimeType::Png,
            ".gif" => MimeType::Gif,
            ".webp" => MimeType::Webp,
            _ => MimeType::OctetStream,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
            MimeType::Gif => "image/gif",
            MimeType::Webp => "image/webp",
            MimeType::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the extension of `file_name`, dot included, or `""` when there is none.
///
/// The extension is everything from the last `.` of the final path component, so
/// `"page.JPG"` gives `".JPG"` and `".png"` gives `".png"`. The case is preserved.
pub fn file_extension(file_name: &str) -> &str {
    let base = base_name(file_name);
    base.rfind('.').map(|index| &base[index..]).unwrap_or("")
}

/// Strips every directory component from a zip entry name.
pub fn base_name(entry_name: &str) -> &str {
    entry_name.rsplit('/').next().unwrap_or(entry_name)
}

/// Checks if a file name carries one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_file(file_name: &str) -> bool {
    let extension = file_extension(file_name).to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&extension.as_str())
}

/// One page of a comic: its base file name, its raw bytes and its media type.
///
/// The pixel data is never decoded; images are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    name: String,
    data: Vec<u8>,
    mime_type: MimeType,
}

impl Image {
    /// Creates an image, deriving the media type from the name's extension.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = MimeType::from_file_name(&name);
        Self {
            name,
            data,
            mime_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> MimeType {
        self.mime_type
    }

    /// The original extension of the image, verbatim (e.g. `".JPG"`).
    pub fn extension(&self) -> &str {
        file_extension(&self.name)
    }
}

/// In-memory representation of a CBZ container.
///
/// Images are kept sorted by name (byte-wise, stable) which is the canonical page
/// order for every consumer in the crate.
#[derive(Debug, Clone)]
pub struct Archive {
    source_path: PathBuf,
    images: Vec<Image>,
}

impl Archive {
    /// Builds an archive from images in container order, sorting them by name.
    ///
    /// The sort is stable, so images sharing a name keep their relative order.
    pub fn new(source_path: impl Into<PathBuf>, mut images: Vec<Image>) -> Self {
        images.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Self {
            source_path: source_path.into(),
            images,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Where a writer puts a page: the 1-based chapter and the 1-based sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlacement {
    pub chapter: usize,
    pub sequence: usize,
}

impl PagePlacement {
    pub fn new(chapter: usize, sequence: usize) -> Self {
        Self { chapter, sequence }
    }
}

/// Summary of a completed merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeReport {
    pub chapters: usize, // Number of input archives
    pub images: usize,   // Number of entries written
}

/// A single input that could not be converted, with the reason.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a converter run over one or more inputs.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionReport {
    pub converted: Vec<(PathBuf, PathBuf)>, // (input, output)
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<ConversionFailure>,
}

impl ConversionReport {
    /// True when every processed input was converted or deliberately skipped.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_mapping() {
        assert_eq!(MimeType::from_file_name("a.jpg"), MimeType::Jpeg);
        assert_eq!(MimeType::from_file_name("a.JPEG"), MimeType::Jpeg);
        assert_eq!(MimeType::from_file_name("a.Png"), MimeType::Png);
        assert_eq!(MimeType::from_file_name("a.gif"), MimeType::Gif);
        assert_eq!(MimeType::from_file_name("a.webp"), MimeType::Webp);
        assert_eq!(MimeType::from_file_name("a.bmp"), MimeType::OctetStream);
        assert_eq!(MimeType::from_file_name("noext"), MimeType::OctetStream);
        assert_eq!(MimeType::Webp.as_str(), "image/webp");
        assert_eq!(MimeType::OctetStream.to_string(), "application/octet-stream");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("page.JPG"), ".JPG");
        assert_eq!(file_extension("dir/page.tar.png"), ".png");
        assert_eq!(file_extension("dir.d/page"), "");
        assert_eq!(file_extension(".png"), ".png");
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("cover.jpg"));
        assert!(is_image_file("chapter/01.WEBP"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("ComicInfo.xml"));
        assert!(!is_image_file("jpg"));
    }

    #[test]
    fn test_archive_sorts_stably_by_name() {
        let archive = Archive::new(
            "book.cbz",
            vec![
                Image::new("b.png", b"1".to_vec()),
                Image::new("a.jpg", b"2".to_vec()),
                Image::new("b.png", b"3".to_vec()),
                Image::new("B.png", b"4".to_vec()),
            ],
        );
        let order: Vec<(&str, &[u8])> = archive
            .images()
            .iter()
            .map(|image| (image.name(), image.data()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("B.png", &b"4"[..]),
                ("a.jpg", &b"2"[..]),
                ("b.png", &b"1"[..]),
                ("b.png", &b"3"[..]),
            ]
        );
    }
}
