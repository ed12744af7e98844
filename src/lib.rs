//! cbz2epub - CBZ merging and CBZ to EPUB conversion
//!
//! This crate reads comic-book archives (CBZ: a zip file of page images), merges
//! several of them into one archive, and assembles them into EPUB packages.
//!
//! # Getting Started
//!
//! The engines are plain synchronous functions:
//!
//! ```rust,no_run
//! use cbz2epub::prelude::*;
//!
//! fn main() -> cbz2epub::error::Result<()> {
//!     // Pages come back sorted by file name
//!     let archive = read_archive(Path::new("Vol 1.cbz"))?;
//!     println!("{} pages", archive.len());
//!
//!     // Titled "Vol 1", with a fresh identifier and today's date
//!     assemble(&archive, Path::new("Vol 1.epub"))?;
//!
//!     // chapter001_001.jpg, chapter001_002.jpg, chapter002_003.jpg, ...
//!     merge_archives(&["Vol 1.cbz", "Vol 2.cbz"], Path::new("merged.cbz"))?;
//!     Ok(())
//! }
//! ```
//!
//! For batch work, [`converter::ConverterConfig`] resolves inputs, walks directories,
//! defaults output paths, and runs the engines one file at a time on tokio.

pub mod archive;
pub mod converter;
pub mod error;
pub mod generator;
pub mod identifier;
pub mod path_utils;
pub mod types;

pub use archive::read_archive;
pub use converter::{ConversionMode, ConverterConfig, ConverterConfigBuilder};
pub use generator::cbz::merge_archives;
pub use generator::epub::{DocumentMetadata, assemble, assemble_with_metadata};
pub use identifier::generate_uuid_v4;

// Re-export core types for direct access
pub use types::{
    Archive, ConversionFailure, ConversionReport, Image, MergeReport, MimeType, PagePlacement,
};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions, allowing you
/// to import everything you need with a single `use cbz2epub::prelude::*;` statement.
pub mod prelude {
    pub use super::{
        Archive, ConversionFailure, ConversionMode, ConversionReport, ConverterConfig,
        ConverterConfigBuilder, DocumentMetadata, Image, MergeReport, MimeType, PagePlacement,
        assemble, assemble_with_metadata, error, generate_uuid_v4, generator, merge_archives,
        read_archive, types,
    };
    pub use crate::generator::Generator;
    pub use std::path::{Path, PathBuf};
}
