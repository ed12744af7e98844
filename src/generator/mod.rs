//! Generator module provides the trait and implementations for the output containers.
//!
//! This module contains the common interface for archive writers and the two
//! concrete formats: [`cbz::Cbz`] for merged comic archives and [`epub::EPub`] for
//! assembled e-book packages.

use crate::error::Result;
use crate::types::{Image, PagePlacement};
use std::path::Path;

pub mod cbz;
pub mod epub;

/// Common interface for all file generators.
///
/// A generator owns an output container from creation to [`save`](Generator::save).
/// Callers decide where each page goes through a [`PagePlacement`]; the generator
/// turns that placement into its own entry names, so the naming stays a pure
/// function of position and never of the source file names.
pub trait Generator {
    /// Creates the output container at `output_path`.
    ///
    /// # Parameters
    /// * `output_path` - Full path of the file to create (an existing file is truncated)
    ///
    /// # Returns
    /// * `Result<Self>` - A new generator instance or `Error::Write` if creation fails
    fn new(output_path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Adds a page to the generated container.
    ///
    /// # Parameters
    /// * `placement` - 1-based chapter and sequence number of the page
    /// * `image` - The page image; its bytes are written unchanged
    ///
    /// # Returns
    /// * `Result<&mut Self>` - Self reference for method chaining, or an error if failed
    fn add_page(&mut self, placement: PagePlacement, image: &Image) -> Result<&mut Self>
    where
        Self: Sized;

    /// Finalizes the container and flushes it to disk.
    fn save(self) -> Result<()>;
}

/// Escapes the five XML special characters in `text`.
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
