use crate::archive::read_archive;
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::types::{Image, MergeReport, PagePlacement};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entry name of a merged page: `chapter{chapter:03}_{sequence:03}{extension}`.
pub fn merged_entry_name(placement: PagePlacement, extension: &str) -> String {
    format!(
        "chapter{:03}_{:03}{}",
        placement.chapter, placement.sequence, extension
    )
}

/// A generator for creating CBZ (Comic Book ZIP) files.
///
/// Pages are written with Deflate compression under their merged entry name and
/// nothing else is added to the archive.
pub struct Cbz {
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
    output_path: PathBuf,
    page_count: usize,
}

impl Cbz {
    /// Number of pages written so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

impl Generator for Cbz {
    fn new(output_path: &Path) -> Result<Self> {
        let options: SimpleFileOptions = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let file = File::create(output_path).map_err(|e| Error::write(output_path, e))?;

        Ok(Cbz {
            zip: ZipWriter::new(file),
            options,
            output_path: output_path.to_path_buf(),
            page_count: 0,
        })
    }

    fn add_page(&mut self, placement: PagePlacement, image: &Image) -> Result<&mut Self> {
        let file_name = merged_entry_name(placement, image.extension());

        self.zip
            .start_file(file_name, self.options)
            .map_err(|e| Error::write(&self.output_path, e))?;
        self.zip
            .write_all(image.data())
            .map_err(|e| Error::write(&self.output_path, e))?;

        self.page_count += 1;

        Ok(self)
    }

    fn save(self) -> Result<()> {
        self.zip
            .finish()
            .map_err(|e| Error::write(&self.output_path, e))?;
        Ok(())
    }
}

/// Merges the page images of several CBZ archives into a single new archive.
///
/// Inputs are processed in the given order; the caller decides that order. The
/// archive at position `c` (1-based) becomes chapter `c`, and a single sequence
/// number runs across all inputs without resetting, so every output name is
/// unique even when source file names collide.
///
/// # Arguments
///
/// * `paths` - Input archives, in chapter order
/// * `output_path` - Path of the merged archive to create
///
/// # Returns
///
/// * `Ok(MergeReport)` - Number of chapters read and images written
/// * `Err(Error)` - The first read or write failure; the partially written output
///   is left on disk
pub fn merge_archives<P: AsRef<Path>>(paths: &[P], output_path: &Path) -> Result<MergeReport> {
    let mut cbz = Cbz::new(output_path)?;

    let report = paths.iter().enumerate().try_fold(
        MergeReport::default(),
        |report, (index, path)| -> Result<MergeReport> {
            let archive = read_archive(path.as_ref())?;
            let chapter = index + 1;

            for (offset, image) in archive.images().iter().enumerate() {
                let placement = PagePlacement::new(chapter, report.images + offset + 1);
                cbz.add_page(placement, image)?;
            }

            log::debug!(
                "Merged {} images from '{}' as chapter {}",
                archive.len(),
                path.as_ref().to_string_lossy(),
                chapter
            );

            Ok(MergeReport {
                chapters: chapter,
                images: report.images + archive.len(),
            })
        },
    )?;

    cbz.save()?;

    Ok(report)
}
