use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::generator::{Generator, escape_xml};
use crate::identifier::generate_uuid_v4;
use crate::path_utils::title_from_path;
use crate::types::{Archive, Image, MimeType, PagePlacement};

/// Content of the `mimetype` entry. It is stored uncompressed as the first entry.
pub const EPUB_MIMETYPE: &str = "application/epub+zip";
/// Language declared in every package document.
pub const LANGUAGE: &str = "en";
/// Creator declared in every package document.
pub const CREATOR: &str = "CBZ2EPUB Converter";

const CONTAINER_XML: &str = include_str!("../../templates/container.xml");
const CONTENT_OPF: &str = include_str!("../../templates/content.opf");
const TOC_NCX: &str = include_str!("../../templates/toc.ncx");
const PAGE_XHTML: &str = include_str!("../../templates/page.xhtml");

/// File name of an image inside `OEBPS/images/`, e.g. `image007.png`.
pub fn image_file_name(sequence: usize, extension: &str) -> String {
    format!("image{:03}{}", sequence, extension)
}

/// File name of a wrapper page inside `OEBPS/pages/`, e.g. `page007.xhtml`.
pub fn page_file_name(sequence: usize) -> String {
    format!("page{:03}.xhtml", sequence)
}

/// Title, identifier and date written into the package and navigation documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: String,
    /// Bare UUID; the documents prefix it with `urn:uuid:`
    pub identifier: String,
    pub date: NaiveDate,
}

impl DocumentMetadata {
    /// Creates metadata with a fresh random identifier and today's local date.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identifier: generate_uuid_v4(),
            date: Local::now().date_naive(),
        }
    }

    /// Metadata for an archive, titled after its file name without the `.cbz` extension.
    pub fn for_archive(archive: &Archive) -> Self {
        Self::new(title_from_path(archive.source_path()))
    }
}

/// A page already written to the container, waiting for its wrapper and manifest entries.
#[derive(Debug, Clone)]
struct PageEntry {
    sequence: usize,
    image_file_name: String,
    mime_type: MimeType,
}

/// Generates the XHTML wrapper of one page.
fn generate_xhtml(sequence: usize, image_file_name: &str) -> String {
    PAGE_XHTML
        .replace("%src%", &format!("../images/{}", image_file_name))
        .replace("%number%", &sequence.to_string())
}

/// Generates `content.opf`: metadata, manifest (ncx, images, pages) and spine.
fn generate_content_opf(metadata: &DocumentMetadata, pages: &[PageEntry]) -> String {
    let mut manifest = String::new();
    for page in pages {
        manifest.push_str(&format!(
            "    <item id=\"image{:03}\" href=\"images/{}\" media-type=\"{}\"/>\n",
            page.sequence,
            escape_xml(&page.image_file_name),
            page.mime_type
        ));
    }
    for page in pages {
        manifest.push_str(&format!(
            "    <item id=\"page{:03}\" href=\"pages/{}\" media-type=\"application/xhtml+xml\"/>\n",
            page.sequence,
            page_file_name(page.sequence)
        ));
    }

    let spine: String = pages
        .iter()
        .map(|page| format!("    <itemref idref=\"page{:03}\"/>\n", page.sequence))
        .collect();

    // Title goes last so its text is never scanned for placeholders
    CONTENT_OPF
        .replace("%manifest%", &manifest)
        .replace("%spine%", &spine)
        .replace("%language%", LANGUAGE)
        .replace("%creator%", &escape_xml(CREATOR))
        .replace("%date%", &metadata.date.format("%Y-%m-%d").to_string())
        .replace("%identifier%", &escape_xml(&metadata.identifier))
        .replace("%title%", &escape_xml(&metadata.title))
}

/// Generates `toc.ncx` with one navigation point per page.
fn generate_toc_ncx(metadata: &DocumentMetadata, pages: &[PageEntry]) -> String {
    let nav_points: String = pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let play_order = index + 1;
            format!(
                "    <navPoint id=\"navpoint-{play_order}\" playOrder=\"{play_order}\">\n      <navLabel>\n        <text>Page {}</text>\n      </navLabel>\n      <content src=\"pages/{}\"/>\n    </navPoint>\n",
                page.sequence,
                page_file_name(page.sequence)
            )
        })
        .collect();

    TOC_NCX
        .replace("%navpoints%", &nav_points)
        .replace("%identifier%", &escape_xml(&metadata.identifier))
        .replace("%title%", &escape_xml(&metadata.title))
}

fn write_entry(
    zip: &mut ZipWriter<File>,
    output_path: &Path,
    name: &str,
    options: SimpleFileOptions,
    bytes: &[u8],
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::write(output_path, e))?;
    zip.write_all(bytes)
        .map_err(|e| Error::write(output_path, e))?;
    Ok(())
}

/// A generator for creating fixed-layout EPUB files from page images.
///
/// The `mimetype` and `META-INF/container.xml` entries are written on creation,
/// images as they are added, and the wrapper pages, `content.opf` and `toc.ncx`
/// when the book is saved.
pub struct EPub {
    zip: ZipWriter<File>,
    deflated: SimpleFileOptions,
    output_path: PathBuf,
    metadata: DocumentMetadata,
    pages: Vec<PageEntry>,
}

impl EPub {
    /// Creates the container at `output_path` with the given metadata.
    ///
    /// The `mimetype` and `META-INF/container.xml` entries are written immediately.
    pub fn with_metadata(output_path: &Path, metadata: DocumentMetadata) -> Result<Self> {
        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let file = File::create(output_path).map_err(|e| Error::write(output_path, e))?;
        let mut zip = ZipWriter::new(file);

        write_entry(
            &mut zip,
            output_path,
            "mimetype",
            stored,
            EPUB_MIMETYPE.as_bytes(),
        )?;
        write_entry(
            &mut zip,
            output_path,
            "META-INF/container.xml",
            deflated,
            CONTAINER_XML.as_bytes(),
        )?;

        Ok(EPub {
            zip,
            deflated,
            output_path: output_path.to_path_buf(),
            metadata,
            pages: Vec::new(),
        })
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }
}

impl Generator for EPub {
    /// Creates the container, titled after the output file.
    fn new(output_path: &Path) -> Result<Self> {
        let title = output_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::with_metadata(output_path, DocumentMetadata::new(title))
    }

    fn add_page(&mut self, placement: PagePlacement, image: &Image) -> Result<&mut Self> {
        let image_file_name = image_file_name(placement.sequence, image.extension());

        write_entry(
            &mut self.zip,
            &self.output_path,
            &format!("OEBPS/images/{}", image_file_name),
            self.deflated,
            image.data(),
        )?;

        self.pages.push(PageEntry {
            sequence: placement.sequence,
            image_file_name,
            mime_type: image.mime_type(),
        });

        Ok(self)
    }

    fn save(self) -> Result<()> {
        let EPub {
            mut zip,
            deflated,
            output_path,
            metadata,
            pages,
        } = self;

        for page in &pages {
            let xhtml = generate_xhtml(page.sequence, &page.image_file_name);
            write_entry(
                &mut zip,
                &output_path,
                &format!("OEBPS/pages/{}", page_file_name(page.sequence)),
                deflated,
                xhtml.as_bytes(),
            )?;
        }

        let content_opf = generate_content_opf(&metadata, &pages);
        write_entry(
            &mut zip,
            &output_path,
            "OEBPS/content.opf",
            deflated,
            content_opf.as_bytes(),
        )?;

        let toc_ncx = generate_toc_ncx(&metadata, &pages);
        write_entry(
            &mut zip,
            &output_path,
            "OEBPS/toc.ncx",
            deflated,
            toc_ncx.as_bytes(),
        )?;

        zip.finish().map_err(|e| Error::write(&output_path, e))?;
        Ok(())
    }
}

/// Assembles an EPUB from an archive, titled after the archive's file name.
///
/// Pages keep the archive's canonical order and are numbered from 1. A fresh
/// identifier and today's date are written into the package.
///
/// # Arguments
///
/// * `archive` - The source pages
/// * `output_path` - Path of the `.epub` file to create
///
/// # Returns
///
/// * `Ok(())` - The package was written and finalized
/// * `Err(Error::Write)` - An entry could not be created or written; the partial
///   file is left on disk
pub fn assemble(archive: &Archive, output_path: &Path) -> Result<()> {
    assemble_with_metadata(archive, DocumentMetadata::for_archive(archive), output_path)
}

/// Assembles an EPUB from an archive with caller-provided metadata.
pub fn assemble_with_metadata(
    archive: &Archive,
    metadata: DocumentMetadata,
    output_path: &Path,
) -> Result<()> {
    let mut epub = EPub::with_metadata(output_path, metadata)?;

    for (index, image) in archive.images().iter().enumerate() {
        epub.add_page(PagePlacement::new(1, index + 1), image)?;
    }

    log::debug!(
        "Assembling '{}' with {} pages",
        output_path.to_string_lossy(),
        archive.len()
    );

    epub.save()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pages() -> Vec<PageEntry> {
        vec![
            PageEntry {
                sequence: 1,
                image_file_name: image_file_name(1, ".jpg"),
                mime_type: MimeType::Jpeg,
            },
            PageEntry {
                sequence: 2,
                image_file_name: image_file_name(2, ".png"),
                mime_type: MimeType::Png,
            },
        ]
    }

    fn sample_metadata(title: &str) -> DocumentMetadata {
        DocumentMetadata {
            title: title.to_string(),
            identifier: "123e4567-e89b-42d3-a456-426614174000".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(image_file_name(1, ".jpg"), "image001.jpg");
        assert_eq!(image_file_name(42, ".JPEG"), "image042.JPEG");
        assert_eq!(page_file_name(7), "page007.xhtml");
    }

    #[test]
    fn test_generate_xhtml_references_image() {
        let xhtml = generate_xhtml(3, "image003.gif");
        assert!(xhtml.contains("<title>Page 3</title>"));
        assert!(xhtml.contains(r#"<img src="../images/image003.gif" alt="Page 3" />"#));
        assert!(xhtml.contains("max-width: 100%;"));
        assert!(xhtml.contains("XHTML 1.1"));
    }

    #[test]
    fn test_generate_content_opf() {
        let opf = generate_content_opf(&sample_metadata("My Comic"), &sample_pages());

        assert!(opf.contains("<dc:title>My Comic</dc:title>"));
        assert!(opf.contains("<dc:language>en</dc:language>"));
        assert!(opf.contains(
            r#"<dc:identifier id="BookID">urn:uuid:123e4567-e89b-42d3-a456-426614174000</dc:identifier>"#
        ));
        assert!(opf.contains("<dc:date>2024-05-17</dc:date>"));
        assert!(opf.contains("<dc:creator>CBZ2EPUB Converter</dc:creator>"));
        assert!(opf.contains(
            r#"<item id="image001" href="images/image001.jpg" media-type="image/jpeg"/>"#
        ));
        assert!(opf.contains(
            r#"<item id="image002" href="images/image002.png" media-type="image/png"/>"#
        ));
        assert!(opf.contains(
            r#"<item id="page002" href="pages/page002.xhtml" media-type="application/xhtml+xml"/>"#
        ));
        assert!(opf.contains(
            "  <spine toc=\"ncx\">\n    <itemref idref=\"page001\"/>\n    <itemref idref=\"page002\"/>\n  </spine>"
        ));
        assert!(opf.ends_with("</package>"));
    }

    #[test]
    fn test_generate_toc_ncx() {
        let ncx = generate_toc_ncx(&sample_metadata("My Comic"), &sample_pages());

        assert!(ncx.contains(
            r#"<meta name="dtb:uid" content="urn:uuid:123e4567-e89b-42d3-a456-426614174000"/>"#
        ));
        assert!(ncx.contains("<text>My Comic</text>"));
        assert!(ncx.contains(r#"<navPoint id="navpoint-2" playOrder="2">"#));
        assert!(ncx.contains("<text>Page 2</text>"));
        assert!(ncx.contains(r#"<content src="pages/page002.xhtml"/>"#));
        assert!(ncx.ends_with("</ncx>"));
    }

    #[test]
    fn test_title_is_escaped_and_not_expanded() {
        let metadata = sample_metadata("Tom & <Jerry> %date%");
        let opf = generate_content_opf(&metadata, &[]);
        let ncx = generate_toc_ncx(&metadata, &[]);

        assert!(opf.contains("<dc:title>Tom &amp; &lt;Jerry&gt; %date%</dc:title>"));
        assert!(ncx.contains("<text>Tom &amp; &lt;Jerry&gt; %date%</text>"));
    }
}
