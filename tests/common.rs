//! Common test utilities and constants for the cbz2epub crate.
//!
//! Provides functions for setting up test directories, writing small CBZ fixtures,
//! and inspecting the zip containers the crate produces.

use cbz2epub::error::Result;
use rand::{Rng, distributions::Alphanumeric};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

#[allow(dead_code)]
pub const TEST_TMP_DIR: &str = "tests/tmp";
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Paths of a freshly created, unique test directory.
#[allow(dead_code)]
pub struct TestDirs {
    pub base_dir: PathBuf,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
}

/// Helper function to create a clean test directory with source and target subdirectories.
/// A random suffix keeps concurrently running tests apart.
#[allow(dead_code)]
pub async fn setup_test_dirs(sub_path: &str) -> TestDirs {
    let rand_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let unique_sub_path = format!("{}-{}", sub_path, rand_string);
    let base_dir = PathBuf::from(TEST_TMP_DIR).join(unique_sub_path);
    if base_dir.exists() {
        fs::remove_dir_all(&base_dir).await.unwrap();
    }
    let source_dir = base_dir.join("source");
    let target_dir = base_dir.join("target");

    fs::create_dir_all(&source_dir).await.unwrap();
    fs::create_dir_all(&target_dir).await.unwrap();

    TestDirs {
        base_dir,
        source_dir,
        target_dir,
    }
}

/// Writes a zip container at `path` with the given entries, in order.
///
/// Entry names ending in `/` are written as directories.
#[allow(dead_code)]
pub async fn create_test_cbz(path: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let file = std::fs::File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data)?;
        }
    }
    zip.finish().unwrap();
    Ok(())
}

/// Returns every entry of a zip container as `(name, content)`, in physical order.
#[allow(dead_code)]
pub fn read_zip_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = ZipArchive::new(file).unwrap();
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).unwrap();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        entries.push((entry.name().to_string(), data));
    }
    entries
}

/// Returns the names of every entry of a zip container, in physical order.
#[allow(dead_code)]
pub fn read_zip_names(path: &Path) -> Vec<String> {
    read_zip_entries(path)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

/// Reads one entry of a zip container as UTF-8 text.
#[allow(dead_code)]
pub fn read_zip_text(path: &Path, name: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

/// Checks if a ZIP file (CBZ or EPUB) exists and contains at least one entry.
#[allow(dead_code)]
pub fn assert_valid_zip_file(path: &Path) {
    assert!(path.exists(), "Output ZIP file does not exist: {:?}", path);
    assert!(path.is_file(), "Output ZIP path is not a file: {:?}", path);

    let file = std::fs::File::open(path).unwrap();
    let zip = ZipArchive::new(file).unwrap();
    assert!(zip.len() > 0, "Output ZIP file is empty: {:?}", path);
}
