use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::task::spawn_blocking;

use crate::archive::read_archive;
use crate::error::{Error, Result};
use crate::generator::cbz::merge_archives;
use crate::generator::epub::assemble;
use crate::path_utils::{DEFAULT_MERGE_OUTPUT, epub_output_path, is_cbz_file, path_to_string_lossy};
use crate::types::{ConversionFailure, ConversionReport, MergeReport};

/// What a [`ConverterConfig`] does with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConversionMode {
    /// Combine every input into one CBZ archive
    Merge,
    /// Turn every CBZ input into its own EPUB
    Convert,
}

/// The conversion driver configuration, built declaratively using the builder pattern.
///
/// The driver resolves its inputs, picks output paths, and runs the archive engines
/// one file at a time. Each engine call runs on a blocking task and is awaited to
/// completion before the next input is touched.
///
/// ## Builder Pattern
///
/// ```rust,no_run
/// # use cbz2epub::prelude::*;
/// # #[tokio::main]
/// # async fn main() -> cbz2epub::error::Result<()> {
/// let config = ConverterConfig::builder()
///     .mode(ConversionMode::Convert)
///     .inputs(vec![PathBuf::from("Vol 1.cbz"), PathBuf::from("Vol 2.cbz")])
///     .build()?;
///
/// let report = config.run().await?;
/// println!("Converted {} files", report.converted.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConverterConfig {
    /// Whether to merge the inputs or convert each of them.
    pub mode: ConversionMode,

    /// Input files and, for conversions with [`recursive`](ConverterConfig::recursive), directories.
    ///
    /// When empty and `recursive` is set, the `.cbz` files of the current directory are used.
    #[builder(default)]
    pub inputs: Vec<PathBuf>,

    /// Output file.
    ///
    /// Merging defaults to `merged.cbz`. Converting uses this path only when there is
    /// exactly one input; otherwise each input gets a sibling `.epub` file.
    #[builder(default)]
    pub output_path: Option<PathBuf>,

    /// Walk directory inputs and their subdirectories when converting.
    #[builder(default = "false")]
    pub recursive: bool,
}

impl ConverterConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        let has_inputs = self
            .inputs
            .as_ref()
            .is_some_and(|inputs| !inputs.is_empty());
        let recursive = self.recursive.unwrap_or(false);

        if !has_inputs && !recursive {
            return Err("At least one input is required unless `recursive` is set".to_string());
        }
        Ok(())
    }
}

impl ConverterConfig {
    /// Creates a new builder for configuring `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }

    /// Runs the configured mode.
    ///
    /// A merge reports every input against the single merged output.
    pub async fn run(&self) -> Result<ConversionReport> {
        match self.mode {
            ConversionMode::Merge => {
                let inputs = self.sorted_inputs().await?;
                let (output, _) = self.merge_sorted(inputs.clone()).await?;
                Ok(ConversionReport {
                    converted: inputs
                        .into_iter()
                        .map(|input| (input, output.clone()))
                        .collect(),
                    ..Default::default()
                })
            }
            ConversionMode::Convert => self.convert_inputs().await,
        }
    }

    /// Merges every input, in lexicographic path order, into one CBZ archive.
    ///
    /// # Returns
    ///
    /// * `Ok((PathBuf, MergeReport))` - The output path and what was written to it
    /// * `Err(Error::NoInputs)` - No input could be resolved
    /// * `Err(Error)` - The first read or write failure of the merge
    pub async fn merge_inputs(&self) -> Result<(PathBuf, MergeReport)> {
        let inputs = self.sorted_inputs().await?;
        self.merge_sorted(inputs).await
    }

    /// Converts every CBZ input to EPUB.
    ///
    /// Inputs are handled in order and one failure does not stop the others:
    /// - a missing path is recorded as a failure
    /// - a directory is walked when `recursive` is set and skipped otherwise
    /// - a file without a `.cbz` extension is skipped
    ///
    /// # Returns
    ///
    /// * `Ok(ConversionReport)` - What was converted, skipped, and what failed
    /// * `Err(Error::NoInputs)` - No input could be resolved
    pub async fn convert_inputs(&self) -> Result<ConversionReport> {
        let inputs = self.resolve_inputs().await?;
        if inputs.is_empty() {
            log::warn!("No input files specified");
            return Err(Error::NoInputs);
        }

        let single_output = match (&self.output_path, inputs.len()) {
            (Some(output), 1) => Some(output.clone()),
            _ => None,
        };

        let mut report = ConversionReport::default();

        for input in &inputs {
            let metadata = match fs::metadata(input).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::error!("Error accessing {}: {}", path_to_string_lossy(input), e);
                    report.failures.push(ConversionFailure {
                        path: input.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if metadata.is_dir() {
                if self.recursive {
                    Self::convert_directory(input, &mut report).await;
                } else {
                    log::info!(
                        "Skipping directory {} (use --recursive to process directories)",
                        path_to_string_lossy(input)
                    );
                    report.skipped.push(input.clone());
                }
                continue;
            }

            if !is_cbz_file(input) {
                log::info!("Skipping non-CBZ file: {}", path_to_string_lossy(input));
                report.skipped.push(input.clone());
                continue;
            }

            let output = single_output
                .clone()
                .unwrap_or_else(|| epub_output_path(input));
            Self::convert_one(input, output, &mut report).await;
        }

        Ok(report)
    }

    // --- Private helper methods ---

    async fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        if self.inputs.is_empty() && self.recursive {
            return cbz_files_in_directory(Path::new(".")).await;
        }
        Ok(self.inputs.clone())
    }

    async fn sorted_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut inputs = self.resolve_inputs().await?;
        if inputs.is_empty() {
            log::warn!("No input files specified");
            return Err(Error::NoInputs);
        }
        inputs.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Ok(inputs)
    }

    async fn merge_sorted(&self, inputs: Vec<PathBuf>) -> Result<(PathBuf, MergeReport)> {
        let output = self
            .output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MERGE_OUTPUT));

        log::debug!(
            "Merging {} files into {}",
            inputs.len(),
            path_to_string_lossy(&output)
        );

        let report = merge_files(inputs, output.clone()).await.inspect_err(|e| {
            log::error!("Error merging CBZ files: {}", e);
        })?;

        log::info!(
            "Successfully merged {} CBZ files into {}",
            report.chapters,
            path_to_string_lossy(&output)
        );

        Ok((output, report))
    }

    async fn convert_directory(directory: &Path, report: &mut ConversionReport) {
        log::debug!("Processing directory: {}", path_to_string_lossy(directory));

        let files = match collect_cbz_files(directory).await {
            Ok(files) => files,
            Err(e) => {
                log::error!(
                    "Error reading directory {}: {}",
                    path_to_string_lossy(directory),
                    e
                );
                report.failures.push(ConversionFailure {
                    path: directory.to_path_buf(),
                    message: e.to_string(),
                });
                return;
            }
        };

        if files.is_empty() {
            log::info!("No CBZ files found in {}", path_to_string_lossy(directory));
            return;
        }

        for file in files {
            let output = epub_output_path(&file);
            Self::convert_one(&file, output, report).await;
        }
    }

    async fn convert_one(input: &Path, output: PathBuf, report: &mut ConversionReport) {
        log::debug!(
            "Converting {} to {}",
            path_to_string_lossy(input),
            path_to_string_lossy(&output)
        );

        match convert_file(input.to_path_buf(), output.clone()).await {
            Ok(()) => {
                log::info!(
                    "Successfully converted {} to {}",
                    path_to_string_lossy(input),
                    path_to_string_lossy(&output)
                );
                report.converted.push((input.to_path_buf(), output));
            }
            Err(e) => {
                log::error!("Error converting {}: {}", path_to_string_lossy(input), e);
                report.failures.push(ConversionFailure {
                    path: input.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Reads the CBZ at `input` and assembles it into an EPUB at `output`.
///
/// Both steps run on a blocking task; the future resolves once the output file
/// has been finalized or an error occurred.
pub async fn convert_file(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Result<()> {
    let input = input.into();
    let output = output.into();
    spawn_blocking(move || {
        let archive = read_archive(&input)?;
        assemble(&archive, &output)
    })
    .await?
}

/// Merges the given archives, in the given order, into `output`.
pub async fn merge_files(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Result<MergeReport> {
    let output = output.into();
    spawn_blocking(move || merge_archives(&inputs, &output)).await?
}

/// The `.cbz` files directly inside `directory`, sorted by path.
pub async fn cbz_files_in_directory(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = fs::read_dir(directory).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_dir() && is_cbz_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

/// The `.cbz` files under `root`, depth-first.
///
/// A directory's own files come first, in name order, followed by each of its
/// subdirectories in name order.
pub async fn collect_cbz_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(directory) = pending.pop() {
        let mut files = Vec::new();
        let mut subdirectories = Vec::new();

        let mut entries = fs::read_dir(&directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                subdirectories.push(path);
            } else if is_cbz_file(&path) {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        subdirectories.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        found.extend(files);
        // Reversed so the first subdirectory is popped next
        pending.extend(subdirectories.into_iter().rev());
    }

    Ok(found)
}
