// sizetailor/src/core/processor.rs
use super::engine::TailoringEngine;
use super::{Mode, ProcessConfig, Result, TailorError, TargetSpec};
use crate::processors::{Loader, MetadataProcessor, SizeBoundsCalculator};
use crate::utils::write_output_file;
use std::path::{Path, PathBuf};

/// Outcome of tailoring one file on disk.
#[derive(Debug, Clone)]
pub struct TailorReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub mode: Mode,
    pub target_bytes: u64,
    pub original_size: u64,
    pub achieved_size: u64,
    pub quality: Option<f64>,
    pub met_target: bool,
}

/// Drives one file from disk through the engine and back to disk, taking on
/// the caller duties the engine leaves out: the input size cap, mode gating,
/// target defaults and bounds checks.
pub struct FileProcessor {
    config: ProcessConfig,
    loader: Loader,
    engine: TailoringEngine,
    metadata_processor: MetadataProcessor,
}

impl FileProcessor {
    pub fn new(config: ProcessConfig) -> Self {
        let loader = Loader::new().with_max_file_size(config.max_file_size);

        Self {
            config,
            loader,
            engine: TailoringEngine::new(),
            metadata_processor: MetadataProcessor::new(),
        }
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Tailors `input_path` and writes the result to `output_path`, or next
    /// to the input under the suggested name when `output_path` is `None`.
    pub fn process(&self, input_path: &Path, output_path: Option<&Path>) -> Result<TailorReport> {
        self.process_with(input_path, output_path, input_path)
    }

    /// Tailors `input_path` and writes the result into `output_dir` under the
    /// suggested name.
    pub fn process_into_dir(&self, input_path: &Path, output_dir: &Path) -> Result<TailorReport> {
        let file_name = input_path.file_name().ok_or_else(|| {
            TailorError::InvalidParameter(format!("Invalid file name: {}", input_path.display()))
        })?;

        std::fs::create_dir_all(output_dir)?;
        self.process_with(input_path, None, &output_dir.join(file_name))
    }

    /// `anchor` is the path whose file name gets replaced by the suggested
    /// name when no explicit output is given.
    fn process_with(
        &self,
        input_path: &Path,
        output_path: Option<&Path>,
        anchor: &Path,
    ) -> Result<TailorReport> {
        self.config.validate()?;
        self.validate_paths(input_path, output_path)?;

        let source = self.loader.load(input_path)?;

        let mode = self
            .config
            .mode
            .unwrap_or_else(|| SizeBoundsCalculator::default_mode(&source));
        let target_bytes = self
            .config
            .target_bytes
            .unwrap_or_else(|| SizeBoundsCalculator::default_target(source.size(), mode));
        let spec = TargetSpec::new(mode, target_bytes);

        if self.config.enforce_bounds {
            spec.validate(&source)?;
        } else {
            log::debug!("Bounds check skipped for {}", source.name);
        }

        if mode == Mode::Compress {
            if let Some(exif) = self.metadata_processor.read_metadata(&source) {
                log::info!(
                    "{} carries {} EXIF fields; they are not kept when re-encoding",
                    source.name,
                    self.metadata_processor.field_count(&exif)
                );
            }
        }

        let result = self.engine.process_spec(&source, &spec)?;

        let output_path = write_output_file(
            anchor,
            output_path,
            &result.suggested_name,
            &result.output_bytes,
        )?;

        log::info!(
            "Wrote {} ({} bytes)",
            output_path.display(),
            result.achieved_size
        );

        Ok(TailorReport {
            input_path: input_path.to_path_buf(),
            output_path,
            mode,
            target_bytes,
            original_size: result.original_size,
            achieved_size: result.achieved_size,
            quality: result.quality,
            met_target: result.met_target,
        })
    }

    fn validate_paths(&self, input_path: &Path, output_path: Option<&Path>) -> Result<()> {
        if !input_path.exists() {
            return Err(TailorError::InvalidParameter(format!(
                "Input file does not exist: {}",
                input_path.display()
            )));
        }

        if let Some(output) = output_path {
            if output == input_path {
                return Err(TailorError::InvalidParameter(
                    "Input and output paths cannot be the same".to_string(),
                ));
            }
            if output.is_dir() {
                return Err(TailorError::InvalidParameter(format!(
                    "Output path is a directory: {}",
                    output.display()
                )));
            }
        }

        Ok(())
    }
}
