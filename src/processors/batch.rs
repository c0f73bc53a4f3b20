// sizetailor/src/processors/batch.rs
use crate::core::processor::FileProcessor;
use crate::core::{Mode, ProcessConfig, ProcessingStats, Result, TailorError};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const COMPRESSIBLE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Applies one [`ProcessConfig`] to every file in a directory.
///
/// Files run in parallel; each file's own work stays sequential.
pub struct BatchProcessor {
    config: ProcessConfig,
    thread_pool: Option<rayon::ThreadPool>,
}

impl BatchProcessor {
    pub fn new(config: ProcessConfig, max_threads: usize) -> Result<Self> {
        config.validate()?;

        let thread_pool = if max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build()
                .map_err(|e| {
                    TailorError::ProcessingError(format!("Failed to create thread pool: {}", e))
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { config, thread_pool })
    }

    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        recursive: bool,
    ) -> Result<ProcessingStats> {
        self.validate_paths(input_dir, output_dir)?;

        let paths = self.collect_paths(input_dir, output_dir, recursive);
        if paths.is_empty() {
            log::warn!("No files to process in {}", input_dir.display());
            return Ok(ProcessingStats::default());
        }

        log::info!("Processing {} files from {}", paths.len(), input_dir.display());

        std::fs::create_dir_all(output_dir)?;

        let pb = self.create_progress_bar(paths.len());
        let processor = FileProcessor::new(self.config.clone());

        let run = || {
            paths
                .par_iter()
                .progress_with(pb.clone())
                .map(|path| Self::process_one(&processor, path, output_dir))
                .reduce(ProcessingStats::default, |mut acc, stats| {
                    acc.merge(stats);
                    acc
                })
        };

        let stats = match &self.thread_pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        pb.finish_with_message(format!(
            "Processed {} files ({:+.1}% size change)",
            stats.processed_count,
            Self::overall_change_percent(&stats)
        ));

        Ok(stats)
    }

    fn process_one(processor: &FileProcessor, path: &Path, output_dir: &Path) -> ProcessingStats {
        let mut stats = ProcessingStats::default();
        let name = path.display().to_string();

        match processor.process_into_dir(path, output_dir) {
            Ok(report) => stats.record(&report),
            Err(e @ (TailorError::ModeUnavailable(_) | TailorError::TargetOutOfBounds { .. })) => {
                log::warn!("Skipping {}: {}", name, e);
                stats.skipped.push((name, e.to_string()));
            }
            Err(e) => {
                log::warn!("Failed to process {}: {}", name, e);
                stats.errors.push((name, e.to_string()));
            }
        }

        stats
    }

    fn collect_paths(&self, input_dir: &Path, output_dir: &Path, recursive: bool) -> Vec<PathBuf> {
        let walker = if recursive {
            WalkDir::new(input_dir)
        } else {
            WalkDir::new(input_dir).max_depth(1)
        };

        let images_only = self.config.mode == Some(Mode::Compress);

        walker
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| !entry.path().starts_with(output_dir))
            .filter(|entry| !images_only || Self::has_compressible_extension(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    fn has_compressible_extension(path: &Path) -> bool {
        crate::utils::get_file_extension(path)
            .map(|ext| COMPRESSIBLE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }

    /// Growth of the processed files as a whole, negative when they shrank.
    pub fn overall_change_percent(stats: &ProcessingStats) -> f64 {
        if stats.total_size_before == 0 {
            return 0.0;
        }

        (stats.total_size_after as f64 - stats.total_size_before as f64)
            / stats.total_size_before as f64
            * 100.0
    }

    pub fn validate_paths(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.exists() {
            return Err(TailorError::InvalidParameter(format!(
                "Input directory does not exist: {}",
                input_dir.display()
            )));
        }

        if !input_dir.is_dir() {
            return Err(TailorError::InvalidParameter(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(TailorError::InvalidParameter(format!(
                "Output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }

        if input_dir == output_dir {
            return Err(TailorError::InvalidParameter(
                "Input and output directories cannot be the same".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_percent() {
        let stats = ProcessingStats {
            total_size_before: 200,
            total_size_after: 50,
            ..Default::default()
        };
        assert_eq!(BatchProcessor::overall_change_percent(&stats), -75.0);
        assert_eq!(BatchProcessor::overall_change_percent(&ProcessingStats::default()), 0.0);
    }

    #[test]
    fn rejects_same_input_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let batch = BatchProcessor::new(ProcessConfig::default(), 1).unwrap();
        assert!(batch.validate_paths(dir.path(), dir.path()).is_err());
    }

    #[test]
    fn compress_mode_only_collects_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("c.PNG"), b"x").unwrap();

        let config = ProcessConfig {
            mode: Some(Mode::Compress),
            ..Default::default()
        };
        let batch = BatchProcessor::new(config, 1).unwrap();
        let mut names: Vec<String> = batch
            .collect_paths(dir.path(), &dir.path().join("out"), false)
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "c.PNG"]);
    }
}
