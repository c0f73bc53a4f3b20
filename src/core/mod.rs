// sizetailor/src/core/mod.rs
pub mod engine;
pub mod processor;

use std::fmt;
use thiserror::Error;

/// Hard cap on any input file, shared by every mode.
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Smallest source that may be compressed, and the floor of every compress target.
pub const MIN_COMPRESS_SIZE_BYTES: u64 = 10 * 1024;

/// Number of quality samples taken by the compress search.
pub const SEARCH_ITERATIONS: u32 = 10;

/// Quality used when no sampled quality fits the budget.
pub const FALLBACK_QUALITY: f64 = 0.01;

pub const COMPRESSIBLE_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

pub const COMPRESSED_SUFFIX: &str = "-compressed";

pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Compress,
    Inflate,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Compress => write!(f, "compress"),
            Mode::Inflate => write!(f, "inflate"),
        }
    }
}

/// Inclusive range of legal target sizes for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: u64,
    pub max: u64,
}

impl SizeBounds {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// True when `min > max`, i.e. no target is legal.
    pub fn is_degenerate(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, bytes: u64) -> bool {
        bytes >= self.min && bytes <= self.max
    }

    /// Pulls `bytes` into the range. A degenerate range clamps to `min`.
    pub fn clamp(&self, bytes: u64) -> u64 {
        if self.is_degenerate() {
            return self.min;
        }
        bytes.clamp(self.min, self.max)
    }
}

/// Input file as handed over by the caller. The engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    pub mode: Mode,
    pub target_bytes: u64,
}

impl TargetSpec {
    pub fn new(mode: Mode, target_bytes: u64) -> Self {
        Self { mode, target_bytes }
    }

    /// Caller-side check that the mode is offered for `source` and the target
    /// sits inside its bounds. The engine itself never calls this.
    pub fn validate(&self, source: &SourceFile) -> Result<()> {
        use crate::processors::SizeBoundsCalculator;

        if self.mode == Mode::Compress && !SizeBoundsCalculator::is_compressible(source) {
            return Err(TailorError::ModeUnavailable(format!(
                "{} ({}, {} bytes) cannot be compressed; only images of type {} larger than {} bytes can",
                source.name,
                source.media_type,
                source.size(),
                COMPRESSIBLE_MEDIA_TYPES.join(", "),
                MIN_COMPRESS_SIZE_BYTES
            )));
        }

        let bounds = SizeBoundsCalculator::bounds(source.size(), self.mode);
        if !bounds.contains(self.target_bytes) {
            return Err(TailorError::TargetOutOfBounds {
                target: self.target_bytes,
                min: bounds.min,
                max: bounds.max,
            });
        }

        Ok(())
    }
}

/// Per-run settings for [`processor::FileProcessor`]. Unset mode and target
/// fall back to the defaults for each file.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub mode: Option<Mode>,
    pub target_bytes: Option<u64>,
    pub enforce_bounds: bool,
    pub max_file_size: u64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            mode: None,
            target_bytes: None,
            enforce_bounds: true,
            max_file_size: MAX_FILE_SIZE_BYTES,
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_bytes == Some(0) {
            return Err(TailorError::InvalidParameter(
                "Target size must be greater than zero".to_string(),
            ));
        }

        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE_BYTES {
            return Err(TailorError::InvalidParameter(format!(
                "File size limit must be between 1 and {} bytes",
                MAX_FILE_SIZE_BYTES
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub processed_count: usize,
    pub total_size_before: u64,
    pub total_size_after: u64,
    /// Compress runs that ended on the fallback encode, still over target.
    pub missed_targets: usize,
    /// Files the mode or target did not apply to.
    pub skipped: Vec<(String, String)>,
    pub errors: Vec<(String, String)>,
}

impl ProcessingStats {
    pub fn record(&mut self, report: &processor::TailorReport) {
        self.processed_count += 1;
        self.total_size_before += report.original_size;
        self.total_size_after += report.achieved_size;
        if !report.met_target {
            self.missed_targets += 1;
        }
    }

    pub fn merge(&mut self, other: ProcessingStats) {
        self.processed_count += other.processed_count;
        self.total_size_before += other.total_size_before;
        self.total_size_after += other.total_size_after;
        self.missed_targets += other.missed_targets;
        self.skipped.extend(other.skipped);
        self.errors.extend(other.errors);
    }
}

/// Output of one tailoring run. Ownership passes to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TailoringResult {
    pub output_bytes: Vec<u8>,
    pub achieved_size: u64,
    pub suggested_name: String,
    pub media_type: String,
    pub original_size: u64,
    /// Encode quality actually used. `None` for inflate.
    pub quality: Option<f64>,
    /// False only when compress had to fall back to the minimal quality encode.
    pub met_target: bool,
}

impl TailoringResult {
    /// Positive when the output grew, negative when it shrank.
    pub fn size_delta(&self) -> i64 {
        self.achieved_size as i64 - self.original_size as i64
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }

        let reduction = (self.original_size as f64 - self.achieved_size as f64)
            / self.original_size as f64
            * 100.0;
        reduction.max(0.0)
    }
}

#[derive(Error, Debug)]
pub enum TailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("File is too large ({size} bytes); maximum size is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("Mode not available: {0}")]
    ModeUnavailable(String),

    #[error("Target size {target} bytes is outside the allowed range [{min}, {max}]")]
    TargetOutOfBounds { target: u64, min: u64, max: u64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),
}

pub type Result<T> = std::result::Result<T, TailorError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(size: usize) -> SourceFile {
        SourceFile::new("photo.jpg", "image/jpeg", vec![0xAB; size])
    }

    #[test]
    fn bounds_clamp_and_contains() {
        let bounds = SizeBounds::new(10, 20);
        assert!(bounds.contains(10));
        assert!(bounds.contains(20));
        assert!(!bounds.contains(21));
        assert_eq!(bounds.clamp(5), 10);
        assert_eq!(bounds.clamp(25), 20);
        assert_eq!(bounds.clamp(15), 15);
    }

    #[test]
    fn degenerate_bounds_clamp_to_min() {
        let bounds = SizeBounds::new(10 * 1024, 9000);
        assert!(bounds.is_degenerate());
        assert_eq!(bounds.clamp(9000), 10 * 1024);
    }

    #[test]
    fn validate_rejects_compress_below_threshold() {
        let spec = TargetSpec::new(Mode::Compress, 10 * 1024);
        let err = spec.validate(&jpeg(9000)).unwrap_err();
        assert!(matches!(err, TailorError::ModeUnavailable(_)));
    }

    #[test]
    fn validate_rejects_compress_for_non_images() {
        let source = SourceFile::new("notes.txt", "text/plain", vec![b'a'; 50_000]);
        let err = TargetSpec::new(Mode::Compress, 20_000).validate(&source).unwrap_err();
        assert!(matches!(err, TailorError::ModeUnavailable(_)));
    }

    #[test]
    fn validate_rejects_out_of_bounds_target() {
        let err = TargetSpec::new(Mode::Inflate, 3000).validate(&jpeg(5000)).unwrap_err();
        assert!(matches!(
            err,
            TailorError::TargetOutOfBounds { target: 3000, min: 5000, max: MAX_FILE_SIZE_BYTES }
        ));
    }

    #[test]
    fn validate_accepts_in_bounds_targets() {
        let source = jpeg(500_000);
        assert!(TargetSpec::new(Mode::Compress, 250_000).validate(&source).is_ok());
        assert!(TargetSpec::new(Mode::Inflate, 600_000).validate(&source).is_ok());
    }

    #[test]
    fn config_validation() {
        assert!(ProcessConfig::default().validate().is_ok());

        let zero_target = ProcessConfig {
            target_bytes: Some(0),
            ..Default::default()
        };
        assert!(zero_target.validate().is_err());

        let oversized_cap = ProcessConfig {
            max_file_size: MAX_FILE_SIZE_BYTES + 1,
            ..Default::default()
        };
        assert!(oversized_cap.validate().is_err());
    }

    #[test]
    fn reduction_and_delta() {
        let result = TailoringResult {
            output_bytes: vec![0; 250],
            achieved_size: 250,
            suggested_name: "a-compressed.jpg".to_string(),
            media_type: "image/jpeg".to_string(),
            original_size: 1000,
            quality: Some(0.5),
            met_target: true,
        };
        assert_eq!(result.size_delta(), -750);
        assert!((result.reduction_percent() - 75.0).abs() < f64::EPSILON);
    }
}
