mod cli;
mod core;
mod processors;
mod utils;

pub use cli::{parse_target_size, Cli, Commands, ModeArg};
pub use self::core::engine::TailoringEngine;
pub use self::core::processor::{FileProcessor, TailorReport};
pub use self::core::{
    Mode, ProcessConfig, ProcessingStats, Result, SizeBounds, SourceFile, TailorError,
    TailoringResult, TargetSpec, COMPRESSIBLE_MEDIA_TYPES, FALLBACK_QUALITY, MAX_FILE_SIZE_BYTES,
    MIN_COMPRESS_SIZE_BYTES, SEARCH_ITERATIONS,
};
pub use processors::{
    AdaptiveQualityCompressor, BatchProcessor, ExactSizeInflator, ImageCodec, JpegCodec, Loader,
    MetadataProcessor, SizeBoundsCalculator,
};
pub use utils::{
    compressed_file_name, format_file_size, format_kb_mb, media_type_for, write_output_file,
};

pub mod prelude {
    pub use crate::{
        BatchProcessor, FileProcessor, Loader, Mode, ProcessConfig, SizeBoundsCalculator,
        SourceFile, TailoringEngine, TargetSpec,
    };
}
