// sizetailor/src/processors/bounds.rs
use crate::core::{
    Mode, SizeBounds, SourceFile, COMPRESSIBLE_MEDIA_TYPES, MAX_FILE_SIZE_BYTES,
    MIN_COMPRESS_SIZE_BYTES,
};

const KIB: u64 = 1024;

/// Extra headroom suggested on top of the original size when inflating.
const DEFAULT_INFLATE_HEADROOM_KB: u64 = 100;

pub struct SizeBoundsCalculator;

impl SizeBoundsCalculator {
    /// Legal target range for a file of `original_bytes` in `mode`.
    ///
    /// For compress the range is degenerate when the original is smaller than
    /// the compress floor; callers gate compress with [`Self::is_compressible`]
    /// before asking.
    pub fn bounds(original_bytes: u64, mode: Mode) -> SizeBounds {
        match mode {
            Mode::Compress => SizeBounds::new(MIN_COMPRESS_SIZE_BYTES, original_bytes),
            Mode::Inflate => SizeBounds::new(original_bytes, MAX_FILE_SIZE_BYTES),
        }
    }

    pub fn is_compressible_media_type(media_type: &str) -> bool {
        COMPRESSIBLE_MEDIA_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(media_type))
    }

    pub fn is_compressible(source: &SourceFile) -> bool {
        Self::is_compressible_media_type(&source.media_type)
            && source.size() > MIN_COMPRESS_SIZE_BYTES
    }

    pub fn available_modes(source: &SourceFile) -> Vec<Mode> {
        if Self::is_compressible(source) {
            vec![Mode::Compress, Mode::Inflate]
        } else {
            vec![Mode::Inflate]
        }
    }

    pub fn default_mode(source: &SourceFile) -> Mode {
        if Self::is_compressible(source) {
            Mode::Compress
        } else {
            Mode::Inflate
        }
    }

    /// Suggested starting target, in whole KB: half the original when
    /// compressing, the original plus 100 KB when inflating. Always inside the
    /// bounds for `mode`.
    pub fn default_target(original_bytes: u64, mode: Mode) -> u64 {
        let original_kb = original_bytes as f64 / KIB as f64;
        let suggested_kb = match mode {
            Mode::Compress => {
                let half = (original_kb / 2.0).round() as u64;
                half.max(MIN_COMPRESS_SIZE_BYTES / KIB)
            }
            Mode::Inflate => original_kb.round() as u64 + DEFAULT_INFLATE_HEADROOM_KB,
        };

        Self::bounds(original_bytes, mode).clamp(suggested_kb * KIB)
    }
}
