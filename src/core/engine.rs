// sizetailor/src/core/engine.rs
use super::{Mode, Result, SourceFile, TailoringResult, TargetSpec};
use crate::processors::{AdaptiveQualityCompressor, ExactSizeInflator, ImageCodec, JpegCodec};

/// Single entry point that routes a file to the compressor or the inflator.
///
/// The engine does not check `target_bytes` against the mode's bounds. Out of
/// range targets have defined results: inflate passes the file through
/// unchanged, compress falls back to its minimal-quality encode.
pub struct TailoringEngine<C = JpegCodec> {
    compressor: AdaptiveQualityCompressor<C>,
    inflator: ExactSizeInflator,
}

impl TailoringEngine<JpegCodec> {
    pub fn new() -> Self {
        Self::with_codec(JpegCodec::new())
    }
}

impl Default for TailoringEngine<JpegCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> TailoringEngine<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            compressor: AdaptiveQualityCompressor::with_codec(codec),
            inflator: ExactSizeInflator::new(),
        }
    }

    pub fn process(
        &self,
        source: &SourceFile,
        mode: Mode,
        target_bytes: u64,
    ) -> Result<TailoringResult> {
        log::debug!(
            "Processing {} ({} bytes, {}) in {} mode, target {} bytes",
            source.name,
            source.size(),
            source.media_type,
            mode,
            target_bytes
        );

        match mode {
            Mode::Compress => self.compressor.compress(source, target_bytes),
            Mode::Inflate => self.inflator.inflate(source, target_bytes),
        }
    }

    pub fn process_spec(&self, source: &SourceFile, spec: &TargetSpec) -> Result<TailoringResult> {
        self.process(source, spec.mode, spec.target_bytes)
    }
}
