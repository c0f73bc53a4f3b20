// sizetailor/src/processors/compressor.rs
use super::codec::{ImageCodec, JpegCodec};
use crate::core::{
    Result, SourceFile, TailoringResult, COMPRESSED_SUFFIX, FALLBACK_QUALITY, SEARCH_ITERATIONS,
};
use crate::utils::compressed_file_name;

/// Re-encodes an image at the highest sampled quality whose output fits a
/// byte budget.
///
/// The search is a fixed-length bisection of the quality interval `[0, 1]`,
/// assuming encoded size never decreases as quality rises. It always takes
/// exactly [`SEARCH_ITERATIONS`] samples; there is no convergence check.
pub struct AdaptiveQualityCompressor<C = JpegCodec> {
    codec: C,
}

impl AdaptiveQualityCompressor<JpegCodec> {
    pub fn new() -> Self {
        Self::with_codec(JpegCodec::new())
    }
}

impl Default for AdaptiveQualityCompressor<JpegCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> AdaptiveQualityCompressor<C> {
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn compress(&self, source: &SourceFile, target_bytes: u64) -> Result<TailoringResult> {
        log::debug!(
            "Compressing {} ({} bytes) to at most {} bytes",
            source.name,
            source.size(),
            target_bytes
        );

        let image = self.codec.decode(&source.bytes)?;

        let mut low = 0.0_f64;
        let mut high = 1.0_f64;
        let mut best: Option<(Vec<u8>, f64)> = None;

        for step in 1..=SEARCH_ITERATIONS {
            let mid = (low + high) / 2.0;
            let candidate = self.codec.encode(&image, mid)?;
            let size = candidate.len() as u64;

            if size > target_bytes {
                log::debug!("  step {}: quality {:.4} -> {} bytes, too large", step, mid, size);
                high = mid;
            } else {
                log::debug!("  step {}: quality {:.4} -> {} bytes, fits", step, mid, size);
                best = Some((candidate, mid));
                low = mid;
            }
        }

        let (output_bytes, quality, met_target) = match best {
            Some((bytes, quality)) => (bytes, quality, true),
            None => {
                let bytes = self.codec.encode(&image, FALLBACK_QUALITY)?;
                log::warn!(
                    "No sampled quality fits {} bytes; using quality {} ({} bytes)",
                    target_bytes,
                    FALLBACK_QUALITY,
                    bytes.len()
                );
                let fits = bytes.len() as u64 <= target_bytes;
                (bytes, FALLBACK_QUALITY, fits)
            }
        };

        let achieved_size = output_bytes.len() as u64;
        log::info!(
            "Compressed {}: {} -> {} bytes at quality {:.4}",
            source.name,
            source.size(),
            achieved_size,
            quality
        );

        Ok(TailoringResult {
            output_bytes,
            achieved_size,
            suggested_name: compressed_file_name(
                &source.name,
                COMPRESSED_SUFFIX,
                self.codec.extension(),
            ),
            media_type: self.codec.media_type().to_string(),
            original_size: source.size(),
            quality: Some(quality),
            met_target,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::TailorError;
    use std::cell::RefCell;

    /// Codec whose output length is `base + quality * slope` bytes. Every
    /// sampled quality is recorded.
    pub(crate) struct LinearCodec {
        pub base: usize,
        pub slope: f64,
        pub fail_encode_at: Option<usize>,
        pub samples: RefCell<Vec<f64>>,
    }

    impl LinearCodec {
        pub fn new(base: usize, slope: f64) -> Self {
            Self {
                base,
                slope,
                fail_encode_at: None,
                samples: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageCodec for LinearCodec {
        type Image = ();

        fn decode(&self, bytes: &[u8]) -> Result<()> {
            if bytes.starts_with(b"BAD") {
                return Err(TailorError::Decode("unsupported image".to_string()));
            }
            Ok(())
        }

        fn encode(&self, _image: &(), quality: f64) -> Result<Vec<u8>> {
            let mut samples = self.samples.borrow_mut();
            samples.push(quality);
            if self.fail_encode_at == Some(samples.len()) {
                return Err(TailorError::Encode("encoder gave up".to_string()));
            }
            let len = self.base + (quality * self.slope) as usize;
            Ok(vec![(quality * 255.0) as u8; len])
        }

        fn extension(&self) -> &'static str {
            "jpg"
        }

        fn media_type(&self) -> &'static str {
            "image/jpeg"
        }
    }

    fn source() -> SourceFile {
        SourceFile::new("holiday.photo.png", "image/png", vec![7; 40_000])
    }

    #[test]
    fn picks_highest_fitting_sample() {
        let compressor = AdaptiveQualityCompressor::with_codec(LinearCodec::new(1000, 1000.0));
        let result = compressor.compress(&source(), 1600).unwrap();

        let samples = compressor.codec().samples.borrow().clone();
        assert_eq!(samples.len(), SEARCH_ITERATIONS as usize);
        assert_eq!(samples[0], 0.5);

        let best_fit = samples
            .iter()
            .copied()
            .filter(|q| 1000 + (q * 1000.0) as usize <= 1600)
            .fold(0.0_f64, f64::max);
        assert_eq!(result.quality, Some(best_fit));
        assert_eq!(result.quality, Some(0.6005859375));
        assert_eq!(result.achieved_size, 1600);
        assert_eq!(result.output_bytes.len(), 1600);
        assert!(result.met_target);
    }

    #[test]
    fn result_never_exceeds_target_when_a_sample_fits() {
        for target in [1001, 1200, 1500, 1999, 2000, 5000] {
            let compressor = AdaptiveQualityCompressor::with_codec(LinearCodec::new(1000, 1000.0));
            let result = compressor.compress(&source(), target).unwrap();
            assert!(result.met_target);
            assert!(result.achieved_size <= target, "target {}", target);
        }
    }

    #[test]
    fn falls_back_to_minimal_quality() {
        let compressor = AdaptiveQualityCompressor::with_codec(LinearCodec::new(5000, 1000.0));
        let result = compressor.compress(&source(), 1000).unwrap();

        let samples = compressor.codec().samples.borrow().clone();
        assert_eq!(samples.len(), SEARCH_ITERATIONS as usize + 1);
        assert_eq!(samples.last(), Some(&FALLBACK_QUALITY));

        assert_eq!(result.quality, Some(FALLBACK_QUALITY));
        assert_eq!(result.achieved_size, 5010);
        assert!(!result.met_target);
    }

    #[test]
    fn fallback_is_deterministic() {
        let run = || {
            AdaptiveQualityCompressor::with_codec(LinearCodec::new(5000, 1000.0))
                .compress(&source(), 1000)
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn decode_failure_stops_before_encoding() {
        let compressor = AdaptiveQualityCompressor::with_codec(LinearCodec::new(10, 10.0));
        let bad = SourceFile::new("x.jpg", "image/jpeg", b"BAD data".to_vec());
        let err = compressor.compress(&bad, 100).unwrap_err();
        assert!(matches!(err, TailorError::Decode(_)));
        assert!(compressor.codec().samples.borrow().is_empty());
    }

    #[test]
    fn encode_failure_is_surfaced() {
        let mut codec = LinearCodec::new(10, 10.0);
        codec.fail_encode_at = Some(3);
        let compressor = AdaptiveQualityCompressor::with_codec(codec);
        let err = compressor.compress(&source(), 100).unwrap_err();
        assert!(matches!(err, TailorError::Encode(_)));
        assert_eq!(compressor.codec().samples.borrow().len(), 3);
    }

    #[test]
    fn output_is_named_after_source() {
        let compressor = AdaptiveQualityCompressor::with_codec(LinearCodec::new(10, 10.0));
        let result = compressor.compress(&source(), 100).unwrap();
        assert_eq!(result.suggested_name, "holiday.photo-compressed.jpg");
        assert_eq!(result.media_type, "image/jpeg");
        assert_eq!(result.original_size, 40_000);
    }
}
