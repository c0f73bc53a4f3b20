// sizetailor/src/processors/inflator.rs
use crate::core::{Result, SourceFile, TailorError, TailoringResult};

/// Pads a file with zero bytes up to an exact size.
///
/// A target at or below the current size leaves the bytes untouched; the
/// inflator never truncates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSizeInflator;

impl ExactSizeInflator {
    pub fn new() -> Self {
        Self
    }

    pub fn padding_len(original_bytes: u64, target_bytes: u64) -> u64 {
        target_bytes.saturating_sub(original_bytes)
    }

    /// Fails with [`TailorError::ProcessingError`] when the padded buffer
    /// cannot be addressed or allocated on this machine.
    pub fn inflate(&self, source: &SourceFile, target_bytes: u64) -> Result<TailoringResult> {
        let padding = Self::padding_len(source.size(), target_bytes);

        let total_len = usize::try_from(padding)
            .ok()
            .and_then(|padding| source.bytes.len().checked_add(padding))
            .ok_or_else(|| Self::allocation_error(target_bytes))?;

        let mut output_bytes = Vec::new();
        output_bytes
            .try_reserve_exact(total_len)
            .map_err(|_| Self::allocation_error(target_bytes))?;
        output_bytes.extend_from_slice(&source.bytes);
        output_bytes.resize(total_len, 0);

        if padding == 0 {
            log::debug!(
                "{} is already {} bytes (target {}), passing through",
                source.name,
                source.size(),
                target_bytes
            );
        } else {
            log::info!(
                "Inflated {}: {} -> {} bytes ({} bytes of padding)",
                source.name,
                source.size(),
                output_bytes.len(),
                padding
            );
        }

        Ok(TailoringResult {
            achieved_size: output_bytes.len() as u64,
            output_bytes,
            suggested_name: source.name.clone(),
            media_type: source.media_type.clone(),
            original_size: source.size(),
            quality: None,
            met_target: true,
        })
    }

    fn allocation_error(target_bytes: u64) -> TailorError {
        TailorError::ProcessingError(format!(
            "Cannot allocate a {} byte output buffer",
            target_bytes
        ))
    }
}
