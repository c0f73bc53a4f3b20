// sizetailor/src/processors/loader.rs
use crate::core::{Result, SourceFile, TailorError, MAX_FILE_SIZE_BYTES};
use crate::utils::media_type_for;
use image::ImageReader;
use std::io::Cursor;
use std::path::Path;

/// Reads input files into [`SourceFile`]s, rejecting empty and oversized ones.
#[derive(Clone)]
pub struct Loader {
    max_file_size: u64,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE_BYTES,
        }
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn load(&self, path: &Path) -> Result<SourceFile> {
        log::debug!("Loading file from: {}", path.display());

        self.validate_path(path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TailorError::InvalidParameter(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();

        let bytes = std::fs::read(path)?;
        self.load_from_bytes(name, bytes)
    }

    pub fn load_from_bytes(&self, name: impl Into<String>, bytes: Vec<u8>) -> Result<SourceFile> {
        let name = name.into();
        let size = bytes.len() as u64;

        if size == 0 {
            return Err(TailorError::EmptyFile(name));
        }

        if size > self.max_file_size {
            return Err(TailorError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        let media_type = media_type_for(&name, &bytes);
        log::info!("Loaded {}: {} bytes, type {}", name, size, media_type);

        Ok(SourceFile::new(name, media_type, bytes))
    }

    /// Pixel dimensions when the file is a readable image.
    pub fn image_dimensions(&self, source: &SourceFile) -> Option<(u32, u32)> {
        ImageReader::new(Cursor::new(source.bytes.as_slice()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(TailorError::InvalidParameter(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(TailorError::InvalidParameter(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        // Checked before reading so oversized files are never pulled into memory
        let size = path.metadata()?.len();
        if size > self.max_file_size {
            return Err(TailorError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_input() {
        let err = Loader::new().load_from_bytes("empty.bin", Vec::new()).unwrap_err();
        assert!(matches!(err, TailorError::EmptyFile(name) if name == "empty.bin"));
    }

    #[test]
    fn rejects_input_over_cap() {
        let err = Loader::new()
            .with_max_file_size(16)
            .load_from_bytes("big.bin", vec![0; 17])
            .unwrap_err();
        assert!(matches!(err, TailorError::FileTooLarge { size: 17, limit: 16 }));
    }

    #[test]
    fn infers_media_type_from_name() {
        let source = Loader::new().load_from_bytes("notes.txt", b"hello".to_vec()).unwrap();
        assert_eq!(source.media_type, "text/plain");
        assert_eq!(source.size(), 5);
    }

    #[test]
    fn missing_path_is_invalid() {
        let err = Loader::new().load(Path::new("does/not/exist.jpg")).unwrap_err();
        assert!(matches!(err, TailorError::InvalidParameter(_)));
    }

    #[test]
    fn non_image_has_no_dimensions() {
        let loader = Loader::new();
        let source = loader.load_from_bytes("notes.txt", b"hello".to_vec()).unwrap();
        assert_eq!(loader.image_dimensions(&source), None);
    }
}
