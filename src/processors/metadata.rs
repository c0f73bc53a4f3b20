// sizetailor/src/processors/metadata.rs
use crate::core::SourceFile;
use exif::{Exif, In, Reader, Tag};
use std::io::Cursor;

const COMMON_TAGS: [(Tag, &str); 10] = [
    (Tag::Make, "Camera Make"),
    (Tag::Model, "Camera Model"),
    (Tag::DateTimeOriginal, "Original Date/Time"),
    (Tag::ExposureTime, "Exposure Time"),
    (Tag::FNumber, "Aperture"),
    (Tag::PhotographicSensitivity, "ISO"),
    (Tag::FocalLength, "Focal Length"),
    (Tag::Orientation, "Orientation"),
    (Tag::Software, "Software"),
    (Tag::GPSLatitude, "GPS Latitude"),
];

/// EXIF inspection. Re-encoding drops EXIF, so compress reports what is lost.
pub struct MetadataProcessor;

impl MetadataProcessor {
    pub fn new() -> Self {
        Self
    }

    /// EXIF block of `source`, or `None` when it has none or is not a
    /// container EXIF can live in.
    pub fn read_metadata(&self, source: &SourceFile) -> Option<Exif> {
        let mut cursor = Cursor::new(source.bytes.as_slice());

        match Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => {
                log::debug!("Found EXIF data in {}", source.name);
                Some(exif)
            }
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found in {}", source.name);
                None
            }
            Err(e) => {
                log::debug!("Could not read EXIF from {}: {}", source.name, e);
                None
            }
        }
    }

    pub fn has_metadata(&self, source: &SourceFile) -> bool {
        self.read_metadata(source).is_some()
    }

    pub fn field_count(&self, exif: &Exif) -> usize {
        exif.fields().count()
    }

    /// Labelled values of the commonly shown tags present in the primary image.
    pub fn common_fields(&self, exif: &Exif) -> Vec<(String, String)> {
        COMMON_TAGS
            .iter()
            .filter_map(|(tag, label)| {
                exif.get_field(*tag, In::PRIMARY).map(|field| {
                    (
                        label.to_string(),
                        field.display_value().with_unit(exif).to_string(),
                    )
                })
            })
            .collect()
    }
}

impl Default for MetadataProcessor {
    fn default() -> Self {
        Self::new()
    }
}
