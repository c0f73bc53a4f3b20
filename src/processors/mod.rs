// sizetailor/src/processors/mod.rs
mod batch;
mod bounds;
mod codec;
mod compressor;
mod inflator;
mod loader;
mod metadata;

pub use batch::BatchProcessor;
pub use bounds::SizeBoundsCalculator;
pub use codec::{ImageCodec, JpegCodec};
pub use compressor::AdaptiveQualityCompressor;
pub use inflator::ExactSizeInflator;
pub use loader::Loader;
pub use metadata::MetadataProcessor;

#[cfg(test)]
pub(crate) use compressor::tests::LinearCodec;

pub mod prelude {
    pub use super::{
        AdaptiveQualityCompressor, BatchProcessor, ExactSizeInflator, ImageCodec, JpegCodec,
        Loader, MetadataProcessor, SizeBoundsCalculator,
    };
}
