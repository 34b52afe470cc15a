//! Views of a single mip level.
use std::sync::Arc;

use bytemuck::Pod;

use crate::{
    cache::LevelCacheEntry, extent::Extent3d, format::Format, storage::StorageLinear, texel,
    TexelCoord, TextureError,
};

/// A view of a single mip level of a texture's storage.
///
/// Images share storage with the texture they were created from.
#[derive(Debug, Clone)]
pub struct Image {
    storage: Arc<StorageLinear>,
    format: Format,
    // The offset is relative to the start of the storage.
    level: LevelCacheEntry,
}

impl Image {
    pub(crate) fn new(storage: Arc<StorageLinear>, format: Format, level: LevelCacheEntry) -> Self {
        Self {
            storage,
            format,
            level,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn extent(&self) -> Extent3d {
        self.level.extent
    }

    /// The size of the image in bytes.
    pub fn size(&self) -> usize {
        self.level.size
    }

    /// Copies the bytes of the image.
    pub fn to_vec(&self) -> Vec<u8> {
        self.storage.read()[self.level.range()].to_vec()
    }

    /// Reads the texel at `coord`. See [crate::Texture3d::load].
    pub fn load<T: Pod>(&self, coord: TexelCoord) -> Result<T, TextureError> {
        texel::load(&self.storage, self.format, &self.level, coord)
    }

    /// Writes the texel at `coord`. See [crate::Texture3d::store].
    pub fn store<T: Pod>(&self, coord: TexelCoord, texel: T) -> Result<(), TextureError> {
        texel::store(&self.storage, self.format, &self.level, coord, &texel)
    }

    /// Sets every block of the image to `texel`.
    pub fn clear<T: Pod>(&self, texel: T) -> Result<(), TextureError> {
        texel::fill(&self.storage, self.format, self.level.range(), &texel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> Image {
        let storage =
            StorageLinear::new(Format::R16_SFLOAT, Extent3d::new(4, 2, 2), 1, 1, 2).unwrap();
        // The second level is 2x1x1.
        let level = LevelCacheEntry {
            offset: 32,
            extent: Extent3d::new(2, 1, 1),
            size: 4,
        };
        Image::new(Arc::new(storage), Format::R16_SFLOAT, level)
    }

    #[test]
    fn store_load() {
        let image = image();
        image.store([1, 0, 0], 0x3c00u16).unwrap();
        assert_eq!(Ok(0x3c00u16), image.load([1, 0, 0]));
        assert_eq!([0, 0], image.to_vec()[..2]);
        assert_eq!(0x3c00u16.to_ne_bytes(), image.to_vec()[2..]);
    }

    #[test]
    fn clear_only_image() {
        let image = image();
        image.clear([0xabu8, 0xcd]).unwrap();
        assert_eq!(vec![0xab, 0xcd, 0xab, 0xcd], image.to_vec());
        assert!(image.storage.read()[..32].iter().all(|b| *b == 0));
    }

    #[test]
    fn clear_size_mismatch() {
        assert_eq!(
            Err(TextureError::TexelSizeMismatch {
                expected_size: 2,
                actual_size: 4
            }),
            image().clear(0u32)
        );
    }
}
