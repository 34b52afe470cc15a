//! Precomputed offsets and extents for each mip level of a 3D texture.
//!
//! All mipmaps of a single face are stored contiguously,
//! so the offset of each level is the sum of the sizes of the previous levels.
//! Calculating this sum for every texel access would be wasteful,
//! so the offsets are calculated once when creating a texture or view.
use log::trace;

use crate::{
    extent::{extent_at_level, Extent3d},
    format::Format,
    texture::Texture,
    TextureError,
};

/// The location and dimensions of a single mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCacheEntry {
    /// The offset in bytes from the start of the first cached level.
    pub offset: usize,
    /// The dimensions of the level in texels.
    pub extent: Extent3d,
    /// The size of the level in bytes.
    pub size: usize,
}

impl LevelCacheEntry {
    /// The byte range of this level relative to the first cached level.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.size
    }
}

/// The offsets and extents for a contiguous range of mip levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelCache {
    entries: Vec<LevelCacheEntry>,
}

impl LevelCache {
    /// Calculates the entries for `levels` mip levels starting from `base_extent`.
    ///
    /// The first level always has an offset of 0. Views starting from a later mip level
    /// should use the extent of that level as `base_extent`.
    ///
    /// Returns [TextureError::InvalidSurface] if the total size overflows.
    /// # Examples
    /**
    ```rust
    use texture3d::{Extent3d, Format, LevelCache};
    # fn main() -> Result<(), texture3d::TextureError> {
    let cache = LevelCache::new(Format::RGBA8_UNORM, Extent3d::new(8, 8, 8), 4)?;
    assert_eq!(Some(8 * 8 * 8 * 4), cache.offset_of(1));
    assert_eq!(Some(Extent3d::new(2, 2, 2)), cache.extent_of(2));
    assert_eq!((512 + 64 + 8 + 1) * 4, cache.total_size());
    # Ok(())
    # }
    ```
    */
    pub fn new(format: Format, base_extent: Extent3d, levels: u32) -> Result<Self, TextureError> {
        let invalid = || TextureError::InvalidSurface {
            extent: base_extent,
            layers: 1,
            faces: 1,
            levels,
            block_size_in_bytes: format.block_size_in_bytes,
        };

        let levels = (0..levels)
            .map(|level| {
                let extent = extent_at_level(base_extent, level);
                format.level_size(extent).map(|size| (extent, size))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        let total = levels
            .iter()
            .try_fold(0usize, |total, (_, size)| total.checked_add(*size));
        if total.is_none() {
            return Err(invalid());
        }

        Ok(Self::from_levels(levels))
    }

    /// Calculates the entries for every level of `texture` starting from [Texture::base_level].
    /// Offsets are relative to the start of the base level.
    pub fn from_texture(texture: &Texture) -> Self {
        // Storage sizes were already validated when allocating.
        Self::from_levels((0..texture.levels()).map_while(|level| {
            Some((texture.extent(level).ok()?, texture.level_size(level).ok()?))
        }))
    }

    fn from_levels(levels: impl IntoIterator<Item = (Extent3d, usize)>) -> Self {
        let mut offset = 0;
        let entries = levels
            .into_iter()
            .enumerate()
            .map(|(level, (extent, size))| {
                trace!(
                    "Level {}: offset {}, extent {}x{}x{}, size {}",
                    level,
                    offset,
                    extent.width,
                    extent.height,
                    extent.depth,
                    size
                );
                let entry = LevelCacheEntry {
                    offset,
                    extent,
                    size,
                };
                offset += size;
                entry
            })
            .collect();

        Self { entries }
    }

    /// The number of cached levels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry for `level` or [None] if the level is not cached.
    #[inline]
    pub fn entry(&self, level: u32) -> Option<&LevelCacheEntry> {
        self.entries.get(level as usize)
    }

    #[inline]
    pub fn extent_of(&self, level: u32) -> Option<Extent3d> {
        self.entry(level).map(|e| e.extent)
    }

    #[inline]
    pub fn offset_of(&self, level: u32) -> Option<usize> {
        self.entry(level).map(|e| e.offset)
    }

    #[inline]
    pub fn size_of(&self, level: u32) -> Option<usize> {
        self.entry(level).map(|e| e.size)
    }

    /// The combined size in bytes of all cached levels.
    pub fn total_size(&self) -> usize {
        self.entries.last().map(|e| e.offset + e.size).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelCacheEntry> {
        self.entries.iter()
    }
}
