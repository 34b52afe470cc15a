//! 3D textures with cached mip level addressing.
//!
//! A [Texture3d] wraps a [Texture] and calculates the offset and extent of each mip level
//! once when created. Loads, stores, and clears then only need a lookup by level.
use std::{ops::RangeInclusive, sync::Arc};

use bytemuck::Pod;
use log::debug;

use crate::{
    cache::{LevelCache, LevelCacheEntry},
    extent::{level_count, Extent3d},
    format::Format,
    image::Image,
    storage::StorageLinear,
    swizzle::Swizzles,
    texel,
    texture::Texture,
    RangeKind, TexelCoord, TextureError,
};

/// A 3D texture or a view of the mipmaps of another texture.
///
/// Cloning a [Texture3d] creates another view of the same storage.
/// Stores and clears through any view are visible to every view of the storage,
/// so the texel access methods only require `&self`.
#[derive(Debug, Clone, Default)]
pub struct Texture3d {
    texture: Texture,
    // The storage offset of the base layer, face, and level.
    base_offset: usize,
    cache: LevelCache,
}

impl Texture3d {
    /// Allocates a new 3D texture with `levels` mipmaps.
    ///
    /// Returns [TextureError::InvalidSurface] if `extent` has a zero dimension or
    /// `levels` is zero or larger than [level_count] for `extent`.
    pub fn new(
        format: Format,
        extent: Extent3d,
        levels: u32,
        swizzles: Swizzles,
    ) -> Result<Self, TextureError> {
        let texture = Texture::new(format, extent, 1, 1, levels, swizzles)?;
        Ok(Self::from_texture(&texture))
    }

    /// Allocates a new 3D texture with a complete mipmap chain down to 1x1x1.
    /**
    ```rust
    use texture3d::{Extent3d, Format, Swizzles, Texture3d};
    # fn main() -> Result<(), texture3d::TextureError> {
    let texture = Texture3d::with_full_chain(Format::R8_UNORM, Extent3d::new(64, 16, 4), Swizzles::default())?;
    assert_eq!(7, texture.levels());
    assert_eq!(Extent3d::new(1, 1, 1), texture.extent(6)?);
    # Ok(())
    # }
    ```
    */
    pub fn with_full_chain(
        format: Format,
        extent: Extent3d,
        swizzles: Swizzles,
    ) -> Result<Self, TextureError> {
        Self::new(format, extent, level_count(extent), swizzles)
    }

    /// Creates a view of all the mipmaps of `texture`.
    /// Only the base layer and base face are accessible.
    pub fn from_texture(texture: &Texture) -> Self {
        let cache = LevelCache::from_texture(texture);
        let base_offset = texture.base_offset(0, 0, 0).unwrap_or(0);

        debug!(
            "Created 3D texture view with {} levels at offset {}",
            cache.len(),
            base_offset
        );

        Self {
            texture: texture.clone(),
            base_offset,
            cache,
        }
    }

    /// Creates a view of the selected `layers`, `faces`, and `levels` of `texture`.
    /// See [Texture::view].
    pub fn from_texture_range(
        texture: &Texture,
        format: Format,
        layers: RangeInclusive<u32>,
        faces: RangeInclusive<u32>,
        levels: RangeInclusive<u32>,
        swizzles: Swizzles,
    ) -> Result<Self, TextureError> {
        let view = texture.view(format, layers, faces, levels, swizzles)?;
        Ok(Self::from_texture(&view))
    }

    /// Creates a view of mip levels `base_level..=max_level` of `self`.
    /// Level 0 of the view is level `base_level` of `self`.
    /**
    ```rust
    use texture3d::{Extent3d, Format, Swizzles, Texture3d};
    # fn main() -> Result<(), texture3d::TextureError> {
    let texture = Texture3d::with_full_chain(Format::R8_UNORM, Extent3d::new(8, 8, 8), Swizzles::default())?;
    texture.store([0, 1, 0], 2, 7u8)?;

    let view = texture.narrow(2, 3)?;
    assert_eq!(2, view.levels());
    assert_eq!(texture.extent(2)?, view.extent(0)?);
    assert_eq!(7u8, view.load([0, 1, 0], 0)?);
    # Ok(())
    # }
    ```
    */
    pub fn narrow(&self, base_level: u32, max_level: u32) -> Result<Self, TextureError> {
        if self.is_empty() {
            return Err(TextureError::InvalidRange {
                kind: RangeKind::Level,
                base: base_level,
                max: max_level,
                count: 0,
            });
        }

        let view = self.texture.view(
            self.format(),
            0..=self.texture.layers() - 1,
            0..=self.texture.faces() - 1,
            base_level..=max_level,
            self.swizzles(),
        )?;
        Ok(Self::from_texture(&view))
    }

    /// Returns `true` for textures without any storage like [Texture3d::default].
    pub fn is_empty(&self) -> bool {
        self.texture.is_empty()
    }

    /// The underlying texture for this view.
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// The precomputed offsets and extents for each level of this view.
    pub fn cache(&self) -> &LevelCache {
        &self.cache
    }

    pub fn format(&self) -> Format {
        self.texture.format()
    }

    pub fn swizzles(&self) -> Swizzles {
        self.texture.swizzles()
    }

    pub fn levels(&self) -> u32 {
        self.cache.len() as u32
    }

    /// The extent of `level` in texels.
    pub fn extent(&self, level: u32) -> Result<Extent3d, TextureError> {
        self.level(level).map(|(_, entry)| entry.extent)
    }

    /// The size in bytes of all the levels of this view.
    pub fn size(&self) -> usize {
        self.cache.total_size()
    }

    /// Returns `true` if both textures view the same storage allocation.
    pub fn shares_storage_with(&self, other: &Texture3d) -> bool {
        self.texture.shares_storage_with(&other.texture)
    }

    /// Creates a view of the image for mip `level`.
    pub fn image(&self, level: u32) -> Result<Image, TextureError> {
        let (storage, entry) = self.level(level)?;
        Ok(Image::new(storage.clone(), self.format(), entry))
    }

    /// Reads the texel at `coord` of mip `level` without any conversion.
    ///
    /// The format must be uncompressed and `T` must have the same size as a texel.
    /// # Examples
    /**
    ```rust
    use texture3d::{Extent3d, Format, Swizzles, Texture3d};
    # fn main() -> Result<(), texture3d::TextureError> {
    let texture = Texture3d::new(Format::RGBA32_SFLOAT, Extent3d::new(4, 4, 4), 2, Swizzles::default())?;
    texture.store([3, 2, 1], 0, [0.5f32, 0.25, 1.0, 1.0])?;
    assert_eq!([0.5f32, 0.25, 1.0, 1.0], texture.load::<[f32; 4]>([3, 2, 1], 0)?);

    // Coordinates must be inside the extent of the level.
    assert!(texture.load::<[f32; 4]>([4, 0, 0], 0).is_err());
    // The texel type must be the same size as the format.
    assert!(texture.load::<f32>([0, 0, 0], 0).is_err());
    # Ok(())
    # }
    ```
    */
    pub fn load<T: Pod>(&self, coord: TexelCoord, level: u32) -> Result<T, TextureError> {
        let (storage, entry) = self.level(level)?;
        texel::load(storage, self.format(), &entry, coord)
    }

    /// Writes `texel` to `coord` of mip `level` without any conversion.
    ///
    /// The format must be uncompressed and `T` must have the same size as a texel.
    pub fn store<T: Pod>(
        &self,
        coord: TexelCoord,
        level: u32,
        texel: T,
    ) -> Result<(), TextureError> {
        let (storage, entry) = self.level(level)?;
        texel::store(storage, self.format(), &entry, coord, &texel)
    }

    /// Sets the bytes of every level to zero.
    pub fn clear(&self) {
        if let Some(storage) = self.texture.storage() {
            texel::zero(storage, self.base_offset..self.base_offset + self.size());
        }
    }

    /// Sets every block of every level to `texel`.
    ///
    /// `T` must have the same size as a block, but the format may be compressed.
    /// Compressed formats repeat the same encoded block.
    pub fn clear_with<T: Pod>(&self, texel: T) -> Result<(), TextureError> {
        match self.texture.storage() {
            Some(storage) => texel::fill(
                storage,
                self.format(),
                self.base_offset..self.base_offset + self.size(),
                &texel,
            ),
            None => Err(TextureError::InvalidLevel {
                level: 0,
                level_count: 0,
            }),
        }
    }

    /// Sets every block of mip `level` to `texel`. Other levels are unchanged.
    pub fn clear_level<T: Pod>(&self, level: u32, texel: T) -> Result<(), TextureError> {
        let (storage, entry) = self.level(level)?;
        texel::fill(storage, self.format(), entry.range(), &texel)
    }

    /// Copies all the bytes of `src_level` in `source` to `dst_level` in `self`.
    ///
    /// Both levels must have the same extent and storage compatible formats.
    /// The textures may share storage.
    pub fn copy_level(
        &self,
        source: &Texture3d,
        src_level: u32,
        dst_level: u32,
    ) -> Result<(), TextureError> {
        let (src_storage, src) = source.level(src_level)?;
        let (dst_storage, dst) = self.level(dst_level)?;

        if !source.format().is_compatible_with(&self.format()) {
            return Err(TextureError::IncompatibleFormat {
                expected: self.format(),
                actual: source.format(),
            });
        }
        if src.extent != dst.extent {
            return Err(TextureError::ExtentMismatch {
                expected: dst.extent,
                actual: src.extent,
            });
        }

        if Arc::ptr_eq(src_storage, dst_storage) {
            dst_storage.write().copy_within(src.range(), dst.offset);
        } else {
            // Avoid holding both locks at once.
            let bytes = src_storage.read()[src.range()].to_vec();
            dst_storage.write()[dst.range()].copy_from_slice(&bytes);
        }
        Ok(())
    }

    // The cache entry for `level` with an offset relative to the start of the storage.
    #[inline]
    fn level(&self, level: u32) -> Result<(&Arc<StorageLinear>, LevelCacheEntry), TextureError> {
        let invalid = || TextureError::InvalidLevel {
            level,
            level_count: self.levels(),
        };

        let storage = self.texture.storage().ok_or_else(invalid)?;
        let entry = self.cache.entry(level).ok_or_else(invalid)?;
        Ok((
            storage,
            LevelCacheEntry {
                offset: self.base_offset + entry.offset,
                ..*entry
            },
        ))
    }
}
