//! Linear storage for all the layers, faces, and mipmaps of a texture.
//!
//! Layers, faces, and mipmaps are ordered by layer, then face, then mipmap.
//! There is no padding or alignment between any of the sections.
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::{
    extent::{extent_at_level, level_count, Extent3d},
    format::Format,
    TextureError,
};

/// A single allocation holding every layer, face, and mipmap of a texture.
///
/// The bytes are guarded by a [RwLock] so views sharing the storage can safely write to it.
/// Each load or store only holds the lock for the duration of that call.
pub struct StorageLinear {
    format: Format,
    extent: Extent3d,
    layers: u32,
    faces: u32,
    level_sizes: Vec<usize>,
    face_size: usize,
    layer_size: usize,
    data: RwLock<Vec<u8>>,
}

impl StorageLinear {
    /// Allocates zeroed storage for the given surface.
    ///
    /// Returns [TextureError::InvalidSurface] for empty surfaces, more `levels` than
    /// [level_count] allows for `extent`, or sizes that would overflow.
    /// Returns [TextureError::OutOfMemory] if the allocation fails.
    pub fn new(
        format: Format,
        extent: Extent3d,
        layers: u32,
        faces: u32,
        levels: u32,
    ) -> Result<Self, TextureError> {
        let invalid = || TextureError::InvalidSurface {
            extent,
            layers,
            faces,
            levels,
            block_size_in_bytes: format.block_size_in_bytes,
        };

        // Check for empty surfaces first to avoid allocating.
        if extent.is_empty()
            || layers == 0
            || faces == 0
            || levels == 0
            || format.block_size_in_bytes == 0
            || levels > level_count(extent)
        {
            return Err(invalid());
        }

        let level_sizes = (0..levels)
            .map(|level| format.level_size(extent_at_level(extent, level)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        // Check the totals to prevent overflow.
        let face_size = level_sizes
            .iter()
            .try_fold(0usize, |total, size| total.checked_add(*size))
            .ok_or_else(invalid)?;
        let layer_size = face_size.checked_mul(faces as usize).ok_or_else(invalid)?;
        let size = layer_size.checked_mul(layers as usize).ok_or_else(invalid)?;

        // Reserve first so a failed allocation is an error instead of an abort.
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| TextureError::OutOfMemory { size })?;
        data.resize(size, 0u8);

        debug!(
            "Allocated {} bytes for {}x{}x{} texture with {} layers, {} faces, {} levels",
            size, extent.width, extent.height, extent.depth, layers, faces, levels
        );

        Ok(Self {
            format,
            extent,
            layers,
            faces,
            level_sizes,
            face_size,
            layer_size,
            data: RwLock::new(data),
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The extent of the first mip level.
    pub fn base_extent(&self) -> Extent3d {
        self.extent
    }

    /// The extent of mip `level` in texels.
    pub fn extent(&self, level: u32) -> Extent3d {
        extent_at_level(self.extent, level)
    }

    pub fn layers(&self) -> u32 {
        self.layers
    }

    pub fn faces(&self) -> u32 {
        self.faces
    }

    pub fn levels(&self) -> u32 {
        self.level_sizes.len() as u32
    }

    /// The size in bytes of a single mip `level` of one face
    /// or `None` if `level` is not less than [StorageLinear::levels].
    pub fn level_size(&self, level: u32) -> Option<usize> {
        self.level_sizes.get(level as usize).copied()
    }

    /// The size in bytes of all the mipmaps of a single face.
    pub fn face_size(&self) -> usize {
        self.face_size
    }

    /// The size in bytes of all the faces and mipmaps of a single layer.
    pub fn layer_size(&self) -> usize {
        self.layer_size
    }

    /// The total size in bytes.
    pub fn size(&self) -> usize {
        self.layer_size * self.layers as usize
    }

    /// The offset in bytes of the start of the given `layer`, `face`, and `level`
    /// or `None` if any index is out of range.
    pub fn base_offset(&self, layer: u32, face: u32, level: u32) -> Option<usize> {
        if layer >= self.layers || face >= self.faces || level >= self.levels() {
            return None;
        }

        let level_offset: usize = self.level_sizes[..level as usize].iter().sum();
        Some(layer as usize * self.layer_size + face as usize * self.face_size + level_offset)
    }

    // Byte storage has no invariants a panicking writer could break.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<u8>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Vec<u8>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Skip the data since textures can be very large.
impl std::fmt::Debug for StorageLinear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageLinear")
            .field("format", &self.format)
            .field("extent", &self.extent)
            .field("layers", &self.layers)
            .field("faces", &self.faces)
            .field("levels", &self.levels())
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    fn storage_size(
        format: Format,
        extent: [u32; 3],
        layers: u32,
        faces: u32,
        levels: u32,
    ) -> usize {
        StorageLinear::new(format, extent.into(), layers, faces, levels)
            .unwrap()
            .size()
    }

    #[test]
    fn storage_sizes_3d() {
        assert_eq!(
            (512 + 64 + 8 + 1) * 4,
            storage_size(Format::RGBA8_UNORM, [8, 8, 8], 1, 1, 4)
        );
        assert_eq!(
            16 * 16 * 16 * 4,
            storage_size(Format::R32_SFLOAT, [16, 16, 16], 1, 1, 1)
        );
        assert_eq!(
            (33 * 33 * 33 + 16 * 16 * 16) * 16,
            storage_size(Format::RGBA32_SFLOAT, [33, 33, 33], 1, 1, 2)
        );
    }

    #[test]
    fn storage_sizes_compressed() {
        // 16x16x2, 8x8x1, 4x4x1, 2x2x1, 1x1x1
        assert_eq!(
            (16 * 2 + 4 + 1 + 1 + 1) * 16,
            storage_size(Format::BC7_RGBA_UNORM, [16, 16, 2], 1, 1, 5)
        );
    }

    #[test]
    fn storage_sizes_arrays() {
        assert_eq!(
            6 * 3 * (4 * 4 + 2 * 2 + 1),
            storage_size(Format::R8_UNORM, [4, 4, 1], 3, 6, 3)
        );
    }

    #[test]
    fn base_offsets() {
        let storage = StorageLinear::new(Format::R8_UNORM, [4, 4, 1].into(), 2, 6, 3).unwrap();
        assert_eq!(21, storage.face_size());
        assert_eq!(126, storage.layer_size());
        assert_eq!(Some(0), storage.base_offset(0, 0, 0));
        assert_eq!(Some(16), storage.base_offset(0, 0, 1));
        assert_eq!(Some(20), storage.base_offset(0, 0, 2));
        assert_eq!(Some(21 + 16), storage.base_offset(0, 1, 1));
        assert_eq!(Some(126 + 2 * 21 + 20), storage.base_offset(1, 2, 2));
    }

    #[test]
    fn out_of_range_indices() {
        let storage = StorageLinear::new(Format::R8_UNORM, [4, 4, 1].into(), 2, 6, 3).unwrap();
        assert_eq!(Some(1), storage.level_size(2));
        assert_eq!(None, storage.level_size(3));
        assert_eq!(None, storage.level_size(5));
        assert_eq!(None, storage.base_offset(2, 0, 0));
        assert_eq!(None, storage.base_offset(0, 6, 0));
        assert_eq!(None, storage.base_offset(0, 0, 3));
    }

    #[test]
    fn storage_is_zeroed() {
        let storage = StorageLinear::new(Format::RGBA8_UNORM, [5, 3, 2].into(), 1, 1, 3).unwrap();
        assert!(storage.read().iter().all(|b| *b == 0));
        assert_eq!(storage.size(), storage.read().len());
    }

    #[test]
    fn invalid_surfaces() {
        for (extent, layers, faces, levels) in [
            ([0, 4, 4], 1, 1, 1),
            ([4, 4, 4], 0, 1, 1),
            ([4, 4, 4], 1, 0, 1),
            ([4, 4, 4], 1, 1, 0),
            ([4, 4, 4], 1, 1, 4),
        ] {
            let result = StorageLinear::new(Format::R8_UNORM, extent.into(), layers, faces, levels);
            assert_eq!(
                Some(TextureError::InvalidSurface {
                    extent: extent.into(),
                    layers,
                    faces,
                    levels,
                    block_size_in_bytes: 1,
                }),
                result.err()
            );
        }
    }

    #[test]
    fn potential_overflow() {
        let result = StorageLinear::new(
            Format::RGBA32_SFLOAT,
            [u32::MAX, u32::MAX, u32::MAX].into(),
            1,
            1,
            1,
        );
        assert!(matches!(result, Err(TextureError::InvalidSurface { .. })));

        let result = StorageLinear::new(
            Format::R8_UNORM,
            [65535, 65535, 1].into(),
            u32::MAX,
            u32::MAX,
            1,
        );
        assert!(matches!(result, Err(TextureError::InvalidSurface { .. })));
    }

    #[test]
    fn potential_out_of_memory() {
        // The size fits in a usize but is far too large to allocate.
        let result = StorageLinear::new(
            Format::RGBA32_SFLOAT,
            [65535, 65535, 65535].into(),
            1,
            1,
            1,
        );
        assert!(matches!(result, Err(TextureError::OutOfMemory { .. })));
    }
}
