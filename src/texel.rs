//! Reading and writing raw texel bytes within a single level.
//!
//! Texels are reinterpreted as the requested type without any conversion.
//! The requested type must have exactly the size of a block of the format.
use core::mem::size_of;

use bytemuck::Pod;

use crate::{
    cache::LevelCacheEntry, format::Format, storage::StorageLinear, TexelCoord, TextureError,
};

/// Calculates the offset in bytes into the storage of the texel at `coord`.
/// The `level` offset should be relative to the start of the storage.
#[inline]
pub(crate) fn texel_offset(
    format: Format,
    level: &LevelCacheEntry,
    coord: TexelCoord,
    texel_size: usize,
) -> Result<usize, TextureError> {
    if format.is_compressed() {
        return Err(TextureError::CompressedFormat { format });
    }

    check_texel_size(format, texel_size)?;

    let extent = level.extent;
    if !extent.contains(coord) {
        return Err(TextureError::CoordinateOutOfBounds { coord, extent });
    }

    // Each depth slice is a contiguous 2D plane in row-major order.
    let [x, y, z] = coord.map(|c| c as usize);
    let index = (z * extent.height as usize + y) * extent.width as usize + x;
    let offset = index * texel_size;
    debug_assert!(offset + texel_size <= level.size);

    Ok(level.offset + offset)
}

pub(crate) fn check_texel_size(format: Format, texel_size: usize) -> Result<(), TextureError> {
    let expected_size = format.block_size_in_bytes as usize;
    if texel_size != expected_size {
        Err(TextureError::TexelSizeMismatch {
            expected_size,
            actual_size: texel_size,
        })
    } else {
        Ok(())
    }
}

pub(crate) fn load<T: Pod>(
    storage: &StorageLinear,
    format: Format,
    level: &LevelCacheEntry,
    coord: TexelCoord,
) -> Result<T, TextureError> {
    let offset = texel_offset(format, level, coord, size_of::<T>())?;
    let data = storage.read();
    Ok(bytemuck::pod_read_unaligned(
        &data[offset..offset + size_of::<T>()],
    ))
}

pub(crate) fn store<T: Pod>(
    storage: &StorageLinear,
    format: Format,
    level: &LevelCacheEntry,
    coord: TexelCoord,
    texel: &T,
) -> Result<(), TextureError> {
    let offset = texel_offset(format, level, coord, size_of::<T>())?;
    let mut data = storage.write();
    data[offset..offset + size_of::<T>()].copy_from_slice(bytemuck::bytes_of(texel));
    Ok(())
}

/// Repeats the bytes of `texel` over every block in `range`.
/// Compressed formats repeat the same encoded block.
pub(crate) fn fill<T: Pod>(
    storage: &StorageLinear,
    format: Format,
    range: core::ops::Range<usize>,
    texel: &T,
) -> Result<(), TextureError> {
    check_texel_size(format, size_of::<T>())?;
    if range.is_empty() {
        return Ok(());
    }

    let bytes = bytemuck::bytes_of(texel);
    let mut data = storage.write();
    for block in data[range].chunks_exact_mut(bytes.len()) {
        block.copy_from_slice(bytes);
    }
    Ok(())
}

pub(crate) fn zero(storage: &StorageLinear, range: core::ops::Range<usize>) {
    storage.write()[range].fill(0u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::Extent3d;

    fn level(offset: usize, extent: [u32; 3], bytes_per_texel: usize) -> LevelCacheEntry {
        let extent = Extent3d::from(extent);
        LevelCacheEntry {
            offset,
            extent,
            size: extent.texel_count() * bytes_per_texel,
        }
    }

    #[test]
    fn texel_offsets_row_major() {
        let level = level(100, [4, 3, 2], 4);
        let offset = |coord| texel_offset(Format::RGBA8_UNORM, &level, coord, 4).unwrap();
        assert_eq!(100, offset([0, 0, 0]));
        assert_eq!(104, offset([1, 0, 0]));
        assert_eq!(100 + 4 * 4, offset([0, 1, 0]));
        assert_eq!(100 + 4 * 3 * 4, offset([0, 0, 1]));
        assert_eq!(100 + (4 * 3 * 2 - 1) * 4, offset([3, 2, 1]));
    }

    #[test]
    fn texel_offset_out_of_bounds() {
        let level = level(0, [4, 3, 2], 1);
        for coord in [[4, 0, 0], [0, 3, 0], [0, 0, 2], [u32::MAX, 0, 0]] {
            assert_eq!(
                Err(TextureError::CoordinateOutOfBounds {
                    coord,
                    extent: Extent3d::new(4, 3, 2)
                }),
                texel_offset(Format::R8_UNORM, &level, coord, 1)
            );
        }
    }

    #[test]
    fn texel_offset_size_mismatch() {
        let level = level(0, [4, 4, 4], 4);
        assert_eq!(
            Err(TextureError::TexelSizeMismatch {
                expected_size: 4,
                actual_size: 8
            }),
            texel_offset(Format::RGBA8_UNORM, &level, [0, 0, 0], 8)
        );
    }

    #[test]
    fn texel_offset_compressed() {
        let level = level(0, [4, 4, 1], 1);
        assert_eq!(
            Err(TextureError::CompressedFormat {
                format: Format::BC7_RGBA_UNORM
            }),
            texel_offset(Format::BC7_RGBA_UNORM, &level, [0, 0, 0], 16)
        );
    }
}
