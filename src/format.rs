//! Texel formats described by their block layout.
//!
//! A format is only described by how many bytes each block takes up
//! and how many texels each block covers.
//! The meaning of the bytes is left to the caller.
use core::num::NonZeroU32;

use crate::{div_round_up, extent::Extent3d};

const ONE: NonZeroU32 = NonZeroU32::MIN;
const FOUR: NonZeroU32 = match NonZeroU32::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

/// The dimensions of a compressed block. Compressed block sizes are usually 4x4 texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct BlockDim {
    /// The width of the block in texels.
    pub width: NonZeroU32,
    /// The height of the block in texels.
    pub height: NonZeroU32,
    /// The depth of the block in texels.
    pub depth: NonZeroU32,
}

impl BlockDim {
    /// A 1x1x1 block for formats that do not use block compression like R8G8B8A8.
    pub const fn uncompressed() -> Self {
        BlockDim {
            width: ONE,
            height: ONE,
            depth: ONE,
        }
    }

    /// A 4x4x1 compressed block. This includes any of the BCN formats like BC1, BC3, or BC7.
    pub const fn block_4x4() -> Self {
        BlockDim {
            width: FOUR,
            height: FOUR,
            depth: ONE,
        }
    }

    /// Returns `true` if a block covers more than one texel.
    pub const fn is_compressed(&self) -> bool {
        self.width.get() > 1 || self.height.get() > 1 || self.depth.get() > 1
    }

    /// The number of blocks on each axis needed to cover `extent`.
    /// Partial blocks count as whole blocks.
    pub fn block_count(&self, extent: Extent3d) -> Extent3d {
        Extent3d::new(
            div_round_up(extent.width, self.width.get()),
            div_round_up(extent.height, self.height.get()),
            div_round_up(extent.depth, self.depth.get()),
        )
    }
}

impl Default for BlockDim {
    fn default() -> Self {
        Self::uncompressed()
    }
}

/// The storage layout of a texel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    /// The size in bytes of a single block.
    /// For uncompressed formats, this is the size of a texel.
    pub block_size_in_bytes: u32,
    /// The texels covered by a single block.
    pub block_dim: BlockDim,
    /// The number of color channels like 4 for RGBA.
    pub component_count: u32,
}

impl Format {
    /// The format of empty textures. Nothing can be stored with a block size of 0.
    pub const UNDEFINED: Format = Format::uncompressed(0, 0);
    pub const R8_UNORM: Format = Format::uncompressed(1, 1);
    pub const RG8_UNORM: Format = Format::uncompressed(2, 2);
    pub const RGBA8_UNORM: Format = Format::uncompressed(4, 4);
    pub const R16_SFLOAT: Format = Format::uncompressed(2, 1);
    pub const RGBA16_SFLOAT: Format = Format::uncompressed(8, 4);
    pub const R32_UINT: Format = Format::uncompressed(4, 1);
    pub const R32_SFLOAT: Format = Format::uncompressed(4, 1);
    pub const RGBA32_SFLOAT: Format = Format::uncompressed(16, 4);
    pub const BC1_RGBA_UNORM: Format = Format::new(8, BlockDim::block_4x4(), 4);
    pub const BC3_RGBA_UNORM: Format = Format::new(16, BlockDim::block_4x4(), 4);
    pub const BC4_R_UNORM: Format = Format::new(8, BlockDim::block_4x4(), 1);
    pub const BC7_RGBA_UNORM: Format = Format::new(16, BlockDim::block_4x4(), 4);

    pub const fn new(block_size_in_bytes: u32, block_dim: BlockDim, component_count: u32) -> Self {
        Self {
            block_size_in_bytes,
            block_dim,
            component_count,
        }
    }

    /// A format with 1x1x1 texel blocks where each texel takes up `bytes_per_texel` bytes.
    pub const fn uncompressed(bytes_per_texel: u32, component_count: u32) -> Self {
        Self::new(bytes_per_texel, BlockDim::uncompressed(), component_count)
    }

    pub const fn is_compressed(&self) -> bool {
        self.block_dim.is_compressed()
    }

    /// Returns `true` if storage written in `self` can be viewed as `other`
    /// without changing any level offsets or sizes.
    /**
    ```rust
    use texture3d::Format;

    assert!(Format::RGBA8_UNORM.is_compatible_with(&Format::R32_SFLOAT));
    assert!(!Format::RGBA8_UNORM.is_compatible_with(&Format::RGBA16_SFLOAT));
    assert!(!Format::RGBA32_SFLOAT.is_compatible_with(&Format::BC7_RGBA_UNORM));
    ```
    */
    pub fn is_compatible_with(&self, other: &Format) -> bool {
        self.block_size_in_bytes == other.block_size_in_bytes && self.block_dim == other.block_dim
    }

    /// The size in bytes of a single level with the given `extent` in texels.
    ///
    /// Returns [None] if the size does not fit in a [usize].
    pub fn level_size(&self, extent: Extent3d) -> Option<usize> {
        let blocks = self.block_dim.block_count(extent);
        (blocks.width as usize)
            .checked_mul(blocks.height as usize)?
            .checked_mul(blocks.depth as usize)?
            .checked_mul(self.block_size_in_bytes as usize)
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::UNDEFINED
    }
}
