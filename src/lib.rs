//! # texture3d
//! texture3d treats a single linear allocation as the full mipmap chain of a 3D texture.
//!
//! # Getting Started
//! The following example allocates an R8G8B8A8 volume with a complete mipmap chain,
//! writes a texel to one of the smaller levels, and reads it back.
/*!
```rust
use texture3d::{Extent3d, Format, Swizzles, Texture3d};
# fn main() -> Result<(), texture3d::TextureError> {
let texture = Texture3d::with_full_chain(
    Format::RGBA8_UNORM,
    Extent3d::new(8, 8, 8),
    Swizzles::default(),
)?;
// 8x8x8, 4x4x4, 2x2x2, 1x1x1
assert_eq!(4, texture.levels());
assert_eq!(Extent3d::new(2, 2, 2), texture.extent(2)?);

texture.store([1, 1, 1], 2, [255u8, 128, 64, 32])?;
assert_eq!([255u8, 128, 64, 32], texture.load::<[u8; 4]>([1, 1, 1], 2)?);
# Ok(())
# }
```
*/
//! # Storage Layout
//! Texture storage is tightly packed with no padding between levels.
//! A texture with `L` layers, `F` faces, and `M` mipmaps has the following layout.
/*!
```no_compile
Layer 0 Face 0 Mip 0
Layer 0 Face 0 Mip 1
...
Layer 0 Face 0 Mip M-1
Layer 0 Face 1 Mip 0
...
Layer L-1 Face F-1 Mip M-1
```
*/
//! Texels within a level are stored in row-major order with each depth slice
//! stored as a contiguous 2D plane.
//!
//! Block compressed formats like BC7 store each 4x4 block of texels as a single unit.
//! Level sizes round partial blocks up, so a 2x2 BC7 level still takes up one 16 byte block.
//!
//! # Views
//! Storage is reference counted and shared by every view created from a texture.
//! Writes through one view are visible to every other view of the same storage.
//! The storage is freed once the last view is dropped.
use std::fmt;

mod cache;
mod extent;
mod format;
mod image;
mod storage;
mod swizzle;
mod texel;
mod texture;
mod texture3d;

pub use cache::{LevelCache, LevelCacheEntry};
pub use extent::{extent_at_level, level_count, Extent3d};
pub use format::{BlockDim, Format};
pub use image::Image;
pub use storage::StorageLinear;
pub use swizzle::{Swizzle, Swizzles};
pub use texture::Texture;
pub use texture3d::Texture3d;

/// A `[x, y, z]` texel coordinate within a single mip level.
pub type TexelCoord = [u32; 3];

/// The part of a texture selected by a `base..=max` range.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RangeKind {
    Layer,
    Face,
    Level,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeKind::Layer => write!(f, "layer"),
            RangeKind::Face => write!(f, "face"),
            RangeKind::Level => write!(f, "level"),
        }
    }
}

/// Errors than can occur while creating or accessing a texture.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TextureError {
    /// The mip level is not part of the texture or view.
    InvalidLevel { level: u32, level_count: u32 },

    /// The `base..=max` range is empty or extends past the `count` available items.
    InvalidRange {
        kind: RangeKind,
        base: u32,
        max: u32,
        count: u32,
    },

    /// The texel coordinate is outside the extent of the requested level.
    CoordinateOutOfBounds { coord: TexelCoord, extent: Extent3d },

    /// The size of the texel type does not match the format's block size.
    TexelSizeMismatch {
        expected_size: usize,
        actual_size: usize,
    },

    /// Texel access is only supported for uncompressed formats.
    CompressedFormat { format: Format },

    /// The format can not reinterpret the existing storage.
    /// Formats must have the same block size and block dimensions.
    IncompatibleFormat { expected: Format, actual: Format },

    /// The source and destination levels of a copy have different dimensions.
    ExtentMismatch { expected: Extent3d, actual: Extent3d },

    /// The surface dimensions are zero, require more mipmaps than the extent supports,
    /// or would overflow when calculating the storage size.
    InvalidSurface {
        extent: Extent3d,
        layers: u32,
        faces: u32,
        levels: u32,
        block_size_in_bytes: u32,
    },

    /// The storage allocation of `size` bytes failed.
    OutOfMemory { size: usize },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::InvalidLevel { level, level_count } => write!(
                f,
                "Mip level {} is out of range for a texture with {} levels.",
                level, level_count
            ),
            TextureError::InvalidRange {
                kind,
                base,
                max,
                count,
            } => write!(
                f,
                "The {} range {}..={} is invalid for a texture with {} {}s.",
                kind, base, max, count, kind
            ),
            TextureError::CoordinateOutOfBounds { coord, extent } => write!(
                f,
                "Texel coordinate {:?} is outside the level extent {}x{}x{}.",
                coord, extent.width, extent.height, extent.depth
            ),
            TextureError::TexelSizeMismatch {
                expected_size,
                actual_size,
            } => write!(
                f,
                "Texel size mismatch. Expected {} bytes but found {} bytes.",
                expected_size, actual_size
            ),
            TextureError::CompressedFormat { format } => write!(
                f,
                "Texel access is not supported for compressed format {:?}.",
                format
            ),
            TextureError::IncompatibleFormat { expected, actual } => write!(
                f,
                "Format {:?} is not storage compatible with {:?}.",
                actual, expected
            ),
            TextureError::ExtentMismatch { expected, actual } => write!(
                f,
                "Extent mismatch. Expected {}x{}x{} but found {}x{}x{}.",
                expected.width,
                expected.height,
                expected.depth,
                actual.width,
                actual.height,
                actual.depth
            ),
            TextureError::InvalidSurface {
                extent,
                layers,
                faces,
                levels,
                block_size_in_bytes,
            } => write!(
                f,
                "Invalid surface {}x{}x{} with {} layers, {} faces, {} levels, and {} bytes per block.",
                extent.width,
                extent.height,
                extent.depth,
                layers,
                faces,
                levels,
                block_size_in_bytes
            ),
            TextureError::OutOfMemory { size } => {
                write!(f, "Failed to allocate {} bytes of texture storage.", size)
            }
        }
    }
}

impl std::error::Error for TextureError {}

/// Calculates the division of `x` by `d` but rounds up rather than truncating.
///
/// # Examples
/// Use this function when calculating dimensions for block compressed formats like BC7.
/**
```rust
# use texture3d::div_round_up;
assert_eq!(2, div_round_up(8, 4));
assert_eq!(3, div_round_up(10, 4));
```
 */
/// Uncompressed formats are equivalent to 1x1x1 texel blocks.
/**
```rust
# use texture3d::div_round_up;
let n = 10;
assert_eq!(n, div_round_up(n, 1));
```
 */
#[inline]
pub const fn div_round_up(x: u32, d: u32) -> u32 {
    x / d + (x % d != 0) as u32
}
