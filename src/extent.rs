//! Extents for each level of a mipmap chain.
use core::cmp::max;

/// The dimensions of a 3D surface in texels.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Extent3d {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent3d {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// The extent of the mip `level` for a base extent of `self`.
    /// See [extent_at_level].
    pub fn at_level(self, level: u32) -> Self {
        extent_at_level(self, level)
    }

    /// The largest of `width`, `height`, and `depth`.
    pub fn max_dimension(&self) -> u32 {
        max(self.width, max(self.height, self.depth))
    }

    /// Returns `true` if any dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }

    /// The total number of texels. This can be larger than [u32::MAX].
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Returns `true` if `coord` is inside the extent on every axis.
    pub fn contains(&self, coord: [u32; 3]) -> bool {
        coord[0] < self.width && coord[1] < self.height && coord[2] < self.depth
    }
}

impl From<[u32; 3]> for Extent3d {
    fn from([width, height, depth]: [u32; 3]) -> Self {
        Self::new(width, height, depth)
    }
}

/// Calculates the extent of mip `level` in texels.
///
/// Each dimension is halved independently for each level and never goes below 1.
/**
```rust
use texture3d::{extent_at_level, Extent3d};

let base = Extent3d::new(16, 4, 1);
assert_eq!(Extent3d::new(16, 4, 1), extent_at_level(base, 0));
assert_eq!(Extent3d::new(4, 1, 1), extent_at_level(base, 2));
assert_eq!(Extent3d::new(1, 1, 1), extent_at_level(base, 4));
```
 */
pub fn extent_at_level(base_extent: Extent3d, level: u32) -> Extent3d {
    Extent3d {
        width: max(base_extent.width.checked_shr(level).unwrap_or(0), 1),
        height: max(base_extent.height.checked_shr(level).unwrap_or(0), 1),
        depth: max(base_extent.depth.checked_shr(level).unwrap_or(0), 1),
    }
}

/// Calculates the number of levels in a complete mipmap chain
/// from `extent` down to a 1x1x1 level.
///
/// Returns 0 for extents with a zero dimension.
/**
```rust
use texture3d::{level_count, Extent3d};

assert_eq!(4, level_count(Extent3d::new(8, 8, 8)));
assert_eq!(9, level_count(Extent3d::new(256, 3, 1)));
assert_eq!(0, level_count(Extent3d::new(256, 0, 1)));
```
 */
pub fn level_count(extent: Extent3d) -> u32 {
    if extent.is_empty() {
        0
    } else {
        u32::BITS - extent.max_dimension().leading_zeros()
    }
}
