//! Generic textures with any number of layers, faces, and mipmaps.
//!
//! A [Texture] either owns newly allocated storage or views
//! a range of the layers, faces, and mipmaps of another texture's storage.
use std::{ops::RangeInclusive, sync::Arc};

use log::debug;

use crate::{
    extent::Extent3d, format::Format, storage::StorageLinear, swizzle::Swizzles, RangeKind,
    TextureError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    base: u32,
    max: u32,
}

impl Range {
    fn all(count: u32) -> Self {
        Self {
            base: 0,
            max: count - 1,
        }
    }

    fn count(&self) -> u32 {
        self.max - self.base + 1
    }

    // Selects from this range using indices relative to `base`.
    fn select(
        &self,
        kind: RangeKind,
        selection: &RangeInclusive<u32>,
        count: u32,
    ) -> Result<Self, TextureError> {
        let (base, max) = (*selection.start(), *selection.end());
        if base > max || max >= count {
            return Err(TextureError::InvalidRange {
                kind,
                base,
                max,
                count,
            });
        }

        Ok(Self {
            base: self.base + base,
            max: self.base + max,
        })
    }
}

/// A texture or a view of a texture's layers, faces, and mipmaps.
///
/// Cloning a texture creates another view of the same storage.
#[derive(Debug, Clone, Default)]
pub struct Texture {
    storage: Option<Arc<StorageLinear>>,
    format: Format,
    swizzles: Swizzles,
    layers: Option<Range>,
    faces: Option<Range>,
    levels: Option<Range>,
}

impl Texture {
    /// Allocates zeroed storage for a new texture.
    /// See [StorageLinear::new] for the possible errors.
    pub fn new(
        format: Format,
        extent: Extent3d,
        layers: u32,
        faces: u32,
        levels: u32,
        swizzles: Swizzles,
    ) -> Result<Self, TextureError> {
        let storage = StorageLinear::new(format, extent, layers, faces, levels)?;

        Ok(Self {
            storage: Some(Arc::new(storage)),
            format,
            swizzles,
            layers: Some(Range::all(layers)),
            faces: Some(Range::all(faces)),
            levels: Some(Range::all(levels)),
        })
    }

    /// Creates a view of the selected `layers`, `faces`, and `levels` of this texture.
    /// The ranges are relative to the layers, faces, and levels of `self`.
    ///
    /// The `format` may differ from [Texture::format] as long as the formats are
    /// storage compatible. See [Format::is_compatible_with].
    /// # Examples
    /**
    ```rust
    use texture3d::{Extent3d, Format, Swizzles, Texture};
    # fn main() -> Result<(), texture3d::TextureError> {
    let texture = Texture::new(Format::RGBA8_UNORM, Extent3d::new(4, 4, 1), 6, 1, 3, Swizzles::default())?;

    // View the smallest two mipmaps of the last layer as single channel integers.
    let view = texture.view(Format::R32_UINT, 5..=5, 0..=0, 1..=2, Swizzles::default())?;
    assert_eq!(2, view.levels());
    assert_eq!(Extent3d::new(2, 2, 1), view.extent(0)?);
    assert!(view.shares_storage_with(&texture));
    # Ok(())
    # }
    ```
    */
    pub fn view(
        &self,
        format: Format,
        layers: RangeInclusive<u32>,
        faces: RangeInclusive<u32>,
        levels: RangeInclusive<u32>,
        swizzles: Swizzles,
    ) -> Result<Self, TextureError> {
        if !self.format.is_compatible_with(&format) {
            return Err(TextureError::IncompatibleFormat {
                expected: self.format,
                actual: format,
            });
        }

        let select = |range: Option<Range>, kind, selection| match range {
            Some(range) => range.select(kind, selection, range.count()),
            None => Range { base: 0, max: 0 }.select(kind, selection, 0),
        };

        let layers = select(self.layers, RangeKind::Layer, &layers)?;
        let faces = select(self.faces, RangeKind::Face, &faces)?;
        let levels = select(self.levels, RangeKind::Level, &levels)?;

        debug!(
            "Created texture view of layers {}..={}, faces {}..={}, levels {}..={}",
            layers.base, layers.max, faces.base, faces.max, levels.base, levels.max
        );

        Ok(Self {
            storage: self.storage.clone(),
            format,
            swizzles,
            layers: Some(layers),
            faces: Some(faces),
            levels: Some(levels),
        })
    }

    /// Returns `true` for textures without any storage like [Texture::default].
    pub fn is_empty(&self) -> bool {
        self.storage.is_none()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn swizzles(&self) -> Swizzles {
        self.swizzles
    }

    pub fn layers(&self) -> u32 {
        self.layers.map(|r| r.count()).unwrap_or(0)
    }

    pub fn faces(&self) -> u32 {
        self.faces.map(|r| r.count()).unwrap_or(0)
    }

    pub fn levels(&self) -> u32 {
        self.levels.map(|r| r.count()).unwrap_or(0)
    }

    /// The first layer of the storage selected by this view.
    pub fn base_layer(&self) -> u32 {
        self.layers.map(|r| r.base).unwrap_or(0)
    }

    /// The first face of the storage selected by this view.
    pub fn base_face(&self) -> u32 {
        self.faces.map(|r| r.base).unwrap_or(0)
    }

    /// The first mip level of the storage selected by this view.
    pub fn base_level(&self) -> u32 {
        self.levels.map(|r| r.base).unwrap_or(0)
    }

    /// The extent of `level` in texels relative to [Texture::base_level].
    pub fn extent(&self, level: u32) -> Result<Extent3d, TextureError> {
        let storage = self.check_level(level)?;
        Ok(storage.extent(self.base_level() + level))
    }

    /// The size in bytes of a single face of `level` relative to [Texture::base_level].
    pub fn level_size(&self, level: u32) -> Result<usize, TextureError> {
        let storage = self.check_level(level)?;
        storage
            .level_size(self.base_level() + level)
            .ok_or(TextureError::InvalidLevel {
                level,
                level_count: self.levels(),
            })
    }

    /// The size in bytes of every layer, face, and level selected by this view.
    pub fn size(&self) -> usize {
        let face_size: usize = (0..self.levels())
            .filter_map(|level| self.level_size(level).ok())
            .sum();
        face_size * self.faces() as usize * self.layers() as usize
    }

    /// Returns `true` if both textures view the same storage allocation.
    pub fn shares_storage_with(&self, other: &Texture) -> bool {
        match (&self.storage, &other.storage) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn storage(&self) -> Option<&Arc<StorageLinear>> {
        self.storage.as_ref()
    }

    /// The offset into the storage of `layer`, `face`, and `level` relative to this view.
    pub(crate) fn base_offset(&self, layer: u32, face: u32, level: u32) -> Option<usize> {
        self.storage.as_ref()?.base_offset(
            self.base_layer() + layer,
            self.base_face() + face,
            self.base_level() + level,
        )
    }

    fn check_level(&self, level: u32) -> Result<&Arc<StorageLinear>, TextureError> {
        let level_count = self.levels();
        match &self.storage {
            Some(storage) if level < level_count => Ok(storage),
            _ => Err(TextureError::InvalidLevel { level, level_count }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_array() -> Texture {
        Texture::new(
            Format::RGBA8_UNORM,
            Extent3d::new(16, 16, 1),
            2,
            6,
            5,
            Swizzles::default(),
        )
        .unwrap()
    }

    #[test]
    fn default_is_empty() {
        let texture = Texture::default();
        assert!(texture.is_empty());
        assert_eq!(0, texture.levels());
        assert_eq!(0, texture.size());
        assert_eq!(
            Err(TextureError::InvalidLevel {
                level: 0,
                level_count: 0
            }),
            texture.extent(0)
        );
    }

    #[test]
    fn size_all_levels() {
        let texture = cube_array();
        let face_size = (256 + 64 + 16 + 4 + 1) * 4;
        assert_eq!(face_size * 6 * 2, texture.size());
    }

    #[test]
    fn view_ranges() {
        let texture = cube_array();
        let view = texture
            .view(Format::RGBA8_UNORM, 1..=1, 2..=4, 2..=4, Swizzles::default())
            .unwrap();
        assert_eq!(1, view.layers());
        assert_eq!(3, view.faces());
        assert_eq!(3, view.levels());
        assert_eq!(1, view.base_layer());
        assert_eq!(2, view.base_face());
        assert_eq!(2, view.base_level());
        assert_eq!(Ok(Extent3d::new(4, 4, 1)), view.extent(0));
        assert_eq!((16 + 4 + 1) * 4 * 3, view.size());
    }

    #[test]
    fn view_of_view_is_relative() {
        let texture = cube_array();
        let view = texture
            .view(Format::RGBA8_UNORM, 0..=1, 1..=5, 1..=4, Swizzles::default())
            .unwrap();
        let view = view
            .view(Format::RGBA8_UNORM, 1..=1, 1..=1, 1..=2, Swizzles::default())
            .unwrap();
        assert_eq!(1, view.base_layer());
        assert_eq!(2, view.base_face());
        assert_eq!(2, view.base_level());
        assert_eq!(texture.base_offset(1, 2, 2), view.base_offset(0, 0, 0));
    }

    #[test]
    fn view_invalid_ranges() {
        let texture = cube_array();
        assert_eq!(
            Some(TextureError::InvalidRange {
                kind: RangeKind::Face,
                base: 0,
                max: 6,
                count: 6
            }),
            texture
                .view(Format::RGBA8_UNORM, 0..=0, 0..=6, 0..=0, Swizzles::default())
                .err()
        );
        #[allow(clippy::reversed_empty_ranges)]
        let result = texture.view(Format::RGBA8_UNORM, 0..=0, 0..=0, 3..=2, Swizzles::default());
        assert_eq!(
            Some(TextureError::InvalidRange {
                kind: RangeKind::Level,
                base: 3,
                max: 2,
                count: 5
            }),
            result.err()
        );
    }

    #[test]
    fn view_of_empty() {
        let result = Texture::default().view(
            Format::default(),
            0..=0,
            0..=0,
            0..=0,
            Swizzles::default(),
        );
        assert_eq!(
            Some(TextureError::InvalidRange {
                kind: RangeKind::Layer,
                base: 0,
                max: 0,
                count: 0
            }),
            result.err()
        );
    }

    #[test]
    fn view_incompatible_format() {
        let texture = cube_array();
        let result = texture.view(
            Format::BC7_RGBA_UNORM,
            0..=0,
            0..=0,
            0..=0,
            Swizzles::default(),
        );
        assert_eq!(
            Some(TextureError::IncompatibleFormat {
                expected: Format::RGBA8_UNORM,
                actual: Format::BC7_RGBA_UNORM
            }),
            result.err()
        );
    }

    #[test]
    fn views_share_storage() {
        let texture = cube_array();
        let view = texture.clone();
        assert!(view.shares_storage_with(&texture));

        let other = cube_array();
        assert!(!other.shares_storage_with(&texture));
        assert!(!Texture::default().shares_storage_with(&Texture::default()));
    }
}
