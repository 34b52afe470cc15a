//! Channel swizzles stored alongside a texture.
//!
//! Swizzles are metadata only. Loading and storing texels never reorders channels.

/// The source of a single output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swizzle {
    Red,
    Green,
    Blue,
    Alpha,
    Zero,
    One,
}

/// The sources for the red, green, blue, and alpha output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swizzles {
    pub r: Swizzle,
    pub g: Swizzle,
    pub b: Swizzle,
    pub a: Swizzle,
}

impl Swizzles {
    pub const IDENTITY: Swizzles = Swizzles::new(
        Swizzle::Red,
        Swizzle::Green,
        Swizzle::Blue,
        Swizzle::Alpha,
    );

    pub const fn new(r: Swizzle, g: Swizzle, b: Swizzle, a: Swizzle) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Applies the swizzles to the channels of `value`.
    /// [Swizzle::Zero] and [Swizzle::One] select `zero` and `one`.
    /**
    ```rust
    use texture3d::{Swizzle, Swizzles};

    let bgra = Swizzles::new(Swizzle::Blue, Swizzle::Green, Swizzle::Red, Swizzle::One);
    assert_eq!([3u8, 2, 1, 255], bgra.apply([1u8, 2, 3, 4], 0, 255));
    ```
    */
    pub fn apply<T: Copy>(&self, value: [T; 4], zero: T, one: T) -> [T; 4] {
        let channel = |swizzle: Swizzle| match swizzle {
            Swizzle::Red => value[0],
            Swizzle::Green => value[1],
            Swizzle::Blue => value[2],
            Swizzle::Alpha => value[3],
            Swizzle::Zero => zero,
            Swizzle::One => one,
        };
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }
}

impl Default for Swizzles {
    fn default() -> Self {
        Self::IDENTITY
    }
}
