#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};
use texture3d::{BlockDim, Extent3d, Format, Swizzles, Texture3d};

#[derive(Debug)]
struct Input {
    extent: Extent3d,
    block_dim: BlockDim,
    block_size_in_bytes: u32,
    levels: u32,
    base_level: u32,
    max_level: u32,
    coord: [u32; 3],
    level: u32,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        // Limit the dimensions to keep allocations small.
        Ok(Input {
            extent: Extent3d::new(
                u.int_in_range(0..=64)?,
                u.int_in_range(0..=64)?,
                u.int_in_range(0..=64)?,
            ),
            block_dim: u.arbitrary()?,
            block_size_in_bytes: u.int_in_range(0..=16)?,
            levels: u.int_in_range(0..=8)?,
            base_level: u.int_in_range(0..=8)?,
            max_level: u.int_in_range(0..=8)?,
            coord: u.arbitrary()?,
            level: u.int_in_range(0..=8)?,
        })
    }
}

fuzz_target!(|input: Input| {
    let format = Format::new(input.block_size_in_bytes, input.block_dim, 4);

    // This should never panic even if the parameters are invalid.
    if let Ok(texture) = Texture3d::new(format, input.extent, input.levels, Swizzles::default()) {
        let _ = texture.store(input.coord, input.level, 0xffu8);
        let _ = texture.load::<u32>(input.coord, input.level);
        let _ = texture.clear_with([1u8; 4]);
        let _ = texture.clear_level(input.level, 0u16);

        if let Ok(view) = texture.narrow(input.base_level, input.max_level) {
            let _ = view.load::<u8>(input.coord, input.level);
            let _ = view.copy_level(&texture, input.level, 0);
            view.clear();
        }
    }
});
