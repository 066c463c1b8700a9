//! Convenience constructors for track rasters used in tests.

use trackfolio::surface::SurfaceBuffer;

/// Dark asphalt, classified as tarmac.
pub const TARMAC: [u8; 3] = [20, 20, 20];
/// Grey run-off, classified as shoulder.
pub const SHOULDER: [u8; 3] = [100, 100, 100];
/// Bright infield, not drivable.
pub const GRASS: [u8; 3] = [60, 170, 60];

/// A raster filled with one opaque colour.
///
/// # Panics
/// Panics if either dimension is zero.
///
/// # Examples
/// ```
/// use test_utils::raster::{solid_raster, TARMAC};
/// let raster = solid_raster(4, 2, TARMAC);
/// assert_eq!(raster.texel(3, 1), Some([20, 20, 20, 255]));
/// ```
#[must_use]
pub fn solid_raster(width: u32, height: u32, rgb: [u8; 3]) -> SurfaceBuffer {
    raster_from_fn(width, height, |_, _| rgb)
}

/// A raster whose left half is `left` and right half is `right`.
///
/// # Panics
/// Panics if either dimension is zero.
#[must_use]
pub fn split_raster(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> SurfaceBuffer {
    raster_from_fn(width, height, |x, _| if x < width / 2 { left } else { right })
}

/// A raster coloured texel by texel.
///
/// # Panics
/// Panics if either dimension is zero.
pub fn raster_from_fn(
    width: u32,
    height: u32,
    colour: impl Fn(u32, u32) -> [u8; 3],
) -> SurfaceBuffer {
    let mut pixels = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = colour(x, y);
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    SurfaceBuffer::from_rgba8(width, height, pixels)
        .unwrap_or_else(|err| panic!("invalid test raster: {err}"))
}
