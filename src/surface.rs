//! Track-surface sampling.
//!
//! The track image is snapshotted once into a [`SurfaceBuffer`]; after that
//! drivability is a pure lookup. Display coordinates (container space, where
//! the image may be scaled) are mapped linearly onto the raster's native
//! resolution before a single pixel is classified by colour.

#[cfg(feature = "render")]
use bevy::color::ColorToPacked;
use bevy::prelude::Resource;
use glam::Vec2;
use thiserror::Error;

use crate::constants::{SHOULDER_CEILING, TARMAC_CEILING};
use crate::numeric::{dimension_to_f32, round_to_index};

/// Capability to answer "can the avatar drive here at full speed?".
///
/// `position` is the avatar's top-left corner and `size` its edge length, both
/// in container space; `container` is the display size of the track.
#[cfg_attr(test, mockall::automock)]
pub trait SurfaceQuery {
    /// Returns whether the avatar's centre sits on drivable surface.
    fn is_drivable(&self, position: Vec2, size: f32, container: Vec2) -> bool;
}

/// Failures while building a [`SurfaceBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// One of the dimensions is zero.
    #[error("raster must not be empty, got {width}x{height}")]
    Empty {
        /// Supplied width.
        width: u32,
        /// Supplied height.
        height: u32,
    },
    /// The pixel buffer does not hold `width * height` RGBA texels.
    #[error("expected {expected} bytes of RGBA8 data, got {actual}")]
    LengthMismatch {
        /// Byte count implied by the dimensions.
        expected: usize,
        /// Byte count supplied.
        actual: usize,
    },
    /// A texel could not be decoded from the source image.
    #[error("unreadable texel at ({x}, {y}): {detail}")]
    Unreadable {
        /// Column of the texel.
        x: u32,
        /// Row of the texel.
        y: u32,
        /// Decoder message.
        detail: String,
    },
}

/// Colour class of a sampled texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Near-black asphalt.
    Tarmac,
    /// Dark-grey kerb and run-off.
    Shoulder,
    /// Anything else: grass, paint, background.
    Off,
}

impl SurfaceKind {
    /// Classifies an RGB triple; alpha plays no part.
    ///
    /// # Examples
    ///
    /// ```
    /// use trackfolio::surface::SurfaceKind;
    /// assert_eq!(SurfaceKind::classify([10, 20, 39]), SurfaceKind::Tarmac);
    /// assert_eq!(SurfaceKind::classify([40, 80, 119]), SurfaceKind::Shoulder);
    /// assert_eq!(SurfaceKind::classify([30, 30, 200]), SurfaceKind::Off);
    /// ```
    #[must_use]
    pub fn classify(rgb: [u8; 3]) -> Self {
        if rgb.iter().all(|&c| c < TARMAC_CEILING) {
            Self::Tarmac
        } else if rgb
            .iter()
            .all(|&c| (TARMAC_CEILING..SHOULDER_CEILING).contains(&c))
        {
            Self::Shoulder
        } else {
            Self::Off
        }
    }

    /// Tarmac and shoulder are drivable.
    #[must_use]
    pub const fn is_drivable(self) -> bool {
        matches!(self, Self::Tarmac | Self::Shoulder)
    }
}

/// Immutable RGBA8 snapshot of the track image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SurfaceBuffer {
    /// Wraps row-major RGBA8 texels.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Empty`] for a zero dimension and
    /// [`SurfaceError::LengthMismatch`] when `pixels` has the wrong size.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::Empty { width, height });
        }
        let expected = texel_count(width, height).saturating_mul(4);
        if pixels.len() != expected {
            return Err(SurfaceError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Snapshots a decoded Bevy image at its natural resolution.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Unreadable`] when a texel cannot be converted
    /// (for example compressed formats) and the errors of
    /// [`SurfaceBuffer::from_rgba8`].
    #[cfg(feature = "render")]
    pub fn from_image(image: &bevy::image::Image) -> Result<Self, SurfaceError> {
        let (width, height) = (image.width(), image.height());
        let mut pixels = Vec::with_capacity(texel_count(width, height).saturating_mul(4));
        for y in 0..height {
            for x in 0..width {
                let colour = image
                    .get_color_at(x, y)
                    .map_err(|err| SurfaceError::Unreadable {
                        x,
                        y,
                        detail: err.to_string(),
                    })?;
                pixels.extend_from_slice(&colour.to_srgba().to_u8_array());
            }
        }
        Self::from_rgba8(width, height, pixels)
    }

    /// Native width in texels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Native height in texels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// RGBA of the texel at `(x, y)`, or `None` off the raster.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (texel_count(self.width, y) + x as usize) * 4;
        let bytes = self.pixels.get(offset..offset + 4)?;
        <[u8; 4]>::try_from(bytes).ok()
    }

    /// Maps a display-space point onto the raster and samples it.
    #[must_use]
    pub fn sample_display(&self, point: Vec2, container: Vec2) -> Option<[u8; 4]> {
        if container.x <= 0.0 || container.y <= 0.0 {
            return None;
        }
        let x = round_to_index(point.x / container.x * dimension_to_f32(self.width), self.width)?;
        let y = round_to_index(point.y / container.y * dimension_to_f32(self.height), self.height)?;
        self.texel(x, y)
    }

    /// Classifies the texel under a display-space point; off-raster is `Off`.
    #[must_use]
    pub fn kind_at(&self, point: Vec2, container: Vec2) -> SurfaceKind {
        self.sample_display(point, container)
            .map_or(SurfaceKind::Off, |[r, g, b, _]| SurfaceKind::classify([r, g, b]))
    }
}

const fn texel_count(width: u32, rows: u32) -> usize {
    width as usize * rows as usize
}

/// Raster-backed [`SurfaceQuery`]; not drivable anywhere until captured.
#[derive(Resource, Debug, Default, Clone)]
pub struct RasterSurface {
    buffer: Option<SurfaceBuffer>,
}

impl RasterSurface {
    /// A surface that is ready immediately.
    #[must_use]
    pub const fn ready(buffer: SurfaceBuffer) -> Self {
        Self {
            buffer: Some(buffer),
        }
    }

    /// Whether a snapshot has been captured.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.buffer.is_some()
    }

    /// The captured snapshot, if any.
    #[must_use]
    pub const fn buffer(&self) -> Option<&SurfaceBuffer> {
        self.buffer.as_ref()
    }

    /// Installs the snapshot. The first capture wins; later calls are ignored
    /// and return `false`.
    pub fn install(&mut self, buffer: SurfaceBuffer) -> bool {
        if self.buffer.is_some() {
            return false;
        }
        log::info!(
            "track surface captured at {}x{}",
            buffer.width(),
            buffer.height()
        );
        self.buffer = Some(buffer);
        true
    }
}

impl SurfaceQuery for RasterSurface {
    fn is_drivable(&self, position: Vec2, size: f32, container: Vec2) -> bool {
        let centre = position + Vec2::splat(size / 2.0);
        self.buffer
            .as_ref()
            .is_some_and(|buffer| buffer.kind_at(centre, container).is_drivable())
    }
}
