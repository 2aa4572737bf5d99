//! Contains various types needed across the crate.

use crate::Bitmap;
use palette::Srgba;
use thiserror::Error;
#[cfg(feature = "image")]
use {image::RgbaImage, palette::cast::ComponentsAs};

/// The fully transparent black returned for inputs with nothing to summarize.
pub const ZERO_COLOR: Srgba<u8> = Srgba::new(0, 0, 0, 0);

/// Narrows a 16-bit color to 8 bits per channel by keeping the most significant byte.
///
/// The low byte is discarded without rounding.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn narrow(color: Srgba<u16>) -> Srgba<u8> {
    let (r, g, b, a) = color.into_components();
    Srgba::new((r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8, (a >> 8) as u8)
}

/// Widens an 8-bit color to 16 bits per channel by repeating each byte,
/// so that `0xFF` maps to `0xFFFF` and [`narrow`] recovers the input exactly.
#[must_use]
pub fn widen(color: Srgba<u8>) -> Srgba<u16> {
    let (r, g, b, a) = color.into_components();
    let repeat = |v: u8| u16::from(v) * 0x101;
    Srgba::new(repeat(r), repeat(g), repeat(b), repeat(a))
}

/// An argument that a reducer cannot work with.
///
/// These are reported before any pixel is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// The requested number of bands or clusters was zero.
    #[error("palette length must be a non-zero positive value")]
    NonPositiveCount,
    /// More bands were requested than the image has rows.
    #[error("palette length of {count} exceeds the image height of {height}")]
    CountExceedsHeight {
        /// The requested number of bands.
        count: u32,
        /// The number of rows in the image.
        height: u32,
    },
    /// More clusters were requested than there are sampled pixels.
    #[error("cluster count of {count} exceeds the {samples} sampled pixels")]
    CountExceedsSamples {
        /// The requested number of clusters.
        count: u32,
        /// The number of pixels in the working set.
        samples: usize,
    },
    /// The image produced no pixels to sample.
    #[error("the image has no pixels to sample")]
    EmptyBitmap,
    /// A color slice does not hold exactly `width * height` colors.
    #[error("{len} colors do not fill a {width}x{height} grid")]
    DimensionMismatch {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
        /// The number of colors provided.
        len: usize,
    },
}

/// The error type returned by the parallel reducer.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`InvalidArgument`].
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    /// The bounded worker pool could not be started.
    #[error("failed to build the worker pool")]
    WorkerPool(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A row-major grid of colors borrowed from a slice, usable as a [`Bitmap`].
///
/// # Examples
/// ```
/// # use gama::{ColorGrid, InvalidArgument};
/// # use palette::Srgba;
/// # fn main() -> Result<(), InvalidArgument> {
/// let colors = vec![Srgba::new(255, 0, 0, 255); 6];
/// let grid = ColorGrid::new(&colors, 3, 2)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColorGrid<'a> {
    /// The pixels, one row after another.
    colors: &'a [Srgba<u8>],
    /// The number of columns.
    width: u32,
    /// The number of rows.
    height: u32,
}

impl<'a> ColorGrid<'a> {
    /// Creates a new [`ColorGrid`], ensuring that `colors` holds exactly `width * height` colors.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::DimensionMismatch`] if the length of `colors` does not match.
    pub fn new(colors: &'a [Srgba<u8>], width: u32, height: u32) -> Result<Self, InvalidArgument> {
        if colors.len() as u64 == u64::from(width) * u64::from(height) {
            Ok(Self { colors, width, height })
        } else {
            Err(InvalidArgument::DimensionMismatch { width, height, len: colors.len() })
        }
    }

    /// Returns the underlying colors in row-major order.
    #[must_use]
    pub const fn colors(&self) -> &'a [Srgba<u8>] {
        self.colors
    }
}

impl Bitmap for ColorGrid<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        widen(self.colors[y as usize * self.width as usize + x as usize])
    }
}

#[cfg(feature = "image")]
impl<'a> From<&'a RgbaImage> for ColorGrid<'a> {
    fn from(image: &'a RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = width as usize * height as usize;
        let buf = &image.as_raw()[..(pixels * 4)];
        Self { colors: buf.components_as(), width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_truncates_instead_of_rounding() {
        let color = Srgba::new(0x12FF, 0x0080, 0xFF00, 0xFFFF);
        assert_eq!(narrow(color), Srgba::new(0x12, 0x00, 0xFF, 0xFF));
    }

    #[test]
    fn widen_then_narrow_is_identity() {
        for v in 0..=u8::MAX {
            let color = Srgba::new(v, v.wrapping_add(1), v.wrapping_mul(3), !v);
            assert_eq!(narrow(widen(color)), color);
        }
        assert_eq!(widen(Srgba::new(0, 1, 0x80, 0xFF)), Srgba::new(0, 0x0101, 0x8080, 0xFFFF));
    }

    #[test]
    fn grid_rejects_mismatched_dimensions() {
        let colors = vec![ZERO_COLOR; 5];
        assert_eq!(
            ColorGrid::new(&colors, 2, 3).unwrap_err(),
            InvalidArgument::DimensionMismatch { width: 2, height: 3, len: 5 }
        );
        assert!(ColorGrid::new(&colors, 5, 1).is_ok());
        assert!(ColorGrid::new(&[], 0, 7).is_ok());
    }

    #[test]
    fn grid_reads_row_major() {
        let colors = (0..6u8).map(|i| Srgba::new(i, 0, 0, 255)).collect::<Vec<_>>();
        let grid = ColorGrid::new(&colors, 3, 2).unwrap();
        assert_eq!(narrow(grid.at(2, 0)), colors[2]);
        assert_eq!(narrow(grid.at(0, 1)), colors[3]);
        assert_eq!(narrow(grid.at(2, 1)), colors[5]);
    }

    #[cfg(feature = "image")]
    #[test]
    fn grid_from_rgba_image() {
        let image = RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8, y as u8, 7, 255]));
        let grid = ColorGrid::from(&image);
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.colors()[4], Srgba::new(1, 1, 7, 255));
        assert_eq!(grid.at(1, 1), image.at(1, 1));
    }
}
