use palette::Srgba;

#[cfg(feature = "image")]
use {
    crate::widen,
    image::{DynamicImage, GenericImageView, ImageBuffer, Luma, LumaA, Rgb, Rgba},
    std::ops::Deref,
};

/// A read-only, in-memory image that the reducers can sample.
///
/// Pixels are reported with 16-bit channels. Sources with 8-bit channels should widen them
/// so that the high byte holds the original value (see [`widen`](crate::widen)),
/// since every reducer narrows channels back to 8 bits by keeping only the high byte.
///
/// The bitmap must not change for the duration of a call that borrows it.
pub trait Bitmap {
    /// The number of columns in the image.
    fn width(&self) -> u32;

    /// The number of rows in the image.
    fn height(&self) -> u32;

    /// The color of the pixel at column `x` and row `y`.
    ///
    /// Callers guarantee `x < width()` and `y < height()`.
    fn at(&self, x: u32, y: u32) -> Srgba<u16>;
}

impl<B: Bitmap + ?Sized> Bitmap for &B {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        (**self).at(x, y)
    }
}

#[cfg(feature = "image")]
impl<C: Deref<Target = [u8]>> Bitmap for ImageBuffer<Rgba<u8>, C> {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        widen(Srgba::new(r, g, b, a))
    }
}

#[cfg(feature = "image")]
impl<C: Deref<Target = [u8]>> Bitmap for ImageBuffer<Rgb<u8>, C> {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        let [r, g, b] = self.get_pixel(x, y).0;
        widen(Srgba::new(r, g, b, u8::MAX))
    }
}

#[cfg(feature = "image")]
impl<C: Deref<Target = [u16]>> Bitmap for ImageBuffer<Rgba<u16>, C> {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Srgba::new(r, g, b, a)
    }
}

#[cfg(feature = "image")]
impl<C: Deref<Target = [u16]>> Bitmap for ImageBuffer<Rgb<u16>, C> {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        let [r, g, b] = self.get_pixel(x, y).0;
        Srgba::new(r, g, b, u16::MAX)
    }
}

#[cfg(feature = "image")]
impl<C: Deref<Target = [u16]>> Bitmap for ImageBuffer<Luma<u16>, C> {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        let [l] = self.get_pixel(x, y).0;
        Srgba::new(l, l, l, u16::MAX)
    }
}

#[cfg(feature = "image")]
impl<C: Deref<Target = [u16]>> Bitmap for ImageBuffer<LumaA<u16>, C> {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        let [l, a] = self.get_pixel(x, y).0;
        Srgba::new(l, l, l, a)
    }
}

/// Maps a float channel in `0.0..=1.0` to 16 bits, clamping out of range values.
#[cfg(feature = "image")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * f32::from(u16::MAX)).round() as u16
}

/// 16-bit and float variants are read at 16 bits per channel, so that narrowing
/// truncates their low byte. The 8-bit variants go through
/// [`GenericImageView::get_pixel`] and are widened.
#[cfg(feature = "image")]
impl Bitmap for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn at(&self, x: u32, y: u32) -> Srgba<u16> {
        match self {
            DynamicImage::ImageLuma16(buf) => buf.at(x, y),
            DynamicImage::ImageLumaA16(buf) => buf.at(x, y),
            DynamicImage::ImageRgb16(buf) => buf.at(x, y),
            DynamicImage::ImageRgba16(buf) => buf.at(x, y),
            DynamicImage::ImageRgb32F(buf) => {
                let [r, g, b] = buf.get_pixel(x, y).0.map(unit_to_u16);
                Srgba::new(r, g, b, u16::MAX)
            }
            DynamicImage::ImageRgba32F(buf) => {
                let [r, g, b, a] = buf.get_pixel(x, y).0.map(unit_to_u16);
                Srgba::new(r, g, b, a)
            }
            other => {
                let [r, g, b, a] = other.get_pixel(x, y).0;
                widen(Srgba::new(r, g, b, a))
            }
        }
    }
}
