//! Contains [`Bucket`], the accumulator behind the band median reducer.

use crate::ZERO_COLOR;
use palette::Srgba;
use std::array;

/// An append-only collection of colors that reduces to a per-channel median color.
///
/// The median is taken for each of the red, green, blue, and alpha channels independently,
/// so the result need not be a color that was ever pushed.
///
/// # Examples
/// ```
/// # use gama::Bucket;
/// # use palette::Srgba;
/// let mut bucket = Bucket::new();
/// bucket.push(Srgba::new(10, 200, 0, 255));
/// bucket.push(Srgba::new(20, 100, 5, 255));
/// bucket.push(Srgba::new(30, 0, 9, 255));
/// assert_eq!(bucket.median(), Srgba::new(20, 100, 5, 255));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    /// The colors in push order.
    colors: Vec<Srgba<u8>>,
}

impl Bucket {
    /// Creates an empty [`Bucket`].
    #[must_use]
    pub const fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Creates an empty [`Bucket`] with room for `capacity` colors.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { colors: Vec::with_capacity(capacity) }
    }

    /// Appends a color.
    pub fn push(&mut self, color: Srgba<u8>) {
        self.colors.push(color);
    }

    /// The number of colors pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether or not no colors have been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Computes the per-channel median color.
    ///
    /// For an odd number of colors, each channel is the middle value after sorting.
    /// For an even number, each channel is the mean of the two middle values, truncated.
    /// An empty bucket yields [`ZERO_COLOR`] and a bucket of one color yields that color.
    #[must_use]
    pub fn median(&self) -> Srgba<u8> {
        match self.colors.as_slice() {
            [] => return ZERO_COLOR,
            &[color] => return color,
            _ => (),
        }

        let mut channels: [Vec<u8>; 4] = array::from_fn(|_| Vec::with_capacity(self.len()));
        for &color in &self.colors {
            let (r, g, b, a) = color.into_components();
            for (channel, value) in channels.iter_mut().zip([r, g, b, a]) {
                channel.push(value);
            }
        }

        let [r, g, b, a] = channels.map(channel_median);
        Srgba::new(r, g, b, a)
    }
}

impl Extend<Srgba<u8>> for Bucket {
    fn extend<T: IntoIterator<Item = Srgba<u8>>>(&mut self, iter: T) {
        self.colors.extend(iter);
    }
}

impl FromIterator<Srgba<u8>> for Bucket {
    fn from_iter<T: IntoIterator<Item = Srgba<u8>>>(iter: T) -> Self {
        Self { colors: iter.into_iter().collect() }
    }
}

/// Sorts the values of one channel and returns their median.
#[allow(clippy::cast_possible_truncation)]
fn channel_median(mut values: Vec<u8>) -> u8 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        // at most 255, so the cast is exact
        ((u16::from(values[mid - 1]) + u16::from(values[mid])) / 2) as u8
    }
}
