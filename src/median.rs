//! Summarizes an image with one median color per horizontal band of rows.
//!
//! The image is split into `n` bands of `height / n` rows each, with the last band also
//! taking the rows left over by the division. Every pixel of a band goes into its own
//! [`Bucket`], and the band is represented by that bucket's per-channel median.
//!
//! [`quantify`] runs the bands one after another. With the `threads` feature,
//! [`quantify_par`] runs them on a dedicated pool of at most
//! `min(n, available parallelism)` workers and returns once every band is done.
//!
//! # Examples
//! ```
//! # use gama::{median, ColorGrid};
//! # use palette::Srgba;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let red = Srgba::new(255, 0, 0, 255);
//! let blue = Srgba::new(0, 0, 255, 255);
//! let colors = [[red; 4], [red; 4], [blue; 4], [blue; 4]].concat();
//! let grid = ColorGrid::new(&colors, 4, 4)?;
//!
//! assert_eq!(median::quantify(&grid, 2)?, vec![red, blue]);
//! # Ok(())
//! # }
//! ```

use crate::{narrow, Bitmap, Bucket, InvalidArgument};
use log::debug;
use palette::Srgba;
use std::ops::Range;

#[cfg(feature = "threads")]
use {
    crate::{to_hex, Error},
    log::trace,
    parking_lot::Mutex,
    rayon::prelude::*,
    std::{num::NonZeroUsize, thread},
};

/// The order in which [`quantify_par_with`] returns the band colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BandOrder {
    /// The color of band `i` is at index `i`.
    ///
    /// Each band writes to its own slot, so no locking is needed.
    #[default]
    Index,
    /// Colors are appended under a lock as each band finishes,
    /// so the order can differ from run to run.
    Completion,
}

/// A builder struct to specify the parameters for the parallel band reducer.
///
/// # Examples
/// ```
/// # use gama::median::{BandOrder, MedianOptions};
/// let options = MedianOptions::new()
///     .order(BandOrder::Completion)
///     .threads(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MedianOptions {
    /// The order of the output colors.
    order: BandOrder,
    /// The maximum number of workers, or `0` for the available parallelism.
    threads: usize,
}

impl MedianOptions {
    /// Creates a new [`MedianOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { order: BandOrder::Index, threads: 0 }
    }

    /// Sets the order of the output colors.
    ///
    /// The default is [`BandOrder::Index`].
    #[must_use]
    pub const fn order(mut self, order: BandOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the maximum number of bands that are reduced at the same time.
    ///
    /// The number of workers never exceeds the number of bands.
    /// The default of `0` uses the available parallelism reported by the system,
    /// falling back to a single worker if that cannot be determined.
    #[must_use]
    pub const fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// The number of workers to use for `n` bands.
    #[cfg(feature = "threads")]
    fn workers(&self, n: u32) -> usize {
        let limit = if self.threads == 0 {
            thread::available_parallelism().map_or(1, NonZeroUsize::get)
        } else {
            self.threads
        };

        limit.min(n as usize).max(1)
    }
}

/// Returns the rows covered by each of the `n` bands of an image with `height` rows.
///
/// All bands have `height / n` rows, except the last one which extends to `height`.
///
/// # Errors
/// Returns [`InvalidArgument::NonPositiveCount`] if `n` is zero
/// and [`InvalidArgument::CountExceedsHeight`] if `n` is greater than `height`.
///
/// # Examples
/// ```
/// # use gama::median::bands;
/// # fn main() -> Result<(), gama::InvalidArgument> {
/// assert_eq!(bands(10, 3)?, vec![0..3, 3..6, 6..10]);
/// # Ok(())
/// # }
/// ```
pub fn bands(height: u32, n: u32) -> Result<Vec<Range<u32>>, InvalidArgument> {
    if n == 0 {
        return Err(InvalidArgument::NonPositiveCount);
    }
    if n > height {
        return Err(InvalidArgument::CountExceedsHeight { count: n, height });
    }

    let lines = height / n;
    Ok((0..n)
        .map(|i| {
            let start = i * lines;
            let end = if i == n - 1 { height } else { start + lines };
            start..end
        })
        .collect())
}

/// Pushes every pixel in `rows` into a fresh [`Bucket`] and returns its median.
fn band_median<B: Bitmap + ?Sized>(bitmap: &B, rows: Range<u32>) -> Srgba<u8> {
    let width = bitmap.width();
    let mut bucket = Bucket::with_capacity(width as usize * rows.len());
    for y in rows {
        for x in 0..width {
            bucket.push(narrow(bitmap.at(x, y)));
        }
    }
    bucket.median()
}

/// Computes the median color of each of `n` horizontal bands, one band at a time.
///
/// The color of band `i` is at index `i` of the output.
///
/// # Errors
/// Returns an [`InvalidArgument`] if `n` is zero or greater than the height of the image.
pub fn quantify<B: Bitmap + ?Sized>(bitmap: &B, n: u32) -> Result<Vec<Srgba<u8>>, InvalidArgument> {
    let bands = bands(bitmap.height(), n)?;

    debug!(
        "reducing {}x{} image to {n} band medians",
        bitmap.width(),
        bitmap.height()
    );

    Ok(bands.into_iter().map(|rows| band_median(bitmap, rows)).collect())
}

/// Computes the median color of each of `n` horizontal bands in parallel,
/// returning them in band order.
///
/// This is [`quantify_par_with`] using the default [`MedianOptions`].
///
/// # Errors
/// Returns an [`Error::InvalidArgument`] if `n` is zero or greater than the height of the image,
/// or an [`Error::WorkerPool`] if the worker threads could not be spawned.
#[cfg(feature = "threads")]
pub fn quantify_par<B: Bitmap + Sync + ?Sized>(bitmap: &B, n: u32) -> Result<Vec<Srgba<u8>>, Error> {
    quantify_par_with(bitmap, n, MedianOptions::new())
}

/// Computes the median color of each of `n` horizontal bands in parallel.
///
/// The bands are reduced on a dedicated pool whose size bounds how many run at once
/// (see [`MedianOptions::threads`]). Bands that are not yet admitted wait for a free worker.
/// This function blocks until every band is done.
///
/// # Errors
/// Returns an [`Error::InvalidArgument`] if `n` is zero or greater than the height of the image,
/// in which case no work is started, or an [`Error::WorkerPool`] if the worker threads
/// could not be spawned.
#[cfg(feature = "threads")]
pub fn quantify_par_with<B: Bitmap + Sync + ?Sized>(
    bitmap: &B,
    n: u32,
    options: MedianOptions,
) -> Result<Vec<Srgba<u8>>, Error> {
    let bands = bands(bitmap.height(), n)?;
    let workers = options.workers(n);

    debug!(
        "reducing {}x{} image to {n} band medians on {workers} workers",
        bitmap.width(),
        bitmap.height(),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("gama-band-{i}"))
        .build()
        .map_err(|e| Error::WorkerPool(Box::new(e)))?;

    let reduce = |(i, rows): (usize, Range<u32>)| {
        let median = band_median(bitmap, rows.clone());
        trace!("band {i} (rows {}..{}) => {}", rows.start, rows.end, to_hex(median, true));
        median
    };

    let colors = pool.install(|| match options.order {
        BandOrder::Index => bands.into_par_iter().enumerate().map(reduce).collect(),
        BandOrder::Completion => {
            let colors = Mutex::new(Vec::with_capacity(bands.len()));
            bands.into_par_iter().enumerate().for_each(|band| {
                let median = reduce(band);
                colors.lock().push(median);
            });
            colors.into_inner()
        }
    });

    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::*, ColorGrid};

    #[test]
    fn band_layout() {
        assert_eq!(bands(4, 2).unwrap(), vec![0..2, 2..4]);
        assert_eq!(bands(7, 7).unwrap(), (0..7).map(|y| y..y + 1).collect::<Vec<_>>());
        assert_eq!(bands(9, 4).unwrap(), vec![0..2, 2..4, 4..6, 6..9]);
        assert_eq!(bands(5, 1).unwrap(), vec![0..5]);
    }

    #[test]
    fn invalid_counts() {
        let colors = solid_rows(3, &[RED; 4]);
        let grid = ColorGrid::new(&colors, 3, 4).unwrap();

        assert_eq!(quantify(&grid, 0), Err(InvalidArgument::NonPositiveCount));
        assert_eq!(
            quantify(&grid, 5),
            Err(InvalidArgument::CountExceedsHeight { count: 5, height: 4 })
        );

        #[cfg(feature = "threads")]
        {
            assert!(matches!(
                quantify_par(&grid, 0),
                Err(Error::InvalidArgument(InvalidArgument::NonPositiveCount))
            ));
            assert!(matches!(
                quantify_par(&grid, 5),
                Err(Error::InvalidArgument(InvalidArgument::CountExceedsHeight { count: 5, height: 4 }))
            ));
        }
    }

    #[test]
    fn red_and_blue_halves() {
        let colors = solid_rows(4, &[RED, RED, BLUE, BLUE]);
        let grid = ColorGrid::new(&colors, 4, 4).unwrap();

        assert_eq!(quantify(&grid, 2).unwrap(), vec![RED, BLUE]);

        #[cfg(feature = "threads")]
        {
            assert_eq!(quantify_par(&grid, 2).unwrap(), vec![RED, BLUE]);

            let mut unordered = quantify_par_with(
                &grid,
                2,
                MedianOptions::new().order(BandOrder::Completion),
            )
            .unwrap();
            unordered.sort_by_key(|c| c.into_components());
            assert_eq!(unordered, vec![BLUE, RED]);
        }
    }

    #[test]
    fn zero_width_bands_give_zero_color() {
        let grid = ColorGrid::new(&[], 0, 4).unwrap();

        assert_eq!(quantify(&grid, 2).unwrap(), vec![crate::ZERO_COLOR; 2]);
        #[cfg(feature = "threads")]
        {
            assert_eq!(quantify_par(&grid, 2).unwrap(), vec![crate::ZERO_COLOR; 2]);
            assert_eq!(
                quantify_par_with(&grid, 4, MedianOptions::new().order(BandOrder::Completion))
                    .unwrap(),
                vec![crate::ZERO_COLOR; 4]
            );
        }
    }

    #[test]
    fn returns_exactly_n_colors() {
        let colors = test_colors_1024();
        let grid = ColorGrid::new(&colors, 16, 64).unwrap();
        for n in [1, 2, 3, 7, 63, 64] {
            assert_eq!(quantify(&grid, n).unwrap().len(), n as usize);
            #[cfg(feature = "threads")]
            assert_eq!(quantify_par(&grid, n).unwrap().len(), n as usize);
        }
    }

    #[test]
    fn monochrome_bands_keep_their_color() {
        let rows = test_colors_1024()
            .chunks(3)
            .take(30)
            .flat_map(|chunk| [chunk[0]; 3])
            .collect::<Vec<_>>();
        let grid = ColorGrid::new(&rows, 1, 90).unwrap();
        let expected = rows.iter().step_by(3).copied().collect::<Vec<_>>();

        assert_eq!(quantify(&grid, 30).unwrap(), expected);
        #[cfg(feature = "threads")]
        assert_eq!(quantify_par(&grid, 30).unwrap(), expected);
    }

    #[test]
    fn one_band_per_row() {
        let colors = test_colors_1024();
        let grid = ColorGrid::new(&colors, 32, 32).unwrap();
        let expected = colors
            .chunks_exact(32)
            .map(|row| row.iter().copied().collect::<Bucket>().median())
            .collect::<Vec<_>>();

        assert_eq!(quantify(&grid, 32).unwrap(), expected);
        #[cfg(feature = "threads")]
        assert_eq!(quantify_par(&grid, 32).unwrap(), expected);
    }

    #[test]
    fn last_band_takes_remainder() {
        // 5 rows into 2 bands: rows 0..2 and 2..5
        let a = Srgba::new(10, 10, 10, 255);
        let b = Srgba::new(50, 50, 50, 255);
        let c = Srgba::new(90, 90, 90, 255);
        let colors = solid_rows(2, &[a, a, b, c, c]);
        let grid = ColorGrid::new(&colors, 2, 5).unwrap();

        assert_eq!(quantify(&grid, 2).unwrap(), vec![a, c]);
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let colors = test_colors_1024();
        let grid = ColorGrid::new(&colors, 8, 128).unwrap();

        for n in [1, 5, 17, 128] {
            let single = quantify(&grid, n).unwrap();
            for threads in [0, 1, 3] {
                let options = MedianOptions::new().threads(threads);
                assert_eq!(quantify_par_with(&grid, n, options).unwrap(), single);

                let mut unordered =
                    quantify_par_with(&grid, n, options.order(BandOrder::Completion)).unwrap();
                let mut expected = single.clone();
                unordered.sort_by_key(|c| c.into_components());
                expected.sort_by_key(|c| c.into_components());
                assert_eq!(unordered, expected);
            }
        }
    }

    #[test]
    #[cfg(feature = "threads")]
    fn workers_are_bounded_by_band_count() {
        assert_eq!(MedianOptions::new().threads(8).workers(3), 3);
        assert_eq!(MedianOptions::new().threads(2).workers(3), 2);
        assert_eq!(MedianOptions::new().threads(1).workers(1), 1);
        let auto = MedianOptions::new().workers(1000);
        assert!((1..=1000).contains(&auto));
    }
}
