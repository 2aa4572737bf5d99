//! Finds the dominant colors of an image through k-means clustering.
//!
//! Every `stride`-th pixel of every `stride`-th row, starting at the origin,
//! forms the working set (alpha is ignored). The `k` centroids start out as samples
//! drawn uniformly with replacement from the working set by a [`Xoroshiro128PlusPlus`]
//! generator with a fixed seed, then go through a fixed number of rounds of:
//! 1. assigning each sample to its nearest centroid by squared Euclidean distance in sRGB,
//!    preferring the lowest index on ties, and
//! 2. moving each centroid to the mean of its samples. Centroids without samples stay put.
//!
//! There is no convergence check, so the same image and `k` always give the same colors.
//! The output colors are in centroid order with each channel truncated to 8 bits
//! and alpha set to opaque.

use crate::{narrow, Bitmap, InvalidArgument};
use log::debug;
use palette::Srgba;
use rand::{
    distributions::{Distribution, Uniform},
    SeedableRng,
};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// The seed used unless [`KmeansOptions::seed`] says otherwise.
pub const DEFAULT_SEED: u64 = 42;

/// A builder struct to specify the parameters for k-means.
///
/// # Examples
/// ```
/// # use gama::kmeans::KmeansOptions;
/// let options = KmeansOptions::new()
///     .iterations(20)
///     .stride(1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmeansOptions {
    /// The seed value for the random number generator.
    seed: u64,
    /// The number of assignment and update rounds.
    iterations: u32,
    /// The distance between sampled rows and columns.
    stride: u32,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: DEFAULT_SEED, iterations: 10, stride: 2 }
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is [`DEFAULT_SEED`].
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of rounds to run.
    ///
    /// The default is `10`.
    #[must_use]
    pub const fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the sampling stride: only every `stride`-th pixel of every `stride`-th row is used.
    ///
    /// The default is `2`. A stride of `0` is treated as `1`.
    #[must_use]
    pub const fn stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }
}

/// Collects the RGB channels of every `stride`-th pixel of every `stride`-th row.
///
/// A `stride` of `0` is treated as `1`.
#[must_use]
pub fn working_set<B: Bitmap + ?Sized>(bitmap: &B, stride: u32) -> Vec<[f64; 3]> {
    let step = stride.max(1) as usize;
    let mut samples = Vec::new();
    for y in (0..bitmap.height()).step_by(step) {
        for x in (0..bitmap.width()).step_by(step) {
            let (r, g, b, _) = narrow(bitmap.at(x, y)).into_components();
            samples.push([r, g, b].map(f64::from));
        }
    }
    samples
}

/// Squared Euclidean distance between two RGB samples.
#[inline]
fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    (0..3).map(|i| (a[i] - b[i]) * (a[i] - b[i])).sum()
}

/// The working set, the centroids, and the current assignment of samples to centroids.
struct State {
    /// The working set.
    samples: Vec<[f64; 3]>,
    /// The current cluster means.
    centroids: Vec<[f64; 3]>,
    /// The index of the centroid each sample is assigned to.
    assignments: Vec<usize>,
}

impl State {
    /// Picks `k` initial centroids uniformly with replacement from `samples`.
    ///
    /// `samples` must not be empty.
    fn new(samples: Vec<[f64; 3]>, k: usize, seed: u64) -> Self {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
        let distribution = Uniform::new(0, samples.len() as u64);

        #[allow(clippy::cast_possible_truncation)]
        let centroids = (0..k)
            .map(|_| samples[distribution.sample(rng) as usize])
            .collect();

        Self {
            assignments: vec![0; samples.len()],
            samples,
            centroids,
        }
    }

    /// Assigns each sample to its nearest centroid, keeping the first one on ties.
    fn assign(&mut self) {
        let Self { samples, centroids, assignments } = self;
        for (sample, assignment) in samples.iter().zip(assignments) {
            let mut min_distance = f64::INFINITY;
            for (i, &centroid) in centroids.iter().enumerate() {
                let d = distance(*sample, centroid);
                if d < min_distance {
                    min_distance = d;
                    *assignment = i;
                }
            }
        }
    }

    /// Moves each centroid to the mean of its assigned samples.
    fn update(&mut self) {
        let Self { samples, centroids, assignments } = self;

        let mut sums = vec![[0.0; 3]; centroids.len()];
        let mut counts = vec![0u32; centroids.len()];
        for (sample, &i) in samples.iter().zip(&*assignments) {
            for (sum, v) in sums[i].iter_mut().zip(sample) {
                *sum += v;
            }
            counts[i] += 1;
        }

        for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
            if count > 0 {
                let n = f64::from(count);
                *centroid = sum.map(|s| s / n);
            }
        }
    }

    /// Truncates the centroids to opaque 8-bit colors.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_colors(self) -> Vec<Srgba<u8>> {
        self.centroids
            .into_iter()
            .map(|[r, g, b]| Srgba::new(r as u8, g as u8, b as u8, u8::MAX))
            .collect()
    }
}

/// Returns the `k` dominant colors of an image using the default [`KmeansOptions`].
///
/// # Errors
/// See [`dominant_colors_with`].
///
/// # Examples
/// ```
/// # use gama::{kmeans, ColorGrid};
/// # use palette::Srgba;
/// # fn main() -> Result<(), gama::InvalidArgument> {
/// let colors = [Srgba::new(10, 20, 30, 255); 4];
/// let grid = ColorGrid::new(&colors, 2, 2)?;
/// assert_eq!(kmeans::dominant_colors(&grid, 1)?, vec![Srgba::new(10, 20, 30, 255)]);
/// # Ok(())
/// # }
/// ```
pub fn dominant_colors<B: Bitmap + ?Sized>(
    bitmap: &B,
    k: u32,
) -> Result<Vec<Srgba<u8>>, InvalidArgument> {
    dominant_colors_with(bitmap, k, KmeansOptions::new())
}

/// Returns the `k` dominant colors of an image, ordered by centroid index.
///
/// # Errors
/// Returns [`InvalidArgument::NonPositiveCount`] if `k` is zero,
/// [`InvalidArgument::EmptyBitmap`] if the image has no pixels,
/// and [`InvalidArgument::CountExceedsSamples`] if `k` is greater than the number of
/// sampled pixels.
pub fn dominant_colors_with<B: Bitmap + ?Sized>(
    bitmap: &B,
    k: u32,
    options: KmeansOptions,
) -> Result<Vec<Srgba<u8>>, InvalidArgument> {
    if k == 0 {
        return Err(InvalidArgument::NonPositiveCount);
    }

    let samples = working_set(bitmap, options.stride);
    if samples.is_empty() {
        return Err(InvalidArgument::EmptyBitmap);
    }
    if k as usize > samples.len() {
        return Err(InvalidArgument::CountExceedsSamples { count: k, samples: samples.len() });
    }

    debug!(
        "clustering {} samples of a {}x{} image into {k} colors over {} rounds",
        samples.len(),
        bitmap.width(),
        bitmap.height(),
        options.iterations,
    );

    let mut state = State::new(samples, k as usize, options.seed);
    for _ in 0..options.iterations {
        state.assign();
        state.update();
    }

    Ok(state.into_colors())
}
