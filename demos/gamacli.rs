#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gama::{
    kmeans::{self, KmeansOptions},
    median::{self, BandOrder, MedianOptions},
    to_hex,
};
use image::{Rgba, RgbaImage};
use palette::Srgba;

#[derive(Copy, Clone, ValueEnum)]
enum CliBandOrder {
    Index,
    Completion,
}

impl From<CliBandOrder> for BandOrder {
    fn from(value: CliBandOrder) -> Self {
        match value {
            CliBandOrder::Index => BandOrder::Index,
            CliBandOrder::Completion => BandOrder::Completion,
        }
    }
}

#[derive(Parser)]
pub struct Options {
    /// Number of horizontal bands to take the median of.
    #[arg(short, long, default_value_t = 1)]
    bands: u32,

    /// Number of dominant colors to find.
    #[arg(short, long, default_value_t = 6)]
    k: u32,

    #[arg(long, value_enum, default_value_t = CliBandOrder::Index)]
    order: CliBandOrder,

    /// Maximum number of bands reduced at once; 0 uses all cores.
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    #[arg(long, default_value_t = kmeans::DEFAULT_SEED)]
    seed: u64,

    #[arg(long)]
    alpha: bool,

    /// Writes the dominant colors as a strip of swatches to this path.
    #[arg(long)]
    swatch: Option<PathBuf>,

    input: PathBuf,
}

fn main() {
    env_logger::init();

    let Options {
        bands,
        k,
        order,
        threads,
        seed,
        alpha,
        swatch,
        input,
    } = Options::parse();

    let image = image::open(input).unwrap();

    let options = MedianOptions::new().order(order.into()).threads(threads);
    let medians = median::quantify_par_with(&image, bands, options).unwrap();

    println!("band medians:");
    for color in &medians {
        println!("  {}", to_hex(*color, alpha));
    }

    let dominant =
        kmeans::dominant_colors_with(&image, k, KmeansOptions::new().seed(seed)).unwrap();

    println!("dominant colors:");
    for color in &dominant {
        println!("  {}", to_hex(*color, alpha));
    }

    if let Some(path) = swatch {
        swatch_strip(&dominant, 64).save(path).unwrap();
    }
}

/// Lays the colors out left to right as `size` by `size` squares.
fn swatch_strip(colors: &[Srgba<u8>], size: u32) -> RgbaImage {
    #[allow(clippy::cast_possible_truncation)]
    let width = colors.len() as u32 * size;
    RgbaImage::from_fn(width, size, |x, _| {
        let (r, g, b, a) = colors[(x / size) as usize].into_components();
        Rgba([r, g, b, a])
    })
}
