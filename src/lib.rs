//! A library for extracting small, representative color palettes from images.
//!
//! `gama` offers two independent ways to summarize an image with a handful of colors:
//! - [`median`]: split the image into horizontal bands and take the per-channel median
//!   color of each band, optionally in parallel over a bounded pool of workers.
//! - [`kmeans`]: subsample the image and run a fixed number of k-means rounds from a
//!   deterministic, seeded initialization to find its dominant colors.
//!
//! Both operate on anything implementing [`Bitmap`], which only needs to report its
//! dimensions and the color of each pixel.
//!
//! # Features
//! To reduce dependencies and compile times, `gama` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes the parallel band reducer via [`rayon`].
//! - `kmeans`: exposes the dominant color clusterer.
//! - `image`: implements [`Bitmap`] for the buffers of the [`image`] crate.
//!
//! # Examples
//! ```no_run
//! # use gama::{kmeans, median, to_hex};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgba8();
//!
//! // One median color per quarter of the image, in band order.
//! let bands = median::quantify_par(&img, 4)?;
//!
//! // Six dominant colors, reproducible across runs.
//! let dominant = kmeans::dominant_colors(&img, 6)?;
//!
//! for color in bands.iter().chain(&dominant) {
//!     println!("{}", to_hex(*color, false));
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod bucket;
mod hex;
mod traits;
mod types;

pub mod median;

#[cfg(feature = "kmeans")]
pub mod kmeans;


pub use bucket::Bucket;
pub use hex::to_hex;
pub use traits::*;
pub use types::*;
