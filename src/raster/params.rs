//! Parameter types for raster primitives.
//!
//! These structs describe *what* to draw, not *how* to draw it. They are the
//! interface between the HTTP handlers (which decide which file to touch and
//! with which ink) and the [`backend`](super::backend) (which does the actual
//! pixel work). Swapping the backend — e.g. for a recording mock in tests —
//! never changes handler logic.

use super::calculations::CropWindow;
use image::Rgb;
use std::path::PathBuf;

/// A filled circle painted in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscParams {
    /// Image file to edit; the result overwrites this path.
    pub image: PathBuf,
    pub center: (i32, i32),
    pub radius: i32,
    pub ink: Rgb<u8>,
}

/// A stroke between two points painted in place.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeParams {
    pub image: PathBuf,
    pub start: (i32, i32),
    pub end: (i32, i32),
    /// Stroke width in pixels. Widths of one or less draw a hairline.
    pub width: i32,
    pub ink: Rgb<u8>,
}

/// A filled axis-aligned rectangle painted in place.
///
/// The corners may come in any order; both are inside the filled region.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockParams {
    pub image: PathBuf,
    pub corner_a: (i32, i32),
    pub corner_b: (i32, i32),
    pub ink: Rgb<u8>,
}

/// Extraction of a crop window into a new file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub window: CropWindow,
}

/// A tolerance flood fill written to a new file, leaving the source intact.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub seed: (i32, i32),
    /// Per-channel distance from the seed color a pixel may have and still
    /// join the region.
    pub tolerance: u8,
    pub ink: Rgb<u8>,
}
