//! Raster primitives — decode, edit, encode.
//!
//! | Primitive | Used by | Implementation |
//! |---|---|---|
//! | **Disc** | `/pencil_point`, `/eraser_click` | `imageproc` filled circle |
//! | **Stroke** | `/pencil_line`, `/eraser_line` | hairline or disc stamps |
//! | **Block** | `/draw_square`, `/eraser_square` | `imageproc` filled rect |
//! | **Extract** | `/cut_out` | bilinear sub-pixel window |
//! | **Flood** | `/fillArea` | in-crate tolerance fill |
//! | **Transcode** | `/copyCutImage` | decode + re-encode |
//!
//! The module is split into:
//! - **Calculations**: pure geometry (unit testable without pixels)
//! - **Params**: data structures describing each primitive
//! - **Backend**: [`RasterBackend`] trait + [`SoftwareRaster`]
//! - **Flood**: the one pixel algorithm not covered by `imageproc`

pub mod backend;
pub mod calculations;
mod flood;
pub mod params;
pub mod software;

pub use backend::{Dimensions, RasterBackend, RasterError};
pub use calculations::{crop_window, stroke_stamps, truncate_point, CropWindow};
pub use params::{BlockParams, DiscParams, ExtractParams, FloodParams, StrokeParams};
pub use software::SoftwareRaster;

use image::Rgb;

/// Ink for pencil edits.
pub const MARK: Rgb<u8> = Rgb([0, 0, 0]);

/// Ink for eraser edits — the assumed background color.
pub const ERASE: Rgb<u8> = Rgb([255, 255, 255]);

/// Ink for flood-fill highlights.
pub const HIGHLIGHT: Rgb<u8> = Rgb([255, 0, 0]);

/// Per-channel tolerance for flood-fill region growth.
pub const FILL_TOLERANCE: u8 = 10;
