//! Pure Rust raster backend — zero external dependencies.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode / encode (JPEG, PNG, TIFF, WebP) | `image` crate, format from extension |
//! | Filled circle | `imageproc::drawing::draw_filled_circle_mut` |
//! | Hairline | `imageproc::drawing::draw_line_segment_mut` |
//! | Wide stroke | disc stamps along the segment ([`stroke_stamps`]) |
//! | Filled rectangle | `imageproc::drawing::draw_filled_rect_mut` |
//! | Crop extraction | in-crate bilinear sampling (fractional centers) |
//! | Flood fill | in-crate tolerance fill ([`flood_region`]) |

use super::backend::{Dimensions, RasterBackend, RasterError};
use super::calculations::stroke_stamps;
use super::flood::flood_region;
use super::params::{BlockParams, DiscParams, ExtractParams, FloodParams, StrokeParams};
use image::{ImageReader, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::Path;

/// Production backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct SoftwareRaster;

impl SoftwareRaster {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SoftwareRaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk into an 8-bit RGB buffer.
fn load_image(path: &Path) -> Result<RgbImage, RasterError> {
    let decoded = ImageReader::open(path)
        .map_err(RasterError::Io)?
        .decode()
        .map_err(|source| RasterError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(decoded.into_rgb8())
}

/// Encode a buffer to disk, format inferred from the output extension.
fn save_image(img: &RgbImage, path: &Path) -> Result<(), RasterError> {
    img.save(path).map_err(|source| RasterError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

/// Sample the image at a fractional position with bilinear weights.
///
/// Positions outside the image clamp to the nearest edge pixel, so a crop
/// window hanging past a border replicates that border instead of failing.
fn sample_bilinear(img: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let clamp = |v: i64, max: i64| v.clamp(0, max - 1) as u32;

    let xf = x.floor();
    let yf = y.floor();
    let tx = x - xf;
    let ty = y - yf;

    let x0 = clamp(xf as i64, w);
    let x1 = clamp(xf as i64 + 1, w);
    let y0 = clamp(yf as i64, h);
    let y1 = clamp(yf as i64 + 1, h);

    let p00 = img.get_pixel(x0, y0).0;
    let p10 = img.get_pixel(x1, y0).0;
    let p01 = img.get_pixel(x0, y1).0;
    let p11 = img.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] as f64 * (1.0 - tx) + p10[c] as f64 * tx;
        let bottom = p01[c] as f64 * (1.0 - tx) + p11[c] as f64 * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round() as u8;
    }
    Rgb(out)
}

/// Extract a window centered at a possibly fractional point.
///
/// Patch pixel (0, 0) samples the source at
/// `(center - (extent - 1) / 2)`, so an integer-centered window of odd
/// extent degenerates to a plain pixel copy.
fn extract_window(img: &RgbImage, params: &ExtractParams) -> RgbImage {
    let window = &params.window;
    let left = window.center_x - (window.width as f64 - 1.0) / 2.0;
    let top = window.center_y - (window.height as f64 - 1.0) / 2.0;

    RgbImage::from_fn(window.width, window.height, |col, row| {
        sample_bilinear(img, left + col as f64, top + row as f64)
    })
}

impl RasterBackend for SoftwareRaster {
    fn identify(&self, path: &Path) -> Result<Dimensions, RasterError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|source| RasterError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Dimensions { width, height })
    }

    fn disc(&self, params: &DiscParams) -> Result<(), RasterError> {
        let mut img = load_image(&params.image)?;
        draw_filled_circle_mut(&mut img, params.center, params.radius, params.ink);
        save_image(&img, &params.image)
    }

    fn stroke(&self, params: &StrokeParams) -> Result<(), RasterError> {
        let mut img = load_image(&params.image)?;
        if params.width <= 1 {
            draw_line_segment_mut(
                &mut img,
                (params.start.0 as f32, params.start.1 as f32),
                (params.end.0 as f32, params.end.1 as f32),
                params.ink,
            );
        } else {
            let radius = params.width / 2;
            for center in stroke_stamps(params.start, params.end) {
                draw_filled_circle_mut(&mut img, center, radius, params.ink);
            }
        }
        save_image(&img, &params.image)
    }

    fn block(&self, params: &BlockParams) -> Result<(), RasterError> {
        let mut img = load_image(&params.image)?;

        let x = params.corner_a.0.min(params.corner_b.0);
        let y = params.corner_a.1.min(params.corner_b.1);
        let width = (params.corner_a.0 - params.corner_b.0).unsigned_abs() + 1;
        let height = (params.corner_a.1 - params.corner_b.1).unsigned_abs() + 1;

        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(width, height), params.ink);
        save_image(&img, &params.image)
    }

    fn extract(&self, params: &ExtractParams) -> Result<(), RasterError> {
        let img = load_image(&params.source)?;
        let patch = extract_window(&img, params);
        save_image(&patch, &params.output)
    }

    fn flood(&self, params: &FloodParams) -> Result<(), RasterError> {
        let mut img = load_image(&params.source)?;

        let (x, y) = params.seed;
        if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
            return Err(RasterError::SeedOutOfBounds(x, y));
        }

        flood_region(&mut img, (x as u32, y as u32), params.tolerance, params.ink);
        save_image(&img, &params.output)
    }

    fn transcode(&self, source: &Path, output: &Path) -> Result<(), RasterError> {
        let img = load_image(source)?;
        save_image(&img, output)
    }
}
