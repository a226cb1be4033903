//! Tolerance flood fill.
//!
//! `imageproc` ships no region-growing fill, so this is the one pixel
//! algorithm implemented in-crate: a stack-based 4-connected fill over a
//! visited mask, with a per-channel tolerance measured against the seed
//! pixel's color. Uniform areas fill wall to wall; a stroke in a
//! sufficiently different color stops the region.

use image::{Rgb, RgbImage};

/// Grow a region from `seed` and paint it with `ink`.
///
/// A pixel joins the region when it is 4-connected to a member and each of
/// its channels is within `tolerance` of the seed pixel's channel. The seed
/// must be inside the image. Returns the number of pixels painted (at least
/// one — the seed always matches itself).
pub fn flood_region(img: &mut RgbImage, seed: (u32, u32), tolerance: u8, ink: Rgb<u8>) -> usize {
    let (width, height) = img.dimensions();
    debug_assert!(seed.0 < width && seed.1 < height);

    let w = width as usize;
    let seed_color = *img.get_pixel(seed.0, seed.1);

    let matches = |pixel: &Rgb<u8>| {
        pixel
            .0
            .iter()
            .zip(seed_color.0.iter())
            .all(|(&c, &s)| c.abs_diff(s) <= tolerance)
    };

    // The mask doubles as the visited set and keeps the fill correct when
    // the ink itself is within tolerance of the seed color.
    let mut visited = vec![false; w * height as usize];
    let mut stack = Vec::with_capacity(1024);

    let seed_idx = seed.1 as usize * w + seed.0 as usize;
    visited[seed_idx] = true;
    stack.push(seed);

    let mut painted = 0usize;
    while let Some((x, y)) = stack.pop() {
        img.put_pixel(x, y, ink);
        painted += 1;

        let mut visit = |nx: u32, ny: u32, stack: &mut Vec<(u32, u32)>| {
            let idx = ny as usize * w + nx as usize;
            if !visited[idx] && matches(img.get_pixel(nx, ny)) {
                visited[idx] = true;
                stack.push((nx, ny));
            }
        };

        if x > 0 {
            visit(x - 1, y, &mut stack);
        }
        if x + 1 < width {
            visit(x + 1, y, &mut stack);
        }
        if y > 0 {
            visit(x, y - 1, &mut stack);
        }
        if y + 1 < height {
            visit(x, y + 1, &mut stack);
        }
    }
    painted
}
