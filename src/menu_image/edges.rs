use image::{imageops, GrayImage, Luma};

use super::DetectionParams;

const EDGE: Luma<u8> = Luma([u8::MAX]);

/// Binary mask (0 or 255) of the strong edges in `gray`, grown by `dilate_radius` so that the
/// strokes of neighbouring glyphs touch.
pub(super) fn edge_mask(gray: &GrayImage, params: &DetectionParams) -> GrayImage {
    let blurred = if params.blur_sigma > 0.0 {
        imageops::blur(gray, params.blur_sigma)
    } else {
        gray.clone()
    };
    let magnitude = sobel_magnitude(&blurred);
    let mut mask = GrayImage::new(magnitude.width(), magnitude.height());
    for (x, y, pixel) in magnitude.enumerate_pixels() {
        if pixel.0[0] >= params.edge_threshold {
            mask.put_pixel(x, y, EDGE);
        }
    }
    dilate(&mask, params.dilate_radius)
}

/// `(|gx| + |gy|) / 4` of the 3x3 Sobel operator, so a hard black/white step maps to 255.
/// The one pixel border is left at zero.
pub(super) fn sobel_magnitude(image: &GrayImage) -> GrayImage {
    let (w, h) = image.dimensions();
    let mut out = GrayImage::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }
    let px = |x: u32, y: u32| i32::from(image.get_pixel(x, y).0[0]);
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let gx = (px(x + 1, y - 1) + 2 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x - 1, y) + px(x - 1, y + 1));
            let gy = (px(x - 1, y + 1) + 2 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x, y - 1) + px(x + 1, y - 1));
            let magnitude = (gx.abs() + gy.abs()) / 4;
            out.put_pixel(x, y, Luma([u8::try_from(magnitude).unwrap_or(u8::MAX)]));
        }
    }
    out
}

/// Square dilation, done as a horizontal then a vertical max pass.
fn dilate(mask: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return mask.clone();
    }
    let (w, h) = mask.dimensions();
    let mut horizontal = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let lo = x.saturating_sub(radius);
            let hi = x.saturating_add(radius).min(w - 1);
            if (lo..=hi).any(|i| mask.get_pixel(i, y).0[0] > 0) {
                horizontal.put_pixel(x, y, EDGE);
            }
        }
    }
    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        let lo = y.saturating_sub(radius);
        let hi = y.saturating_add(radius).min(h - 1);
        for x in 0..w {
            if (lo..=hi).any(|j| horizontal.get_pixel(x, j).0[0] > 0) {
                out.put_pixel(x, y, EDGE);
            }
        }
    }
    out
}
