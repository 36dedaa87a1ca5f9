use image::GrayImage;

use super::Rect;

/// Bounding boxes of the 8-connected components of the non-zero pixels in `mask`.
pub(super) fn bounding_boxes(mask: &GrayImage) -> Vec<Rect> {
    let (w, h) = mask.dimensions();
    let index = |x: u32, y: u32| (y as usize) * (w as usize) + x as usize;
    let mut seen = vec![false; (w as usize) * (h as usize)];
    let mut boxes = Vec::new();
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if seen[index(x, y)] || mask.get_pixel(x, y).0[0] == 0 {
                continue;
            }
            seen[index(x, y)] = true;
            stack.push((x, y));
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
            while let Some((cx, cy)) = stack.pop() {
                min_x = min_x.min(cx);
                min_y = min_y.min(cy);
                max_x = max_x.max(cx);
                max_y = max_y.max(cy);
                for ny in cy.saturating_sub(1)..=(cy + 1).min(h - 1) {
                    for nx in cx.saturating_sub(1)..=(cx + 1).min(w - 1) {
                        let i = index(nx, ny);
                        if !seen[i] && mask.get_pixel(nx, ny).0[0] > 0 {
                            seen[i] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
            boxes.push(Rect {
                x: min_x,
                y: min_y,
                w: max_x - min_x + 1,
                h: max_y - min_y + 1,
            });
        }
    }
    boxes
}

/// Merges boxes that overlap or are at most `gap` pixels apart until no pair qualifies.
pub(super) fn merge_nearby(regions: &mut Vec<Rect>, gap: u32) {
    let mut merged = true;
    while merged {
        merged = false;
        let mut i = 0;
        while i < regions.len() {
            let mut j = i + 1;
            while j < regions.len() {
                if regions[i].is_near(&regions[j], gap) {
                    let other = regions.remove(j);
                    regions[i] = regions[i].union(&other);
                    merged = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }
}
