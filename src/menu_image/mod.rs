//! Finds the blocks of text on a photographed or rendered menu.
//!
//! This only locates candidate regions (edge detection, dilation and connected components);
//! reading the text inside them is left to whoever looks at the dumped crops.
mod edges;
mod regions;

use std::path::Path;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use serde::Serialize;

/// An axis-aligned box in pixel coordinates. `x + w` and `y + h` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn right(&self) -> u32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub const fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    fn is_near(&self, other: &Self, gap: u32) -> bool {
        self.x <= other.right().saturating_add(gap)
            && other.x <= self.right().saturating_add(gap)
            && self.y <= other.bottom().saturating_add(gap)
            && other.y <= self.bottom().saturating_add(gap)
    }

    fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Knobs of the region detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    /// Gaussian blur applied before edge detection; `0.0` disables it.
    pub blur_sigma: f32,
    pub edge_threshold: u8,
    pub dilate_radius: u32,
    /// Regions with a smaller area (in pixels) are dropped.
    pub min_area: u64,
    pub merge_gap: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            edge_threshold: 60,
            dilate_radius: 2,
            min_area: 400,
            merge_gap: 4,
        }
    }
}

/// Candidate text regions of `image`, top to bottom and then left to right.
pub fn detect_regions(image: &DynamicImage, params: &DetectionParams) -> Vec<Rect> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let mask = edges::edge_mask(&image.to_luma8(), params);
    let mut found = regions::bounding_boxes(&mask);
    regions::merge_nearby(&mut found, params.merge_gap);
    found.retain(|r| r.area() >= params.min_area);
    found.sort_by_key(|r| (r.y, r.x));
    found
}

pub fn crop_regions(image: &DynamicImage, regions: &[Rect]) -> Vec<DynamicImage> {
    regions
        .iter()
        .map(|r| image.crop_imm(r.x, r.y, r.w, r.h))
        .collect()
}

/// Copy of `image` with every region outlined in red.
pub fn annotate(image: &DynamicImage, regions: &[Rect]) -> RgbImage {
    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    let mut out = image.to_rgb8();
    let (w, h) = out.dimensions();
    for r in regions.iter().filter(|r| r.x < w && r.y < h) {
        let right = r.right().min(w).saturating_sub(1);
        let bottom = r.bottom().min(h).saturating_sub(1);
        for x in r.x..=right {
            out.put_pixel(x, r.y, RED);
            out.put_pixel(x, bottom, RED);
        }
        for y in r.y..=bottom {
            out.put_pixel(r.x, y, RED);
            out.put_pixel(right, y, RED);
        }
    }
    out
}

/// A decoded menu image together with the regions found on it.
#[derive(Debug)]
pub struct MenuImage {
    image: DynamicImage,
    regions: Vec<Rect>,
}

impl MenuImage {
    pub fn decode(bytes: &[u8], params: &DetectionParams) -> crate::Result<Self> {
        let image = image::load_from_memory(bytes)?;
        let regions = detect_regions(&image, params);
        Ok(Self { image, regions })
    }

    /// Decodes and analyses the image on the blocking pool, then writes the debug output to
    /// `dump_dir` if given.
    pub async fn inspect(
        bytes: Vec<u8>,
        params: &DetectionParams,
        dump_dir: Option<&Path>,
    ) -> crate::Result<Self> {
        let params = params.clone();
        let menu_image =
            tokio::task::spawn_blocking(move || Self::decode(&bytes, &params)).await??;
        let (w, h) = menu_image.image.dimensions();
        log::info!(
            "Found {} candidate regions on the {w}x{h} menu image",
            menu_image.regions.len()
        );
        for r in &menu_image.regions {
            log::debug!("Region at ({}, {}) size {}x{}", r.x, r.y, r.w, r.h);
        }
        if let Some(dir) = dump_dir {
            menu_image.dump(dir).await?;
        }
        Ok(menu_image)
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// Writes `annotated.png`, one `region_NN.png` per region and `regions.json`.
    pub async fn dump(&self, dir: &Path) -> crate::Result<()> {
        tokio::fs::create_dir_all(dir).await?;
        annotate(&self.image, &self.regions).save(dir.join("annotated.png"))?;
        for (i, crop) in crop_regions(&self.image, &self.regions).iter().enumerate() {
            crop.save(dir.join(format!("region_{i:02}.png")))?;
        }
        let json = serde_json::to_vec_pretty(&self.regions)?;
        tokio::fs::write(dir.join("regions.json"), json).await?;
        log::info!("Wrote menu image debug output to {}", dir.display());
        Ok(())
    }
}
