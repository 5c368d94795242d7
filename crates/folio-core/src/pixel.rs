//! Pixel-art portrait: box-average an image down to a small grid
//!
//! The terminal draws two grid rows per text row with the upper half block,
//! so `PixelArt` exposes rows in pairs.

use std::time::Duration;

use anyhow::{anyhow, Result};
use image::{DynamicImage, RgbaImage};
use reqwest::Client;
use tracing::debug;

/// Grid width the portrait is reduced to
pub const PIXEL_ART_WIDTH: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelArt {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl PixelArt {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// (top, bottom) colour pairs for each text row; an odd last row has no bottom
    pub fn half_block_rows(&self) -> Vec<Vec<([u8; 3], Option<[u8; 3]>)>> {
        (0..self.height)
            .step_by(2)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let top = self.pixel(x, y).unwrap_or([0, 0, 0]);
                        (top, self.pixel(x, y + 1))
                    })
                    .collect()
            })
            .collect()
    }
}

/// Reduce `img` to `target_width` columns, keeping the aspect ratio. The
/// height is truncated like a canvas dimension would be, but never below 1.
/// Every output pixel is the mean colour of the source block it covers.
pub fn pixelate(img: &RgbaImage, target_width: u32) -> Result<PixelArt> {
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(anyhow!("cannot pixelate an empty image"));
    }
    if target_width == 0 {
        return Err(anyhow!("target width must be positive"));
    }

    let width = target_width;
    let height = ((target_width as u64 * src_h as u64 / src_w as u64) as u32).max(1);

    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        let (y0, y1) = block_span(y, height, src_h);
        for x in 0..width {
            let (x0, x1) = block_span(x, width, src_w);
            pixels.push(block_average(img, x0, x1, y0, y1));
        }
    }

    Ok(PixelArt { width, height, pixels })
}

/// Source range [start, end) covered by output cell `i` of `out`
fn block_span(i: u32, out: u32, src: u32) -> (u32, u32) {
    let start = (i as u64 * src as u64 / out as u64) as u32;
    let end = ((i as u64 + 1) * src as u64 / out as u64) as u32;
    // Upscaling maps several cells onto one source pixel
    (start.min(src - 1), end.max(start + 1).min(src))
}

fn block_average(img: &RgbaImage, x0: u32, x1: u32, y0: u32, y1: u32) -> [u8; 3] {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = img.get_pixel(x, y).0;
            sum[0] += p[0] as u64;
            sum[1] += p[1] as u64;
            sum[2] += p[2] as u64;
            count += 1;
        }
    }
    if count == 0 {
        return [0, 0, 0];
    }
    [
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    ]
}

/// Download and decode an image
pub async fn fetch_image(url: &str) -> Result<DynamicImage> {
    let response = Client::new()
        .get(url)
        .timeout(Duration::from_secs(15))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("Portrait request failed with status: {}", response.status()));
    }

    let bytes = response.bytes().await?;
    debug!(bytes = bytes.len(), "portrait downloaded");

    image::load_from_memory(&bytes).map_err(|e| anyhow!("Failed to decode portrait: {}", e))
}

/// Download and decode an image, then pixelate it
pub async fn fetch_pixel_portrait(url: &str, target_width: u32) -> Result<PixelArt> {
    let img = fetch_image(url).await?.to_rgba8();
    pixelate(&img, target_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn test_output_dimensions_follow_aspect() {
        let art = pixelate(&solid(640, 480, [1, 2, 3]), 64).unwrap();
        assert_eq!(art.width(), 64);
        assert_eq!(art.height(), 48);

        // 64 / (300/200) = 42.67, truncated
        let art = pixelate(&solid(300, 200, [1, 2, 3]), 64).unwrap();
        assert_eq!(art.height(), 42);
    }

    #[test]
    fn test_very_wide_image_keeps_one_row() {
        let art = pixelate(&solid(1000, 5, [9, 9, 9]), 64).unwrap();
        assert_eq!(art.height(), 1);
    }

    #[test]
    fn test_block_average() {
        // Left half black, right half white; 2 output columns
        let mut img = solid(4, 2, [0, 0, 0]);
        for y in 0..2 {
            for x in 2..4 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let art = pixelate(&img, 2).unwrap();
        assert_eq!(art.height(), 1);
        assert_eq!(art.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(art.pixel(1, 0), Some([255, 255, 255]));

        // One column averages everything
        let art = pixelate(&img, 1).unwrap();
        assert_eq!(art.pixel(0, 0), Some([127, 127, 127]));
    }

    #[test]
    fn test_upscale_small_source() {
        let art = pixelate(&solid(2, 2, [10, 20, 30]), 8).unwrap();
        assert_eq!((art.width(), art.height()), (8, 8));
        assert_eq!(art.pixel(7, 7), Some([10, 20, 30]));
    }

    #[test]
    fn test_half_block_rows() {
        let art = pixelate(&solid(4, 3, [5, 5, 5]), 4).unwrap();
        assert_eq!(art.height(), 3);
        let rows = art.half_block_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].iter().all(|(_, bottom)| bottom.is_some()));
        assert!(rows[1].iter().all(|(_, bottom)| bottom.is_none()));
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(pixelate(&RgbaImage::new(0, 0), 64).is_err());
        assert!(pixelate(&solid(2, 2, [0, 0, 0]), 0).is_err());
    }
}
