//! Turning an encoded image into the RGBA grid the quantizer consumes.

use image::{DynamicImage, GenericImageView, imageops::FilterType};

use crate::error::{Error, Result};

/// An RGBA8 buffer of exactly `width * height` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Height that keeps the source aspect ratio for a target width.
pub fn height_for_width(src_width: u32, src_height: u32, width: u32) -> u32 {
    if src_width == 0 {
        return width.max(1);
    }
    let ratio = src_height as f64 / src_width as f64;
    ((width as f64 * ratio).round() as u32).max(1)
}

/// Decode an image and resize it to a `width` x `height` grid.
///
/// When `height` is `None` it follows the source aspect ratio.
pub fn image_to_grid(input: &[u8], width: u32, height: Option<u32>) -> Result<Grid> {
    let img = image::load_from_memory(input)?;
    let (src_w, src_h) = img.dimensions();
    let height = height.unwrap_or_else(|| height_for_width(src_w, src_h, width));
    resize_to_grid(&img, width, height)
}

/// Nearest-neighbour resize, so bead cells never blend neighbouring colors.
pub fn resize_to_grid(img: &DynamicImage, width: u32, height: u32) -> Result<Grid> {
    if width == 0 || height == 0 {
        return Err(Error::ZeroDimension { width, height });
    }

    let (in_w, in_h) = img.dimensions();
    let pixels = if in_w == width && in_h == height {
        img.to_rgba8().into_raw()
    } else {
        image::imageops::resize(img, width, height, FilterType::Nearest).into_raw()
    };

    tracing::debug!(from_w = in_w, from_h = in_h, width, height, "resized image to grid");
    Ok(Grid {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn checkerboard(w: u32, h: u32, cell: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_height_for_width() {
        assert_eq!(height_for_width(200, 100, 50), 25);
        assert_eq!(height_for_width(100, 300, 10), 30);
        assert_eq!(height_for_width(1000, 1, 10), 1);
        assert_eq!(height_for_width(3, 2, 29), 19);
    }

    #[test]
    fn test_resize_keeps_hard_edges() {
        let img = DynamicImage::ImageRgba8(checkerboard(40, 40, 10));
        let grid = resize_to_grid(&img, 4, 4).unwrap();
        assert_eq!(grid.pixels.len(), 4 * 4 * 4);
        for px in grid.pixels.chunks_exact(4) {
            assert!(px[..3] == [0, 0, 0] || px[..3] == [255, 255, 255]);
        }
        assert_eq!(&grid.pixels[..4], &[0, 0, 0, 255]);
        assert_eq!(&grid.pixels[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_image_to_grid_decodes_png() {
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(checkerboard(20, 10, 5))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let grid = image_to_grid(&png, 8, None).unwrap();
        assert_eq!((grid.width, grid.height), (8, 4));
        assert_eq!(grid.pixels.len(), 8 * 4 * 4);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(image_to_grid(b"not an image", 4, Some(4)), Err(Error::Image(_))));
        let img = DynamicImage::ImageRgba8(checkerboard(4, 4, 1));
        assert!(matches!(resize_to_grid(&img, 0, 4), Err(Error::ZeroDimension { .. })));
    }
}
