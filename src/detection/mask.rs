use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use log::debug;

use crate::models::{CornerSet, Point2D};

const MASK_ON: Luma<u8> = Luma([255]);

/// Rasterize the corner polygon into a `width` x `height` mask (255 inside, 0 outside).
pub fn corner_mask(width: u32, height: u32, corners: &CornerSet) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    let mut polygon: Vec<Point<i32>> = corners.polygon().to_vec();
    polygon.dedup();
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }

    if polygon.len() < 3 {
        debug!("Corner polygon collapsed to {} vertices, mask is empty", polygon.len());
        return mask;
    }

    draw_polygon_mut(&mut mask, &polygon, MASK_ON);
    mask
}

/// Copy of `img` keeping only pixels where `mask` is non-zero; everything else is zero.
pub fn apply_mask(img: &DynamicImage, mask: &GrayImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(copy_masked(buf, mask)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(copy_masked(buf, mask)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(copy_masked(buf, mask)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(copy_masked(buf, mask)),
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(copy_masked(buf, mask)),
        DynamicImage::ImageLumaA16(buf) => DynamicImage::ImageLumaA16(copy_masked(buf, mask)),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(copy_masked(buf, mask)),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(copy_masked(buf, mask)),
        DynamicImage::ImageRgb32F(buf) => DynamicImage::ImageRgb32F(copy_masked(buf, mask)),
        DynamicImage::ImageRgba32F(buf) => DynamicImage::ImageRgba32F(copy_masked(buf, mask)),
        other => DynamicImage::ImageRgba8(copy_masked(&other.to_rgba8(), mask)),
    }
}

fn copy_masked<P: Pixel>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    mask: &GrayImage,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let mut out = ImageBuffer::new(src.width(), src.height());
    for (x, y, pixel) in src.enumerate_pixels() {
        if mask.get_pixel_checked(x, y).is_some_and(|m| m[0] != 0) {
            out.put_pixel(x, y, *pixel);
        }
    }
    out
}

/// Mask `img` to the quadrilateral spanned by `corners`.
///
/// Returns `None` unless exactly four corners are given.
pub fn apply_corner_mask(img: &DynamicImage, corners: &[Point2D]) -> Option<DynamicImage> {
    let corners = CornerSet::try_from(corners).ok()?;
    let mask = corner_mask(img.width(), img.height(), &corners);
    Some(apply_mask(img, &mask))
}
