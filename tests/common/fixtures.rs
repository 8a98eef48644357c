use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use quadcorners::HoughParams;
use tempfile::NamedTempFile;

/// Corners of the tilted square drawn by [`tilted_square_outline`], clockwise from the top.
pub const SQUARE_CORNERS: [(f32, f32); 4] = [(50.0, 10.0), (90.0, 50.0), (50.0, 90.0), (10.0, 50.0)];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 100x100 black image with the outline of a square rotated by 45 degrees in white.
pub fn tilted_square_outline() -> GrayImage {
    let mut img = GrayImage::new(100, 100);
    for i in 0..4 {
        let a = SQUARE_CORNERS[i];
        let b = SQUARE_CORNERS[(i + 1) % 4];
        draw_line_segment_mut(&mut img, a, b, Luma([255u8]));
    }
    img
}

/// Manhattan distance from the square's center; the outline sits at 40.
pub fn square_distance(x: u32, y: u32) -> i64 {
    (x as i64 - 50).abs() + (y as i64 - 50).abs()
}

/// Color scene with no zero pixels, used as the image to be masked.
pub fn gradient_scene(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 250) as u8 + 5, (y % 250) as u8 + 5, ((x + y) % 250) as u8 + 5])
    })
}

/// Detector settings sized for the 100x100 fixtures.
pub fn small_frame_params() -> HoughParams {
    HoughParams::new(20, 20, 5).expect("valid parameters")
}

/// Writes the image to a temporary PNG; the file is removed when dropped.
pub fn write_test_image(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

pub fn assert_near(actual: (f32, f32), expected: (f32, f32), tolerance: f32) {
    assert!(
        (actual.0 - expected.0).abs() <= tolerance && (actual.1 - expected.1).abs() <= tolerance,
        "expected {:?} within {}, got {:?}",
        expected,
        tolerance,
        actual
    );
}
