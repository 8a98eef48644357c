mod common;

use common::*;
use image::DynamicImage;
use quadcorners::detection::steps::{CornerFinderStep, CornerMaskStep, LineExtractionStep};
use std::sync::Arc;

fn corner_pipeline() -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(LineExtractionStep::new(small_frame_params())))
        .add_step(Arc::new(CornerFinderStep::default()))
        .add_step(Arc::new(CornerMaskStep))
}

fn assert_square_corners(corners: &CornerSet) {
    let points = corners.points();
    for expected in SQUARE_CORNERS {
        let closest = points
            .iter()
            .map(|p| (p.x, p.y))
            .min_by(|a, b| {
                let da = (a.0 - expected.0).abs() + (a.1 - expected.1).abs();
                let db = (b.0 - expected.0).abs() + (b.1 - expected.1).abs();
                da.total_cmp(&db)
            })
            .unwrap();
        assert_near(closest, expected, 3.0);
    }

    let norms: Vec<f32> = points.iter().map(Point2D::squared_norm).collect();
    assert!(norms.windows(2).all(|w| w[0] <= w[1]), "not radially sorted: {:?}", points);
}

#[test]
fn tilted_square_end_to_end() {
    init_logging();
    let outline = DynamicImage::ImageLuma8(tilted_square_outline());

    let frame = corner_pipeline().run(outline.clone()).unwrap();

    let lines = frame.lines().expect("lines port");
    assert!(lines.len() >= 4, "expected at least 4 lines, got {}", lines.len());
    assert_eq!(frame.lines_drawable().map(|d| d.len()), Some(lines.len()));

    let corners = frame.corners().expect("exactly four corners");
    assert_square_corners(corners);

    let masked = frame.masked_image().expect("masked image").to_luma8();
    let original = outline.to_luma8();
    assert_eq!(masked.dimensions(), original.dimensions());
    for (x, y, pixel) in masked.enumerate_pixels() {
        let d = square_distance(x, y);
        if d <= 37 {
            assert_eq!(pixel, original.get_pixel(x, y), "inside ({x}, {y})");
        } else if d >= 43 {
            assert_eq!(pixel[0], 0, "outside ({x}, {y})");
        }
    }
}

#[test]
fn tilted_square_masks_a_separate_scene() {
    init_logging();
    let outline = DynamicImage::ImageLuma8(tilted_square_outline());
    let scene = DynamicImage::ImageRgb8(gradient_scene(100, 100));

    let detection = QuadDetector::new(small_frame_params())
        .detect(&outline, &scene)
        .unwrap();
    assert_square_corners(detection.corners.as_ref().expect("four corners"));

    let masked = detection.masked.expect("masked image").to_rgb8();
    let scene = scene.to_rgb8();

    let (mut sum_in, mut sum_src_in) = (0u64, 0u64);
    for (x, y, pixel) in masked.enumerate_pixels() {
        let d = square_distance(x, y);
        if d <= 37 {
            sum_in += pixel.0.iter().map(|&c| c as u64).sum::<u64>();
            sum_src_in += scene.get_pixel(x, y).0.iter().map(|&c| c as u64).sum::<u64>();
        } else if d >= 43 {
            assert_eq!(pixel.0, [0, 0, 0], "outside ({x}, {y})");
        }
    }
    assert!(sum_in > 0);
    assert_eq!(sum_in, sum_src_in);
}

#[test]
fn color_frame_is_rejected_without_panicking() {
    init_logging();
    let frame = corner_pipeline()
        .run(DynamicImage::ImageRgb8(gradient_scene(40, 40)))
        .unwrap();

    assert!(!frame.has(Port::Lines));
    assert!(frame.corners().is_none());
    assert!(frame.masked_image().is_none());
}

#[test]
fn color_frame_is_a_precondition_error_for_the_detector() {
    let scene = DynamicImage::ImageRgb8(gradient_scene(40, 40));
    let result = QuadDetector::default().detect(&scene, &scene);
    assert!(matches!(result, Err(QuadError::ChannelCount(3))));
}

#[test]
fn blank_frame_produces_no_corners() {
    let blank = DynamicImage::ImageLuma8(image::GrayImage::new(100, 100));
    let frame = corner_pipeline().run(blank).unwrap();

    assert_eq!(frame.lines().map(|l| l.len()), Some(0));
    assert!(frame.corners().is_none());
    assert!(frame.masked_image().is_none());
}

#[test]
fn frame_loaded_from_disk_runs_through_pipeline() {
    let outline = DynamicImage::ImageLuma8(tilted_square_outline());
    let file = write_test_image(&outline);

    let loaded = image::open(file.path()).expect("readable png");
    assert_eq!(loaded.color().channel_count(), 1);

    let frame = corner_pipeline().run(loaded).unwrap();
    assert_square_corners(frame.corners().expect("four corners"));
}

#[test]
fn standard_pipeline_handles_filled_quadrilateral() {
    init_logging();
    let scene = image::GrayImage::from_fn(120, 120, |x, y| {
        let d = (x as i64 - 60).abs() + (y as i64 - 60).abs();
        image::Luma([if d <= 40 { 220u8 } else { 20u8 }])
    });

    let pipeline = quadcorners::build_standard_pipeline(
        quadcorners::PreprocessOptions::default(),
        small_frame_params(),
        None,
        true,
    );
    assert_eq!(pipeline.len(), 6);

    // Whatever the edge map yields, the run completes and every output is consistent.
    let frame = pipeline.run(DynamicImage::ImageLuma8(scene)).unwrap();
    assert!(frame.has(Port::Lines));
    assert_eq!(frame.corners().is_some(), frame.masked_image().is_some());
    assert_eq!(frame.source.width(), 120);
}

#[test]
fn standard_pipeline_skips_empty_frames() {
    init_logging();
    let pipeline = quadcorners::build_standard_pipeline(
        quadcorners::PreprocessOptions::default(),
        HoughParams::default(),
        None,
        false,
    );

    let frames = [
        DynamicImage::ImageLuma8(image::GrayImage::new(0, 0)),
        DynamicImage::ImageLuma8(image::GrayImage::new(0, 10)),
        DynamicImage::ImageLuma8(image::GrayImage::new(10, 0)),
        DynamicImage::ImageRgb8(image::RgbImage::new(0, 0)),
    ];
    for input in frames {
        let frame = pipeline.run(input).unwrap();
        assert!(!frame.has(Port::Lines));
        assert!(frame.corners().is_none());
        assert!(frame.masked_image().is_none());
    }
}
