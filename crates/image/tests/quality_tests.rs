use image::{Frame, PixelFormat, QualityScore, RgbFrame, evaluate};

#[test]
fn test_mid_gray_frame() {
    let frame = RgbFrame::filled(32, 24, [128, 128, 128]);

    let score = evaluate(&frame);

    assert_eq!(score.brightness, 128.0);
    assert_eq!(score.sharpness, 0.0);
    assert_eq!(score.to_string(), "Brightness: 128.00  Sharpness: 0.00");
}

#[test]
fn test_brightness_averages_channels() {
    // channel averages: 10, 20
    let frame = RgbFrame::new(2, 1, vec![0, 10, 20, 20, 20, 20]).unwrap();

    let score = evaluate(&frame);

    assert_eq!(score.brightness, 15.0);
    assert_eq!(score.sharpness, 10.0);
}

#[test]
fn test_sharpness_follows_scan_order() {
    // alternating black and white along the scan line, 3 differences of 255
    let data = [[0u8; 3], [255; 3], [0; 3], [255; 3]].concat();
    let frame = RgbFrame::new(2, 2, data).unwrap();

    let score = evaluate(&frame);

    assert_eq!(score.brightness, 127.5);
    assert_eq!(score.sharpness, 255.0);
}

#[test]
fn test_two_decimal_rounding() {
    // averages 0, 1/3, 0 -> brightness 1/9, sharpness 1/3
    let frame = RgbFrame::new(3, 1, vec![0, 0, 0, 1, 0, 0, 0, 0, 0]).unwrap();

    let score = evaluate(&frame);

    assert_eq!(score.brightness, 0.11);
    assert_eq!(score.sharpness, 0.33);
}

#[test]
fn test_single_pixel_has_no_sharpness() {
    let frame = RgbFrame::filled(1, 1, [90, 60, 30]);

    let score = evaluate(&frame);

    assert_eq!(score.brightness, 60.0);
    assert_eq!(score.sharpness, 0.0);
}

#[test]
fn test_empty_frame_scores_zero() {
    let frame = RgbFrame::new(0, 0, Vec::new()).unwrap();
    assert_eq!(
        evaluate(&frame),
        QualityScore {
            brightness: 0.0,
            sharpness: 0.0
        }
    );
}

#[test]
fn test_deterministic_and_non_negative() {
    let data: Vec<u8> = (0..(17 * 13 * 3)).map(|i| ((i * 37 + 11) % 256) as u8).collect();
    let frame = RgbFrame::new(17, 13, data).unwrap();

    let first = evaluate(&frame);
    let second = evaluate(&frame);

    assert_eq!(first, second);
    assert!(first.brightness >= 0.0);
    assert!(first.sharpness >= 0.0);
}

#[test]
fn test_scoring_leaves_source_frame_untouched() {
    let data: Vec<u8> = (0..(4 * 4 * 2)).map(|i| (i * 5) as u8).collect();
    let frame = Frame::new(4, 4, data, PixelFormat::Yuyv);
    let before = frame.clone();

    let rgb = frame.to_rgb().unwrap();
    let _ = evaluate(&rgb);

    assert_eq!(frame, before);
}
