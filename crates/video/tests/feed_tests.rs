use image::{Frame, PixelFormat};
use tokio::time::{Duration, timeout};
use video::{CaptureSurface, Facing, VideoError, feed};

fn gray(value: u8) -> Frame {
    Frame::new(2, 2, vec![value; 12], PixelFormat::Rgb8)
}

#[tokio::test]
async fn test_inactive_feed_is_unavailable() {
    let (sender, mut surface) = feed();
    sender.send(gray(1)).await.unwrap();

    assert!(!surface.is_active());
    assert!(matches!(surface.frame().await, Err(VideoError::Unavailable(_))));
}

#[tokio::test]
async fn test_frame_returns_newest_buffered() {
    let (sender, mut surface) = feed();
    surface.start(Facing::Environment).unwrap();

    sender.send(gray(10)).await.unwrap();
    sender.send(gray(20)).await.unwrap();
    sender.send(gray(30)).await.unwrap();

    let frame = surface.frame().await.unwrap();
    assert_eq!(frame.data[0], 30);
}

#[tokio::test]
async fn test_frame_waits_for_next_frame() {
    let (sender, mut surface) = feed();
    surface.start(Facing::User).unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        sender.send(gray(77)).await.unwrap();
    });

    let frame = timeout(Duration::from_secs(5), surface.frame())
        .await
        .expect("frame timed out")
        .unwrap();
    assert_eq!(frame.data[0], 77);
}

#[tokio::test]
async fn test_start_discards_stale_frames() {
    let (sender, mut surface) = feed();
    sender.send(gray(1)).await.unwrap();

    surface.start(Facing::Environment).unwrap();
    sender.send(gray(2)).await.unwrap();

    assert_eq!(surface.frame().await.unwrap().data[0], 2);
    assert_eq!(surface.facing(), Some(Facing::Environment));
}

#[tokio::test]
async fn test_offer_drops_when_full() {
    let (sender, _surface) = feed();

    let mut accepted = 0;
    for i in 0..10 {
        if sender.offer(gray(i)).unwrap() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 4);
}

#[tokio::test]
async fn test_closed_feed_reports_stream_error() {
    let (sender, mut surface) = feed();
    surface.start(Facing::Environment).unwrap();
    drop(sender);

    assert!(matches!(surface.frame().await, Err(VideoError::Stream(_))));
}

#[tokio::test]
async fn test_stop_then_frame_is_unavailable() {
    let (sender, mut surface) = feed();
    surface.start(Facing::Environment).unwrap();
    sender.send(gray(5)).await.unwrap();

    surface.stop();

    assert!(!surface.is_active());
    assert!(matches!(surface.frame().await, Err(VideoError::Unavailable(_))));
}

#[tokio::test]
async fn test_frame_repeats_current_without_new_push() {
    let (sender, mut surface) = feed();
    surface.start(Facing::Environment).unwrap();
    sender.send(gray(42)).await.unwrap();

    let first = surface.frame().await.unwrap();
    let second = timeout(Duration::from_secs(1), surface.frame())
        .await
        .expect("second frame blocked")
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.data[0], 42);

    sender.send(gray(43)).await.unwrap();
    assert_eq!(surface.frame().await.unwrap().data[0], 43);
}

#[tokio::test]
async fn test_silent_camera_is_unavailable() {
    let (_sender, surface) = feed();
    let mut surface = surface.with_frame_timeout(Duration::from_millis(50));
    surface.start(Facing::User).unwrap();

    let result = timeout(Duration::from_secs(5), surface.frame())
        .await
        .expect("frame wait was not bounded");
    assert!(matches!(result, Err(VideoError::Unavailable(_))));
}

#[tokio::test]
async fn test_restart_forgets_current_frame() {
    let (sender, surface) = feed();
    let mut surface = surface.with_frame_timeout(Duration::from_millis(50));
    surface.start(Facing::Environment).unwrap();
    sender.send(gray(9)).await.unwrap();
    assert_eq!(surface.frame().await.unwrap().data[0], 9);

    surface.stop();
    surface.start(Facing::User).unwrap();

    assert!(matches!(surface.frame().await, Err(VideoError::Unavailable(_))));
}
