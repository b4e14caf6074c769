use com::{ClassificationResult, ComError};
use image::QualityScore;
use queue::{DrainFailure, DrainReport};
use screening::{CaptureReport, Outcome, ScreeningError, render_capture, render_drain, render_result};
use std::time::Duration;

#[test]
fn test_distribution_lists_every_stage() {
    let result =
        ClassificationResult::parse(br#"{"probabilities":[0.02,0.08,0.87,0.02,0.01]}"#).unwrap();

    let text = render_result(&result);

    assert!(text.starts_with("Predicted Stage: Moderate (2)\nConfidence: 87.00%\n"));
    assert!(text.contains("  No DR (0): 2.00%"));
    assert!(text.contains("  Proliferative DR (4): 1.00%"));
}

#[test]
fn test_label_and_conditions() {
    let label = ClassificationResult::label("Normal", 0.91).unwrap();
    assert_eq!(render_result(&label), "Predicted: Normal\nConfidence: 91.00%\n");

    let flags = ClassificationResult::parse(br#"{"has_dr": false, "dr_confidence": 0.2}"#).unwrap();
    assert_eq!(render_result(&flags), "dr: not detected\nConfidence: 20.00%\n");
}

#[test]
fn test_capture_outcomes() {
    let queued = CaptureReport {
        quality: Some(QualityScore {
            brightness: 128.0,
            sharpness: 0.0,
        }),
        outcome: Outcome::QueuedOffline {
            key: "pending-1-0".to_string(),
            reason: ScreeningError::Timeout(Duration::from_secs(10)),
        },
    };
    let text = render_capture(&queued);
    assert!(text.starts_with("Brightness: 128.00  Sharpness: 0.00\n"));
    assert!(text.contains("Saved offline as pending-1-0"));

    let failed = CaptureReport {
        quality: None,
        outcome: Outcome::Failed(ScreeningError::DeviceUnavailable("camera is off".to_string())),
    };
    assert_eq!(
        render_capture(&failed),
        "Capture failed: camera unavailable: camera is off\n"
    );
}

#[test]
fn test_drain_summary() {
    assert_eq!(
        render_drain(&DrainReport::default()),
        "Nothing was waiting to be sent.\n"
    );

    let report = DrainReport {
        delivered: vec![(
            "pending-1-0".to_string(),
            ClassificationResult::label("Normal", 0.91).unwrap(),
        )],
        undelivered: vec![(
            "pending-2-1".to_string(),
            DrainFailure::Classifier(ComError::Transport("connection refused".to_string())),
        )],
    };
    let text = render_drain(&report);
    assert!(text.starts_with("Sent 1 queued capture(s), 1 still waiting.\n"));
    assert!(text.contains("pending-1-0:\n  Predicted: Normal\n  Confidence: 91.00%\n"));
    assert!(text.contains("pending-2-1: still queued (transport error: connection refused)"));
}
