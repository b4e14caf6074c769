//! Text rendering of capture and drain results.

use {
    crate::*,
    com::{ClassificationResult, ResultKind},
    queue::DrainReport,
    std::fmt::Write,
};

/// Lines describing a classification.
pub fn render_result(result: &ClassificationResult) -> String {
    let top = result.top();
    let mut text = String::new();
    match result.kind() {
        ResultKind::Distribution => {
            let _ = writeln!(text, "Predicted Stage: {}", top.label);
            let _ = writeln!(text, "Confidence: {}", result.confidence_percent());
            for prediction in result.predictions() {
                let _ = writeln!(
                    text,
                    "  {}: {:.2}%",
                    prediction.label,
                    prediction.confidence * 100.0
                );
            }
        }
        ResultKind::Conditions => {
            for prediction in result.predictions() {
                let detected = if prediction.detected == Some(true) {
                    "detected"
                } else {
                    "not detected"
                };
                let _ = writeln!(text, "{}: {}", prediction.label, detected);
            }
            let _ = writeln!(text, "Confidence: {}", result.confidence_percent());
        }
        ResultKind::Label => {
            let _ = writeln!(text, "Predicted: {}", top.label);
            let _ = writeln!(text, "Confidence: {}", result.confidence_percent());
        }
    }
    text
}

pub fn render_capture(report: &CaptureReport) -> String {
    let mut text = String::new();
    if let Some(quality) = &report.quality {
        let _ = writeln!(text, "{quality}");
    }
    match &report.outcome {
        Outcome::Succeeded(result) => text.push_str(&render_result(result)),
        Outcome::QueuedOffline { key, reason } => {
            let _ = writeln!(
                text,
                "Saved offline as {key} ({reason}); it will be sent when the connection returns."
            );
        }
        Outcome::Failed(err) => {
            let _ = writeln!(text, "Capture failed: {err}");
        }
    }
    text
}

pub fn render_drain(report: &DrainReport) -> String {
    let mut text = String::new();
    if report.is_empty() {
        text.push_str("Nothing was waiting to be sent.\n");
        return text;
    }
    let _ = writeln!(
        text,
        "Sent {} queued capture(s), {} still waiting.",
        report.delivered.len(),
        report.undelivered.len()
    );
    for (key, result) in &report.delivered {
        let _ = writeln!(text, "{key}:");
        for line in render_result(result).lines() {
            let _ = writeln!(text, "  {line}");
        }
    }
    for (key, failure) in &report.undelivered {
        let _ = writeln!(text, "{key}: still queued ({failure})");
    }
    text
}
