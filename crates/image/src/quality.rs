use {crate::RgbFrame, std::fmt};

/// Acquisition quality of a frame. Advisory only: nothing in the pipeline
/// rejects a capture based on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScore {
    /// Mean channel average over all pixels, 0..=255.
    pub brightness: f32,
    /// Mean absolute channel-average difference between scan-order
    /// neighbours, 0..=255.
    pub sharpness: f32,
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Brightness: {:.2}  Sharpness: {:.2}",
            self.brightness, self.sharpness
        )
    }
}

fn round2(value: f64) -> f32 {
    ((value * 100.0).round() / 100.0) as f32
}

/// Score a frame. The first pixel contributes no difference term, so
/// sharpness averages over `n - 1` differences.
pub fn evaluate(frame: &RgbFrame) -> QualityScore {
    let mut count = 0usize;
    let mut brightness_sum = 0.0f64;
    let mut difference_sum = 0.0f64;
    let mut previous: Option<f64> = None;

    for [r, g, b] in frame.pixels() {
        let average = (r as f64 + g as f64 + b as f64) / 3.0;
        brightness_sum += average;
        if let Some(previous) = previous {
            difference_sum += (average - previous).abs();
        }
        previous = Some(average);
        count += 1;
    }

    if count == 0 {
        return QualityScore {
            brightness: 0.0,
            sharpness: 0.0,
        };
    }

    let sharpness = if count > 1 {
        difference_sum / (count - 1) as f64
    } else {
        0.0
    };

    QualityScore {
        brightness: round2(brightness_sum / count as f64),
        sharpness: round2(sharpness),
    }
}
