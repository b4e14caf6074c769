use {
    crate::ComError,
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
};

/// Retinopathy stages, in the order a five-way classifier reports them.
pub const DR_STAGES: [&str; 5] = [
    "No DR (0)",
    "Mild (1)",
    "Moderate (2)",
    "Severe (3)",
    "Proliferative DR (4)",
];

/// Which response shape a result was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// `{"label": ..., "score": ...}`
    Label,
    /// `{"has_<condition>": ..., "<condition>_confidence" | "prediction": ...}`
    Conditions,
    /// `{"probabilities": [...], "labels"?: [...]}`
    Distribution,
}

/// One label/score pair. `detected` is set for boolean condition flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected: Option<bool>,
}

/// Diagnostic output of the remote classifier. Always holds at least one
/// prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    kind: ResultKind,
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct LabelBody {
    label: String,
    score: f64,
}

#[derive(Deserialize)]
struct DistributionBody {
    probabilities: Vec<f64>,
    #[serde(default)]
    labels: Option<Vec<String>>,
}

fn check_confidence(label: &str, confidence: f64) -> Result<f64, ComError> {
    if confidence.is_finite() && confidence >= 0.0 {
        Ok(confidence)
    } else {
        Err(ComError::Protocol(format!(
            "confidence for {label} is not a usable number: {confidence}"
        )))
    }
}

impl ClassificationResult {
    pub fn new(kind: ResultKind, predictions: Vec<Prediction>) -> Result<Self, ComError> {
        if predictions.is_empty() {
            return Err(ComError::Protocol("response carries no predictions".to_string()));
        }
        for prediction in &predictions {
            check_confidence(&prediction.label, prediction.confidence)?;
        }
        Ok(Self { kind, predictions })
    }

    /// A single `{label, score}` result.
    pub fn label(label: impl Into<String>, score: f64) -> Result<Self, ComError> {
        Self::new(
            ResultKind::Label,
            vec![Prediction {
                label: label.into(),
                confidence: score,
                detected: None,
            }],
        )
    }

    /// Parse a response body in any of the accepted shapes.
    pub fn parse(body: &[u8]) -> Result<Self, ComError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ComError::Protocol(format!("response is not JSON: {e}")))?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Self, ComError> {
        let Value::Object(object) = value else {
            return Err(ComError::Protocol("response is not a JSON object".to_string()));
        };

        if object.contains_key("label") {
            let body: LabelBody = serde_json::from_value(Value::Object(object))?;
            return Self::label(body.label, body.score);
        }

        if object.contains_key("probabilities") {
            let body: DistributionBody = serde_json::from_value(Value::Object(object))?;
            return Self::from_distribution(body);
        }

        let conditions = parse_conditions(&object)?;
        if !conditions.is_empty() {
            return Self::new(ResultKind::Conditions, conditions);
        }

        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        Err(ComError::Protocol(format!(
            "unrecognized response shape with keys {keys:?}"
        )))
    }

    fn from_distribution(body: DistributionBody) -> Result<Self, ComError> {
        let count = body.probabilities.len();
        let labels: Vec<String> = match body.labels {
            Some(labels) if labels.len() == count => labels,
            Some(labels) => {
                return Err(ComError::Protocol(format!(
                    "{} labels for {} probabilities",
                    labels.len(),
                    count
                )));
            }
            None if count == DR_STAGES.len() => {
                DR_STAGES.iter().map(|stage| stage.to_string()).collect()
            }
            None => (0..count).map(|i| format!("class {i}")).collect(),
        };
        let predictions = labels
            .into_iter()
            .zip(body.probabilities)
            .map(|(label, confidence)| Prediction {
                label,
                confidence,
                detected: None,
            })
            .collect();
        Self::new(ResultKind::Distribution, predictions)
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// The highest-confidence prediction; the first one wins ties.
    pub fn top(&self) -> &Prediction {
        let mut top = &self.predictions[0];
        for prediction in &self.predictions[1..] {
            if prediction.confidence > top.confidence {
                top = prediction;
            }
        }
        top
    }

    /// Confidence of the top prediction as a percentage with two decimals.
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.top().confidence * 100.0)
    }
}

// has_<condition> flags with their confidence, in key order
fn parse_conditions(object: &Map<String, Value>) -> Result<Vec<Prediction>, ComError> {
    let mut conditions = Vec::new();
    for (key, value) in object {
        let (Some(name), Value::Bool(detected)) = (key.strip_prefix("has_"), value) else {
            continue;
        };
        let confidence = [
            format!("{name}_confidence"),
            "prediction".to_string(),
            "confidence".to_string(),
        ]
        .iter()
        .find_map(|field| object.get(field))
        .ok_or_else(|| ComError::Protocol(format!("condition {name} has no confidence")))?
        .as_f64()
        .ok_or_else(|| ComError::Protocol(format!("confidence for {name} is not a number")))?;

        conditions.push(Prediction {
            label: name.to_string(),
            confidence,
            detected: Some(*detected),
        });
    }
    Ok(conditions)
}
