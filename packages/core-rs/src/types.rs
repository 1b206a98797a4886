use serde::{Deserialize, Serialize};

pub const FAILED_THREAT_NAME: &str = "Analysis Failed";
pub const FAILED_SUMMARY: &str = "Could not complete analysis due to an error.";
pub const FAILED_RECOMMENDATION: &str = "Check network connection or API key.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Safe,
    Suspicious,
    Malicious,
    Unknown,
}

impl Verdict {
    pub const ALL: [Verdict; 4] = [
        Verdict::Safe,
        Verdict::Suspicious,
        Verdict::Malicious,
        Verdict::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Suspicious => "SUSPICIOUS",
            Verdict::Malicious => "MALICIOUS",
            Verdict::Unknown => "UNKNOWN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Safe => "Safe",
            Verdict::Suspicious => "Suspicious",
            Verdict::Malicious => "Malicious",
            Verdict::Unknown => "Unknown",
        }
    }
}

/// Every field except `threat_name` is required when deserializing, so a
/// classifier payload that omits one is rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub confidence: f64,
    #[serde(default)]
    pub threat_name: Option<String>,
    pub summary: String,
    pub detected_patterns: Vec<String>,
    pub recommendation: String,
    pub technical_details: String,
}

impl AnalysisResult {
    pub fn failed(details: impl Into<String>) -> Self {
        let details = details.into();
        let technical_details = if details.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            details
        };

        Self {
            verdict: Verdict::Unknown,
            confidence: 0.0,
            threat_name: Some(FAILED_THREAT_NAME.to_string()),
            summary: FAILED_SUMMARY.to_string(),
            detected_patterns: Vec::new(),
            recommendation: FAILED_RECOMMENDATION.to_string(),
            technical_details,
        }
    }

    /// Confidence clamped into 0..=100 for display. NaN reads as 0.
    pub fn confidence_percent(&self) -> u8 {
        if self.confidence.is_nan() {
            return 0;
        }
        self.confidence.clamp(0.0, 100.0).round() as u8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryItem {
    pub id: String,
    pub filename: String,
    /// Completion time in Unix epoch milliseconds.
    pub timestamp: i64,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone)]
pub enum ScanInput {
    File { name: String, bytes: Vec<u8> },
    Snippet(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartDataPoint {
    pub name: String,
    pub value: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_classifier_shape_without_threat_name() {
        let value = json!({
            "verdict": "SAFE",
            "confidence": 88,
            "summary": "Plain text.",
            "detectedPatterns": [],
            "recommendation": "None needed.",
            "technicalDetails": "No executable content."
        });

        let result: AnalysisResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.verdict, Verdict::Safe);
        assert_eq!(result.confidence, 88.0);
        assert_eq!(result.threat_name, None);
    }

    #[test]
    fn rejects_payload_missing_mandatory_field() {
        let value = json!({
            "verdict": "MALICIOUS",
            "confidence": 90,
            "summary": "Reverse shell.",
            "detectedPatterns": ["Reverse Shell"],
            "recommendation": "Quarantine."
        });

        assert!(serde_json::from_value::<AnalysisResult>(value).is_err());
    }

    #[test]
    fn rejects_unknown_verdict_value() {
        let value = json!({
            "verdict": "HARMLESS",
            "confidence": 10,
            "summary": "",
            "detectedPatterns": [],
            "recommendation": "",
            "technicalDetails": ""
        });

        assert!(serde_json::from_value::<AnalysisResult>(value).is_err());
    }

    #[test]
    fn failed_result_is_fully_populated() {
        let result = AnalysisResult::failed("connection refused");
        assert_eq!(result.verdict, Verdict::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.threat_name.as_deref(), Some(FAILED_THREAT_NAME));
        assert_eq!(result.summary, FAILED_SUMMARY);
        assert_eq!(result.recommendation, FAILED_RECOMMENDATION);
        assert!(result.detected_patterns.is_empty());
        assert_eq!(result.technical_details, "connection refused");

        let blank = AnalysisResult::failed("  ");
        assert_eq!(blank.technical_details, "Unknown error");
    }

    #[test]
    fn confidence_percent_clamps_out_of_range_values() {
        let mut result = AnalysisResult::failed("x");
        result.confidence = 140.0;
        assert_eq!(result.confidence_percent(), 100);
        result.confidence = -3.0;
        assert_eq!(result.confidence_percent(), 0);
        result.confidence = f64::NAN;
        assert_eq!(result.confidence_percent(), 0);
        result.confidence = 72.4;
        assert_eq!(result.confidence_percent(), 72);
    }

    #[test]
    fn history_item_serializes_camel_case() {
        let item = ScanHistoryItem {
            id: "abc".to_string(),
            filename: "run.sh".to_string(),
            timestamp: 1_700_000_000_000,
            result: AnalysisResult::failed("boom"),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["result"]["verdict"], "UNKNOWN");
        assert_eq!(value["result"]["threatName"], "Analysis Failed");
        assert_eq!(value["result"]["technicalDetails"], "boom");
    }
}
