use crate::ai::Classifier;
use crate::config::ScanLimits;
use crate::error::InputRejection;
use crate::history::SessionHistory;
use crate::summary::SessionSummary;
use crate::types::{AnalysisResult, ScanHistoryItem, ScanInput};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub const SNIPPET_HISTORY_LABEL: &str = "Manual Snippet";
pub const SNIPPET_CLASSIFIER_LABEL: &str = "Manual_Input_Snippet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedScan {
    pub content: String,
    pub classifier_label: String,
    pub history_label: String,
}

pub fn prepare_input(input: ScanInput, limits: &ScanLimits) -> Result<PreparedScan, InputRejection> {
    match input {
        ScanInput::File { name, bytes } => {
            let size = bytes.len() as u64;
            if size > limits.max_file_bytes {
                return Err(InputRejection::FileTooLarge {
                    size,
                    limit: limits.max_file_bytes,
                });
            }
            // Binary files still go through; invalid sequences become U+FFFD.
            let content = String::from_utf8_lossy(&bytes).into_owned();
            Ok(PreparedScan {
                content,
                classifier_label: name.clone(),
                history_label: name,
            })
        }
        ScanInput::Snippet(text) => {
            if text.trim().is_empty() {
                return Err(InputRejection::EmptySnippet);
            }
            Ok(PreparedScan {
                content: text,
                classifier_label: SNIPPET_CLASSIFIER_LABEL.to_string(),
                history_label: SNIPPET_HISTORY_LABEL.to_string(),
            })
        }
    }
}

pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// The history lock is never held across a classifier call, so concurrent
/// scans are recorded in completion order.
pub struct ScanSession {
    classifier: Arc<dyn Classifier>,
    limits: ScanLimits,
    history: Mutex<SessionHistory>,
}

impl ScanSession {
    pub fn new(classifier: Arc<dyn Classifier>, limits: ScanLimits) -> Self {
        Self {
            classifier,
            limits,
            history: Mutex::new(SessionHistory::new()),
        }
    }

    pub fn limits(&self) -> &ScanLimits {
        &self.limits
    }

    pub fn analyze(&self, content: &str, label: &str) -> AnalysisResult {
        let bounded = truncate_chars(content, self.limits.max_content_chars);
        if bounded.len() < content.len() {
            log::info!(
                "truncated {label} to {} characters before analysis",
                self.limits.max_content_chars
            );
        }

        match self.classifier.classify(bounded, label) {
            Ok(result) => result,
            Err(error) => {
                log::error!("analysis of {label} failed: {error}");
                AnalysisResult::failed(error.to_string())
            }
        }
    }

    /// Classifier failures are recorded as UNKNOWN results; only input
    /// rejections are returned as errors.
    pub fn scan(&self, input: ScanInput) -> Result<ScanHistoryItem, InputRejection> {
        let prepared = prepare_input(input, &self.limits).map_err(|rejection| {
            if !rejection.is_silent() {
                log::warn!("scan rejected: {rejection}");
            }
            rejection
        })?;

        log::info!("scanning {}", prepared.history_label);
        let result = self.analyze(&prepared.content, &prepared.classifier_label);

        let item = ScanHistoryItem {
            id: Uuid::new_v4().to_string(),
            filename: prepared.history_label,
            timestamp: now_millis(),
            result,
        };
        log::info!(
            "scan of {} finished: {} ({}%)",
            item.filename,
            item.result.verdict.as_str(),
            item.result.confidence_percent()
        );

        self.history.lock().record(item.clone());
        Ok(item)
    }

    pub fn history(&self) -> Vec<ScanHistoryItem> {
        self.history.lock().all()
    }

    pub fn summary(&self) -> SessionSummary {
        let history = self.history.lock();
        SessionSummary::from_history(history.iter())
    }
}
