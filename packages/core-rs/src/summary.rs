use crate::types::{ChartDataPoint, ScanHistoryItem, Verdict};
use chrono::{Local, TimeZone};
use serde::Serialize;

pub const NO_FILE_LABEL: &str = "N/A";
pub const NO_TIME_LABEL: &str = "--:--";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictCounts {
    pub safe: usize,
    pub suspicious: usize,
    pub malicious: usize,
    pub unknown: usize,
}

impl VerdictCounts {
    pub fn get(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Safe => self.safe,
            Verdict::Suspicious => self.suspicious,
            Verdict::Malicious => self.malicious,
            Verdict::Unknown => self.unknown,
        }
    }

    fn bump(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Safe => self.safe += 1,
            Verdict::Suspicious => self.suspicious += 1,
            Verdict::Malicious => self.malicious += 1,
            Verdict::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.safe + self.suspicious + self.malicious + self.unknown
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_scans: usize,
    pub counts: VerdictCounts,
    pub last_filename: Option<String>,
    pub last_timestamp: Option<i64>,
    pub chart: Vec<ChartDataPoint>,
}

impl SessionSummary {
    /// `history` must be most-recent-first.
    pub fn from_history<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = &'a ScanHistoryItem>,
    {
        let mut counts = VerdictCounts::default();
        let mut latest: Option<&ScanHistoryItem> = None;

        for item in history {
            if latest.is_none() {
                latest = Some(item);
            }
            counts.bump(item.result.verdict);
        }

        // UNKNOWN counts toward the totals but is not drawn.
        let chart = Verdict::ALL
            .iter()
            .filter(|verdict| **verdict != Verdict::Unknown)
            .map(|verdict| ChartDataPoint {
                name: verdict.label().to_string(),
                value: counts.get(*verdict),
            })
            .filter(|point| point.value > 0)
            .collect();

        Self {
            total_scans: counts.total(),
            counts,
            last_filename: latest.map(|item| item.filename.clone()),
            last_timestamp: latest.map(|item| item.timestamp),
            chart,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_scans == 0
    }

    pub fn last_file_label(&self) -> &str {
        self.last_filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(NO_FILE_LABEL)
    }

    /// Local wall-clock time of the latest scan, `--:--` when there is none.
    pub fn last_time_label(&self) -> String {
        self.last_timestamp
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
            .map(|time| time.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| NO_TIME_LABEL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisResult;

    fn item(filename: &str, verdict: Verdict, timestamp: i64) -> ScanHistoryItem {
        let mut result = AnalysisResult::failed("n/a");
        result.verdict = verdict;
        ScanHistoryItem {
            id: filename.to_string(),
            filename: filename.to_string(),
            timestamp,
            result,
        }
    }

    #[test]
    fn empty_history_uses_no_data_sentinels() {
        let summary = SessionSummary::from_history(&Vec::<ScanHistoryItem>::new());
        assert!(summary.is_empty());
        assert_eq!(summary.total_scans, 0);
        assert!(summary.chart.is_empty());
        assert_eq!(summary.last_file_label(), "N/A");
        assert_eq!(summary.last_time_label(), "--:--");
        assert_eq!(summary.last_timestamp, None);
    }

    #[test]
    fn counts_sum_to_history_length_and_drop_zero_categories() {
        let history = vec![
            item("c.sh", Verdict::Malicious, 3),
            item("b.js", Verdict::Safe, 2),
            item("a.py", Verdict::Safe, 1),
        ];
        let summary = SessionSummary::from_history(&history);

        assert_eq!(summary.total_scans, 3);
        let charted: usize = summary.chart.iter().map(|point| point.value).sum();
        assert_eq!(charted, history.len());
        assert_eq!(
            summary.chart,
            vec![
                ChartDataPoint { name: "Safe".to_string(), value: 2 },
                ChartDataPoint { name: "Malicious".to_string(), value: 1 },
            ]
        );
        assert_eq!(summary.last_filename.as_deref(), Some("c.sh"));
        assert_eq!(summary.last_timestamp, Some(3));
    }

    #[test]
    fn unknown_counts_in_totals_but_not_chart() {
        let history = vec![
            item("x", Verdict::Unknown, 2),
            item("y", Verdict::Suspicious, 1),
        ];
        let summary = SessionSummary::from_history(&history);
        assert_eq!(summary.total_scans, 2);
        assert_eq!(summary.counts.unknown, 1);
        assert_eq!(summary.chart.len(), 1);
        assert_eq!(summary.chart[0].name, "Suspicious");
    }

    #[test]
    fn last_time_label_formats_clock_time() {
        let summary = SessionSummary::from_history(&[item("a", Verdict::Safe, 1_700_000_000_000)]);
        let label = summary.last_time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
