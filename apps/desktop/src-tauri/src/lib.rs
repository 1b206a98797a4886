use sentinel_core::{
    GeminiClassifier, InputRejection, ScanHistoryItem, ScanInput, ScanSession, SentinelConfig,
    SessionSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};

type SharedSession = Arc<ScanSession>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileScanRequest {
    name: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnippetScanRequest {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LimitsPayload {
    max_file_bytes: u64,
    max_content_chars: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPayload {
    #[serde(flatten)]
    summary: SessionSummary,
    last_file_label: String,
    last_time_label: String,
}

async fn run_scan(
    app: &AppHandle,
    session: SharedSession,
    input: ScanInput,
) -> Result<Result<ScanHistoryItem, InputRejection>, String> {
    let outcome = tauri::async_runtime::spawn_blocking(move || session.scan(input))
        .await
        .map_err(|error| format!("Scan task failed: {error}"))?;

    if let Ok(item) = &outcome {
        let _ = app.emit("scan.complete", item.clone());
    }
    Ok(outcome)
}

#[tauri::command]
async fn scan_file(
    app: AppHandle,
    session: State<'_, SharedSession>,
    request: FileScanRequest,
) -> Result<ScanHistoryItem, String> {
    let input = ScanInput::File {
        name: request.name,
        bytes: request.bytes,
    };
    run_scan(&app, session.inner().clone(), input)
        .await?
        .map_err(|rejection| rejection.to_string())
}

/// Resolves to `null` for blank input.
#[tauri::command]
async fn scan_snippet(
    app: AppHandle,
    session: State<'_, SharedSession>,
    request: SnippetScanRequest,
) -> Result<Option<ScanHistoryItem>, String> {
    match run_scan(&app, session.inner().clone(), ScanInput::Snippet(request.text)).await? {
        Ok(item) => Ok(Some(item)),
        Err(rejection) if rejection.is_silent() => Ok(None),
        Err(rejection) => Err(rejection.to_string()),
    }
}

#[tauri::command]
fn history_list(session: State<'_, SharedSession>) -> Vec<ScanHistoryItem> {
    session.history()
}

#[tauri::command]
fn session_summary(session: State<'_, SharedSession>) -> SummaryPayload {
    let summary = session.summary();
    SummaryPayload {
        last_file_label: summary.last_file_label().to_string(),
        last_time_label: summary.last_time_label(),
        summary,
    }
}

#[tauri::command]
fn scan_limits(session: State<'_, SharedSession>) -> LimitsPayload {
    let limits = session.limits();
    LimitsPayload {
        max_file_bytes: limits.max_file_bytes,
        max_content_chars: limits.max_content_chars,
    }
}

fn build_session() -> SharedSession {
    let config = SentinelConfig::from_env().unwrap_or_else(|error| {
        log::warn!("{error}; using default settings");
        SentinelConfig::default()
    });

    if config.classifier.api_key.is_none() {
        log::warn!("API_KEY is not set; every scan will report Analysis Failed");
    }

    let classifier = GeminiClassifier::new(config.classifier);
    log::info!("classifier model: {}", classifier.model());

    Arc::new(ScanSession::new(Arc::new(classifier), config.limits))
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .manage(build_session())
        .invoke_handler(tauri::generate_handler![
            scan_file,
            scan_snippet,
            history_list,
            session_summary,
            scan_limits
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
