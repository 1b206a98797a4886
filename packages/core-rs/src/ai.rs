use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::types::AnalysisResult;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

pub trait Classifier: Send + Sync {
    fn classify(&self, content: &str, filename: &str) -> Result<AnalysisResult, ClassifierError>;
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

/// Joins every text part of the first candidate.
fn extract_text(response: GeminiResponse) -> Option<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with("```") {
        let without_start = trimmed.trim_start_matches("```");
        let without_lang = without_start
            .strip_prefix("json")
            .or_else(|| without_start.strip_prefix("JSON"))
            .unwrap_or(without_start);
        return without_lang.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": {
                "type": "STRING",
                "enum": ["SAFE", "SUSPICIOUS", "MALICIOUS", "UNKNOWN"],
                "description": "The overall safety verdict of the analyzed content."
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Confidence score between 0 and 100."
            },
            "threatName": {
                "type": "STRING",
                "description": "If malicious, a potential name (e.g., 'Trojan.Win32.Generic', 'Reverse Shell'). Null if safe."
            },
            "summary": {
                "type": "STRING",
                "description": "A brief, high-level summary of findings."
            },
            "detectedPatterns": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of specific suspicious patterns found (e.g., 'Base64 Obfuscation', 'System Call Injection')."
            },
            "recommendation": {
                "type": "STRING",
                "description": "Actionable advice for the user."
            },
            "technicalDetails": {
                "type": "STRING",
                "description": "Deep technical explanation of why the verdict was chosen."
            }
        },
        "required": [
            "verdict",
            "confidence",
            "summary",
            "detectedPatterns",
            "recommendation",
            "technicalDetails"
        ]
    })
}

/// Fixed analyst instructions wrapped around the (already truncated) content.
pub fn build_prompt(content: &str, filename: &str) -> String {
    format!(
        "Act as a senior cybersecurity malware analyst. Analyze the following file content \
(filename: {filename}) for potential security threats, malicious logic, Trojans, viruses, \
or suspicious obfuscation.

Focus on:
1. Dangerous system calls (exec, system, spawn).
2. Obfuscation techniques (base64, packer signatures, eval).
3. Network activity (reverse shells, data exfiltration).
4. Persistence mechanisms (registry edits, startup folders).
5. Common malware signatures.

If the content is harmless code or plain text, mark it as SAFE.
If it contains dangerous patterns but is ambiguous, mark as SUSPICIOUS.
If it is clearly harmful, mark as MALICIOUS.

FILE CONTENT START:
{content}
FILE CONTENT END"
    )
}

pub fn build_request_body(content: &str, filename: &str, temperature: f32) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": build_prompt(content, filename)}]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": analysis_schema(),
            "temperature": temperature
        }
    })
}

pub fn parse_generate_response(body: &str) -> Result<AnalysisResult, ClassifierError> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|error| ClassifierError::Malformed(format!("response envelope: {error}")))?;
    let text = extract_text(response).ok_or(ClassifierError::EmptyResponse)?;
    let cleaned = strip_code_fence(&text);
    serde_json::from_str(&cleaned).map_err(|error| ClassifierError::Malformed(error.to_string()))
}

pub struct GeminiClassifier {
    config: ClassifierConfig,
    // A client that failed to build is reported on every scan instead of at startup.
    client: Result<Client, String>,
}

impl GeminiClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| {
                log::error!("failed to build HTTP client: {error}");
                error.to_string()
            });
        Self { config, client }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/{}:generateContent?key={api_key}",
            self.config.endpoint, self.config.model
        )
    }
}

impl Classifier for GeminiClassifier {
    fn classify(&self, content: &str, filename: &str) -> Result<AnalysisResult, ClassifierError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ClassifierError::MissingApiKey)?;

        let client = self
            .client
            .as_ref()
            .map_err(|error| ClassifierError::Transport(error.clone()))?;

        let body = build_request_body(content, filename, self.config.temperature);
        let response = client
            .post(self.endpoint(api_key))
            .json(&body)
            .send()
            // reqwest includes the URL in its errors; drop it so the key never reaches the UI.
            .map_err(|error| ClassifierError::Transport(error.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|error| ClassifierError::Transport(error.without_url().to_string()))?;

        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_generate_response(&text)
    }
}
