use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("API Key missing")]
    MissingApiKey,
    #[error("AI request failed: {0}")]
    Transport(String),
    #[error("AI request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("No response from AI")]
    EmptyResponse,
    #[error("AI JSON parse failed: {0}")]
    Malformed(String),
}

/// Input refused at the boundary. The classifier is never called and no
/// history entry is created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputRejection {
    #[error("File too large ({size} bytes). Max {limit} bytes.")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("Nothing to analyze")]
    EmptySnippet,
}

impl InputRejection {
    /// Empty snippets are ignored without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, InputRejection::EmptySnippet)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
