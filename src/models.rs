use serde::{Deserialize, Serialize};

/// One analysis submission: two drug names plus optional patient-factor tags.
///
/// Factor order is irrelevant semantically but preserved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub drug_a: String,
    pub drug_b: String,
    pub patient_factors: Vec<String>,
}

impl AnalysisRequest {
    /// Drug names are trimmed on construction; callers must ensure they are
    /// non-empty (the session controller rejects empty names before building).
    pub fn new(
        drug_a: impl Into<String>,
        drug_b: impl Into<String>,
        patient_factors: Vec<String>,
    ) -> Self {
        Self {
            drug_a: drug_a.into().trim().to_string(),
            drug_b: drug_b.into().trim().to_string(),
            patient_factors,
        }
    }
}

// Groq chat message format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

// Groq API request format
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: i32,
}

// Groq API response format; only the first choice's message is consumed.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

/// The validated result of one analysis attempt. Created only by the response
/// parser, immutable thereafter, replaced wholesale by the next success.
///
/// Optional sections stay `None` when the model omits them; fallback text for
/// display is presentation policy, never stored here.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub drug_a: String,
    pub drug_b: String,
    pub risk_score: u8,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<String>,
}

/// Broad classification of a failed analysis, kept alongside the
/// user-visible message in `SessionState::Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Configuration,
    Transport,
    Upstream,
    Parse,
    Validation,
}

/// Session lifecycle. Exactly one value is live at a time, owned by the
/// session controller; `Succeeded` and `Failed` are terminal until the next
/// submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Analyzing(AnalysisRequest),
    Succeeded(AnalysisRequest, AnalysisRecord),
    Failed(AnalysisRequest, FailureKind, String),
}
