use crate::models::{AnalysisRequest, ChatMessage, CompletionRequest};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: i32 = 2000;

const SYSTEM_PERSONA: &str = "You are a clinical pharmacology expert providing evidence-based drug interaction analysis. Always respond with valid JSON only.";

/// Build the completion request for one analysis. Pure and deterministic:
/// the same `AnalysisRequest` always produces the same payload.
pub fn build_completion_request(request: &AnalysisRequest, model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PERSONA.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_prompt(request),
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

fn user_prompt(request: &AnalysisRequest) -> String {
    // The factors segment is omitted entirely when no factors are selected,
    // so the model is not nudged into discussing absent factors.
    let factors_text = if request.patient_factors.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nPatient Factors: {}",
            request.patient_factors.join(", ")
        )
    };

    format!(
        r#"You are a clinical pharmacology expert. Analyze the potential drug interaction between {drug_a} and {drug_b}.{factors_text}

Please provide a comprehensive analysis in the following JSON format:

{{
  "riskScore": <number from 0-100>,
  "summary": "<2-3 sentence overview of the interaction>",
  "mechanism": "<detailed explanation of how these drugs interact at the molecular/physiological level, including specific enzymes, receptors, or pathways involved>",
  "evidence": "<summary of clinical evidence, studies, and FDA data supporting this interaction. Include specific study references if available>",
  "reports": "<information about adverse event reports from FDA FAERS database or similar sources, including common symptoms and prevalence>"
}}

Base your analysis on:
- Known pharmacokinetic and pharmacodynamic interactions
- Cytochrome P450 enzyme interactions
- FDA drug interaction databases
- Clinical evidence from medical literature
- Patient safety considerations

Provide accurate, evidence-based information. If the interaction risk is uncertain or minimal, state that clearly."#,
        drug_a = request.drug_a,
        drug_b = request.drug_b,
        factors_text = factors_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(factors: &[&str]) -> AnalysisRequest {
        AnalysisRequest::new(
            "Warfarin",
            "Aspirin",
            factors.iter().map(|f| f.to_string()).collect(),
        )
    }

    #[test]
    fn test_build_is_deterministic() {
        let req = request(&["Pregnant", "Age 65+"]);
        let a = build_completion_request(&req, DEFAULT_MODEL);
        let b = build_completion_request(&req, DEFAULT_MODEL);
        assert_eq!(a, b);
    }

    #[test]
    fn test_payload_shape() {
        let req = request(&[]);
        let payload = build_completion_request(&req, DEFAULT_MODEL);

        assert_eq!(payload.model, "llama-3.3-70b-versatile");
        assert_eq!(payload.temperature, 0.7);
        assert_eq!(payload.max_tokens, 2000);
        assert_eq!(payload.messages.len(), 2);
        assert_eq!(payload.messages[0].role, "system");
        assert_eq!(payload.messages[1].role, "user");
        assert!(payload.messages[1].content.contains("Warfarin"));
        assert!(payload.messages[1].content.contains("Aspirin"));
    }

    #[test]
    fn test_factors_segment_omitted_when_empty() {
        let payload = build_completion_request(&request(&[]), DEFAULT_MODEL);
        assert!(!payload.messages[1].content.contains("Patient Factors"));
    }

    #[test]
    fn test_factors_interpolated_verbatim() {
        let payload = build_completion_request(
            &request(&["Liver Condition", "Alcohol Use"]),
            DEFAULT_MODEL,
        );
        assert!(
            payload.messages[1]
                .content
                .contains("Patient Factors: Liver Condition, Alcohol Use")
        );
    }
}
