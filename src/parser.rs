use serde_json::Value;

use crate::error::ParseError;
use crate::models::{AnalysisRecord, AnalysisRequest, CompletionResponse};

/// Greedy first-`{`-to-last-`}` extraction, mirroring what free-form model
/// output requires (prose may surround the JSON). Not nesting-aware: if the
/// text carries more than one brace-delimited block, everything between the
/// first `{` and the last `}` is treated as a single span and will usually
/// fail the strict decode below.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Validate and coerce raw model output into an `AnalysisRecord`.
///
/// Required fields are checked in order: `riskScore` (finite number in
/// [0,100], never clamped), then `summary` (non-empty string). Optional
/// sections pass through verbatim; absent stays absent.
pub fn parse_analysis(
    request: &AnalysisRequest,
    response: &CompletionResponse,
) -> Result<AnalysisRecord, ParseError> {
    let content = response
        .choices
        .first()
        .map(|choice| choice.message.content.as_str())
        .unwrap_or("");

    let span = extract_json_span(content).ok_or(ParseError::NoJsonFound)?;
    let value: Value = serde_json::from_str(span)?;

    let risk_score = value
        .get("riskScore")
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite() && (0.0..=100.0).contains(score))
        .ok_or(ParseError::SchemaViolation("riskScore"))?
        .round() as u8;

    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .filter(|summary| !summary.trim().is_empty())
        .ok_or(ParseError::SchemaViolation("summary"))?
        .to_string();

    let optional = |field: &str| {
        value
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(AnalysisRecord {
        drug_a: request.drug_a.clone(),
        drug_b: request.drug_b.clone(),
        risk_score,
        summary,
        mechanism: optional("mechanism"),
        evidence: optional("evidence"),
        reports: optional("reports"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatMessage, Choice};

    fn response(content: &str) -> CompletionResponse {
        CompletionResponse {
            choices: vec![Choice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: content.to_string(),
                },
            }],
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("Warfarin", "Aspirin", vec![])
    }

    #[test]
    fn test_extract_json_span() {
        assert_eq!(extract_json_span(r#"before {"a": 1} after"#), Some(r#"{"a": 1}"#));
        assert_eq!(extract_json_span("{}"), Some("{}"));
        assert_eq!(extract_json_span("no braces here"), None);
        assert_eq!(extract_json_span("} reversed {"), None);
    }

    #[test]
    fn test_parse_recovers_embedded_json() {
        let raw = response(
            r#"Here is the result: {"riskScore": 78, "summary": "High interaction risk due to bleeding potential."} Thanks."#,
        );
        let record = parse_analysis(&request(), &raw).expect("should parse");

        assert_eq!(record.drug_a, "Warfarin");
        assert_eq!(record.drug_b, "Aspirin");
        assert_eq!(record.risk_score, 78);
        assert_eq!(
            record.summary,
            "High interaction risk due to bleeding potential."
        );
        assert_eq!(record.mechanism, None);
        assert_eq!(record.evidence, None);
        assert_eq!(record.reports, None);
    }

    #[test]
    fn test_optional_fields_pass_through() {
        let raw = response(
            r#"{"riskScore": 40, "summary": "Moderate.", "mechanism": "CYP2C9 inhibition", "evidence": "Two RCTs", "reports": "FAERS: 12 cases"}"#,
        );
        let record = parse_analysis(&request(), &raw).expect("should parse");

        assert_eq!(record.mechanism.as_deref(), Some("CYP2C9 inhibition"));
        assert_eq!(record.evidence.as_deref(), Some("Two RCTs"));
        assert_eq!(record.reports.as_deref(), Some("FAERS: 12 cases"));
    }

    #[test]
    fn test_no_json_found() {
        let err = parse_analysis(&request(), &response("I cannot help with that."))
            .expect_err("prose only");
        assert!(matches!(err, ParseError::NoJsonFound));
    }

    #[test]
    fn test_empty_choices_is_no_json() {
        let raw = CompletionResponse { choices: vec![] };
        let err = parse_analysis(&request(), &raw).expect_err("no choices");
        assert!(matches!(err, ParseError::NoJsonFound));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_analysis(&request(), &response(r#"{"riskScore": 78,"#))
            .expect_err("unterminated object");
        // rfind('}') can land inside a valid-looking span in other cases; here
        // there is no closing brace at all, so extraction already fails.
        assert!(matches!(err, ParseError::NoJsonFound));

        let err = parse_analysis(&request(), &response(r#"{"riskScore": oops}"#))
            .expect_err("bad token");
        assert!(matches!(err, ParseError::MalformedJson(_)));
    }

    #[test]
    fn test_risk_score_out_of_range_is_never_clamped() {
        for score in ["-5", "101", "250"] {
            let raw = response(&format!(
                r#"{{"riskScore": {score}, "summary": "whatever"}}"#
            ));
            let err = parse_analysis(&request(), &raw).expect_err("out of range");
            assert!(matches!(err, ParseError::SchemaViolation("riskScore")));
        }
    }

    #[test]
    fn test_risk_score_wrong_type() {
        let raw = response(r#"{"riskScore": "high", "summary": "whatever"}"#);
        let err = parse_analysis(&request(), &raw).expect_err("string score");
        assert!(matches!(err, ParseError::SchemaViolation("riskScore")));
    }

    #[test]
    fn test_missing_summary_with_valid_score() {
        let raw = response(r#"{"riskScore": 50}"#);
        let err = parse_analysis(&request(), &raw).expect_err("no summary");
        assert!(matches!(err, ParseError::SchemaViolation("summary")));

        let raw = response(r#"{"riskScore": 50, "summary": "   "}"#);
        let err = parse_analysis(&request(), &raw).expect_err("blank summary");
        assert!(matches!(err, ParseError::SchemaViolation("summary")));
    }

    #[test]
    fn test_risk_score_checked_before_summary() {
        let raw = response(r#"{"neither": true}"#);
        let err = parse_analysis(&request(), &raw).expect_err("both missing");
        assert!(matches!(err, ParseError::SchemaViolation("riskScore")));
    }

    #[test]
    fn test_boundary_scores_accepted() {
        for (score, expected) in [("0", 0u8), ("100", 100u8)] {
            let raw = response(&format!(
                r#"{{"riskScore": {score}, "summary": "edge"}}"#
            ));
            let record = parse_analysis(&request(), &raw).expect("in range");
            assert_eq!(record.risk_score, expected);
        }
    }
}
