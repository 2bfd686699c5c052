use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::MixCheckService;
use crate::models::{AnalysisRecord, FailureKind, SessionState};
use crate::presentation::{self, RiskLevel};
use crate::session::SubmitOutcome;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub drug_a: String,
    pub drug_b: String,
    #[serde(default)]
    pub factors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReply {
    record: AnalysisRecord,
    risk_level: RiskLevel,
}

pub fn router(service: Arc<MixCheckService>) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/suggestions", get(suggestions))
        .route("/api/factors", get(factors))
        .route("/health", get(|| async { "ok" }))
        .with_state(service)
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn analyze(
    State(service): State<Arc<MixCheckService>>,
    Json(body): Json<AnalyzeBody>,
) -> Response {
    let validated = service
        .validator
        .validate_drug_name("drugA", &body.drug_a)
        .and_then(|drug_a| {
            let drug_b = service.validator.validate_drug_name("drugB", &body.drug_b)?;
            let factors = service.validator.validate_factors(&body.factors)?;
            Ok((drug_a, drug_b, factors))
        });
    let (drug_a, drug_b, factors) = match validated {
        Ok(input) => input,
        Err(e) => return error_reply(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    };

    match service.session.submit(&drug_a, &drug_b, factors).await {
        SubmitOutcome::Busy => error_reply(
            StatusCode::CONFLICT,
            "an analysis is already in progress",
        ),
        SubmitOutcome::Rejected(message) => {
            error_reply(StatusCode::UNPROCESSABLE_ENTITY, &message)
        }
        SubmitOutcome::Completed(SessionState::Succeeded(_, record)) => {
            let reply = AnalyzeReply {
                risk_level: RiskLevel::for_score(record.risk_score),
                record,
            };
            (StatusCode::OK, Json(reply)).into_response()
        }
        SubmitOutcome::Completed(SessionState::Failed(_, kind, message)) => {
            let status = match kind {
                FailureKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
                FailureKind::Upstream | FailureKind::Transport | FailureKind::Parse => {
                    StatusCode::BAD_GATEWAY
                }
                FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            };
            error_reply(status, &message)
        }
        // submit only completes in Succeeded or Failed
        SubmitOutcome::Completed(_) => {
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "unexpected session state")
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestionQuery {
    #[serde(default)]
    q: String,
}

async fn suggestions(Query(query): Query<SuggestionQuery>) -> Json<Vec<&'static str>> {
    Json(presentation::filter_suggestions(&query.q))
}

async fn factors() -> Json<Vec<&'static str>> {
    Json(presentation::PATIENT_FACTORS.to_vec())
}
