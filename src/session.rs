use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::MixCheckError;
use crate::models::{AnalysisRecord, AnalysisRequest, SessionState};
use crate::parser;
use crate::prompt;
use crate::transport::CompletionTransport;

/// One-shot presentation effects emitted on state transitions. The state
/// machine itself carries no UI data; implementations reveal/scroll the
/// results view or surface a notification.
pub trait SessionEvents: Send + Sync {
    /// Fired once on entering `Succeeded`.
    fn reveal_results(&self, _record: &AnalysisRecord) {}
    /// Fired once on entering `Failed`.
    fn analysis_failed(&self, _message: &str) {}
}

struct NoopEvents;

impl SessionEvents for NoopEvents {}

/// What became of a `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The analysis ran to completion; the carried state is `Succeeded` or
    /// `Failed`.
    Completed(SessionState),
    /// Another analysis was already in flight; this call was dropped, not
    /// queued, and the session state was left untouched.
    Busy,
    /// Input validation failed before any state change.
    Rejected(String),
}

/// Owns the single session-state cell and drives one analysis at a time
/// through prompt building, the completion transport, and response parsing.
pub struct AnalysisSession {
    transport: Arc<dyn CompletionTransport>,
    events: Arc<dyn SessionEvents>,
    model: String,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl AnalysisSession {
    pub fn new(transport: Arc<dyn CompletionTransport>, model: String) -> Self {
        Self {
            transport,
            events: Arc::new(NoopEvents),
            model,
            state: Mutex::new(SessionState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn SessionEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The record from the most recent successful analysis, if the session is
    /// currently in `Succeeded`.
    pub fn last_record(&self) -> Option<AnalysisRecord> {
        match self.state() {
            SessionState::Succeeded(_, record) => Some(record),
            _ => None,
        }
    }

    fn set_state(&self, next: SessionState) {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;
    }

    /// Run one analysis to completion. At most one analysis is in flight at a
    /// time; a submit while one is outstanding is a no-op returning `Busy`,
    /// and the in-flight request's eventual result determines the next state.
    pub async fn submit(
        &self,
        drug_a: &str,
        drug_b: &str,
        factors: Vec<String>,
    ) -> SubmitOutcome {
        let drug_a = drug_a.trim();
        let drug_b = drug_b.trim();
        if drug_a.is_empty() || drug_b.is_empty() {
            tracing::warn!("submit rejected: both drug names are required");
            return SubmitOutcome::Rejected("both drug names are required".to_string());
        }

        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::warn!("submit ignored: an analysis is already in flight");
            return SubmitOutcome::Busy;
        }

        let analysis_id = uuid::Uuid::new_v4();
        let request = AnalysisRequest::new(drug_a, drug_b, factors);
        self.set_state(SessionState::Analyzing(request.clone()));
        tracing::info!(
            %analysis_id,
            drug_a = %request.drug_a,
            drug_b = %request.drug_b,
            factors = request.patient_factors.len(),
            "starting interaction analysis"
        );

        let next = match self.run(&request).await {
            Ok(record) => {
                tracing::info!(%analysis_id, risk_score = record.risk_score, "analysis complete");
                let state = SessionState::Succeeded(request, record.clone());
                self.set_state(state.clone());
                self.events.reveal_results(&record);
                state
            }
            Err(e) => {
                tracing::error!(%analysis_id, "analysis failed: {e}");
                let message = e.to_string();
                let state = SessionState::Failed(request, e.failure_kind(), message.clone());
                self.set_state(state.clone());
                self.events.analysis_failed(&message);
                state
            }
        };

        // Released on every path so the controller can never stick in Analyzing.
        self.in_flight.store(false, Ordering::Release);
        SubmitOutcome::Completed(next)
    }

    async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisRecord, MixCheckError> {
        let payload = prompt::build_completion_request(request, &self.model);
        let response = self.transport.chat(&payload).await?;
        let record = parser::parse_analysis(request, &response)?;
        Ok(record)
    }
}
