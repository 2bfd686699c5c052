pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod presentation;
pub mod prompt;
pub mod session;
pub mod transport;
pub mod validation;
pub mod web;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::session::AnalysisSession;
use crate::transport::GroqTransport;
use crate::validation::InputValidator;

/// Wires the analysis session and its collaborators together from config.
pub struct MixCheckService {
    pub session: Arc<AnalysisSession>,
    pub validator: Arc<InputValidator>,
}

impl MixCheckService {
    pub fn new(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(GroqTransport::new(
            cfg.groq.api_key.clone(),
            cfg.request_timeout(),
        )?);

        let session = Arc::new(AnalysisSession::new(transport, cfg.groq.model.clone()));

        Ok(Self {
            session,
            validator: Arc::new(InputValidator::new()),
        })
    }
}
