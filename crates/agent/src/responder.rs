//! The two response strategies and the one-time choice between them.

use std::sync::Arc;

use async_trait::async_trait;
use rustbot_core::generation::{GenerationBackend, TokenHistory};
use rustbot_core::responder::{Responder, Strategy};
use rustbot_core::Result;
use rustbot_dialogue::{FallbackEngine, SessionMemory};
use tracing::{debug, info};

/// Rule-based strategy: the fallback engine plus the session's memory.
///
/// The memory lives here and nowhere else; each turn hands it to the engine
/// by value and stores whatever comes back.
pub struct RuleResponder {
    engine: FallbackEngine,
    memory: SessionMemory,
}

impl RuleResponder {
    pub fn new(engine: FallbackEngine) -> Self {
        Self {
            engine,
            memory: SessionMemory::new(),
        }
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }
}

#[async_trait]
impl Responder for RuleResponder {
    fn name(&self) -> &str {
        "fallback"
    }

    fn strategy(&self) -> Strategy {
        Strategy::RuleBased
    }

    async fn respond(&mut self, utterance: &str) -> Result<String> {
        let memory = std::mem::take(&mut self.memory);
        let reply = self.engine.respond(utterance, memory);
        debug!(matched = ?reply.matched, "Rule-based turn");
        self.memory = reply.memory;
        Ok(reply.text)
    }
}

/// Generative strategy: a backend plus the running token history.
pub struct GenerativeResponder {
    backend: Arc<dyn GenerationBackend>,
    history: Option<TokenHistory>,
}

impl GenerativeResponder {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            history: None,
        }
    }

    /// Tokens accumulated so far (0 before the first turn).
    pub fn history_len(&self) -> usize {
        self.history.as_ref().map_or(0, TokenHistory::len)
    }
}

#[async_trait]
impl Responder for GenerativeResponder {
    fn name(&self) -> &str {
        self.backend.name()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Generative
    }

    async fn respond(&mut self, utterance: &str) -> Result<String> {
        let generation = self.backend.generate(utterance, self.history.as_ref()).await?;
        debug!(history_tokens = generation.history.len(), "Generative turn");
        self.history = Some(generation.history);
        Ok(generation.response)
    }
}

/// Pick the strategy for a whole session: generative when a backend is
/// available, rule-based otherwise.
pub fn select_responder(
    backend: Option<Arc<dyn GenerationBackend>>,
    engine: FallbackEngine,
) -> Box<dyn Responder> {
    let responder: Box<dyn Responder> = match backend {
        Some(backend) => Box::new(GenerativeResponder::new(backend)),
        None => Box::new(RuleResponder::new(engine)),
    };
    info!(
        strategy = %responder.strategy(),
        responder = responder.name(),
        "Response strategy selected"
    );
    responder
}
