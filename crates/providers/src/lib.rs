//! Text generation backends for rustbot.
//!
//! All backends implement the `rustbot_core::GenerationBackend` trait.
//! [`probe`] decides once per session whether a backend is usable; when it
//! is not, the session runs on the rule-based fallback instead.

#[cfg(feature = "local")]
pub mod local;
pub mod ngram;
pub mod presets;

#[cfg(feature = "local")]
pub use local::LocalBackend;
pub use presets::{ModelPreset, PRESETS};

use rustbot_config::GenerationConfig;
use rustbot_core::GenerationBackend;
use std::sync::Arc;
use tracing::{info, warn};

/// Whether this build can run local models at all.
pub const LOCAL_COMPILED: bool = cfg!(feature = "local");

/// The outcome of the startup capability check.
pub enum Capability {
    /// A backend loaded and ready to generate
    Available(Arc<dyn GenerationBackend>),
    /// No backend; the reason is for logs and `status`
    Unavailable { reason: String },
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    pub fn into_backend(self) -> Option<Arc<dyn GenerationBackend>> {
        match self {
            Capability::Available(backend) => Some(backend),
            Capability::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Available(backend) => {
                f.debug_tuple("Available").field(&backend.name()).finish()
            }
            Capability::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Try to bring up the configured generation backend.
///
/// Never fails: every problem is reported as [`Capability::Unavailable`]
/// and logged, so a missing model can only ever select the fallback path.
pub async fn probe(config: &GenerationConfig) -> Capability {
    if !config.enabled {
        info!("Generation disabled by configuration, using rule-based fallback");
        return Capability::Unavailable {
            reason: "disabled by configuration".into(),
        };
    }

    let capability = load(config).await;
    match &capability {
        Capability::Available(backend) => {
            info!(backend = backend.name(), model = %config.model, "Generation backend ready");
        }
        Capability::Unavailable { reason } => {
            warn!(model = %config.model, reason = %reason, "Generation backend unavailable, using rule-based fallback");
        }
    }
    capability
}

#[cfg(feature = "local")]
async fn load(config: &GenerationConfig) -> Capability {
    let model = config.model.clone();
    let params = config.params.clone();

    match tokio::task::spawn_blocking(move || LocalBackend::load(&model, params)).await {
        Ok(Ok(backend)) => Capability::Available(Arc::new(backend)),
        Ok(Err(e)) => Capability::Unavailable {
            reason: e.to_string(),
        },
        Err(e) => Capability::Unavailable {
            reason: format!("model loading task failed: {e}"),
        },
    }
}

#[cfg(not(feature = "local"))]
async fn load(_config: &GenerationConfig) -> Capability {
    Capability::Unavailable {
        reason: "built without the `local` feature".into(),
    }
}
