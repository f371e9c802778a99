//! HTTP API for the persuasion engine

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::config::EngineConfig;
use crate::generation::Generator;
use crate::session::SessionStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(config: EngineConfig, generator: Arc<dyn Generator>) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(config)),
            generator,
        }
    }
}
