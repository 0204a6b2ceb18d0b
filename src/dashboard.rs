use anyhow::Result;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

use crate::telemetry::{EngineState, StateObserver};

/// Latest engine state shared with the web handlers.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    state: Arc<RwLock<EngineState>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole stored state. Recovers a lock poisoned by a
    /// panicking writer.
    pub fn publish(&self, state: &EngineState) {
        let mut current = self.state.write().unwrap_or_else(|e| {
            warn!("Dashboard lock was poisoned, recovering");
            self.state.clear_poison();
            e.into_inner()
        });
        *current = state.clone();
    }

    pub fn snapshot(&self) -> EngineState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateObserver for Dashboard {
    fn on_update(&mut self, state: &EngineState) -> Result<()> {
        self.publish(state);
        Ok(())
    }
}
