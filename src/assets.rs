use std::collections::HashMap;

use crate::entity::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    Loading,
    Ready,
    Failed(String),
}

/// Readiness of the shared presentation models. The renderer flips entries as
/// its loads complete; until the chicken model is ready, chickens are frozen.
#[derive(Debug, Clone)]
pub struct AssetCache {
    models: HashMap<EntityKind, AssetState>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::with_state(AssetState::Loading)
    }

    /// Cache for headless runs where nothing has to load.
    pub fn preloaded() -> Self {
        Self::with_state(AssetState::Ready)
    }

    fn with_state(state: AssetState) -> Self {
        let models = [EntityKind::Chicken, EntityKind::Egg]
            .into_iter()
            .map(|kind| (kind, state.clone()))
            .collect();
        Self { models }
    }

    pub fn state(&self, kind: EntityKind) -> &AssetState {
        self.models.get(&kind).unwrap_or(&AssetState::Loading)
    }

    pub fn is_ready(&self, kind: EntityKind) -> bool {
        matches!(self.state(kind), AssetState::Ready)
    }

    pub fn mark_ready(&mut self, kind: EntityKind) {
        self.models.insert(kind, AssetState::Ready);
    }

    pub fn mark_failed(&mut self, kind: EntityKind, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(?kind, %reason, "model failed to load; entities stay idle");
        self.models.insert(kind, AssetState::Failed(reason));
    }
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}
