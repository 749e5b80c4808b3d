use kinflate_core::ResourceCollection;

use super::Transformer;
use crate::error::{EngineError, Result};
use crate::merge::{PatchMerger, StrategicMerge};

/// Merges patch resources onto the base resources they name
///
/// Every patch must match a base resource by apiVersion, kind and name.
pub struct OverlayTransformer {
    overlay: ResourceCollection,
    merger: Box<dyn PatchMerger>,
}

impl OverlayTransformer {
    /// Overlay merged with [`StrategicMerge`]
    pub fn new(overlay: ResourceCollection) -> Self {
        Self::with_merger(overlay, Box::new(StrategicMerge::new()))
    }

    pub fn with_merger(overlay: ResourceCollection, merger: Box<dyn PatchMerger>) -> Self {
        Self { overlay, merger }
    }
}

impl Transformer for OverlayTransformer {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn transform(&self, resources: &mut ResourceCollection) -> Result<()> {
        for (id, patch) in &self.overlay {
            let base = resources
                .get_mut(id)
                .ok_or_else(|| EngineError::PatchTargetNotFound { id: id.clone() })?;

            let merged = self
                .merger
                .merge(&id.gvk, base.object(), patch.object())
                .map_err(|e| e.in_resource(id))?;
            *base.object_mut() = merged;
            tracing::debug!(%id, "applied patch");
        }
        Ok(())
    }
}
