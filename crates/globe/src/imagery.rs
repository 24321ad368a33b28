//! Keeps the globe's imagery layers equal to a desired descriptor list.
//!
//! Each attached layer is remembered under the identity it was created
//! with. A sync pass removes what is no longer wanted and adds what is
//! missing; layers whose identity is still wanted are left untouched so
//! their tiles are not refetched.

use std::collections::{BTreeMap, BTreeSet};

use layers::basemap::{BASE_MAP_TEMPLATE, UrlTemplateImageryProvider};
use layers::wms::{ImageryLayerDescriptor, LayerIdentity};
use scene::imagery::{ImageryLayerCollection, ImageryLayerId, ImageryProvider};

/// Anything the synchronizer can attach.
pub trait LayerSource {
    fn identity(&self) -> LayerIdentity;

    fn provider(&self) -> Box<dyn ImageryProvider>;
}

impl LayerSource for ImageryLayerDescriptor {
    fn identity(&self) -> LayerIdentity {
        ImageryLayerDescriptor::identity(self)
    }

    fn provider(&self) -> Box<dyn ImageryProvider> {
        Box::new(self.clone().into_provider())
    }
}

impl LayerSource for UrlTemplateImageryProvider {
    fn identity(&self) -> LayerIdentity {
        LayerIdentity {
            layers: self.template.clone(),
            viewparams: String::new(),
        }
    }

    fn provider(&self) -> Box<dyn ImageryProvider> {
        Box::new(self.clone())
    }
}

/// Identity of the coastal base map.
pub fn base_map_identity() -> LayerIdentity {
    LayerIdentity {
        layers: BASE_MAP_TEMPLATE.to_owned(),
        viewparams: String::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<LayerIdentity>,
    pub removed: Vec<LayerIdentity>,
    pub kept: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ImageryLayerSynchronizer {
    attached: BTreeMap<LayerIdentity, ImageryLayerId>,
}

impl ImageryLayerSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the attached set equal to `desired` (duplicates collapse to
    /// their first occurrence). Removals happen before additions, all within
    /// one call, so no frame sees a partial state.
    pub fn sync<S: LayerSource>(
        &mut self,
        layers: &mut ImageryLayerCollection,
        desired: &[S],
    ) -> SyncReport {
        let mut wanted: Vec<(LayerIdentity, &S)> = Vec::with_capacity(desired.len());
        let mut seen = BTreeSet::new();
        for source in desired {
            let identity = source.identity();
            if seen.insert(identity.clone()) {
                wanted.push((identity, source));
            }
        }

        // Layers removed behind our back are treated as missing.
        self.attached.retain(|_, handle| layers.contains(*handle));

        let mut report = SyncReport::default();
        let stale: Vec<LayerIdentity> = self
            .attached
            .keys()
            .filter(|identity| !seen.contains(*identity))
            .cloned()
            .collect();
        for identity in stale {
            if let Some(handle) = self.attached.remove(&identity) {
                layers.remove(handle);
            }
            report.removed.push(identity);
        }

        for (identity, source) in wanted {
            if self.attached.contains_key(&identity) {
                report.kept += 1;
                continue;
            }
            let handle = layers.add_imagery_provider(source.provider());
            self.attached.insert(identity.clone(), handle);
            report.added.push(identity);
        }

        if !report.is_noop() {
            tracing::debug!(
                added = report.added.len(),
                removed = report.removed.len(),
                kept = report.kept,
                "imagery layers reconciled"
            );
        }
        report
    }

    pub fn handle(&self, identity: &LayerIdentity) -> Option<ImageryLayerId> {
        self.attached.get(identity).copied()
    }

    pub fn identities(&self) -> impl Iterator<Item = &LayerIdentity> {
        self.attached.keys()
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Removes every layer this synchronizer attached.
    pub fn detach_all(&mut self, layers: &mut ImageryLayerCollection) {
        for (_, handle) in std::mem::take(&mut self.attached) {
            layers.remove(handle);
        }
    }
}
