// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry of kinds made known to a transport.

use crate::infrastructure::kubernetes::builder::Kind;
use kube::core::{ApiResource, GroupVersionKind};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Type information the transport needs to address a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub gvk: GroupVersionKind,
    pub resource: ApiResource,
    pub namespaced: bool,
}

impl Scheme {
    pub fn of<K: Kind>() -> Self {
        let resource = ApiResource::erase::<K>(&());
        Self {
            gvk: GroupVersionKind::gvk(&resource.group, &resource.version, &resource.kind),
            resource,
            namespaced: K::NAMESPACED,
        }
    }
}

/// Add-only set of schemes.
#[derive(Debug, Default)]
pub struct SchemeRegistry {
    schemes: RwLock<HashMap<GroupVersionKind, Scheme>>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry shared by every cluster transport.
    pub fn global() -> &'static SchemeRegistry {
        static GLOBAL: OnceLock<SchemeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(SchemeRegistry::new)
    }

    /// Returns true when the scheme was not known before.
    pub fn register(&self, scheme: &Scheme) -> bool {
        if self.is_registered(&scheme.gvk) {
            return false;
        }

        let mut schemes = self.schemes.write().unwrap_or_else(|e| e.into_inner());
        if schemes.contains_key(&scheme.gvk) {
            return false;
        }

        tracing::debug!(
            group = %scheme.gvk.group,
            version = %scheme.gvk.version,
            kind = %scheme.gvk.kind,
            "registering scheme"
        );
        schemes.insert(scheme.gvk.clone(), scheme.clone());
        true
    }

    pub fn is_registered(&self, gvk: &GroupVersionKind) -> bool {
        self.schemes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(gvk)
    }

    pub fn lookup(&self, resource: &ApiResource) -> Option<Scheme> {
        let gvk = GroupVersionKind::gvk(&resource.group, &resource.version, &resource.kind);
        self.schemes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&gvk)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.schemes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::sriov::SriovNetwork;
    use crate::domain::api::performance::PerformanceProfile;
    use std::sync::Arc;

    #[test]
    fn test_scheme_of() {
        let scheme = Scheme::of::<SriovNetwork>();
        assert_eq!(scheme.gvk.group, "sriovnetwork.openshift.io");
        assert_eq!(scheme.gvk.kind, "SriovNetwork");
        assert_eq!(scheme.resource.plural, "sriovnetworks");
        assert!(scheme.namespaced);

        assert!(!Scheme::of::<PerformanceProfile>().namespaced);
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = SchemeRegistry::new();
        let scheme = Scheme::of::<SriovNetwork>();

        assert!(registry.register(&scheme));
        assert!(!registry.register(&scheme));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup(&scheme.resource).is_some());
    }

    #[test]
    fn test_concurrent_register() {
        let registry = Arc::new(SchemeRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.register(&Scheme::of::<SriovNetwork>()))
            })
            .collect();

        let added = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();

        assert_eq!(added, 1);
        assert_eq!(registry.len(), 1);
    }
}
