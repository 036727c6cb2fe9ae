//!
//! Global registry abstraction.
//!
//! The registry is the externally maintained, authoritative directory of
//! network members, subsystems and global groups. The engine only reads
//! from it and must tolerate it changing between calls.

use std::collections::BTreeSet;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::RegistryError;
use crate::primitives::{ClientId, GlobalGroupId, SubjectId};

/// A member or subsystem listed in the registry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemberInfo {
    pub id: ClientId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlobalGroupInfo {
    pub id: GlobalGroupId,
    pub description: String,
}

/// Read-only view of the global registry used by the engine.
pub trait GlobalRegistry: Send + Sync {
    /// All members and subsystems of every known instance.
    fn members(&self) -> Result<Vec<MemberInfo>, RegistryError>;

    fn instance_identifiers(&self) -> Result<Vec<String>, RegistryError>;

    /// Global groups of the given instances, or of all instances for `None`.
    ///
    /// Fails with [`RegistryError::NoGlobalGroups`] when the requested
    /// instances have no groups.
    fn global_groups(&self, instances: Option<&[String]>) -> Result<Vec<GlobalGroupInfo>, RegistryError>;

    /// `true` when every identifier is known to the registry.
    fn identifiers_exist(&self, ids: &BTreeSet<SubjectId>) -> Result<bool, RegistryError>;
}

/// Registry contents at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegistrySnapshot {
    pub instances: Vec<String>,
    pub members: Vec<MemberInfo>,
    pub global_groups: Vec<GlobalGroupInfo>,
}

impl RegistrySnapshot {
    fn contains(&self, id: &SubjectId) -> bool {
        match id {
            SubjectId::Client(client) => self.members.iter().any(|m| {
                m.id == *client || (!client.is_subsystem() && m.id.member_id() == *client)
            }),
            SubjectId::GlobalGroup(group) => self.global_groups.iter().any(|g| g.id == *group),
            SubjectId::LocalGroup(_) => false,
        }
    }
}

/// Process-wide registry cache whose snapshot is replaced wholesale on refresh.
#[derive(Debug)]
pub struct InMemoryRegistry {
    snap: ArcSwap<RegistrySnapshot>,
}

impl InMemoryRegistry {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        InMemoryRegistry { snap: ArcSwap::from_pointee(snapshot) }
    }

    /// Atomically replaces the cached registry contents.
    pub fn refresh(&self, snapshot: RegistrySnapshot) {
        tracing::debug!(
            members = snapshot.members.len(),
            global_groups = snapshot.global_groups.len(),
            "registry snapshot refreshed"
        );
        self.snap.store(Arc::new(snapshot));
    }

    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snap.load_full()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        InMemoryRegistry::new(RegistrySnapshot::default())
    }
}

impl GlobalRegistry for InMemoryRegistry {
    fn members(&self) -> Result<Vec<MemberInfo>, RegistryError> {
        Ok(self.snap.load().members.clone())
    }

    fn instance_identifiers(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.snap.load().instances.clone())
    }

    fn global_groups(&self, instances: Option<&[String]>) -> Result<Vec<GlobalGroupInfo>, RegistryError> {
        let snap = self.snap.load();
        match instances {
            None => Ok(snap.global_groups.clone()),
            Some(instances) => {
                let groups: Vec<GlobalGroupInfo> = snap
                    .global_groups
                    .iter()
                    .filter(|g| instances.contains(&g.id.xroad_instance))
                    .cloned()
                    .collect();
                if groups.is_empty() {
                    return Err(RegistryError::NoGlobalGroups { instances: instances.to_vec() });
                }
                Ok(groups)
            }
        }
    }

    fn identifiers_exist(&self, ids: &BTreeSet<SubjectId>) -> Result<bool, RegistryError> {
        let snap = self.snap.load();
        Ok(ids.iter().all(|id| snap.contains(id)))
    }
}
