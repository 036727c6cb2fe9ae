//! Identifier reconciliation.
//!
//! Registry-backed identifiers (members, subsystems and global groups) are
//! verified against the global registry and matched by value against the
//! rows already persisted, so that each distinct identifier is stored once.
//! Local groups never reach the registry; they are resolved against the
//! owning client instead.

use std::collections::BTreeSet;

use crate::error::AclError;
use crate::primitives::{Client, SubjectId};
use crate::registry::GlobalRegistry;
use crate::store::IdentifierStore;
use crate::types::LocalGroupPk;

/// Verifies `candidates` and returns their canonical, persisted form.
///
/// All registry-backed candidates must exist in the registry, otherwise
/// nothing is persisted and [`AclError::IdentifierNotFound`] is returned.
/// Local group candidates are passed through untouched.
pub fn reconcile<G, S>(registry: &G, store: &S, candidates: BTreeSet<SubjectId>) -> Result<BTreeSet<SubjectId>, AclError>
where
    G: GlobalRegistry + ?Sized,
    S: IdentifierStore + ?Sized,
{
    verify(registry, &candidates)?;
    persist(store, candidates)
}

/// Checks that every registry-backed candidate exists. Writes nothing.
pub fn verify<G>(registry: &G, candidates: &BTreeSet<SubjectId>) -> Result<(), AclError>
where
    G: GlobalRegistry + ?Sized,
{
    let verifiable: BTreeSet<SubjectId> = candidates.iter().filter(|id| id.is_registry_verifiable()).cloned().collect();
    if verifiable.is_empty() {
        return Ok(());
    }
    if !registry.identifiers_exist(&verifiable)? {
        tracing::debug!(candidates = verifiable.len(), "registry rejected identifiers");
        return Err(AclError::IdentifierNotFound);
    }
    Ok(())
}

/// Swaps registry-backed candidates for their stored form, storing new ones.
///
/// Expects candidates already passed through [`verify`].
pub fn persist<S>(store: &S, candidates: BTreeSet<SubjectId>) -> Result<BTreeSet<SubjectId>, AclError>
where
    S: IdentifierStore + ?Sized,
{
    let (verifiable, local): (BTreeSet<SubjectId>, BTreeSet<SubjectId>) =
        candidates.into_iter().partition(SubjectId::is_registry_verifiable);
    if verifiable.is_empty() {
        return Ok(local);
    }
    let mut canonical = store.get_or_persist(&verifiable)?;
    canonical.extend(local);
    Ok(canonical)
}

/// Maps local group primary keys of `client` to local group subject ids.
pub fn resolve_local_groups(client: &Client, ids: &BTreeSet<LocalGroupPk>) -> Result<BTreeSet<SubjectId>, AclError> {
    ids.iter()
        .map(|id| {
            client
                .local_group(*id)
                .map(|group| group.subject_id())
                .ok_or(AclError::LocalGroupNotFound(*id))
        })
        .collect()
}
