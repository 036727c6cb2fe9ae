//!
//! The access-rights engine: grants, revokes and lists access rights of a
//! client's services and searches the subjects that may hold them.
//!
//! Every operation loads one client aggregate, checks everything before
//! touching it, mutates an in-memory copy and saves it back as a whole.
//! A failed check leaves the stored client untouched.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::acl::endpoint;
use crate::acl::holder::{self, AccessRightHolder};
use crate::acl::reconcile;
use crate::acl::search::{self, SubjectSearch};
use crate::config::{AclConfig, DuplicateCheck};
use crate::error::AclError;
use crate::primitives::{AccessRight, Client, ClientId, Endpoint, SubjectId};
use crate::registry::GlobalRegistry;
use crate::service::{service_type_of, DescriptionLookup, ServiceLookup};
use crate::store::{ClientStore, IdentifierStore};
use crate::types::LocalGroupPk;

/// The access-rights engine over a registry `G`, a store `S` and a service lookup `L`.
#[derive(Debug)]
pub struct AclEngine<G, S, L = DescriptionLookup> {
    registry: G,
    store: S,
    services: L,
    config: AclConfig,
}

impl<G, S> AclEngine<G, S, DescriptionLookup>
where
    G: GlobalRegistry,
    S: ClientStore + IdentifierStore,
{
    /// Creates an engine that finds services in the clients' own service descriptions.
    pub fn new(registry: G, store: S) -> Self {
        Self::with_service_lookup(registry, store, DescriptionLookup)
    }
}

impl<G, S, L> AclEngine<G, S, L>
where
    G: GlobalRegistry,
    S: ClientStore + IdentifierStore,
    L: ServiceLookup,
{
    pub fn with_service_lookup(registry: G, store: S, services: L) -> Self {
        AclEngine { registry, store, services, config: AclConfig::default() }
    }

    pub fn with_config(mut self, config: AclConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    pub fn registry(&self) -> &G {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_client(&self, client_id: &ClientId) -> Result<Client, AclError> {
        self.store.client(client_id)?.ok_or_else(|| AclError::ClientNotFound(client_id.clone()))
    }

    /// Everyone holding an access right on any endpoint of the service.
    pub fn access_right_holders(&self, client_id: &ClientId, full_service_code: &str) -> Result<Vec<AccessRightHolder>, AclError> {
        let client = self.load_client(client_id)?;
        let service = self.services.find_service(&client, full_service_code)?;
        Ok(holder::holders_for_service(&client, &service.service_code))
    }

    /// Verifies identifiers against the registry and returns their persisted form.
    pub fn reconcile_identifiers(&self, candidates: BTreeSet<SubjectId>) -> Result<BTreeSet<SubjectId>, AclError> {
        reconcile::reconcile(&self.registry, &self.store, candidates)
    }

    /// Grants the subjects and local groups access to the whole service.
    ///
    /// Rights attach to the service's generated wildcard endpoint, which is
    /// created on first use. Returns every holder of the service afterwards.
    /// Nothing is granted if any subject already has a right on the endpoint.
    ///
    /// Identifiers are verified before the local groups and the duplicate
    /// check, and persisted just before the client is saved. If that save
    /// fails, for example with [`AclError::ConcurrentModification`], the
    /// client is unchanged but the newly persisted identifier rows stay.
    /// Those rows are only ever reused by value, so a retry stores nothing new.
    pub fn add_access_rights(
        &self,
        client_id: &ClientId,
        full_service_code: &str,
        subject_ids: &BTreeSet<SubjectId>,
        local_group_ids: &BTreeSet<LocalGroupPk>,
    ) -> Result<Vec<AccessRightHolder>, AclError> {
        let mut client = self.load_client(client_id)?;
        let service = self.services.find_service(&client, full_service_code)?;

        reconcile::verify(&self.registry, subject_ids)?;
        // Local groups passed as plain identifiers must still belong to this client.
        let unknown_local = subject_ids.iter().any(|id| match id {
            SubjectId::LocalGroup(local) => !client.local_groups.iter().any(|g| g.group_code == local.group_code),
            _ => false,
        });
        if unknown_local {
            return Err(AclError::IdentifierNotFound);
        }
        let local_groups = reconcile::resolve_local_groups(&client, local_group_ids)?;

        let mut candidates = subject_ids.clone();
        candidates.extend(local_groups);

        let endpoint = endpoint::resolve_default(&mut client, &service.service_code);
        if let Some(subject) = candidates.iter().find(|s| is_duplicate(self.config.duplicate_check, &client.acl, s, &endpoint)) {
            tracing::debug!(client = %client.id, %subject, service_code = %service.service_code, "duplicate access right");
            return Err(AclError::DuplicateAccessRight {
                subject: subject.to_string(),
                service_code: service.service_code.clone(),
            });
        }

        let subjects = reconcile::persist(&self.store, candidates)?;
        let now = Utc::now();
        client.acl.extend(subjects.iter().map(|subject| AccessRight {
            endpoint: endpoint.clone(),
            subject_id: subject.clone(),
            rights_given: now,
        }));
        self.store.save_client(&client)?;

        tracing::info!(
            client = %client.id,
            service_code = %service.service_code,
            service_type = ?service_type_of(&client, &service.service_code),
            granted = subjects.len(),
            "access rights added"
        );
        Ok(holder::holders_for_service(&client, &service.service_code))
    }

    /// Removes the access rights of the subjects and local groups on any endpoint of the service.
    ///
    /// Fails with [`AclError::AccessRightNotFound`], removing nothing, when
    /// any requested subject holds no right on the service. An empty request
    /// leaves the client unsaved.
    pub fn remove_access_rights(
        &self,
        client_id: &ClientId,
        full_service_code: &str,
        subject_ids: &BTreeSet<SubjectId>,
        local_group_ids: &BTreeSet<LocalGroupPk>,
    ) -> Result<(), AclError> {
        let mut client = self.load_client(client_id)?;
        let service = self.services.find_service(&client, full_service_code)?;
        let mut requested = subject_ids.clone();
        requested.extend(reconcile::resolve_local_groups(&client, local_group_ids)?);
        if requested.is_empty() {
            return Ok(());
        }

        let holding: BTreeSet<&SubjectId> = client
            .access_rights_for_service(&service.service_code)
            .map(|right| &right.subject_id)
            .filter(|subject| requested.contains(*subject))
            .collect();
        if holding.len() != requested.len() {
            tracing::debug!(client = %client.id, requested = requested.len(), holding = holding.len(), "revoke of missing access right");
            return Err(AclError::AccessRightNotFound);
        }

        let before = client.acl.len();
        client.acl.retain(|right| !(right.endpoint.service_code == service.service_code && requested.contains(&right.subject_id)));
        let removed = before - client.acl.len();
        self.store.save_client(&client)?;

        tracing::info!(client = %client.id, service_code = %service.service_code, removed, "access rights removed");
        Ok(())
    }

    /// Subjects that may be given access rights on the client's services.
    pub fn find_access_right_holders(&self, client_id: &ClientId, terms: &SubjectSearch) -> Result<Vec<AccessRightHolder>, AclError> {
        let client = self.load_client(client_id)?;
        search::search(&self.registry, &client, terms, &self.config)
    }
}

/// Whether granting `subject` on `endpoint` collides with one of `acl`.
pub fn is_duplicate(check: DuplicateCheck, acl: &[AccessRight], subject: &SubjectId, endpoint: &Endpoint) -> bool {
    match check {
        DuplicateCheck::Endpoint => acl.iter().any(|right| right.subject_id == *subject && right.endpoint.same_key(endpoint)),
        DuplicateCheck::FirstRight => acl
            .iter()
            .find(|right| right.subject_id == *subject)
            .is_some_and(|right| right.endpoint.same_key(endpoint)),
    }
}
