//! Sample registry contents and clients shared by unit and integration tests.
//!
//! Compiled for tests and with the `test-utils` feature.

use std::collections::BTreeSet;

use crate::acl::AclEngine;
use crate::primitives::{Client, ClientId, GlobalGroupId, LocalGroup, Service, ServiceDescription, SubjectId};
use crate::registry::{GlobalGroupInfo, InMemoryRegistry, MemberInfo, RegistrySnapshot};
use crate::service::DescriptionType;
use crate::store::InMemoryStore;
use crate::types::LocalGroupPk;

pub const GET_DATA: &str = "getData.v1";
pub const LIST_PEOPLE: &str = "listPeople";

/// The client whose services are protected ("CLIENT1").
pub fn owner_id() -> ClientId {
    ClientId::subsystem("EE", "GOV", "M1", "CLIENT1")
}

/// A subsystem registered in the registry ("memberX").
pub fn subsystem_x() -> ClientId {
    ClientId::subsystem("EE", "GOV", "M2", "SS1")
}

/// A subsystem of another instance and member class.
pub fn subsystem_z() -> ClientId {
    ClientId::subsystem("FI", "COM", "M4", "SS2")
}

/// A plain member; members never show up in subject searches.
pub fn member_y() -> ClientId {
    ClientId::member("EE", "COM", "M3")
}

pub fn global_group() -> GlobalGroupId {
    GlobalGroupId::new("EE", "security-server-owners")
}

pub fn registry_snapshot() -> RegistrySnapshot {
    RegistrySnapshot {
        instances: vec!["EE".into(), "FI".into()],
        members: vec![
            MemberInfo { id: member_y(), name: "Trading Company".into() },
            MemberInfo { id: subsystem_x(), name: "Tax Agency".into() },
            MemberInfo { id: subsystem_z(), name: "Finnish Logistics".into() },
            MemberInfo { id: owner_id(), name: "Population Registry".into() },
        ],
        global_groups: vec![
            GlobalGroupInfo { id: global_group(), description: "Security server owners".into() },
            GlobalGroupInfo { id: GlobalGroupId::new("FI", "admins"), description: "Administrators".into() },
        ],
    }
}

/// `CLIENT1` with two services and local groups 1 ("testers") and 2 ("auditors").
pub fn owner_client() -> Client {
    let mut client = Client::new(owner_id());
    client.service_descriptions.push(ServiceDescription {
        url: "https://client1.example.org/openapi.yaml".into(),
        kind: DescriptionType::Openapi3,
        services: vec![Service::new("getData", Some("v1")), Service::new("listPeople", None)],
    });
    let mut testers = LocalGroup::new(1, "testers", "Test group");
    testers.members.insert(subsystem_x());
    client.local_groups.push(testers);
    client.local_groups.push(LocalGroup::new(2, "auditors", "Audit group"));
    client
}

/// An engine over the sample registry with `CLIENT1` stored and no access rights.
pub fn engine() -> AclEngine<InMemoryRegistry, InMemoryStore> {
    let store = InMemoryStore::new();
    store.insert_client(owner_client());
    AclEngine::new(InMemoryRegistry::new(registry_snapshot()), store)
}

pub fn subjects(ids: impl IntoIterator<Item = SubjectId>) -> BTreeSet<SubjectId> {
    ids.into_iter().collect()
}

pub fn group_pks(ids: impl IntoIterator<Item = LocalGroupPk>) -> BTreeSet<LocalGroupPk> {
    ids.into_iter().collect()
}
