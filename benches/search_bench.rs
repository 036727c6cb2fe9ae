use criterion::{criterion_group, criterion_main, Criterion};
use service_acl::fixtures::{self, GET_DATA};
use service_acl::primitives::{ClientId, GlobalGroupId, LocalGroup};
use service_acl::registry::{GlobalGroupInfo, InMemoryRegistry, MemberInfo};
use service_acl::store::InMemoryStore;
use service_acl::types::SubjectType;
use service_acl::{AclEngine, SubjectSearch};

fn large_engine() -> AclEngine<InMemoryRegistry, InMemoryStore> {
    let mut snapshot = fixtures::registry_snapshot();
    for i in 0..5_000 {
        let id = ClientId::subsystem("EE", if i % 3 == 0 { "COM" } else { "GOV" }, &format!("M{i}"), &format!("SS{i}"));
        snapshot.members.push(MemberInfo { id, name: format!("Organisation {i}") });
    }
    for i in 0..200 {
        snapshot.global_groups.push(GlobalGroupInfo {
            id: GlobalGroupId::new(if i % 2 == 0 { "EE" } else { "FI" }, &format!("group-{i}")),
            description: format!("Global group {i}"),
        });
    }
    let mut client = fixtures::owner_client();
    for i in 0..100 {
        client.local_groups.push(LocalGroup::new(100 + i, &format!("local-{i}"), &format!("Local group {i}")));
    }
    let store = InMemoryStore::new();
    store.insert_client(client);
    AclEngine::new(InMemoryRegistry::new(snapshot), store)
}

fn search_benchmarks(c: &mut Criterion) {
    let engine = large_engine();
    let owner = fixtures::owner_id();

    c.bench_function("search_all", |b| {
        b.iter(|| engine.find_access_right_holders(&owner, &SubjectSearch::new()))
    });

    let narrow = SubjectSearch::new().subject_type(SubjectType::Subsystem).instance("ee").name_or_description("organisation 42");
    c.bench_function("search_narrow", |b| b.iter(|| engine.find_access_right_holders(&owner, &narrow)));

    c.bench_function("access_right_holders", |b| b.iter(|| engine.access_right_holders(&owner, GET_DATA)));
}

criterion_group!(benches, search_benchmarks);
criterion_main!(benches);
