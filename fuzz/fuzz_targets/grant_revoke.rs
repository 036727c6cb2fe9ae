#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use service_acl::fixtures::{self, GET_DATA, LIST_PEOPLE};
use service_acl::primitives::{ClientId, GlobalGroupId, LocalGroupId, SubjectId};
use service_acl::store::ClientStore;

#[derive(Debug, Clone, arbitrary::Arbitrary)]
enum FuzzSubject {
    Subsystem { member: u8, subsystem: u8 },
    Member { member: u8 },
    GlobalGroup { code: u8 },
    LocalGroup { code: u8 },
}

#[derive(Debug, Clone, arbitrary::Arbitrary)]
enum FuzzOp {
    Grant { list_people: bool, subjects: Vec<FuzzSubject>, groups: Vec<u8> },
    Revoke { list_people: bool, subjects: Vec<FuzzSubject>, groups: Vec<u8> },
}

impl FuzzSubject {
    // Small code spaces so that fuzzed ids collide with the sample registry.
    fn id(&self) -> SubjectId {
        match *self {
            FuzzSubject::Subsystem { member, subsystem } => {
                ClientId::subsystem("EE", "GOV", &format!("M{}", member % 4), &format!("SS{}", subsystem % 3)).into()
            }
            FuzzSubject::Member { member } => ClientId::member("EE", "COM", &format!("M{}", member % 4)).into(),
            FuzzSubject::GlobalGroup { code } => match code % 3 {
                0 => fixtures::global_group().into(),
                1 => GlobalGroupId::new("FI", "admins").into(),
                _ => GlobalGroupId::new("EE", "unknown").into(),
            },
            FuzzSubject::LocalGroup { code } => LocalGroupId::new(["testers", "auditors", "ghosts"][code as usize % 3]).into(),
        }
    }
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let engine = fixtures::engine();
    let owner = fixtures::owner_id();

    for op in ops {
        let before = engine.store().client(&owner).ok().flatten();
        let (result, service) = match &op {
            FuzzOp::Grant { list_people, subjects, groups } => {
                let service = if *list_people { LIST_PEOPLE } else { GET_DATA };
                let ids: BTreeSet<SubjectId> = subjects.iter().map(FuzzSubject::id).collect();
                let pks: BTreeSet<u64> = groups.iter().map(|g| u64::from(*g % 4)).collect();
                (engine.add_access_rights(&owner, service, &ids, &pks).map(|_| ()), service)
            }
            FuzzOp::Revoke { list_people, subjects, groups } => {
                let service = if *list_people { LIST_PEOPLE } else { GET_DATA };
                let ids: BTreeSet<SubjectId> = subjects.iter().map(FuzzSubject::id).collect();
                let pks: BTreeSet<u64> = groups.iter().map(|g| u64::from(*g % 4)).collect();
                (engine.remove_access_rights(&owner, service, &ids, &pks), service)
            }
        };

        // A failed operation must leave the client exactly as it was.
        if result.is_err() {
            assert_eq!(engine.store().client(&owner).ok().flatten(), before);
        }

        // Never more than one right per subject on the generated endpoint.
        if let Ok(holders) = engine.access_right_holders(&owner, service) {
            let unique: BTreeSet<&SubjectId> = holders.iter().map(|h| &h.subject_id).collect();
            assert_eq!(unique.len(), holders.len());
        }
    }
});
