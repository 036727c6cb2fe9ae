//! Subject search.
//!
//! The candidate universe is every registry member, the registry's global
//! groups (optionally narrowed by instance) and the client's local groups.
//! A [`SubjectSearch`] turns into a list of independent [`SearchClause`]s
//! which all have to match for a candidate to be returned.

use crate::acl::holder::AccessRightHolder;
use crate::config::AclConfig;
use crate::error::{AclError, RegistryError};
use crate::primitives::{Client, SubjectId};
use crate::registry::GlobalRegistry;
use crate::types::SubjectType;

/// Search terms. `None` and empty strings match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubjectSearch {
    pub subject_type: Option<SubjectType>,
    /// Member name, or local/global group description.
    pub name_or_description: Option<String>,
    pub instance: Option<String>,
    pub member_class: Option<String>,
    /// Member code or group code.
    pub member_or_group_code: Option<String>,
    pub subsystem_code: Option<String>,
}

impl SubjectSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject_type(mut self, subject_type: SubjectType) -> Self {
        self.subject_type = Some(subject_type);
        self
    }

    pub fn name_or_description(mut self, term: &str) -> Self {
        self.name_or_description = Some(term.to_string());
        self
    }

    pub fn instance(mut self, term: &str) -> Self {
        self.instance = Some(term.to_string());
        self
    }

    pub fn member_class(mut self, term: &str) -> Self {
        self.member_class = Some(term.to_string());
        self
    }

    pub fn member_or_group_code(mut self, term: &str) -> Self {
        self.member_or_group_code = Some(term.to_string());
        self
    }

    pub fn subsystem_code(mut self, term: &str) -> Self {
        self.subsystem_code = Some(term.to_string());
        self
    }

    /// The conjunction of clauses this search stands for.
    ///
    /// Plain members are always excluded since they cannot hold access rights.
    pub fn clauses(&self, config: &AclConfig) -> Vec<SearchClause> {
        let mut clauses = vec![SearchClause::NotMember];
        if let Some(ty) = self.subject_type {
            clauses.push(SearchClause::SubjectType(ty));
        }
        if let Some(term) = non_empty(&self.name_or_description) {
            clauses.push(SearchClause::NameOrDescription {
                term: term.to_string(),
                include_global_groups: config.match_global_group_descriptions,
            });
        }
        if let Some(term) = non_empty(&self.instance) {
            clauses.push(SearchClause::Instance(term.to_string()));
        }
        if let Some(term) = non_empty(&self.member_class) {
            clauses.push(SearchClause::MemberClass(term.to_string()));
        }
        if let Some(term) = non_empty(&self.subsystem_code) {
            clauses.push(SearchClause::SubsystemCode(term.to_string()));
        }
        if let Some(term) = non_empty(&self.member_or_group_code) {
            clauses.push(SearchClause::MemberOrGroupCode(term.to_string()));
        }
        clauses
    }
}

fn non_empty(term: &Option<String>) -> Option<&str> {
    term.as_deref().filter(|t| !t.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One filter over a candidate holder. Substring matches ignore case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchClause {
    NotMember,
    SubjectType(SubjectType),
    NameOrDescription { term: String, include_global_groups: bool },
    /// Local groups have no instance and always match.
    Instance(String),
    MemberClass(String),
    SubsystemCode(String),
    MemberOrGroupCode(String),
}

impl SearchClause {
    pub fn matches(&self, holder: &AccessRightHolder) -> bool {
        let subject = &holder.subject_id;
        match self {
            SearchClause::NotMember => subject.subject_type() != SubjectType::Member,
            SearchClause::SubjectType(ty) => subject.subject_type() == *ty,
            SearchClause::NameOrDescription { term, include_global_groups } => {
                let text = match subject {
                    SubjectId::Client(_) => holder.member_name.as_deref(),
                    SubjectId::GlobalGroup(_) if !include_global_groups => None,
                    SubjectId::GlobalGroup(_) | SubjectId::LocalGroup(_) => holder.description.as_deref(),
                };
                text.is_some_and(|t| contains_ignore_case(t, term))
            }
            SearchClause::Instance(term) => match subject {
                SubjectId::LocalGroup(_) => true,
                SubjectId::Client(c) => contains_ignore_case(&c.xroad_instance, term),
                SubjectId::GlobalGroup(g) => contains_ignore_case(&g.xroad_instance, term),
            },
            SearchClause::MemberClass(term) => match subject {
                SubjectId::Client(c) => contains_ignore_case(&c.member_class, term),
                SubjectId::GlobalGroup(_) | SubjectId::LocalGroup(_) => false,
            },
            SearchClause::SubsystemCode(term) => match subject {
                SubjectId::Client(c) => c.subsystem_code.as_deref().is_some_and(|s| contains_ignore_case(s, term)),
                SubjectId::GlobalGroup(_) | SubjectId::LocalGroup(_) => false,
            },
            SearchClause::MemberOrGroupCode(term) => match subject {
                SubjectId::Client(c) => contains_ignore_case(&c.member_code, term),
                SubjectId::GlobalGroup(g) => contains_ignore_case(&g.group_code, term),
                SubjectId::LocalGroup(l) => contains_ignore_case(&l.group_code, term),
            },
        }
    }
}

pub fn matches_all(clauses: &[SearchClause], holder: &AccessRightHolder) -> bool {
    clauses.iter().all(|clause| clause.matches(holder))
}

/// Every candidate subject for `client`: members, then global groups, then local groups.
pub fn candidates<G>(registry: &G, client: &Client, instance: Option<&str>) -> Result<Vec<AccessRightHolder>, AclError>
where
    G: GlobalRegistry + ?Sized,
{
    let mut holders: Vec<AccessRightHolder> =
        registry.members()?.into_iter().map(AccessRightHolder::from_member).collect();
    holders.extend(global_group_candidates(registry, instance)?);
    holders.extend(client.local_groups.iter().map(AccessRightHolder::from_local_group));
    Ok(holders)
}

fn global_group_candidates<G>(registry: &G, instance: Option<&str>) -> Result<Vec<AccessRightHolder>, AclError>
where
    G: GlobalRegistry + ?Sized,
{
    let groups = match instance.filter(|i| !i.is_empty()) {
        Some(term) => {
            let matching: Vec<String> = registry
                .instance_identifiers()?
                .into_iter()
                .filter(|id| contains_ignore_case(id, term))
                .collect();
            if matching.is_empty() {
                return Ok(Vec::new());
            }
            registry.global_groups(Some(matching.as_slice()))
        }
        None => registry.global_groups(None),
    };
    match groups {
        Ok(groups) => Ok(groups.into_iter().map(AccessRightHolder::from_global_group).collect()),
        Err(RegistryError::NoGlobalGroups { instances }) => {
            tracing::debug!(?instances, "no global groups for instances");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Candidates of `client` matching every term of `search`, in candidate order.
pub fn search<G>(registry: &G, client: &Client, search: &SubjectSearch, config: &AclConfig) -> Result<Vec<AccessRightHolder>, AclError>
where
    G: GlobalRegistry + ?Sized,
{
    let clauses = search.clauses(config);
    let holders = candidates(registry, client, non_empty(&search.instance))?;
    Ok(holders.into_iter().filter(|holder| matches_all(&clauses, holder)).collect())
}
