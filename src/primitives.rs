use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::service::DescriptionType;
use crate::types::{LocalGroupPk, SubjectType};

// --- Subject identifiers ----------------------------------------------------

/// Identifier of a network member or of one of its subsystems.
///
/// A missing `subsystem_code` makes this a member id, a present one a
/// subsystem id. The two never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ClientId {
    pub xroad_instance: String,
    pub member_class: String,
    pub member_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsystem_code: Option<String>,
}

impl ClientId {
    pub fn member(instance: &str, member_class: &str, member_code: &str) -> Self {
        ClientId {
            xroad_instance: instance.to_string(),
            member_class: member_class.to_string(),
            member_code: member_code.to_string(),
            subsystem_code: None,
        }
    }

    pub fn subsystem(instance: &str, member_class: &str, member_code: &str, subsystem_code: &str) -> Self {
        ClientId {
            subsystem_code: Some(subsystem_code.to_string()),
            ..ClientId::member(instance, member_class, member_code)
        }
    }

    pub fn is_subsystem(&self) -> bool {
        self.subsystem_code.is_some()
    }

    /// The owning member of a subsystem id (or a copy of a member id).
    pub fn member_id(&self) -> ClientId {
        ClientId { subsystem_code: None, ..self.clone() }
    }
}

/// Identifier of a network-wide group defined in the global registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct GlobalGroupId {
    pub xroad_instance: String,
    pub group_code: String,
}

impl GlobalGroupId {
    pub fn new(instance: &str, group_code: &str) -> Self {
        GlobalGroupId { xroad_instance: instance.to_string(), group_code: group_code.to_string() }
    }
}

/// Identifier of a local group. Only meaningful inside the owning client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct LocalGroupId {
    pub group_code: String,
}

impl LocalGroupId {
    pub fn new(group_code: &str) -> Self {
        LocalGroupId { group_code: group_code.to_string() }
    }
}

/// Any identifier that may hold an access right.
///
/// Equality is structural per variant; identifiers of different variants
/// are never equal even when their string fields coincide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectId {
    Client(ClientId),
    #[serde(rename = "GLOBALGROUP")]
    GlobalGroup(GlobalGroupId),
    #[serde(rename = "LOCALGROUP")]
    LocalGroup(LocalGroupId),
}

impl SubjectId {
    pub fn subject_type(&self) -> SubjectType {
        match self {
            SubjectId::Client(c) if c.is_subsystem() => SubjectType::Subsystem,
            SubjectId::Client(_) => SubjectType::Member,
            SubjectId::GlobalGroup(_) => SubjectType::GlobalGroup,
            SubjectId::LocalGroup(_) => SubjectType::LocalGroup,
        }
    }

    /// Instance the identifier lives in; local groups have none.
    pub fn xroad_instance(&self) -> Option<&str> {
        match self {
            SubjectId::Client(c) => Some(&c.xroad_instance),
            SubjectId::GlobalGroup(g) => Some(&g.xroad_instance),
            SubjectId::LocalGroup(_) => None,
        }
    }

    /// Whether the global registry is the authority for this identifier.
    pub fn is_registry_verifiable(&self) -> bool {
        !matches!(self, SubjectId::LocalGroup(_))
    }
}

impl From<ClientId> for SubjectId {
    fn from(id: ClientId) -> Self {
        SubjectId::Client(id)
    }
}

impl From<GlobalGroupId> for SubjectId {
    fn from(id: GlobalGroupId) -> Self {
        SubjectId::GlobalGroup(id)
    }
}

impl From<LocalGroupId> for SubjectId {
    fn from(id: LocalGroupId) -> Self {
        SubjectId::LocalGroup(id)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.xroad_instance, self.member_class, self.member_code)?;
        if let Some(sub) = &self.subsystem_code {
            write!(f, "/{}", sub)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectId::Client(c) => write!(f, "{}:{}", self.subject_type(), c),
            SubjectId::GlobalGroup(g) => write!(f, "GLOBALGROUP:{}/{}", g.xroad_instance, g.group_code),
            SubjectId::LocalGroup(l) => write!(f, "LOCALGROUP:{}", l.group_code),
        }
    }
}

// --- Endpoints and access rights --------------------------------------------

/// An addressable unit of a service (method + path) that access rights attach to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Endpoint {
    pub service_code: String,
    pub method: String,
    pub path: String,
    /// Created by the engine rather than declared by a service description.
    pub generated: bool,
}

impl Endpoint {
    pub fn matches(&self, service_code: &str, method: &str, path: &str) -> bool {
        self.service_code == service_code && self.method == method && self.path == path
    }

    /// Same (service, method, path) key; `generated` is not part of the identity.
    pub fn same_key(&self, other: &Endpoint) -> bool {
        self.matches(&other.service_code, &other.method, &other.path)
    }
}

/// Binding of one subject to one endpoint. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessRight {
    pub endpoint: Endpoint,
    pub subject_id: SubjectId,
    pub rights_given: DateTime<Utc>,
}

// --- Local groups -----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LocalGroup {
    pub id: LocalGroupPk,
    /// Unique within the owning client.
    pub group_code: String,
    pub description: String,
    pub members: BTreeSet<ClientId>,
}

impl LocalGroup {
    pub fn new(id: LocalGroupPk, group_code: &str, description: &str) -> Self {
        LocalGroup {
            id,
            group_code: group_code.to_string(),
            description: description.to_string(),
            members: BTreeSet::new(),
        }
    }

    pub fn subject_id(&self) -> SubjectId {
        SubjectId::LocalGroup(LocalGroupId::new(&self.group_code))
    }
}

// --- Services ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Service {
    pub service_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Service {
    pub fn new(service_code: &str, service_version: Option<&str>) -> Self {
        Service {
            service_code: service_code.to_string(),
            service_version: service_version.map(str::to_string),
            title: None,
        }
    }

    /// `code.version`, or just `code` for unversioned services.
    pub fn full_service_code(&self) -> String {
        match &self.service_version {
            Some(version) => format!("{}.{}", self.service_code, version),
            None => self.service_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServiceDescription {
    pub url: String,
    pub kind: DescriptionType,
    pub services: Vec<Service>,
}

// --- Client aggregate -------------------------------------------------------

/// The transactional unit: every mutation loads a client, changes its owned
/// collections in memory and saves it back as a whole.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Bumped by the store on every successful save.
    pub version: u64,
    pub endpoints: Vec<Endpoint>,
    pub acl: Vec<AccessRight>,
    pub local_groups: Vec<LocalGroup>,
    pub service_descriptions: Vec<ServiceDescription>,
}

impl Client {
    pub fn new(id: ClientId) -> Self {
        Client {
            id,
            version: 0,
            endpoints: Vec::new(),
            acl: Vec::new(),
            local_groups: Vec::new(),
            service_descriptions: Vec::new(),
        }
    }

    pub fn local_group(&self, id: LocalGroupPk) -> Option<&LocalGroup> {
        self.local_groups.iter().find(|g| g.id == id)
    }

    /// Access rights attached to any endpoint of `service_code`.
    pub fn access_rights_for_service<'a>(&'a self, service_code: &'a str) -> impl Iterator<Item = &'a AccessRight> + 'a {
        self.acl.iter().filter(move |right| right.endpoint.service_code == service_code)
    }
}
