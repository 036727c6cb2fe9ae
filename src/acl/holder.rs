//! The caller-facing view of a subject that holds, or may hold, an access right.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::primitives::{AccessRight, Client, LocalGroup, SubjectId};
use crate::registry::{GlobalGroupInfo, MemberInfo};
use crate::types::LocalGroupPk;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessRightHolder {
    pub subject_id: SubjectId,
    /// Set only for holders built from an existing access right.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights_given: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_group_id: Option<LocalGroupPk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_group_code: Option<String>,
    /// Local group or global group description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AccessRightHolder {
    fn bare(subject_id: SubjectId) -> Self {
        AccessRightHolder {
            subject_id,
            rights_given: None,
            member_name: None,
            local_group_id: None,
            local_group_code: None,
            description: None,
        }
    }

    pub fn from_member(info: MemberInfo) -> Self {
        AccessRightHolder { member_name: Some(info.name), ..Self::bare(info.id.into()) }
    }

    pub fn from_global_group(info: GlobalGroupInfo) -> Self {
        AccessRightHolder { description: Some(info.description), ..Self::bare(info.id.into()) }
    }

    pub fn from_local_group(group: &LocalGroup) -> Self {
        Self::bare(group.subject_id()).with_local_group(group)
    }

    /// Builds the view of an existing right; local group details come from `index`.
    pub fn from_access_right(right: &AccessRight, index: &LocalGroupIndex<'_>) -> Self {
        let holder = AccessRightHolder { rights_given: Some(right.rights_given), ..Self::bare(right.subject_id.clone()) };
        match &right.subject_id {
            SubjectId::LocalGroup(local) => match index.get(local.group_code.as_str()) {
                Some(group) => holder.with_local_group(group),
                None => {
                    tracing::warn!(group_code = %local.group_code, "access right refers to a missing local group");
                    holder
                }
            },
            _ => holder,
        }
    }

    fn with_local_group(self, group: &LocalGroup) -> Self {
        AccessRightHolder {
            local_group_id: Some(group.id),
            local_group_code: Some(group.group_code.clone()),
            description: Some(group.description.clone()),
            ..self
        }
    }
}

/// Local groups keyed by group code.
pub type LocalGroupIndex<'a> = HashMap<&'a str, &'a LocalGroup>;

pub fn build_local_group_index(groups: &[LocalGroup]) -> LocalGroupIndex<'_> {
    groups.iter().map(|group| (group.group_code.as_str(), group)).collect()
}

/// Views of every access right attached to an endpoint of `service_code`.
pub fn holders_for_service(client: &Client, service_code: &str) -> Vec<AccessRightHolder> {
    let index = build_local_group_index(&client.local_groups);
    client
        .access_rights_for_service(service_code)
        .map(|right| AccessRightHolder::from_access_right(right, &index))
        .collect()
}
