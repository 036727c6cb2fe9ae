// Shared types that are not part of the identifier structs themselves but
// are used across the engine, the search filters and the stores.

/// Wildcard HTTP method of a generated endpoint.
pub const ANY_METHOD: &str = "*";

/// Wildcard path pattern of a generated endpoint.
pub const ANY_PATH: &str = "**";

/// Primary key of a local group inside the owning client.
pub type LocalGroupPk = u64;

/// Kind of a subject identifier.
///
/// `Member` and `Subsystem` share the same identifier struct
/// ([`ClientId`](crate::ClientId)); the presence of a subsystem code
/// decides which of the two a client id is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    /// A network member.
    Member,
    /// A subsystem of a network member.
    Subsystem,
    /// A network-wide group defined in the global registry.
    #[serde(rename = "GLOBALGROUP")]
    GlobalGroup,
    /// A group defined by, and visible to, a single client.
    #[serde(rename = "LOCALGROUP")]
    LocalGroup,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Member => "MEMBER",
            SubjectType::Subsystem => "SUBSYSTEM",
            SubjectType::GlobalGroup => "GLOBALGROUP",
            SubjectType::LocalGroup => "LOCALGROUP",
        }
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SubjectType {
    type Error = String; // Using String for a simple error message

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "MEMBER" => Ok(SubjectType::Member),
            "SUBSYSTEM" => Ok(SubjectType::Subsystem),
            "GLOBALGROUP" => Ok(SubjectType::GlobalGroup),
            "LOCALGROUP" => Ok(SubjectType::LocalGroup),
            _ => Err(format!("Invalid subject type: {}", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_type_parse_is_case_insensitive() {
        assert_eq!(SubjectType::try_from("subsystem"), Ok(SubjectType::Subsystem));
        assert_eq!(SubjectType::try_from("GlobalGroup"), Ok(SubjectType::GlobalGroup));
        assert!(SubjectType::try_from("SERVICE").is_err());
    }

    #[test]
    fn test_subject_type_display_round_trips() {
        for ty in [
            SubjectType::Member,
            SubjectType::Subsystem,
            SubjectType::GlobalGroup,
            SubjectType::LocalGroup,
        ] {
            assert_eq!(SubjectType::try_from(ty.to_string().as_str()), Ok(ty));
        }
    }

    #[test]
    fn test_subject_type_serde_names() {
        let json = serde_json::to_string(&SubjectType::GlobalGroup).unwrap();
        assert_eq!(json, "\"GLOBALGROUP\"");
        let parsed: SubjectType = serde_json::from_str("\"SUBSYSTEM\"").unwrap();
        assert_eq!(parsed, SubjectType::Subsystem);
    }
}
