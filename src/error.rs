//!
//! Defines error types for the access-rights engine.

use crate::primitives::ClientId;
use crate::types::LocalGroupPk;

/// Errors reported by the access-rights engine. None of them are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// The referenced client id has no corresponding client.
    #[error("Client {0} not found")]
    ClientNotFound(ClientId),
    /// The full service code does not name a service of the client.
    #[error("Service {0} not found")]
    ServiceNotFound(String),
    /// A requested local group id does not exist under the client.
    #[error("LocalGroup with id {0} not found")]
    LocalGroupNotFound(LocalGroupPk),
    /// A subject identifier could not be verified against the global registry.
    #[error("Identifier not found in the global registry")]
    IdentifierNotFound,
    /// The grant collides with an existing access right.
    #[error("Subject {subject} already has an access right for service {service_code}")]
    DuplicateAccessRight { subject: String, service_code: String },
    /// The revoke names a subject that holds no access right on the service.
    #[error("Access right not found")]
    AccessRightNotFound,
    /// The global registry could not answer.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Reading or writing the persistent store failed.
    #[error("Storage error: {0}")]
    Storage(String),
    /// The client was saved by someone else since it was loaded.
    #[error("Client {0} was modified concurrently")]
    ConcurrentModification(ClientId),
}

/// Errors raised by a [`GlobalRegistry`](crate::registry::GlobalRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No global groups exist for the requested instances.
    #[error("No global groups found for instances {instances:?}")]
    NoGlobalGroups { instances: Vec<String> },
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while loading an [`AclConfig`](crate::config::AclConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
