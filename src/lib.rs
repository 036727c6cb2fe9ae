#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Service-ACL manages fine-grained access rights to the services a
//! federated data-exchange member exposes.
//!
//! The crate resolves subject identifiers against an external registry,
//! grants and revokes access rights on service endpoints, answers
//! "who may access service X" queries and searches candidate subjects
//! across members, global groups and client-local groups.

// Shared enums and constants (SubjectType, wildcard endpoint tokens).
pub mod types;

// Core data model (identifiers, endpoints, access rights, clients).
pub mod primitives;

// Re-export the data model at the crate root.
pub use primitives::*;

// Error types.
pub mod error;

// Global registry collaborator.
pub mod registry;

// Client and identifier persistence collaborators.
pub mod store;

// Service lookup and service type mapping.
pub mod service;

// Engine configuration.
pub mod config;

// Access-rights engine.
pub mod acl;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

pub use acl::{AccessRightHolder, AclEngine, SubjectSearch};
pub use config::{AclConfig, DuplicateCheck};
pub use error::AclError;
