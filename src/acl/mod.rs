pub mod endpoint;
pub mod engine;
pub mod holder;
pub mod reconcile;
pub mod search;


// Re-export the primary types so callers can use `crate::acl::*` paths.
pub use engine::AclEngine;
pub use holder::AccessRightHolder;
pub use search::{SearchClause, SubjectSearch};
