//! Endpoint resolution.

use crate::primitives::{Client, Endpoint};
use crate::types::{ANY_METHOD, ANY_PATH};

/// Returns the client's endpoint for (service, method, path), creating and
/// registering it on the client when it does not exist yet.
pub fn resolve_or_create(client: &mut Client, service_code: &str, method: &str, path: &str, generated: bool) -> Endpoint {
    if let Some(existing) = client.endpoints.iter().find(|e| e.matches(service_code, method, path)) {
        return existing.clone();
    }
    let endpoint = Endpoint {
        service_code: service_code.to_string(),
        method: method.to_string(),
        path: path.to_string(),
        generated,
    };
    tracing::debug!(client = %client.id, service_code, method, path, "created endpoint");
    client.endpoints.push(endpoint.clone());
    endpoint
}

/// The generated "any method, any path" endpoint of a service.
pub fn resolve_default(client: &mut Client, service_code: &str) -> Endpoint {
    resolve_or_create(client, service_code, ANY_METHOD, ANY_PATH, true)
}
