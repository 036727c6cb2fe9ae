//! Service lookup and the mapping between service description kinds and
//! service types.

use crate::error::AclError;
use crate::primitives::{Client, Service};

/// Format of the document a client's services were imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DescriptionType {
    Wsdl,
    Openapi3,
    Rest,
}

/// Protocol family of a service as presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceType {
    Wsdl,
    Rest,
}

const SERVICE_TYPE_MAPPINGS: [(DescriptionType, ServiceType); 2] = [
    (DescriptionType::Wsdl, ServiceType::Wsdl),
    (DescriptionType::Openapi3, ServiceType::Rest),
];

impl DescriptionType {
    /// Matching service type, if any. Plain REST descriptions have none.
    pub fn service_type(self) -> Option<ServiceType> {
        SERVICE_TYPE_MAPPINGS.iter().find(|(d, _)| *d == self).map(|(_, s)| *s)
    }
}

impl ServiceType {
    pub fn description_type(self) -> Option<DescriptionType> {
        SERVICE_TYPE_MAPPINGS.iter().find(|(_, s)| *s == self).map(|(d, _)| *d)
    }
}

/// Finds a service of a client by its full service code (`code.version`).
pub trait ServiceLookup: Send + Sync {
    fn find_service(&self, client: &Client, full_service_code: &str) -> Result<Service, AclError>;
}

/// Looks services up in the client's own service descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionLookup;

impl ServiceLookup for DescriptionLookup {
    fn find_service(&self, client: &Client, full_service_code: &str) -> Result<Service, AclError> {
        client
            .service_descriptions
            .iter()
            .flat_map(|description| description.services.iter())
            .find(|service| service.full_service_code() == full_service_code)
            .cloned()
            .ok_or_else(|| AclError::ServiceNotFound(full_service_code.to_string()))
    }
}

/// Service type of the description that declares `service_code`, if any.
pub fn service_type_of(client: &Client, service_code: &str) -> Option<ServiceType> {
    client
        .service_descriptions
        .iter()
        .find(|description| description.services.iter().any(|s| s.service_code == service_code))
        .and_then(|description| description.kind.service_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{ClientId, ServiceDescription};

    fn client_with_services() -> Client {
        let mut client = Client::new(ClientId::subsystem("EE", "GOV", "1", "SUB"));
        client.service_descriptions.push(ServiceDescription {
            url: "https://example.org/openapi.yaml".into(),
            kind: DescriptionType::Openapi3,
            services: vec![Service::new("getData", Some("v1")), Service::new("ping", None)],
        });
        client
    }

    #[test]
    fn test_mapping_both_directions() {
        assert_eq!(DescriptionType::Wsdl.service_type(), Some(ServiceType::Wsdl));
        assert_eq!(DescriptionType::Openapi3.service_type(), Some(ServiceType::Rest));
        assert_eq!(DescriptionType::Rest.service_type(), None);
        assert_eq!(ServiceType::Rest.description_type(), Some(DescriptionType::Openapi3));
        assert_eq!(ServiceType::Wsdl.description_type(), Some(DescriptionType::Wsdl));
    }

    #[test]
    fn test_find_service_by_full_code() {
        let client = client_with_services();
        let service = DescriptionLookup.find_service(&client, "getData.v1").unwrap();
        assert_eq!(service.service_code, "getData");
        assert!(DescriptionLookup.find_service(&client, "ping").is_ok());
        assert_eq!(
            DescriptionLookup.find_service(&client, "getData"),
            Err(AclError::ServiceNotFound("getData".into()))
        );
    }

    #[test]
    fn test_service_type_of() {
        let client = client_with_services();
        assert_eq!(service_type_of(&client, "getData"), Some(ServiceType::Rest));
        assert_eq!(service_type_of(&client, "missing"), None);
    }
}
