use log::{debug, info};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::{credentials::Credentials, helpers::join_url};

use super::OpenStackError;

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityVersion {
    V2,
    V3,
}

impl IdentityVersion {
    /// Keystone v2.0 is only used when the auth URL points at it explicitly.
    pub fn from_auth_url(auth_url: &str) -> Self {
        match auth_url.trim_end_matches('/').ends_with("/v2.0") {
            true => IdentityVersion::V2,
            false => IdentityVersion::V3,
        }
    }

    pub fn tokens_url(&self, auth_url: &str) -> String {
        let auth_url = auth_url.trim_end_matches('/');

        match self {
            IdentityVersion::V2 => join_url(auth_url, "tokens"),
            IdentityVersion::V3 if auth_url.ends_with("/v3") => join_url(auth_url, "auth/tokens"),
            IdentityVersion::V3 => join_url(auth_url, "v3/auth/tokens"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub token: String,
    pub catalog: ServiceCatalog,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    pub services: Vec<CatalogService>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogService {
    pub service_type: String,
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoint {
    pub interface: String,
    pub region: Option<String>,
    pub url: String,
}

impl ServiceCatalog {
    pub fn endpoint(
        &self,
        service_type: &str,
        interface: &str,
        region: Option<&str>,
    ) -> Result<&str, OpenStackError> {
        self.services
            .iter()
            .filter(|service| service.service_type == service_type)
            .flat_map(|service| service.endpoints.iter())
            .find(|endpoint| {
                endpoint.interface == interface
                    && region.map_or(true, |region| endpoint.region.as_deref() == Some(region))
            })
            .map(|endpoint| endpoint.url.as_str())
            .ok_or_else(|| OpenStackError::MissingEndpoint {
                service: service_type.to_owned(),
                interface: interface.to_owned(),
                region: region.map(str::to_owned),
            })
    }
}

pub async fn authenticate(
    http: &reqwest::Client,
    credentials: &Credentials,
) -> Result<Identity, OpenStackError> {
    let version = IdentityVersion::from_auth_url(&credentials.auth_url);
    let url = version.tokens_url(&credentials.auth_url);
    let body = match version {
        IdentityVersion::V2 => v2_request_body(credentials),
        IdentityVersion::V3 => v3_request_body(credentials),
    };

    info!(
        "Authenticating as '{}' in '{}' ({version:?})...",
        credentials.username, credentials.tenant_name
    );

    let response = http
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|err| OpenStackError::Transport(url.clone(), err))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let text = response.text().await.unwrap_or_default();
        return Err(OpenStackError::Unauthorized(url, text));
    }

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(OpenStackError::UnexpectedStatus(url, status, text));
    }

    let identity = match version {
        IdentityVersion::V2 => {
            let token_response = response
                .json::<V2TokenResponse>()
                .await
                .map_err(|err| OpenStackError::Decode(url.clone(), err))?;

            token_response.into()
        }
        IdentityVersion::V3 => {
            let token = response
                .headers()
                .get(SUBJECT_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
                .ok_or(OpenStackError::MissingToken)?;
            let token_response = response
                .json::<V3TokenResponse>()
                .await
                .map_err(|err| OpenStackError::Decode(url.clone(), err))?;

            Identity {
                token,
                catalog: token_response.into(),
            }
        }
    };

    debug!(
        "Service catalog contains: {:?}",
        identity
            .catalog
            .services
            .iter()
            .map(|s| s.service_type.as_str())
            .collect::<Vec<_>>()
    );

    Ok(identity)
}

fn v2_request_body(credentials: &Credentials) -> serde_json::Value {
    json!({
        "auth": {
            "tenantName": credentials.tenant_name,
            "passwordCredentials": {
                "username": credentials.username,
                "password": credentials.password,
            }
        }
    })
}

fn v3_request_body(credentials: &Credentials) -> serde_json::Value {
    json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": credentials.username,
                        "domain": { "name": credentials.user_domain_name },
                        "password": credentials.password,
                    }
                }
            },
            "scope": {
                "project": {
                    "name": credentials.tenant_name,
                    "domain": { "name": credentials.project_domain_name },
                }
            }
        }
    })
}

#[derive(Deserialize)]
struct V3TokenResponse {
    token: V3Token,
}

#[derive(Deserialize)]
struct V3Token {
    #[serde(default)]
    catalog: Vec<V3Service>,
}

#[derive(Deserialize)]
struct V3Service {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<V3Endpoint>,
}

#[derive(Deserialize)]
struct V3Endpoint {
    interface: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    region_id: Option<String>,
    url: String,
}

impl From<V3TokenResponse> for ServiceCatalog {
    fn from(value: V3TokenResponse) -> Self {
        ServiceCatalog {
            services: value
                .token
                .catalog
                .into_iter()
                .map(|service| CatalogService {
                    service_type: service.service_type,
                    endpoints: service
                        .endpoints
                        .into_iter()
                        .map(|endpoint| CatalogEndpoint {
                            interface: endpoint.interface,
                            region: endpoint.region.or(endpoint.region_id),
                            url: endpoint.url,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct V2TokenResponse {
    access: V2Access,
}

#[derive(Deserialize)]
struct V2Access {
    token: V2Token,
    #[serde(default, rename = "serviceCatalog")]
    service_catalog: Vec<V2Service>,
}

#[derive(Deserialize)]
struct V2Token {
    id: String,
}

#[derive(Deserialize)]
struct V2Service {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<V2Endpoint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V2Endpoint {
    #[serde(default)]
    region: Option<String>,
    #[serde(default, rename = "publicURL")]
    public_url: Option<String>,
    #[serde(default, rename = "internalURL")]
    internal_url: Option<String>,
    #[serde(default, rename = "adminURL")]
    admin_url: Option<String>,
}

impl From<V2TokenResponse> for Identity {
    fn from(value: V2TokenResponse) -> Self {
        let services = value
            .access
            .service_catalog
            .into_iter()
            .map(|service| CatalogService {
                service_type: service.service_type,
                endpoints: service
                    .endpoints
                    .into_iter()
                    .flat_map(|endpoint| {
                        let region = endpoint.region;

                        [
                            ("public", endpoint.public_url),
                            ("internal", endpoint.internal_url),
                            ("admin", endpoint.admin_url),
                        ]
                        .into_iter()
                        .filter_map(move |(interface, url)| {
                            url.map(|url| CatalogEndpoint {
                                interface: interface.to_owned(),
                                region: region.clone(),
                                url,
                            })
                        })
                    })
                    .collect(),
            })
            .collect();

        Identity {
            token: value.access.token.id,
            catalog: ServiceCatalog { services },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V3_RESPONSE: &str = r#"{
        "token": {
            "methods": ["password"],
            "catalog": [
                {
                    "type": "compute",
                    "name": "nova",
                    "endpoints": [
                        { "interface": "internal", "region": "RegionOne", "url": "http://10.0.0.1:8774/v2.1" },
                        { "interface": "public", "region": "RegionOne", "url": "https://cloud:8774/v2.1" },
                        { "interface": "public", "region_id": "RegionTwo", "url": "https://cloud2:8774/v2.1" }
                    ]
                },
                {
                    "type": "network",
                    "name": "neutron",
                    "endpoints": [
                        { "interface": "public", "region": "RegionOne", "url": "https://cloud:9696" }
                    ]
                }
            ]
        }
    }"#;

    const V2_RESPONSE: &str = r#"{
        "access": {
            "token": { "id": "v2-token", "expires": "2030-01-01T00:00:00Z" },
            "serviceCatalog": [
                {
                    "type": "compute",
                    "name": "nova",
                    "endpoints": [
                        {
                            "region": "RegionOne",
                            "publicURL": "https://cloud:8774/v2/abc",
                            "internalURL": "http://10.0.0.1:8774/v2/abc"
                        }
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn identity_version_follows_auth_url() {
        assert_eq!(
            IdentityVersion::from_auth_url("http://keystone:5000/v2.0/"),
            IdentityVersion::V2
        );
        assert_eq!(
            IdentityVersion::from_auth_url("http://keystone:5000/v3"),
            IdentityVersion::V3
        );
        assert_eq!(
            IdentityVersion::from_auth_url("http://keystone:5000"),
            IdentityVersion::V3
        );
    }

    #[test]
    fn tokens_url_is_built_per_version() {
        assert_eq!(
            IdentityVersion::V2.tokens_url("http://keystone:5000/v2.0"),
            "http://keystone:5000/v2.0/tokens"
        );
        assert_eq!(
            IdentityVersion::V3.tokens_url("http://keystone:5000/v3/"),
            "http://keystone:5000/v3/auth/tokens"
        );
        assert_eq!(
            IdentityVersion::V3.tokens_url("http://keystone:5000"),
            "http://keystone:5000/v3/auth/tokens"
        );
    }

    #[test]
    fn v3_catalog_selects_interface_and_region() {
        let response: V3TokenResponse = serde_json::from_str(V3_RESPONSE).unwrap();
        let catalog: ServiceCatalog = response.into();

        assert_eq!(
            catalog.endpoint("compute", "public", None).unwrap(),
            "https://cloud:8774/v2.1"
        );
        assert_eq!(
            catalog.endpoint("compute", "public", Some("RegionTwo")).unwrap(),
            "https://cloud2:8774/v2.1"
        );
        assert_eq!(
            catalog.endpoint("compute", "internal", None).unwrap(),
            "http://10.0.0.1:8774/v2.1"
        );
        assert_eq!(
            catalog.endpoint("network", "public", None).unwrap(),
            "https://cloud:9696"
        );
        assert!(matches!(
            catalog.endpoint("network", "public", Some("RegionTwo")),
            Err(OpenStackError::MissingEndpoint { .. })
        ));
    }

    #[test]
    fn v2_catalog_is_flattened_into_interfaces() {
        let response: V2TokenResponse = serde_json::from_str(V2_RESPONSE).unwrap();
        let identity: Identity = response.into();

        assert_eq!(identity.token, "v2-token");
        assert_eq!(
            identity.catalog.endpoint("compute", "public", Some("RegionOne")).unwrap(),
            "https://cloud:8774/v2/abc"
        );
        assert_eq!(
            identity.catalog.endpoint("compute", "internal", None).unwrap(),
            "http://10.0.0.1:8774/v2/abc"
        );
        assert!(identity.catalog.endpoint("compute", "admin", None).is_err());
    }

    #[test]
    fn missing_endpoint_error_names_the_region() {
        let catalog = ServiceCatalog::default();
        let error = catalog
            .endpoint("network", "public", Some("RegionOne"))
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "No 'network' endpoint with 'public' interface in region 'RegionOne' in the service catalog!"
        );
    }
}
