use std::time::Duration;

use log::debug;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::{credentials::Credentials, helpers::join_url};

use super::{identity::authenticate, OpenStackError};

pub const COMPUTE_SERVICE_TYPE: &str = "compute";
pub const NETWORK_SERVICE_TYPE: &str = "network";
pub const NETWORK_API_VERSION_PATH: &str = "v2.0";

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const COMPUTE_MICROVERSION_HEADER: &str = "X-OpenStack-Nova-API-Version";
const USER_AGENT: &str = concat!("kube-stack/", env!("CARGO_PKG_VERSION"));

/// Service a request is addressed to. Compute requests carry the microversion
/// header, whatever host the URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Compute,
    Network,
}

/// An authenticated connection to a single cloud region.
pub struct Session {
    http: reqwest::Client,
    token: String,
    compute_endpoint: String,
    network_endpoint: String,
    compute_microversion: Option<String>,
}

impl Session {
    pub async fn connect(
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self, OpenStackError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| OpenStackError::Transport(credentials.auth_url.clone(), err))?;

        let identity = authenticate(&http, credentials).await?;
        let region = credentials.region_name.as_deref();
        let interface = credentials.interface.as_str();

        let compute_endpoint = identity
            .catalog
            .endpoint(COMPUTE_SERVICE_TYPE, interface, region)?
            .trim_end_matches('/')
            .to_owned();
        let network_endpoint = versioned_network_endpoint(
            identity
                .catalog
                .endpoint(NETWORK_SERVICE_TYPE, interface, region)?,
        );

        debug!("Using compute endpoint {compute_endpoint}");
        debug!("Using network endpoint {network_endpoint}");

        Ok(Self {
            http,
            token: identity.token,
            compute_endpoint,
            network_endpoint,
            compute_microversion: compute_microversion(&credentials.compute_api_version),
        })
    }

    pub fn compute_url(&self, path: &str) -> String {
        join_url(&self.compute_endpoint, path)
    }

    pub fn network_url(&self, path: &str) -> String {
        join_url(&self.network_endpoint, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        service: Service,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, OpenStackError> {
        debug!("GET {url} {query:?}");

        let request = self.authorized(service, self.http.get(url)).query(query);

        decode(url, send(url, request).await?).await
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        service: Service,
        url: &str,
        body: &B,
    ) -> Result<T, OpenStackError> {
        debug!("PUT {url}");

        let request = self.authorized(service, self.http.put(url)).json(body);

        decode(url, send(url, request).await?).await
    }

    fn authorized(&self, service: Service, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(AUTH_TOKEN_HEADER, &self.token);

        match (service, &self.compute_microversion) {
            (Service::Compute, Some(version)) => {
                request.header(COMPUTE_MICROVERSION_HEADER, version)
            }
            _ => request,
        }
    }
}

async fn send(url: &str, request: RequestBuilder) -> Result<Response, OpenStackError> {
    let response = request
        .send()
        .await
        .map_err(|err| OpenStackError::Transport(url.to_owned(), err))?;
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        let text = response.text().await.unwrap_or_default();
        return Err(OpenStackError::Unauthorized(url.to_owned(), text));
    }

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(OpenStackError::UnexpectedStatus(url.to_owned(), status, text));
    }

    Ok(response)
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, OpenStackError> {
    response
        .json::<T>()
        .await
        .map_err(|err| OpenStackError::Decode(url.to_owned(), err))
}

/// Neutron's catalog entry usually omits the API version, some deployments include it.
fn versioned_network_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');

    if endpoint.ends_with(NETWORK_API_VERSION_PATH) {
        endpoint.to_owned()
    } else {
        join_url(endpoint, NETWORK_API_VERSION_PATH)
    }
}

/// Plain major versions ("2") need no header, microversions ("2.26") are requested explicitly.
fn compute_microversion(version: &str) -> Option<String> {
    let version = version.trim();

    version.contains('.').then(|| version.to_owned())
}
