use derive_builder::{Builder, UninitializedFieldError};
use thiserror::Error;

use crate::{helpers::AndIfSome, settings::CloudProfile};

pub const DEFAULT_COMPUTE_API_VERSION: &str = "2";
pub const DEFAULT_DOMAIN_NAME: &str = "Default";
pub const DEFAULT_ENDPOINT_INTERFACE: &str = "public";

pub const OS_COMPUTE_API_VERSION: &str = "OS_COMPUTE_API_VERSION";
pub const OS_USERNAME: &str = "OS_USERNAME";
pub const OS_PASSWORD: &str = "OS_PASSWORD";
pub const OS_TENANT_NAME: &str = "OS_TENANT_NAME";
pub const OS_PROJECT_NAME: &str = "OS_PROJECT_NAME";
pub const OS_AUTH_URL: &str = "OS_AUTH_URL";
pub const OS_REGION_NAME: &str = "OS_REGION_NAME";
pub const OS_USER_DOMAIN_NAME: &str = "OS_USER_DOMAIN_NAME";
pub const OS_PROJECT_DOMAIN_NAME: &str = "OS_PROJECT_DOMAIN_NAME";
pub const OS_INTERFACE: &str = "OS_INTERFACE";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Environment variable {} is not defined and the settings file provides no fallback!", .0)]
    Missing(&'static str),
    #[error("Couldn't assemble the credentials: {}", .0)]
    Invalid(String),
}

impl From<CredentialsBuilderError> for CredentialsError {
    fn from(value: CredentialsBuilderError) -> Self {
        match value {
            CredentialsBuilderError::UninitializedField(field) => {
                CredentialsError::Missing(field_env_var(field))
            }
            CredentialsBuilderError::ValidationError(message) => {
                CredentialsError::Invalid(message)
            }
        }
    }
}

#[derive(Clone, Builder)]
#[builder(pattern = "owned", setter(into), build_fn(error = "CredentialsBuilderError"))]
pub struct Credentials {
    #[builder(default = "DEFAULT_COMPUTE_API_VERSION.to_owned()")]
    pub compute_api_version: String,
    pub username: String,
    pub password: String,
    pub tenant_name: String,
    pub auth_url: String,
    #[builder(default)]
    pub region_name: Option<String>,
    #[builder(default = "DEFAULT_DOMAIN_NAME.to_owned()")]
    pub user_domain_name: String,
    #[builder(default = "DEFAULT_DOMAIN_NAME.to_owned()")]
    pub project_domain_name: String,
    #[builder(default = "DEFAULT_ENDPOINT_INTERFACE.to_owned()")]
    pub interface: String,
}

#[derive(Debug)]
pub enum CredentialsBuilderError {
    UninitializedField(&'static str),
    ValidationError(String),
}

impl From<UninitializedFieldError> for CredentialsBuilderError {
    fn from(value: UninitializedFieldError) -> Self {
        Self::UninitializedField(value.field_name())
    }
}

impl From<String> for CredentialsBuilderError {
    fn from(value: String) -> Self {
        Self::ValidationError(value)
    }
}

impl Credentials {
    /// Environment variables take precedence, the cloud profile from the settings
    /// file fills in whatever isn't set.
    pub fn from_env(profile: &CloudProfile) -> Result<Self, CredentialsError> {
        Self::from_lookup(profile, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        profile: &CloudProfile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CredentialsError> {
        let pick = |vars: &[&str], fallback: &Option<String>| {
            vars.iter()
                .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
                .or_else(|| fallback.clone())
        };

        let credentials = CredentialsBuilder::default()
            .and_if_some(
                || pick(&[OS_COMPUTE_API_VERSION], &profile.os_compute_api_version),
                |b, v| b.compute_api_version(v),
            )
            .and_if_some(
                || pick(&[OS_USERNAME], &profile.os_username),
                |b, v| b.username(v),
            )
            .and_if_some(
                || pick(&[OS_PASSWORD], &profile.os_password),
                |b, v| b.password(v),
            )
            .and_if_some(
                || pick(&[OS_TENANT_NAME, OS_PROJECT_NAME], &profile.os_tenant_name),
                |b, v| b.tenant_name(v),
            )
            .and_if_some(
                || pick(&[OS_AUTH_URL], &profile.os_auth_url),
                |b, v| b.auth_url(v),
            )
            .and_if_some(
                || pick(&[OS_REGION_NAME], &profile.os_region_name),
                |b, v| b.region_name(v),
            )
            .and_if_some(
                || pick(&[OS_USER_DOMAIN_NAME], &profile.os_user_domain_name),
                |b, v| b.user_domain_name(v),
            )
            .and_if_some(
                || pick(&[OS_PROJECT_DOMAIN_NAME], &profile.os_project_domain_name),
                |b, v| b.project_domain_name(v),
            )
            .and_if_some(
                || pick(&[OS_INTERFACE], &profile.os_endpoint_interface),
                |b, v| b.interface(v),
            )
            .build()?;

        Ok(credentials)
    }
}

fn field_env_var(field: &str) -> &'static str {
    match field {
        "compute_api_version" => OS_COMPUTE_API_VERSION,
        "username" => OS_USERNAME,
        "password" => OS_PASSWORD,
        "tenant_name" => OS_TENANT_NAME,
        "auth_url" => OS_AUTH_URL,
        "region_name" => OS_REGION_NAME,
        "user_domain_name" => OS_USER_DOMAIN_NAME,
        "project_domain_name" => OS_PROJECT_DOMAIN_NAME,
        _ => OS_INTERFACE,
    }
}
