use std::{
    collections::BTreeMap,
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_FILE_ENV_VAR: &str = "SETTINGS_FILE";
pub const DEFAULT_SETTINGS_FILENAME: &str = "settings.yaml";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Couldn't open settings file '{}': {}", .0.display(), .1)]
    IoError(PathBuf, std::io::Error),
    #[error("Couldn't parse settings file '{}': {}", .0.display(), .1)]
    DeserializationError(PathBuf, serde_yaml::Error),
    #[error("Settings are missing the '{}' key!", .0)]
    MissingKey(&'static str),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// node name to pod CIDR mapping, iterated in node name order
    #[serde(default)]
    pub node_pod_cidr: BTreeMap<String, String>,
    #[serde(default)]
    pub ansible_host_groups_key: Option<String>,
    #[serde(default)]
    pub ansible_host_vars_key: Option<String>,
    pub os_cloud_profile: CloudProfile,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudProfile {
    #[serde(default)]
    pub os_compute_api_version: Option<String>,
    #[serde(default)]
    pub os_username: Option<String>,
    #[serde(default)]
    pub os_password: Option<String>,
    #[serde(default)]
    pub os_tenant_name: Option<String>,
    #[serde(default)]
    pub os_auth_url: Option<String>,
    #[serde(default)]
    pub os_region_name: Option<String>,
    #[serde(default)]
    pub os_user_domain_name: Option<String>,
    #[serde(default)]
    pub os_project_domain_name: Option<String>,
    #[serde(default)]
    pub os_endpoint_interface: Option<String>,
    #[serde(default)]
    pub os_network_name: Option<String>,
    #[serde(default)]
    pub os_tenant_router_name: Option<String>,
}

impl Settings {
    /// Resolves the settings path: explicit path first, then `SETTINGS_FILE`,
    /// then `settings.yaml` in the working directory.
    pub fn resolve_path(path: Option<&Path>) -> PathBuf {
        match path {
            Some(path) => path.to_owned(),
            None => std::env::var_os(SETTINGS_FILE_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILENAME)),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        debug!("Used settings path: {path:?}");

        let file = File::open(path).map_err(|err| SettingsError::IoError(path.to_owned(), err))?;

        serde_yaml::from_reader(file)
            .map_err(|err| SettingsError::DeserializationError(path.to_owned(), err))
    }

    pub fn network_name(&self) -> Result<&str, SettingsError> {
        self.os_cloud_profile
            .os_network_name
            .as_deref()
            .ok_or(SettingsError::MissingKey("os_cloud_profile.os_network_name"))
    }

    pub fn tenant_router_name(&self) -> Result<&str, SettingsError> {
        self.os_cloud_profile
            .os_tenant_router_name
            .as_deref()
            .ok_or(SettingsError::MissingKey(
                "os_cloud_profile.os_tenant_router_name",
            ))
    }

    pub fn host_groups_key(&self) -> Result<&str, SettingsError> {
        self.ansible_host_groups_key
            .as_deref()
            .ok_or(SettingsError::MissingKey("ansible_host_groups_key"))
    }

    pub fn host_vars_key(&self) -> Result<&str, SettingsError> {
        self.ansible_host_vars_key
            .as_deref()
            .ok_or(SettingsError::MissingKey("ansible_host_vars_key"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}
