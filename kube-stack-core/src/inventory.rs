//! Ansible dynamic inventory built from server metadata.
//!
//! Servers list the groups they belong to as a comma separated metadata value
//! (`kube_masters,etcd`) and may carry host variables as `key->value` pairs
//! separated by semicolons (`dns_domains->a.local,b.local;role->master`).
//! Only servers with a floating IP on the inventory network are included and
//! they are addressed by that IP.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::openstack::compute::Server;

pub const META_GROUP: &str = "_meta";

const GROUP_SEPARATOR: char = ',';
const HOST_VAR_SEPARATOR: char = ';';
const HOST_VAR_ASSIGNMENT: &str = "->";
const HOST_VAR_LIST_SEPARATOR: char = ',';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Server '{server}' has a malformed host variable '{pair}', expected 'key->value'!")]
    MalformedHostVar { server: String, pair: String },
}

#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub network: String,
    pub host_groups_key: String,
    pub host_vars_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HostVar {
    Value(String),
    List(Vec<String>),
}

pub type HostVars = BTreeMap<String, HostVar>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostGroup {
    pub hosts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryMeta {
    pub hostvars: BTreeMap<String, HostVars>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    #[serde(flatten)]
    pub groups: BTreeMap<String, HostGroup>,
    #[serde(rename = "_meta")]
    pub meta: InventoryMeta,
}

impl Inventory {
    pub fn build(servers: &[Server], config: &InventoryConfig) -> Result<Self, InventoryError> {
        let mut inventory = Inventory::default();

        for server in servers {
            let floating_ip = match server.floating_ip(&config.network) {
                Some(ip) => ip,
                None => {
                    debug!(
                        "Skipping '{}', it has no floating IP on the '{}' network",
                        server.name, config.network
                    );
                    continue;
                }
            };

            for group in host_groups(server, &config.host_groups_key) {
                inventory.add_host_to_group(group, floating_ip);
            }

            if let Some(vars) = host_vars(server, &config.host_vars_key)? {
                inventory.add_host_vars(floating_ip, vars);
            }
        }

        Ok(inventory)
    }

    /// Variables of a single host, empty when the host isn't known.
    pub fn host(&self, host: &str) -> HostVars {
        self.meta.hostvars.get(host).cloned().unwrap_or_default()
    }

    fn add_host_to_group(&mut self, group: &str, host: &str) {
        if group == META_GROUP {
            warn!("Ignoring the reserved '{META_GROUP}' group assigned to {host}!");
            return;
        }

        self.groups
            .entry(group.to_owned())
            .or_default()
            .hosts
            .push(host.to_owned());
    }

    fn add_host_vars(&mut self, host: &str, vars: HostVars) {
        self.meta
            .hostvars
            .entry(host.to_owned())
            .or_default()
            .extend(vars);
    }
}

fn host_groups<'a>(server: &'a Server, key: &str) -> impl Iterator<Item = &'a str> {
    server
        .metadata_value(key)
        .into_iter()
        .flat_map(|groups| groups.split(GROUP_SEPARATOR))
        .map(str::trim)
        .filter(|group| !group.is_empty())
}

fn host_vars(server: &Server, key: &str) -> Result<Option<HostVars>, InventoryError> {
    let raw = match server.metadata_value(key) {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let mut vars = HostVars::new();

    for pair in raw
        .split(HOST_VAR_SEPARATOR)
        .filter(|pair| !pair.trim().is_empty())
    {
        let (key, value) =
            pair.split_once(HOST_VAR_ASSIGNMENT)
                .ok_or_else(|| InventoryError::MalformedHostVar {
                    server: server.name.clone(),
                    pair: pair.to_owned(),
                })?;
        let values = value
            .split(HOST_VAR_LIST_SEPARATOR)
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let var = match values.len() {
            1 => HostVar::Value(value.to_owned()),
            _ => HostVar::List(values),
        };

        vars.insert(key.trim().to_owned(), var);
    }

    Ok(Some(vars))
}
