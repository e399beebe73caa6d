use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{session::Service, OpenStackError, Session};

const SERVERS_DETAIL_PATH: &str = "servers/detail";
const NEXT_LINK_REL: &str = "next";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Fixed,
    Floating,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerAddress {
    pub addr: String,
    #[serde(default)]
    pub version: Option<u8>,
    #[serde(default, rename = "OS-EXT-IPS:type")]
    pub address_type: Option<AddressType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub addresses: HashMap<String, Vec<ServerAddress>>,
}

impl Server {
    /// First address of the given type attached to `network`.
    pub fn address_on(&self, network: &str, address_type: AddressType) -> Option<&str> {
        self.addresses
            .get(network)?
            .iter()
            .find(|address| address.address_type == Some(address_type))
            .map(|address| address.addr.as_str())
    }

    pub fn floating_ip(&self, network: &str) -> Option<&str> {
        self.address_on(network, AddressType::Floating)
    }

    pub fn fixed_ip(&self, network: &str) -> Option<&str> {
        self.address_on(network, AddressType::Fixed)
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Deserialize)]
struct ServerList {
    servers: Vec<Server>,
    #[serde(default)]
    servers_links: Vec<Link>,
}

#[derive(Deserialize)]
struct Link {
    href: String,
    rel: String,
}

impl Session {
    /// Lists servers with details, following pagination links.
    pub async fn list_servers(&self, query: &[(&str, &str)]) -> Result<Vec<Server>, OpenStackError> {
        let mut servers = Vec::new();
        let mut page: ServerList = self
            .get(Service::Compute, &self.compute_url(SERVERS_DETAIL_PATH), query)
            .await?;

        loop {
            servers.append(&mut page.servers);

            let next = page
                .servers_links
                .iter()
                .find(|link| link.rel == NEXT_LINK_REL)
                .map(|link| link.href.clone());

            match next {
                Some(href) => {
                    debug!("Fetching next page of servers: {href}");
                    page = self.get(Service::Compute, &href, &[]).await?;
                }
                None => break,
            }
        }

        debug!("Listed {} server(s)", servers.len());

        Ok(servers)
    }

    /// Finds a server by its exact name. Nova treats the name filter as a regex,
    /// so the name is anchored and escaped before it's sent.
    pub async fn find_server_by_name(&self, name: &str) -> Result<Server, OpenStackError> {
        let filter = exact_name_filter(name);
        let servers = self.list_servers(&[("name", filter.as_str())]).await?;

        pick_server_by_name(servers, name)
    }
}

fn exact_name_filter(name: &str) -> String {
    format!("^{}$", regex::escape(name))
}

fn pick_server_by_name(servers: Vec<Server>, name: &str) -> Result<Server, OpenStackError> {
    let mut matching = servers.into_iter().filter(|server| server.name == name);
    let server = matching
        .next()
        .ok_or_else(|| OpenStackError::NotFound("Server", name.to_owned()))?;

    if matching.next().is_some() {
        warn!("Multiple servers are named '{name}', using {}!", server.id);
    }

    Ok(server)
}
