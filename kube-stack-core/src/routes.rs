use std::{
    collections::{BTreeMap, HashMap, HashSet},
    net::IpAddr,
};

use async_trait::async_trait;
use ipnet::IpNet;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ip::{canonical_cidr, InvalidCidr},
    openstack::{compute::Server, OpenStackError, Session},
};

/// Node name to pod CIDR, iterated in node name order.
pub type NodePodMapping = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Node '{node}' couldn't be resolved to an interface address: {reason}")]
    NodeNotFound { node: String, reason: String },
    #[error("Nodes '{first}' and '{second}' are both assigned the {cidr} pod CIDR!")]
    DuplicateCidr {
        cidr: IpNet,
        first: String,
        second: String,
    },
    #[error("Pod CIDR of node '{node}' is invalid: {source}")]
    InvalidCidr {
        node: String,
        #[source]
        source: InvalidCidr,
    },
    #[error("No node pod CIDRs are configured!")]
    EmptyMapping,
    #[error(transparent)]
    UpstreamUnavailable(#[from] OpenStackError),
}

/// A static route of a tenant router. Attributes other than the
/// destination and the next hop are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub nexthop: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Route {
    pub fn new(destination: impl Into<String>, nexthop: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            nexthop: nexthop.into(),
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Router {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[async_trait]
pub trait NodeAddressResolver {
    async fn resolve_node_address(&self, node: &str) -> Result<IpAddr, ReconcileError>;
}

#[async_trait]
pub trait RouterStore {
    async fn fetch_router(&self, name: &str) -> Result<Router, ReconcileError>;
    async fn update_router_routes(
        &self,
        router_id: &str,
        routes: &[Route],
    ) -> Result<(), ReconcileError>;
}

#[derive(Debug, Clone)]
pub struct RouteReconcilerConfig {
    pub router_name: String,
    pub node_pod_cidr: NodePodMapping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub router_id: String,
    pub routes: Vec<Route>,
    pub added: usize,
    pub updated: usize,
    pub applied: bool,
}

impl ReconcileReport {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.updated == 0
    }
}

pub struct RouteReconciler<R> {
    config: RouteReconcilerConfig,
    resolver: R,
}

impl<R: NodeAddressResolver + Sync> RouteReconciler<R> {
    pub fn new(config: RouteReconcilerConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    /// Computes the router's complete desired route set: pod routes get their
    /// next hop pointed at the owning node, missing pod routes are appended and
    /// everything else is kept as is, in order.
    pub async fn desired_routes(&self, current: &[Route]) -> Result<Vec<Route>, ReconcileError> {
        Ok(self.compute(current).await?.0)
    }

    /// Reads the router once, computes the desired routes and writes them back
    /// with a single update, unless `dry_run` is set.
    pub async fn reconcile<S: RouterStore + Sync>(
        &self,
        store: &S,
        dry_run: bool,
    ) -> Result<ReconcileReport, ReconcileError> {
        let router = store.fetch_router(&self.config.router_name).await?;

        info!(
            "Router '{}' ({}) has {} route(s)",
            router.name,
            router.id,
            router.routes.len()
        );

        let (routes, stats) = self.compute(&router.routes).await?;

        if dry_run {
            info!("Dry run, router '{}' is left untouched", router.name);
        } else {
            store.update_router_routes(&router.id, &routes).await?;
            info!(
                "Router '{}' updated: {} pod route(s) added, {} next hop(s) changed",
                router.name, stats.added, stats.updated
            );
        }

        Ok(ReconcileReport {
            router_id: router.id,
            routes,
            added: stats.added,
            updated: stats.updated,
            applied: !dry_run,
        })
    }

    async fn compute(&self, current: &[Route]) -> Result<(Vec<Route>, RouteStats), ReconcileError> {
        let pod_cidrs = PodCidrs::try_from(&self.config.node_pod_cidr)?;
        let mut stats = RouteStats::default();
        let mut seen = HashSet::new();
        let mut routes = Vec::with_capacity(current.len() + pod_cidrs.len());

        for route in current {
            let owned = canonical_cidr(&route.destination)
                .ok()
                .and_then(|cidr| pod_cidrs.owner(&cidr).map(|node| (cidr, node)));

            let (cidr, node) = match owned {
                Some(owned) => owned,
                None => {
                    routes.push(route.clone());
                    continue;
                }
            };

            if !seen.insert(cidr) {
                warn!(
                    "Dropping route to {} via {}, {cidr} is already routed!",
                    route.destination, route.nexthop
                );
                continue;
            }

            let nexthop = self.resolver.resolve_node_address(node).await?.to_string();

            if nexthop != route.nexthop {
                info!("Pod route {cidr} ({node}): {} -> {nexthop}", route.nexthop);
                stats.updated += 1;
            } else {
                debug!("Pod route {cidr} ({node}) via {nexthop} is up to date");
            }

            routes.push(Route {
                destination: cidr.to_string(),
                nexthop,
                extra: route.extra.clone(),
            });
        }

        for (cidr, node) in pod_cidrs.iter() {
            if seen.contains(cidr) {
                continue;
            }

            let nexthop = self.resolver.resolve_node_address(node).await?.to_string();

            info!("Pod route {cidr} ({node}) via {nexthop} added");
            stats.added += 1;

            routes.push(Route::new(cidr.to_string(), nexthop));
        }

        Ok((routes, stats))
    }
}

#[derive(Debug, Default)]
struct RouteStats {
    added: usize,
    updated: usize,
}

/// Canonical pod CIDRs with their owning nodes, in mapping order.
struct PodCidrs<'a> {
    ordered: Vec<(IpNet, &'a str)>,
    owners: HashMap<IpNet, &'a str>,
}

impl<'a> PodCidrs<'a> {
    fn owner(&self, cidr: &IpNet) -> Option<&'a str> {
        self.owners.get(cidr).copied()
    }

    fn iter(&self) -> impl Iterator<Item = &(IpNet, &'a str)> {
        self.ordered.iter()
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }
}

impl<'a> TryFrom<&'a NodePodMapping> for PodCidrs<'a> {
    type Error = ReconcileError;

    fn try_from(mapping: &'a NodePodMapping) -> Result<Self, Self::Error> {
        if mapping.is_empty() {
            return Err(ReconcileError::EmptyMapping);
        }

        let mut ordered = Vec::with_capacity(mapping.len());
        let mut owners = HashMap::with_capacity(mapping.len());

        for (node, cidr) in mapping {
            let cidr = canonical_cidr(cidr).map_err(|source| ReconcileError::InvalidCidr {
                node: node.to_owned(),
                source,
            })?;

            if let Some(first) = owners.insert(cidr, node.as_str()) {
                return Err(ReconcileError::DuplicateCidr {
                    cidr,
                    first: first.to_owned(),
                    second: node.to_owned(),
                });
            }

            ordered.push((cidr, node.as_str()));
        }

        Ok(Self { ordered, owners })
    }
}

/// Resolves nodes to the fixed address of the same-named server on `network`.
pub struct ServerAddressResolver<'a> {
    session: &'a Session,
    network: String,
}

impl<'a> ServerAddressResolver<'a> {
    pub fn new(session: &'a Session, network: impl Into<String>) -> Self {
        Self {
            session,
            network: network.into(),
        }
    }
}

#[async_trait]
impl NodeAddressResolver for ServerAddressResolver<'_> {
    async fn resolve_node_address(&self, node: &str) -> Result<IpAddr, ReconcileError> {
        let server = self
            .session
            .find_server_by_name(node)
            .await
            .map_err(|err| server_lookup_error(node, err))?;

        fixed_address(&server, &self.network, node)
    }
}

fn server_lookup_error(node: &str, err: OpenStackError) -> ReconcileError {
    match err {
        OpenStackError::NotFound(_, _) => ReconcileError::NodeNotFound {
            node: node.to_owned(),
            reason: "no server with this name exists".to_owned(),
        },
        err => err.into(),
    }
}

fn fixed_address(server: &Server, network: &str, node: &str) -> Result<IpAddr, ReconcileError> {
    let address = server
        .fixed_ip(network)
        .ok_or_else(|| ReconcileError::NodeNotFound {
            node: node.to_owned(),
            reason: format!("server has no fixed address on the '{network}' network"),
        })?;

    address.parse().map_err(|_| ReconcileError::NodeNotFound {
        node: node.to_owned(),
        reason: format!("'{address}' is not a valid IP address"),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::StatusCode;

    use crate::openstack::compute::{AddressType, ServerAddress};

    use super::*;

    struct StaticResolver {
        addresses: HashMap<String, IpAddr>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticResolver {
        fn new(addresses: &[(&str, &str)]) -> Self {
            Self {
                addresses: addresses
                    .iter()
                    .map(|(node, ip)| (node.to_string(), ip.parse().unwrap()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NodeAddressResolver for StaticResolver {
        async fn resolve_node_address(&self, node: &str) -> Result<IpAddr, ReconcileError> {
            self.calls.lock().unwrap().push(node.to_owned());
            self.addresses
                .get(node)
                .copied()
                .ok_or_else(|| ReconcileError::NodeNotFound {
                    node: node.to_owned(),
                    reason: "unknown".to_owned(),
                })
        }
    }

    #[async_trait]
    impl<T: NodeAddressResolver + Sync> NodeAddressResolver for &T {
        async fn resolve_node_address(&self, node: &str) -> Result<IpAddr, ReconcileError> {
            (**self).resolve_node_address(node).await
        }
    }

    struct MemoryRouterStore {
        router: Router,
        updates: Mutex<Vec<(String, Vec<Route>)>>,
        rejects_updates: bool,
    }

    impl MemoryRouterStore {
        fn new(routes: Vec<Route>) -> Self {
            Self {
                router: Router {
                    id: "0c3a7e2f".to_owned(),
                    name: "router1".to_owned(),
                    routes,
                },
                updates: Mutex::new(Vec::new()),
                rejects_updates: false,
            }
        }

        fn updates(&self) -> Vec<(String, Vec<Route>)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RouterStore for MemoryRouterStore {
        async fn fetch_router(&self, name: &str) -> Result<Router, ReconcileError> {
            match name == self.router.name {
                true => Ok(self.router.clone()),
                false => Err(OpenStackError::NotFound("Router", name.to_owned()).into()),
            }
        }

        async fn update_router_routes(
            &self,
            router_id: &str,
            routes: &[Route],
        ) -> Result<(), ReconcileError> {
            self.updates
                .lock()
                .unwrap()
                .push((router_id.to_owned(), routes.to_vec()));

            if self.rejects_updates {
                return Err(OpenStackError::UnexpectedStatus(
                    format!("routers/{router_id}"),
                    StatusCode::CONFLICT,
                    "Router is busy".to_owned(),
                )
                .into());
            }

            Ok(())
        }
    }

    fn mapping(entries: &[(&str, &str)]) -> NodePodMapping {
        entries
            .iter()
            .map(|(node, cidr)| (node.to_string(), cidr.to_string()))
            .collect()
    }

    fn reconciler<R: NodeAddressResolver + Sync>(
        entries: &[(&str, &str)],
        resolver: R,
    ) -> RouteReconciler<R> {
        RouteReconciler::new(
            RouteReconcilerConfig {
                router_name: "router1".to_owned(),
                node_pod_cidr: mapping(entries),
            },
            resolver,
        )
    }

    fn destinations(routes: &[Route]) -> HashMap<&str, &str> {
        routes
            .iter()
            .map(|r| (r.destination.as_str(), r.nexthop.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn stale_pod_route_is_updated_in_place() {
        let current = vec![
            Route::new("10.0.0.0/24", "1.2.3.4"),
            Route::new("0.0.0.0/0", "9.9.9.9"),
        ];
        let reconciler = reconciler(
            &[("node1", "10.0.0.0/24")],
            StaticResolver::new(&[("node1", "1.2.3.5")]),
        );

        let routes = reconciler.desired_routes(&current).await.unwrap();

        assert_eq!(
            routes,
            vec![
                Route::new("10.0.0.0/24", "1.2.3.5"),
                Route::new("0.0.0.0/0", "9.9.9.9"),
            ]
        );
    }

    #[tokio::test]
    async fn missing_pod_routes_are_appended_in_node_order() {
        let reconciler = reconciler(
            &[("node2", "10.0.2.0/24"), ("node1", "10.0.1.0/24")],
            StaticResolver::new(&[("node1", "5.5.5.1"), ("node2", "5.5.5.2")]),
        );

        let routes = reconciler.desired_routes(&[]).await.unwrap();

        assert_eq!(
            routes,
            vec![
                Route::new("10.0.1.0/24", "5.5.5.1"),
                Route::new("10.0.2.0/24", "5.5.5.2"),
            ]
        );
    }

    #[tokio::test]
    async fn non_pod_routes_keep_order_and_attributes() {
        let mut tagged = Route::new("172.16.0.0/12", "10.1.1.1");
        tagged
            .extra
            .insert("description".to_owned(), "vpn".into());
        let current = vec![
            Route::new("192.168.100.0/24", "10.1.1.254"),
            Route::new("10.0.3.0/24", "10.1.1.3"),
            tagged.clone(),
            Route::new("not-a-cidr", "10.1.1.9"),
        ];
        let reconciler = reconciler(
            &[("node3", "10.0.3.0/24"), ("node4", "10.0.4.0/24")],
            StaticResolver::new(&[("node3", "10.1.1.33"), ("node4", "10.1.1.44")]),
        );

        let routes = reconciler.desired_routes(&current).await.unwrap();
        let kept = routes
            .iter()
            .filter(|r| !["10.0.3.0/24", "10.0.4.0/24"].contains(&r.destination.as_str()))
            .cloned()
            .collect::<Vec<_>>();

        assert_eq!(
            kept,
            vec![
                Route::new("192.168.100.0/24", "10.1.1.254"),
                tagged,
                Route::new("not-a-cidr", "10.1.1.9"),
            ]
        );
        assert_eq!(routes[1], Route::new("10.0.3.0/24", "10.1.1.33"));
        assert_eq!(routes.last(), Some(&Route::new("10.0.4.0/24", "10.1.1.44")));
    }

    #[tokio::test]
    async fn pod_routes_are_complete_and_unique() {
        let current = vec![
            Route::new("10.0.1.0/24", "7.7.7.7"),
            Route::new("10.0.1.0/24", "8.8.8.8"),
            Route::new("0.0.0.0/0", "9.9.9.9"),
        ];
        let entries = [
            ("node1", "10.0.1.17/24"),
            ("node2", "10.0.2.0/24"),
            ("node3", "fd00:2::/64"),
        ];
        let reconciler = reconciler(
            &entries,
            StaticResolver::new(&[
                ("node1", "192.168.0.1"),
                ("node2", "192.168.0.2"),
                ("node3", "fd00::3"),
            ]),
        );

        let routes = reconciler.desired_routes(&current).await.unwrap();
        let by_destination = destinations(&routes);

        assert_eq!(by_destination.len(), routes.len());
        assert_eq!(by_destination["10.0.1.0/24"], "192.168.0.1");
        assert_eq!(by_destination["10.0.2.0/24"], "192.168.0.2");
        assert_eq!(by_destination["fd00:2::/64"], "fd00::3");
        assert_eq!(by_destination["0.0.0.0/0"], "9.9.9.9");
    }

    #[tokio::test]
    async fn second_run_yields_the_same_routes() {
        let current = vec![
            Route::new("0.0.0.0/0", "9.9.9.9"),
            Route::new("10.0.1.0/24", "1.1.1.1"),
        ];
        let resolver = StaticResolver::new(&[("node1", "5.5.5.1"), ("node2", "5.5.5.2")]);
        let reconciler = reconciler(
            &[("node1", "10.0.1.0/24"), ("node2", "10.0.2.0/24")],
            &resolver,
        );

        let first = reconciler.desired_routes(&current).await.unwrap();
        let second = reconciler.desired_routes(&first).await.unwrap();

        assert_eq!(destinations(&first), destinations(&second));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn duplicate_cidr_aborts_before_any_lookup() {
        let resolver = StaticResolver::new(&[("node1", "5.5.5.1"), ("node2", "5.5.5.2")]);
        let store = MemoryRouterStore::new(vec![Route::new("0.0.0.0/0", "9.9.9.9")]);
        let reconciler = reconciler(
            &[("node1", "10.0.0.0/24"), ("node2", "10.0.0.128/24")],
            &resolver,
        );

        let result = reconciler.reconcile(&store, false).await;

        assert!(matches!(
            result,
            Err(ReconcileError::DuplicateCidr { ref first, ref second, .. })
                if first == "node1" && second == "node2"
        ));
        assert!(resolver.calls().is_empty());
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn invalid_cidr_aborts_the_run() {
        let store = MemoryRouterStore::new(Vec::new());
        let reconciler = reconciler(
            &[("node1", "10.0.0.0/24"), ("node2", "10.0.0.0")],
            StaticResolver::new(&[("node1", "5.5.5.1"), ("node2", "5.5.5.2")]),
        );

        let result = reconciler.reconcile(&store, false).await;

        assert!(matches!(
            result,
            Err(ReconcileError::InvalidCidr { ref node, .. }) if node == "node2"
        ));
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn empty_mapping_is_rejected() {
        let reconciler = reconciler(&[], StaticResolver::new(&[]));

        assert!(matches!(
            reconciler.desired_routes(&[]).await,
            Err(ReconcileError::EmptyMapping)
        ));
    }

    #[tokio::test]
    async fn unresolvable_node_prevents_the_update() {
        let store = MemoryRouterStore::new(vec![Route::new("10.0.1.0/24", "1.1.1.1")]);
        let reconciler = reconciler(
            &[("node1", "10.0.1.0/24"), ("node2", "10.0.2.0/24")],
            StaticResolver::new(&[("node1", "5.5.5.1")]),
        );

        let result = reconciler.reconcile(&store, false).await;

        assert!(matches!(
            result,
            Err(ReconcileError::NodeNotFound { ref node, .. }) if node == "node2"
        ));
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn reconcile_applies_one_update_with_the_full_route_set() {
        let store = MemoryRouterStore::new(vec![
            Route::new("10.0.1.0/24", "1.1.1.1"),
            Route::new("0.0.0.0/0", "9.9.9.9"),
        ]);
        let reconciler = reconciler(
            &[("node1", "10.0.1.0/24"), ("node2", "10.0.2.0/24")],
            StaticResolver::new(&[("node1", "5.5.5.1"), ("node2", "5.5.5.2")]),
        );

        let report = reconciler.reconcile(&store, false).await.unwrap();
        let expected = vec![
            Route::new("10.0.1.0/24", "5.5.5.1"),
            Route::new("0.0.0.0/0", "9.9.9.9"),
            Route::new("10.0.2.0/24", "5.5.5.2"),
        ];

        assert_eq!(store.updates(), vec![("0c3a7e2f".to_owned(), expected.clone())]);
        assert_eq!(report.routes, expected);
        assert_eq!((report.added, report.updated), (1, 1));
        assert!(report.applied);
        assert!(!report.is_unchanged());
    }

    #[tokio::test]
    async fn dry_run_never_updates() {
        let store = MemoryRouterStore::new(vec![Route::new("10.0.1.0/24", "5.5.5.1")]);
        let reconciler = reconciler(
            &[("node1", "10.0.1.0/24")],
            StaticResolver::new(&[("node1", "5.5.5.1")]),
        );

        let report = reconciler.reconcile(&store, true).await.unwrap();

        assert!(store.updates().is_empty());
        assert!(!report.applied);
        assert!(report.is_unchanged());
    }

    #[tokio::test]
    async fn missing_router_is_an_upstream_error() {
        let mut store = MemoryRouterStore::new(Vec::new());
        store.router.name = "other".to_owned();
        let reconciler = reconciler(
            &[("node1", "10.0.1.0/24")],
            StaticResolver::new(&[("node1", "5.5.5.1")]),
        );

        let result = reconciler.reconcile(&store, false).await;

        assert!(matches!(
            result,
            Err(ReconcileError::UpstreamUnavailable(OpenStackError::NotFound("Router", _)))
        ));
    }

    #[tokio::test]
    async fn failed_update_ends_the_run() {
        let mut store = MemoryRouterStore::new(vec![Route::new("0.0.0.0/0", "9.9.9.9")]);
        store.rejects_updates = true;
        let reconciler = reconciler(
            &[("node1", "10.0.1.0/24")],
            StaticResolver::new(&[("node1", "5.5.5.1")]),
        );

        let result = reconciler.reconcile(&store, false).await;

        assert!(matches!(
            result,
            Err(ReconcileError::UpstreamUnavailable(OpenStackError::UnexpectedStatus(
                _,
                status,
                _
            ))) if status == StatusCode::CONFLICT
        ));
        assert_eq!(store.updates().len(), 1);
    }

    fn server(addresses: &[(&str, &str, AddressType)]) -> Server {
        let mut by_network: HashMap<String, Vec<ServerAddress>> = HashMap::new();

        for (network, addr, address_type) in addresses {
            by_network
                .entry(network.to_string())
                .or_default()
                .push(ServerAddress {
                    addr: addr.to_string(),
                    version: None,
                    address_type: Some(*address_type),
                });
        }

        Server {
            id: "7a1c".to_owned(),
            name: "kube-node-1".to_owned(),
            addresses: by_network,
            ..Default::default()
        }
    }

    #[test]
    fn node_address_is_the_fixed_address_on_the_network() {
        let server = server(&[
            ("private", "172.24.4.11", AddressType::Floating),
            ("private", "192.168.0.11", AddressType::Fixed),
            ("storage", "10.10.0.11", AddressType::Fixed),
        ]);

        assert_eq!(
            fixed_address(&server, "private", "kube-node-1").unwrap(),
            "192.168.0.11".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn node_without_fixed_address_is_not_found() {
        let server = server(&[
            ("private", "172.24.4.11", AddressType::Floating),
            ("storage", "10.10.0.11", AddressType::Fixed),
        ]);

        let error = fixed_address(&server, "private", "kube-node-1").unwrap_err();

        assert!(matches!(
            error,
            ReconcileError::NodeNotFound { ref node, ref reason }
                if node == "kube-node-1" && reason.contains("'private'")
        ));
    }

    #[test]
    fn node_with_malformed_fixed_address_is_not_found() {
        let server = server(&[("private", "192.168.0.300", AddressType::Fixed)]);

        let error = fixed_address(&server, "private", "kube-node-1").unwrap_err();

        assert!(matches!(
            error,
            ReconcileError::NodeNotFound { ref reason, .. } if reason.contains("192.168.0.300")
        ));
    }

    #[test]
    fn missing_server_is_not_found_but_other_failures_are_upstream() {
        let missing = server_lookup_error(
            "kube-node-9",
            OpenStackError::NotFound("Server", "kube-node-9".to_owned()),
        );
        let unavailable = server_lookup_error(
            "kube-node-9",
            OpenStackError::UnexpectedStatus(
                "servers/detail".to_owned(),
                StatusCode::SERVICE_UNAVAILABLE,
                String::new(),
            ),
        );

        assert!(matches!(
            missing,
            ReconcileError::NodeNotFound { ref node, .. } if node == "kube-node-9"
        ));
        assert!(matches!(
            unavailable,
            ReconcileError::UpstreamUnavailable(OpenStackError::UnexpectedStatus(..))
        ));
    }

    #[test]
    fn route_keeps_unknown_attributes_through_serde() {
        let route: Route = serde_json::from_str(
            r#"{"destination": "10.0.0.0/24", "nexthop": "1.2.3.4", "description": "pod"}"#,
        )
        .unwrap();

        assert_eq!(route.extra["description"], "pod");
        assert_eq!(
            serde_json::to_value(&route).unwrap(),
            serde_json::json!({"destination": "10.0.0.0/24", "nexthop": "1.2.3.4", "description": "pod"})
        );
    }
}
