use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::routes::{ReconcileError, Route, Router, RouterStore};

use super::{session::Service, OpenStackError, Session};

const ROUTERS_PATH: &str = "routers";

#[derive(Deserialize)]
struct RouterList {
    routers: Vec<Router>,
}

#[derive(Deserialize)]
struct RouterResponse {
    router: Router,
}

#[derive(Serialize)]
struct RouterRoutesUpdate<'a> {
    router: RouterRoutes<'a>,
}

#[derive(Serialize)]
struct RouterRoutes<'a> {
    routes: &'a [Route],
}

impl Session {
    pub async fn find_router_by_name(&self, name: &str) -> Result<Router, OpenStackError> {
        let list: RouterList = self
            .get(Service::Network, &self.network_url(ROUTERS_PATH), &[("name", name)])
            .await?;

        pick_router_by_name(list.routers, name)
    }

    /// Replaces the router's whole route table in one request.
    pub async fn put_router_routes(
        &self,
        router_id: &str,
        routes: &[Route],
    ) -> Result<Router, OpenStackError> {
        let url = self.network_url(&format!("{ROUTERS_PATH}/{router_id}"));
        let body = RouterRoutesUpdate {
            router: RouterRoutes { routes },
        };

        debug!("Submitting {} route(s) to router {router_id}", routes.len());

        let response: RouterResponse = self.put(Service::Network, &url, &body).await?;

        Ok(response.router)
    }
}

#[async_trait]
impl RouterStore for Session {
    async fn fetch_router(&self, name: &str) -> Result<Router, ReconcileError> {
        Ok(self.find_router_by_name(name).await?)
    }

    async fn update_router_routes(
        &self,
        router_id: &str,
        routes: &[Route],
    ) -> Result<(), ReconcileError> {
        self.put_router_routes(router_id, routes).await?;

        Ok(())
    }
}

fn pick_router_by_name(routers: Vec<Router>, name: &str) -> Result<Router, OpenStackError> {
    let mut matching = routers.into_iter().filter(|router| router.name == name);
    let router = matching
        .next()
        .ok_or_else(|| OpenStackError::NotFound("Router", name.to_owned()))?;

    if matching.next().is_some() {
        warn!("Multiple routers are named '{name}', using {}!", router.id);
    }

    Ok(router)
}
