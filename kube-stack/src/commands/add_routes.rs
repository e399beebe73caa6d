use std::collections::HashMap;

use anyhow::Context;
use kube_stack_core::{
    ip::canonical_cidr,
    routes::{
        NodePodMapping, ReconcileReport, Route, RouteReconciler, RouteReconcilerConfig,
        ServerAddressResolver,
    },
};
use kube_stack_macros::TableOutputRow;
use log::info;
use serde::Serialize;

use crate::{
    cli::AddRoutesArgs,
    context::CloudContext,
    output::{CliPrint, TableCellOption},
};

pub async fn add_routes(args: AddRoutesArgs, context: CloudContext) -> anyhow::Result<()> {
    let settings = context.settings();
    let network = settings.network_name()?;
    let router_name = settings.tenant_router_name()?;

    let session = context.connect().await?;
    let reconciler = RouteReconciler::new(
        RouteReconcilerConfig {
            router_name: router_name.to_owned(),
            node_pod_cidr: settings.node_pod_cidr.clone(),
        },
        ServerAddressResolver::new(&session, network),
    );

    let report = reconciler
        .reconcile(&session, args.dry_run)
        .await
        .with_context(|| format!("Couldn't reconcile the routes of router '{router_name}'!"))?;

    if report.is_unchanged() {
        info!("Pod routes of router '{router_name}' were already up to date");
    }

    if !report.applied {
        route_views(&report, &settings.node_pod_cidr).print(args.output)?;
    }

    Ok(())
}

#[derive(Serialize, TableOutputRow)]
struct RouteView<'a> {
    #[name_column]
    destination: &'a str,
    #[column(header = "NEXT HOP")]
    nexthop: &'a str,
    node: TableCellOption<&'a str>,
}

fn route_views<'a>(report: &'a ReconcileReport, mapping: &'a NodePodMapping) -> Vec<RouteView<'a>> {
    let owners = mapping
        .iter()
        .filter_map(|(node, cidr)| Some((canonical_cidr(cidr).ok()?, node.as_str())))
        .collect::<HashMap<_, _>>();

    report
        .routes
        .iter()
        .map(|route: &'a Route| RouteView {
            destination: &route.destination,
            nexthop: &route.nexthop,
            node: canonical_cidr(&route.destination)
                .ok()
                .and_then(|cidr| owners.get(&cidr).copied())
                .into(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::output::TableOutputRow;

    use super::*;

    #[test]
    fn route_views_name_the_owning_node() {
        let report = ReconcileReport {
            router_id: "0c3a7e2f".to_owned(),
            routes: vec![
                Route::new("0.0.0.0/0", "192.168.0.1"),
                Route::new("10.0.1.0/24", "192.168.0.11"),
            ],
            added: 1,
            updated: 0,
            applied: false,
        };
        let mapping = NodePodMapping::from([("kube-node-1".to_owned(), "10.0.1.5/24".to_owned())]);

        let views = route_views(&report, &mapping);

        assert_eq!(views[0].node.to_string(), "-");
        assert_eq!(views[1].node.to_string(), "kube-node-1");
        assert_eq!(views[1].nexthop, "192.168.0.11");
        assert_eq!(
            RouteView::get_column_names(),
            vec!["DESTINATION", "NEXT HOP", "NODE"]
        );
    }
}
