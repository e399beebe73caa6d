use anyhow::{anyhow, Context};
use kube_stack_core::openstack::{compute::Server, Session};

use crate::{cli::FloatingIpArgs, context::CloudContext};

pub async fn floating_ip(args: FloatingIpArgs, context: CloudContext) -> anyhow::Result<()> {
    let network = match args.network {
        Some(network) => network,
        None => context.settings().network_name()?.to_owned(),
    };
    let session = context.connect().await?;
    let ip = find_floating_ip(&session, &args.server, &network).await?;

    println!("{ip}");

    Ok(())
}

pub async fn find_floating_ip(
    session: &Session,
    server_name: &str,
    network: &str,
) -> anyhow::Result<String> {
    let server = session
        .find_server_by_name(server_name)
        .await
        .with_context(|| format!("Couldn't look up server '{server_name}'!"))?;

    floating_ip_of(&server, network)
}

fn floating_ip_of(server: &Server, network: &str) -> anyhow::Result<String> {
    server
        .floating_ip(network)
        .map(str::to_owned)
        .ok_or_else(|| {
            anyhow!(
                "Server '{}' has no floating IP on the '{network}' network!",
                server.name
            )
        })
}
