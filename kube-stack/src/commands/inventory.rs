use anyhow::Context;
use kube_stack_core::inventory::{Inventory, InventoryConfig};
use log::info;

use crate::{cli::InventoryArgs, context::CloudContext, output::SerializableOutputDisplay};

pub async fn inventory(args: InventoryArgs, context: CloudContext) -> anyhow::Result<()> {
    let settings = context.settings();
    let config = InventoryConfig {
        network: settings.network_name()?.to_owned(),
        host_groups_key: settings.host_groups_key()?.to_owned(),
        host_vars_key: settings.host_vars_key()?.to_owned(),
    };

    let session = context.connect().await?;
    let servers = session
        .list_servers(&[])
        .await
        .context("Couldn't list servers!")?;
    let inventory = Inventory::build(&servers, &config)?;

    info!(
        "Inventory contains {} group(s) of {} server(s)",
        inventory.groups.len(),
        servers.len()
    );

    match args.host {
        Some(host) => inventory.host(&host).print_json_pretty()?,
        None => inventory.print_json_pretty()?,
    }

    Ok(())
}
