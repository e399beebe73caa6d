use kube_stack_core::docker_env::{DockerEnv, DOCKER_CERT_PATH_ENV_VAR};

use crate::{cli::DockerEnvArgs, context::CloudContext};

use super::floating_ip::find_floating_ip;

pub async fn docker_env(args: DockerEnvArgs, context: CloudContext) -> anyhow::Result<()> {
    let network = match args.network {
        Some(network) => network,
        None => context.settings().network_name()?.to_owned(),
    };
    let session = context.connect().await?;
    let ip = find_floating_ip(&session, &args.server, &network).await?;

    let path = DockerEnv::new(ip)
        .with_port(args.port)
        .with_cert_path(std::env::var(DOCKER_CERT_PATH_ENV_VAR).ok())
        .write_for_server(&args.output_dir, &args.server)?;

    println!("{}", path.display());

    Ok(())
}
